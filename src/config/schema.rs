use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

use crate::dialect::Dialect;

/// A rule file: metadata plus an ordered list of rewrite rules.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

impl RuleConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.rules.is_empty() {
            issues.push(ValidationIssue::EmptyRuleList);
        }

        let mut seen = HashSet::new();
        for rule in &self.rules {
            let rule_id = (!rule.id.trim().is_empty()).then(|| rule.id.clone());

            if rule_id.is_none() {
                issues.push(ValidationIssue::MissingField {
                    rule_id: None,
                    field: "id",
                });
            } else if !seen.insert(rule.id.as_str()) {
                issues.push(ValidationIssue::DuplicateId {
                    rule_id: rule.id.clone(),
                });
            }
            if rule.selector.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    rule_id: rule_id.clone(),
                    field: "selector",
                });
            }
            if rule.replacement.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    rule_id: rule_id.clone(),
                    field: "replacement",
                });
            }
            if let Some(mode) = &rule.mode {
                if let Err(err) = mode.parse::<Dialect>() {
                    issues.push(ValidationIssue::InvalidCombo {
                        rule_id,
                        message: err.to_string(),
                    });
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One selector-driven rewrite.
///
/// Unknown keys are rejected, so a misspelled `selector` or `mode` fails
/// loudly instead of silently falling back to a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    pub id: String,
    pub selector: String,
    pub replacement: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RuleDefinition {
    /// The rule's dialect; the default when `mode` is absent.
    ///
    /// Validated configs never fail here.
    pub fn dialect(&self) -> Result<Dialect, crate::dialect::ModeUnsupportedError> {
        match &self.mode {
            Some(mode) => mode.parse(),
            None => Ok(Dialect::default()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyRuleList,
    MissingField {
        rule_id: Option<String>,
        field: &'static str,
    },
    DuplicateId {
        rule_id: String,
    },
    InvalidCombo {
        rule_id: Option<String>,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyRuleList => write!(f, "rule file contains no rules"),
            ValidationIssue::MissingField { rule_id, field } => match rule_id {
                Some(id) => write!(f, "rule '{id}' missing required field '{field}'"),
                None => write!(f, "rule missing required field '{field}'"),
            },
            ValidationIssue::DuplicateId { rule_id } => {
                write!(f, "rule id '{rule_id}' is used more than once")
            }
            ValidationIssue::InvalidCombo { rule_id, message } => match rule_id {
                Some(id) => write!(f, "rule '{id}' has invalid configuration: {message}"),
                None => write!(f, "invalid rule configuration: {message}"),
            },
        }
    }
}
