//! Rule applicator: runs each rule of a [`RuleConfig`] over source text.
//!
//! Rules run in file order, each against the output of the previous
//! successful rule. A failing rule leaves the text as it was and the
//! remaining rules still run.

use std::fmt;

use crate::config::schema::{RuleConfig, RuleDefinition};
use crate::error::Error;
use crate::rewrite::replace_in;

/// Result of applying a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "RuleOutcome should be checked"]
pub enum RuleOutcome {
    /// The rule rewrote at least one node
    Applied { replacements: usize },
    /// The selector matched nothing
    NoMatch,
}

impl fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleOutcome::Applied { replacements } => {
                write!(f, "applied ({replacements} replacements)")
            }
            RuleOutcome::NoMatch => write!(f, "no match"),
        }
    }
}

/// The outcome of one rule, tagged with its id.
#[derive(Debug)]
pub struct RuleReport {
    pub id: String,
    pub result: Result<RuleOutcome, Error>,
}

/// Final text after all rules, plus a report per rule in file order.
#[derive(Debug)]
pub struct RulesApplied {
    pub output: String,
    pub reports: Vec<RuleReport>,
}

impl RulesApplied {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.reports.iter().filter_map(|report| match &report.result {
            Ok(_) => None,
            Err(err) => Some((report.id.as_str(), err)),
        })
    }

    pub fn replacements(&self) -> usize {
        self.reports
            .iter()
            .map(|report| match report.result {
                Ok(RuleOutcome::Applied { replacements }) => replacements,
                _ => 0,
            })
            .sum()
    }
}

/// Apply every rule of `config` to `source`.
pub fn apply_rules(config: &RuleConfig, source: &str) -> RulesApplied {
    let mut current = source.to_string();
    let mut reports = Vec::with_capacity(config.rules.len());

    for rule in &config.rules {
        let result = apply_rule(rule, &current).map(|outcome| {
            if outcome.replacements == 0 {
                return RuleOutcome::NoMatch;
            }
            let replacements = outcome.replacements;
            current = outcome.output;
            RuleOutcome::Applied { replacements }
        });

        match &result {
            Ok(outcome) => tracing::debug!(rule = %rule.id, %outcome, "rule finished"),
            Err(err) => tracing::warn!(rule = %rule.id, error = %err, "rule failed"),
        }
        reports.push(RuleReport {
            id: rule.id.clone(),
            result,
        });
    }

    RulesApplied {
        output: current,
        reports,
    }
}

fn apply_rule(
    rule: &RuleDefinition,
    source: &str,
) -> Result<crate::rewrite::ReplaceOutcome, Error> {
    let dialect = rule.dialect()?;
    replace_in(dialect, &rule.selector, &rule.replacement, source)
}
