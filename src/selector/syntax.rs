//! Compiled selector structure.

use regex::{Regex, RegexBuilder};

use crate::ast::Scalar;
use crate::selector::errors::SelectorSyntaxError;

/// Comma-separated alternatives; a node matches if any alternative does.
#[derive(Debug, Clone)]
pub struct SelectorList {
    pub(crate) alternatives: Vec<Complex>,
}

impl SelectorList {
    pub(crate) fn single(compound: Compound) -> Self {
        Self {
            alternatives: vec![Complex {
                compounds: vec![compound],
                combinators: Vec::new(),
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

/// Compounds joined by combinators. `combinators[i]` sits between
/// `compounds[i]` and `compounds[i + 1]`; the last compound is the subject.
#[derive(Debug, Clone)]
pub struct Complex {
    pub(crate) compounds: Vec<Compound>,
    pub(crate) combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A B`
    Descendant,
    /// `A > B`
    Child,
    /// `A ~ B`
    Sibling,
    /// `A + B`
    Adjacent,
}

/// A kind test plus attribute and pseudo-class tests on one node.
/// `kind: None` matches any kind.
#[derive(Debug, Clone, Default)]
pub struct Compound {
    pub(crate) kind: Option<String>,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) pseudos: Vec<Pseudo>,
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub(crate) path: Vec<String>,
    pub(crate) test: AttributeTest,
}

#[derive(Debug, Clone)]
pub enum AttributeTest {
    Present,
    Compare { op: CompareOp, literal: Literal },
    Regex { regex: Regex, negated: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// An attribute value as written in the selector, with its typed reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub(crate) text: String,
    pub(crate) typed: Scalar,
}

impl Literal {
    pub(crate) fn quoted(text: String) -> Self {
        Self {
            typed: Scalar::Str(text.clone()),
            text,
        }
    }

    /// Read an unquoted token: `true`, `false`, `null`, a number, or a string.
    pub(crate) fn bare(text: &str) -> Self {
        let typed = match text {
            "true" => Scalar::Bool(true),
            "false" => Scalar::Bool(false),
            "null" => Scalar::Null,
            _ if looks_numeric(text) => text
                .parse::<f64>()
                .map(Scalar::Number)
                .unwrap_or_else(|_| Scalar::Str(text.to_string())),
            _ => Scalar::Str(text.to_string()),
        };
        Self {
            text: text.to_string(),
            typed,
        }
    }
}

fn looks_numeric(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '+' || c == '.')
}

#[derive(Debug, Clone)]
pub enum Pseudo {
    Not(SelectorList),
    Matches(SelectorList),
    Has(SelectorList),
    FirstChild,
    LastChild,
    NthChild(usize),
    NthLastChild(usize),
    Statement,
    Expression,
}

/// Compile a JavaScript-style regex literal body and flags.
///
/// `i`, `m` and `s` map to engine options; `g`, `y`, `u` and `d` only affect
/// JavaScript iteration semantics and are ignored. `\/` in the body is an
/// escaped delimiter and becomes a plain `/`.
pub(crate) fn compile_regex(body: &str, flags: &str) -> Result<Regex, SelectorSyntaxError> {
    let invalid = |message: String| SelectorSyntaxError::InvalidRegex {
        pattern: body.to_string(),
        flags: flags.to_string(),
        message,
    };

    let mut builder = RegexBuilder::new(&unescape_delimiters(body));
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'g' | 'y' | 'u' | 'd' => {}
            other => return Err(invalid(format!("unsupported flag '{other}'"))),
        }
    }
    builder.build().map_err(|e| invalid(e.to_string()))
}

fn unescape_delimiters(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('/') => out.push('/'),
            Some(escaped) => {
                out.push('\\');
                out.push(escaped);
            }
            None => out.push('\\'),
        }
    }
    out
}
