//! Matching dialect selection.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::cache;
use crate::selector::{Selector, SelectorSyntaxError};

/// A requested matching dialect is not supported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported matching mode '{mode}' (supported: selector)")]
pub struct ModeUnsupportedError {
    pub mode: String,
}

/// The language used to describe which nodes to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// CSS-like structural selectors, including the `#/re/` shorthand.
    #[default]
    Selector,
}

impl Dialect {
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Selector => "selector",
        }
    }

    /// Compile `text` in this dialect, reusing the thread's compile cache.
    pub fn compile(self, text: &str) -> Result<Arc<Selector>, SelectorSyntaxError> {
        match self {
            Dialect::Selector => cache::get_or_compile(text),
        }
    }
}

impl FromStr for Dialect {
    type Err = ModeUnsupportedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "selector" | "css" | "esquery" => Ok(Dialect::Selector),
            _ => Err(ModeUnsupportedError {
                mode: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
