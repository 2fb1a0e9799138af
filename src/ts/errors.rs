use thiserror::Error;

/// The input text could not be parsed as JavaScript.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceParseError {
    #[error("failed to set JavaScript grammar for parser: {message}")]
    LanguageSet { message: String },

    #[error("failed to parse source code")]
    ParseFailed,

    #[error("syntax error at {line}:{column} near `{context}` ({count} error node(s))")]
    Syntax {
        byte_start: usize,
        byte_end: usize,
        line: u32,
        column: u32,
        context: String,
        count: usize,
    },
}

impl SourceParseError {
    /// One-based line and column of the first syntax error, if any.
    pub fn location(&self) -> Option<(u32, u32)> {
        match self {
            SourceParseError::Syntax { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}
