use thiserror::Error;

/// A selector (canonical or desugared from the legacy shorthand) is malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorSyntaxError {
    #[error("unexpected '{found}' at offset {offset} in selector `{selector}`")]
    Unexpected {
        selector: String,
        offset: usize,
        found: char,
    },

    #[error("expected {expected} at offset {offset} in selector `{selector}`")]
    Expected {
        selector: String,
        offset: usize,
        expected: &'static str,
    },

    #[error("unknown pseudo-class ':{name}'")]
    UnknownPseudo { name: String },

    #[error("operator '{op}' cannot be used with a regular expression")]
    RegexOperator { op: &'static str },

    #[error("invalid regular expression /{pattern}/{flags}: {message}")]
    InvalidRegex {
        pattern: String,
        flags: String,
        message: String,
    },

    #[error("unterminated shorthand selector `{selector}`: missing closing '/'")]
    UnterminatedShorthand { selector: String },
}
