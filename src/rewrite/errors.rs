use thiserror::Error;

use crate::ts::SourceParseError;

/// Replacement text does not reduce to exactly one representative node.
#[derive(Error, Debug)]
pub enum ReplacementShapeError {
    #[error("replacement contains no statement or expression")]
    Empty,

    #[error("replacement must be a single statement or expression, found {count} statements")]
    MultipleStatements { count: usize },

    #[error("replacement does not parse: {source}")]
    Unparseable {
        #[source]
        source: SourceParseError,
    },
}
