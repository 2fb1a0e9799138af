use thiserror::Error;

use crate::dialect::ModeUnsupportedError;
use crate::rewrite::ReplacementShapeError;
use crate::selector::SelectorSyntaxError;
use crate::ts::SourceParseError;

/// Failure of a `search` or `replace` call. Every kind is fatal to the call.
#[derive(Error, Debug)]
pub enum Error {
    #[error("source parse error: {0}")]
    SourceParse(#[from] SourceParseError),

    #[error("selector syntax error: {0}")]
    SelectorSyntax(#[from] SelectorSyntaxError),

    #[error("invalid replacement: {0}")]
    ReplacementShape(#[from] ReplacementShapeError),

    #[error(transparent)]
    ModeUnsupported(#[from] ModeUnsupportedError),
}
