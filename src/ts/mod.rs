//! Tree-sitter front end: parses JavaScript into [`SyntaxTree`](crate::ast::SyntaxTree).

pub mod errors;
pub mod parser;

pub use errors::SourceParseError;
pub use parser::{parse, JsParser};
