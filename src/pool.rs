//! Thread-local parser pooling.
//!
//! Creates a JavaScript parser on first use per thread and reuses it for
//! every later parse on that thread. Trees are never shared between threads;
//! only the parser instance is cached.

use crate::ts::{JsParser, SourceParseError};
use std::cell::RefCell;

thread_local! {
    static JS_PARSER: RefCell<Option<JsParser>> = const { RefCell::new(None) };
}

/// Execute function with pooled parser instance.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use esrewrite::pool::with_parser;
///
/// let tree = with_parser(|parser| parser.parse("var foo = 1;"))??;
/// assert_eq!(tree.root().kind(), "Program");
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(f: F) -> Result<R, SourceParseError>
where
    F: FnOnce(&mut JsParser) -> R,
{
    JS_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let parser = match slot.take() {
            Some(parser) => parser,
            None => JsParser::new()?,
        };
        Ok(f(slot.insert(parser)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pooled_parser_is_reused() {
        let first = with_parser(|parser| parser.parse("a;").map(|t| t.node_count())).unwrap();
        let second = with_parser(|parser| parser.parse("a;").map(|t| t.node_count())).unwrap();
        assert_eq!(first.unwrap(), second.unwrap());
    }
}
