//! Selector engine: compiles CSS-like selectors and evaluates them over a
//! [`SyntaxTree`].
//!
//! ```
//! use esrewrite::selector::search;
//!
//! let matches = search("Identifier[name=/^foo/]", "foo(foobar, baz);").unwrap();
//! assert_eq!(matches.len(), 2);
//! ```

pub mod errors;
pub(crate) mod matcher;
pub(crate) mod parser;
pub mod shorthand;
pub mod syntax;

pub use errors::SelectorSyntaxError;
pub use shorthand::ShorthandPattern;
pub use syntax::SelectorList;

use std::str::FromStr;

use crate::ast::{SyntaxNode, SyntaxTree};
use crate::dialect::Dialect;
use crate::error::Error;
use crate::ts;

/// A compiled selector.
///
/// Immutable once compiled; evaluate it against as many trees as needed,
/// from any thread.
#[derive(Debug, Clone)]
pub struct Selector {
    text: String,
    compiled: Option<SelectorList>,
}

impl Selector {
    /// Compile selector text.
    ///
    /// The empty string compiles to a selector that matches nothing.
    /// `#/<body>/<flags>` is the shorthand for
    /// `Kind=Identifier[name=/<body>/<flags>]`.
    pub fn compile(text: &str) -> Result<Self, SelectorSyntaxError> {
        if text.is_empty() {
            return Ok(Self::empty());
        }

        let compiled = match ShorthandPattern::scan(text) {
            Some(pattern) => {
                let pattern = pattern?;
                tracing::debug!(selector = text, expanded = %pattern, "desugared shorthand selector");
                pattern.desugar()?
            }
            None => parser::parse_selector(text)?,
        };
        tracing::debug!(
            selector = text,
            alternatives = compiled.len(),
            "compiled selector"
        );

        Ok(Self {
            text: text.to_string(),
            compiled: Some(compiled),
        })
    }

    /// A selector that matches nothing.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            compiled: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_none()
    }

    /// The text this selector was compiled from.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// All matching nodes of `tree`, in pre-order.
    pub fn evaluate<'t>(&self, tree: &'t SyntaxTree) -> Vec<&'t SyntaxNode> {
        self.evaluate_from(tree.root())
    }

    /// All matching nodes in the subtree rooted at `root` (inclusive), in
    /// pre-order. Combinators cannot see above `root`.
    pub fn evaluate_from<'t>(&self, root: &'t SyntaxNode) -> Vec<&'t SyntaxNode> {
        match &self.compiled {
            Some(list) => matcher::select(list, root),
            None => Vec::new(),
        }
    }
}

impl FromStr for Selector {
    type Err = SelectorSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

/// Parse `source` and return the nodes matching `selector`, in pre-order.
///
/// Returned nodes are detached copies; print them with
/// [`print_node`](crate::printer::print_node).
pub fn search(selector: &str, source: &str) -> Result<Vec<SyntaxNode>, Error> {
    search_in(Dialect::default(), selector, source)
}

/// [`search`] with an explicit matching dialect name.
pub fn search_with_mode(mode: &str, selector: &str, source: &str) -> Result<Vec<SyntaxNode>, Error> {
    let dialect = Dialect::from_str(mode)?;
    search_in(dialect, selector, source)
}

fn search_in(dialect: Dialect, selector: &str, source: &str) -> Result<Vec<SyntaxNode>, Error> {
    let selector = dialect.compile(selector)?;
    if selector.is_empty() {
        return Ok(Vec::new());
    }

    let tree = ts::parse(source)?;
    let matches: Vec<SyntaxNode> = selector.evaluate(&tree).into_iter().cloned().collect();
    tracing::debug!(
        selector = selector.as_str(),
        matches = matches.len(),
        "search complete"
    );
    Ok(matches)
}
