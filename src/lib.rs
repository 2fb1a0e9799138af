//! esrewrite: structural search and replace for JavaScript
//!
//! Nodes are found with CSS-like selectors over the syntax tree instead of
//! textual regular expressions, and matches can be substituted with a
//! replacement fragment while the rest of the file keeps its formatting.
//!
//! # Architecture
//!
//! - [`ts`] parses JavaScript with tree-sitter into an owned [`ast::SyntaxTree`].
//! - [`selector`] compiles selectors (including the `#/re/` shorthand for
//!   identifiers) and evaluates them in pre-order.
//! - [`rewrite`] computes the match set once, then swaps every matched node
//!   for a fresh clone of the replacement, wrapping expressions that land in
//!   statement position.
//! - [`printer`] prints the tree back, reusing original text for everything
//!   that was not replaced.
//!
//! Rule files ([`config`]) and verified atomic file writes ([`edit`]) sit on
//! top for the command-line tool.
//!
//! # Example
//!
//! ```
//! use esrewrite::{replace, search};
//!
//! let found = search("CallExpression[function.name=g]", "f(); g();").unwrap();
//! assert_eq!(found.len(), 1);
//!
//! let output = replace("ExpressionStatement", "h()", "function f(){ g(); }").unwrap();
//! assert_eq!(output, "function f(){ h(); }");
//! ```

pub mod ast;
pub mod cache;
pub mod config;
pub mod dialect;
pub mod edit;
pub mod error;
pub mod pool;
pub mod printer;
pub mod rewrite;
pub mod selector;
pub mod ts;

// Re-exports
pub use ast::{NodeId, Scalar, Span, SyntaxNode, SyntaxTree, Value};
pub use config::{
    apply_rules, load_from_path, load_from_str, ConfigError, RuleConfig, RuleOutcome, RulesApplied,
};
pub use dialect::{Dialect, ModeUnsupportedError};
pub use edit::{EditError, EditVerification, FileRewrite, RewriteResult};
pub use error::Error;
pub use printer::{print_node, print_tree};
pub use rewrite::{
    replace, replace_report, replace_with_mode, rewrite, ReplaceOutcome, ReplacementFragment,
    ReplacementShapeError, RewriteStats,
};
pub use selector::{search, search_with_mode, Selector, SelectorSyntaxError};
pub use ts::{parse, SourceParseError};
