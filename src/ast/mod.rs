//! Owned syntax tree shared by the selector and rewrite engines.
//!
//! Nodes expose a uniform field accessor (by name or dotted path) returning
//! a tagged [`Value`], so matching never depends on grammar-specific types.

pub mod kind;
pub mod node;
pub mod tree;

pub use node::{Field, NodeId, Resolved, Scalar, Span, SyntaxNode, Value};
pub use tree::SyntaxTree;

pub(crate) use tree::IdAllocator;
