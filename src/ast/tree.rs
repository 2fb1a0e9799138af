use std::sync::Arc;

use crate::ast::node::{NodeId, SyntaxNode};

/// Hands out node ids for one tree.
#[derive(Debug, Clone)]
pub(crate) struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub(crate) fn starting_at(next: u32) -> Self {
        Self { next }
    }

    pub(crate) fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// A parsed program: the root node plus the text it was parsed from.
///
/// A tree owns all of its nodes. Mutating it (through the rewrite engine)
/// invalidates any [`NodeId`] sets computed before the mutation.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    root: SyntaxNode,
    source: Arc<str>,
    ids: IdAllocator,
}

impl SyntaxTree {
    pub(crate) fn from_parts(root: SyntaxNode, source: Arc<str>, next_id: u32) -> Self {
        Self {
            root,
            source,
            ids: IdAllocator::starting_at(next_id),
        }
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn into_root(self) -> SyntaxNode {
        self.root
    }

    /// The text this tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Top-level statements of the program.
    pub fn statements(&self) -> &[SyntaxNode] {
        self.root.get("body").map(|body| body.nodes()).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.root.subtree_len()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut SyntaxNode, &mut IdAllocator) {
        (&mut self.root, &mut self.ids)
    }
}
