//! The substitution pass.
//!
//! Matches are computed once, as a set of node ids, before anything is
//! mutated. The pass then walks the tree through `&mut` borrows; each parent
//! replaces a matched child directly in its own field, so the slot (field
//! name and parent kind) is known at the point of replacement. An inserted
//! clone is never visited, which bounds the pass to one substitution per
//! original match and lets an ancestor match shadow matches inside it.

use std::collections::HashSet;

use serde::Serialize;

use crate::ast::kind::{is_statement_kind, is_statement_slot};
use crate::ast::{IdAllocator, NodeId, SyntaxNode, SyntaxTree, Value};
use crate::rewrite::fragment::ReplacementFragment;
use crate::rewrite::precedence::{operator_of, Slot};
use crate::selector::Selector;

/// Counts from one rewrite pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    /// Nodes the selector matched before the pass.
    pub matched: usize,
    /// Substitutions performed. Lower than `matched` when matches nest.
    pub replaced: usize,
}

/// Replace every node of `tree` matched by `selector` with a fresh clone of
/// the fragment's representative.
///
/// A clone landing in a statement slot that is not itself a statement is
/// wrapped in an expression statement; an expression that binds more loosely
/// than its slot allows is wrapped in parentheses.
pub fn rewrite(
    tree: &mut SyntaxTree,
    selector: &Selector,
    fragment: &ReplacementFragment,
) -> RewriteStats {
    let matched: HashSet<NodeId> = selector
        .evaluate(tree)
        .into_iter()
        .map(SyntaxNode::id)
        .collect();
    let mut stats = RewriteStats {
        matched: matched.len(),
        replaced: 0,
    };
    if matched.is_empty() {
        return stats;
    }

    let (root, ids) = tree.parts_mut();
    let mut pass = Substitution {
        matched: &matched,
        fragment,
        ids,
        replaced: 0,
    };

    if matched.contains(&root.id()) {
        let replacement = pass.clone_into_slot(root, Slot::root());
        *root = replacement;
        pass.replaced += 1;
    } else {
        pass.visit(root);
    }

    stats.replaced = pass.replaced;
    tracing::debug!(
        selector = selector.as_str(),
        matched = stats.matched,
        replaced = stats.replaced,
        "rewrite pass complete"
    );
    stats
}

struct Substitution<'a> {
    matched: &'a HashSet<NodeId>,
    fragment: &'a ReplacementFragment,
    ids: &'a mut IdAllocator,
    replaced: usize,
}

impl Substitution<'_> {
    fn visit(&mut self, node: &mut SyntaxNode) {
        let operator = operator_of(node).map(str::to_owned);
        let (kind, fields) = node.kind_and_fields_mut();
        for field in fields.iter_mut() {
            let slot = Slot::new(kind, &field.name, operator.as_deref());
            match &mut field.value {
                Value::Node(child) => self.visit_slot(child, slot),
                Value::Nodes(children) => {
                    for child in children.iter_mut() {
                        self.visit_slot(child, slot);
                    }
                }
                Value::Scalar(_) => {}
            }
        }
    }

    fn visit_slot(&mut self, child: &mut SyntaxNode, slot: Slot<'_>) {
        if self.matched.contains(&child.id()) {
            let replacement = self.clone_into_slot(child, slot);
            *child = replacement;
            self.replaced += 1;
        } else {
            self.visit(child);
        }
    }

    /// Build the node that takes `target`'s place.
    fn clone_into_slot(&mut self, target: &SyntaxNode, slot: Slot<'_>) -> SyntaxNode {
        let clone = self.fragment.representative().clone_with_ids(self.ids);
        let statement = slot.is_statement() && !is_statement_kind(clone.kind());
        let (mut replacement, wrapped) = if statement {
            let id = self.ids.next_id();
            (SyntaxNode::expression_statement(id, clone), "statement")
        } else if slot.needs_parens(&clone) {
            let id = self.ids.next_id();
            (SyntaxNode::parenthesized(id, clone), "parentheses")
        } else {
            (clone, "none")
        };
        replacement.set_anchor(target.anchor());

        tracing::trace!(
            target = target.kind(),
            target_id = target.id().get(),
            replacement = replacement.kind(),
            wrapped,
            "substituted node"
        );
        replacement
    }
}
