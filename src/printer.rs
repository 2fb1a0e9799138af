//! Minimal-diff printer.
//!
//! A node that still carries the text it was parsed from prints that text
//! verbatim, with each child's printed form spliced in over the child's
//! anchor. Untouched regions therefore come out byte-identical; only replaced
//! nodes print differently. Nodes synthesized by the rewrite engine have no
//! text of their own and print from their kind.

use crate::ast::kind::EXPRESSION_FIELD;
use crate::ast::{SyntaxNode, SyntaxTree, Value};

/// Print a single node.
pub fn print_node(node: &SyntaxNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Print a whole tree, including any text before or after the root node.
pub fn print_tree(tree: &SyntaxTree) -> String {
    let source = tree.source();
    let root = tree.root();
    let mut out = String::with_capacity(source.len());

    match root.anchor().filter(|anchor| anchor.end <= source.len()) {
        Some(anchor) => {
            out.push_str(&source[..anchor.start]);
            write_node(root, &mut out);
            out.push_str(&source[anchor.end..]);
        }
        None => write_node(root, &mut out),
    }
    out
}

fn write_node(node: &SyntaxNode, out: &mut String) {
    let (Some(source), Some(span)) = (node.source(), node.span()) else {
        write_synthesized(node, out);
        return;
    };

    let mut children: Vec<(std::ops::Range<usize>, &SyntaxNode)> = node
        .children()
        .filter_map(|child| child.anchor().map(|anchor| (anchor, child)))
        .collect();
    children.sort_by_key(|(anchor, _)| anchor.start);

    let mut cursor = span.start;
    for (anchor, child) in children {
        if anchor.start < cursor || anchor.end > span.end {
            continue;
        }
        out.push_str(&source[cursor..anchor.start]);
        write_node(child, out);
        cursor = anchor.end;
    }
    out.push_str(&source[cursor..span.end]);
}

fn write_synthesized(node: &SyntaxNode, out: &mut String) {
    let expression = node.get(EXPRESSION_FIELD).and_then(Value::as_node);
    match (node.kind(), expression) {
        ("ExpressionStatement", Some(expression)) => {
            write_node(expression, out);
            out.push(';');
            return;
        }
        ("ParenthesizedExpression", Some(expression)) => {
            out.push('(');
            write_node(expression, out);
            out.push(')');
            return;
        }
        _ => {}
    }

    for (index, child) in node.children().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        write_node(child, out);
    }
}
