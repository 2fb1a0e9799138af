use crate::ast::kind::{BODY_FIELD, EXPRESSION_FIELD};
use crate::ast::{SyntaxNode, SyntaxTree, Value};
use crate::rewrite::errors::ReplacementShapeError;
use crate::ts;

/// Replacement text reduced to the one node that gets cloned into every
/// matched slot.
///
/// - `h()` or `h();` reduce to the call expression `h()`.
/// - `return x;` reduces to the return statement.
/// - Empty text, comments only, or more than one statement is rejected.
#[derive(Debug, Clone)]
pub struct ReplacementFragment {
    text: String,
    representative: SyntaxNode,
}

impl ReplacementFragment {
    /// Parse replacement text.
    pub fn parse(text: &str) -> Result<Self, ReplacementShapeError> {
        let tree =
            ts::parse(text).map_err(|source| ReplacementShapeError::Unparseable { source })?;
        Self::from_tree(tree)
    }

    /// Reduce an already parsed program to its representative node.
    pub fn from_tree(tree: SyntaxTree) -> Result<Self, ReplacementShapeError> {
        let text = tree.source().to_string();
        match tree.statements().len() {
            0 => return Err(ReplacementShapeError::Empty),
            1 => {}
            count => return Err(ReplacementShapeError::MultipleStatements { count }),
        }

        let mut root = tree.into_root();
        let statement = match root.take_field(BODY_FIELD) {
            Some(Value::Nodes(mut statements)) if statements.len() == 1 => statements.remove(0),
            Some(Value::Node(statement)) => *statement,
            _ => return Err(ReplacementShapeError::Empty),
        };
        Ok(Self {
            text,
            representative: unwrap_expression_statement(statement),
        })
    }

    /// Use a bare node, not wrapped in a program, as the representative.
    pub fn from_node(node: SyntaxNode) -> Self {
        let text = node.source_text().unwrap_or_default().to_string();
        Self {
            text,
            representative: unwrap_expression_statement(node),
        }
    }

    pub fn representative(&self) -> &SyntaxNode {
        &self.representative
    }

    /// The replacement text as given.
    pub fn text(&self) -> &str {
        &self.text
    }
}

fn unwrap_expression_statement(statement: SyntaxNode) -> SyntaxNode {
    if statement.kind() == "ExpressionStatement" {
        if let Some(Value::Node(expression)) = statement.get(EXPRESSION_FIELD) {
            return expression.as_ref().clone();
        }
    }
    statement
}
