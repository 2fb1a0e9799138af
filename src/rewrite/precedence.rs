//! Operator precedence at the point a clone is spliced in.
//!
//! A replacement is printed from its own text, so an expression that binds
//! more loosely than the slot it lands in would be reparsed differently:
//! `a + b` dropped into the left operand of `x * 2` prints as `a + b * 2`.
//! Such clones get a synthesized pair of parentheses.

use crate::ast::kind::is_statement_slot;
use crate::ast::{Scalar, SyntaxNode, Value};

// Levels of the JavaScript operator table; higher binds tighter.
const SEQUENCE: u8 = 1;
const ASSIGNMENT: u8 = 2;
const CONDITIONAL: u8 = 3;
const COALESCE: u8 = 4;
const UNARY: u8 = 15;
const UPDATE: u8 = 16;
const NEW_WITHOUT_ARGUMENTS: u8 = 17;
const MEMBER: u8 = 18;
const PRIMARY: u8 = 19;

fn binary_precedence(operator: &str) -> Option<u8> {
    let level = match operator {
        "??" | "||" => COALESCE,
        "&&" => 5,
        "|" => 6,
        "^" => 7,
        "&" => 8,
        "==" | "!=" | "===" | "!==" => 9,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 10,
        "<<" | ">>" | ">>>" => 11,
        "+" | "-" => 12,
        "*" | "/" | "%" => 13,
        "**" => 14,
        _ => return None,
    };
    Some(level)
}

/// The `operator` token of a node, if it has one.
pub(crate) fn operator_of(node: &SyntaxNode) -> Option<&str> {
    node.get("operator")
        .and_then(Value::as_scalar)
        .and_then(Scalar::as_str)
}

/// How tightly `node` binds when printed without parentheses.
pub(crate) fn precedence(node: &SyntaxNode) -> u8 {
    match node.kind() {
        "SequenceExpression" => SEQUENCE,
        "AssignmentExpression"
        | "AugmentedAssignmentExpression"
        | "ArrowFunction"
        | "YieldExpression" => ASSIGNMENT,
        "TernaryExpression" => CONDITIONAL,
        "BinaryExpression" => operator_of(node)
            .and_then(binary_precedence)
            .unwrap_or(COALESCE),
        "UnaryExpression" | "AwaitExpression" => UNARY,
        "UpdateExpression" => UPDATE,
        "NewExpression" if node.get("arguments").is_none() => NEW_WITHOUT_ARGUMENTS,
        "NewExpression" | "CallExpression" | "MemberExpression" | "SubscriptExpression" => MEMBER,
        _ => PRIMARY,
    }
}

/// The place a replacement lands: parent kind, field, and the parent's
/// operator for binary expressions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Slot<'a> {
    parent: &'a str,
    field: &'a str,
    operator: Option<&'a str>,
}

impl<'a> Slot<'a> {
    pub(crate) fn new(parent: &'a str, field: &'a str, operator: Option<&'a str>) -> Self {
        Self {
            parent,
            field,
            operator,
        }
    }

    /// The tree root, which has no surrounding syntax.
    pub(crate) fn root() -> Self {
        Self::new("", "", None)
    }

    pub(crate) fn is_statement(&self) -> bool {
        is_statement_slot(self.parent, self.field)
    }

    /// Lowest precedence an expression may have here without parentheses.
    fn minimum(&self) -> u8 {
        match (self.parent, self.field) {
            ("BinaryExpression", side) => {
                let Some(level) = self.operator.and_then(binary_precedence) else {
                    return 0;
                };
                // `**` is right-associative and rejects a unary left operand.
                let exponent = self.operator == Some("**");
                match side {
                    "left" if exponent => UPDATE,
                    "left" => level,
                    "right" if exponent => level,
                    "right" => level + 1,
                    _ => 0,
                }
            }
            ("UnaryExpression", "argument") | ("AwaitExpression", _) => UNARY,
            ("CallExpression", "function")
            | ("MemberExpression", "object")
            | ("SubscriptExpression", "object")
            | ("NewExpression", "constructor")
            | ("UpdateExpression", "argument")
            | ("AssignmentExpression" | "AugmentedAssignmentExpression", "left") => MEMBER,
            ("TernaryExpression", "condition") => COALESCE,
            (
                "AssignmentExpression"
                | "AugmentedAssignmentExpression"
                | "TernaryExpression"
                | "ArrowFunction"
                | "Arguments"
                | "Array"
                | "SpreadElement"
                | "Pair"
                | "VariableDeclarator"
                | "AssignmentPattern"
                | "YieldExpression",
                _,
            ) => ASSIGNMENT,
            _ => 0,
        }
    }

    /// Whether `expression` must be parenthesized to keep its meaning here.
    pub(crate) fn needs_parens(&self, expression: &SyntaxNode) -> bool {
        if precedence(expression) < self.minimum() {
            return true;
        }
        match (self.parent, self.field) {
            ("BinaryExpression", "left" | "right") => {
                expression.kind() == "BinaryExpression"
                    && mixes_coalesce(self.operator, operator_of(expression))
            }
            // `new (f())()` is not `new f()()`.
            ("NewExpression", "constructor") => expression.kind() == "CallExpression",
            // `1.toString()` does not lex.
            ("MemberExpression", "object") => expression.kind() == "Number",
            _ => false,
        }
    }
}

/// `??` cannot share an unparenthesized operand with `||` or `&&`.
fn mixes_coalesce(parent: Option<&str>, child: Option<&str>) -> bool {
    let logical = |op: Option<&str>| matches!(op, Some("||" | "&&"));
    (parent == Some("??") && logical(child)) || (logical(parent) && child == Some("??"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::kind::EXPRESSION_FIELD;
    use crate::ts::parse;

    fn expression(source: &str) -> SyntaxNode {
        let tree = parse(source).unwrap();
        tree.statements()[0]
            .get(EXPRESSION_FIELD)
            .and_then(Value::as_node)
            .unwrap()
            .clone()
    }

    #[test]
    fn levels_follow_the_operator_table() {
        assert!(precedence(&expression("a, b")) < precedence(&expression("a = b")));
        assert!(precedence(&expression("a = b")) < precedence(&expression("a ? b : c")));
        assert!(precedence(&expression("a || b")) < precedence(&expression("a && b")));
        assert!(precedence(&expression("a + b")) < precedence(&expression("a * b")));
        assert!(precedence(&expression("a * b")) < precedence(&expression("-a")));
        assert!(precedence(&expression("new A")) < precedence(&expression("new A()")));
        assert_eq!(precedence(&expression("f()")), MEMBER);
        assert_eq!(precedence(&expression("x")), PRIMARY);
    }

    #[test]
    fn binary_operands() {
        let times_left = Slot::new("BinaryExpression", "left", Some("*"));
        assert!(times_left.needs_parens(&expression("a + b")));
        assert!(!times_left.needs_parens(&expression("a / b")));

        let minus_right = Slot::new("BinaryExpression", "right", Some("-"));
        assert!(minus_right.needs_parens(&expression("a - b")));
        assert!(!minus_right.needs_parens(&expression("a * b")));

        let power_left = Slot::new("BinaryExpression", "left", Some("**"));
        assert!(power_left.needs_parens(&expression("-a")));
        let power_right = Slot::new("BinaryExpression", "right", Some("**"));
        assert!(!power_right.needs_parens(&expression("a ** b")));
    }

    #[test]
    fn coalesce_never_mixes_with_logical_operators() {
        let slot = Slot::new("BinaryExpression", "left", Some("??"));
        assert!(slot.needs_parens(&expression("a || b")));
        assert!(!slot.needs_parens(&expression("a ?? b")));

        let slot = Slot::new("BinaryExpression", "right", Some("&&"));
        assert!(slot.needs_parens(&expression("a ?? b")));
    }

    #[test]
    fn list_elements_reject_sequences_only() {
        let argument = Slot::new("Arguments", "children", None);
        assert!(argument.needs_parens(&expression("a, b")));
        assert!(!argument.needs_parens(&expression("a = b")));
        assert!(!argument.needs_parens(&expression("(a, b)")));
    }

    #[test]
    fn callee_and_member_object() {
        let callee = Slot::new("CallExpression", "function", None);
        assert!(callee.needs_parens(&expression("a || b")));
        assert!(callee.needs_parens(&expression("new A")));
        assert!(!callee.needs_parens(&expression("a.b")));

        let object = Slot::new("MemberExpression", "object", None);
        assert!(object.needs_parens(&expression("1")));
        assert!(object.needs_parens(&expression("-a")));
        assert!(!object.needs_parens(&expression("f()")));
    }

    #[test]
    fn unconstrained_slots() {
        assert!(!Slot::root().needs_parens(&expression("a, b")));
        assert!(!Slot::root().is_statement());
        let statement = Slot::new("ExpressionStatement", EXPRESSION_FIELD, None);
        assert!(!statement.needs_parens(&expression("a, b")));
        assert!(Slot::new("Program", "body", None).is_statement());
    }
}
