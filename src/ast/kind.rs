//! Kind naming and classification for JavaScript syntax nodes.

/// Field holding the statements of a statement container.
pub const BODY_FIELD: &str = "body";

/// Field holding unnamed children of nodes that are not statement containers.
pub const CHILDREN_FIELD: &str = "children";

/// Field collecting comments attached anywhere inside a node.
pub const COMMENTS_FIELD: &str = "comments";

/// Field holding the single expression of an expression statement.
pub const EXPRESSION_FIELD: &str = "expression";

const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "property_identifier",
    "private_property_identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
    "statement_identifier",
];

/// Node kinds of every identifier-like name. The `Identifier` type selector
/// matches all of them.
const IDENTIFIER_NODE_KINDS: &[&str] = &[
    "Identifier",
    "PropertyIdentifier",
    "PrivatePropertyIdentifier",
    "ShorthandPropertyIdentifier",
    "ShorthandPropertyIdentifierPattern",
    "StatementIdentifier",
];

const LITERAL_KINDS: &[&str] = &[
    "Number",
    "String",
    "TemplateString",
    "Regex",
    "True",
    "False",
    "Null",
    "Undefined",
];

/// Convert a tree-sitter kind (`call_expression`) to a node kind
/// (`CallExpression`).
pub fn node_kind_name(ts_kind: &str) -> String {
    ts_kind
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

pub fn is_identifier_ts_kind(ts_kind: &str) -> bool {
    IDENTIFIER_KINDS.contains(&ts_kind)
}

/// Whether a node of `node_kind` satisfies the type selector `selector_kind`.
///
/// Kinds match exactly, except that `Identifier` also covers member
/// properties, object shorthands, destructuring shorthands and labels.
pub fn kind_matches(selector_kind: &str, node_kind: &str) -> bool {
    selector_kind == node_kind
        || (selector_kind == "Identifier" && IDENTIFIER_NODE_KINDS.contains(&node_kind))
}

/// Where unnamed children of a node of this kind are stored.
pub fn unnamed_child_field(kind: &str) -> &'static str {
    match kind {
        "Program" | "StatementBlock" | "ClassBody" | "SwitchBody" => BODY_FIELD,
        "ExpressionStatement" | "ParenthesizedExpression" => EXPRESSION_FIELD,
        _ => CHILDREN_FIELD,
    }
}

/// Whether unnamed children of this kind form a sequence even when there is
/// only one of them.
pub fn unnamed_children_are_sequence(kind: &str) -> bool {
    unnamed_child_field(kind) != EXPRESSION_FIELD
}

pub fn is_statement_kind(kind: &str) -> bool {
    kind.ends_with("Statement") || kind.ends_with("Declaration") || kind == "StatementBlock"
}

pub fn is_expression_kind(kind: &str) -> bool {
    kind.ends_with("Expression")
        || LITERAL_KINDS.contains(&kind)
        || matches!(
            kind,
            "Identifier"
                | "This"
                | "Super"
                | "Array"
                | "Object"
                | "ArrowFunction"
                | "Class"
                | "FunctionExpression"
                | "GeneratorFunction"
        )
}

/// Whether a child stored in `field` of a `parent_kind` node sits directly in
/// a sequence of statements.
pub fn is_statement_slot(parent_kind: &str, field: &str) -> bool {
    field == BODY_FIELD
        && matches!(
            parent_kind,
            "Program" | "StatementBlock" | "SwitchCase" | "SwitchDefault"
        )
}
