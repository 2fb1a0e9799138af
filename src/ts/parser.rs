use crate::ast::kind::{self, COMMENTS_FIELD};
use crate::ast::{NodeId, Scalar, Span, SyntaxNode, SyntaxTree};
use crate::pool::with_parser;
use crate::ts::errors::SourceParseError;
use std::sync::Arc;
use tree_sitter::Parser;

/// Tree-sitter parser wrapper for JavaScript source code.
pub struct JsParser {
    parser: Parser,
}

impl JsParser {
    pub fn new() -> Result<Self, SourceParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|e| SourceParseError::LanguageSet {
                message: e.to_string(),
            })?;

        Ok(Self { parser })
    }

    /// Parse source text into an owned syntax tree.
    ///
    /// Tree-sitter recovers from errors, but a tree containing `ERROR` or
    /// `MISSING` nodes is rejected here.
    pub fn parse(&mut self, source: &str) -> Result<SyntaxTree, SourceParseError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(SourceParseError::ParseFailed)?;
        let root = tree.root_node();

        if root.has_error() {
            let mut errors = Vec::new();
            collect_error_nodes(root, &mut errors);
            if let Some(first) = errors.first() {
                let span = span_of(*first);
                return Err(SourceParseError::Syntax {
                    byte_start: span.start,
                    byte_end: span.end,
                    line: span.line,
                    column: span.column,
                    context: error_context(first, source),
                    count: errors.len(),
                });
            }
        }

        let text: Arc<str> = Arc::from(source);
        let mut builder = TreeBuilder {
            source: &text,
            next_id: 0,
        };
        let root = builder.convert(root);
        tracing::debug!(
            bytes = source.len(),
            nodes = builder.next_id,
            "parsed JavaScript source"
        );
        let next_id = builder.next_id;
        Ok(SyntaxTree::from_parts(root, text, next_id))
    }
}

/// Parse with the calling thread's pooled parser.
pub fn parse(source: &str) -> Result<SyntaxTree, SourceParseError> {
    with_parser(|parser| parser.parse(source))?
}

struct TreeBuilder<'s> {
    source: &'s Arc<str>,
    next_id: u32,
}

impl TreeBuilder<'_> {
    fn convert(&mut self, node: tree_sitter::Node<'_>) -> SyntaxNode {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let kind = kind::node_kind_name(node.kind());
        let mut out = SyntaxNode::new(id, kind);
        out.set_origin(Arc::clone(self.source), span_of(node));

        let unnamed_field = kind::unnamed_child_field(out.kind());
        let unnamed_is_sequence = kind::unnamed_children_are_sequence(out.kind());
        let mut named_children = 0usize;

        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                let field = cursor.field_name();

                if child.is_named() {
                    named_children += 1;
                    let converted = self.convert(child);
                    if child.kind() == "comment" {
                        out.push_seq(COMMENTS_FIELD, converted);
                    } else {
                        match field {
                            Some(name) if kind::is_statement_slot(out.kind(), name) => {
                                out.push_seq(name, converted)
                            }
                            Some(name) => out.push_node(name, converted),
                            None if unnamed_is_sequence => out.push_seq(unnamed_field, converted),
                            None => out.push_node(unnamed_field, converted),
                        }
                    }
                } else if let Some(name) = field {
                    out.set_scalar(name, Scalar::Str(self.text(child).to_string()));
                }

                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }

        self.attach_scalars(&mut out, node, named_children == 0);
        out
    }

    fn attach_scalars(&self, out: &mut SyntaxNode, node: tree_sitter::Node<'_>, is_leaf: bool) {
        let text = self.text(node);
        match node.kind() {
            ts_kind if kind::is_identifier_ts_kind(ts_kind) => {
                out.set_scalar("name", Scalar::Str(text.to_string()));
            }
            "number" => {
                let value = parse_js_number(text)
                    .map(Scalar::Number)
                    .unwrap_or_else(|| Scalar::Str(text.to_string()));
                out.set_scalar("value", value);
                out.set_scalar("raw", Scalar::Str(text.to_string()));
            }
            "string" => {
                out.set_scalar("value", Scalar::Str(unquote(text).to_string()));
                out.set_scalar("raw", Scalar::Str(text.to_string()));
            }
            "true" => out.set_scalar("value", Scalar::Bool(true)),
            "false" => out.set_scalar("value", Scalar::Bool(false)),
            "null" => out.set_scalar("value", Scalar::Null),
            _ if is_leaf => out.set_scalar("raw", Scalar::Str(text.to_string())),
            _ => {}
        }
    }

    fn text(&self, node: tree_sitter::Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or("")
    }
}

fn span_of(node: tree_sitter::Node<'_>) -> Span {
    let start = node.start_position();
    Span {
        start: node.start_byte(),
        end: node.end_byte(),
        line: start.row as u32 + 1,
        column: start.column as u32 + 1,
    }
}

/// Parse a JavaScript numeric literal (decimal, hex, octal, binary, with
/// optional `_` separators). BigInt literals are left unparsed.
fn parse_js_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    if cleaned.ends_with('n') {
        return None;
    }
    let lower = cleaned.to_ascii_lowercase();
    let radix = |prefix: &str, radix: u32| {
        lower
            .strip_prefix(prefix)
            .and_then(|digits| u64::from_str_radix(digits, radix).ok())
            .map(|n| n as f64)
    };
    if lower.starts_with("0x") {
        return radix("0x", 16);
    }
    if lower.starts_with("0o") {
        return radix("0o", 8);
    }
    if lower.starts_with("0b") {
        return radix("0b", 2);
    }
    lower.parse::<f64>().ok()
}

/// Strip the surrounding quotes of a string literal. Escapes are left as
/// written.
fn unquote(text: &str) -> &str {
    if text.len() >= 2 {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

fn error_context(node: &tree_sitter::Node<'_>, source: &str) -> String {
    if node.is_missing() {
        return format!("missing {}", node.kind());
    }
    let text = source.get(node.byte_range()).unwrap_or_default();
    if text.chars().count() > 50 {
        let truncated: String = text.chars().take(47).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}

fn collect_error_nodes<'t>(node: tree_sitter::Node<'t>, errors: &mut Vec<tree_sitter::Node<'t>>) {
    if node.is_error() || node.is_missing() {
        errors.push(node);
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Value;

    fn parse_ok(source: &str) -> SyntaxTree {
        JsParser::new().unwrap().parse(source).unwrap()
    }

    #[test]
    fn parse_valid_javascript() {
        let tree = parse_ok("var foo = 1;");
        assert_eq!(tree.root().kind(), "Program");
        assert_eq!(tree.statements().len(), 1);
        assert_eq!(tree.statements()[0].kind(), "VariableDeclaration");
    }

    #[test]
    fn parse_invalid_javascript() {
        let err = JsParser::new().unwrap().parse("function (").unwrap_err();
        assert!(matches!(err, SourceParseError::Syntax { .. }));
        assert!(err.location().is_some());
    }

    #[test]
    fn identifiers_carry_name() {
        let tree = parse_ok("var foo = 1;");
        let declarator = tree.statements()[0].children().next().unwrap();
        assert_eq!(declarator.kind(), "VariableDeclarator");

        let name = declarator.get_path("name.name").and_then(Value::as_scalar);
        assert_eq!(name, Some(&Scalar::Str("foo".to_string())));

        let value = declarator.get_path("value.value").and_then(Value::as_scalar);
        assert_eq!(value, Some(&Scalar::Number(1.0)));
    }

    #[test]
    fn operator_tokens_become_scalars() {
        let tree = parse_ok("const x = 1 + 2;");
        let decl = &tree.statements()[0];
        assert_eq!(decl.kind(), "LexicalDeclaration");
        assert_eq!(
            decl.get("kind").and_then(Value::as_scalar),
            Some(&Scalar::Str("const".to_string()))
        );

        let op = decl
            .get_path("children.0.value.operator")
            .and_then(Value::as_scalar);
        assert_eq!(op, Some(&Scalar::Str("+".to_string())));
    }

    #[test]
    fn expression_statement_holds_single_expression() {
        let tree = parse_ok("g();");
        let stmt = &tree.statements()[0];
        assert_eq!(stmt.kind(), "ExpressionStatement");
        let expr = stmt.get("expression").and_then(Value::as_node).unwrap();
        assert_eq!(expr.kind(), "CallExpression");
        assert_eq!(expr.source_text(), Some("g()"));
    }

    #[test]
    fn comments_are_kept_apart_from_statements() {
        let tree = parse_ok("// leading\nfoo();\n");
        assert_eq!(tree.statements().len(), 1);
        let comments = tree.root().get("comments").map(Value::nodes).unwrap();
        assert_eq!(comments[0].kind(), "Comment");
    }

    #[test]
    fn ids_are_unique_preorder() {
        let tree = parse_ok("f(a, b);");
        let mut ids = Vec::new();
        fn walk(node: &SyntaxNode, ids: &mut Vec<u32>) {
            ids.push(node.id().get());
            for child in node.children() {
                walk(child, ids);
            }
        }
        walk(tree.root(), &mut ids);
        assert_eq!(ids[0], 0);
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
        assert_eq!(tree.node_count(), ids.len());
    }

    #[test]
    fn single_statement_case_body_is_a_sequence() {
        let tree = parse_ok("switch (x) { case 1: a(); case 2: b(); c(); }");
        let cases: Vec<&SyntaxNode> = tree.statements()[0]
            .get("body")
            .and_then(Value::as_node)
            .unwrap()
            .children()
            .collect();
        assert_eq!(cases.len(), 2);
        assert!(matches!(cases[0].get("body"), Some(Value::Nodes(body)) if body.len() == 1));
        assert!(matches!(cases[1].get("body"), Some(Value::Nodes(body)) if body.len() == 2));
    }

    #[test]
    fn js_numbers() {
        assert_eq!(parse_js_number("42"), Some(42.0));
        assert_eq!(parse_js_number("0x1F"), Some(31.0));
        assert_eq!(parse_js_number("1_000"), Some(1000.0));
        assert_eq!(parse_js_number("1.5e3"), Some(1500.0));
        assert_eq!(parse_js_number("10n"), None);
    }
}
