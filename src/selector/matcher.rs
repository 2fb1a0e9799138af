//! Selector evaluation over a syntax tree.
//!
//! The walk keeps an explicit path of `(parent, field, index)` steps from the
//! root to the current node. Combinators and positional pseudo-classes read
//! ancestors and siblings from that path, so nodes need no parent links.

use std::borrow::Cow;

use crate::ast::kind::{is_expression_kind, is_statement_kind, kind_matches};
use crate::ast::{Resolved, Scalar, SyntaxNode, Value};
use crate::selector::syntax::{
    Attribute, AttributeTest, Combinator, CompareOp, Complex, Compound, Literal, Pseudo,
    SelectorList,
};

/// The slot a node occupies in its parent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Step<'t> {
    pub(crate) parent: &'t SyntaxNode,
    pub(crate) field: &'t str,
    /// Position within a sequence field; `None` for single-node fields.
    pub(crate) index: Option<usize>,
}

/// Collect every node under `root` (inclusive) that matches `list`, in
/// pre-order. Each node appears at most once.
pub(crate) fn select<'t>(list: &SelectorList, root: &'t SyntaxNode) -> Vec<&'t SyntaxNode> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    visit(list, root, &mut path, &mut out);
    out
}

fn visit<'t>(
    list: &SelectorList,
    node: &'t SyntaxNode,
    path: &mut Vec<Step<'t>>,
    out: &mut Vec<&'t SyntaxNode>,
) {
    if list.matches(node, path) {
        out.push(node);
    }
    for (step, child) in child_steps(node) {
        path.push(step);
        visit(list, child, path, out);
        path.pop();
    }
}

fn child_steps<'t>(node: &'t SyntaxNode) -> impl Iterator<Item = (Step<'t>, &'t SyntaxNode)> {
    node.fields().iter().flat_map(move |field| {
        let sequence = matches!(field.value(), Value::Nodes(_));
        field
            .value()
            .nodes()
            .iter()
            .enumerate()
            .map(move |(index, child)| {
                let step = Step {
                    parent: node,
                    field: field.name(),
                    index: sequence.then_some(index),
                };
                (step, child)
            })
    })
}

impl SelectorList {
    pub(crate) fn matches<'t>(&self, node: &'t SyntaxNode, path: &[Step<'t>]) -> bool {
        self.alternatives
            .iter()
            .any(|complex| complex.matches(node, path))
    }
}

impl Complex {
    fn matches<'t>(&self, node: &'t SyntaxNode, path: &[Step<'t>]) -> bool {
        match self.compounds.len() {
            0 => false,
            len => self.matches_at(len - 1, node, path),
        }
    }

    /// Does `compounds[index]` match `node`, with everything to its left
    /// matching the node's context?
    fn matches_at<'t>(&self, index: usize, node: &'t SyntaxNode, path: &[Step<'t>]) -> bool {
        if !self.compounds[index].matches(node, path) {
            return false;
        }
        let Some(previous) = index.checked_sub(1) else {
            return true;
        };

        match self.combinators[previous] {
            Combinator::Child => match path.split_last() {
                Some((step, rest)) => self.matches_at(previous, step.parent, rest),
                None => false,
            },
            Combinator::Descendant => (0..path.len())
                .rev()
                .any(|depth| self.matches_at(previous, path[depth].parent, &path[..depth])),
            combinator @ (Combinator::Sibling | Combinator::Adjacent) => {
                let Some((step, rest)) = path.split_last() else {
                    return false;
                };
                let (Some(position), Some(Value::Nodes(siblings))) =
                    (step.index, step.parent.get(step.field))
                else {
                    return false;
                };
                let first = match combinator {
                    Combinator::Adjacent => position.saturating_sub(1),
                    _ => 0,
                };
                (first..position).rev().any(|sibling| {
                    let mut sibling_path = rest.to_vec();
                    sibling_path.push(Step {
                        index: Some(sibling),
                        ..*step
                    });
                    self.matches_at(previous, &siblings[sibling], &sibling_path)
                })
            }
        }
    }
}

impl Compound {
    fn matches<'t>(&self, node: &'t SyntaxNode, path: &[Step<'t>]) -> bool {
        if let Some(kind) = &self.kind {
            if !kind_matches(kind, node.kind()) {
                return false;
            }
        }
        self.attributes.iter().all(|attribute| attribute.matches(node))
            && self.pseudos.iter().all(|pseudo| pseudo.matches(node, path))
    }
}

/// What an attribute path resolved to.
enum Subject<'t> {
    Scalar(&'t Scalar),
    Node(&'t SyntaxNode),
    Sequence,
    Kind(&'t str),
}

impl Subject<'_> {
    fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Subject::Scalar(scalar) => Some(match scalar {
                Scalar::Str(s) => Cow::Borrowed(s.as_str()),
                other => Cow::Owned(other.to_string()),
            }),
            Subject::Node(node) => node.source_text().map(Cow::Borrowed),
            Subject::Kind(kind) => Some(Cow::Borrowed(kind)),
            Subject::Sequence => None,
        }
    }
}

impl Attribute {
    fn matches(&self, node: &SyntaxNode) -> bool {
        let subject = match node.lookup(self.path.iter().map(String::as_str)) {
            Some(Resolved::Value(Value::Scalar(scalar))) => Subject::Scalar(scalar),
            Some(Resolved::Value(Value::Node(child))) => Subject::Node(child),
            Some(Resolved::Element(child)) => Subject::Node(child),
            Some(Resolved::Value(Value::Nodes(_))) => Subject::Sequence,
            // `kind` falls back to the node kind when no such field exists.
            None if self.path.len() == 1 && self.path[0] == "kind" => Subject::Kind(node.kind()),
            None => return false,
        };

        match &self.test {
            AttributeTest::Present => !matches!(subject, Subject::Scalar(Scalar::Null)),
            AttributeTest::Compare { op, literal } => compare(&subject, *op, literal),
            AttributeTest::Regex { regex, negated } => subject
                .text()
                .is_some_and(|text| regex.is_match(&text) != *negated),
        }
    }
}

fn compare(subject: &Subject<'_>, op: CompareOp, literal: &Literal) -> bool {
    match op {
        CompareOp::Eq => equals(subject, literal),
        CompareOp::Ne => subject.text().is_some() && !equals(subject, literal),
        CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => {
            let (Subject::Scalar(Scalar::Number(actual)), Scalar::Number(expected)) =
                (subject, &literal.typed)
            else {
                return false;
            };
            match op {
                CompareOp::Lt => actual < expected,
                CompareOp::Le => actual <= expected,
                CompareOp::Gt => actual > expected,
                _ => actual >= expected,
            }
        }
    }
}

fn equals(subject: &Subject<'_>, literal: &Literal) -> bool {
    match (subject, &literal.typed) {
        (Subject::Scalar(Scalar::Number(actual)), Scalar::Number(expected)) => actual == expected,
        (Subject::Scalar(Scalar::Bool(actual)), Scalar::Bool(expected)) => actual == expected,
        (Subject::Scalar(Scalar::Null), Scalar::Null) => true,
        _ => subject.text().is_some_and(|text| text == literal.text),
    }
}

impl Pseudo {
    fn matches<'t>(&self, node: &'t SyntaxNode, path: &[Step<'t>]) -> bool {
        match self {
            Pseudo::Not(list) => !list.matches(node, path),
            Pseudo::Matches(list) => list.matches(node, path),
            Pseudo::Has(list) => {
                let mut scratch = path.to_vec();
                has_matching_descendant(list, node, &mut scratch)
            }
            Pseudo::FirstChild => position(path).is_some_and(|(index, _)| index == 0),
            Pseudo::LastChild => position(path).is_some_and(|(index, len)| index + 1 == len),
            Pseudo::NthChild(n) => position(path).is_some_and(|(index, _)| index + 1 == *n),
            Pseudo::NthLastChild(n) => position(path).is_some_and(|(index, len)| len - index == *n),
            Pseudo::Statement => is_statement_kind(node.kind()),
            Pseudo::Expression => is_expression_kind(node.kind()),
        }
    }
}

/// Index of the node in its sequence and the sequence length.
fn position(path: &[Step<'_>]) -> Option<(usize, usize)> {
    let step = path.last()?;
    let index = step.index?;
    let len = step.parent.get(step.field)?.nodes().len();
    Some((index, len))
}

fn has_matching_descendant<'t>(
    list: &SelectorList,
    node: &'t SyntaxNode,
    path: &mut Vec<Step<'t>>,
) -> bool {
    for (step, child) in child_steps(node) {
        path.push(step);
        let found = list.matches(child, path) || has_matching_descendant(list, child, path);
        path.pop();
        if found {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::parser::parse_selector;
    use crate::ts::parse;

    fn kinds(selector: &str, source: &str) -> Vec<String> {
        let tree = parse(source).unwrap();
        let list = parse_selector(selector).unwrap();
        select(&list, tree.root())
            .into_iter()
            .map(|node| node.source_text().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn matches_by_kind_in_preorder() {
        assert_eq!(kinds("Identifier", "a(b, c);"), vec!["a", "b", "c"]);
    }

    #[test]
    fn attribute_equality_on_scalars() {
        assert_eq!(kinds(r#"Identifier[name="b"]"#, "a(b, c);"), vec!["b"]);
        assert_eq!(kinds("Number[value=2]", "f(1, 2, 3);"), vec!["2"]);
        assert_eq!(kinds("Number[value=\"2\"]", "f(1, 2, 3);"), vec!["2"]);
        assert_eq!(kinds("Number[value!=2]", "f(1, 2, 3);"), vec!["1", "3"]);
        assert_eq!(kinds("Number[value>1]", "f(1, 2, 3);"), vec!["2", "3"]);
    }

    #[test]
    fn attribute_path_through_nodes() {
        assert_eq!(
            kinds("CallExpression[function.name=g]", "f(); g();"),
            vec!["g()"]
        );
        assert_eq!(
            kinds("CallExpression[function='obj.m']", "obj.m(); m();"),
            vec!["obj.m()"]
        );
    }

    #[test]
    fn indexed_paths_reach_sequence_elements() {
        assert_eq!(kinds("Arguments[children.0]", "f(a); g();"), vec!["(a)"]);
        assert_eq!(
            kinds("Arguments[children.1.name=b]", "f(a, b); g(b, a);"),
            vec!["(a, b)"]
        );
        assert_eq!(kinds("Arguments[children.0=/^a/]", "f(ab); g(b);"), vec!["(ab)"]);
    }

    #[test]
    fn kind_pseudo_field() {
        assert_eq!(kinds("*[kind=/^Num/]", "f(1);"), vec!["1"]);
        assert_eq!(
            kinds("LexicalDeclaration[kind=let]", "let a = 1; const b = 2;"),
            vec!["let a = 1;"]
        );
    }

    #[test]
    fn identifier_selector_covers_property_and_shorthand_names() {
        let source = "obj.foo(); const o = { foo }; const { foo: x } = o; foo();";
        assert_eq!(
            kinds("Identifier[name=foo]", source),
            vec!["foo", "foo", "foo", "foo"]
        );
        assert_eq!(kinds("PropertyIdentifier", source), vec!["foo", "foo"]);
    }

    #[test]
    fn regex_attribute() {
        assert_eq!(
            kinds("Identifier[name=/^foo/]", "foo(foobar, barfoo);"),
            vec!["foo", "foobar"]
        );
        assert_eq!(
            kinds("Identifier[name!=/^foo/]", "foo(foobar, barfoo);"),
            vec!["barfoo"]
        );
    }

    #[test]
    fn child_and_descendant_combinators() {
        let source = "f(g(x));";
        assert_eq!(kinds("CallExpression Identifier", source), vec!["f", "g", "x"]);
        assert_eq!(
            kinds("ExpressionStatement > CallExpression > Identifier", source),
            vec!["f"]
        );
    }

    #[test]
    fn sibling_combinators() {
        let source = "a; b; c;";
        assert_eq!(
            kinds(
                "ExpressionStatement[expression.name=a] ~ ExpressionStatement",
                source
            ),
            vec!["b;", "c;"]
        );
        assert_eq!(
            kinds(
                "ExpressionStatement[expression.name=a] + ExpressionStatement",
                source
            ),
            vec!["b;"]
        );
    }

    #[test]
    fn positional_pseudos() {
        let source = "f(a, b, c);";
        assert_eq!(kinds("Arguments > :first-child", source), vec!["a"]);
        assert_eq!(kinds("Arguments > :last-child", source), vec!["c"]);
        assert_eq!(kinds("Arguments > :nth-child(2)", source), vec!["b"]);
        assert_eq!(kinds("Arguments > :nth-last-child(3)", source), vec!["a"]);
    }

    #[test]
    fn logical_pseudos() {
        let source = "f(x); g(y);";
        assert_eq!(
            kinds("CallExpression:has(Identifier[name=y])", source),
            vec!["g(y)"]
        );
        assert_eq!(
            kinds("Identifier:not([name=/^[fg]$/])", source),
            vec!["x", "y"]
        );
        assert_eq!(
            kinds(":matches(Identifier[name=x], Identifier[name=g])", source),
            vec!["x", "g"]
        );
    }

    #[test]
    fn statement_and_expression_classes() {
        let source = "let a = f();";
        assert_eq!(kinds(":statement", source), vec!["let a = f();"]);
        assert!(kinds(":expression", source).contains(&"f()".to_string()));
    }

    #[test]
    fn alternatives_do_not_duplicate_nodes() {
        assert_eq!(kinds("Identifier, *[name=a]", "a;"), vec!["a"]);
    }
}
