use serde::Serialize;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::ast::tree::IdAllocator;

/// Identity of a node within one [`SyntaxTree`](crate::ast::SyntaxTree).
///
/// Two structurally identical nodes at different positions have different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Location of a node in the text it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Starting byte offset (inclusive)
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
    /// One-based line of `start`
    pub line: u32,
    /// One-based byte column of `start`
    pub column: u32,
}

impl Span {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl Scalar {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{}", format_number(*n)),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Null => f.write_str("null"),
        }
    }
}

/// Formats a number the way JavaScript prints it: integral values have no
/// fractional part.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// The value held by a named field of a [`SyntaxNode`].
#[derive(Debug, Clone)]
pub enum Value {
    Node(Box<SyntaxNode>),
    Nodes(Vec<SyntaxNode>),
    Scalar(Scalar),
}

impl Value {
    /// Child nodes held by this value, in order.
    pub fn nodes(&self) -> &[SyntaxNode] {
        match self {
            Value::Node(node) => std::slice::from_ref(node.as_ref()),
            Value::Nodes(nodes) => nodes,
            Value::Scalar(_) => &[],
        }
    }

    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }
}

/// What a field path resolves to.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// The value of a named field.
    Value(&'a Value),
    /// One element of a sequence, picked by a numeric segment.
    Element(&'a SyntaxNode),
}

/// A named field of a node.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) value: Value,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// One construct of a parsed program.
///
/// Fields are kept in the order the parser produced them, which follows the
/// source. A node parsed from text remembers that text (shared with the rest
/// of its tree), its own span, and the anchor: the byte range of the slot it
/// occupies in its parent's text. The printer uses anchors to splice replaced
/// children back into otherwise untouched source.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    id: NodeId,
    kind: String,
    fields: Vec<Field>,
    span: Option<Span>,
    source: Option<Arc<str>>,
    anchor: Option<Range<usize>>,
}

impl SyntaxNode {
    /// Create a detached node with no fields and no source text.
    pub fn new(id: NodeId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            fields: Vec::new(),
            span: None,
            source: None,
            anchor: None,
        }
    }

    /// Synthesize `<expression>;` around an expression node.
    pub(crate) fn expression_statement(id: NodeId, expression: SyntaxNode) -> Self {
        let mut stmt = Self::new(id, "ExpressionStatement");
        stmt.fields.push(Field {
            name: "expression".to_string(),
            value: Value::Node(Box::new(expression)),
        });
        stmt
    }

    /// Synthesize `(<expression>)`.
    pub(crate) fn parenthesized(id: NodeId, expression: SyntaxNode) -> Self {
        let mut parens = Self::new(id, "ParenthesizedExpression");
        parens.fields.push(Field {
            name: "expression".to_string(),
            value: Value::Node(Box::new(expression)),
        });
        parens
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    /// Resolve a dotted field path such as `function.name` to a field value.
    ///
    /// A numeric segment indexes into a sequence; a path ending on an index
    /// names a node rather than a field value, so use [`Self::lookup`] for
    /// those.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        match self.lookup(path.split('.'))? {
            Resolved::Value(value) => Some(value),
            Resolved::Element(_) => None,
        }
    }

    /// Resolve a path given as separate segments.
    ///
    /// `children.0` on a node whose `children` field is a sequence resolves
    /// to the first element.
    pub fn lookup<'p, I>(&self, segments: I) -> Option<Resolved<'_>>
    where
        I: IntoIterator<Item = &'p str>,
    {
        let mut current = Resolved::Element(self);
        for segment in segments {
            current = match current {
                Resolved::Element(node) => Resolved::Value(node.get(segment)?),
                Resolved::Value(Value::Node(node)) => Resolved::Value(node.get(segment)?),
                Resolved::Value(Value::Nodes(nodes)) => {
                    Resolved::Element(nodes.get(segment.parse::<usize>().ok()?)?)
                }
                Resolved::Value(Value::Scalar(_)) => return None,
            };
        }
        Some(current)
    }

    /// Direct child nodes in field order.
    pub fn children(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.fields.iter().flat_map(|field| field.value.nodes())
    }

    /// The original text of this node, when it still has one.
    pub fn source_text(&self) -> Option<&str> {
        let source = self.source.as_deref()?;
        source.get(self.span?.range())
    }

    pub(crate) fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub(crate) fn anchor(&self) -> Option<Range<usize>> {
        self.anchor.clone()
    }

    pub(crate) fn set_anchor(&mut self, anchor: Option<Range<usize>>) {
        self.anchor = anchor;
    }

    pub(crate) fn set_origin(&mut self, source: Arc<str>, span: Span) {
        self.anchor = Some(span.range());
        self.span = Some(span);
        self.source = Some(source);
    }

    pub(crate) fn kind_and_fields_mut(&mut self) -> (&str, &mut [Field]) {
        (&self.kind, &mut self.fields)
    }

    /// Store a node under `name`; a second node under the same name turns
    /// the field into a sequence.
    pub(crate) fn push_node(&mut self, name: &str, node: SyntaxNode) {
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => {
                let previous = std::mem::replace(&mut field.value, Value::Nodes(Vec::new()));
                field.value = match previous {
                    Value::Nodes(mut nodes) => {
                        nodes.push(node);
                        Value::Nodes(nodes)
                    }
                    Value::Node(first) => Value::Nodes(vec![*first, node]),
                    Value::Scalar(_) => Value::Node(Box::new(node)),
                };
            }
            None => self.fields.push(Field {
                name: name.to_string(),
                value: Value::Node(Box::new(node)),
            }),
        }
    }

    /// Append a node to the sequence field `name`.
    pub(crate) fn push_seq(&mut self, name: &str, node: SyntaxNode) {
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(Field {
                value: Value::Nodes(nodes),
                ..
            }) => nodes.push(node),
            _ => self.fields.push(Field {
                name: name.to_string(),
                value: Value::Nodes(vec![node]),
            }),
        }
    }

    pub(crate) fn set_scalar(&mut self, name: &str, scalar: Scalar) {
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => field.value = Value::Scalar(scalar),
            None => self.fields.push(Field {
                name: name.to_string(),
                value: Value::Scalar(scalar),
            }),
        }
    }

    /// Remove a field and hand back its value.
    pub(crate) fn take_field(&mut self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|field| field.name == name)?;
        Some(self.fields.remove(index).value)
    }

    /// Structural deep copy that gives every copied node a fresh id.
    ///
    /// Source text and spans are kept so the copy prints like the original.
    pub(crate) fn clone_with_ids(&self, ids: &mut IdAllocator) -> SyntaxNode {
        let id = ids.next_id();
        let fields = self
            .fields
            .iter()
            .map(|field| Field {
                name: field.name.clone(),
                value: match &field.value {
                    Value::Node(node) => Value::Node(Box::new(node.clone_with_ids(ids))),
                    Value::Nodes(nodes) => {
                        Value::Nodes(nodes.iter().map(|node| node.clone_with_ids(ids)).collect())
                    }
                    Value::Scalar(scalar) => Value::Scalar(scalar.clone()),
                },
            })
            .collect();
        SyntaxNode {
            id,
            kind: self.kind.clone(),
            fields,
            span: self.span,
            source: self.source.clone(),
            anchor: self.anchor.clone(),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children().map(SyntaxNode::subtree_len).sum::<usize>()
    }
}
