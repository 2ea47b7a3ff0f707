//! Parsed markup tree
//!
//! A fresh tree is produced by every parse pass. Parents own their children;
//! nothing is shared between passes.

use std::fmt;

use tower_lsp::lsp_types::{Position as LspPosition, Range};

/// A position in the document: 0-based line, 0-based UTF-16 column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextPosition {
    pub line: u32,
    pub column: u32,
}

impl TextPosition {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl From<LspPosition> for TextPosition {
    fn from(position: LspPosition) -> Self {
        Self { line: position.line, column: position.character }
    }
}

impl From<TextPosition> for LspPosition {
    fn from(position: TextPosition) -> Self {
        LspPosition { line: position.line, character: position.column }
    }
}

/// Half-open span of source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SourceRange {
    pub start: TextPosition,
    pub end: TextPosition,
}

impl SourceRange {
    pub fn new(start: TextPosition, end: TextPosition) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, position: TextPosition) -> bool {
        self.start <= position && position <= self.end
    }
}

impl From<SourceRange> for Range {
    fn from(range: SourceRange) -> Self {
        Range { start: range.start.into(), end: range.end.into() }
    }
}

/// Name of a markup element: `asp:Button` has prefix `asp` and name `Button`.
///
/// An element without a prefix is plain markup and never a registered control.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagReference {
    pub prefix: Option<String>,
    pub name: String,
}

impl TagReference {
    pub fn new(prefix: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
            name: name.into(),
        }
    }

    /// Splits a qualified name at the first `:`.
    pub fn parse(qualified: &str) -> Self {
        match qualified.split_once(':') {
            Some((prefix, name)) => Self::new(Some(prefix), name),
            None => Self::new(None, qualified),
        }
    }

    pub fn has_prefix(&self) -> bool {
        self.prefix.is_some()
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn matches(&self, other: &TagReference) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && match (&self.prefix, &other.prefix) {
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl fmt::Display for TagReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Attributes of a tag or directive in source order, looked up case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    entries: Vec<(String, String)>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut set = AttributeSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// The server-side block flavour selected by the character after `<%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    /// `<% code %>`
    Code,
    /// `<%= value %>`
    Render,
    /// `<%# binding %>`
    DataBinding,
    /// `<%$ Resources: key %>`
    Resource,
    /// `<%: value %>`
    HtmlEncoded,
}

impl ExpressionKind {
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '=' => Some(Self::Render),
            '#' => Some(Self::DataBinding),
            '$' => Some(Self::Resource),
            ':' => Some(Self::HtmlEncoded),
            _ => None,
        }
    }

    /// Expressions that evaluate to a value rather than run statements.
    pub fn is_value(&self) -> bool {
        !matches!(self, Self::Code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    pub name: TagReference,
    pub attributes: AttributeSet,
    /// Span of the start tag.
    pub start_tag: SourceRange,
    /// Span of the closing tag, if the element was explicitly closed.
    pub end_tag: Option<SourceRange>,
    pub self_closing: bool,
}

impl TagNode {
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").map(str::trim).filter(|id| !id.is_empty())
    }

    pub fn is_server_control(&self) -> bool {
        self.attributes
            .get("runat")
            .map(|v| v.eq_ignore_ascii_case("server"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveNode {
    pub name: String,
    pub attributes: AttributeSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionNode {
    pub kind: ExpressionKind,
    /// Text between the marker and `%>`, untrimmed.
    pub text: String,
    /// Position where `text` begins.
    pub text_start: TextPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherKind {
    Text,
    Comment,
    ServerComment,
    DocType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Tag(TagNode),
    Directive(DirectiveNode),
    Expression(ExpressionNode),
    Other(OtherKind),
}

/// A node of the parsed markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupNode {
    pub kind: NodeKind,
    pub range: SourceRange,
    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    pub fn new(kind: NodeKind, range: SourceRange) -> Self {
        Self { kind, range, children: Vec::new() }
    }

    pub fn as_tag(&self) -> Option<&TagNode> {
        match &self.kind {
            NodeKind::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn as_directive(&self) -> Option<&DirectiveNode> {
        match &self.kind {
            NodeKind::Directive(directive) => Some(directive),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&ExpressionNode> {
        match &self.kind {
            NodeKind::Expression(expression) => Some(expression),
            _ => None,
        }
    }

    /// Depth-first, pre-order walk over this node and its descendants.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a MarkupNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub fn directives(&self) -> Vec<&DirectiveNode> {
        let mut directives = Vec::new();
        self.walk(&mut |node| {
            if let Some(directive) = node.as_directive() {
                directives.push(directive);
            }
        });
        directives
    }
}
