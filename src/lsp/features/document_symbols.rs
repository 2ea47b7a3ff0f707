//! Document outline
//!
//! Flattens the markup tree to the nodes worth showing: tags, directives and
//! expression blocks. Text, comments and the DOCTYPE are skipped.

use tower_lsp::lsp_types::{DocumentSymbol, Range, SymbolKind};
use tracing::debug;

use crate::markup::node::{MarkupNode, NodeKind, SourceRange, TextPosition};

/// Column shift applied to tag spans unless configured otherwise.
pub const LEGACY_TAG_COLUMN_OFFSET: u32 = 1;

/// Longest expression text shown in a label before it is cut.
const EXPRESSION_LABEL_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineOptions {
    pub tag_column_offset: u32,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self { tag_column_offset: LEGACY_TAG_COLUMN_OFFSET }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineKind {
    Tag,
    Directive,
    Expression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub label: String,
    pub kind: OutlineKind,
    /// Span selected when the entry is picked.
    pub range: SourceRange,
    pub children: Vec<OutlineNode>,
}

/// Outline of the children of `root`.
pub fn build_outline(root: &MarkupNode, options: OutlineOptions) -> Vec<OutlineNode> {
    root.children.iter().filter_map(|node| outline_node(node, options)).collect()
}

fn outline_node(node: &MarkupNode, options: OutlineOptions) -> Option<OutlineNode> {
    let (label, kind, range) = match &node.kind {
        NodeKind::Tag(tag) => {
            let label = match tag.id() {
                Some(id) => format!("<{}#{}>", tag.name, id),
                None => format!("<{}>", tag.name),
            };
            let end = tag.end_tag.map_or(tag.start_tag.end, |closing| closing.end);
            let shift = |p: TextPosition| TextPosition::new(p.line, p.column + options.tag_column_offset);
            let range = SourceRange::new(shift(tag.start_tag.start), shift(end));
            (label, OutlineKind::Tag, range)
        }
        NodeKind::Directive(directive) => {
            (format!("<%@ {} %>", directive.name), OutlineKind::Directive, node.range)
        }
        NodeKind::Expression(expression) => {
            (expression_label(&expression.text), OutlineKind::Expression, node.range)
        }
        NodeKind::Document | NodeKind::Other(_) => return None,
    };

    let children = node.children.iter().filter_map(|child| outline_node(child, options)).collect();
    Some(OutlineNode { label, kind, range, children })
}

fn expression_label(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return "<% %>".to_string();
    }
    let mut shown: String = text.chars().take(EXPRESSION_LABEL_CHARS).collect();
    if text.chars().count() > EXPRESSION_LABEL_CHARS {
        shown.push_str("...");
    }
    format!("<% {} %>", shown)
}

impl From<OutlineNode> for DocumentSymbol {
    fn from(node: OutlineNode) -> Self {
        let kind = match node.kind {
            OutlineKind::Tag => SymbolKind::OBJECT,
            OutlineKind::Directive => SymbolKind::KEY,
            OutlineKind::Expression => SymbolKind::FUNCTION,
        };
        let range: Range = node.range.into();
        let children: Vec<DocumentSymbol> = node.children.into_iter().map(Into::into).collect();
        DocumentSymbol {
            name: node.label,
            detail: None,
            kind,
            tags: None,
            #[allow(deprecated)]
            deprecated: None,
            range,
            selection_range: range,
            children: (!children.is_empty()).then_some(children),
        }
    }
}

/// Outline converted for a `textDocument/documentSymbol` response.
pub fn document_symbols(root: &MarkupNode, options: OutlineOptions) -> Vec<DocumentSymbol> {
    let outline = build_outline(root, options);
    debug!("Outline has {} top-level entries", outline.len());
    outline.into_iter().map(Into::into).collect()
}
