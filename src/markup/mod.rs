//! Markup model: node tree, character state tracker, parser and page facts.

pub mod node;
pub mod page_info;
pub mod parser;
pub mod tracker;

pub use node::{
    AttributeSet, DirectiveNode, ExpressionKind, ExpressionNode, MarkupNode, NodeKind, OtherKind,
    SourceRange, TagNode, TagReference, TextPosition,
};
pub use page_info::{DocumentKind, PageInfo, TagRegistrations};
pub use parser::parse_document;
pub use tracker::{AttributeOwner, MarkupState, MarkupTracker, PendingNode};
