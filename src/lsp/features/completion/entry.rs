//! Completion entries produced by the assemblers and sub-builders.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{
    Command, CompletionItem, CompletionItemKind, Documentation, InsertTextFormat, Url,
};

pub const INSERT_EVENT_HANDLER_COMMAND: &str = "aspnet.insertEventHandler";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directive,
    Element,
    Attribute,
    Event,
    Property,
    Value,
    EnumMember,
    Color,
    Method,
    Field,
    Keyword,
    Class,
    BeginExpression,
    ClosingTag,
    SuggestedHandler,
}

impl From<EntryKind> for CompletionItemKind {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Directive => CompletionItemKind::KEYWORD,
            EntryKind::Element => CompletionItemKind::CLASS,
            EntryKind::Attribute | EntryKind::Property => CompletionItemKind::PROPERTY,
            EntryKind::Event => CompletionItemKind::EVENT,
            EntryKind::Value => CompletionItemKind::VALUE,
            EntryKind::EnumMember => CompletionItemKind::ENUM_MEMBER,
            EntryKind::Color => CompletionItemKind::COLOR,
            EntryKind::Method | EntryKind::SuggestedHandler => CompletionItemKind::METHOD,
            EntryKind::Field => CompletionItemKind::FIELD,
            EntryKind::Keyword => CompletionItemKind::KEYWORD,
            EntryKind::Class => CompletionItemKind::CLASS,
            EntryKind::BeginExpression | EntryKind::ClosingTag => CompletionItemKind::SNIPPET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerParameter {
    pub name: String,
    pub type_name: String,
}

/// Payload of an event handler the user may accept into the code-behind class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedHandler {
    pub handler_name: String,
    pub event_name: String,
    pub delegate_type: String,
    pub parameters: Vec<HandlerParameter>,
    pub class_name: String,
    /// Markup document the handler was suggested in; filled in by the server.
    #[serde(default)]
    pub document_uri: Option<Url>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEntry {
    pub label: String,
    pub kind: EntryKind,
    pub detail: Option<String>,
    pub documentation: Option<String>,
    pub insert_text: Option<String>,
    pub handler: Option<SuggestedHandler>,
}

impl CompletionEntry {
    pub fn new(label: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            insert_text: None,
            handler: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_documentation(mut self, documentation: Option<impl Into<String>>) -> Self {
        self.documentation = documentation.map(Into::into);
        self
    }

    pub fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    pub fn with_handler(mut self, handler: SuggestedHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Converts to an LSP item. Suggested handlers carry the insert command.
    pub fn into_completion_item(self, document_uri: Option<&Url>) -> CompletionItem {
        let command = self.handler.map(|mut handler| {
            if handler.document_uri.is_none() {
                handler.document_uri = document_uri.cloned();
            }
            Command {
                title: format!("Insert {}", handler.handler_name),
                command: INSERT_EVENT_HANDLER_COMMAND.to_string(),
                arguments: serde_json::to_value(&handler).ok().map(|v| vec![v]),
            }
        });

        CompletionItem {
            label: self.label,
            kind: Some(self.kind.into()),
            detail: self.detail,
            documentation: self.documentation.map(Documentation::String),
            insert_text: self.insert_text,
            insert_text_format: Some(InsertTextFormat::PLAIN_TEXT),
            command,
            ..Default::default()
        }
    }
}

impl From<CompletionEntry> for CompletionItem {
    fn from(entry: CompletionEntry) -> Self {
        entry.into_completion_item(None)
    }
}

/// Labels of `entries`, for assertions and logging.
pub fn labels(entries: &[CompletionEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.label.as_str()).collect()
}
