//! Language sub-builder contract
//!
//! Completion inside `<% ... %>` blocks is delegated to a builder for the
//! page's language. The markup side classifies the cursor and hands over;
//! the builder owns everything about the embedded language.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  Completion engine                  │
//! │  (mode = Expression(kind))          │
//! └──────────────┬──────────────────────┘
//!                │ looks up by page language
//! ┌──────────────▼──────────────────────┐
//! │  BuilderRegistry                    │
//! └──────────────┬──────────────────────┘
//!                │ dyn LanguageCompletionBuilder
//! ┌──────────────▼──────────────────────┐
//! │  CSharpCompletionBuilder            │
//! │  VbCompletionBuilder                │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Usage Example
//!
//! ```rust,ignore
//! let builder = registry.get(&snapshot.page_info.language)?;
//! let document = builder.build_document(&snapshot.page_info, &snapshot, &types);
//! let local = builder.build_local_document(&document, kind, before, after);
//! let entries = builder.handle_completion(&document, &local, types.index(), Some('.'));
//! ```

use tower_lsp::lsp_types::SignatureHelp;

use crate::lsp::document::DocumentSnapshot;
use crate::lsp::features::adapters::code_model::{BuiltDocument, LocalDocument};
use crate::lsp::features::completion::entry::{CompletionEntry, SuggestedHandler};
use crate::markup::node::ExpressionKind;
use crate::markup::page_info::PageInfo;
use crate::type_system::{TypeIndex, TypeSystem};

/// Completion for one embedded language.
pub trait LanguageCompletionBuilder: Send + Sync {
    /// Canonical language id as written in `Language="..."`.
    fn language_id(&self) -> &'static str;

    /// Other spellings accepted for `Language`.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    fn keywords(&self) -> &'static [&'static str];

    /// Builds the virtual code document for a markup snapshot: imports, a
    /// class deriving from the `Inherits` class, designer fields and one
    /// method body per expression.
    fn build_document(
        &self,
        page_info: &PageInfo,
        snapshot: &DocumentSnapshot,
        types: &TypeSystem,
    ) -> BuiltDocument;

    /// Code unit for the expression under the caret.
    ///
    /// # Arguments
    /// * `document` - Result of `build_document`
    /// * `kind` - Block flavour of the expression
    /// * `source_text` - Expression text up to the caret
    /// * `text_after_caret` - Document text after the caret
    fn build_local_document(
        &self,
        document: &BuiltDocument,
        kind: ExpressionKind,
        source_text: &str,
        text_after_caret: &str,
    ) -> LocalDocument;

    /// Entries at the caret. After `target.` these are the members of the
    /// target's type; otherwise code-behind members, fields and keywords.
    fn handle_completion(
        &self,
        document: &BuiltDocument,
        local: &LocalDocument,
        index: &dyn TypeIndex,
        trigger: Option<char>,
    ) -> Vec<CompletionEntry>;

    /// Signature help for the innermost open call.
    fn handle_parameter_completion(
        &self,
        document: &BuiltDocument,
        local: &LocalDocument,
        index: &dyn TypeIndex,
    ) -> Option<SignatureHelp>;

    /// Handler stub inserted when a suggested handler is accepted.
    fn render_event_handler(&self, handler: &SuggestedHandler) -> String;

    /// Byte offset in `source` where a new member of `class_name` goes,
    /// just before the end of the class body.
    fn member_insertion_offset(&self, source: &str, class_name: &str) -> Option<usize>;
}
