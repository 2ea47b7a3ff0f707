//! Markup completion
//!
//! - `context`: classifies the cursor into a completion mode
//! - `resolver`: maps prefixed tags to control types and metadata
//! - `attributes`, `values`, `elements`, `directives`: list assemblers
//! - `engine`: ties the above together for one request

pub mod attributes;
pub mod begin_expressions;
pub mod colors;
pub mod context;
pub mod directives;
pub mod elements;
pub mod engine;
pub mod entry;
pub mod html;
pub mod resolver;
pub mod values;

pub use context::{classify, classify_tracker, CompletionMode};
pub use engine::{complete, signature_help, CompletionServices};
pub use entry::{CompletionEntry, EntryKind, SuggestedHandler, INSERT_EVENT_HANDLER_COMMAND};
pub use resolver::ControlResolver;
