//! Completion, signature help and outline features
//!
//! - `completion`: markup completion and its dispatch
//! - `adapters`: embedded-language builders (C#, VB) and their registry
//! - `traits`: the contract those builders implement
//! - `code_behind`: the page's code-behind class and designer fields
//! - `document_symbols`: the document outline

pub mod adapters;
pub mod code_behind;
pub mod completion;
pub mod document_symbols;
pub mod traits;

pub use adapters::BuilderRegistry;
pub use traits::LanguageCompletionBuilder;
