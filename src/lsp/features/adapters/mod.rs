//! Embedded-language completion builders
//!
//! Each `Language` value a page may declare maps to one
//! `LanguageCompletionBuilder`. Lookup is case-insensitive and accepts
//! the builder's aliases.

pub mod code_model;
pub mod csharp;
pub mod vb;

use std::sync::Arc;

use tracing::{debug, trace};

use crate::lsp::features::traits::LanguageCompletionBuilder;

pub use csharp::CSharpCompletionBuilder;
pub use vb::VbCompletionBuilder;

/// Registry of language builders.
///
/// # Example
///
/// ```rust,ignore
/// let registry = BuilderRegistry::with_defaults();
/// let builder = registry.get("vb.net").unwrap();
/// assert_eq!(builder.language_id(), "VB");
/// ```
#[derive(Clone, Default)]
pub struct BuilderRegistry {
    builders: Vec<Arc<dyn LanguageCompletionBuilder>>,
}

impl BuilderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the C# and VB builders.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CSharpCompletionBuilder));
        registry.register(Arc::new(VbCompletionBuilder));
        debug!("Initialized builder registry with {} languages", registry.builders.len());
        registry
    }

    /// Adds a builder. A later builder with the same id replaces the earlier one.
    pub fn register(&mut self, builder: Arc<dyn LanguageCompletionBuilder>) {
        let id = builder.language_id();
        trace!("Registering completion builder: {}", id);
        self.builders.retain(|b| !b.language_id().eq_ignore_ascii_case(id));
        self.builders.push(builder);
    }

    /// Builder for a `Language` attribute value.
    pub fn get(&self, language: &str) -> Option<Arc<dyn LanguageCompletionBuilder>> {
        let language = language.trim();
        self.builders
            .iter()
            .find(|b| {
                b.language_id().eq_ignore_ascii_case(language)
                    || b.aliases().iter().any(|a| a.eq_ignore_ascii_case(language))
            })
            .cloned()
    }

    /// Canonical ids in registration order.
    pub fn languages(&self) -> Vec<&'static str> {
        self.builders.iter().map(|b| b.language_id()).collect()
    }
}

impl std::fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuilderRegistry").field("languages", &self.languages()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id_and_alias() {
        let registry = BuilderRegistry::with_defaults();
        assert_eq!(registry.get("c#").unwrap().language_id(), "C#");
        assert_eq!(registry.get("CSharp").unwrap().language_id(), "C#");
        assert_eq!(registry.get(" vb ").unwrap().language_id(), "VB");
        assert_eq!(registry.get("VisualBasic").unwrap().language_id(), "VB");
        assert!(registry.get("JScript").is_none());
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = BuilderRegistry::with_defaults();
        registry.register(Arc::new(CSharpCompletionBuilder));
        assert_eq!(registry.languages(), vec!["VB", "C#"]);
    }
}
