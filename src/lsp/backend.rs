//! tower-lsp backend for ASP.NET markup.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;
use tower_lsp::Client;
use tower_lsp::lsp_types::Url;

use crate::config::ServerConfig;
use crate::lsp::document::DocumentSnapshot;
use crate::lsp::features::adapters::BuilderRegistry;
use crate::lsp::features::completion::CompletionServices;
use crate::type_system::TypeSystem;

mod commands;
mod handlers;
mod indexing;
mod state;

pub use commands::{handler_insertion, offset_to_position, resolve_code_file};
pub use handlers::{COMPLETION_TRIGGERS, SIGNATURE_TRIGGERS};
pub use indexing::{build_index, collect_index_files, TYPE_INDEX_SUFFIX};
pub use state::AspNetBackend;

impl AspNetBackend {
    /// Creates a backend. `config` holds the command-line defaults that
    /// `initializationOptions` may override; `types` serves requests until
    /// `initialize` loads the configured index.
    pub fn new(
        client: Client,
        config: ServerConfig,
        builders: BuilderRegistry,
        types: TypeSystem,
    ) -> Self {
        Self {
            client,
            documents: Arc::new(DashMap::new()),
            types: Arc::new(RwLock::new(types)),
            config: Arc::new(RwLock::new(config)),
            builders: Arc::new(builders),
            root_dir: Arc::new(RwLock::new(None)),
        }
    }

    /// Current snapshot of an open document.
    pub fn snapshot(&self, uri: &Url) -> Option<Arc<DocumentSnapshot>> {
        self.documents.get(uri).map(|entry| Arc::clone(entry.value()))
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub async fn config(&self) -> ServerConfig {
        self.config.read().await.clone()
    }

    fn services<'a>(
        &'a self,
        types: &'a TypeSystem,
        config: &'a ServerConfig,
    ) -> CompletionServices<'a> {
        CompletionServices { types, builders: &self.builders, config }
    }
}
