//! Backend state
//!
//! Open documents are immutable snapshots keyed by URI. A request clones the
//! `Arc` of the snapshot it needs and never holds a map guard across an
//! await point.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;
use tower_lsp::Client;
use tower_lsp::lsp_types::Url;

use crate::config::ServerConfig;
use crate::lsp::document::DocumentSnapshot;
use crate::lsp::features::adapters::BuilderRegistry;
use crate::type_system::TypeSystem;

/// The ASP.NET markup language server backend.
#[derive(Clone)]
pub struct AspNetBackend {
    pub(super) client: Client,
    pub(super) documents: Arc<DashMap<Url, Arc<DocumentSnapshot>>>,
    pub(super) types: Arc<RwLock<TypeSystem>>,
    pub(super) config: Arc<RwLock<ServerConfig>>,
    pub(super) builders: Arc<BuilderRegistry>,
    pub(super) root_dir: Arc<RwLock<Option<PathBuf>>>,
}

impl std::fmt::Debug for AspNetBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AspNetBackend")
            .field("documents", &self.documents.len())
            .field("builders", &self.builders)
            .finish()
    }
}
