//! Type index loading
//!
//! The index is the bundled `System.Web` baseline (unless disabled), then
//! every configured path, then every `*.typeindex.json` under the workspace
//! root. Later files replace earlier definitions of the same type. A file
//! that fails to load is logged and skipped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::ServerConfig;
use crate::type_system::InMemoryTypeIndex;

use super::state::AspNetBackend;

pub const TYPE_INDEX_SUFFIX: &str = ".typeindex.json";

fn is_type_index_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(TYPE_INDEX_SUFFIX))
}

/// Index files under `root`, in a stable order.
pub fn collect_index_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_type_index_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Builds the index described by `config` plus the files found under `root`.
pub fn build_index(config: &ServerConfig, root: Option<&Path>) -> InMemoryTypeIndex {
    let mut index = if config.use_bundled_index {
        InMemoryTypeIndex::with_bundled_baseline().unwrap_or_else(|e| {
            warn!("Bundled type index failed to load: {}", e);
            InMemoryTypeIndex::new()
        })
    } else {
        InMemoryTypeIndex::new()
    };

    let mut files = Vec::new();
    for path in &config.type_index_paths {
        if path.is_dir() {
            files.extend(collect_index_files(path));
        } else {
            files.push(path.clone());
        }
    }
    if let Some(root) = root {
        for file in collect_index_files(root) {
            if !files.contains(&file) {
                files.push(file);
            }
        }
    }

    for file in files {
        match InMemoryTypeIndex::load(&file) {
            Ok(loaded) => index.merge(loaded),
            Err(e) => warn!("Skipping type index {}: {}", file.display(), e),
        }
    }
    debug!("Type index holds {} types", index.len());
    index
}

impl AspNetBackend {
    /// Rebuilds the type index off the async runtime and swaps it in.
    pub async fn reload_type_index(&self) {
        let config = self.config.read().await.clone();
        let root = self.root_dir.read().await.clone();
        let built = task::spawn_blocking(move || build_index(&config, root.as_deref())).await;
        match built {
            Ok(index) => {
                let count = index.len();
                self.types.write().await.replace_index(Arc::new(index));
                info!("Loaded type index with {} types", count);
            }
            Err(e) => warn!("Type index loading task failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_system::TypeIndex;
    use std::fs;

    const EXTRA: &str = r#"{ "types": [ { "namespace": "Site", "name": "Default", "baseType": "System.Web.UI.Page" } ] }"#;

    #[test]
    fn test_collects_index_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin/meta")).unwrap();
        fs::write(dir.path().join("bin/meta/Site.typeindex.json"), EXTRA).unwrap();
        fs::write(dir.path().join("notes.json"), "{}").unwrap();
        let files = collect_index_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("bin/meta/Site.typeindex.json"));
    }

    #[test]
    fn test_build_index_merges_and_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Site.typeindex.json"), EXTRA).unwrap();
        fs::write(dir.path().join("Broken.typeindex.json"), "{ not json").unwrap();

        let index = build_index(&ServerConfig::default(), Some(dir.path()));
        assert!(index.type_by_full_name("Site.Default").is_some());
        assert!(index.type_by_full_name("System.Web.UI.Page").is_some());

        let config = ServerConfig { use_bundled_index: false, ..ServerConfig::default() };
        let bare = build_index(&config, Some(dir.path()));
        assert_eq!(bare.len(), 1);
    }
}
