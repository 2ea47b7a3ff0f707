//! Type index service: lookup of .NET type definitions by name.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use super::definitions::{TypeDefinition, TypeIndexFile};
use crate::errors::TypeIndexError;

/// Bundled `System.Web` baseline shipped with the server.
const BUNDLED_SYSTEM_WEB: &str = include_str!("../../resources/system_web.typeindex.json");

/// Guard against cyclic base-type chains in hand-written index files.
const MAX_INHERITANCE_DEPTH: usize = 64;

/// Read access to type definitions. Name lookups are case-insensitive.
pub trait TypeIndex: Send + Sync {
    fn type_by_full_name(&self, full_name: &str) -> Option<&TypeDefinition>;

    fn types(&self) -> Box<dyn Iterator<Item = &TypeDefinition> + '_>;

    fn type_definition(&self, namespace: &str, name: &str) -> Option<&TypeDefinition> {
        if namespace.is_empty() {
            self.type_by_full_name(name)
        } else {
            self.type_by_full_name(&format!("{}.{}", namespace, name))
        }
    }

    fn types_in_namespace<'a>(&'a self, namespace: &str) -> Vec<&'a TypeDefinition> {
        self.types()
            .filter(|t| t.namespace.eq_ignore_ascii_case(namespace))
            .collect()
    }

    /// Base types of `ty`, nearest first. `ty` itself is not included.
    fn base_types<'a>(&'a self, ty: &'a TypeDefinition) -> Vec<&'a TypeDefinition> {
        let mut chain = Vec::new();
        let mut current = ty;
        while let Some(base) = current.base_type.as_deref() {
            if chain.len() >= MAX_INHERITANCE_DEPTH {
                break;
            }
            match self.type_by_full_name(base) {
                Some(next) => {
                    chain.push(next);
                    current = next;
                }
                None => break,
            }
        }
        chain
    }

    /// `ty` itself or one of its bases is named `base_full_name`.
    fn is_subclass_of(&self, ty: &TypeDefinition, base_full_name: &str) -> bool {
        ty.full_name().eq_ignore_ascii_case(base_full_name)
            || self
                .base_types(ty)
                .iter()
                .any(|b| b.full_name().eq_ignore_ascii_case(base_full_name))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTypeIndex {
    types: Vec<TypeDefinition>,
    by_name: HashMap<String, usize>,
}

impl InMemoryTypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, TypeIndexError> {
        let file: TypeIndexFile = serde_json::from_str(json)?;
        let mut index = Self::new();
        for ty in file.types {
            index.add(ty);
        }
        Ok(index)
    }

    pub fn load(path: &Path) -> Result<Self, TypeIndexError> {
        let json = std::fs::read_to_string(path).map_err(|source| TypeIndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let index = Self::from_json_str(&json)?;
        info!("Loaded {} types from {}", index.len(), path.display());
        Ok(index)
    }

    /// The `System.Web` baseline bundled into the binary.
    pub fn with_bundled_baseline() -> Result<Self, TypeIndexError> {
        Self::from_json_str(BUNDLED_SYSTEM_WEB)
    }

    /// Adds or replaces a type. A later definition of the same name wins.
    pub fn add(&mut self, ty: TypeDefinition) {
        let key = ty.full_name().to_ascii_lowercase();
        match self.by_name.get(&key) {
            Some(&slot) => {
                debug!("Replacing type definition {}", ty.full_name());
                self.types[slot] = ty;
            }
            None => {
                self.by_name.insert(key, self.types.len());
                self.types.push(ty);
            }
        }
    }

    pub fn merge(&mut self, other: InMemoryTypeIndex) {
        for ty in other.types {
            self.add(ty);
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeIndex for InMemoryTypeIndex {
    fn type_by_full_name(&self, full_name: &str) -> Option<&TypeDefinition> {
        self.by_name
            .get(&full_name.to_ascii_lowercase())
            .and_then(|&slot| self.types.get(slot))
    }

    fn types(&self) -> Box<dyn Iterator<Item = &TypeDefinition> + '_> {
        Box::new(self.types.iter())
    }
}
