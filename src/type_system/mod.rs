//! .NET type index and the control metadata derived from it.

pub mod definitions;
pub mod index;
pub mod metadata;

use std::sync::Arc;

use tracing::info;

pub use definitions::{
    Accessibility, AttributeArgument, CustomAttribute, EventDefinition, FieldDefinition,
    MethodDefinition, ParameterDefinition, PropertyDefinition, TypeDefinition, TypeKind,
};
pub use index::{InMemoryTypeIndex, TypeIndex};
pub use metadata::{
    ChildrenParsing, ControlMetadata, EventDescriptor, MetadataCache, PersistenceMode,
    PropertyDescriptor, ValueKind,
};

/// A loaded index together with the descriptors computed from it.
pub struct TypeSystem {
    index: Arc<dyn TypeIndex>,
    cache: MetadataCache,
}

impl TypeSystem {
    pub fn new(index: Arc<dyn TypeIndex>) -> Self {
        Self { index, cache: MetadataCache::new() }
    }

    /// Type system over the bundled `System.Web` baseline only.
    pub fn bundled() -> Result<Self, crate::errors::TypeIndexError> {
        Ok(Self::new(Arc::new(InMemoryTypeIndex::with_bundled_baseline()?)))
    }

    pub fn index(&self) -> &dyn TypeIndex {
        self.index.as_ref()
    }

    pub fn metadata(&self, ty: &TypeDefinition) -> Arc<ControlMetadata> {
        self.cache.get_or_build(self.index.as_ref(), ty)
    }

    /// Swaps in a new index; descriptors of the old one are dropped.
    pub fn replace_index(&mut self, index: Arc<dyn TypeIndex>) {
        self.index = index;
        self.cache.clear();
        info!("Type index replaced, metadata cache cleared");
    }

    pub fn cached_descriptors(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for TypeSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeSystem")
            .field("cached_descriptors", &self.cache.len())
            .finish_non_exhaustive()
    }
}
