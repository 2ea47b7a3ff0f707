//! Control-metadata resolver: tag names to control types.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::CompletionError;
use crate::markup::node::TagReference;
use crate::markup::page_info::TagRegistrations;
use crate::type_system::metadata::CONTROL_TYPE;
use crate::type_system::{ControlMetadata, TypeDefinition, TypeSystem};

/// Members offered for tags whose control type cannot be found.
pub const FALLBACK_CONTROL_TYPE: &str = "System.Web.UI.WebControls.WebControl";
pub const USER_CONTROL_TYPE: &str = "System.Web.UI.UserControl";

/// A control tag that may be offered as an element name.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredControl<'a> {
    pub prefix: &'a str,
    pub name: String,
    pub ty: Option<&'a TypeDefinition>,
}

impl RegisteredControl<'_> {
    pub fn tag_name(&self) -> String {
        format!("{}:{}", self.prefix, self.name)
    }
}

pub struct ControlResolver<'a> {
    types: &'a TypeSystem,
    registrations: &'a TagRegistrations,
}

impl<'a> ControlResolver<'a> {
    pub fn new(types: &'a TypeSystem, registrations: &'a TagRegistrations) -> Self {
        Self { types, registrations }
    }

    pub fn types(&self) -> &'a TypeSystem {
        self.types
    }

    /// Control type registered for a prefixed tag.
    pub fn resolve_type(&self, tag: &TagReference) -> Result<&'a TypeDefinition, CompletionError> {
        let not_found = || CompletionError::NotFound(tag.to_string());
        let prefix = tag.prefix.as_deref().ok_or_else(not_found)?;
        let index = self.types.index();

        if let Some(user_control) = self.registrations.user_control(prefix, &tag.name) {
            let class_name = user_control.class_name();
            let by_stem = index
                .types()
                .find(|t| t.name.eq_ignore_ascii_case(class_name))
                .filter(|t| index.is_subclass_of(t, CONTROL_TYPE));
            return by_stem
                .or_else(|| index.type_by_full_name(USER_CONTROL_TYPE))
                .ok_or_else(not_found);
        }

        self.registrations
            .namespaces_for(prefix)
            .find_map(|namespace| index.type_definition(namespace, &tag.name))
            .ok_or_else(not_found)
    }

    /// Metadata for a prefixed tag; `NotFound` when no control type is registered.
    pub fn resolve(&self, tag: &TagReference) -> Result<Arc<ControlMetadata>, CompletionError> {
        let ty = self.resolve_type(tag)?;
        Ok(self.types.metadata(ty))
    }

    /// Metadata for a tag, falling back to the generic web control.
    pub fn resolve_or_fallback(&self, tag: &TagReference) -> Option<Arc<ControlMetadata>> {
        match self.resolve(tag) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                debug!("{}; using {}", e, FALLBACK_CONTROL_TYPE);
                self.fallback()
            }
        }
    }

    pub fn fallback(&self) -> Option<Arc<ControlMetadata>> {
        match self.types.index().type_by_full_name(FALLBACK_CONTROL_TYPE) {
            Some(ty) => Some(self.types.metadata(ty)),
            None => {
                warn!("Type index has no {}", FALLBACK_CONTROL_TYPE);
                None
            }
        }
    }

    /// Concrete control types reachable through registered prefixes.
    ///
    /// With `base`, only controls deriving from that type are listed.
    pub fn registered_controls(&self, base: Option<&str>) -> Vec<RegisteredControl<'a>> {
        let index = self.types.index();
        let required = base.unwrap_or(CONTROL_TYPE);
        let mut controls = Vec::new();

        for registration in self.registrations.namespaces() {
            for ty in index.types_in_namespace(&registration.namespace) {
                if ty.is_abstract || !index.is_subclass_of(ty, required) {
                    continue;
                }
                controls.push(RegisteredControl {
                    prefix: registration.prefix.as_str(),
                    name: ty.name.clone(),
                    ty: Some(ty),
                });
            }
        }

        if base.is_none() {
            for user_control in self.registrations.user_controls() {
                controls.push(RegisteredControl {
                    prefix: user_control.prefix.as_str(),
                    name: user_control.name.clone(),
                    ty: None,
                });
            }
        }
        controls
    }
}
