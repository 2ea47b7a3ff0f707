//! Indexing pass: raw type definitions to typed control descriptors.
//!
//! Attribute-based metadata (persistence mode, children parsing) is read once
//! per type here, so completion never inspects custom attributes directly.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use super::definitions::{
    Accessibility, AttributeArgument, CustomAttribute, PropertyDefinition, TypeDefinition, TypeKind,
};
use super::index::TypeIndex;
use crate::errors::CompletionError;

pub const PERSISTENCE_MODE_ATTRIBUTE: &str = "System.Web.UI.PersistenceModeAttribute";
pub const TEMPLATE_CONTAINER_ATTRIBUTE: &str = "System.Web.UI.TemplateContainerAttribute";
pub const PARSE_CHILDREN_ATTRIBUTE: &str = "System.Web.UI.ParseChildrenAttribute";

pub const BOOLEAN_TYPE: &str = "System.Boolean";
pub const COLOR_TYPE: &str = "System.Drawing.Color";
pub const TEMPLATE_TYPE: &str = "System.Web.UI.ITemplate";
pub const CONTROL_TYPE: &str = "System.Web.UI.Control";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersistenceMode {
    Attribute,
    InnerProperty,
    InnerDefaultProperty,
    EncodedInnerDefaultProperty,
}

impl PersistenceMode {
    fn from_argument(argument: &AttributeArgument) -> Option<Self> {
        if let AttributeArgument::Int(value) = argument {
            return match value {
                0 => Some(Self::Attribute),
                1 => Some(Self::InnerProperty),
                2 => Some(Self::InnerDefaultProperty),
                3 => Some(Self::EncodedInnerDefaultProperty),
                _ => None,
            };
        }
        match argument.enum_member()? {
            "Attribute" => Some(Self::Attribute),
            "InnerProperty" => Some(Self::InnerProperty),
            "InnerDefaultProperty" => Some(Self::InnerDefaultProperty),
            "EncodedInnerDefaultProperty" => Some(Self::EncodedInnerDefaultProperty),
            _ => None,
        }
    }
}

/// What kind of values an attribute of this property accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Boolean,
    Color,
    Enum { members: Vec<String> },
    Template,
    /// A type with a single-argument `Add` method.
    Collection { item_type: String },
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub type_name: String,
    pub persistence_mode: PersistenceMode,
    pub value_kind: ValueKind,
    pub accessibility: Accessibility,
    pub documentation: Option<String>,
    pub declaring_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    pub name: String,
    pub delegate_type: String,
    pub documentation: Option<String>,
    pub declaring_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildrenParsing {
    pub children_as_properties: bool,
    pub default_property: Option<String>,
}

/// Resolved control record: members most-derived-first, one entry per name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMetadata {
    pub type_name: String,
    pub properties: Vec<PropertyDescriptor>,
    pub events: Vec<EventDescriptor>,
    pub children: Result<ChildrenParsing, CompletionError>,
}

impl ControlMetadata {
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn event(&self, name: &str) -> Option<&EventDescriptor> {
        self.events.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Children parse as properties. Unsupported configurations count as no.
    pub fn children_as_properties(&self) -> bool {
        self.children.as_ref().map(|c| c.children_as_properties).unwrap_or(false)
    }

    pub fn default_property(&self) -> Option<&PropertyDescriptor> {
        let name = self.children.as_ref().ok()?.default_property.as_deref()?;
        self.property(name)
    }
}

/// Persistence mode of a property.
///
/// An explicit `PersistenceModeAttribute` wins; a missing or unreadable
/// argument logs a warning and yields `Attribute`. Otherwise a
/// `TemplateContainerAttribute` implies `InnerProperty`.
pub fn persistence_mode(property: &PropertyDefinition) -> PersistenceMode {
    let find = |name: &str| property.attributes.iter().find(|a| a.is(name));

    if let Some(attribute) = find(PERSISTENCE_MODE_ATTRIBUTE) {
        return match attribute.positional.first().and_then(PersistenceMode::from_argument) {
            Some(mode) => mode,
            None => {
                warn!(
                    "PersistenceModeAttribute on {} has no readable argument",
                    property.name
                );
                PersistenceMode::Attribute
            }
        };
    }
    if find(TEMPLATE_CONTAINER_ATTRIBUTE).is_some() {
        return PersistenceMode::InnerProperty;
    }
    PersistenceMode::Attribute
}

fn parse_children_arguments(attribute: &CustomAttribute) -> Result<ChildrenParsing, CompletionError> {
    let mut parsing = ChildrenParsing::default();

    match attribute.positional.first() {
        Some(AttributeArgument::Bool(value)) => parsing.children_as_properties = *value,
        Some(AttributeArgument::Type(name)) => {
            return Err(CompletionError::UnsupportedFeature(format!(
                "ParseChildrenAttribute with child control type {}",
                name
            )));
        }
        _ => {}
    }
    if let Some(AttributeArgument::String(name)) = attribute.positional.get(1) {
        parsing.default_property = Some(name.clone());
    }

    if attribute.named("ChildControlType").is_some() {
        return Err(CompletionError::UnsupportedFeature(
            "ParseChildrenAttribute.ChildControlType".to_string(),
        ));
    }
    if let Some(value) = attribute.named("ChildrenAsProperties").and_then(|a| a.as_bool()) {
        parsing.children_as_properties = value;
    }
    if let Some(name) = attribute.named("DefaultProperty").and_then(|a| a.as_str()) {
        parsing.default_property = Some(name.to_string());
    }
    Ok(parsing)
}

/// Children parsing from `ParseChildrenAttribute` on `ty` or its nearest base
/// carrying one. Without the attribute, children are controls.
pub fn children_as_properties(
    index: &dyn TypeIndex,
    ty: &TypeDefinition,
) -> Result<ChildrenParsing, CompletionError> {
    let chain = std::iter::once(ty).chain(index.base_types(ty));
    for candidate in chain {
        if let Some(attribute) = candidate.attribute(PARSE_CHILDREN_ATTRIBUTE) {
            let result = parse_children_arguments(attribute);
            if let Err(e) = &result {
                warn!("{} on {}", e, candidate.full_name());
            }
            return result;
        }
    }
    Ok(ChildrenParsing::default())
}

/// Value kind of a declared type name.
pub fn value_kind(index: &dyn TypeIndex, type_name: &str) -> ValueKind {
    if type_name.eq_ignore_ascii_case(BOOLEAN_TYPE) {
        return ValueKind::Boolean;
    }
    if type_name.eq_ignore_ascii_case(COLOR_TYPE) {
        return ValueKind::Color;
    }
    if type_name.eq_ignore_ascii_case(TEMPLATE_TYPE) {
        return ValueKind::Template;
    }
    let Some(ty) = index.type_by_full_name(type_name) else {
        return ValueKind::Other;
    };
    if ty.kind == TypeKind::Enum {
        return ValueKind::Enum {
            members: ty.enum_members().into_iter().map(str::to_string).collect(),
        };
    }
    let add = std::iter::once(ty)
        .chain(index.base_types(ty))
        .flat_map(|t| t.methods_named("Add"))
        .find(|m| m.parameters.len() == 1);
    match add {
        Some(method) => ValueKind::Collection { item_type: method.parameters[0].type_name.clone() },
        None => ValueKind::Other,
    }
}

/// Builds the metadata record for a control type.
pub fn build_control_metadata(index: &dyn TypeIndex, ty: &TypeDefinition) -> ControlMetadata {
    let mut properties: Vec<PropertyDescriptor> = Vec::new();
    let mut events: Vec<EventDescriptor> = Vec::new();

    let chain = std::iter::once(ty).chain(index.base_types(ty));
    for declaring in chain {
        let declaring_name = declaring.full_name();
        for property in declaring.properties.iter().filter(|p| !p.is_static) {
            if properties.iter().any(|p| p.name.eq_ignore_ascii_case(&property.name)) {
                continue;
            }
            properties.push(PropertyDescriptor {
                name: property.name.clone(),
                type_name: property.type_name.clone(),
                persistence_mode: persistence_mode(property),
                value_kind: value_kind(index, &property.type_name),
                accessibility: property.accessibility,
                documentation: property.documentation.clone(),
                declaring_type: declaring_name.clone(),
            });
        }
        for event in &declaring.events {
            if events.iter().any(|e| e.name.eq_ignore_ascii_case(&event.name)) {
                continue;
            }
            if event.accessibility != Accessibility::Public {
                continue;
            }
            events.push(EventDescriptor {
                name: event.name.clone(),
                delegate_type: event.delegate_type.clone(),
                documentation: event.documentation.clone(),
                declaring_type: declaring_name.clone(),
            });
        }
    }

    debug!(
        "Indexed {}: {} properties, {} events",
        ty.full_name(),
        properties.len(),
        events.len()
    );

    ControlMetadata {
        type_name: ty.full_name(),
        properties,
        events,
        children: children_as_properties(index, ty),
    }
}

/// Per-type descriptor cache, valid for one loaded index.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: DashMap<String, Arc<ControlMetadata>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&self, index: &dyn TypeIndex, ty: &TypeDefinition) -> Arc<ControlMetadata> {
        let key = ty.full_name().to_ascii_lowercase();
        if let Some(entry) = self.entries.get(&key) {
            return Arc::clone(entry.value());
        }
        let metadata = Arc::new(build_control_metadata(index, ty));
        self.entries.insert(key, Arc::clone(&metadata));
        metadata
    }

    /// Drops every descriptor; called when the index is replaced.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
