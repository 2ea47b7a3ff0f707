//! Raw type records as stored in a type index file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const VOID_TYPE: &str = "System.Void";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Enum,
    Struct,
    Interface,
    Delegate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Accessibility {
    #[default]
    Public,
    Protected,
    ProtectedInternal,
    Internal,
    Private,
}

impl Accessibility {
    /// Visible to a class deriving from the declaring type.
    pub fn is_inheritable(&self) -> bool {
        matches!(
            self,
            Accessibility::Public | Accessibility::Protected | Accessibility::ProtectedInternal
        )
    }
}

/// Argument of a custom attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeArgument {
    Bool(bool),
    String(String),
    Int(i64),
    /// Enum member, optionally qualified (`PersistenceMode.InnerProperty`).
    Enum(String),
    /// A `typeof(...)` argument.
    Type(String),
    Null,
}

impl AttributeArgument {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeArgument::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeArgument::String(s) => Some(s),
            _ => None,
        }
    }

    /// Unqualified enum member name.
    pub fn enum_member(&self) -> Option<&str> {
        match self {
            AttributeArgument::Enum(value) | AttributeArgument::String(value) => {
                Some(value.rsplit('.').next().unwrap_or(value))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomAttribute {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub positional: Vec<AttributeArgument>,
    #[serde(default)]
    pub named: BTreeMap<String, AttributeArgument>,
}

impl CustomAttribute {
    /// Matches a full attribute type name, with or without the `Attribute` suffix.
    pub fn is(&self, full_name: &str) -> bool {
        let trimmed = |s: &str| s.strip_suffix("Attribute").unwrap_or(s).to_ascii_lowercase();
        trimmed(&self.type_name) == trimmed(full_name)
    }

    pub fn named(&self, name: &str) -> Option<&AttributeArgument> {
        self.named
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub attributes: Vec<CustomAttribute>,
    #[serde(default)]
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinition {
    pub name: String,
    pub delegate_type: String,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDefinition {
    pub name: String,
    #[serde(default = "void_type")]
    pub return_type: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub documentation: Option<String>,
}

fn void_type() -> String {
    VOID_TYPE.to_string()
}

impl MethodDefinition {
    /// Parameter types in order.
    pub fn signature(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.type_name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefinition {
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub base_type: Option<String>,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub attributes: Vec<CustomAttribute>,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
    #[serde(default)]
    pub events: Vec<EventDefinition>,
    #[serde(default)]
    pub methods: Vec<MethodDefinition>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub documentation: Option<String>,
}

impl TypeDefinition {
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    pub fn attribute(&self, full_name: &str) -> Option<&CustomAttribute> {
        self.attributes.iter().find(|a| a.is(full_name))
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodDefinition> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// The `Invoke` method of a delegate type.
    pub fn invoke_method(&self) -> Option<&MethodDefinition> {
        match self.kind {
            TypeKind::Delegate => self.methods_named("Invoke").next(),
            _ => None,
        }
    }

    /// Public static members of an enum, in declaration order.
    pub fn enum_members(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_static && f.accessibility == Accessibility::Public)
            .map(|f| f.name.as_str())
            .collect()
    }
}

/// Top-level shape of a `*.typeindex.json` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeIndexFile {
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_type_with_attribute_arguments() {
        let json = r#"{
            "namespace": "System.Web.UI.WebControls",
            "name": "DropDownList",
            "baseType": "System.Web.UI.WebControls.ListControl",
            "attributes": [
                { "type": "System.Web.UI.ParseChildrenAttribute",
                  "positional": [ { "bool": true } ],
                  "named": { "DefaultProperty": { "string": "Items" } } }
            ],
            "properties": [ { "name": "Items", "type": "System.Web.UI.WebControls.ListItemCollection",
                "attributes": [ { "type": "System.Web.UI.PersistenceModeAttribute",
                                  "positional": [ { "enum": "PersistenceMode.InnerDefaultProperty" } ] } ] } ]
        }"#;
        let ty: TypeDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(ty.full_name(), "System.Web.UI.WebControls.DropDownList");
        assert_eq!(ty.kind, TypeKind::Class);

        let parse_children = ty.attribute("System.Web.UI.ParseChildren").unwrap();
        assert_eq!(parse_children.positional[0].as_bool(), Some(true));
        assert_eq!(parse_children.named("defaultproperty").and_then(|a| a.as_str()), Some("Items"));

        let mode = &ty.properties[0].attributes[0].positional[0];
        assert_eq!(mode.enum_member(), Some("InnerDefaultProperty"));
        assert_eq!(ty.properties[0].accessibility, Accessibility::Public);
    }

    #[test]
    fn test_null_argument() {
        let arg: AttributeArgument = serde_json::from_str("\"null\"").unwrap();
        assert_eq!(arg, AttributeArgument::Null);
    }
}
