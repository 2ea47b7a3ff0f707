//! The class a markup document inherits from, plus its designer fields.

use tracing::debug;

use crate::lsp::features::completion::resolver::{ControlResolver, FALLBACK_CONTROL_TYPE};
use crate::markup::node::MarkupNode;
use crate::markup::page_info::PageInfo;
use crate::type_system::definitions::{MethodDefinition, TypeDefinition};
use crate::type_system::TypeIndex;

const HTML_GENERIC_CONTROL: &str = "System.Web.UI.HtmlControls.HtmlGenericControl";
const HTML_FORM: &str = "System.Web.UI.HtmlControls.HtmlForm";

/// A protected field generated for a `runat="server"` element with an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignerField {
    pub name: String,
    pub type_name: String,
}

/// Designer fields for every server element with an id, in document order.
/// The first element wins when ids repeat.
pub fn designer_fields(root: &MarkupNode, resolver: &ControlResolver<'_>) -> Vec<DesignerField> {
    let mut fields: Vec<DesignerField> = Vec::new();
    root.walk(&mut |node| {
        let Some(tag) = node.as_tag() else {
            return;
        };
        if !tag.is_server_control() {
            return;
        }
        let Some(id) = tag.id() else {
            return;
        };
        if fields.iter().any(|f| f.name.eq_ignore_ascii_case(id)) {
            return;
        }
        let type_name = if tag.name.has_prefix() {
            resolver
                .resolve_type(&tag.name)
                .map(|t| t.full_name())
                .unwrap_or_else(|_| FALLBACK_CONTROL_TYPE.to_string())
        } else if tag.name.name.eq_ignore_ascii_case("form") {
            HTML_FORM.to_string()
        } else {
            HTML_GENERIC_CONTROL.to_string()
        };
        fields.push(DesignerField { name: id.to_string(), type_name });
    });
    fields
}

/// The code-behind class named by `Inherits`, with the fields the designer adds.
#[derive(Debug, Clone)]
pub struct CodeBehind<'a> {
    pub class: &'a TypeDefinition,
    pub designer_fields: Vec<DesignerField>,
}

impl<'a> CodeBehind<'a> {
    /// Looks up the `Inherits` class; `None` when it is absent or unknown.
    pub fn locate(
        index: &'a dyn TypeIndex,
        page_info: &PageInfo,
        root: &MarkupNode,
        resolver: &ControlResolver<'_>,
    ) -> Option<Self> {
        let inherits = page_info.inherits.as_deref()?;
        let Some(class) = index.type_by_full_name(inherits) else {
            debug!("Code-behind class {} is not in the type index", inherits);
            return None;
        };
        Some(Self { class, designer_fields: designer_fields(root, resolver) })
    }

    pub fn class_name(&self) -> String {
        self.class.full_name()
    }

    /// Any member of the class or its bases, or a designer field, uses `name`.
    pub fn has_member(&self, index: &dyn TypeIndex, name: &str) -> bool {
        let in_type = |ty: &TypeDefinition| {
            ty.methods.iter().any(|m| m.name.eq_ignore_ascii_case(name))
                || ty.properties.iter().any(|p| p.name.eq_ignore_ascii_case(name))
                || ty.fields.iter().any(|f| f.name.eq_ignore_ascii_case(name))
                || ty.events.iter().any(|e| e.name.eq_ignore_ascii_case(name))
        };
        in_type(self.class)
            || index.base_types(self.class).into_iter().any(in_type)
            || self.designer_fields.iter().any(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// `base`, or `base` with the smallest numeric suffix (1, 2, ...) not yet used.
    pub fn unique_identifier(&self, index: &dyn TypeIndex, base: &str) -> String {
        if !self.has_member(index, base) {
            return base.to_string();
        }
        (1u32..)
            .map(|n| format!("{}{}", base, n))
            .find(|candidate| !self.has_member(index, candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Methods declared on the class whose signature matches `invoke`.
    pub fn compatible_methods(&self, invoke: &MethodDefinition) -> Vec<&'a MethodDefinition> {
        let expected = invoke.signature();
        self.class
            .methods
            .iter()
            .filter(|m| !m.is_static)
            .filter(|m| m.return_type.eq_ignore_ascii_case(&invoke.return_type))
            .filter(|m| {
                let actual = m.signature();
                actual.len() == expected.len()
                    && actual.iter().zip(&expected).all(|(a, e)| a.eq_ignore_ascii_case(e))
            })
            .collect()
    }
}
