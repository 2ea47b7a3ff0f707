//! Child-element completions.
//!
//! What may appear inside an element depends on the nearest control: either
//! the parent itself, or for a property element like `<ItemTemplate>`, the
//! grandparent. The control's children parsing mode and the persistence mode
//! of the targeted property pick the list.

use tracing::debug;

use super::begin_expressions::add_begin_expressions;
use super::entry::{CompletionEntry, EntryKind};
use super::html::{add_html_elements, add_misc_begin_tags};
use super::resolver::{ControlResolver, RegisteredControl};
use crate::config::ClrVersion;
use crate::markup::node::TagReference;
use crate::markup::page_info::{DocumentKind, PageInfo, ASP_PREFIX};
use crate::type_system::metadata::CONTROL_TYPE;
use crate::type_system::{PersistenceMode, ValueKind};

/// Where an element is being started.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementScope<'a> {
    /// Innermost open element; `None` at the document root.
    pub parent: Option<&'a TagReference>,
    pub grandparent: Option<&'a TagReference>,
}

fn add_controls(list: &mut Vec<CompletionEntry>, controls: Vec<RegisteredControl<'_>>) {
    list.extend(controls.into_iter().map(|control| {
        let entry = CompletionEntry::new(control.tag_name(), EntryKind::Element);
        match control.ty {
            Some(ty) => entry
                .with_detail(ty.full_name())
                .with_documentation(ty.documentation.clone()),
            None => entry.with_detail("User control"),
        }
    }));
}

/// Element names that may be started at `scope`.
///
/// # Arguments
/// * `resolver` - Control lookup for the document's registrations
/// * `page_info` - Facts about the document; `None` when there is no parsed document
/// * `scope` - Enclosing elements at the cursor
/// * `clr_version` - Target runtime, gates the begin-expression forms
pub fn assemble_element_completions(
    resolver: &ControlResolver<'_>,
    page_info: Option<&PageInfo>,
    scope: ElementScope<'_>,
    clr_version: ClrVersion,
) -> Vec<CompletionEntry> {
    let mut list = Vec::new();
    let parent = scope.parent;
    let parent_name = parent.map(|p| p.name.as_str());

    let Some(page_info) = page_info else {
        add_begin_expressions(&mut list, clr_version);
        let system_controls = resolver
            .registered_controls(Some(CONTROL_TYPE))
            .into_iter()
            .filter(|c| c.prefix.eq_ignore_ascii_case(ASP_PREFIX))
            .collect();
        add_controls(&mut list, system_controls);
        add_html_elements(&mut list, parent_name);
        return list;
    };

    let control_tag = match parent {
        Some(p) if p.has_prefix() => Some(p),
        _ => scope.grandparent.filter(|g| g.is_valid() && g.has_prefix()),
    };
    let control_type = control_tag.and_then(|tag| resolver.resolve_type(tag).ok());

    let Some(control_type) = control_type else {
        match parent {
            None if page_info.kind == DocumentKind::Control => {
                add_html_elements(&mut list, Some("div"));
                add_begin_expressions(&mut list, clr_version);
                add_controls(&mut list, resolver.registered_controls(None));
                add_misc_begin_tags(&mut list);
            }
            None if page_info.is_content_page() => {
                list.push(
                    CompletionEntry::new("asp:Content", EntryKind::Element)
                        .with_detail("System.Web.UI.WebControls.Content"),
                );
            }
            None => {}
            Some(_) => {
                add_begin_expressions(&mut list, clr_version);
                add_controls(&mut list, resolver.registered_controls(None));
                add_html_elements(&mut list, parent_name);
            }
        }
        return list;
    };

    let metadata = resolver.types().metadata(control_type);
    if let Err(e) = &metadata.children {
        debug!("{}; treating children of {} as controls", e, metadata.type_name);
    }

    if !metadata.children_as_properties() {
        add_begin_expressions(&mut list, clr_version);
        add_controls(&mut list, resolver.registered_controls(None));
        add_misc_begin_tags(&mut list);
        add_html_elements(&mut list, Some("body"));
        return list;
    }

    let parent_has_prefix = parent.is_some_and(TagReference::has_prefix);
    let default_property = metadata.default_property();

    if !parent_has_prefix || default_property.is_some() {
        let property = match default_property {
            Some(property) => Some(property),
            None => parent_name.and_then(|name| metadata.property(name)),
        };
        let Some(property) = property else {
            return list;
        };

        match property.persistence_mode {
            PersistenceMode::Attribute | PersistenceMode::EncodedInnerDefaultProperty => return list,
            PersistenceMode::InnerDefaultProperty if !parent_has_prefix => return list,
            PersistenceMode::InnerProperty if parent_has_prefix => return list,
            _ => {}
        }

        match &property.value_kind {
            ValueKind::Template => {
                add_begin_expressions(&mut list, clr_version);
                add_misc_begin_tags(&mut list);
                add_html_elements(&mut list, Some("body"));
                add_controls(&mut list, resolver.registered_controls(None));
            }
            ValueKind::Collection { item_type } => {
                let index = resolver.types().index();
                let item_is_control = index
                    .type_by_full_name(item_type)
                    .is_some_and(|t| index.is_subclass_of(t, CONTROL_TYPE));
                if item_is_control {
                    add_controls(&mut list, resolver.registered_controls(Some(item_type)));
                } else {
                    add_controls(&mut list, resolver.registered_controls(None));
                }
            }
            _ => add_controls(&mut list, resolver.registered_controls(None)),
        }
        return list;
    }

    for property in &metadata.properties {
        if property.persistence_mode != PersistenceMode::Attribute {
            list.push(
                CompletionEntry::new(property.name.clone(), EntryKind::Property)
                    .with_detail(property.type_name.clone())
                    .with_documentation(property.documentation.clone()),
            );
        }
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsp::features::completion::entry::labels;
    use crate::markup::page_info::TagRegistrations;
    use crate::type_system::TypeSystem;

    fn complete(kind: DocumentKind, master: bool, parent: Option<&str>, grandparent: Option<&str>) -> Vec<String> {
        let types = TypeSystem::bundled().unwrap();
        let registrations = TagRegistrations::default();
        let resolver = ControlResolver::new(&types, &registrations);
        let mut page_info = PageInfo::new(kind);
        if master {
            page_info.master_page_file = Some("~/Site.master".to_string());
        }
        let parent = parent.map(TagReference::parse);
        let grandparent = grandparent.map(TagReference::parse);
        let scope = ElementScope { parent: parent.as_ref(), grandparent: grandparent.as_ref() };
        let list = assemble_element_completions(&resolver, Some(&page_info), scope, ClrVersion::Net4_0);
        labels(&list).into_iter().map(str::to_string).collect()
    }

    #[test]
    fn test_content_page_root_offers_content() {
        assert_eq!(complete(DocumentKind::Page, true, None, None), vec!["asp:Content"]);
        assert!(complete(DocumentKind::Page, false, None, None).is_empty());
    }

    #[test]
    fn test_user_control_root_offers_markup_and_controls() {
        let labels = complete(DocumentKind::Control, false, None, None);
        assert!(labels.contains(&"div".to_string()));
        assert!(labels.contains(&"%@".to_string()));
        assert!(labels.contains(&"asp:Button".to_string()));
        assert!(labels.contains(&"!--".to_string()));
    }

    #[test]
    fn test_control_with_child_controls() {
        let labels = complete(DocumentKind::Page, false, Some("asp:Panel"), None);
        assert!(labels.contains(&"asp:TextBox".to_string()));
        assert!(labels.contains(&"![CDATA[".to_string()));
        assert!(labels.contains(&"span".to_string()));
    }

    #[test]
    fn test_children_as_properties_offers_inner_properties() {
        let labels = complete(DocumentKind::Page, false, Some("asp:Repeater"), None);
        assert!(labels.contains(&"ItemTemplate".to_string()));
        assert!(!labels.contains(&"DataSourceID".to_string()));
    }

    #[test]
    fn test_template_property_allows_free_content() {
        let labels = complete(DocumentKind::Page, false, Some("ItemTemplate"), Some("asp:Repeater"));
        assert!(labels.contains(&"asp:Label".to_string()));
        assert!(labels.contains(&"div".to_string()));
    }

    #[test]
    fn test_default_collection_property_filters_item_type() {
        let labels = complete(DocumentKind::Page, false, Some("asp:Table"), None);
        assert_eq!(labels, vec!["asp:TableRow"]);
    }

    #[test]
    fn test_attribute_property_element_offers_nothing() {
        assert!(complete(DocumentKind::Page, false, Some("DataSourceID"), Some("asp:Repeater")).is_empty());
    }

    #[test]
    fn test_without_document() {
        let types = TypeSystem::bundled().unwrap();
        let registrations = TagRegistrations::default();
        let resolver = ControlResolver::new(&types, &registrations);
        let list = assemble_element_completions(&resolver, None, ElementScope::default(), ClrVersion::Net1_1);
        let labels = labels(&list);
        assert!(labels.contains(&"asp:Button"));
        assert!(labels.contains(&"html"));
        assert!(!labels.contains(&"%:"));
    }
}
