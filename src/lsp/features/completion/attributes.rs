//! Attribute-name completions for elements.

use super::entry::{CompletionEntry, EntryKind};
use crate::markup::node::{AttributeSet, TagReference};
use crate::type_system::{Accessibility, ControlMetadata, PersistenceMode};

const RUNAT_SERVER: &str = "runat=\"server\"";

/// Attribute names for an element tag.
///
/// `runat="server"` and `id` come first. Control members follow for prefixed
/// tags: public attribute-persisted properties, then `On<Event>` for public
/// events. Names already present in `existing` are skipped, and each name
/// appears once. All comparisons ignore case.
pub fn assemble_attribute_completions(
    tag: &TagReference,
    metadata: Option<&ControlMetadata>,
    existing: &AttributeSet,
) -> Vec<CompletionEntry> {
    let mut list = Vec::new();

    if !existing.contains("runat") {
        list.push(
            CompletionEntry::new(RUNAT_SERVER, EntryKind::Attribute)
                .with_detail("Required for ASP.NET controls")
                .with_documentation(Some(
                    "Indicates that this tag should be able to be manipulated programmatically on the web server.",
                )),
        );
    }
    if !existing.contains("id") {
        list.push(
            CompletionEntry::new("id", EntryKind::Attribute)
                .with_detail("Unique identifier")
                .with_documentation(Some(
                    "For a server control this is also the field name in the code-behind class.",
                )),
        );
    }

    let Some(metadata) = metadata.filter(|_| tag.has_prefix()) else {
        return list;
    };

    // the `id` entry above stands in for the control's ID property
    let is_taken = |name: &str, list: &[CompletionEntry]| {
        name.eq_ignore_ascii_case("id")
            || existing.contains(name)
            || list.iter().any(|e| e.label.eq_ignore_ascii_case(name))
    };

    for property in &metadata.properties {
        if property.accessibility != Accessibility::Public
            || property.persistence_mode != PersistenceMode::Attribute
            || is_taken(&property.name, &list)
        {
            continue;
        }
        list.push(
            CompletionEntry::new(property.name.clone(), EntryKind::Property)
                .with_detail(property.type_name.clone())
                .with_documentation(property.documentation.clone()),
        );
    }

    for event in &metadata.events {
        let name = format!("On{}", event.name);
        if is_taken(&name, &list) {
            continue;
        }
        list.push(
            CompletionEntry::new(name, EntryKind::Event)
                .with_detail(event.delegate_type.clone())
                .with_documentation(event.documentation.clone()),
        );
    }

    list
}
