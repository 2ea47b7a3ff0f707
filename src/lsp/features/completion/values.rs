//! Attribute-value completions for control attributes.

use tracing::{debug, warn};

use super::colors::KNOWN_COLORS;
use super::entry::{CompletionEntry, EntryKind, HandlerParameter, SuggestedHandler};
use crate::lsp::features::code_behind::CodeBehind;
use crate::markup::node::TagReference;
use crate::type_system::{ControlMetadata, PersistenceMode, TypeIndex, ValueKind};

/// Values for `attribute_name` on a control tag.
///
/// `On<Event>` with a code-behind class lists compatible methods followed by
/// one suggested handler. Otherwise the property's value kind decides:
/// booleans, named colors or enum members. Properties that are not persisted
/// as attributes get nothing.
///
/// # Arguments
/// * `index` - Type index the code-behind class and delegates come from
/// * `metadata` - Resolved control record for `tag`
/// * `tag` - The element whose attribute is being completed
/// * `attribute_name` - Attribute whose value is being typed
/// * `element_id` - Trimmed `id` of the element, if set
/// * `code_behind` - The document's code-behind class, if it resolves
pub fn assemble_attribute_value_completions(
    index: &dyn TypeIndex,
    metadata: &ControlMetadata,
    tag: &TagReference,
    attribute_name: &str,
    element_id: Option<&str>,
    code_behind: Option<&CodeBehind<'_>>,
) -> Vec<CompletionEntry> {
    if let (Some(code_behind), Some(event_name)) = (code_behind, event_suffix(attribute_name)) {
        if let Some(event) = metadata.event(event_name) {
            return event_handler_completions(
                index,
                code_behind,
                &event.name,
                &event.delegate_type,
                element_id.unwrap_or(&tag.name),
            );
        }
    }

    let Some(property) = metadata.property(attribute_name) else {
        debug!("{} has no property {}", metadata.type_name, attribute_name);
        return Vec::new();
    };
    if property.persistence_mode != PersistenceMode::Attribute {
        return Vec::new();
    }

    match &property.value_kind {
        ValueKind::Boolean => vec![
            CompletionEntry::new("true", EntryKind::Value),
            CompletionEntry::new("false", EntryKind::Value),
        ],
        ValueKind::Color => KNOWN_COLORS
            .iter()
            .map(|color| CompletionEntry::new(color.name, EntryKind::Color).with_detail(color.hex()))
            .collect(),
        ValueKind::Enum { members } => members
            .iter()
            .map(|member| {
                CompletionEntry::new(member.clone(), EntryKind::EnumMember)
                    .with_detail(property.type_name.clone())
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Event name of an `On<Event>` attribute, with the prefix matched in any case.
fn event_suffix(attribute_name: &str) -> Option<&str> {
    attribute_name
        .get(..2)
        .filter(|prefix| prefix.eq_ignore_ascii_case("on"))
        .map(|_| &attribute_name[2..])
}

fn event_handler_completions(
    index: &dyn TypeIndex,
    code_behind: &CodeBehind<'_>,
    event_name: &str,
    delegate_type: &str,
    owner_name: &str,
) -> Vec<CompletionEntry> {
    let Some(invoke) = index.type_by_full_name(delegate_type).and_then(|d| d.invoke_method()) else {
        warn!("Delegate {} of event {} has no Invoke signature", delegate_type, event_name);
        return Vec::new();
    };

    let mut list: Vec<CompletionEntry> = code_behind
        .compatible_methods(invoke)
        .into_iter()
        .map(|method| {
            CompletionEntry::new(method.name.clone(), EntryKind::Method)
                .with_detail("A compatible method in the CodeBehind class")
        })
        .collect();

    let handler_name =
        code_behind.unique_identifier(index, &format!("{}_{}", owner_name, event_name));
    let handler = SuggestedHandler {
        handler_name: handler_name.clone(),
        event_name: event_name.to_string(),
        delegate_type: delegate_type.to_string(),
        parameters: invoke
            .parameters
            .iter()
            .map(|p| HandlerParameter { name: p.name.clone(), type_name: p.type_name.clone() })
            .collect(),
        class_name: code_behind.class_name(),
        document_uri: None,
    };
    list.push(
        CompletionEntry::new(handler_name, EntryKind::SuggestedHandler)
            .with_detail("Create a new event handler in the CodeBehind class")
            .with_handler(handler),
    );
    list
}
