//! Completion dispatch
//!
//! Runs the markup tracker up to the cursor, classifies the state and hands
//! the request to the matching assembler or to the page language's
//! sub-builder.

use tower_lsp::lsp_types::{Position, SignatureHelp};
use tracing::{debug, trace};

use super::attributes::assemble_attribute_completions;
use super::begin_expressions::add_begin_expressions;
use super::context::{classify_tracker, CompletionMode};
use super::directives::{directive_attribute_values, directive_attributes, directive_names};
use super::elements::{assemble_element_completions, ElementScope};
use super::entry::{CompletionEntry, EntryKind};
use super::resolver::ControlResolver;
use super::values::assemble_attribute_value_completions;
use crate::config::ServerConfig;
use crate::errors::DocumentError;
use crate::lsp::document::DocumentSnapshot;
use crate::lsp::features::adapters::BuilderRegistry;
use crate::lsp::features::code_behind::CodeBehind;
use crate::markup::node::{ExpressionKind, TagReference};
use crate::markup::tracker::{AttributeOwner, MarkupTracker, PendingNode};
use crate::type_system::TypeSystem;

/// Shared services a completion request reads from.
#[derive(Clone, Copy)]
pub struct CompletionServices<'a> {
    pub types: &'a TypeSystem,
    pub builders: &'a BuilderRegistry,
    pub config: &'a ServerConfig,
}

/// Completion entries at `position` of `snapshot`.
///
/// # Arguments
/// * `snapshot` - Document version the request is answered from
/// * `position` - LSP cursor position
/// * `trigger` - Trigger character reported by the client, if any
/// * `services` - Type system, builders and configuration
///
/// # Returns
/// An empty list when nothing applies; `DocumentError` only for positions
/// outside the document.
pub fn complete(
    snapshot: &DocumentSnapshot,
    position: Position,
    trigger: Option<char>,
    services: CompletionServices<'_>,
) -> Result<Vec<CompletionEntry>, DocumentError> {
    let text = snapshot.text();
    let offset = snapshot.byte_offset(position)?;
    let tracker = MarkupTracker::track_to(&text, offset);
    let mode = classify_tracker(&tracker);
    let resolver = ControlResolver::new(services.types, &snapshot.registrations);

    let entries = match mode {
        CompletionMode::DirectiveName => directive_names(snapshot.page_info.kind),
        CompletionMode::BeginExpression => {
            let mut list = Vec::new();
            add_begin_expressions(&mut list, services.config.clr_version);
            list
        }
        CompletionMode::ElementName => {
            let scope = ElementScope {
                parent: tracker.parent_element(0).map(|e| &e.name),
                grandparent: tracker.parent_element(1).map(|e| &e.name),
            };
            assemble_element_completions(
                &resolver,
                Some(&snapshot.page_info),
                scope,
                services.config.clr_version,
            )
        }
        CompletionMode::AttributeName(owner) => attribute_names(&tracker, owner, &resolver),
        CompletionMode::AttributeValue(owner) => {
            attribute_values(&tracker, owner, &resolver, snapshot, services.types)
        }
        CompletionMode::ClosingTag => closing_tag(&tracker),
        CompletionMode::Expression(kind) => {
            expression_completions(&tracker, kind, &text[offset..], trigger, snapshot, services)
        }
        CompletionMode::None => Vec::new(),
    };
    trace!("{:?} at {}:{} gave {} entries", mode, position.line, position.character, entries.len());
    Ok(entries)
}

fn attribute_names(
    tracker: &MarkupTracker,
    owner: AttributeOwner,
    resolver: &ControlResolver<'_>,
) -> Vec<CompletionEntry> {
    match (owner, tracker.attributed_node()) {
        (AttributeOwner::Directive, Some(PendingNode::Directive { name, attributes, .. })) => {
            directive_attributes(name, attributes)
        }
        (AttributeOwner::Element, Some(PendingNode::Element { name, attributes, .. })) => {
            let tag = TagReference::parse(name);
            let metadata = if tag.has_prefix() { resolver.resolve_or_fallback(&tag) } else { None };
            assemble_attribute_completions(&tag, metadata.as_deref(), attributes)
        }
        (owner, node) => {
            debug!("No {:?} node for attribute names: {:?}", owner, node);
            Vec::new()
        }
    }
}

fn attribute_values(
    tracker: &MarkupTracker,
    owner: AttributeOwner,
    resolver: &ControlResolver<'_>,
    snapshot: &DocumentSnapshot,
    types: &TypeSystem,
) -> Vec<CompletionEntry> {
    let Some(attribute) = tracker.current_attribute_name().filter(|a| !a.is_empty()) else {
        return Vec::new();
    };
    match (owner, tracker.attributed_node()) {
        (AttributeOwner::Directive, Some(PendingNode::Directive { name, .. })) => {
            directive_attribute_values(name, attribute, types.index(), &snapshot.registrations)
        }
        (AttributeOwner::Element, Some(PendingNode::Element { name, attributes, .. })) => {
            let tag = TagReference::parse(name);
            if !tag.has_prefix() {
                return Vec::new();
            }
            let Some(metadata) = resolver.resolve_or_fallback(&tag) else {
                return Vec::new();
            };
            let element_id = attributes.get("id").map(str::trim).filter(|id| !id.is_empty());
            let code_behind =
                CodeBehind::locate(types.index(), &snapshot.page_info, &snapshot.root, resolver);
            assemble_attribute_value_completions(
                types.index(),
                &metadata,
                &tag,
                attribute,
                element_id,
                code_behind.as_ref(),
            )
        }
        _ => Vec::new(),
    }
}

/// `/name>` for the innermost open element.
fn closing_tag(tracker: &MarkupTracker) -> Vec<CompletionEntry> {
    let Some(open) = tracker.open_elements().last() else {
        return Vec::new();
    };
    let name = open.name.to_string();
    vec![CompletionEntry::new(format!("/{}>", name), EntryKind::ClosingTag)
        .with_detail("Close the open element")
        .with_insert_text(format!("{}>", name))]
}

/// Text of the expression typed so far, without its marker.
fn expression_source(tracker: &MarkupTracker) -> &str {
    match tracker.current_node() {
        Some(PendingNode::Expression { text, .. }) => text,
        _ => "",
    }
}

fn expression_completions(
    tracker: &MarkupTracker,
    kind: ExpressionKind,
    text_after_caret: &str,
    trigger: Option<char>,
    snapshot: &DocumentSnapshot,
    services: CompletionServices<'_>,
) -> Vec<CompletionEntry> {
    let Some(builder) = services.builders.get(&snapshot.page_info.language) else {
        debug!("No completion builder for language {}", snapshot.page_info.language);
        return Vec::new();
    };
    let document = builder.build_document(&snapshot.page_info, snapshot, services.types);
    let local = builder.build_local_document(
        &document,
        kind,
        expression_source(tracker),
        text_after_caret,
    );
    builder.handle_completion(&document, &local, services.types.index(), trigger)
}

/// Signature help inside an expression block.
///
/// `None` outside expressions, when parameter insight is off, or when the
/// page language has no builder.
pub fn signature_help(
    snapshot: &DocumentSnapshot,
    position: Position,
    services: CompletionServices<'_>,
) -> Result<Option<SignatureHelp>, DocumentError> {
    if !services.config.enable_parameter_insight {
        return Ok(None);
    }
    let text = snapshot.text();
    let offset = snapshot.byte_offset(position)?;
    let tracker = MarkupTracker::track_to(&text, offset);
    let CompletionMode::Expression(kind) = classify_tracker(&tracker) else {
        return Ok(None);
    };
    let Some(builder) = services.builders.get(&snapshot.page_info.language) else {
        return Ok(None);
    };
    let document = builder.build_document(&snapshot.page_info, snapshot, services.types);
    let local =
        builder.build_local_document(&document, kind, expression_source(&tracker), &text[offset..]);
    Ok(builder.handle_parameter_completion(&document, &local, services.types.index()))
}
