//! Builds a [`MarkupNode`] tree from tracker events.

use tracing::trace;

use super::node::{MarkupNode, NodeKind, OtherKind, SourceRange, TagReference, TextPosition};
use super::tracker::{MarkupTracker, TrackerEvent};

/// Parses a whole document. Unclosed elements are closed at the end of input.
pub fn parse_document(text: &str) -> MarkupNode {
    let mut tracker = MarkupTracker::recording();
    tracker.feed_str(text);
    tracker.finish();
    let end = tracker.position();
    let events = tracker.take_events();
    trace!("Parsed {} markup events", events.len());
    build_tree(events, end)
}

fn build_tree(events: Vec<TrackerEvent>, end: TextPosition) -> MarkupNode {
    let root = MarkupNode::new(
        NodeKind::Document,
        SourceRange::new(TextPosition::default(), end),
    );
    let mut stack = vec![root];

    for event in events {
        match event {
            TrackerEvent::StartTag { tag, opens_scope } => {
                let node = MarkupNode::new(NodeKind::Tag(tag.clone()), tag.start_tag);
                if opens_scope {
                    stack.push(node);
                } else {
                    attach(&mut stack, node);
                }
            }
            TrackerEvent::EndTag { name, range } => close(&mut stack, &name, range),
            TrackerEvent::Directive { directive, range } => {
                attach(&mut stack, MarkupNode::new(NodeKind::Directive(directive), range))
            }
            TrackerEvent::Expression { expression, range } => {
                attach(&mut stack, MarkupNode::new(NodeKind::Expression(expression), range))
            }
            TrackerEvent::Text(range) => {
                attach(&mut stack, MarkupNode::new(NodeKind::Other(OtherKind::Text), range))
            }
            TrackerEvent::Other { kind, range, .. } => {
                attach(&mut stack, MarkupNode::new(NodeKind::Other(kind), range))
            }
        }
    }

    while stack.len() > 1 {
        pop_unclosed(&mut stack);
    }
    stack.pop().unwrap_or_else(|| {
        MarkupNode::new(NodeKind::Document, SourceRange::new(TextPosition::default(), end))
    })
}

fn attach(stack: &mut [MarkupNode], node: MarkupNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

/// Pops an element that never saw its closing tag; it spans its content.
fn pop_unclosed(stack: &mut Vec<MarkupNode>) {
    if let Some(mut node) = stack.pop() {
        if let Some(last) = node.children.last() {
            node.range.end = node.range.end.max(last.range.end);
        }
        attach(stack, node);
    }
}

fn close(stack: &mut Vec<MarkupNode>, name: &TagReference, range: SourceRange) {
    let matching = stack
        .iter()
        .rposition(|node| node.as_tag().is_some_and(|tag| tag.name.matches(name)));
    let Some(index) = matching else {
        trace!("Ignoring stray closing tag </{}>", name);
        return;
    };
    while stack.len() > index + 1 {
        pop_unclosed(stack);
    }
    if let Some(mut node) = stack.pop() {
        if let NodeKind::Tag(tag) = &mut node.kind {
            tag.end_tag = Some(range);
        }
        node.range.end = range.end;
        attach(stack, node);
    }
}
