//! Markup state classification for completion
//!
//! Decides which completion mode applies at the cursor from the tracker's
//! state, the node on top of its stack, the cursor position and the last
//! character typed.

use tracing::{debug, warn};

use crate::errors::CompletionError;
use crate::markup::node::{ExpressionKind, TextPosition};
use crate::markup::tracker::{AttributeOwner, MarkupState, MarkupTracker, PendingNode, Quote};

/// Column distance from `<` to the cursor right after `<%@`.
const DIRECTIVE_NAME_COLUMN: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionMode {
    DirectiveName,
    /// `<` typed where only server blocks may start.
    BeginExpression,
    ElementName,
    AttributeName(AttributeOwner),
    AttributeValue(AttributeOwner),
    ClosingTag,
    /// Inside a server block; handled by the language sub-builder.
    Expression(ExpressionKind),
    None,
}

/// Picks the completion mode. Pure over its inputs.
///
/// # Arguments
/// * `state` - Tracker state at the cursor
/// * `stack_top` - Node under construction, if any
/// * `cursor` - Cursor position
/// * `last_char` - Character immediately before the cursor
///
/// # Returns
/// `InconsistentState` when a directive state has no directive on the stack.
pub fn classify(
    state: MarkupState,
    stack_top: Option<&PendingNode>,
    cursor: TextPosition,
    last_char: Option<char>,
) -> Result<CompletionMode, CompletionError> {
    match state {
        MarkupState::Directive | MarkupState::DirectiveName => {
            let Some(PendingNode::Directive { start, .. }) = stack_top else {
                return Err(CompletionError::InconsistentState(format!(
                    "{:?} without a directive on the node stack",
                    state
                )));
            };
            let same_line = start.line == cursor.line;
            let at_name = if state == MarkupState::Directive {
                same_line && cursor.column == start.column + DIRECTIVE_NAME_COLUMN
            } else {
                same_line
                    && cursor.column == start.column + DIRECTIVE_NAME_COLUMN + 1
                    && last_char.is_some_and(char::is_alphabetic)
            };
            Ok(if at_name { CompletionMode::DirectiveName } else { CompletionMode::None })
        }
        _ if last_char == Some('<') && !state.is_expression() && state != MarkupState::Free => {
            Ok(CompletionMode::BeginExpression)
        }
        MarkupState::Free if last_char == Some('<') => Ok(CompletionMode::ElementName),
        MarkupState::TagName => Ok(CompletionMode::ElementName),
        MarkupState::Tag => Ok(CompletionMode::AttributeName(AttributeOwner::Element)),
        MarkupState::AttributeName(owner) => Ok(CompletionMode::AttributeName(owner)),
        MarkupState::AttributeValue { quote: Quote::Pending, .. } => Ok(CompletionMode::None),
        MarkupState::AttributeValue { owner, .. } => Ok(CompletionMode::AttributeValue(owner)),
        MarkupState::ClosingTag => Ok(CompletionMode::ClosingTag),
        MarkupState::Expression(kind) => Ok(CompletionMode::Expression(kind)),
        MarkupState::ExpressionOpen => Ok(CompletionMode::Expression(ExpressionKind::Code)),
        _ => Ok(CompletionMode::None),
    }
}

/// Classifies the state of a tracker that has consumed the text up to the cursor.
pub fn classify_tracker(tracker: &MarkupTracker) -> CompletionMode {
    let mode = classify(
        tracker.state(),
        tracker.current_node(),
        tracker.position(),
        tracker.last_char(),
    );
    match mode {
        Ok(mode) => {
            debug!("Completion mode {:?} in state {:?}", mode, tracker.state());
            mode
        }
        Err(e) => {
            warn!("{}", e);
            CompletionMode::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::node::AttributeSet;

    fn mode_of(text: &str) -> CompletionMode {
        classify_tracker(&MarkupTracker::track_to(text, text.len()))
    }

    #[test]
    fn test_directive_name_right_after_marker() {
        assert_eq!(mode_of("<%@"), CompletionMode::DirectiveName);
        assert_eq!(mode_of("  <%@"), CompletionMode::DirectiveName);
        assert_eq!(mode_of("<%@P"), CompletionMode::DirectiveName);
        assert_eq!(mode_of("<%@ "), CompletionMode::None);
        assert_eq!(mode_of("<%@ Pa"), CompletionMode::None);
    }

    #[test]
    fn test_directive_state_without_directive_is_inconsistent() {
        let result = classify(MarkupState::Directive, None, TextPosition::new(0, 3), Some('@'));
        assert!(matches!(result, Err(CompletionError::InconsistentState(_))));
    }

    #[test]
    fn test_directive_on_other_line() {
        let top = PendingNode::Directive {
            name: String::new(),
            attributes: AttributeSet::new(),
            start: TextPosition::new(0, 0),
        };
        let result = classify(MarkupState::Directive, Some(&top), TextPosition::new(1, 3), None);
        assert_eq!(result, Ok(CompletionMode::None));
    }

    #[test]
    fn test_lt_in_free_state_is_element_name() {
        assert_eq!(mode_of("<div>\n  <"), CompletionMode::ElementName);
        assert_eq!(mode_of("<asp:Bu"), CompletionMode::ElementName);
    }

    #[test]
    fn test_lt_in_attribute_value_is_begin_expression() {
        assert_eq!(mode_of("<a href=\"<"), CompletionMode::BeginExpression);
    }

    #[test]
    fn test_attribute_modes() {
        assert_eq!(mode_of("<asp:Button "), CompletionMode::AttributeName(AttributeOwner::Element));
        assert_eq!(mode_of("<asp:Button Te"), CompletionMode::AttributeName(AttributeOwner::Element));
        assert_eq!(
            mode_of("<asp:Button Enabled=\""),
            CompletionMode::AttributeValue(AttributeOwner::Element)
        );
        assert_eq!(mode_of("<asp:Button Enabled="), CompletionMode::None);
        assert_eq!(
            mode_of("<%@ Page La"),
            CompletionMode::AttributeName(AttributeOwner::Directive)
        );
        assert_eq!(
            mode_of("<%@ Page Language='"),
            CompletionMode::AttributeValue(AttributeOwner::Directive)
        );
    }

    #[test]
    fn test_expression_and_closing_modes() {
        assert_eq!(mode_of("<%= Foo."), CompletionMode::Expression(ExpressionKind::Render));
        assert_eq!(mode_of("<%# Eval("), CompletionMode::Expression(ExpressionKind::DataBinding));
        assert_eq!(mode_of("<div></"), CompletionMode::ClosingTag);
        assert_eq!(mode_of("<div>text"), CompletionMode::None);
    }
}
