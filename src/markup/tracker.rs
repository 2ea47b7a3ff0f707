//! Character-driven state tracker for ASP.NET markup
//!
//! The tracker is fed one character at a time. At any point it can report the
//! active parser state, the node under construction and the stack of open
//! elements. Completion uses that live view at the cursor. The parser runs
//! the same tracker over a whole document and builds a tree from the events
//! it records.

use std::collections::VecDeque;

use super::node::{
    AttributeSet, DirectiveNode, ExpressionKind, ExpressionNode, OtherKind, SourceRange,
    TagNode, TagReference, TextPosition,
};

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose body is raw text up to the matching closing tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

const RAW_TAIL_LEN: usize = 32;

/// What an attribute state belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeOwner {
    Element,
    Directive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quote {
    /// After `=`, before the value starts.
    Pending,
    Double,
    Single,
    Unquoted,
}

impl Quote {
    fn closing_char(&self) -> Option<char> {
        match self {
            Quote::Double => Some('"'),
            Quote::Single => Some('\''),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkupState {
    /// Free-form markup text.
    Free,
    /// Reading an element name after `<`.
    TagName,
    /// Inside a start tag, between attributes.
    Tag,
    AttributeName(AttributeOwner),
    AttributeValue { owner: AttributeOwner, quote: Quote },
    ClosingTag,
    /// After `<!`, deciding between a comment and a declaration.
    Bang,
    Comment,
    DocType,
    /// After `<%`, deciding the block flavour.
    ExpressionOpen,
    /// After `<%-`.
    ServerCommentOpen,
    ServerComment,
    Expression(ExpressionKind),
    /// Inside `<%@ ... %>` between the name and attributes.
    Directive,
    DirectiveName,
    /// Body of a `<script>` or `<style>` element.
    RawText,
}

impl MarkupState {
    pub fn is_expression(&self) -> bool {
        matches!(self, MarkupState::Expression(_) | MarkupState::ExpressionOpen)
    }

    pub fn attribute_owner(&self) -> Option<AttributeOwner> {
        match self {
            MarkupState::AttributeName(owner) => Some(*owner),
            MarkupState::AttributeValue { owner, .. } => Some(*owner),
            _ => None,
        }
    }
}

/// A node whose source text has started but not yet ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingNode {
    Element { name: String, attributes: AttributeSet, start: TextPosition },
    Directive { name: String, attributes: AttributeSet, start: TextPosition },
    Expression {
        kind: ExpressionKind,
        text: String,
        raw: String,
        start: TextPosition,
        text_start: TextPosition,
    },
    ClosingTag { name: String, start: TextPosition },
    Comment { kind: OtherKind, text: String, start: TextPosition },
}

impl PendingNode {
    pub fn start(&self) -> TextPosition {
        match self {
            PendingNode::Element { start, .. }
            | PendingNode::Directive { start, .. }
            | PendingNode::Expression { start, .. }
            | PendingNode::ClosingTag { start, .. }
            | PendingNode::Comment { start, .. } => *start,
        }
    }

    pub fn attributes(&self) -> Option<&AttributeSet> {
        match self {
            PendingNode::Element { attributes, .. } | PendingNode::Directive { attributes, .. } => {
                Some(attributes)
            }
            _ => None,
        }
    }
}

/// An element whose start tag is complete and whose closing tag has not been seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenElement {
    pub name: TagReference,
    pub attributes: AttributeSet,
    pub start_tag: SourceRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    Text(SourceRange),
    StartTag { tag: TagNode, opens_scope: bool },
    EndTag { name: TagReference, range: SourceRange },
    Directive { directive: DirectiveNode, range: SourceRange },
    Expression { expression: ExpressionNode, range: SourceRange },
    Other { kind: OtherKind, text: String, range: SourceRange },
}

#[derive(Debug, Clone)]
pub struct MarkupTracker {
    state: MarkupState,
    pending: Vec<PendingNode>,
    open_elements: Vec<OpenElement>,
    resume: Vec<MarkupState>,

    position: TextPosition,
    offset: usize,
    prev_char: Option<char>,

    pending_lt: bool,
    lt_position: TextPosition,
    text_start: Option<TextPosition>,
    text_has_content: bool,

    attr_name: String,
    attr_value: String,
    last_attr: Option<String>,
    self_closing: bool,
    bang: String,
    raw_start: TextPosition,
    raw_lt: Option<TextPosition>,
    raw_tail: VecDeque<char>,

    record_events: bool,
    events: Vec<TrackerEvent>,
}

impl Default for MarkupTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ':' | '_' | '-' | '.')
}

fn advance(position: TextPosition, c: char) -> TextPosition {
    if c == '\n' {
        TextPosition::new(position.line + 1, 0)
    } else {
        TextPosition::new(position.line, position.column + c.len_utf16() as u32)
    }
}

pub fn is_void_element(tag: &TagReference) -> bool {
    !tag.has_prefix() && VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(&tag.name))
}

fn is_raw_text_element(tag: &TagReference) -> bool {
    !tag.has_prefix() && RAW_TEXT_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(&tag.name))
}

impl MarkupTracker {
    /// Tracker that only maintains state, for cursor queries.
    pub fn new() -> Self {
        Self {
            state: MarkupState::Free,
            pending: Vec::new(),
            open_elements: Vec::new(),
            resume: Vec::new(),
            position: TextPosition::default(),
            offset: 0,
            prev_char: None,
            pending_lt: false,
            lt_position: TextPosition::default(),
            text_start: None,
            text_has_content: false,
            attr_name: String::new(),
            attr_value: String::new(),
            last_attr: None,
            self_closing: false,
            bang: String::new(),
            raw_start: TextPosition::default(),
            raw_lt: None,
            raw_tail: VecDeque::with_capacity(RAW_TAIL_LEN),
            record_events: false,
            events: Vec::new(),
        }
    }

    /// Tracker that also records events for tree building.
    pub fn recording() -> Self {
        Self { record_events: true, ..Self::new() }
    }

    /// Runs a tracker over `text` up to (not including) byte `offset`.
    pub fn track_to(text: &str, offset: usize) -> Self {
        let mut tracker = Self::new();
        let end = offset.min(text.len());
        let end = (0..=end).rev().find(|i| text.is_char_boundary(*i)).unwrap_or(0);
        tracker.feed_str(&text[..end]);
        tracker
    }

    pub fn state(&self) -> MarkupState {
        self.state
    }

    pub fn position(&self) -> TextPosition {
        self.position
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn last_char(&self) -> Option<char> {
        self.prev_char
    }

    /// The node under construction, if any (top of the node stack).
    pub fn current_node(&self) -> Option<&PendingNode> {
        self.pending.last()
    }

    /// The innermost pending node that carries attributes.
    pub fn attributed_node(&self) -> Option<&PendingNode> {
        self.pending.iter().rev().find(|n| n.attributes().is_some())
    }

    pub fn open_elements(&self) -> &[OpenElement] {
        &self.open_elements
    }

    /// Name of the `level`-th enclosing open element, innermost first.
    pub fn parent_element(&self, level: usize) -> Option<&OpenElement> {
        self.open_elements.iter().rev().nth(level)
    }

    /// Attribute whose name or value is being typed.
    pub fn current_attribute_name(&self) -> Option<&str> {
        self.state.attribute_owner().map(|_| self.attr_name.as_str())
    }

    pub fn current_attribute_value(&self) -> Option<&str> {
        match self.state {
            MarkupState::AttributeValue { .. } => Some(self.attr_value.as_str()),
            _ => None,
        }
    }

    pub fn take_events(&mut self) -> Vec<TrackerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn feed_str(&mut self, text: &str) {
        for c in text.chars() {
            self.feed(c);
        }
    }

    pub fn feed(&mut self, c: char) {
        let here = self.position;
        let after = advance(here, c);
        self.step(c, here, after);
        self.prev_char = Some(c);
        self.position = after;
        self.offset += c.len_utf8();
    }

    /// Flushes trailing text at end of input.
    pub fn finish(&mut self) {
        if self.state == MarkupState::Free {
            if self.pending_lt {
                self.text_has_content = true;
                self.pending_lt = false;
            }
            self.flush_text(self.position);
        }
    }

    fn emit(&mut self, event: TrackerEvent) {
        if self.record_events {
            self.events.push(event);
        }
    }

    fn step(&mut self, c: char, here: TextPosition, after: TextPosition) {
        match self.state {
            MarkupState::Free => self.step_free(c, here, after),
            MarkupState::TagName => self.step_tag_name(c, here, after),
            MarkupState::Tag => self.step_tag(c, here, after),
            MarkupState::AttributeName(owner) => self.step_attribute_name(owner, c, here, after),
            MarkupState::AttributeValue { owner, quote } => {
                self.step_attribute_value(owner, quote, c, here, after)
            }
            MarkupState::ClosingTag => self.step_closing_tag(c, here, after),
            MarkupState::Bang => self.step_bang(c, after),
            MarkupState::Comment => self.step_comment(c, after),
            MarkupState::DocType => self.step_doctype(c, after),
            MarkupState::ExpressionOpen => self.step_expression_open(c, here, after),
            MarkupState::ServerCommentOpen => self.step_server_comment_open(c, here, after),
            MarkupState::ServerComment => self.step_server_comment(c, after),
            MarkupState::Expression(_) => self.step_expression(c, after),
            MarkupState::Directive => self.step_directive(c, here, after),
            MarkupState::DirectiveName => self.step_directive_name(c, here, after),
            MarkupState::RawText => self.step_raw_text(c, here, after),
        }
    }

    fn flush_text(&mut self, end: TextPosition) {
        if let Some(start) = self.text_start.take() {
            if self.text_has_content && start < end {
                self.emit(TrackerEvent::Text(SourceRange::new(start, end)));
            }
        }
        self.text_has_content = false;
    }

    fn step_free(&mut self, c: char, here: TextPosition, after: TextPosition) {
        if self.pending_lt {
            self.pending_lt = false;
            let lt = self.lt_position;
            match c {
                '%' => {
                    self.flush_text(lt);
                    self.open_expression(lt, after);
                    return;
                }
                '/' => {
                    self.flush_text(lt);
                    self.pending.push(PendingNode::ClosingTag { name: String::new(), start: lt });
                    self.state = MarkupState::ClosingTag;
                    return;
                }
                '!' => {
                    self.flush_text(lt);
                    self.bang.clear();
                    self.pending.push(PendingNode::Comment {
                        kind: OtherKind::Comment,
                        text: String::new(),
                        start: lt,
                    });
                    self.state = MarkupState::Bang;
                    return;
                }
                c if is_name_start(c) => {
                    self.flush_text(lt);
                    self.pending.push(PendingNode::Element {
                        name: c.to_string(),
                        attributes: AttributeSet::new(),
                        start: lt,
                    });
                    self.self_closing = false;
                    self.last_attr = None;
                    self.state = MarkupState::TagName;
                    return;
                }
                // a literal '<' in text
                _ => self.text_has_content = true,
            }
        }

        if self.text_start.is_none() {
            self.text_start = Some(here);
        }
        if c == '<' {
            self.pending_lt = true;
            self.lt_position = here;
        } else if !c.is_whitespace() {
            self.text_has_content = true;
        }
    }

    fn open_expression(&mut self, start: TextPosition, after: TextPosition) {
        self.pending.push(PendingNode::Expression {
            kind: ExpressionKind::Code,
            text: String::new(),
            raw: "<%".to_string(),
            start,
            text_start: after,
        });
        self.state = MarkupState::ExpressionOpen;
    }

    fn step_tag_name(&mut self, c: char, here: TextPosition, after: TextPosition) {
        if is_name_char(c) {
            if let Some(PendingNode::Element { name, .. }) = self.pending.last_mut() {
                name.push(c);
            }
        } else if c == '>' {
            self.finish_start_tag(after);
        } else if c == '/' {
            self.self_closing = true;
            self.state = MarkupState::Tag;
        } else if c == '<' {
            self.finish_start_tag(here);
            self.step_free(c, here, after);
        } else {
            self.state = MarkupState::Tag;
        }
    }

    fn step_tag(&mut self, c: char, here: TextPosition, after: TextPosition) {
        if c.is_whitespace() {
            return;
        }
        match c {
            '>' => self.finish_start_tag(after),
            '/' => self.self_closing = true,
            '=' if self.last_attr.is_some() => {
                self.attr_name = self.last_attr.take().unwrap_or_default();
                self.attr_value.clear();
                self.state = MarkupState::AttributeValue {
                    owner: AttributeOwner::Element,
                    quote: Quote::Pending,
                };
            }
            '<' => {
                self.finish_start_tag(here);
                self.step_free(c, here, after);
            }
            c if is_name_start(c) => {
                self.self_closing = false;
                self.last_attr = None;
                self.attr_name.clear();
                self.attr_name.push(c);
                self.state = MarkupState::AttributeName(AttributeOwner::Element);
            }
            _ => self.self_closing = false,
        }
    }

    fn owner_state(owner: AttributeOwner) -> MarkupState {
        match owner {
            AttributeOwner::Element => MarkupState::Tag,
            AttributeOwner::Directive => MarkupState::Directive,
        }
    }

    fn commit_attribute(&mut self) {
        let name = std::mem::take(&mut self.attr_name);
        let value = std::mem::take(&mut self.attr_value);
        if name.is_empty() {
            return;
        }
        if let Some(attributes) = self.pending.iter_mut().rev().find_map(|n| match n {
            PendingNode::Element { attributes, .. } | PendingNode::Directive { attributes, .. } => {
                Some(attributes)
            }
            _ => None,
        }) {
            attributes.insert(name, value);
        }
    }

    fn step_attribute_name(
        &mut self,
        owner: AttributeOwner,
        c: char,
        here: TextPosition,
        after: TextPosition,
    ) {
        if is_name_char(c) {
            self.attr_name.push(c);
        } else if c == '=' {
            self.attr_value.clear();
            self.state = MarkupState::AttributeValue { owner, quote: Quote::Pending };
        } else {
            let name = self.attr_name.clone();
            self.commit_attribute();
            self.last_attr = Some(name);
            self.state = Self::owner_state(owner);
            self.step(c, here, after);
        }
    }

    fn step_attribute_value(
        &mut self,
        owner: AttributeOwner,
        quote: Quote,
        c: char,
        here: TextPosition,
        after: TextPosition,
    ) {
        match quote {
            Quote::Pending => match c {
                c if c.is_whitespace() => {}
                '"' => self.state = MarkupState::AttributeValue { owner, quote: Quote::Double },
                '\'' => self.state = MarkupState::AttributeValue { owner, quote: Quote::Single },
                '>' | '%' | '/' => {
                    self.commit_attribute();
                    self.state = Self::owner_state(owner);
                    self.step(c, here, after);
                }
                _ => {
                    self.attr_value.push(c);
                    self.state = MarkupState::AttributeValue { owner, quote: Quote::Unquoted };
                }
            },
            Quote::Unquoted => {
                let ends_directive = owner == AttributeOwner::Directive && c == '%';
                if c.is_whitespace() || c == '>' || ends_directive {
                    self.commit_attribute();
                    self.state = Self::owner_state(owner);
                    self.step(c, here, after);
                } else {
                    self.attr_value.push(c);
                }
            }
            Quote::Double | Quote::Single => {
                if self.pending_lt {
                    self.pending_lt = false;
                    if c == '%' {
                        self.resume.push(self.state);
                        self.open_expression(self.lt_position, after);
                        return;
                    }
                    self.attr_value.push('<');
                }
                if Some(c) == quote.closing_char() {
                    self.commit_attribute();
                    self.state = Self::owner_state(owner);
                } else if c == '<' {
                    self.pending_lt = true;
                    self.lt_position = here;
                } else {
                    self.attr_value.push(c);
                }
            }
        }
    }

    fn finish_start_tag(&mut self, end: TextPosition) {
        let Some(PendingNode::Element { name, attributes, start }) = self.pending.pop() else {
            self.state = MarkupState::Free;
            return;
        };
        let reference = TagReference::parse(&name);
        let range = SourceRange::new(start, end);
        let opens_scope = !self.self_closing && !is_void_element(&reference);
        if opens_scope {
            self.open_elements.push(OpenElement {
                name: reference.clone(),
                attributes: attributes.clone(),
                start_tag: range,
            });
        }
        let raw = opens_scope && is_raw_text_element(&reference);
        self.emit(TrackerEvent::StartTag {
            tag: TagNode {
                name: reference,
                attributes,
                start_tag: range,
                end_tag: None,
                self_closing: self.self_closing,
            },
            opens_scope,
        });
        self.self_closing = false;
        self.last_attr = None;
        if raw {
            self.raw_start = end;
            self.raw_lt = None;
            self.raw_tail.clear();
            self.state = MarkupState::RawText;
        } else {
            self.state = MarkupState::Free;
        }
    }

    fn step_closing_tag(&mut self, c: char, here: TextPosition, after: TextPosition) {
        if c == '>' {
            self.finish_closing_tag(after);
        } else if is_name_char(c) {
            if let Some(PendingNode::ClosingTag { name, .. }) = self.pending.last_mut() {
                name.push(c);
            }
        } else if c == '<' {
            self.finish_closing_tag(here);
            self.step_free(c, here, after);
        }
    }

    fn close_element(&mut self, name: &TagReference, range: SourceRange) {
        if let Some(index) = self.open_elements.iter().rposition(|e| e.name.matches(name)) {
            self.open_elements.truncate(index);
        }
        self.emit(TrackerEvent::EndTag { name: name.clone(), range });
    }

    fn finish_closing_tag(&mut self, end: TextPosition) {
        if let Some(PendingNode::ClosingTag { name, start }) = self.pending.pop() {
            if !name.is_empty() {
                self.close_element(&TagReference::parse(&name), SourceRange::new(start, end));
            }
        }
        self.state = MarkupState::Free;
    }

    fn step_bang(&mut self, c: char, after: TextPosition) {
        if self.bang.is_empty() && c == '-' {
            self.bang.push(c);
            return;
        }
        if self.bang == "-" && c == '-' {
            self.bang.clear();
            self.state = MarkupState::Comment;
            return;
        }
        let prefix = std::mem::take(&mut self.bang);
        if let Some(PendingNode::Comment { kind, text, .. }) = self.pending.last_mut() {
            *kind = OtherKind::DocType;
            text.push_str(&prefix);
        }
        self.state = MarkupState::DocType;
        self.step_doctype(c, after);
    }

    fn finish_other(&mut self, end: TextPosition) {
        if let Some(PendingNode::Comment { kind, text, start }) = self.pending.pop() {
            self.emit(TrackerEvent::Other { kind, text, range: SourceRange::new(start, end) });
        }
        self.state = self.resume.pop().unwrap_or(MarkupState::Free);
    }

    fn step_comment(&mut self, c: char, after: TextPosition) {
        if let Some(PendingNode::Comment { text, .. }) = self.pending.last_mut() {
            if c == '>' && text.ends_with("--") {
                text.truncate(text.len() - 2);
                self.finish_other(after);
                return;
            }
            text.push(c);
        }
    }

    fn step_doctype(&mut self, c: char, after: TextPosition) {
        if c == '>' {
            self.finish_other(after);
        } else if let Some(PendingNode::Comment { text, .. }) = self.pending.last_mut() {
            text.push(c);
        }
    }

    fn step_expression_open(&mut self, c: char, here: TextPosition, after: TextPosition) {
        match c {
            '@' => {
                if let Some(PendingNode::Expression { start, .. }) = self.pending.pop() {
                    self.pending.push(PendingNode::Directive {
                        name: String::new(),
                        attributes: AttributeSet::new(),
                        start,
                    });
                }
                self.last_attr = None;
                self.state = MarkupState::Directive;
            }
            '-' => {
                if let Some(PendingNode::Expression { raw, .. }) = self.pending.last_mut() {
                    raw.push(c);
                }
                self.state = MarkupState::ServerCommentOpen;
            }
            c => match ExpressionKind::from_marker(c) {
                Some(marker_kind) => {
                    if let Some(PendingNode::Expression { kind, raw, text_start, .. }) =
                        self.pending.last_mut()
                    {
                        *kind = marker_kind;
                        raw.push(c);
                        *text_start = after;
                    }
                    self.state = MarkupState::Expression(marker_kind);
                }
                None => {
                    if let Some(PendingNode::Expression { text_start, .. }) = self.pending.last_mut() {
                        *text_start = here;
                    }
                    self.state = MarkupState::Expression(ExpressionKind::Code);
                    self.step_expression(c, after);
                }
            },
        }
    }

    fn step_server_comment_open(&mut self, c: char, _here: TextPosition, after: TextPosition) {
        if c == '-' {
            if let Some(PendingNode::Expression { start, .. }) = self.pending.pop() {
                self.pending.push(PendingNode::Comment {
                    kind: OtherKind::ServerComment,
                    text: String::new(),
                    start,
                });
            }
            self.state = MarkupState::ServerComment;
            return;
        }
        // `<%-x` is a code block starting with '-'
        if let Some(PendingNode::Expression { text, .. }) = self.pending.last_mut() {
            text.push('-');
        }
        self.state = MarkupState::Expression(ExpressionKind::Code);
        self.step_expression(c, after);
    }

    fn step_server_comment(&mut self, c: char, after: TextPosition) {
        if let Some(PendingNode::Comment { text, .. }) = self.pending.last_mut() {
            if c == '>' && text.ends_with("--%") {
                text.truncate(text.len() - 3);
                self.finish_other(after);
                return;
            }
            text.push(c);
        }
    }

    fn step_expression(&mut self, c: char, after: TextPosition) {
        let closes = c == '>' && self.prev_char == Some('%');
        if !closes {
            if let Some(PendingNode::Expression { text, raw, .. }) = self.pending.last_mut() {
                text.push(c);
                raw.push(c);
            }
            return;
        }

        let Some(PendingNode::Expression { kind, mut text, mut raw, start, text_start }) =
            self.pending.pop()
        else {
            self.state = MarkupState::Free;
            return;
        };
        if text.ends_with('%') {
            text.pop();
        }
        raw.push(c);

        match self.resume.pop() {
            Some(state @ MarkupState::AttributeValue { .. }) => {
                self.attr_value.push_str(&raw);
                self.state = state;
            }
            Some(state) => self.state = state,
            None => {
                self.emit(TrackerEvent::Expression {
                    expression: ExpressionNode { kind, text, text_start },
                    range: SourceRange::new(start, after),
                });
                self.state = MarkupState::Free;
            }
        }
    }

    fn step_directive(&mut self, c: char, here: TextPosition, after: TextPosition) {
        if c == '>' && self.prev_char == Some('%') {
            self.finish_directive(after);
            return;
        }
        if c.is_whitespace() || c == '%' {
            return;
        }
        if c == '=' && self.last_attr.is_some() {
            self.attr_name = self.last_attr.take().unwrap_or_default();
            self.attr_value.clear();
            self.state = MarkupState::AttributeValue {
                owner: AttributeOwner::Directive,
                quote: Quote::Pending,
            };
            return;
        }
        if is_name_start(c) {
            let has_name = matches!(
                self.pending.last(),
                Some(PendingNode::Directive { name, .. }) if !name.is_empty()
            );
            if has_name {
                self.last_attr = None;
                self.attr_name.clear();
                self.attr_name.push(c);
                self.state = MarkupState::AttributeName(AttributeOwner::Directive);
            } else {
                if let Some(PendingNode::Directive { name, .. }) = self.pending.last_mut() {
                    name.push(c);
                }
                self.state = MarkupState::DirectiveName;
            }
        }
        let _ = (here, after);
    }

    fn step_directive_name(&mut self, c: char, here: TextPosition, after: TextPosition) {
        if is_name_char(c) {
            if let Some(PendingNode::Directive { name, .. }) = self.pending.last_mut() {
                name.push(c);
            }
        } else {
            self.state = MarkupState::Directive;
            self.step_directive(c, here, after);
        }
    }

    fn finish_directive(&mut self, end: TextPosition) {
        if let Some(PendingNode::Directive { name, attributes, start }) = self.pending.pop() {
            self.emit(TrackerEvent::Directive {
                directive: DirectiveNode { name, attributes },
                range: SourceRange::new(start, end),
            });
        }
        self.last_attr = None;
        self.state = self.resume.pop().unwrap_or(MarkupState::Free);
    }

    fn step_raw_text(&mut self, c: char, here: TextPosition, after: TextPosition) {
        if self.pending_lt {
            self.pending_lt = false;
            if c == '%' {
                self.resume.push(MarkupState::RawText);
                self.open_expression(self.lt_position, after);
                return;
            }
        }
        if c == '<' {
            self.pending_lt = true;
            self.lt_position = here;
            self.raw_lt = Some(here);
        }
        if self.raw_tail.len() == RAW_TAIL_LEN {
            self.raw_tail.pop_front();
        }
        self.raw_tail.push_back(c);

        if c != '>' {
            return;
        }
        let Some(element) = self.open_elements.last() else {
            self.state = MarkupState::Free;
            return;
        };
        let tail: String = self.raw_tail.iter().collect();
        let Some(slash) = tail.rfind("</") else {
            return;
        };
        let closing = tail[slash + 2..tail.len() - 1].trim();
        if !closing.eq_ignore_ascii_case(&element.name.name) {
            return;
        }
        let name = element.name.clone();
        let lt = self.raw_lt.unwrap_or(here);
        if self.raw_start < lt {
            self.emit(TrackerEvent::Text(SourceRange::new(self.raw_start, lt)));
        }
        self.close_element(&name, SourceRange::new(lt, after));
        self.state = MarkupState::Free;
    }
}
