//! Immutable per-version view of an open markup document.

use ropey::Rope;
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent, Url};
use tracing::trace;

use crate::errors::DocumentError;
use crate::markup::node::MarkupNode;
use crate::markup::page_info::{PageInfo, TagRegistrations};
use crate::markup::parser::parse_document;

/// Converts an LSP position (UTF-16 column) to a char index in the rope.
fn position_to_char(position: &Position, text: &Rope) -> Result<usize, DocumentError> {
    let out_of_bounds =
        || DocumentError::OutOfBounds { line: position.line, character: position.character };
    let line = position.line as usize;
    if line > text.len_lines() {
        return Err(out_of_bounds());
    }
    if line == text.len_lines() {
        // one past the last line addresses the end of the document
        return if position.character == 0 { Ok(text.len_chars()) } else { Err(out_of_bounds()) };
    }
    let slice = text.line(line);
    let column = position.character as usize;
    if column > slice.len_utf16_cu() {
        return Err(out_of_bounds());
    }
    Ok(text.line_to_char(line) + slice.utf16_cu_to_char(column))
}

/// Everything a request needs about one version of a document.
///
/// Snapshots are never mutated; an edit produces a new snapshot.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    pub uri: Url,
    pub version: i32,
    pub rope: Rope,
    pub root: MarkupNode,
    pub page_info: PageInfo,
    pub registrations: TagRegistrations,
}

impl DocumentSnapshot {
    pub fn new(uri: Url, version: i32, text: &str) -> Self {
        Self::from_rope(uri, version, Rope::from_str(text))
    }

    fn from_rope(uri: Url, version: i32, rope: Rope) -> Self {
        let text = rope.to_string();
        let root = parse_document(&text);
        let page_info = PageInfo::from_document(uri.path(), &text, &root);
        let registrations = TagRegistrations::from_document(&root);
        Self { uri, version, rope, root, page_info, registrations }
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Byte offset of an LSP position.
    pub fn byte_offset(&self, position: Position) -> Result<usize, DocumentError> {
        let char_index = position_to_char(&position, &self.rope)?;
        Ok(self.rope.char_to_byte(char_index))
    }

    /// Applies content changes in order and reparses.
    ///
    /// # Returns
    /// A new snapshot, or `StaleVersion` when `version` is not newer.
    pub fn apply(
        &self,
        changes: &[TextDocumentContentChangeEvent],
        version: i32,
    ) -> Result<DocumentSnapshot, DocumentError> {
        if version <= self.version {
            return Err(DocumentError::StaleVersion { current: self.version, received: version });
        }
        let mut rope = self.rope.clone();
        for change in changes {
            match change.range {
                Some(range) => {
                    let start = position_to_char(&range.start, &rope)?;
                    let end = position_to_char(&range.end, &rope)?;
                    if end < start {
                        return Err(DocumentError::OutOfBounds {
                            line: range.end.line,
                            character: range.end.character,
                        });
                    }
                    rope.remove(start..end);
                    rope.insert(start, &change.text);
                }
                None => rope = Rope::from_str(&change.text),
            }
        }
        trace!("Applied {} changes to {} (v{})", changes.len(), self.uri, version);
        Ok(Self::from_rope(self.uri.clone(), version, rope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::page_info::DocumentKind;
    use tower_lsp::lsp_types::Range;

    fn snapshot(text: &str) -> DocumentSnapshot {
        DocumentSnapshot::new(Url::parse("file:///site/Default.aspx").unwrap(), 0, text)
    }

    fn edit(start: (u32, u32), end: (u32, u32), text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range: Some(Range {
                start: Position { line: start.0, character: start.1 },
                end: Position { line: end.0, character: end.1 },
            }),
            range_length: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_full_change_reparses() {
        let doc = snapshot("<div></div>");
        let changes = vec![TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: r#"<%@ Control Language="VB" %>"#.to_string(),
        }];
        let next = doc.apply(&changes, 1).unwrap();
        assert_eq!(next.version, 1);
        assert_eq!(next.page_info.language, "C#");
        assert_eq!(next.page_info.kind, DocumentKind::Page);
        assert_eq!(doc.text(), "<div></div>");
    }

    #[test]
    fn test_incremental_changes_in_order() {
        let doc = snapshot("hello world");
        let next = doc
            .apply(&[edit((0, 6), (0, 11), "rust"), edit((0, 0), (0, 5), "hi")], 1)
            .unwrap();
        assert_eq!(next.text(), "hi rust");
    }

    #[test]
    fn test_utf16_columns() {
        let doc = snapshot("<p>😀x</p>");
        // the emoji is two UTF-16 code units
        let next = doc.apply(&[edit((0, 5), (0, 6), "y")], 1).unwrap();
        assert_eq!(next.text(), "<p>😀y</p>");
        assert_eq!(doc.byte_offset(Position { line: 0, character: 5 }).unwrap(), 7);
    }

    #[test]
    fn test_stale_version_rejected() {
        let doc = snapshot("a").apply(&[edit((0, 0), (0, 1), "b")], 2).unwrap();
        let result = doc.apply(&[edit((0, 0), (0, 1), "c")], 2);
        assert_eq!(result.unwrap_err(), DocumentError::StaleVersion { current: 2, received: 2 });
    }

    #[test]
    fn test_out_of_bounds_range() {
        let doc = snapshot("one line");
        let result = doc.apply(&[edit((0, 0), (5, 0), "")], 1);
        assert!(matches!(result, Err(DocumentError::OutOfBounds { line: 5, .. })));
    }
}
