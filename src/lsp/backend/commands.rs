//! `aspnet.insertEventHandler`
//!
//! Accepting a suggested handler inserts a rendered stub into the
//! code-behind source named by the page's `CodeFile`/`CodeBehind` attribute.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use ropey::Rope;
use tower_lsp::lsp_types::{Position, Range, TextEdit, Url, WorkspaceEdit};
use tracing::debug;

use crate::lsp::features::completion::entry::SuggestedHandler;
use crate::lsp::features::traits::LanguageCompletionBuilder;

use super::state::AspNetBackend;

/// Path of the code file named in a directive, relative to the markup file.
///
/// `~/` paths are taken from the application root, which is the workspace
/// root when known and otherwise the markup file's directory.
pub fn resolve_code_file(markup_path: &Path, code_file: &str, app_root: Option<&Path>) -> PathBuf {
    let markup_dir = markup_path.parent().unwrap_or(Path::new(""));
    let normalized = code_file.replace('\\', "/");
    match normalized.strip_prefix("~/") {
        Some(rest) => app_root.unwrap_or(markup_dir).join(rest),
        None => markup_dir.join(normalized),
    }
}

/// LSP position of byte `offset` in `source`.
pub fn offset_to_position(source: &Rope, offset: usize) -> Position {
    let char_index = source.byte_to_char(offset.min(source.len_bytes()));
    let line = source.char_to_line(char_index);
    let line_start = source.line_to_char(line);
    let column = source.char_to_utf16_cu(char_index) - source.char_to_utf16_cu(line_start);
    Position { line: line as u32, character: column as u32 }
}

/// The edit inserting `handler` into `source`, or `None` when the class
/// cannot be found.
pub fn handler_insertion(
    builder: &dyn LanguageCompletionBuilder,
    handler: &SuggestedHandler,
    source: &str,
) -> Option<TextEdit> {
    let offset = builder.member_insertion_offset(source, &handler.class_name)?;
    let position = offset_to_position(&Rope::from_str(source), offset);
    Some(TextEdit {
        range: Range { start: position, end: position },
        new_text: builder.render_event_handler(handler),
    })
}

impl AspNetBackend {
    /// Workspace edit for an accepted suggested handler.
    pub async fn event_handler_edit(&self, handler: &SuggestedHandler) -> anyhow::Result<WorkspaceEdit> {
        let markup_uri = handler
            .document_uri
            .as_ref()
            .ok_or_else(|| anyhow!("handler {} has no markup document", handler.handler_name))?;
        let snapshot = self
            .snapshot(markup_uri)
            .ok_or_else(|| anyhow!("{} is not open", markup_uri))?;
        let Some(code_file) = snapshot.page_info.code_file.as_deref() else {
            bail!("{} has no CodeFile or CodeBehind attribute", markup_uri);
        };
        let builder = self
            .builders
            .get(&snapshot.page_info.language)
            .ok_or_else(|| anyhow!("no builder for language {}", snapshot.page_info.language))?;

        let markup_path = markup_uri
            .to_file_path()
            .map_err(|_| anyhow!("{} is not a file URI", markup_uri))?;
        let root = self.root_dir.read().await.clone();
        let path = resolve_code_file(&markup_path, code_file, root.as_deref());
        let source = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading code file {}", path.display()))?;

        let edit = handler_insertion(builder.as_ref(), handler, &source).ok_or_else(|| {
            anyhow!("class {} not found in {}", handler.class_name, path.display())
        })?;
        let code_uri =
            Url::from_file_path(&path).map_err(|_| anyhow!("bad code file path {}", path.display()))?;
        debug!("Inserting {} into {} at {:?}", handler.handler_name, code_uri, edit.range.start);

        Ok(WorkspaceEdit {
            changes: Some(HashMap::from([(code_uri, vec![edit])])),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsp::features::adapters::CSharpCompletionBuilder;
    use crate::lsp::features::completion::entry::HandlerParameter;
    use indoc::indoc;

    #[test]
    fn test_resolve_code_file() {
        let markup = Path::new("/site/pages/Default.aspx");
        assert_eq!(
            resolve_code_file(markup, "Default.aspx.cs", None),
            PathBuf::from("/site/pages/Default.aspx.cs")
        );
        assert_eq!(
            resolve_code_file(markup, "~/code\\Default.aspx.cs", Some(Path::new("/site"))),
            PathBuf::from("/site/code/Default.aspx.cs")
        );
    }

    #[test]
    fn test_offset_to_position_counts_utf16() {
        let rope = Rope::from_str("ab\n😀c\n");
        assert_eq!(offset_to_position(&rope, 3), Position { line: 1, character: 0 });
        assert_eq!(offset_to_position(&rope, 7), Position { line: 1, character: 2 });
    }

    #[test]
    fn test_handler_insertion_before_class_end() {
        let source = indoc! {"
            public partial class Default : System.Web.UI.Page
            {
            }
        "};
        let handler = SuggestedHandler {
            handler_name: "Save_Click".to_string(),
            event_name: "Click".to_string(),
            delegate_type: "System.EventHandler".to_string(),
            parameters: vec![HandlerParameter {
                name: "e".to_string(),
                type_name: "System.EventArgs".to_string(),
            }],
            class_name: "Default".to_string(),
            document_uri: None,
        };
        let edit = handler_insertion(&CSharpCompletionBuilder, &handler, source).unwrap();
        assert_eq!(edit.range.start, Position { line: 2, character: 0 });
        assert!(edit.new_text.contains("Save_Click(System.EventArgs e)"));
    }
}
