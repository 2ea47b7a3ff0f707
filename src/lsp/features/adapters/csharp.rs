//! C# sub-builder.

use std::fmt::Write as _;

use regex::Regex;
use tower_lsp::lsp_types::SignatureHelp;
use tracing::debug;

use super::code_model::{
    complete_members, line_start_if_blank, parameter_help, simple_class_name, BuiltDocument,
    LocalDocument, Syntax,
};
use crate::lsp::document::DocumentSnapshot;
use crate::lsp::features::completion::entry::{CompletionEntry, SuggestedHandler};
use crate::lsp::features::traits::LanguageCompletionBuilder;
use crate::markup::node::ExpressionKind;
use crate::markup::page_info::PageInfo;
use crate::type_system::{TypeIndex, TypeSystem};

const KEYWORDS: &[&str] = &[
    "as", "base", "bool", "break", "case", "catch", "char", "checked", "const", "continue",
    "decimal", "default", "do", "double", "else", "false", "finally", "for", "foreach", "if",
    "in", "int", "is", "long", "new", "null", "object", "return", "string", "switch", "this",
    "throw", "true", "try", "typeof", "using", "var", "while",
];

const TYPE_ALIASES: &[(&str, &str)] = &[
    ("object", "System.Object"),
    ("string", "System.String"),
    ("bool", "System.Boolean"),
    ("short", "System.Int16"),
    ("int", "System.Int32"),
    ("long", "System.Int64"),
    ("double", "System.Double"),
    ("decimal", "System.Decimal"),
    ("char", "System.Char"),
    ("void", "System.Void"),
];

pub const CSHARP_SYNTAX: Syntax =
    Syntax { self_keyword: "this", keywords: KEYWORDS, type_aliases: TYPE_ALIASES };

#[derive(Debug, Default)]
pub struct CSharpCompletionBuilder;

impl LanguageCompletionBuilder for CSharpCompletionBuilder {
    fn language_id(&self) -> &'static str {
        "C#"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["csharp", "cs"]
    }

    fn keywords(&self) -> &'static [&'static str] {
        KEYWORDS
    }

    fn build_document(
        &self,
        page_info: &PageInfo,
        snapshot: &DocumentSnapshot,
        types: &TypeSystem,
    ) -> BuiltDocument {
        let mut document = BuiltDocument::collect(self.language_id(), page_info, snapshot, types);

        let mut text = String::new();
        for import in &document.imports {
            let _ = writeln!(text, "using {};", import);
        }
        let _ = writeln!(text);
        let _ = writeln!(text, "public partial class {} : {}", document.class_name, document.base_class);
        let _ = writeln!(text, "{{");
        for field in &document.fields {
            let _ = writeln!(text, "    protected {} {};", field.type_name, field.name);
        }
        for (i, expression) in document.expressions.iter().enumerate() {
            let _ = writeln!(text);
            let _ = writeln!(text, "    private void __Expression{}()", i);
            let _ = writeln!(text, "    {{");
            match expression.kind {
                ExpressionKind::Code => {
                    let _ = writeln!(text, "        {}", expression.text.trim());
                }
                _ => {
                    let _ = writeln!(text, "        object __value = ({});", expression.text.trim());
                }
            }
            let _ = writeln!(text, "    }}");
        }
        text.push_str("}\n");

        document.text = text;
        document
    }

    fn build_local_document(
        &self,
        _document: &BuiltDocument,
        kind: ExpressionKind,
        source_text: &str,
        text_after_caret: &str,
    ) -> LocalDocument {
        LocalDocument::new(kind, source_text, text_after_caret)
    }

    fn handle_completion(
        &self,
        document: &BuiltDocument,
        local: &LocalDocument,
        index: &dyn TypeIndex,
        _trigger: Option<char>,
    ) -> Vec<CompletionEntry> {
        complete_members(&CSHARP_SYNTAX, document, local, index)
    }

    fn handle_parameter_completion(
        &self,
        document: &BuiltDocument,
        local: &LocalDocument,
        index: &dyn TypeIndex,
    ) -> Option<SignatureHelp> {
        parameter_help(&CSHARP_SYNTAX, document, local, index)
    }

    fn render_event_handler(&self, handler: &SuggestedHandler) -> String {
        let parameters: Vec<String> = handler
            .parameters
            .iter()
            .map(|p| format!("{} {}", CSHARP_SYNTAX.type_display(&p.type_name), p.name))
            .collect();
        format!(
            "\n    protected void {}({})\n    {{\n    }}\n",
            handler.handler_name,
            parameters.join(", ")
        )
    }

    fn member_insertion_offset(&self, source: &str, class_name: &str) -> Option<usize> {
        let pattern = format!(r"\bclass\s+{}\b", regex::escape(simple_class_name(class_name)));
        let declaration = Regex::new(&pattern).ok()?.find(source)?;
        let open = declaration.end() + source[declaration.end()..].find('{')?;

        let mut depth = 0usize;
        for (i, c) in source[open..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(line_start_if_blank(source, open + i));
                    }
                }
                _ => {}
            }
        }
        debug!("Class {} has no closing brace", class_name);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsp::features::completion::entry::{labels, HandlerParameter};
    use crate::type_system::InMemoryTypeIndex;
    use indoc::indoc;
    use std::sync::Arc;
    use tower_lsp::lsp_types::Url;

    const PAGE: &str = indoc! {r#"
        <%@ Page Language="C#" Inherits="Site.Default" %>
        <%@ Import Namespace="Site.Models" %>
        <asp:Label ID="Status" runat="server" />
        <%= Title %>
    "#};

    const CODE_BEHIND: &str = r#"{ "types": [
        { "namespace": "Site", "name": "Default", "baseType": "System.Web.UI.Page",
          "properties": [ { "name": "Greeting", "type": "System.String", "accessibility": "protected" } ],
          "methods": [ { "name": "Compute", "returnType": "System.Int32", "parameters": [
              { "name": "a", "type": "System.Int32" }, { "name": "b", "type": "System.Int32" } ] } ] }
    ] }"#;

    fn fixture() -> (TypeSystem, DocumentSnapshot) {
        let mut index = InMemoryTypeIndex::with_bundled_baseline().unwrap();
        index.merge(InMemoryTypeIndex::from_json_str(CODE_BEHIND).unwrap());
        let snapshot =
            DocumentSnapshot::new(Url::parse("file:///site/Default.aspx").unwrap(), 1, PAGE);
        (TypeSystem::new(Arc::new(index)), snapshot)
    }

    fn complete(before: &str) -> Vec<String> {
        let (types, snapshot) = fixture();
        let builder = CSharpCompletionBuilder;
        let document = builder.build_document(&snapshot.page_info, &snapshot, &types);
        let local = builder.build_local_document(&document, ExpressionKind::Render, before, " %>");
        let entries = builder.handle_completion(&document, &local, types.index(), None);
        labels(&entries).into_iter().map(str::to_string).collect()
    }

    #[test]
    fn test_build_document() {
        let (types, snapshot) = fixture();
        let document = CSharpCompletionBuilder.build_document(&snapshot.page_info, &snapshot, &types);
        assert_eq!(document.class_name, "Default_aspx");
        assert!(document.imports.contains(&"Site.Models".to_string()));
        assert!(document.text.contains("public partial class Default_aspx : Site.Default"));
        assert!(document.text.contains("protected System.Web.UI.WebControls.Label Status;"));
        assert!(document.text.contains("object __value = (Title);"));
    }

    #[test]
    fn test_scope_completion() {
        let labels = complete(" ");
        assert!(labels.contains(&"Status".to_string()));
        assert!(labels.contains(&"Greeting".to_string()));
        assert!(labels.contains(&"IsPostBack".to_string()));
        assert!(labels.contains(&"foreach".to_string()));
    }

    #[test]
    fn test_member_completion() {
        let labels = complete(" Status.");
        assert!(labels.contains(&"Text".to_string()));
        assert!(labels.contains(&"DataBind".to_string()));
        assert!(!labels.contains(&"foreach".to_string()));

        let chained = complete(" Greeting.Trim().");
        assert!(chained.contains(&"Length".to_string()));

        assert!(complete(" Nothing.").is_empty());
    }

    #[test]
    fn test_parameter_help() {
        let (types, snapshot) = fixture();
        let builder = CSharpCompletionBuilder;
        let document = builder.build_document(&snapshot.page_info, &snapshot, &types);
        let local = builder.build_local_document(&document, ExpressionKind::Code, " Compute(1, ", ")");
        let help = builder.handle_parameter_completion(&document, &local, types.index()).unwrap();
        assert_eq!(help.active_parameter, Some(1));
        assert_eq!(help.signatures[0].label, "int Compute(int a, int b)");
    }

    #[test]
    fn test_event_handler_stub_and_insertion() {
        let handler = SuggestedHandler {
            handler_name: "Save_Click".to_string(),
            event_name: "Click".to_string(),
            delegate_type: "System.EventHandler".to_string(),
            parameters: vec![
                HandlerParameter { name: "sender".to_string(), type_name: "System.Object".to_string() },
                HandlerParameter { name: "e".to_string(), type_name: "System.EventArgs".to_string() },
            ],
            class_name: "Site.Default".to_string(),
            document_uri: None,
        };
        let stub = CSharpCompletionBuilder.render_event_handler(&handler);
        assert!(stub.contains("protected void Save_Click(object sender, System.EventArgs e)"));

        let source = indoc! {"
            namespace Site
            {
                public partial class Default : System.Web.UI.Page
                {
                    void Helper() { }
                }
            }
        "};
        let offset = CSharpCompletionBuilder.member_insertion_offset(source, "Site.Default").unwrap();
        assert!(source[offset..].starts_with("    }\n}"));
        assert!(CSharpCompletionBuilder.member_insertion_offset(source, "Other").is_none());
    }
}
