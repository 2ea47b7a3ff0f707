//! Visual Basic sub-builder.

use std::fmt::Write as _;

use regex::Regex;
use tower_lsp::lsp_types::SignatureHelp;

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
    "AddHandler", "And", "AndAlso", "As", "Boolean", "ByRef", "ByVal", "Call", "Case", "CType",
    "Dim", "DirectCast", "Do", "Each", "Else", "ElseIf", "End", "False", "For", "Function", "If",
    "In", "Integer", "Is", "IsNot", "Me", "MyBase", "New", "Next", "Not", "Nothing", "Object",
    "Or", "OrElse", "Return", "Select", "String", "Sub", "Then", "True", "Try", "TryCast",
    "While", "With",
];

const TYPE_ALIASES: &[(&str, &str)] = &[
    ("Object", "System.Object"),
    ("String", "System.String"),
    ("Boolean", "System.Boolean"),
    ("Short", "System.Int16"),
    ("Integer", "System.Int32"),
    ("Long", "System.Int64"),
    ("Double", "System.Double"),
    ("Decimal", "System.Decimal"),
    ("Char", "System.Char"),
    ("Date", "System.DateTime"),
];

pub const VB_SYNTAX: Syntax =
    Syntax { self_keyword: "Me", keywords: KEYWORDS, type_aliases: TYPE_ALIASES };

#[derive(Debug, Default)]
pub struct VbCompletionBuilder;

impl LanguageCompletionBuilder for VbCompletionBuilder {
    fn language_id(&self) -> &'static str {
        "VB"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["vb.net", "visualbasic"]
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
            let _ = writeln!(text, "Imports {}", import);
        }
        let _ = writeln!(text);
        let _ = writeln!(text, "Partial Public Class {}", document.class_name);
        let _ = writeln!(text, "    Inherits {}", document.base_class);
        for field in &document.fields {
            let _ = writeln!(text, "    Protected WithEvents {} As {}", field.name, field.type_name);
        }
        for (i, expression) in document.expressions.iter().enumerate() {
            let _ = writeln!(text);
            let _ = writeln!(text, "    Private Sub __Expression{}()", i);
            match expression.kind {
                ExpressionKind::Code => {
                    let _ = writeln!(text, "        {}", expression.text.trim());
                }
                _ => {
                    let _ = writeln!(text, "        Dim __value As Object = ({})", expression.text.trim());
                }
            }
            let _ = writeln!(text, "    End Sub");
        }
        text.push_str("End Class\n");

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
        complete_members(&VB_SYNTAX, document, local, index)
    }

    fn handle_parameter_completion(
        &self,
        document: &BuiltDocument,
        local: &LocalDocument,
        index: &dyn TypeIndex,
    ) -> Option<SignatureHelp> {
        parameter_help(&VB_SYNTAX, document, local, index)
    }

    fn render_event_handler(&self, handler: &SuggestedHandler) -> String {
        let parameters: Vec<String> = handler
            .parameters
            .iter()
            .map(|p| format!("ByVal {} As {}", p.name, VB_SYNTAX.type_display(&p.type_name)))
            .collect();
        format!(
            "\n    Protected Sub {}({})\n    End Sub\n",
            handler.handler_name,
            parameters.join(", ")
        )
    }

    fn member_insertion_offset(&self, source: &str, class_name: &str) -> Option<usize> {
        let pattern = format!(r"(?i)\bClass\s+{}\b", regex::escape(simple_class_name(class_name)));
        let declaration = Regex::new(&pattern).ok()?.find(source)?;
        let end = Regex::new(r"(?im)^[ \t]*End[ \t]+Class\b").ok()?;
        let close = end.find_at(source, declaration.end())?;
        Some(line_start_if_blank(source, close.start()))
    }
}
