use indoc::indoc;
use tower_lsp::lsp_types::SymbolKind;

use aspnet_language_server::lsp::features::document_symbols::{
    build_outline, document_symbols, OutlineKind, OutlineNode, OutlineOptions,
};
use aspnet_language_server::markup::node::TextPosition;
use aspnet_language_server::markup::parse_document;

const PAGE: &str = indoc! {r#"
    <%@ Page Language="C#" Inherits="Site.Default" %>
    <%@ Register TagPrefix="uc" TagName="Menu" Src="~/Menu.ascx" %>
    <html>
    <body>
      <form id="form1" runat="server">
        <uc:Menu runat="server" />
        <asp:Repeater ID="Items" runat="server">
          <ItemTemplate><%# Eval("Name") %></ItemTemplate>
        </asp:Repeater>
        <%: Title %>
      </form>
    </body>
    </html>
"#};

fn flatten<'a>(nodes: &'a [OutlineNode], depth: usize, out: &mut Vec<(usize, &'a str)>) {
    for node in nodes {
        out.push((depth, node.label.as_str()));
        flatten(&node.children, depth + 1, out);
    }
}

#[test]
fn test_outline_of_full_page() {
    let outline = build_outline(&parse_document(PAGE), OutlineOptions::default());
    let mut flat = Vec::new();
    flatten(&outline, 0, &mut flat);
    assert_eq!(
        flat,
        vec![
            (0, "<%@ Page %>"),
            (0, "<%@ Register %>"),
            (0, "<html>"),
            (1, "<body>"),
            (2, "<form#form1>"),
            (3, "<uc:Menu>"),
            (3, "<asp:Repeater#Items>"),
            (4, "<ItemTemplate>"),
            (5, "<% Eval(\"Name... %>"),
            (3, "<% Title %>"),
        ]
    );
}

#[test]
fn test_eleven_character_expression_is_truncated() {
    let outline = build_outline(&parse_document("<%= abcdefghijk %>"), OutlineOptions::default());
    assert_eq!(outline[0].kind, OutlineKind::Expression);
    assert_eq!(outline[0].label, "<% abcdefghij... %>");
}

#[test]
fn test_tag_column_offset_applies_to_tags_only() {
    let text = "<%@ Page %>\n  <p></p>";
    let root = parse_document(text);
    let shifted = build_outline(&root, OutlineOptions { tag_column_offset: 1 });
    let plain = build_outline(&root, OutlineOptions { tag_column_offset: 0 });

    assert_eq!(shifted[0].range, plain[0].range);
    assert_eq!(plain[1].range.start, TextPosition::new(1, 2));
    assert_eq!(shifted[1].range.start, TextPosition::new(1, 3));
    assert_eq!(shifted[1].range.end, TextPosition::new(1, 10));
}

#[test]
fn test_symbol_kinds() {
    let symbols = document_symbols(&parse_document(PAGE), OutlineOptions::default());
    assert_eq!(symbols[0].kind, SymbolKind::KEY);
    assert_eq!(symbols[2].kind, SymbolKind::OBJECT);
    assert_eq!(symbols[2].selection_range, symbols[2].range);
}

#[test]
fn test_unclosed_tags_still_nest() {
    let outline = build_outline(&parse_document("<div><span>text"), OutlineOptions::default());
    assert_eq!(outline.len(), 1);
    assert_eq!(outline[0].children[0].label, "<span>");
}
