use std::sync::Arc;

use indoc::indoc;
use quickcheck::{quickcheck, TestResult};
use tower_lsp::lsp_types::{Position, Url};

use aspnet_language_server::config::{ClrVersion, ServerConfig};
use aspnet_language_server::lsp::features::adapters::BuilderRegistry;
use aspnet_language_server::lsp::features::completion::entry::labels;
use aspnet_language_server::lsp::features::completion::{
    complete, CompletionEntry, CompletionServices, EntryKind,
};
use aspnet_language_server::lsp::DocumentSnapshot;
use aspnet_language_server::type_system::{InMemoryTypeIndex, TypeSystem};

const CODE_BEHIND_INDEX: &str = r#"{ "types": [
    { "namespace": "Site", "name": "Default", "baseType": "System.Web.UI.Page",
      "methods": [
        { "name": "Save_Click", "parameters": [
            { "name": "sender", "type": "System.Object" }, { "name": "e", "type": "System.EventArgs" } ] }
      ] }
] }"#;

fn bundled_with_code_behind() -> TypeSystem {
    let mut index = InMemoryTypeIndex::with_bundled_baseline().unwrap();
    index.merge(InMemoryTypeIndex::from_json_str(CODE_BEHIND_INDEX).unwrap());
    TypeSystem::new(Arc::new(index))
}

fn split_marker(marked: &str) -> (String, Position) {
    let offset = marked.find('|').expect("marker");
    let before = &marked[..offset];
    let line = before.matches('\n').count() as u32;
    let character = before.rsplit('\n').next().unwrap_or("").encode_utf16().count() as u32;
    (marked.replacen('|', "", 1), Position { line, character })
}

fn complete_with(
    types: &TypeSystem,
    config: &ServerConfig,
    file_name: &str,
    marked: &str,
) -> Vec<CompletionEntry> {
    let (text, position) = split_marker(marked);
    let builders = BuilderRegistry::with_defaults();
    let services = CompletionServices { types, builders: &builders, config };
    let uri = Url::parse(&format!("file:///site/{}", file_name)).unwrap();
    let snapshot = DocumentSnapshot::new(uri, 1, &text);
    complete(&snapshot, position, None, services).unwrap()
}

fn complete_at(file_name: &str, marked: &str) -> Vec<String> {
    let types = bundled_with_code_behind();
    let entries = complete_with(&types, &ServerConfig::default(), file_name, marked);
    labels(&entries).into_iter().map(str::to_string).collect()
}

#[test]
fn test_button_with_minimal_index_offers_text_and_onclick() {
    let index = InMemoryTypeIndex::from_json_str(
        r#"{ "types": [
            { "namespace": "System.Web.UI.WebControls", "name": "Button",
              "properties": [ { "name": "Text", "type": "System.String" } ],
              "events": [ { "name": "Click", "delegateType": "System.EventHandler" } ] }
        ] }"#,
    )
    .unwrap();
    let types = TypeSystem::new(Arc::new(index));
    let entries = complete_with(
        &types,
        &ServerConfig::default(),
        "Default.aspx",
        r#"<asp:Button runat="server" id="x" | />"#,
    );
    assert_eq!(labels(&entries), vec!["Text", "OnClick"]);
}

#[test]
fn test_unresolved_control_falls_back_to_web_control_members() {
    let labels = complete_at("Default.aspx", r#"<asp:NoSuchControl | />"#);
    assert!(labels.contains(&"CssClass".to_string()));
    assert!(labels.contains(&"OnLoad".to_string()));
}

#[test]
fn test_existing_id_in_any_case_is_not_offered() {
    let labels = complete_at("Default.aspx", r#"<asp:Label iD="Status" TEXT="a" | />"#);
    assert!(!labels.iter().any(|l| l.eq_ignore_ascii_case("id")));
    assert!(!labels.iter().any(|l| l.eq_ignore_ascii_case("text")));
    assert!(labels.contains(&"AssociatedControlID".to_string()));
}

#[test]
fn test_boolean_values_for_any_control() {
    for tag in ["asp:TextBox", "asp:CheckBox", "asp:NoSuchControl"] {
        let marked = format!(r#"<{} Enabled="|" />"#, tag);
        assert_eq!(complete_at("Default.aspx", &marked), vec!["true", "false"], "{}", tag);
    }
}

#[test]
fn test_inner_properties_are_elements_not_values() {
    let page = indoc! {r#"
        <asp:Repeater runat="server">
            <|
    "#};
    let elements = complete_at("Default.aspx", page);
    assert!(elements.contains(&"ItemTemplate".to_string()));
    assert!(!elements.contains(&"DataSourceID".to_string()));

    let values = complete_at("Default.aspx", r#"<asp:Repeater ItemTemplate="|" />"#);
    assert!(values.is_empty());
}

#[test]
fn test_event_handler_suggestions_use_code_behind() {
    let page = indoc! {r#"
        <%@ Page Language="C#" Inherits="Site.Default" CodeFile="Default.aspx.cs" %>
        <asp:Button ID="Save" runat="server" OnClick="|" />
    "#};
    let types = bundled_with_code_behind();
    let entries = complete_with(&types, &ServerConfig::default(), "Default.aspx", page);
    assert_eq!(labels(&entries), vec!["Save_Click", "Save_Click1"]);
    assert_eq!(entries[0].kind, EntryKind::Method);
    let suggested = entries[1].handler.as_ref().unwrap();
    assert_eq!(suggested.class_name, "Site.Default");
    assert_eq!(suggested.event_name, "Click");
}

#[test]
fn test_lowercase_event_attribute_gets_handlers() {
    let page = indoc! {r#"
        <%@ Page Language="C#" Inherits="Site.Default" CodeFile="Default.aspx.cs" %>
        <asp:Button ID="Save" runat="server" onclick="|" />
    "#};
    assert_eq!(complete_at("Default.aspx", page), vec!["Save_Click", "Save_Click1"]);
}

#[test]
fn test_begin_expressions_follow_clr_version() {
    let types = bundled_with_code_behind();
    let legacy = ServerConfig { clr_version: ClrVersion::Net1_1, ..ServerConfig::default() };
    let marked = r#"<a href="<|"#;
    let old = complete_with(&types, &legacy, "Default.aspx", marked);
    let current = complete_with(&types, &ServerConfig::default(), "Default.aspx", marked);
    assert!(labels(&old).contains(&"%="));
    assert!(!labels(&old).contains(&"%:"));
    assert!(!labels(&old).contains(&"%$"));
    assert!(labels(&current).contains(&"%:"));
    assert!(labels(&current).contains(&"%$"));
}

#[test]
fn test_directives_depend_on_document_kind() {
    let page = complete_at("Default.aspx", "<%@| %>");
    let master = complete_at("Site.master", "<%@| %>");
    assert_eq!(page[0], "Page");
    assert_eq!(master[0], "Master");
    assert!(!master.contains(&"Page".to_string()));
}

#[test]
fn test_vb_page_expression_completion() {
    let page = indoc! {r#"
        <%@ Page Language="VB" Inherits="Site.Default" %>
        <%= Me.| %>
    "#};
    let labels = complete_at("Default.aspx", page);
    assert!(labels.contains(&"IsPostBack".to_string()));
    assert!(labels.contains(&"Save_Click".to_string()));
}

#[test]
fn test_text_content_gives_nothing() {
    assert!(complete_at("Default.aspx", "<p>some te|xt</p>").is_empty());
}

fn existing_attribute_is_never_offered(name_index: u8, upper: bool) -> TestResult {
    const NAMES: &[&str] = &["Text", "CssClass", "Enabled", "ToolTip", "OnClick", "ID", "runat"];
    let name = NAMES[name_index as usize % NAMES.len()];
    let typed = if upper { name.to_ascii_uppercase() } else { name.to_ascii_lowercase() };
    let marked = format!(r#"<asp:Button {}="v" |"#, typed);
    let labels = complete_at("Default.aspx", &marked);
    let base = |label: &str| label.split('=').next().unwrap_or(label).to_string();
    TestResult::from_bool(!labels.iter().any(|l| base(l).eq_ignore_ascii_case(name)))
}

#[test]
fn test_existing_attribute_exclusion_ignores_case() {
    quickcheck(existing_attribute_is_never_offered as fn(u8, bool) -> TestResult);
}
