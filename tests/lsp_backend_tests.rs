use std::fs;

use indoc::indoc;
use serde_json::json;
use tower_lsp::lsp_types::{
    CompletionParams, CompletionResponse, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, DocumentSymbolParams, DocumentSymbolResponse, ExecuteCommandParams,
    InitializeParams, PartialResultParams, Position, Range, TextDocumentContentChangeEvent,
    TextDocumentIdentifier, TextDocumentItem, TextDocumentPositionParams, Url,
    VersionedTextDocumentIdentifier, WorkDoneProgressParams, WorkspaceFolder,
};
use tower_lsp::{LanguageServer, LspService};

use aspnet_language_server::config::ServerConfig;
use aspnet_language_server::lsp::features::adapters::BuilderRegistry;
use aspnet_language_server::lsp::features::completion::{SuggestedHandler, INSERT_EVENT_HANDLER_COMMAND};
use aspnet_language_server::lsp::AspNetBackend;
use aspnet_language_server::type_system::TypeSystem;

const SITE_INDEX: &str = r#"{ "types": [
    { "namespace": "Site", "name": "Default", "baseType": "System.Web.UI.Page",
      "methods": [
        { "name": "Page_Load", "parameters": [
            { "name": "sender", "type": "System.Object" }, { "name": "e", "type": "System.EventArgs" } ] }
      ] }
] }"#;

const CODE_FILE: &str = indoc! {"
    using System;

    namespace Site
    {
        public partial class Default : System.Web.UI.Page
        {
            protected void Page_Load(object sender, EventArgs e)
            {
            }
        }
    }
"};

const PAGE: &str = indoc! {r#"
    <%@ Page Language="C#" Inherits="Site.Default" CodeFile="Default.aspx.cs" %>
    <form id="form1" runat="server">
        <asp:Button ID="Save" runat="server" OnClick="" />
    </form>
"#};

fn service() -> (LspService<AspNetBackend>, tower_lsp::ClientSocket) {
    LspService::new(|client| {
        AspNetBackend::new(
            client,
            ServerConfig::default(),
            BuilderRegistry::with_defaults(),
            TypeSystem::bundled().unwrap(),
        )
    })
}

fn open_params(uri: &Url, text: &str) -> DidOpenTextDocumentParams {
    DidOpenTextDocumentParams {
        text_document: TextDocumentItem {
            uri: uri.clone(),
            language_id: "aspx".to_string(),
            version: 1,
            text: text.to_string(),
        },
    }
}

fn completion_params(uri: &Url, position: Position) -> CompletionParams {
    CompletionParams {
        text_document_position: TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
            position,
        },
        work_done_progress_params: WorkDoneProgressParams::default(),
        partial_result_params: PartialResultParams::default(),
        context: None,
    }
}

fn completion_labels(response: Option<CompletionResponse>) -> Vec<String> {
    match response {
        Some(CompletionResponse::Array(items)) => items.into_iter().map(|i| i.label).collect(),
        Some(CompletionResponse::List(list)) => list.items.into_iter().map(|i| i.label).collect(),
        None => Vec::new(),
    }
}

#[allow(deprecated)]
fn initialize_params(root: &Url) -> InitializeParams {
    InitializeParams {
        workspace_folders: Some(vec![WorkspaceFolder { uri: root.clone(), name: "site".to_string() }]),
        initialization_options: Some(json!({ "clrVersion": "4.0" })),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_initialize_advertises_capabilities() {
    let (service, _socket) = service();
    let dir = tempfile::tempdir().unwrap();
    let root = Url::from_directory_path(dir.path()).unwrap();

    let result = service.inner().initialize(initialize_params(&root)).await.unwrap();
    let capabilities = result.capabilities;
    assert!(capabilities.completion_provider.is_some());
    assert!(capabilities.signature_help_provider.is_some());
    assert!(capabilities.document_symbol_provider.is_some());
    let commands = capabilities.execute_command_provider.unwrap().commands;
    assert_eq!(commands, vec![INSERT_EVENT_HANDLER_COMMAND.to_string()]);
}

#[tokio::test]
async fn test_document_lifecycle_and_completion() {
    let (service, _socket) = service();
    let backend = service.inner();
    let uri = Url::parse("file:///site/Default.aspx").unwrap();

    backend.did_open(open_params(&uri, "<asp:Button  />")).await;
    assert_eq!(backend.document_count(), 1);

    let labels = completion_labels(
        backend
            .completion(completion_params(&uri, Position { line: 0, character: 12 }))
            .await
            .unwrap(),
    );
    assert!(labels.contains(&"Text".to_string()));
    assert!(labels.contains(&"OnClick".to_string()));

    backend
        .did_change(DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier { uri: uri.clone(), version: 2 },
            content_changes: vec![TextDocumentContentChangeEvent {
                range: Some(Range {
                    start: Position { line: 0, character: 12 },
                    end: Position { line: 0, character: 12 },
                }),
                range_length: None,
                text: "Text=\"Go\" ".to_string(),
            }],
        })
        .await;
    let snapshot = backend.snapshot(&uri).unwrap();
    assert_eq!(snapshot.version, 2);
    assert_eq!(snapshot.text(), "<asp:Button Text=\"Go\"  />");

    let labels = completion_labels(
        backend
            .completion(completion_params(&uri, Position { line: 0, character: 22 }))
            .await
            .unwrap(),
    );
    assert!(!labels.contains(&"Text".to_string()));

    backend
        .did_close(DidCloseTextDocumentParams { text_document: TextDocumentIdentifier { uri } })
        .await;
    assert_eq!(backend.document_count(), 0);
}

#[tokio::test]
async fn test_stale_change_is_ignored() {
    let (service, _socket) = service();
    let backend = service.inner();
    let uri = Url::parse("file:///site/Default.aspx").unwrap();
    backend.did_open(open_params(&uri, "<p></p>")).await;

    backend
        .did_change(DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier { uri: uri.clone(), version: 1 },
            content_changes: vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: "<div></div>".to_string(),
            }],
        })
        .await;
    assert_eq!(backend.snapshot(&uri).unwrap().text(), "<p></p>");
}

#[tokio::test]
async fn test_out_of_bounds_change_drops_document() {
    let (service, _socket) = service();
    let backend = service.inner();
    let uri = Url::parse("file:///site/Default.aspx").unwrap();
    backend.did_open(open_params(&uri, "<p></p>")).await;

    backend
        .did_change(DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier { uri: uri.clone(), version: 2 },
            content_changes: vec![TextDocumentContentChangeEvent {
                range: Some(Range {
                    start: Position { line: 5, character: 0 },
                    end: Position { line: 5, character: 0 },
                }),
                range_length: None,
                text: "<div></div>".to_string(),
            }],
        })
        .await;
    assert!(backend.snapshot(&uri).is_none());
    assert_eq!(backend.document_count(), 0);

    let response = backend
        .completion(completion_params(&uri, Position { line: 0, character: 1 }))
        .await
        .unwrap();
    assert!(response.is_none());
}

#[tokio::test]
async fn test_document_symbols() {
    let (service, _socket) = service();
    let backend = service.inner();
    let uri = Url::parse("file:///site/Default.aspx").unwrap();
    backend.did_open(open_params(&uri, PAGE)).await;

    let response = backend
        .document_symbol(DocumentSymbolParams {
            text_document: TextDocumentIdentifier { uri },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        })
        .await
        .unwrap();
    let Some(DocumentSymbolResponse::Nested(symbols)) = response else {
        panic!("expected nested symbols");
    };
    let names: Vec<_> = symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["<%@ Page %>", "<form#form1>"]);
    assert_eq!(symbols[1].children.as_ref().unwrap()[0].name, "<asp:Button#Save>");
}

#[tokio::test]
async fn test_workspace_index_and_handler_insertion() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Site.typeindex.json"), SITE_INDEX).unwrap();
    fs::write(dir.path().join("Default.aspx.cs"), CODE_FILE).unwrap();
    fs::write(dir.path().join("Default.aspx"), PAGE).unwrap();

    let (service, _socket) = service();
    let backend = service.inner();
    let root = Url::from_directory_path(dir.path()).unwrap();
    backend.initialize(initialize_params(&root)).await.unwrap();

    let uri = Url::from_file_path(dir.path().join("Default.aspx")).unwrap();
    backend.did_open(open_params(&uri, PAGE)).await;

    // inside OnClick=""
    let response = backend
        .completion(completion_params(&uri, Position { line: 2, character: 50 }))
        .await
        .unwrap();
    let Some(CompletionResponse::Array(items)) = response else {
        panic!("expected handler completions");
    };
    let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["Page_Load", "Save_Click"]);

    let command = items[1].command.clone().unwrap();
    assert_eq!(command.command, INSERT_EVENT_HANDLER_COMMAND);
    let handler: SuggestedHandler =
        serde_json::from_value(command.arguments.unwrap().remove(0)).unwrap();
    assert_eq!(handler.document_uri.as_ref(), Some(&uri));

    let edit = backend.event_handler_edit(&handler).await.unwrap();
    let code_uri = Url::from_file_path(dir.path().join("Default.aspx.cs")).unwrap();
    let changes = edit.changes.unwrap();
    let edits = &changes[&code_uri];
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].range.start, Position { line: 9, character: 0 });
    assert!(edits[0].new_text.contains("Save_Click(object sender, System.EventArgs e)"));
}

#[tokio::test]
async fn test_handler_edit_without_code_file_fails() {
    let (service, _socket) = service();
    let backend = service.inner();
    let uri = Url::parse("file:///site/Default.aspx").unwrap();
    backend.did_open(open_params(&uri, "<%@ Page Inherits=\"Site.Default\" %>")).await;

    let handler = SuggestedHandler {
        handler_name: "Save_Click".to_string(),
        event_name: "Click".to_string(),
        delegate_type: "System.EventHandler".to_string(),
        parameters: Vec::new(),
        class_name: "Site.Default".to_string(),
        document_uri: Some(uri),
    };
    let error = backend.event_handler_edit(&handler).await.unwrap_err();
    assert!(error.to_string().contains("CodeFile"));
}

#[tokio::test]
async fn test_unknown_command_is_rejected() {
    let (service, _socket) = service();
    let result = service
        .inner()
        .execute_command(ExecuteCommandParams {
            command: "aspnet.unknown".to_string(),
            arguments: Vec::new(),
            work_done_progress_params: WorkDoneProgressParams::default(),
        })
        .await;
    assert!(result.is_err());

    let result = service
        .inner()
        .execute_command(ExecuteCommandParams {
            command: INSERT_EVENT_HANDLER_COMMAND.to_string(),
            arguments: vec![json!(42)],
            work_done_progress_params: WorkDoneProgressParams::default(),
        })
        .await;
    assert!(result.is_err());
}
