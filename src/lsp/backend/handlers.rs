//! LSP protocol handler implementations
//!
//! - Lifecycle: initialize, initialized, shutdown
//! - Document sync: did_open, did_change, did_close
//! - Features: completion, signature_help, document_symbol
//! - Commands: execute_command for `aspnet.insertEventHandler`

use std::sync::Arc;

use serde_json::Value;
use tower_lsp::LanguageServer;
use tower_lsp::jsonrpc::{self, Result as LspResult};
use tower_lsp::lsp_types::{
    CompletionOptions, CompletionParams, CompletionResponse, DidChangeTextDocumentParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, DocumentSymbolParams,
    DocumentSymbolResponse, ExecuteCommandOptions, ExecuteCommandParams, InitializeParams,
    InitializeResult, InitializedParams, MessageType, OneOf, ServerCapabilities, ServerInfo,
    SignatureHelp, SignatureHelpOptions, SignatureHelpParams, TextDocumentSyncCapability,
    TextDocumentSyncKind,
};
use tracing::{debug, error, info, warn};

use crate::errors::DocumentError;
use crate::lsp::document::DocumentSnapshot;
use crate::lsp::features::completion::entry::{SuggestedHandler, INSERT_EVENT_HANDLER_COMMAND};
use crate::lsp::features::completion::{complete, signature_help};
use crate::lsp::features::document_symbols::{document_symbols, OutlineOptions};

use super::state::AspNetBackend;

pub const COMPLETION_TRIGGERS: &[&str] = &["<", " ", "=", "\"", "'", ".", "@", "/", ":"];
pub const SIGNATURE_TRIGGERS: &[&str] = &["(", ","];

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tower_lsp::async_trait]
impl LanguageServer for AspNetBackend {
    /// Reads client options, records the workspace root and loads the type index.
    async fn initialize(&self, params: InitializeParams) -> LspResult<InitializeResult> {
        info!("Received initialize from {:?}", params.client_info.as_ref().map(|c| &c.name));

        {
            let mut config = self.config.write().await;
            *config = config.from_env_or_default(params.initialization_options.as_ref());
            debug!("Effective configuration: {:?}", *config);
        }

        #[allow(deprecated)]
        let root_uri = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .map(|folder| folder.uri.clone())
            .or(params.root_uri);
        if let Some(root_uri) = root_uri {
            match root_uri.to_file_path() {
                Ok(path) => *self.root_dir.write().await = Some(path),
                Err(_) => warn!("Workspace root {} is not a file path", root_uri),
            }
        }

        self.reload_type_index().await;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(to_strings(COMPLETION_TRIGGERS)),
                    resolve_provider: Some(false),
                    ..Default::default()
                }),
                signature_help_provider: Some(SignatureHelpOptions {
                    trigger_characters: Some(to_strings(SIGNATURE_TRIGGERS)),
                    retrigger_characters: None,
                    work_done_progress_options: Default::default(),
                }),
                document_symbol_provider: Some(OneOf::Left(true)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![INSERT_EVENT_HANDLER_COMMAND.to_string()],
                    work_done_progress_options: Default::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        info!("Initialized");
        self.client
            .log_message(MessageType::INFO, "ASP.NET language server ready")
            .await;
    }

    async fn shutdown(&self) -> LspResult<()> {
        info!("Received shutdown request");
        self.documents.clear();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        info!("Opening document: URI={}, version={}", document.uri, document.version);
        let snapshot = DocumentSnapshot::new(document.uri.clone(), document.version, &document.text);
        self.documents.insert(document.uri, Arc::new(snapshot));
    }

    /// Applies the edits to the stored snapshot and replaces it.
    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        let Some(current) = self.snapshot(&uri) else {
            warn!("didChange for unknown document {}", uri);
            return;
        };
        match current.apply(&params.content_changes, version) {
            Ok(next) => {
                debug!("Updated {} to version {}", uri, version);
                self.documents.insert(uri, Arc::new(next));
            }
            Err(e @ DocumentError::StaleVersion { .. }) => debug!("Ignoring change to {}: {}", uri, e),
            Err(e) => {
                error!("Failed to apply changes to {}, dropping document: {}", uri, e);
                self.documents.remove(&uri);
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        if self.documents.remove(&uri).is_some() {
            info!("Closed document: {}", uri);
        }
    }

    async fn completion(&self, params: CompletionParams) -> LspResult<Option<CompletionResponse>> {
        let position = params.text_document_position.position;
        let uri = params.text_document_position.text_document.uri;
        let Some(snapshot) = self.snapshot(&uri) else {
            debug!("Completion for unknown document {}", uri);
            return Ok(None);
        };
        let trigger = params
            .context
            .and_then(|c| c.trigger_character)
            .and_then(|t| t.chars().next());

        let types = self.types.read().await;
        let config = self.config.read().await;
        match complete(&snapshot, position, trigger, self.services(&types, &config)) {
            Ok(entries) if entries.is_empty() => Ok(None),
            Ok(entries) => {
                debug!("Returning {} completions for {}", entries.len(), uri);
                let items = entries.into_iter().map(|e| e.into_completion_item(Some(&uri))).collect();
                Ok(Some(CompletionResponse::Array(items)))
            }
            Err(e) => {
                warn!("Completion failed for {}: {}", uri, e);
                Ok(None)
            }
        }
    }

    async fn signature_help(&self, params: SignatureHelpParams) -> LspResult<Option<SignatureHelp>> {
        let position = params.text_document_position_params.position;
        let uri = params.text_document_position_params.text_document.uri;
        let Some(snapshot) = self.snapshot(&uri) else {
            return Ok(None);
        };
        let types = self.types.read().await;
        let config = self.config.read().await;
        signature_help(&snapshot, position, self.services(&types, &config)).or_else(|e| {
            warn!("Signature help failed for {}: {}", uri, e);
            Ok(None)
        })
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> LspResult<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri;
        let Some(snapshot) = self.snapshot(&uri) else {
            debug!("Document not found: {}", uri);
            return Ok(None);
        };
        let options = OutlineOptions {
            tag_column_offset: self.config.read().await.outline_tag_column_offset,
        };
        Ok(Some(DocumentSymbolResponse::Nested(document_symbols(&snapshot.root, options))))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> LspResult<Option<Value>> {
        if params.command != INSERT_EVENT_HANDLER_COMMAND {
            return Err(jsonrpc::Error::method_not_found());
        }
        let handler: SuggestedHandler = params
            .arguments
            .into_iter()
            .next()
            .and_then(|arg| serde_json::from_value(arg).ok())
            .ok_or_else(|| jsonrpc::Error::invalid_params("expected a suggested handler"))?;

        let edit = match self.event_handler_edit(&handler).await {
            Ok(edit) => edit,
            Err(e) => {
                warn!("Cannot insert {}: {:#}", handler.handler_name, e);
                self.client
                    .show_message(MessageType::WARNING, format!("Cannot insert event handler: {:#}", e))
                    .await;
                return Ok(None);
            }
        };
        match self.client.apply_edit(edit).await {
            Ok(response) if !response.applied => {
                warn!("Client rejected handler insertion: {:?}", response.failure_reason)
            }
            Ok(_) => info!("Inserted event handler {}", handler.handler_name),
            Err(e) => error!("workspace/applyEdit failed: {}", e),
        }
        Ok(None)
    }
}
