//! LSP protocol handler implementations
//!
//! This module contains the `tower_lsp::LanguageServer` implementation for
//! the UTS backend:
//! - Lifecycle handlers (initialize, initialized, shutdown)
//! - Document lifecycle (did_open, did_change, did_close) and configuration
//! - Navigation handlers (goto_definition, references, document_symbol)
//! - Information providers (completion, hover, signature_help)

use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::{
    CompletionOptions, CompletionParams, CompletionResponse, DidChangeConfigurationParams,
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DocumentSymbolParams, DocumentSymbolResponse, GotoDefinitionParams, GotoDefinitionResponse,
    Hover, HoverParams, HoverProviderCapability, InitializeParams, InitializeResult,
    InitializedParams, Location, OneOf, ReferenceParams, ServerCapabilities, ServerInfo,
    SignatureHelp, SignatureHelpOptions, SignatureHelpParams, TextDocumentSyncCapability,
    TextDocumentSyncKind,
};
use tower_lsp::{LanguageServer, jsonrpc};
use tracing::{debug, info, warn};

use super::state::UtsBackend;
use crate::config::ServerConfig;
use crate::lsp::document::TextDocument;

fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL)),
        completion_provider: Some(CompletionOptions {
            trigger_characters: Some([".", ":", " ", "("].iter().map(|c| c.to_string()).collect()),
            ..Default::default()
        }),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        definition_provider: Some(OneOf::Left(true)),
        references_provider: Some(OneOf::Left(true)),
        document_symbol_provider: Some(OneOf::Left(true)),
        signature_help_provider: Some(SignatureHelpOptions {
            trigger_characters: Some(vec!["(".to_string(), ",".to_string()]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for UtsBackend {
    /// Handles the LSP initialize request, merging `initializationOptions`
    /// into the configuration and advertising capabilities.
    async fn initialize(&self, params: InitializeParams) -> jsonrpc::Result<InitializeResult> {
        info!("Received initialize from {:?}", params.client_info.as_ref().map(|c| &c.name));

        if params.initialization_options.is_some() {
            self.service
                .reconfigure(ServerConfig::from_env_or_default(params.initialization_options.as_ref()));
        }

        Ok(InitializeResult {
            capabilities: server_capabilities(),
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        info!("Initialized with {:?}", self.service.config());
    }

    /// Handles the LSP shutdown request.
    async fn shutdown(&self) -> LspResult<()> {
        info!("Received shutdown request");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        info!("Opening document: URI={}, version={}", uri, version);

        let text = params.text_document.text;
        self.documents.insert(uri.clone(), TextDocument::new(&text, version));
        self.publish_validation(uri, &text, Some(version)).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        debug!("textDocument/didChange: URI={}, version={}", uri, version);

        let text = match self.documents.get_mut(&uri) {
            Some(mut document) => match document.apply(&params.content_changes, version) {
                Ok(()) => document.content(),
                Err(e) => {
                    warn!("Failed to apply changes to {}: {}", uri, e);
                    return;
                }
            },
            None => {
                warn!("Failed to find document with URI={}", uri);
                return;
            }
        };
        self.publish_validation(uri, &text, Some(version)).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        info!("Closing document: URI={}", uri);
        let last_text = self.documents.remove(&uri).map(|(_, document)| document.content());
        if last_text.is_none() {
            warn!("Failed to find document with URI={}", uri);
        }
        self.service.close(&uri, last_text.as_deref());
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    /// Accepts either `{ "uts": { ... } }` or the settings object itself.
    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let settings = params.settings.get("uts").unwrap_or(&params.settings);
        self.service.reconfigure(ServerConfig::from_env_or_default(Some(settings)));

        let open: Vec<_> = self
            .documents
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().content(), entry.value().version))
            .collect();
        for (uri, text, version) in open {
            self.publish_validation(uri, &text, Some(version)).await;
        }
    }

    async fn completion(&self, params: CompletionParams) -> LspResult<Option<CompletionResponse>> {
        let position = params.text_document_position.position;
        let uri = params.text_document_position.text_document.uri;
        let trigger = params.context.and_then(|c| c.trigger_character);

        let items = self.with_text(&uri, position, |text| {
            self.service.complete(text, position, trigger.as_deref())
        });
        Ok(items.map(CompletionResponse::Array))
    }

    async fn hover(&self, params: HoverParams) -> LspResult<Option<Hover>> {
        let position = params.text_document_position_params.position;
        let uri = params.text_document_position_params.text_document.uri;
        Ok(self.with_text(&uri, position, |text| self.service.hover(text, position)).flatten())
    }

    async fn goto_definition(&self, params: GotoDefinitionParams) -> LspResult<Option<GotoDefinitionResponse>> {
        let position = params.text_document_position_params.position;
        let uri = params.text_document_position_params.text_document.uri;
        let location = self
            .with_text(&uri, position, |text| self.service.define(&uri, text, position))
            .flatten();
        Ok(location.map(GotoDefinitionResponse::Scalar))
    }

    async fn references(&self, params: ReferenceParams) -> LspResult<Option<Vec<Location>>> {
        let position = params.text_document_position.position;
        let uri = params.text_document_position.text_document.uri;
        Ok(self.with_text(&uri, position, |text| self.service.references(&uri, text, position)))
    }

    async fn document_symbol(&self, params: DocumentSymbolParams) -> LspResult<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri;
        let symbols = self.text_of(&uri).map(|text| self.service.symbols(&uri, &text));
        Ok(symbols.map(DocumentSymbolResponse::Flat))
    }

    async fn signature_help(&self, params: SignatureHelpParams) -> LspResult<Option<SignatureHelp>> {
        let position = params.text_document_position_params.position;
        let uri = params.text_document_position_params.text_document.uri;
        Ok(self.with_text(&uri, position, |text| self.service.signature_help(text, position)).flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities() {
        let capabilities = server_capabilities();
        let triggers = capabilities
            .completion_provider
            .and_then(|c| c.trigger_characters)
            .unwrap_or_default();
        assert_eq!(triggers, vec![".", ":", " ", "("]);
        assert_eq!(
            capabilities.signature_help_provider.and_then(|s| s.trigger_characters),
            Some(vec!["(".to_string(), ",".to_string()])
        );
        assert_eq!(
            capabilities.text_document_sync,
            Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL))
        );
    }
}
