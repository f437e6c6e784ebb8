use std::sync::Arc;

use dashmap::DashMap;
use tower_lsp::Client;
use tower_lsp::lsp_types::{Position, Url};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::lsp::service::UtsLanguageService;

mod handlers;
mod state;

pub use state::UtsBackend;

impl UtsBackend {
    /// Creates a backend for `client` with the startup configuration.
    /// `initializationOptions` are merged in later, during `initialize`.
    pub fn new(client: Client, config: ServerConfig) -> Self {
        Self {
            client,
            documents: Arc::new(DashMap::new()),
            service: Arc::new(UtsLanguageService::new(config)),
        }
    }

    pub fn service(&self) -> &UtsLanguageService {
        &self.service
    }

    /// Current text of an open document.
    pub(super) fn text_of(&self, uri: &Url) -> Option<String> {
        let text = self.documents.get(uri).map(|doc| doc.content());
        if text.is_none() {
            warn!("Request for unknown document URI={}", uri);
        }
        text
    }

    /// Validates `text` and publishes the result for `uri`.
    pub(super) async fn publish_validation(&self, uri: Url, text: &str, version: Option<i32>) {
        let diagnostics = self.service.validate(&uri, text);
        debug!("Publishing {} diagnostics for {}", diagnostics.len(), uri);
        self.client.publish_diagnostics(uri, diagnostics, version).await;
    }

    /// Runs `f` against the document text, or returns `None` for unknown
    /// documents.
    pub(super) fn with_text<T>(&self, uri: &Url, position: Position, f: impl FnOnce(&str) -> T) -> Option<T> {
        let text = self.text_of(uri)?;
        debug!("Request at {:?} in {}", position, uri);
        Some(f(&text))
    }
}
