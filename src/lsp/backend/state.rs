//! Backend state management
//!
//! This module defines the UtsBackend struct: the client handle, the open
//! documents and the language service every request is forwarded to.

use std::sync::Arc;

use dashmap::DashMap;
use tower_lsp::Client;
use tower_lsp::lsp_types::Url;

use crate::lsp::document::TextDocument;
use crate::lsp::service::UtsLanguageService;

/// The UTS language server backend.
#[derive(Clone)]
pub struct UtsBackend {
    pub(super) client: Client,
    pub(super) documents: Arc<DashMap<Url, TextDocument>>,
    pub(super) service: Arc<UtsLanguageService>,
}

impl std::fmt::Debug for UtsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UtsBackend")
            .field("documents_count", &self.documents.len())
            .finish()
    }
}
