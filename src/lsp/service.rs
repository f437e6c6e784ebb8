//! Transport-independent language service
//!
//! The LSP backend forwards every request here with the current document
//! text. All operations are synchronous and never fail: a capability that has
//! nothing to say returns `None` or an empty list.
//!
//! ```text
//!             ┌───────────────────────┐
//! request ──► │  UtsLanguageService    │ ──► SemanticBridge (cached models)
//!             │   config: ServerConfig │ ──► features::*
//!             │   store: Diagnostics   │
//!             └───────────────────────┘
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use tower_lsp::lsp_types::{
    CompletionItem, Diagnostic, Hover, Location, Position, SignatureHelp, SymbolInformation, Url,
};
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::lsp::diagnostic_store::DiagnosticStore;
use crate::lsp::features::{
    completion, diagnostics, document_symbols, goto_definition, hover, references, signature_help,
};
use crate::parsers::CacheStats;
use crate::semantic::{SemanticBridge, SemanticModel};

pub struct UtsLanguageService {
    bridge: RwLock<SemanticBridge>,
    store: DiagnosticStore,
    config: RwLock<ServerConfig>,
}

impl Default for UtsLanguageService {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

impl UtsLanguageService {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            bridge: RwLock::new(SemanticBridge::new(config.compile_cache_capacity)),
            store: DiagnosticStore::new(),
            config: RwLock::new(config),
        }
    }

    pub fn config(&self) -> ServerConfig {
        self.config.read().clone()
    }

    /// Replaces the configuration. A new cache capacity starts a fresh cache.
    pub fn reconfigure(&self, config: ServerConfig) {
        if self.bridge.read().capacity() != config.compile_cache_capacity {
            *self.bridge.write() = SemanticBridge::new(config.compile_cache_capacity);
        }
        info!("Configuration updated: {:?}", config);
        *self.config.write() = config;
    }

    fn model(&self, text: &str) -> Arc<SemanticModel> {
        self.bridge.read().compile(text)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.bridge.read().stats()
    }

    /// Completion items at `position`. `trigger` is the character that
    /// triggered the request, when there was one.
    pub fn complete(&self, text: &str, position: Position, trigger: Option<&str>) -> Vec<CompletionItem> {
        debug!("complete at {:?} (trigger {:?})", position, trigger);
        let options = completion::CompletionOptions { local_symbols: self.config.read().local_symbol_completions };
        completion::complete(text, position, &self.model(text), options)
    }

    pub fn hover(&self, text: &str, position: Position) -> Option<Hover> {
        hover::hover(text, position, &self.model(text))
    }

    pub fn define(&self, uri: &Url, text: &str, position: Position) -> Option<Location> {
        goto_definition::goto_definition(uri, text, position)
    }

    pub fn references(&self, uri: &Url, text: &str, position: Position) -> Vec<Location> {
        references::find_references(uri, text, position)
    }

    pub fn symbols(&self, uri: &Url, text: &str) -> Vec<SymbolInformation> {
        document_symbols::document_symbols(uri, text)
    }

    pub fn signature_help(&self, text: &str, position: Position) -> Option<SignatureHelp> {
        signature_help::signature_help(text, position)
    }

    /// Diagnostics for `text`; the result also replaces the stored entry for
    /// `uri`.
    pub fn validate(&self, uri: &Url, text: &str) -> Vec<Diagnostic> {
        let advisory = self.config.read().advisory_diagnostics;
        let result = diagnostics::validate(text, &self.model(text), advisory);
        self.store.replace(uri, result.clone());
        debug!(
            "{} diagnostics for {} ({} documents tracked)",
            result.len(),
            uri,
            self.store.tracked_documents()
        );
        result
    }

    pub fn stored_diagnostics(&self, uri: &Url) -> Option<Vec<Diagnostic>> {
        self.store.get(uri)
    }

    /// Forgets `uri`: its stored diagnostics and, when the last text is
    /// given, the compiled model for that text.
    pub fn close(&self, uri: &Url, last_text: Option<&str>) {
        self.store.clear(uri);
        if let Some(text) = last_text {
            self.bridge.read().forget(text);
        }
    }
}
