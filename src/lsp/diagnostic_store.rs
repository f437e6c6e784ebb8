//! Latest diagnostics per document
//!
//! Entries are replaced wholesale by each validation and removed when the
//! document closes. Partitioning by URI keeps concurrent validations of
//! different documents independent.

use dashmap::DashMap;
use tower_lsp::lsp_types::{Diagnostic, Url};

#[derive(Debug, Default)]
pub struct DiagnosticStore {
    entries: DashMap<Url, Vec<Diagnostic>>,
}

impl DiagnosticStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, uri: &Url, diagnostics: Vec<Diagnostic>) {
        self.entries.insert(uri.clone(), diagnostics);
    }

    pub fn clear(&self, uri: &Url) {
        self.entries.remove(uri);
    }

    pub fn get(&self, uri: &Url) -> Option<Vec<Diagnostic>> {
        self.entries.get(uri).map(|entry| entry.value().clone())
    }

    /// Number of documents with stored diagnostics.
    pub fn tracked_documents(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_and_clear() {
        let store = DiagnosticStore::new();
        let uri = Url::parse("file:///a.uts").expect("valid uri");
        let first = Diagnostic { message: "first".into(), ..Default::default() };
        let second = Diagnostic { message: "second".into(), ..Default::default() };

        store.replace(&uri, vec![first.clone(), first]);
        store.replace(&uri, vec![second.clone()]);
        assert_eq!(store.get(&uri), Some(vec![second]));
        assert_eq!(store.tracked_documents(), 1);

        store.clear(&uri);
        assert!(store.get(&uri).is_none());
        assert_eq!(store.tracked_documents(), 0);
    }
}
