//! Port for the search mirror.
//!
//! The mirror holds a search-optimised copy of every stored record. Documents
//! travel as JSON so one adapter can serve every record kind; each document
//! carries the record id under `id`.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{RecordId, RecordKind};

use super::define_port_error;
use super::record_repository::OwnerScope;

define_port_error! {
    /// Errors raised by search mirror adapters.
    pub enum SearchMirrorError {
        /// The search engine could not be reached.
        Unavailable { message: String } =>
            "search mirror unavailable: {message}",
        /// The search engine rejected the request.
        Rejected { message: String } =>
            "search mirror rejected request: {message}",
    }
}

/// Port for keeping the search index in step with the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchMirror: Send + Sync {
    /// Insert or replace the document for `id`.
    async fn index(
        &self,
        kind: RecordKind,
        id: RecordId,
        document: &Value,
    ) -> Result<(), SearchMirrorError>;

    /// Remove the document for `id`. Removing an unknown id succeeds.
    async fn remove(&self, kind: RecordKind, id: RecordId) -> Result<(), SearchMirrorError>;

    /// Run a free-text query and return matching documents.
    ///
    /// With [`OwnerScope::Owner`] only documents whose `user` matches are
    /// returned; the restriction is applied by the index before any hit
    /// limit.
    async fn search(
        &self,
        kind: RecordKind,
        query: &str,
        scope: &OwnerScope,
    ) -> Result<Vec<Value>, SearchMirrorError>;
}

/// Mirror that accepts every write and finds nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSearchMirror;

#[async_trait]
impl SearchMirror for NoOpSearchMirror {
    async fn index(
        &self,
        _kind: RecordKind,
        _id: RecordId,
        _document: &Value,
    ) -> Result<(), SearchMirrorError> {
        Ok(())
    }

    async fn remove(&self, _kind: RecordKind, _id: RecordId) -> Result<(), SearchMirrorError> {
        Ok(())
    }

    async fn search(
        &self,
        _kind: RecordKind,
        _query: &str,
        _scope: &OwnerScope,
    ) -> Result<Vec<Value>, SearchMirrorError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn no_op_mirror_accepts_writes_and_finds_nothing() {
        let mirror = NoOpSearchMirror;
        mirror
            .index(RecordKind::Weight, RecordId::new(1), &json!({"id": 1}))
            .await
            .expect("index accepted");
        mirror
            .remove(RecordKind::Weight, RecordId::new(1))
            .await
            .expect("remove accepted");
        let hits = mirror
            .search(RecordKind::Weight, "anything", &OwnerScope::All)
            .await
            .expect("search accepted");
        assert!(hits.is_empty());
    }

    #[test]
    fn errors_format_messages() {
        let err = SearchMirrorError::rejected("index not found");
        assert_eq!(
            err.to_string(),
            "search mirror rejected request: index not found"
        );
    }
}
