//! Driving port for record reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Caller, Error, Record, RecordData, RecordId};

/// Domain use-case port for reading records.
///
/// Administrators see every record; other callers see only their own
/// records and any unowned ones.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordQuery<T: RecordData>: Send + Sync {
    /// Fetch a record visible to the caller.
    async fn find(&self, caller: &Caller, id: RecordId) -> Result<Option<Record<T>>, Error>;

    /// Fetch one page of records visible to the caller.
    ///
    /// Fails with `invalid_request` when the sort names an unknown field.
    async fn list(&self, caller: &Caller, request: PageRequest) -> Result<Page<Record<T>>, Error>;

    /// Run a free-text query against the search mirror.
    async fn search(&self, caller: &Caller, query: &str) -> Result<Vec<Record<T>>, Error>;
}
