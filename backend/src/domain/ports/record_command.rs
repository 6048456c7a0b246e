//! Driving port for record writes.
//!
//! Inbound adapters call this port to create, replace, and delete records on
//! behalf of an explicit caller. Implementations write the store first and
//! then the search mirror; a mirror failure is reported through the outcome
//! rather than as an error.

use async_trait::async_trait;

use crate::domain::{Caller, Error, Record, RecordData, RecordId};

/// Result of a successful create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome<T> {
    /// The stored record.
    pub record: Record<T>,
    /// Whether the search mirror accepted the change.
    pub mirror_synced: bool,
}

/// Result of a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Identifier of the removed record.
    pub id: RecordId,
    /// Whether the search mirror dropped its copy.
    pub mirror_synced: bool,
}

/// Domain use-case port for record mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordCommand<T: RecordData>: Send + Sync {
    /// Store a new record. Owned records are assigned to the caller unless
    /// the caller is an administrator naming another owner.
    async fn create(&self, caller: &Caller, data: T) -> Result<WriteOutcome<T>, Error>;

    /// Replace an existing record.
    ///
    /// Fails with `not_found` when the id does not exist or belongs to
    /// another user and the caller is not an administrator.
    async fn update(&self, caller: &Caller, record: Record<T>) -> Result<WriteOutcome<T>, Error>;

    /// Delete a record. Returns `None` when there was nothing to delete.
    async fn delete(&self, caller: &Caller, id: RecordId) -> Result<Option<DeleteOutcome>, Error>;
}
