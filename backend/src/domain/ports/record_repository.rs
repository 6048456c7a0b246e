//! Port for the metric store.
//!
//! One trait serves every record kind; adapters are instantiated per kind
//! and translate between [`Record`] payloads and their storage rows.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Record, RecordData, RecordId, UserLogin};

use super::define_port_error;

define_port_error! {
    /// Errors raised by metric store adapters.
    pub enum RecordRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "record repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "record repository query failed: {message}",
    }
}

/// Which owners a list request may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerScope {
    /// Every record regardless of owner.
    All,
    /// Only records owned by the given login.
    Owner(UserLogin),
}

impl OwnerScope {
    /// Whether a record owned by `owner` is visible in this scope.
    ///
    /// Unowned records are visible in every scope.
    pub fn admits(&self, owner: Option<&UserLogin>) -> bool {
        match (self, owner) {
            (Self::All, _) | (_, None) => true,
            (Self::Owner(expected), Some(actual)) => expected == actual,
        }
    }
}

/// Port for storing and retrieving records of one kind.
///
/// `list` receives a request whose sort, when present, has already been
/// checked against [`RecordData::SORT_FIELDS`]; adapters fall back to
/// [`RecordData::default_sort`] when it is absent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordRepository<T: RecordData>: Send + Sync {
    /// Persist a new record and return it with its assigned id.
    async fn insert(&self, data: &T) -> Result<Record<T>, RecordRepositoryError>;

    /// Replace an existing record. Returns `None` when the id is unknown.
    async fn update(&self, record: &Record<T>)
    -> Result<Option<Record<T>>, RecordRepositoryError>;

    /// Fetch a record by id.
    async fn find_by_id(&self, id: RecordId) -> Result<Option<Record<T>>, RecordRepositoryError>;

    /// Fetch one page of records visible in `scope`.
    async fn list(
        &self,
        request: &PageRequest,
        scope: &OwnerScope,
    ) -> Result<Page<Record<T>>, RecordRepositoryError>;

    /// Delete a record. Returns `false` when the id is unknown.
    async fn delete_by_id(&self, id: RecordId) -> Result<bool, RecordRepositoryError>;

    /// Fetch every record owned by `owner`.
    async fn find_by_owner(&self, owner: &UserLogin)
    -> Result<Vec<Record<T>>, RecordRepositoryError>;
}

/// Fixture repository that stores nothing.
///
/// Inserts echo the payload back with id `1`; lookups find nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecordRepository;

#[async_trait]
impl<T: RecordData> RecordRepository<T> for FixtureRecordRepository {
    async fn insert(&self, data: &T) -> Result<Record<T>, RecordRepositoryError> {
        Ok(Record::new(RecordId::new(1), data.clone()))
    }

    async fn update(
        &self,
        _record: &Record<T>,
    ) -> Result<Option<Record<T>>, RecordRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: RecordId) -> Result<Option<Record<T>>, RecordRepositoryError> {
        Ok(None)
    }

    async fn list(
        &self,
        request: &PageRequest,
        _scope: &OwnerScope,
    ) -> Result<Page<Record<T>>, RecordRepositoryError> {
        Ok(Page::new(Vec::new(), 0, request.clone()))
    }

    async fn delete_by_id(&self, _id: RecordId) -> Result<bool, RecordRepositoryError> {
        Ok(false)
    }

    async fn find_by_owner(
        &self,
        _owner: &UserLogin,
    ) -> Result<Vec<Record<T>>, RecordRepositoryError> {
        Ok(Vec::new())
    }
}
