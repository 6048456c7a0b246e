//! Record domain services.
//!
//! [`RecordService`] implements the command and query driving ports for every
//! record kind. Writes go to the store first and then to the search mirror;
//! the mirror step is best-effort and its result is surfaced through
//! `mirror_synced`.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::ports::{
    DeleteOutcome, OwnerScope, RecordCommand, RecordQuery, RecordRepository,
    RecordRepositoryError, SearchMirror, WriteOutcome,
};
use crate::domain::{Caller, Error, Record, RecordData, RecordId};

/// Map store failures onto domain errors.
pub(crate) fn map_repository_error(error: RecordRepositoryError) -> Error {
    match error {
        RecordRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("record store unavailable: {message}"))
        }
        RecordRepositoryError::Query { message } => {
            Error::internal(format!("record store error: {message}"))
        }
    }
}

/// Whether `caller` may see or modify `record`.
fn is_visible_to<T: RecordData>(caller: &Caller, record: &Record<T>) -> bool {
    caller.is_admin()
        || record
            .data
            .owner()
            .is_none_or(|owner| owner == caller.login())
}

fn scope_for(caller: &Caller) -> OwnerScope {
    if caller.is_admin() {
        OwnerScope::All
    } else {
        OwnerScope::Owner(caller.login().clone())
    }
}

fn search_scope<T: RecordData>(caller: &Caller) -> OwnerScope {
    if T::KIND.is_owned() {
        scope_for(caller)
    } else {
        OwnerScope::All
    }
}

/// Record service backed by a metric store and a search mirror.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use health_points::domain::ports::{FixtureRecordRepository, NoOpSearchMirror};
/// use health_points::domain::RecordService;
///
/// let service = RecordService::new(Arc::new(FixtureRecordRepository), Arc::new(NoOpSearchMirror));
/// # let _ = service;
/// ```
pub struct RecordService<R: ?Sized, M: ?Sized> {
    repository: Arc<R>,
    mirror: Arc<M>,
}

impl<R: ?Sized, M: ?Sized> Clone for RecordService<R, M> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            mirror: Arc::clone(&self.mirror),
        }
    }
}

impl<R: ?Sized, M: ?Sized> RecordService<R, M> {
    /// Create a service over the given store and mirror.
    pub fn new(repository: Arc<R>, mirror: Arc<M>) -> Self {
        Self { repository, mirror }
    }
}

impl<R, M> RecordService<R, M>
where
    R: ?Sized,
    M: SearchMirror + ?Sized,
{
    async fn mirror_index<T: RecordData>(&self, record: &Record<T>) -> bool {
        let document = match serde_json::to_value(record) {
            Ok(document) => document,
            Err(error) => {
                warn!(
                    kind = %T::KIND,
                    id = %record.id,
                    %error,
                    "failed to serialise record for search mirror"
                );
                return false;
            }
        };
        match self.mirror.index(T::KIND, record.id, &document).await {
            Ok(()) => true,
            Err(error) => {
                warn!(kind = %T::KIND, id = %record.id, %error, "search mirror index failed");
                false
            }
        }
    }

    async fn mirror_remove<T: RecordData>(&self, id: RecordId) -> bool {
        match self.mirror.remove(T::KIND, id).await {
            Ok(()) => true,
            Err(error) => {
                warn!(kind = %T::KIND, %id, %error, "search mirror remove failed");
                false
            }
        }
    }
}

impl<R, M> RecordService<R, M>
where
    R: ?Sized,
    M: ?Sized,
{
    async fn find_visible<T>(&self, caller: &Caller, id: RecordId) -> Result<Option<Record<T>>, Error>
    where
        T: RecordData,
        R: RecordRepository<T>,
    {
        let record = self
            .repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?;
        Ok(record.filter(|record| is_visible_to(caller, record)))
    }
}

fn apply_write_scope<T: RecordData>(caller: &Caller, data: &mut T) {
    if T::KIND.is_owned() && !caller.is_admin() {
        data.assign_owner(caller.login().clone());
    }
}

fn resolve_sort<T: RecordData>(request: PageRequest) -> Result<PageRequest, Error> {
    let Some(sort) = request.sort() else {
        return Ok(request.with_sort(T::default_sort()));
    };
    if sort.field() == "id" {
        return Ok(request);
    }
    match sort.ensure_allowed(T::SORT_FIELDS) {
        Ok(()) => Ok(request),
        Err(err) => Err(Error::invalid_request(err.to_string()).with_details(json!({
            "field": "sort",
            "value": sort.field(),
            "code": "unknown_sort_field",
        }))),
    }
}

#[async_trait]
impl<T, R, M> RecordCommand<T> for RecordService<R, M>
where
    T: RecordData,
    R: RecordRepository<T> + ?Sized,
    M: SearchMirror + ?Sized,
{
    async fn create(&self, caller: &Caller, mut data: T) -> Result<WriteOutcome<T>, Error> {
        apply_write_scope(caller, &mut data);
        let record = self
            .repository
            .insert(&data)
            .await
            .map_err(map_repository_error)?;
        let mirror_synced = self.mirror_index(&record).await;
        debug!(kind = %T::KIND, id = %record.id, mirror_synced, "record created");
        Ok(WriteOutcome {
            record,
            mirror_synced,
        })
    }

    async fn update(&self, caller: &Caller, mut record: Record<T>) -> Result<WriteOutcome<T>, Error> {
        let id = record.id;
        let not_found = || Error::not_found(format!("{} {id} not found", T::KIND));
        if self.find_visible::<T>(caller, id).await?.is_none() {
            return Err(not_found());
        }
        apply_write_scope(caller, &mut record.data);
        let stored = self
            .repository
            .update(&record)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(not_found)?;
        let mirror_synced = self.mirror_index(&stored).await;
        debug!(kind = %T::KIND, id = %stored.id, mirror_synced, "record updated");
        Ok(WriteOutcome {
            record: stored,
            mirror_synced,
        })
    }

    async fn delete(&self, caller: &Caller, id: RecordId) -> Result<Option<DeleteOutcome>, Error> {
        if self.find_visible::<T>(caller, id).await?.is_none() {
            return Ok(None);
        }
        let deleted = self
            .repository
            .delete_by_id(id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Ok(None);
        }
        let mirror_synced = self.mirror_remove::<T>(id).await;
        debug!(kind = %T::KIND, %id, mirror_synced, "record deleted");
        Ok(Some(DeleteOutcome { id, mirror_synced }))
    }
}

#[async_trait]
impl<T, R, M> RecordQuery<T> for RecordService<R, M>
where
    T: RecordData,
    R: RecordRepository<T> + ?Sized,
    M: SearchMirror + ?Sized,
{
    async fn find(&self, caller: &Caller, id: RecordId) -> Result<Option<Record<T>>, Error> {
        self.find_visible(caller, id).await
    }

    async fn list(&self, caller: &Caller, request: PageRequest) -> Result<Page<Record<T>>, Error> {
        let request = resolve_sort::<T>(request)?;
        self.repository
            .list(&request, &scope_for(caller))
            .await
            .map_err(map_repository_error)
    }

    async fn search(&self, caller: &Caller, query: &str) -> Result<Vec<Record<T>>, Error> {
        let hits = self
            .mirror
            .search(T::KIND, query, &search_scope::<T>(caller))
            .await
            .map_err(|err| Error::service_unavailable(format!("search unavailable: {err}")))?;
        let records = hits
            .into_iter()
            .filter_map(|hit| match serde_json::from_value::<Record<T>>(hit) {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!(kind = %T::KIND, %error, "skipping malformed search hit");
                    None
                }
            })
            .filter(|record| is_visible_to(caller, record))
            .collect();
        Ok(records)
    }
}

#[cfg(test)]
#[path = "records_service_tests.rs"]
mod tests;
