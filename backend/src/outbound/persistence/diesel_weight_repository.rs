//! PostgreSQL-backed weight store using Diesel ORM.
//!
//! Implements both [`RecordRepository`] for CRUD and paging and
//! [`ReadingsRangeRepository`] for trailing-window lookups.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    OwnerScope, ReadingsRangeRepository, RecordRepository, RecordRepositoryError,
};
use crate::domain::{Record, RecordData, RecordId, UserLogin, WeightEntry};

use super::diesel_helpers::{map_diesel_error, map_pool_error, to_sql_bound, to_total};
use super::models::{WeightEntryRow, WeightEntryWrite};
use super::pool::DbPool;
use super::schema::weight_entries;

/// Diesel-backed store for [`WeightEntry`] measurements.
#[derive(Clone)]
pub struct DieselWeightRepository {
    pool: DbPool,
}

impl DieselWeightRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_records(
    rows: Vec<WeightEntryRow>,
) -> Result<Vec<Record<WeightEntry>>, RecordRepositoryError> {
    rows.into_iter().map(WeightEntryRow::into_record).collect()
}

#[async_trait]
impl RecordRepository<WeightEntry> for DieselWeightRepository {
    async fn insert(
        &self,
        data: &WeightEntry,
    ) -> Result<Record<WeightEntry>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: WeightEntryRow = diesel::insert_into(weight_entries::table)
            .values(WeightEntryWrite::from(data))
            .returning(WeightEntryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_record()
    }

    async fn update(
        &self,
        record: &Record<WeightEntry>,
    ) -> Result<Option<Record<WeightEntry>>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<WeightEntryRow> =
            diesel::update(weight_entries::table.find(record.id.get()))
                .set(WeightEntryWrite::from(&record.data))
                .returning(WeightEntryRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
        row.map(WeightEntryRow::into_record).transpose()
    }

    async fn find_by_id(
        &self,
        id: RecordId,
    ) -> Result<Option<Record<WeightEntry>>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<WeightEntryRow> = weight_entries::table
            .find(id.get())
            .select(WeightEntryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(WeightEntryRow::into_record).transpose()
    }

    async fn list(
        &self,
        request: &PageRequest,
        scope: &OwnerScope,
    ) -> Result<Page<Record<WeightEntry>>, RecordRepositoryError> {
        let limit = to_sql_bound(u64::from(request.size()))?;
        let offset = to_sql_bound(request.offset())?;
        let default_sort = WeightEntry::default_sort();
        let sort = request.sort().unwrap_or(&default_sort);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut count_query = weight_entries::table.select(count_star()).into_boxed();
        let mut query = weight_entries::table
            .select(WeightEntryRow::as_select())
            .into_boxed();
        if let OwnerScope::Owner(login) = scope {
            count_query = count_query.filter(weight_entries::user_login.eq(login.as_ref()));
            query = query.filter(weight_entries::user_login.eq(login.as_ref()));
        }

        let total: i64 = count_query
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows = crate::apply_sort!(query, sort, weight_entries::id, {
            "timestamp" => weight_entries::taken_at,
            "weight" => weight_entries::weight,
            "user" => weight_entries::user_login,
        })
        .limit(limit)
        .offset(offset)
        .load::<WeightEntryRow>(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(Page::new(into_records(rows)?, to_total(total)?, request.clone()))
    }

    async fn delete_by_id(&self, id: RecordId) -> Result<bool, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(weight_entries::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_by_owner(
        &self,
        owner: &UserLogin,
    ) -> Result<Vec<Record<WeightEntry>>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = weight_entries::table
            .filter(weight_entries::user_login.eq(owner.as_ref()))
            .order(weight_entries::id.asc())
            .select(WeightEntryRow::as_select())
            .load::<WeightEntryRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_records(rows)
    }
}

#[async_trait]
impl ReadingsRangeRepository<WeightEntry> for DieselWeightRepository {
    async fn find_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Record<WeightEntry>>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = weight_entries::table
            .filter(weight_entries::taken_at.between(start, end))
            .order((weight_entries::taken_at.desc(), weight_entries::id.asc()))
            .select(WeightEntryRow::as_select())
            .load::<WeightEntryRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_records(rows)
    }
}
