//! PostgreSQL-backed blood pressure store using Diesel ORM.
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
use crate::domain::{BloodPressure, Record, RecordData, RecordId, UserLogin};

use super::diesel_helpers::{map_diesel_error, map_pool_error, to_sql_bound, to_total};
use super::models::{BloodPressureRow, BloodPressureWrite};
use super::pool::DbPool;
use super::schema::blood_pressures;

/// Diesel-backed store for [`BloodPressure`] readings.
#[derive(Clone)]
pub struct DieselBloodPressureRepository {
    pool: DbPool,
}

impl DieselBloodPressureRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_records(
    rows: Vec<BloodPressureRow>,
) -> Result<Vec<Record<BloodPressure>>, RecordRepositoryError> {
    rows.into_iter().map(BloodPressureRow::into_record).collect()
}

#[async_trait]
impl RecordRepository<BloodPressure> for DieselBloodPressureRepository {
    async fn insert(
        &self,
        data: &BloodPressure,
    ) -> Result<Record<BloodPressure>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: BloodPressureRow = diesel::insert_into(blood_pressures::table)
            .values(BloodPressureWrite::from(data))
            .returning(BloodPressureRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_record()
    }

    async fn update(
        &self,
        record: &Record<BloodPressure>,
    ) -> Result<Option<Record<BloodPressure>>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BloodPressureRow> =
            diesel::update(blood_pressures::table.find(record.id.get()))
                .set(BloodPressureWrite::from(&record.data))
                .returning(BloodPressureRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
        row.map(BloodPressureRow::into_record).transpose()
    }

    async fn find_by_id(
        &self,
        id: RecordId,
    ) -> Result<Option<Record<BloodPressure>>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BloodPressureRow> = blood_pressures::table
            .find(id.get())
            .select(BloodPressureRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(BloodPressureRow::into_record).transpose()
    }

    async fn list(
        &self,
        request: &PageRequest,
        scope: &OwnerScope,
    ) -> Result<Page<Record<BloodPressure>>, RecordRepositoryError> {
        let limit = to_sql_bound(u64::from(request.size()))?;
        let offset = to_sql_bound(request.offset())?;
        let default_sort = BloodPressure::default_sort();
        let sort = request.sort().unwrap_or(&default_sort);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut count_query = blood_pressures::table.select(count_star()).into_boxed();
        let mut query = blood_pressures::table
            .select(BloodPressureRow::as_select())
            .into_boxed();
        if let OwnerScope::Owner(login) = scope {
            count_query = count_query.filter(blood_pressures::user_login.eq(login.as_ref()));
            query = query.filter(blood_pressures::user_login.eq(login.as_ref()));
        }

        let total: i64 = count_query
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows = crate::apply_sort!(query, sort, blood_pressures::id, {
            "timestamp" => blood_pressures::taken_at,
            "systolic" => blood_pressures::systolic,
            "diastolic" => blood_pressures::diastolic,
            "user" => blood_pressures::user_login,
        })
        .limit(limit)
        .offset(offset)
        .load::<BloodPressureRow>(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(Page::new(into_records(rows)?, to_total(total)?, request.clone()))
    }

    async fn delete_by_id(&self, id: RecordId) -> Result<bool, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(blood_pressures::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_by_owner(
        &self,
        owner: &UserLogin,
    ) -> Result<Vec<Record<BloodPressure>>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = blood_pressures::table
            .filter(blood_pressures::user_login.eq(owner.as_ref()))
            .order(blood_pressures::id.asc())
            .select(BloodPressureRow::as_select())
            .load::<BloodPressureRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_records(rows)
    }
}

#[async_trait]
impl ReadingsRangeRepository<BloodPressure> for DieselBloodPressureRepository {
    async fn find_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Record<BloodPressure>>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = blood_pressures::table
            .filter(blood_pressures::taken_at.between(start, end))
            .order((blood_pressures::taken_at.desc(), blood_pressures::id.asc()))
            .select(BloodPressureRow::as_select())
            .load::<BloodPressureRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_records(rows)
    }
}
