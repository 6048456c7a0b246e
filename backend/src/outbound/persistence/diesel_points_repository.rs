//! PostgreSQL-backed daily points store using Diesel ORM.
//!
//! Also serves [`PointsRangeRepository`] for the current-week total.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    OwnerScope, PointsRangeRepository, RecordRepository, RecordRepositoryError,
};
use crate::domain::{DailyPoints, Record, RecordData, RecordId, UserLogin};

use super::diesel_helpers::{map_diesel_error, map_pool_error, to_sql_bound, to_total};
use super::models::{DailyPointsRow, DailyPointsWrite};
use super::pool::DbPool;
use super::schema::daily_points;

/// Diesel-backed store for [`DailyPoints`] entries.
#[derive(Clone)]
pub struct DieselPointsRepository {
    pool: DbPool,
}

impl DieselPointsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_records(
    rows: Vec<DailyPointsRow>,
) -> Result<Vec<Record<DailyPoints>>, RecordRepositoryError> {
    rows.into_iter().map(DailyPointsRow::into_record).collect()
}

#[async_trait]
impl RecordRepository<DailyPoints> for DieselPointsRepository {
    async fn insert(
        &self,
        data: &DailyPoints,
    ) -> Result<Record<DailyPoints>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: DailyPointsRow = diesel::insert_into(daily_points::table)
            .values(DailyPointsWrite::from(data))
            .returning(DailyPointsRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_record()
    }

    async fn update(
        &self,
        record: &Record<DailyPoints>,
    ) -> Result<Option<Record<DailyPoints>>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DailyPointsRow> =
            diesel::update(daily_points::table.find(record.id.get()))
                .set(DailyPointsWrite::from(&record.data))
                .returning(DailyPointsRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
        row.map(DailyPointsRow::into_record).transpose()
    }

    async fn find_by_id(
        &self,
        id: RecordId,
    ) -> Result<Option<Record<DailyPoints>>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DailyPointsRow> = daily_points::table
            .find(id.get())
            .select(DailyPointsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(DailyPointsRow::into_record).transpose()
    }

    async fn list(
        &self,
        request: &PageRequest,
        scope: &OwnerScope,
    ) -> Result<Page<Record<DailyPoints>>, RecordRepositoryError> {
        let limit = to_sql_bound(u64::from(request.size()))?;
        let offset = to_sql_bound(request.offset())?;
        let default_sort = DailyPoints::default_sort();
        let sort = request.sort().unwrap_or(&default_sort);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut count_query = daily_points::table.select(count_star()).into_boxed();
        let mut query = daily_points::table
            .select(DailyPointsRow::as_select())
            .into_boxed();
        if let OwnerScope::Owner(login) = scope {
            count_query = count_query.filter(daily_points::user_login.eq(login.as_ref()));
            query = query.filter(daily_points::user_login.eq(login.as_ref()));
        }

        let total: i64 = count_query
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows = crate::apply_sort!(query, sort, daily_points::id, {
            "date" => daily_points::entry_date,
            "exercise" => daily_points::exercise,
            "meals" => daily_points::meals,
            "alcohol" => daily_points::alcohol,
            "user" => daily_points::user_login,
        })
        .limit(limit)
        .offset(offset)
        .load::<DailyPointsRow>(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(Page::new(into_records(rows)?, to_total(total)?, request.clone()))
    }

    async fn delete_by_id(&self, id: RecordId) -> Result<bool, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(daily_points::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_by_owner(
        &self,
        owner: &UserLogin,
    ) -> Result<Vec<Record<DailyPoints>>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = daily_points::table
            .filter(daily_points::user_login.eq(owner.as_ref()))
            .order(daily_points::id.asc())
            .select(DailyPointsRow::as_select())
            .load::<DailyPointsRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_records(rows)
    }
}

#[async_trait]
impl PointsRangeRepository for DieselPointsRepository {
    async fn find_between_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Record<DailyPoints>>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = daily_points::table
            .filter(daily_points::entry_date.between(start, end))
            .order((daily_points::entry_date.asc(), daily_points::id.asc()))
            .select(DailyPointsRow::as_select())
            .load::<DailyPointsRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_records(rows)
    }
}
