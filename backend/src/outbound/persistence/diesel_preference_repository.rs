//! PostgreSQL-backed preference store using Diesel ORM.
//!
//! Preferences carry no owner, so list scopes admit every row and owner
//! lookups always come back empty.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{OwnerScope, RecordRepository, RecordRepositoryError};
use crate::domain::{Preference, Record, RecordData, RecordId, UserLogin};

use super::diesel_helpers::{map_diesel_error, map_pool_error, to_sql_bound, to_total};
use super::models::{PreferenceRow, PreferenceWrite};
use super::pool::DbPool;
use super::schema::preferences;

/// Diesel-backed store for [`Preference`] rows.
#[derive(Clone)]
pub struct DieselPreferenceRepository {
    pool: DbPool,
}

impl DieselPreferenceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository<Preference> for DieselPreferenceRepository {
    async fn insert(&self, data: &Preference) -> Result<Record<Preference>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: PreferenceRow = diesel::insert_into(preferences::table)
            .values(PreferenceWrite::from(data))
            .returning(PreferenceRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_record()
    }

    async fn update(
        &self,
        record: &Record<Preference>,
    ) -> Result<Option<Record<Preference>>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PreferenceRow> = diesel::update(preferences::table.find(record.id.get()))
            .set(PreferenceWrite::from(&record.data))
            .returning(PreferenceRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(PreferenceRow::into_record).transpose()
    }

    async fn find_by_id(
        &self,
        id: RecordId,
    ) -> Result<Option<Record<Preference>>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PreferenceRow> = preferences::table
            .find(id.get())
            .select(PreferenceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(PreferenceRow::into_record).transpose()
    }

    async fn list(
        &self,
        request: &PageRequest,
        _scope: &OwnerScope,
    ) -> Result<Page<Record<Preference>>, RecordRepositoryError> {
        let limit = to_sql_bound(u64::from(request.size()))?;
        let offset = to_sql_bound(request.offset())?;
        let default_sort = Preference::default_sort();
        let sort = request.sort().unwrap_or(&default_sort);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = preferences::table
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let query = preferences::table
            .select(PreferenceRow::as_select())
            .into_boxed();
        let rows = crate::apply_sort!(query, sort, preferences::id, {
            "weeklyGoal" => preferences::weekly_goal,
            "weightUnits" => preferences::weight_units,
        })
        .limit(limit)
        .offset(offset)
        .load::<PreferenceRow>(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(PreferenceRow::into_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, to_total(total)?, request.clone()))
    }

    async fn delete_by_id(&self, id: RecordId) -> Result<bool, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(preferences::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_by_owner(
        &self,
        _owner: &UserLogin,
    ) -> Result<Vec<Record<Preference>>, RecordRepositoryError> {
        Ok(Vec::new())
    }
}
