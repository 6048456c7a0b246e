//! Ports for time-range queries over the metric store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{DailyPoints, Record, TimedReading};

use super::RecordRepositoryError;

/// Port for fetching readings taken within an instant range.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadingsRangeRepository<T: TimedReading>: Send + Sync {
    /// Fetch readings with `start <= taken_at <= end`, most recent first.
    ///
    /// Results are not filtered by owner.
    async fn find_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Record<T>>, RecordRepositoryError>;
}

/// Port for fetching daily points within a date range.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PointsRangeRepository: Send + Sync {
    /// Fetch points with `start <= date <= end`, both bounds inclusive.
    ///
    /// Results are not filtered by owner.
    async fn find_between_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Record<DailyPoints>>, RecordRepositoryError>;
}

/// Fixture range repository that never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRangeRepository;

#[async_trait]
impl<T: TimedReading> ReadingsRangeRepository<T> for FixtureRangeRepository {
    async fn find_between(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<Record<T>>, RecordRepositoryError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl PointsRangeRepository for FixtureRangeRepository {
    async fn find_between_dates(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<Record<DailyPoints>>, RecordRepositoryError> {
        Ok(Vec::new())
    }
}
