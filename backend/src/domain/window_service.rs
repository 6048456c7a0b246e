//! Windowed summary services.
//!
//! Both services read "now" from an injected [`Clock`] in the local zone and
//! delegate the calendar arithmetic to [`crate::domain::window`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{
    PointsRangeRepository, ReadingsRangeRepository, ReadingsWindowQuery, WeeklyPointsQuery,
};
use crate::domain::records_service::map_repository_error;
use crate::domain::window::{
    CalendarWeek, TrailingWindow, WeeklyPoints, WindowError, WindowSummary, readings_in_window,
    weekly_total,
};
use crate::domain::{Caller, Error, Record, TimedReading};

fn window_error(error: WindowError) -> Error {
    let value = match &error {
        WindowError::NegativeDays { days } | WindowError::Unrepresentable { days } => *days,
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": "days",
        "value": value,
        "code": "invalid_window",
    }))
}

/// Trailing-day summaries of timed readings.
pub struct ReadingsWindowService<R: ?Sized> {
    readings: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> Clone for ReadingsWindowService<R> {
    fn clone(&self) -> Self {
        Self {
            readings: Arc::clone(&self.readings),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: ?Sized> ReadingsWindowService<R> {
    /// Create a service reading from `readings` and timed by `clock`.
    pub fn new(readings: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { readings, clock }
    }
}

#[async_trait]
impl<T, R> ReadingsWindowQuery<T> for ReadingsWindowService<R>
where
    T: TimedReading,
    R: ReadingsRangeRepository<T> + ?Sized,
{
    async fn by_days(
        &self,
        caller: &Caller,
        days: i64,
    ) -> Result<WindowSummary<Record<T>>, Error> {
        let window = TrailingWindow::ending_at(self.clock.local(), days).map_err(window_error)?;
        let candidates = self
            .readings
            .find_between(window.start(), window.end())
            .await
            .map_err(map_repository_error)?;
        Ok(WindowSummary {
            period: window.label(),
            readings: readings_in_window(&window, caller.login(), candidates),
        })
    }
}

/// Current-week point totals.
pub struct WeeklyPointsService<R: ?Sized> {
    points: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> Clone for WeeklyPointsService<R> {
    fn clone(&self) -> Self {
        Self {
            points: Arc::clone(&self.points),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: ?Sized> WeeklyPointsService<R> {
    /// Create a service reading from `points` and timed by `clock`.
    pub fn new(points: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { points, clock }
    }
}

#[async_trait]
impl<R> WeeklyPointsQuery for WeeklyPointsService<R>
where
    R: PointsRangeRepository + ?Sized,
{
    async fn points_this_week(&self, caller: &Caller) -> Result<WeeklyPoints, Error> {
        let week = CalendarWeek::containing(self.clock.local().date_naive());
        let records = self
            .points
            .find_between_dates(week.start(), week.end())
            .await
            .map_err(map_repository_error)?;
        Ok(WeeklyPoints {
            week: week.start(),
            points: weekly_total(&week, caller.login(), &records),
        })
    }
}
