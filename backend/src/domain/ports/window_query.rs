//! Driving ports for windowed summaries.

use async_trait::async_trait;

use crate::domain::{Caller, Error, Record, TimedReading, WeeklyPoints, WindowSummary};

/// Domain use-case port for trailing-day reading summaries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadingsWindowQuery<T: TimedReading>: Send + Sync {
    /// Readings the caller took during the last `days` days, newest first.
    ///
    /// Fails with `invalid_request` when `days` is negative or the window
    /// cannot be computed from the current local time.
    async fn by_days(
        &self,
        caller: &Caller,
        days: i64,
    ) -> Result<WindowSummary<Record<T>>, Error>;
}

/// Domain use-case port for the current week's point total.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeeklyPointsQuery: Send + Sync {
    /// Sum of the caller's points from Monday to Sunday of the current week.
    async fn points_this_week(&self, caller: &Caller) -> Result<WeeklyPoints, Error>;
}
