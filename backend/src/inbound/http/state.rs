//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LoginService, ReadingsWindowQuery, RecordCommand, RecordQuery, WeeklyPointsQuery,
};
use crate::domain::{BloodPressure, DailyPoints, Preference, RecordData, WeightEntry};

/// Command and query ports for one record kind.
pub struct RecordPorts<T: RecordData> {
    pub command: Arc<dyn RecordCommand<T>>,
    pub query: Arc<dyn RecordQuery<T>>,
}

impl<T: RecordData> Clone for RecordPorts<T> {
    fn clone(&self) -> Self {
        Self {
            command: Arc::clone(&self.command),
            query: Arc::clone(&self.query),
        }
    }
}

impl<T: RecordData> RecordPorts<T> {
    /// Use one service for both sides of the record port pair.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use health_points::domain::ports::{FixtureRecordRepository, NoOpSearchMirror};
    /// use health_points::domain::{RecordService, WeightEntry};
    /// use health_points::inbound::http::state::RecordPorts;
    ///
    /// let service = RecordService::new(Arc::new(FixtureRecordRepository), Arc::new(NoOpSearchMirror));
    /// let ports: RecordPorts<WeightEntry> = RecordPorts::from_service(Arc::new(service));
    /// # let _ = ports;
    /// ```
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: RecordCommand<T> + RecordQuery<T> + 'static,
    {
        Self {
            command: Arc::clone(&service) as Arc<dyn RecordCommand<T>>,
            query: service,
        }
    }
}

/// Ports backing the windowed summary endpoints.
#[derive(Clone)]
pub struct WindowPorts {
    pub blood_pressure: Arc<dyn ReadingsWindowQuery<BloodPressure>>,
    pub weight: Arc<dyn ReadingsWindowQuery<WeightEntry>>,
    pub weekly_points: Arc<dyn WeeklyPointsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub blood_pressures: RecordPorts<BloodPressure>,
    pub weights: RecordPorts<WeightEntry>,
    pub points: RecordPorts<DailyPoints>,
    pub preferences: RecordPorts<Preference>,
    pub windows: WindowPorts,
}

/// Access to the ports of one record kind inside [`HttpState`].
pub trait RecordPortsFor<T: RecordData> {
    /// Ports serving records of type `T`.
    fn record_ports(&self) -> &RecordPorts<T>;
}

impl RecordPortsFor<BloodPressure> for HttpState {
    fn record_ports(&self) -> &RecordPorts<BloodPressure> {
        &self.blood_pressures
    }
}

impl RecordPortsFor<WeightEntry> for HttpState {
    fn record_ports(&self) -> &RecordPorts<WeightEntry> {
        &self.weights
    }
}

impl RecordPortsFor<DailyPoints> for HttpState {
    fn record_ports(&self) -> &RecordPorts<DailyPoints> {
        &self.points
    }
}

impl RecordPortsFor<Preference> for HttpState {
    fn record_ports(&self) -> &RecordPorts<Preference> {
        &self.preferences
    }
}
