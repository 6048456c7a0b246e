//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`RecordRepository`, the range repositories, `SearchMirror`)
//! are implemented by outbound adapters. Driving ports (`RecordCommand`,
//! `RecordQuery`, the window queries, `LoginService`) are consumed by inbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod range_repository;
mod record_command;
mod record_query;
mod record_repository;
mod search_mirror;
mod window_query;

#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use range_repository::{MockPointsRangeRepository, MockReadingsRangeRepository};
pub use range_repository::{FixtureRangeRepository, PointsRangeRepository, ReadingsRangeRepository};
#[cfg(test)]
pub use record_command::MockRecordCommand;
pub use record_command::{DeleteOutcome, RecordCommand, WriteOutcome};
#[cfg(test)]
pub use record_query::MockRecordQuery;
pub use record_query::RecordQuery;
#[cfg(test)]
pub use record_repository::MockRecordRepository;
pub use record_repository::{
    FixtureRecordRepository, OwnerScope, RecordRepository, RecordRepositoryError,
};
#[cfg(test)]
pub use search_mirror::MockSearchMirror;
pub use search_mirror::{NoOpSearchMirror, SearchMirror, SearchMirrorError};
#[cfg(test)]
pub use window_query::{MockReadingsWindowQuery, MockWeeklyPointsQuery};
pub use window_query::{ReadingsWindowQuery, WeeklyPointsQuery};
