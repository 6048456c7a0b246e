//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each record kind has one adapter implementing
//! [`RecordRepository`](crate::domain::ports::RecordRepository); the timed
//! kinds also implement the range ports used by window queries. Connections
//! come from a `bb8` pool through `diesel-async`.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module. Stored rows are re-validated through the domain
//! constructors on the way out, so a corrupt row surfaces as a query error
//! rather than an invalid record.
//!
//! # Example
//!
//! ```ignore
//! use health_points::outbound::persistence::{
//!     DbPool, DieselBloodPressureRepository, PoolConfig,
//! };
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/health")).await?;
//! let readings = DieselBloodPressureRepository::new(pool);
//! ```

pub(crate) mod diesel_helpers;
mod diesel_blood_pressure_repository;
mod diesel_points_repository;
mod diesel_preference_repository;
mod diesel_weight_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_blood_pressure_repository::DieselBloodPressureRepository;
pub use diesel_points_repository::DieselPointsRepository;
pub use diesel_preference_repository::DieselPreferenceRepository;
pub use diesel_weight_repository::DieselWeightRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError,
};
