//! HTTP inbound adapter exposing REST endpoints.

pub mod blood_pressures;
pub mod error;
pub mod health;
pub mod points;
pub mod preferences;
pub mod records;
pub mod records_dto;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod weights;

pub use error::ApiResult;
