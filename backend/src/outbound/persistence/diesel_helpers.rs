//! Shared helpers and macros for Diesel repository implementations.
//!
//! This module provides common utilities for database access including:
//! - Error mapping from pool and Diesel errors to `RecordRepositoryError`
//! - Conversions between page arithmetic (`u64`) and SQL (`i64`)
//! - A declarative macro applying a whitelisted sort to a boxed query

use tracing::debug;

use crate::domain::ports::RecordRepositoryError;

use super::pool::PoolError;

/// Map pool errors to record repository errors.
pub(crate) fn map_pool_error(error: PoolError) -> RecordRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RecordRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to record repository errors.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> RecordRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => RecordRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => RecordRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RecordRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            RecordRepositoryError::query("check constraint violated")
        }
        _ => RecordRepositoryError::query("database error"),
    }
}

/// Convert a `u64` page bound to the `i64` Diesel expects for LIMIT/OFFSET.
pub(crate) fn to_sql_bound(value: u64) -> Result<i64, RecordRepositoryError> {
    i64::try_from(value)
        .map_err(|_| RecordRepositoryError::query(format!("page bound {value} out of range")))
}

/// Convert a `COUNT(*)` result into a total element count.
pub(crate) fn to_total(count: i64) -> Result<u64, RecordRepositoryError> {
    u64::try_from(count)
        .map_err(|_| RecordRepositoryError::query(format!("negative row count {count}")))
}

/// Narrow a stored SMALLINT into the `u8` the domain uses.
pub(crate) fn narrow_smallint(column: &str, value: i16) -> Result<u8, RecordRepositoryError> {
    u8::try_from(value).map_err(|_| {
        RecordRepositoryError::query(format!("stored {column} value {value} out of range"))
    })
}

/// Report a stored row that no longer satisfies domain validation.
pub(crate) fn invalid_row(table: &str, id: i64, error: impl std::fmt::Display) -> RecordRepositoryError {
    RecordRepositoryError::query(format!("invalid {table} row {id}: {error}"))
}

/// Apply a whitelisted [`pagination::Sort`] to a boxed select, breaking ties
/// by ascending id.
///
/// Unknown fields sort by id; services validate fields before they reach
/// the adapter.
#[macro_export]
macro_rules! apply_sort {
    (
        $query:expr,
        $sort:expr,
        $id:expr,
        { $($field:literal => $column:expr),* $(,)? }
    ) => {{
        use diesel::prelude::*;

        let query = $query;
        let sort: &pagination::Sort = $sort;
        let descending = sort.direction() == pagination::Direction::Desc;
        match sort.field() {
            $(
                $field if descending => query.order_by($column.desc()),
                $field => query.order_by($column.asc()),
            )*
            _ if descending => query.order_by($id.desc()),
            _ => query.order_by($id.asc()),
        }
        .then_order_by($id.asc())
    }};
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, RecordRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn closed_connections_become_connection_errors() {
        let err = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("closed".to_owned()),
        ));
        assert!(matches!(err, RecordRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn other_errors_become_query_errors() {
        let err = map_diesel_error(DieselError::NotFound);
        assert!(matches!(err, RecordRepositoryError::Query { .. }));
    }

    #[rstest]
    #[case(0, Ok(0))]
    #[case(42, Ok(42))]
    fn totals_convert(#[case] count: i64, #[case] expected: Result<u64, ()>) {
        assert_eq!(to_total(count).map_err(|_| ()), expected);
    }

    #[rstest]
    fn negative_totals_are_rejected() {
        assert!(to_total(-1).is_err());
    }

    #[rstest]
    fn oversized_bounds_are_rejected() {
        assert!(to_sql_bound(u64::MAX).is_err());
        assert_eq!(to_sql_bound(20).expect("fits"), 20);
    }

    #[rstest]
    fn smallints_narrow() {
        assert_eq!(narrow_smallint("meals", 1).expect("fits"), 1);
        assert!(narrow_smallint("meals", -1).is_err());
    }
}
