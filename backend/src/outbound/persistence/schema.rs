//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Blood pressure readings.
    blood_pressures (id) {
        /// Primary key assigned by a sequence.
        id -> Int8,
        /// Instant the reading was taken.
        taken_at -> Timestamptz,
        /// Systolic pressure in mmHg.
        systolic -> Int4,
        /// Diastolic pressure in mmHg.
        diastolic -> Int4,
        /// Owning user login (max 50 characters).
        user_login -> Varchar,
    }
}

diesel::table! {
    /// Body weight entries.
    weight_entries (id) {
        /// Primary key assigned by a sequence.
        id -> Int8,
        /// Instant the weight was measured.
        taken_at -> Timestamptz,
        /// Measured weight.
        weight -> Float8,
        /// Owning user login (max 50 characters).
        user_login -> Varchar,
    }
}

diesel::table! {
    /// Daily compliance points.
    daily_points (id) {
        /// Primary key assigned by a sequence.
        id -> Int8,
        /// Calendar day the points were earned.
        entry_date -> Date,
        /// Exercise flag (0 or 1).
        exercise -> Int2,
        /// Meals flag (0 or 1).
        meals -> Int2,
        /// Alcohol flag (0 or 1).
        alcohol -> Int2,
        /// Optional notes (max 140 characters).
        notes -> Nullable<Varchar>,
        /// Owning user login (max 50 characters).
        user_login -> Varchar,
    }
}

diesel::table! {
    /// Installation-wide preferences.
    preferences (id) {
        /// Primary key assigned by a sequence.
        id -> Int8,
        /// Weekly points goal between 10 and 21.
        weekly_goal -> Nullable<Int2>,
        /// Weight unit, `kg` or `lb`.
        weight_units -> Varchar,
    }
}
