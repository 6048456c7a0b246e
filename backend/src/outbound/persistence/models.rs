//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Each table has a `Row` read struct and a
//! borrowed `Write` struct used for both inserts and full-replace updates.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::ports::RecordRepositoryError;
use crate::domain::{
    BloodPressure, DailyPoints, PointsFlags, Preference, Record, RecordId, TimedReading, UserLogin,
    WeightEntry, WeightUnits,
};

use super::diesel_helpers::{invalid_row, narrow_smallint};
use super::schema::{blood_pressures, daily_points, preferences, weight_entries};

fn owner(table: &str, id: i64, login: String) -> Result<UserLogin, RecordRepositoryError> {
    UserLogin::new(login).map_err(|err| invalid_row(table, id, err))
}

// ---------------------------------------------------------------------------
// Blood pressure models
// ---------------------------------------------------------------------------

/// Row struct for reading from the blood_pressures table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = blood_pressures)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BloodPressureRow {
    pub id: i64,
    pub taken_at: DateTime<Utc>,
    pub systolic: i32,
    pub diastolic: i32,
    pub user_login: String,
}

impl BloodPressureRow {
    pub(crate) fn into_record(self) -> Result<Record<BloodPressure>, RecordRepositoryError> {
        let user = owner("blood_pressures", self.id, self.user_login)?;
        let reading = BloodPressure::new(self.taken_at, self.systolic, self.diastolic, user)
            .map_err(|err| invalid_row("blood_pressures", self.id, err))?;
        Ok(Record::new(RecordId::new(self.id), reading))
    }
}

/// Insertable and changeset struct for blood_pressures.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = blood_pressures)]
pub(crate) struct BloodPressureWrite<'a> {
    pub taken_at: DateTime<Utc>,
    pub systolic: i32,
    pub diastolic: i32,
    pub user_login: &'a str,
}

impl<'a> From<&'a BloodPressure> for BloodPressureWrite<'a> {
    fn from(value: &'a BloodPressure) -> Self {
        Self {
            taken_at: value.taken_at(),
            systolic: value.systolic(),
            diastolic: value.diastolic(),
            user_login: value.user().as_ref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Weight models
// ---------------------------------------------------------------------------

/// Row struct for reading from the weight_entries table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = weight_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WeightEntryRow {
    pub id: i64,
    pub taken_at: DateTime<Utc>,
    pub weight: f64,
    pub user_login: String,
}

impl WeightEntryRow {
    pub(crate) fn into_record(self) -> Result<Record<WeightEntry>, RecordRepositoryError> {
        let user = owner("weight_entries", self.id, self.user_login)?;
        let entry = WeightEntry::new(self.taken_at, self.weight, user)
            .map_err(|err| invalid_row("weight_entries", self.id, err))?;
        Ok(Record::new(RecordId::new(self.id), entry))
    }
}

/// Insertable and changeset struct for weight_entries.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = weight_entries)]
pub(crate) struct WeightEntryWrite<'a> {
    pub taken_at: DateTime<Utc>,
    pub weight: f64,
    pub user_login: &'a str,
}

impl<'a> From<&'a WeightEntry> for WeightEntryWrite<'a> {
    fn from(value: &'a WeightEntry) -> Self {
        Self {
            taken_at: value.taken_at(),
            weight: value.weight(),
            user_login: value.user().as_ref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Daily points models
// ---------------------------------------------------------------------------

/// Row struct for reading from the daily_points table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = daily_points)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DailyPointsRow {
    pub id: i64,
    pub entry_date: NaiveDate,
    pub exercise: i16,
    pub meals: i16,
    pub alcohol: i16,
    pub notes: Option<String>,
    pub user_login: String,
}

impl DailyPointsRow {
    pub(crate) fn into_record(self) -> Result<Record<DailyPoints>, RecordRepositoryError> {
        let flags = PointsFlags {
            exercise: narrow_smallint("exercise", self.exercise)?,
            meals: narrow_smallint("meals", self.meals)?,
            alcohol: narrow_smallint("alcohol", self.alcohol)?,
        };
        let user = owner("daily_points", self.id, self.user_login)?;
        let points = DailyPoints::new(self.entry_date, flags, self.notes, user)
            .map_err(|err| invalid_row("daily_points", self.id, err))?;
        Ok(Record::new(RecordId::new(self.id), points))
    }
}

/// Insertable and changeset struct for daily_points.
///
/// `notes` is written as NULL when absent so a full replace clears it.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = daily_points)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct DailyPointsWrite<'a> {
    pub entry_date: NaiveDate,
    pub exercise: i16,
    pub meals: i16,
    pub alcohol: i16,
    pub notes: Option<&'a str>,
    pub user_login: &'a str,
}

impl<'a> From<&'a DailyPoints> for DailyPointsWrite<'a> {
    fn from(value: &'a DailyPoints) -> Self {
        let flags = value.flags();
        Self {
            entry_date: value.date(),
            exercise: i16::from(flags.exercise),
            meals: i16::from(flags.meals),
            alcohol: i16::from(flags.alcohol),
            notes: value.notes(),
            user_login: value.user().as_ref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Preference models
// ---------------------------------------------------------------------------

/// Row struct for reading from the preferences table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = preferences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PreferenceRow {
    pub id: i64,
    pub weekly_goal: Option<i16>,
    pub weight_units: String,
}

impl PreferenceRow {
    pub(crate) fn into_record(self) -> Result<Record<Preference>, RecordRepositoryError> {
        let units: WeightUnits = self
            .weight_units
            .parse()
            .map_err(|err| invalid_row("preferences", self.id, err))?;
        let goal = self
            .weekly_goal
            .map(|goal| narrow_smallint("weekly_goal", goal))
            .transpose()?;
        let preference =
            Preference::new(goal, units).map_err(|err| invalid_row("preferences", self.id, err))?;
        Ok(Record::new(RecordId::new(self.id), preference))
    }
}

/// Insertable and changeset struct for preferences.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = preferences)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PreferenceWrite {
    pub weekly_goal: Option<i16>,
    pub weight_units: &'static str,
}

impl From<&Preference> for PreferenceWrite {
    fn from(value: &Preference) -> Self {
        Self {
            weekly_goal: value.weekly_goal().map(i16::from),
            weight_units: value.weight_units().as_str(),
        }
    }
}
