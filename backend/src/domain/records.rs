//! Shared shape of stored health records.
//!
//! Every entity is persisted as a [`Record`]: a store-assigned [`RecordId`]
//! wrapping the entity's data. The data types implement [`RecordData`] so
//! services and adapters can treat blood pressure, weight, points, and
//! preferences uniformly.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use pagination::Sort;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::UserLogin;

/// Store-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// The kinds of record the service manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    BloodPressure,
    Weight,
    Points,
    Preference,
}

impl RecordKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 4] = [Self::BloodPressure, Self::Weight, Self::Points, Self::Preference];

    /// Entity name used in alerts and error details.
    pub const fn entity_name(self) -> &'static str {
        match self {
            Self::BloodPressure => "bloodPressure",
            Self::Weight => "weight",
            Self::Points => "points",
            Self::Preference => "preference",
        }
    }

    /// Name of the search index mirroring this kind.
    pub const fn index_name(self) -> &'static str {
        match self {
            Self::BloodPressure => "blood_pressures",
            Self::Weight => "weights",
            Self::Points => "points",
            Self::Preference => "preferences",
        }
    }

    /// Path segment of the collection resource under `/api`.
    pub const fn collection_path(self) -> &'static str {
        match self {
            Self::BloodPressure => "blood-pressures",
            Self::Weight => "weights",
            Self::Points => "points",
            Self::Preference => "preferences",
        }
    }

    /// Kind whose collection resource lives at `segment`.
    pub fn from_collection_path(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.collection_path() == segment)
    }

    /// Whether records of this kind belong to a single user.
    pub const fn is_owned(self) -> bool {
        !matches!(self, Self::Preference)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_name())
    }
}

/// Behaviour shared by every record payload.
pub trait RecordData:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Which kind of record this payload describes.
    const KIND: RecordKind;

    /// Fields a list request may sort by, besides `id`.
    const SORT_FIELDS: &'static [&'static str];

    /// Ordering applied when a list request does not name one.
    fn default_sort() -> Sort;

    /// Owning user, for owned kinds.
    fn owner(&self) -> Option<&UserLogin>;

    /// Replace the owner. Unowned kinds ignore the call.
    fn assign_owner(&mut self, owner: UserLogin);

    /// Compare two payloads on a field from [`Self::SORT_FIELDS`].
    ///
    /// Unknown fields compare equal.
    fn compare_by(&self, other: &Self, field: &str) -> Ordering;
}

/// Readings placed on the timeline by an instant.
pub trait TimedReading: RecordData {
    /// Instant the reading was taken.
    fn taken_at(&self) -> DateTime<Utc>;
}

/// A persisted record: store-assigned id plus payload.
///
/// Serialises flat, so a blood pressure record renders as
/// `{"id":1,"timestamp":"…","systolic":120,"diastolic":80,"user":"user"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    /// Store-assigned identifier.
    pub id: RecordId,
    /// Entity payload.
    #[serde(flatten)]
    pub data: T,
}

impl<T> Record<T> {
    /// Pair an identifier with its payload.
    pub const fn new(id: RecordId, data: T) -> Self {
        Self { id, data }
    }
}

impl<T: RecordData> Record<T> {
    /// Compare two records on `field`, where `id` is always available.
    pub fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        if field == "id" {
            self.id.cmp(&other.id)
        } else {
            self.data.compare_by(&other.data, field)
        }
    }

    /// Whether this record belongs to `login`.
    pub fn is_owned_by(&self, login: &UserLogin) -> bool {
        self.data.owner() == Some(login)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RecordKind::BloodPressure, "bloodPressure", "blood_pressures", "blood-pressures")]
    #[case(RecordKind::Weight, "weight", "weights", "weights")]
    #[case(RecordKind::Points, "points", "points", "points")]
    #[case(RecordKind::Preference, "preference", "preferences", "preferences")]
    fn kinds_expose_stable_names(
        #[case] kind: RecordKind,
        #[case] entity: &str,
        #[case] index: &str,
        #[case] path: &str,
    ) {
        assert_eq!(kind.entity_name(), entity);
        assert_eq!(kind.index_name(), index);
        assert_eq!(kind.collection_path(), path);
    }

    #[rstest]
    fn only_preferences_are_unowned() {
        assert!(RecordKind::BloodPressure.is_owned());
        assert!(RecordKind::Weight.is_owned());
        assert!(RecordKind::Points.is_owned());
        assert!(!RecordKind::Preference.is_owned());
    }

    #[rstest]
    fn record_id_serialises_as_number() {
        let value = serde_json::to_value(RecordId::new(42)).expect("serialise");
        assert_eq!(value, serde_json::json!(42));
    }
}
