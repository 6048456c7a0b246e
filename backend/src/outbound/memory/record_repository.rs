//! Process-local record store.
//!
//! Records live in a `BTreeMap` keyed by id behind a mutex. Ids come from a
//! per-store sequence starting at 1 and are never reused.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use pagination::{Direction, Page, PageRequest};

use crate::domain::ports::{
    OwnerScope, PointsRangeRepository, ReadingsRangeRepository, RecordRepository,
    RecordRepositoryError,
};
use crate::domain::{DailyPoints, Record, RecordData, RecordId, TimedReading, UserLogin};

#[derive(Debug)]
struct StoreState<T> {
    next_id: i64,
    records: BTreeMap<i64, T>,
}

/// In-memory [`RecordRepository`] for one record kind.
#[derive(Debug)]
pub struct InMemoryRecordRepository<T> {
    state: Mutex<StoreState<T>>,
}

impl<T> Default for InMemoryRecordRepository<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(StoreState {
                next_id: 1,
                records: BTreeMap::new(),
            }),
        }
    }
}

impl<T: RecordData> InMemoryRecordRepository<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState<T>>, RecordRepositoryError> {
        self.state
            .lock()
            .map_err(|_| RecordRepositoryError::connection("in-memory store poisoned"))
    }

    fn snapshot<F>(&self, mut keep: F) -> Result<Vec<Record<T>>, RecordRepositoryError>
    where
        F: FnMut(&T) -> bool,
    {
        let state = self.lock()?;
        Ok(state
            .records
            .iter()
            .filter(|(_, data)| keep(data))
            .map(|(id, data)| Record::new(RecordId::new(*id), data.clone()))
            .collect())
    }
}

#[async_trait]
impl<T: RecordData> RecordRepository<T> for InMemoryRecordRepository<T> {
    async fn insert(&self, data: &T) -> Result<Record<T>, RecordRepositoryError> {
        let mut state = self.lock()?;
        let id = state.next_id;
        state.next_id += 1;
        state.records.insert(id, data.clone());
        Ok(Record::new(RecordId::new(id), data.clone()))
    }

    async fn update(&self, record: &Record<T>) -> Result<Option<Record<T>>, RecordRepositoryError> {
        let mut state = self.lock()?;
        let Some(slot) = state.records.get_mut(&record.id.get()) else {
            return Ok(None);
        };
        *slot = record.data.clone();
        Ok(Some(record.clone()))
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<Record<T>>, RecordRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .records
            .get(&id.get())
            .map(|data| Record::new(id, data.clone())))
    }

    async fn list(
        &self,
        request: &PageRequest,
        scope: &OwnerScope,
    ) -> Result<Page<Record<T>>, RecordRepositoryError> {
        let mut records = self.snapshot(|data| scope.admits(data.owner()))?;
        let sort = request.sort().cloned().unwrap_or_else(T::default_sort);
        records.sort_by(|left, right| {
            let ordering = left.compare_by(right, sort.field());
            let ordering = match sort.direction() {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            ordering.then_with(|| left.id.cmp(&right.id))
        });

        let total = u64::try_from(records.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(request.size()).unwrap_or(usize::MAX);
        let items = records.into_iter().skip(offset).take(size).collect();
        Ok(Page::new(items, total, request.clone()))
    }

    async fn delete_by_id(&self, id: RecordId) -> Result<bool, RecordRepositoryError> {
        let mut state = self.lock()?;
        Ok(state.records.remove(&id.get()).is_some())
    }

    async fn find_by_owner(&self, owner: &UserLogin) -> Result<Vec<Record<T>>, RecordRepositoryError> {
        self.snapshot(|data| data.owner() == Some(owner))
    }
}

#[async_trait]
impl<T: TimedReading> ReadingsRangeRepository<T> for InMemoryRecordRepository<T> {
    async fn find_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Record<T>>, RecordRepositoryError> {
        let mut records = self.snapshot(|data| {
            let taken_at = data.taken_at();
            start <= taken_at && taken_at <= end
        })?;
        records.sort_by(|left, right| {
            right
                .data
                .taken_at()
                .cmp(&left.data.taken_at())
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(records)
    }
}

#[async_trait]
impl PointsRangeRepository for InMemoryRecordRepository<DailyPoints> {
    async fn find_between_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Record<DailyPoints>>, RecordRepositoryError> {
        let mut records = self.snapshot(|data| (start..=end).contains(&data.date()))?;
        records.sort_by(|left, right| {
            left.data
                .date()
                .cmp(&right.data.date())
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{BloodPressure, PointsFlags, Preference, WeightUnits};
    use chrono::TimeZone;
    use pagination::Sort;
    use rstest::{fixture, rstest};

    fn login(raw: &str) -> UserLogin {
        UserLogin::new(raw).expect("login")
    }

    fn instant(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0)
            .single()
            .expect("instant")
    }

    fn reading(day: u32, systolic: i32, owner: &str) -> BloodPressure {
        BloodPressure::new(instant(day), systolic, 80, login(owner)).expect("reading")
    }

    #[fixture]
    fn store() -> InMemoryRecordRepository<BloodPressure> {
        InMemoryRecordRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn inserts_assign_sequential_ids(store: InMemoryRecordRepository<BloodPressure>) {
        let first = store.insert(&reading(1, 120, "user")).await.expect("insert");
        let second = store.insert(&reading(2, 125, "user")).await.expect("insert");
        store.delete_by_id(second.id).await.expect("delete");
        let third = store.insert(&reading(3, 130, "user")).await.expect("insert");

        assert_eq!(first.id, RecordId::new(1));
        assert_eq!(second.id, RecordId::new(2));
        assert_eq!(third.id, RecordId::new(3));
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_known_records_only(store: InMemoryRecordRepository<BloodPressure>) {
        let stored = store.insert(&reading(1, 120, "user")).await.expect("insert");
        let replacement = Record::new(stored.id, reading(1, 140, "user"));

        let updated = store.update(&replacement).await.expect("update");
        let missing = store
            .update(&Record::new(RecordId::new(99), reading(1, 140, "user")))
            .await
            .expect("update");

        assert_eq!(updated, Some(replacement.clone()));
        assert_eq!(missing, None);
        assert_eq!(
            store.find_by_id(stored.id).await.expect("find"),
            Some(replacement)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn list_scopes_sorts_and_pages(store: InMemoryRecordRepository<BloodPressure>) {
        for (day, systolic, owner) in [(1, 130, "user"), (2, 110, "admin"), (3, 120, "user")] {
            store.insert(&reading(day, systolic, owner)).await.expect("insert");
        }
        let request = PageRequest::new(0, 1)
            .expect("request")
            .with_sort(Sort::asc("systolic"));

        let page = store
            .list(&request, &OwnerScope::Owner(login("user")))
            .await
            .expect("list");

        assert_eq!(page.total(), 2);
        let ids: Vec<i64> = page.items().iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![3]);
    }

    #[rstest]
    #[tokio::test]
    async fn list_defaults_to_newest_first(store: InMemoryRecordRepository<BloodPressure>) {
        for day in [2, 5, 3] {
            store.insert(&reading(day, 120, "user")).await.expect("insert");
        }

        let page = store
            .list(&PageRequest::default(), &OwnerScope::All)
            .await
            .expect("list");

        let ids: Vec<i64> = page.items().iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[rstest]
    #[tokio::test]
    async fn find_by_owner_filters(store: InMemoryRecordRepository<BloodPressure>) {
        store.insert(&reading(1, 120, "user")).await.expect("insert");
        store.insert(&reading(2, 120, "admin")).await.expect("insert");

        let owned = store.find_by_owner(&login("admin")).await.expect("find");
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, RecordId::new(2));
    }

    #[rstest]
    #[tokio::test]
    async fn find_between_is_inclusive_and_newest_first(
        store: InMemoryRecordRepository<BloodPressure>,
    ) {
        for day in [1, 4, 8, 10] {
            store.insert(&reading(day, 120, "user")).await.expect("insert");
        }

        let found = store
            .find_between(instant(4), instant(8))
            .await
            .expect("range");

        let ids: Vec<i64> = found.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[rstest]
    #[tokio::test]
    async fn points_range_uses_calendar_dates() {
        let store = InMemoryRecordRepository::<DailyPoints>::new();
        for day in [1, 2, 9] {
            let date = NaiveDate::from_ymd_opt(2026, 3, day).expect("date");
            let points = DailyPoints::new(date, PointsFlags::all(), None, login("user"))
                .expect("points");
            store.insert(&points).await.expect("insert");
        }

        let found = store
            .find_between_dates(
                NaiveDate::from_ymd_opt(2026, 3, 2).expect("date"),
                NaiveDate::from_ymd_opt(2026, 3, 8).expect("date"),
            )
            .await
            .expect("range");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, RecordId::new(2));
    }

    #[rstest]
    #[tokio::test]
    async fn unowned_records_pass_every_scope() {
        let store = InMemoryRecordRepository::<Preference>::new();
        let preference = Preference::new(Some(15), WeightUnits::Kg).expect("preference");
        store.insert(&preference).await.expect("insert");

        let page = store
            .list(&PageRequest::default(), &OwnerScope::Owner(login("user")))
            .await
            .expect("list");

        assert_eq!(page.total(), 1);
    }
}
