//! Builders for HTTP state ports over the configured stores and mirror.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use health_points::domain::ports::{
    FixtureLoginService, NoOpSearchMirror, PointsRangeRepository, ReadingsRangeRepository,
    RecordRepository, SearchMirror,
};
use health_points::domain::{
    BloodPressure, DailyPoints, Preference, ReadingsWindowService, RecordData, RecordService,
    WeeklyPointsService, WeightEntry,
};
use health_points::inbound::http::state::{HttpState, RecordPorts, WindowPorts};
use health_points::outbound::memory::{InMemoryRecordRepository, InMemorySearchMirror};
use health_points::outbound::persistence::{
    DieselBloodPressureRepository, DieselPointsRepository, DieselPreferenceRepository,
    DieselWeightRepository,
};

use super::ServerConfig;

/// One store per record kind.
struct Stores<B, W, P, Pr> {
    blood_pressures: Arc<B>,
    weights: Arc<W>,
    points: Arc<P>,
    preferences: Arc<Pr>,
}

fn record_ports<T, R>(repository: Arc<R>, mirror: &Arc<dyn SearchMirror>) -> RecordPorts<T>
where
    T: RecordData,
    R: RecordRepository<T> + 'static,
{
    RecordPorts::from_service(Arc::new(RecordService::new(
        repository,
        Arc::clone(mirror),
    )))
}

fn assemble<B, W, P, Pr>(
    stores: Stores<B, W, P, Pr>,
    mirror: Arc<dyn SearchMirror>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    B: RecordRepository<BloodPressure> + ReadingsRangeRepository<BloodPressure> + 'static,
    W: RecordRepository<WeightEntry> + ReadingsRangeRepository<WeightEntry> + 'static,
    P: RecordRepository<DailyPoints> + PointsRangeRepository + 'static,
    Pr: RecordRepository<Preference> + 'static,
{
    let Stores {
        blood_pressures,
        weights,
        points,
        preferences,
    } = stores;

    HttpState {
        login: Arc::new(FixtureLoginService),
        blood_pressures: record_ports(Arc::clone(&blood_pressures), &mirror),
        weights: record_ports(Arc::clone(&weights), &mirror),
        points: record_ports(Arc::clone(&points), &mirror),
        preferences: record_ports(preferences, &mirror),
        windows: WindowPorts {
            blood_pressure: Arc::new(ReadingsWindowService::new(blood_pressures, Arc::clone(&clock))),
            weight: Arc::new(ReadingsWindowService::new(weights, Arc::clone(&clock))),
            weekly_points: Arc::new(WeeklyPointsService::new(points, clock)),
        },
    }
}

/// Build the shared HTTP state.
///
/// Diesel stores are used when a pool is configured, otherwise process-local
/// stores. Without a configured mirror, process-local stores are paired with
/// a process-local mirror and Diesel stores skip search indexing.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let state = match &config.db_pool {
        Some(pool) => {
            let mirror = config.search_mirror.clone().unwrap_or_else(|| {
                warn!("no search mirror configured; search results will be empty");
                Arc::new(NoOpSearchMirror) as Arc<dyn SearchMirror>
            });
            assemble(
                Stores {
                    blood_pressures: Arc::new(DieselBloodPressureRepository::new(pool.clone())),
                    weights: Arc::new(DieselWeightRepository::new(pool.clone())),
                    points: Arc::new(DieselPointsRepository::new(pool.clone())),
                    preferences: Arc::new(DieselPreferenceRepository::new(pool.clone())),
                },
                mirror,
                clock,
            )
        }
        None => {
            info!("no database configured; using in-memory stores");
            let mirror = config
                .search_mirror
                .clone()
                .unwrap_or_else(|| Arc::new(InMemorySearchMirror::new()) as Arc<dyn SearchMirror>);
            assemble(
                Stores {
                    blood_pressures: Arc::new(InMemoryRecordRepository::<BloodPressure>::new()),
                    weights: Arc::new(InMemoryRecordRepository::<WeightEntry>::new()),
                    points: Arc::new(InMemoryRecordRepository::<DailyPoints>::new()),
                    preferences: Arc::new(InMemoryRecordRepository::<Preference>::new()),
                },
                mirror,
                clock,
            )
        }
    };
    web::Data::new(state)
}
