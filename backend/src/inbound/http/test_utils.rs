//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use mockable::DefaultClock;

use crate::domain::ports::{FixtureLoginService, SearchMirror};
use crate::domain::{
    BloodPressure, DailyPoints, Preference, ReadingsWindowService, RecordService,
    WeeklyPointsService, WeightEntry,
};
use crate::inbound::http::state::{HttpState, RecordPorts, WindowPorts};
use crate::outbound::memory::{InMemoryRecordRepository, InMemorySearchMirror};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state over fresh in-memory stores and the given search mirror.
pub fn in_memory_state_with_mirror<M>(mirror: Arc<M>) -> HttpState
where
    M: SearchMirror + 'static,
{
    let blood_pressures = Arc::new(InMemoryRecordRepository::<BloodPressure>::new());
    let weights = Arc::new(InMemoryRecordRepository::<WeightEntry>::new());
    let points = Arc::new(InMemoryRecordRepository::<DailyPoints>::new());
    let preferences = Arc::new(InMemoryRecordRepository::<Preference>::new());
    let clock = Arc::new(DefaultClock);

    HttpState {
        login: Arc::new(FixtureLoginService),
        blood_pressures: RecordPorts::from_service(Arc::new(RecordService::new(
            Arc::clone(&blood_pressures),
            Arc::clone(&mirror),
        ))),
        weights: RecordPorts::from_service(Arc::new(RecordService::new(
            Arc::clone(&weights),
            Arc::clone(&mirror),
        ))),
        points: RecordPorts::from_service(Arc::new(RecordService::new(
            Arc::clone(&points),
            Arc::clone(&mirror),
        ))),
        preferences: RecordPorts::from_service(Arc::new(RecordService::new(preferences, mirror))),
        windows: WindowPorts {
            blood_pressure: Arc::new(ReadingsWindowService::new(blood_pressures, clock.clone())),
            weight: Arc::new(ReadingsWindowService::new(weights, clock.clone())),
            weekly_points: Arc::new(WeeklyPointsService::new(points, clock)),
        },
    }
}

/// HTTP state over fresh in-memory stores and an in-memory mirror.
pub fn in_memory_state() -> HttpState {
    in_memory_state_with_mirror(Arc::new(InMemorySearchMirror::new()))
}

/// Extract the session cookie set by a login response.
pub fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
