//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::{AppSettings, ServerConfig};
#[cfg(feature = "metrics")]
use metrics::build_metrics;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use health_points::Trace;
#[cfg(debug_assertions)]
use health_points::doc::ApiDoc;
use health_points::inbound::http::blood_pressures::{
    blood_pressure_by_days, create_blood_pressure, delete_blood_pressure, get_blood_pressure,
    list_blood_pressures, search_blood_pressures, update_blood_pressure,
};
use health_points::inbound::http::health::{HealthState, live, ready};
use health_points::inbound::http::points::{
    create_points, delete_points, get_points, list_points, points_this_week, search_points,
    update_points,
};
use health_points::inbound::http::preferences::{
    create_preference, delete_preference, get_preference, list_preferences, search_preferences,
    update_preference,
};
use health_points::inbound::http::state::HttpState;
use health_points::inbound::http::users::{authenticate, logout};
use health_points::inbound::http::validation::json_config;
use health_points::inbound::http::weights::{
    create_weight, delete_weight, get_weight, list_weights, search_weights, update_weight,
    weight_by_days,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    session_ttl_hours: i64,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
        session_ttl_hours,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(
            actix_web::cookie::time::Duration::hours(session_ttl_hours),
        ))
        .build();

    let api = web::scope("/api")
        .wrap(session)
        .app_data(json_config())
        .service(authenticate)
        .service(logout)
        .service(create_blood_pressure)
        .service(update_blood_pressure)
        .service(list_blood_pressures)
        .service(get_blood_pressure)
        .service(delete_blood_pressure)
        .service(search_blood_pressures)
        .service(blood_pressure_by_days)
        .service(create_weight)
        .service(update_weight)
        .service(list_weights)
        .service(get_weight)
        .service(delete_weight)
        .service(search_weights)
        .service(weight_by_days)
        .service(create_points)
        .service(update_points)
        .service(list_points)
        .service(get_points)
        .service(delete_points)
        .service(search_points)
        .service(points_this_week)
        .service(create_preference)
        .service(update_preference)
        .service(list_preferences)
        .service(get_preference)
        .service(delete_preference)
        .service(search_preferences);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing session, binding, and store
///   settings. Request metrics are served at `/metrics` when the `metrics`
///   feature is enabled.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        session_ttl_hours,
        bind_addr,
        db_pool: _,
        search_mirror: _,
    } = config;
    #[cfg(feature = "metrics")]
    let prometheus = build_metrics()?;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            session_ttl_hours,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "http server listening");
    health_state.mark_ready();
    Ok(server)
}
