//! Tests for the shared record request flow, exercised through the entity
//! handlers.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{LINK, LOCATION};
use actix_web::{App, test as actix_test, web};
use chrono::{Days, Local, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockSearchMirror, SearchMirrorError};
use crate::inbound::http::blood_pressures::{
    blood_pressure_by_days, create_blood_pressure, delete_blood_pressure, get_blood_pressure,
    list_blood_pressures, search_blood_pressures, update_blood_pressure,
};
use crate::inbound::http::error::ERROR_HEADER;
use crate::inbound::http::points::{create_points, list_points, points_this_week};
use crate::inbound::http::preferences::{create_preference, get_preference};
use crate::inbound::http::test_utils::{
    in_memory_state, in_memory_state_with_mirror, session_cookie, test_session_middleware,
};
use crate::inbound::http::users::authenticate;
use crate::inbound::http::validation::json_config;
use crate::inbound::http::weights::{create_weight, weight_by_days};

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api")
                .app_data(json_config())
                .service(authenticate)
                .service(create_blood_pressure)
                .service(update_blood_pressure)
                .service(list_blood_pressures)
                .service(get_blood_pressure)
                .service(delete_blood_pressure)
                .service(search_blood_pressures)
                .service(blood_pressure_by_days)
                .service(create_weight)
                .service(weight_by_days)
                .service(create_points)
                .service(list_points)
                .service(points_this_week)
                .service(create_preference)
                .service(get_preference),
        )
}

fn login_request(account: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/authenticate")
        .set_json(json!({"username": account, "password": account}))
}

fn post_json(uri: &str, body: &Value, cookie: &Cookie<'static>) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri(uri)
        .cookie(cookie.clone())
        .set_json(body)
}

fn put_json(uri: &str, body: &Value, cookie: &Cookie<'static>) -> actix_test::TestRequest {
    actix_test::TestRequest::put()
        .uri(uri)
        .cookie(cookie.clone())
        .set_json(body)
}

fn get(uri: &str, cookie: &Cookie<'static>) -> actix_test::TestRequest {
    actix_test::TestRequest::get().uri(uri).cookie(cookie.clone())
}

fn header<'a>(response: &'a ServiceResponse, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

async fn json_body(response: ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}

fn reading(systolic: i32) -> Value {
    json!({
        "timestamp": Utc::now().to_rfc3339(),
        "systolic": systolic,
        "diastolic": 80,
    })
}

#[actix_web::test]
async fn record_endpoints_require_a_session() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/blood-pressures")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_then_fetch_returns_the_stored_reading() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);

    let created = actix_test::call_service(
        &app,
        post_json("/api/blood-pressures", &reading(121), &cookie).to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(header(&created, LOCATION.as_str()), Some("/api/blood-pressures/1"));
    assert_eq!(
        header(&created, ALERT_HEADER),
        Some("healthPoints.bloodPressure.created")
    );
    assert_eq!(header(&created, PARAMS_HEADER), Some("1"));
    let body = json_body(created).await;
    assert_eq!(body["user"], "user");

    let fetched =
        actix_test::call_service(&app, get("/api/blood-pressures/1", &cookie).to_request()).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(json_body(fetched).await, body);
}

#[actix_web::test]
async fn create_rejects_a_preset_id_with_alert_headers() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);
    let mut payload = reading(120);
    payload["id"] = json!(7);

    let response = actix_test::call_service(
        &app,
        post_json("/api/blood-pressures", &payload, &cookie).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header(&response, ERROR_HEADER), Some("error.idexists"));
    assert_eq!(header(&response, PARAMS_HEADER), Some("bloodPressure"));
    let body = json_body(response).await;
    assert_eq!(body["details"]["errorKey"], "idexists");
}

#[actix_web::test]
async fn non_admin_create_ignores_a_foreign_owner() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);
    let mut payload = reading(120);
    payload["user"] = json!("admin");

    let response = actix_test::call_service(
        &app,
        post_json("/api/blood-pressures", &payload, &cookie).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["user"], "user");
}

#[actix_web::test]
async fn put_without_id_creates_and_with_id_updates() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);

    let created = actix_test::call_service(
        &app,
        put_json("/api/blood-pressures", &reading(130), &cookie).to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let mut record = json_body(created).await;

    record["systolic"] = json!(118);
    let updated = actix_test::call_service(
        &app,
        put_json("/api/blood-pressures", &record, &cookie).to_request(),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(
        header(&updated, ALERT_HEADER),
        Some("healthPoints.bloodPressure.updated")
    );
    assert_eq!(json_body(updated).await["systolic"], 118);
}

#[actix_web::test]
async fn update_of_unknown_id_is_not_found() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);
    let mut payload = reading(120);
    payload["id"] = json!(99);

    let response = actix_test::call_service(
        &app,
        put_json("/api/blood-pressures", &payload, &cookie).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case::owner_omitted(None, "user")]
#[case::owner_named(Some("admin"), "admin")]
#[actix_web::test]
async fn admin_update_keeps_the_stored_owner_unless_named(
    #[case] named: Option<&str>,
    #[case] expected: &str,
) {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let user_login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let user = session_cookie(&user_login);
    let admin_login = actix_test::call_service(&app, login_request("admin").to_request()).await;
    let admin = session_cookie(&admin_login);
    let created = actix_test::call_service(
        &app,
        post_json("/api/blood-pressures", &reading(125), &user).to_request(),
    )
    .await;
    let mut record = json_body(created).await;
    record["systolic"] = json!(121);
    match named {
        Some(owner) => record["user"] = json!(owner),
        None => {
            record.as_object_mut().expect("object").remove("user");
        }
    }

    let updated = actix_test::call_service(
        &app,
        put_json("/api/blood-pressures", &record, &admin).to_request(),
    )
    .await;

    assert_eq!(updated.status(), StatusCode::OK);
    let body = json_body(updated).await;
    assert_eq!(body["user"], expected);
    assert_eq!(body["systolic"], 121);
}

#[rstest]
#[case("/api/blood-pressures/42")]
#[actix_web::test]
async fn missing_records_answer_an_empty_not_found(#[case] uri: &str) {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);

    let fetched = actix_test::call_service(&app, get(uri, &cookie).to_request()).await;
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
    assert!(actix_test::read_body(fetched).await.is_empty());

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(uri)
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NOT_FOUND);
    assert!(actix_test::read_body(deleted).await.is_empty());
}

#[actix_web::test]
async fn delete_removes_the_record() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);
    actix_test::call_service(
        &app,
        post_json("/api/blood-pressures", &reading(120), &cookie).to_request(),
    )
    .await;

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/blood-pressures/1")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(
        header(&deleted, ALERT_HEADER),
        Some("healthPoints.bloodPressure.deleted")
    );

    let fetched =
        actix_test::call_service(&app, get("/api/blood-pressures/1", &cookie).to_request()).await;
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn users_cannot_see_each_others_records() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let admin_login = actix_test::call_service(&app, login_request("admin").to_request()).await;
    let admin = session_cookie(&admin_login);
    let user_login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let user = session_cookie(&user_login);
    actix_test::call_service(
        &app,
        post_json("/api/blood-pressures", &reading(140), &admin).to_request(),
    )
    .await;

    let as_user =
        actix_test::call_service(&app, get("/api/blood-pressures/1", &user).to_request()).await;
    assert_eq!(as_user.status(), StatusCode::NOT_FOUND);

    let as_admin =
        actix_test::call_service(&app, get("/api/blood-pressures/1", &admin).to_request()).await;
    assert_eq!(as_admin.status(), StatusCode::OK);
}

#[actix_web::test]
async fn list_carries_pagination_headers() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);
    for systolic in [110, 120, 130] {
        actix_test::call_service(
            &app,
            post_json("/api/blood-pressures", &reading(systolic), &cookie).to_request(),
        )
        .await;
    }

    let response = actix_test::call_service(
        &app,
        get("/api/blood-pressures?page=0&size=2&sort=systolic,asc", &cookie).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, TOTAL_COUNT_HEADER), Some("3"));
    let link = header(&response, LINK.as_str()).expect("link header").to_owned();
    assert!(link.contains("page=1&size=2&sort=systolic%2Casc>; rel=\"next\""));
    assert!(link.contains("rel=\"last\""));
    let body = json_body(response).await;
    let systolics: Vec<i64> = body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|item| item["systolic"].as_i64())
        .collect();
    assert_eq!(systolics, vec![110, 120]);
}

#[rstest]
#[case("size=0", "invalid_page_size")]
#[case("sort=systolic,sideways", "invalid_sort")]
#[case("sort=password,asc", "unknown_sort_field")]
#[actix_web::test]
async fn list_rejects_bad_parameters(#[case] query: &str, #[case] code: &str) {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);

    let response = actix_test::call_service(
        &app,
        get(&format!("/api/blood-pressures?{query}"), &cookie).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["details"]["code"], code);
}

#[actix_web::test]
async fn admins_list_every_users_points() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let admin_login = actix_test::call_service(&app, login_request("admin").to_request()).await;
    let admin = session_cookie(&admin_login);
    let user_login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let user = session_cookie(&user_login);
    let today = Local::now().date_naive().to_string();
    for cookie in [&admin, &user] {
        actix_test::call_service(
            &app,
            post_json(
                "/api/points",
                &json!({"date": today, "exercise": 1, "meals": 1, "alcohol": 1}),
                cookie,
            )
            .to_request(),
        )
        .await;
    }

    let as_admin = actix_test::call_service(&app, get("/api/points", &admin).to_request()).await;
    assert_eq!(header(&as_admin, TOTAL_COUNT_HEADER), Some("2"));
    let as_user = actix_test::call_service(&app, get("/api/points", &user).to_request()).await;
    assert_eq!(header(&as_user, TOTAL_COUNT_HEADER), Some("1"));
}

#[actix_web::test]
async fn search_finds_mirrored_records() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);
    for systolic in [121, 135] {
        let payload = json!({
            "timestamp": "2026-03-01T08:30:00Z",
            "systolic": systolic,
            "diastolic": 80,
        });
        actix_test::call_service(
            &app,
            post_json("/api/blood-pressures", &payload, &cookie).to_request(),
        )
        .await;
    }

    let response = actix_test::call_service(
        &app,
        get("/api/_search/blood-pressures/135", &cookie).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let hits = body.as_array().expect("array");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits.first().map(|hit| hit["systolic"].clone()), Some(json!(135)));
}

#[actix_web::test]
async fn mirror_failure_keeps_the_stored_record() {
    let mut mirror = MockSearchMirror::new();
    mirror
        .expect_index()
        .returning(|_, _, _| Err(SearchMirrorError::unavailable("index down")));
    let app = actix_test::init_service(test_app(in_memory_state_with_mirror(Arc::new(mirror))))
        .await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);

    let created = actix_test::call_service(
        &app,
        post_json("/api/blood-pressures", &reading(120), &cookie).to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let fetched =
        actix_test::call_service(&app, get("/api/blood-pressures/1", &cookie).to_request()).await;
    assert_eq!(fetched.status(), StatusCode::OK);
}

#[rstest]
#[case::goal_above_range("/api/preferences", json!({"weeklyGoal": 22, "weightUnits": "kg"}), "preference", "weeklyGoal")]
#[case::goal_beyond_a_byte("/api/preferences", json!({"weeklyGoal": 300, "weightUnits": "kg"}), "preference", "weeklyGoal")]
#[case::units_missing("/api/preferences", json!({"weeklyGoal": 12}), "preference", "weightUnits")]
#[case::negative_flag(
    "/api/points",
    json!({"date": "2026-03-02", "exercise": -1, "meals": 1, "alcohol": 0}),
    "points",
    "exercise"
)]
#[actix_web::test]
async fn invalid_payload_names_the_field(
    #[case] uri: &str,
    #[case] body: Value,
    #[case] entity: &str,
    #[case] field: &str,
) {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);

    let response =
        actix_test::call_service(&app, post_json(uri, &body, &cookie).to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header(&response, ERROR_HEADER), Some("error.validation"));
    assert_eq!(header(&response, PARAMS_HEADER), Some(entity));
    let payload = json_body(response).await;
    assert_eq!(payload["details"]["entityName"], entity);
    assert_eq!(payload["details"]["field"], field);
}

#[actix_web::test]
async fn undecodable_body_is_a_structured_failure() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);

    let response = actix_test::call_service(
        &app,
        post_json(
            "/api/blood-pressures",
            &json!({"timestamp": "yesterday", "systolic": 120, "diastolic": 80}),
            &cookie,
        )
        .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header(&response, ERROR_HEADER), Some("error.validation"));
    assert_eq!(header(&response, PARAMS_HEADER), Some("bloodPressure"));
    let payload = json_body(response).await;
    assert_eq!(payload["code"], "invalid_request");
    assert_eq!(payload["details"]["code"], "malformed_payload");
}

#[actix_web::test]
async fn preferences_are_shared_between_users() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let admin_login = actix_test::call_service(&app, login_request("admin").to_request()).await;
    let admin = session_cookie(&admin_login);
    let user_login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let user = session_cookie(&user_login);
    let created = actix_test::call_service(
        &app,
        post_json(
            "/api/preferences",
            &json!({"weeklyGoal": 15, "weightUnits": "lb"}),
            &admin,
        )
        .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let fetched =
        actix_test::call_service(&app, get("/api/preferences/1", &user).to_request()).await;

    assert_eq!(fetched.status(), StatusCode::OK);
    let body = json_body(fetched).await;
    assert_eq!(body, json!({"id": 1, "weeklyGoal": 15, "weightUnits": "lb"}));
}

#[actix_web::test]
async fn by_days_returns_recent_readings_newest_first() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);
    let now = Utc::now();
    for (days_ago, systolic) in [(1_u64, 121), (3, 123), (40, 140)] {
        let taken_at = now.checked_sub_days(Days::new(days_ago)).expect("instant");
        actix_test::call_service(
            &app,
            post_json(
                "/api/blood-pressures",
                &json!({
                    "timestamp": taken_at.to_rfc3339(),
                    "systolic": systolic,
                    "diastolic": 80,
                }),
                &cookie,
            )
            .to_request(),
        )
        .await;
    }

    let response =
        actix_test::call_service(&app, get("/api/bp-by-days/30", &cookie).to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["period"], "Last 30 Days");
    let systolics: Vec<i64> = body["readings"]
        .as_array()
        .expect("readings")
        .iter()
        .filter_map(|item| item["systolic"].as_i64())
        .collect();
    assert_eq!(systolics, vec![121, 123]);
}

#[actix_web::test]
async fn by_days_rejects_negative_windows() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);

    let response =
        actix_test::call_service(&app, get("/api/weight-by-days/-1", &cookie).to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["details"]["field"], "days");
}

#[actix_web::test]
async fn weight_window_is_empty_without_entries() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);
    actix_test::call_service(
        &app,
        post_json(
            "/api/weights",
            &json!({"timestamp": "2001-01-01T00:00:00Z", "weight": 80.0}),
            &cookie,
        )
        .to_request(),
    )
    .await;

    let response =
        actix_test::call_service(&app, get("/api/weight-by-days/7", &cookie).to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"period": "Last 7 Days", "readings": []})
    );
}

#[actix_web::test]
async fn points_this_week_sums_only_the_callers_records() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let login = actix_test::call_service(&app, login_request("user").to_request()).await;
    let cookie = session_cookie(&login);
    let admin_login = actix_test::call_service(&app, login_request("admin").to_request()).await;
    let admin = session_cookie(&admin_login);
    let today = Local::now().date_naive();
    actix_test::call_service(
        &app,
        post_json(
            "/api/points",
            &json!({"date": today, "exercise": 1, "meals": 1, "alcohol": 0}),
            &cookie,
        )
        .to_request(),
    )
    .await;
    actix_test::call_service(
        &app,
        post_json(
            "/api/points",
            &json!({"date": today, "exercise": 1, "meals": 1, "alcohol": 1}),
            &admin,
        )
        .to_request(),
    )
    .await;

    let response =
        actix_test::call_service(&app, get("/api/points-this-week", &cookie).to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["points"], 2);
}
