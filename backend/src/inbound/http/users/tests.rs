//! Tests for session API handlers.

use super::*;
use crate::inbound::http::test_utils::{in_memory_state, session_cookie, test_session_middleware};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, get, test as actix_test, web};
use rstest::rstest;
use serde_json::Value;

#[derive(Debug)]
struct ValidationExpectation<'a> {
    message: &'a str,
    field: &'a str,
    code: &'a str,
}

/// Echo the caller so tests can observe what the session holds.
#[get("/whoami")]
async fn whoami(session: SessionContext) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    Ok(HttpResponse::Ok().body(format!(
        "{}:{}",
        caller.login().as_ref(),
        caller.is_admin()
    )))
}

fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(in_memory_state()))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api")
                .service(authenticate)
                .service(logout)
                .service(whoami),
        )
}

fn login_request(username: &str, password: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/authenticate")
        .set_json(&LoginRequest {
            username: username.into(),
            password: password.into(),
        })
}

#[rstest]
#[case(
    "   ",
    "user",
    ValidationExpectation {
        message: "username must not be empty",
        field: "username",
        code: "empty_username",
    }
)]
#[case(
    "user",
    "",
    ValidationExpectation {
        message: "password must not be empty",
        field: "password",
        code: "empty_password",
    }
)]
#[case(
    "has space",
    "user",
    ValidationExpectation {
        message: "invalid username: login may only contain letters, numbers, and the characters _ ' . @ -",
        field: "username",
        code: "invalid_username",
    }
)]
#[actix_web::test]
async fn authenticate_rejects_malformed_credentials(
    #[case] username: &str,
    #[case] password: &str,
    #[case] expected: ValidationExpectation<'_>,
) {
    let app = actix_test::init_service(test_app()).await;

    let response =
        actix_test::call_service(&app, login_request(username, password).to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = actix_test::read_body(response).await;
    let value: Value = serde_json::from_slice(&body).expect("error payload");
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some(expected.message)
    );
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some("invalid_request")
    );
    let details = value
        .get("details")
        .and_then(Value::as_object)
        .expect("details present");
    assert_eq!(
        details.get("field").and_then(Value::as_str),
        Some(expected.field)
    );
    assert_eq!(
        details.get("code").and_then(Value::as_str),
        Some(expected.code)
    );
}

#[actix_web::test]
async fn authenticate_rejects_wrong_password_with_unauthorised_status() {
    let app = actix_test::init_service(test_app()).await;

    let response =
        actix_test::call_service(&app, login_request("admin", "wrong-password").to_request())
            .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = actix_test::read_body(response).await;
    let value: Value = serde_json::from_slice(&body).expect("error payload");
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("invalid credentials")
    );
}

#[rstest]
#[case("admin", "admin:true")]
#[case("user", "user:false")]
#[actix_web::test]
async fn authenticate_stores_the_caller(#[case] account: &str, #[case] expected: &str) {
    let app = actix_test::init_service(test_app()).await;

    let login = actix_test::call_service(&app, login_request(account, account).to_request()).await;
    assert_eq!(login.status(), StatusCode::OK);
    let cookie = session_cookie(&login);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/whoami")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = actix_test::read_body(response).await;
    assert_eq!(body, expected);
}

#[actix_web::test]
async fn logout_expires_the_session_cookie() {
    let app = actix_test::init_service(test_app()).await;
    let login = actix_test::call_service(&app, login_request("user", "user").to_request()).await;
    let cookie = session_cookie(&login);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let removal = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("removal cookie");
    assert_eq!(removal.value(), "");
}
