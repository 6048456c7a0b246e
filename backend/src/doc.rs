//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every record endpoint, the reading windows, the weekly points
//!   total, the session endpoints and the health probes
//! - **Schemas**: wrappers from [`crate::inbound::http::schemas`] so domain
//!   types stay free of utoipa derives
//! - **Security**: Session cookie authentication scheme
//!
//! The generated document is served by Swagger UI in debug builds.

use crate::inbound::http::records_dto::{
    BloodPressureRequest, PointsRequest, PreferenceRequest, WeightRequest,
};
use crate::inbound::http::schemas::{
    BloodPressureSchema, BloodPressureWindowSchema, ErrorCodeSchema, ErrorSchema, PointsSchema,
    PreferenceSchema, WeeklyPointsSchema, WeightSchema, WeightWindowSchema,
};
use crate::inbound::http::users::LoginRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/authenticate.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Health points API",
        description = "Track blood pressure, weight and daily health points."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::authenticate,
        crate::inbound::http::users::logout,
        crate::inbound::http::blood_pressures::create_blood_pressure,
        crate::inbound::http::blood_pressures::update_blood_pressure,
        crate::inbound::http::blood_pressures::list_blood_pressures,
        crate::inbound::http::blood_pressures::get_blood_pressure,
        crate::inbound::http::blood_pressures::delete_blood_pressure,
        crate::inbound::http::blood_pressures::search_blood_pressures,
        crate::inbound::http::blood_pressures::blood_pressure_by_days,
        crate::inbound::http::weights::create_weight,
        crate::inbound::http::weights::update_weight,
        crate::inbound::http::weights::list_weights,
        crate::inbound::http::weights::get_weight,
        crate::inbound::http::weights::delete_weight,
        crate::inbound::http::weights::search_weights,
        crate::inbound::http::weights::weight_by_days,
        crate::inbound::http::points::create_points,
        crate::inbound::http::points::update_points,
        crate::inbound::http::points::list_points,
        crate::inbound::http::points::get_points,
        crate::inbound::http::points::delete_points,
        crate::inbound::http::points::search_points,
        crate::inbound::http::points::points_this_week,
        crate::inbound::http::preferences::create_preference,
        crate::inbound::http::preferences::update_preference,
        crate::inbound::http::preferences::list_preferences,
        crate::inbound::http::preferences::get_preference,
        crate::inbound::http::preferences::delete_preference,
        crate::inbound::http::preferences::search_preferences,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        BloodPressureRequest,
        WeightRequest,
        PointsRequest,
        PreferenceRequest,
        BloodPressureSchema,
        WeightSchema,
        PointsSchema,
        PreferenceSchema,
        BloodPressureWindowSchema,
        WeightWindowSchema,
        WeeklyPointsSchema,
    )),
    tags(
        (name = "session", description = "Login and logout"),
        (name = "blood-pressures", description = "Blood pressure readings"),
        (name = "weights", description = "Weight readings"),
        (name = "points", description = "Daily health points"),
        (name = "preferences", description = "Weekly goal and weight units"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[rstest]
    #[case("/api/authenticate")]
    #[case("/api/blood-pressures")]
    #[case("/api/blood-pressures/{id}")]
    #[case("/api/_search/blood-pressures/{query}")]
    #[case("/api/bp-by-days/{days}")]
    #[case("/api/weights")]
    #[case("/api/weight-by-days/{days}")]
    #[case("/api/points")]
    #[case("/api/points-this-week")]
    #[case("/api/preferences/{id}")]
    #[case("/health/ready")]
    fn openapi_registers_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(
            doc.paths.paths.contains_key(path),
            "missing path {path}"
        );
    }

    #[test]
    fn openapi_declares_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
