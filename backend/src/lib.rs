//! Health points backend library modules.
//!
//! - [`domain`]: record types, ports and services
//! - [`inbound`]: HTTP handlers driving the domain ports
//! - [`outbound`]: Diesel, Meilisearch and in-memory adapters
//! - [`middleware`]: request tracing

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
