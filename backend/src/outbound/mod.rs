//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed record stores using Diesel ORM
//! - **search**: Meilisearch-backed search mirror
//! - **memory**: process-local stores and mirror for tests and local runs
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod search;
