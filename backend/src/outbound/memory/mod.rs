//! In-memory adapters for tests and database-less runs.
//!
//! State lives for the life of the process and is shared through `Arc`.

mod record_repository;
mod search_mirror;

pub use record_repository::InMemoryRecordRepository;
pub use search_mirror::InMemorySearchMirror;
