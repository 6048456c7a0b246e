//! Search engine adapters implementing the search mirror port.

mod meilisearch_mirror;

pub use meilisearch_mirror::{DEFAULT_TASK_TIMEOUT, DOCUMENT_ID, MeilisearchMirror};
