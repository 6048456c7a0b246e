//! Meilisearch-backed search mirror.
//!
//! One index per record kind, named by [`RecordKind::index_name`], with
//! documents keyed on `id`. Index writes wait for the enqueued task so a
//! successful call means the document is searchable. Owned kinds filter on
//! `user` inside the index, so the hit limit counts only visible documents.

use std::time::Duration;

use async_trait::async_trait;
use meilisearch_sdk::client::Client;
use meilisearch_sdk::errors::{Error as MeiliError, ErrorCode};
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::ports::{OwnerScope, SearchMirror, SearchMirrorError};
use crate::domain::{RecordId, RecordKind};

/// Primary key attribute shared by every index.
pub const DOCUMENT_ID: &str = "id";

/// Attribute holding the owning login on owned documents.
pub const OWNER_ATTRIBUTE: &str = "user";

/// Upper bound on hits returned by one search.
pub const MAX_HITS: usize = 1000;

/// Default time to wait for an indexing task.
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(5);

/// [`SearchMirror`] adapter for a Meilisearch server.
#[derive(Clone)]
pub struct MeilisearchMirror {
    client: Client,
    task_timeout: Duration,
}

impl MeilisearchMirror {
    /// Build a mirror for the server at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchMirrorError::Rejected`] when the client cannot be
    /// built from `url`.
    pub fn new(url: &str, api_key: Option<&str>) -> Result<Self, SearchMirrorError> {
        let client = Client::new(url, api_key).map_err(map_meili_error)?;
        Ok(Self {
            client,
            task_timeout: DEFAULT_TASK_TIMEOUT,
        })
    }

    /// Override how long index writes wait for their task.
    #[must_use]
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = timeout;
        self
    }

    /// Mark [`OWNER_ATTRIBUTE`] filterable on every owned index.
    ///
    /// Creates the indexes when missing. Owner-scoped searches fail until
    /// this has run against the server.
    ///
    /// # Errors
    ///
    /// Returns the first adapter error or a [`SearchMirrorError::Rejected`]
    /// when a settings task fails.
    pub async fn prepare_indexes(&self) -> Result<(), SearchMirrorError> {
        for kind in RecordKind::ALL.into_iter().filter(|kind| kind.is_owned()) {
            let task = self
                .client
                .index(kind.index_name())
                .set_filterable_attributes([OWNER_ATTRIBUTE])
                .await
                .map_err(map_meili_error)?
                .wait_for_completion(&self.client, None, Some(self.task_timeout))
                .await
                .map_err(map_meili_error)?;
            if task.is_failure() {
                return Err(SearchMirrorError::rejected(format!(
                    "configuring index {} failed",
                    kind.index_name()
                )));
            }
            info!(index = kind.index_name(), "owner filter enabled");
        }
        Ok(())
    }
}

/// Filter expression restricting hits to `scope`.
///
/// Logins never contain quotes or backslashes, so quoting is enough.
fn owner_filter(kind: RecordKind, scope: &OwnerScope) -> Option<String> {
    match scope {
        OwnerScope::Owner(login) if kind.is_owned() => {
            Some(format!("{OWNER_ATTRIBUTE} = \"{login}\""))
        }
        _ => None,
    }
}

fn map_meili_error(error: MeiliError) -> SearchMirrorError {
    debug!(%error, "meilisearch call failed");
    match error {
        MeiliError::Meilisearch(inner) => SearchMirrorError::rejected(inner.error_message),
        other => SearchMirrorError::unavailable(other.to_string()),
    }
}

fn is_missing_index(error: &MeiliError) -> bool {
    match error {
        MeiliError::Meilisearch(inner) => matches!(inner.error_code, ErrorCode::IndexNotFound),
        _ => false,
    }
}

#[async_trait]
impl SearchMirror for MeilisearchMirror {
    async fn index(
        &self,
        kind: RecordKind,
        id: RecordId,
        document: &Value,
    ) -> Result<(), SearchMirrorError> {
        let task = self
            .client
            .index(kind.index_name())
            .add_or_update(std::slice::from_ref(document), Some(DOCUMENT_ID))
            .await
            .map_err(map_meili_error)?
            .wait_for_completion(&self.client, None, Some(self.task_timeout))
            .await
            .map_err(map_meili_error)?;
        if task.is_failure() {
            return Err(SearchMirrorError::rejected(format!(
                "indexing {} {id} failed",
                kind.entity_name()
            )));
        }
        Ok(())
    }

    async fn remove(&self, kind: RecordKind, id: RecordId) -> Result<(), SearchMirrorError> {
        // Deleting from a missing index fails inside the task, so only the
        // enqueue is checked.
        self.client
            .index(kind.index_name())
            .delete_document(id.get())
            .await
            .map_err(map_meili_error)?;
        Ok(())
    }

    async fn search(
        &self,
        kind: RecordKind,
        query: &str,
        scope: &OwnerScope,
    ) -> Result<Vec<Value>, SearchMirrorError> {
        let index = self.client.index(kind.index_name());
        let filter = owner_filter(kind, scope);
        let mut request = index.search();
        request.with_query(query).with_limit(MAX_HITS);
        if let Some(filter) = filter.as_deref() {
            request.with_filter(filter);
        }
        let results = match request.execute::<Value>().await {
            Ok(results) => results,
            Err(error) if is_missing_index(&error) => return Ok(Vec::new()),
            Err(error) => return Err(map_meili_error(error)),
        };
        Ok(results.hits.into_iter().map(|hit| hit.result).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::UserLogin;
    use rstest::rstest;

    fn owner(raw: &str) -> OwnerScope {
        OwnerScope::Owner(UserLogin::new(raw).expect("login"))
    }

    #[rstest]
    #[case::owned_kind(RecordKind::Points, owner("user"), Some("user = \"user\""))]
    #[case::dotted_login(RecordKind::Weight, owner("o'neil.j@x"), Some("user = \"o'neil.j@x\""))]
    #[case::admin_scope(RecordKind::BloodPressure, OwnerScope::All, None)]
    #[case::shared_kind(RecordKind::Preference, owner("user"), None)]
    fn owner_filter_matches_the_scope(
        #[case] kind: RecordKind,
        #[case] scope: OwnerScope,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(owner_filter(kind, &scope).as_deref(), expected);
    }

    #[rstest]
    fn builds_without_contacting_the_server() {
        let mirror = MeilisearchMirror::new("http://127.0.0.1:1", Some("key"))
            .expect("client builds")
            .with_task_timeout(Duration::from_millis(10));
        assert_eq!(mirror.task_timeout, Duration::from_millis(10));
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_servers_are_unavailable() {
        let mirror = MeilisearchMirror::new("http://127.0.0.1:1", None).expect("client builds");

        let err = mirror
            .search(RecordKind::Weight, "80", &owner("user"))
            .await
            .expect_err("nothing listens on port 1");

        assert!(matches!(err, SearchMirrorError::Unavailable { .. }));
    }
}
