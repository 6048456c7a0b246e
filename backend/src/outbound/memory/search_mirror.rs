//! Process-local search mirror.
//!
//! Documents are kept per kind and matched by case-insensitive substring
//! against their scalar values. An owner scope compares the document's
//! `user` field; documents without one stay visible.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ports::{OwnerScope, SearchMirror, SearchMirrorError};
use crate::domain::{RecordId, RecordKind};

type Documents = HashMap<RecordKind, BTreeMap<i64, Value>>;

/// In-memory [`SearchMirror`].
#[derive(Debug, Default)]
pub struct InMemorySearchMirror {
    documents: Mutex<Documents>,
}

impl InMemorySearchMirror {
    /// Create an empty mirror.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Documents>, SearchMirrorError> {
        self.documents
            .lock()
            .map_err(|_| SearchMirrorError::unavailable("in-memory mirror poisoned"))
    }

    /// Number of documents held for `kind`.
    pub fn len(&self, kind: RecordKind) -> usize {
        self.lock()
            .map(|documents| documents.get(&kind).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    /// Whether no documents are held for `kind`.
    pub fn is_empty(&self, kind: RecordKind) -> bool {
        self.len(kind) == 0
    }
}

fn matches(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(text) => text.to_lowercase().contains(needle),
        Value::Number(number) => number.to_string().contains(needle),
        Value::Bool(flag) => flag.to_string() == needle,
        Value::Array(items) => items.iter().any(|item| matches(item, needle)),
        Value::Object(fields) => fields.values().any(|field| matches(field, needle)),
        Value::Null => false,
    }
}

fn in_scope(document: &Value, scope: &OwnerScope) -> bool {
    match scope {
        OwnerScope::All => true,
        OwnerScope::Owner(login) => document
            .get("user")
            .and_then(Value::as_str)
            .is_none_or(|owner| owner == login.as_ref()),
    }
}

#[async_trait]
impl SearchMirror for InMemorySearchMirror {
    async fn index(
        &self,
        kind: RecordKind,
        id: RecordId,
        document: &Value,
    ) -> Result<(), SearchMirrorError> {
        let mut documents = self.lock()?;
        documents
            .entry(kind)
            .or_default()
            .insert(id.get(), document.clone());
        Ok(())
    }

    async fn remove(&self, kind: RecordKind, id: RecordId) -> Result<(), SearchMirrorError> {
        let mut documents = self.lock()?;
        if let Some(index) = documents.get_mut(&kind) {
            index.remove(&id.get());
        }
        Ok(())
    }

    async fn search(
        &self,
        kind: RecordKind,
        query: &str,
        scope: &OwnerScope,
    ) -> Result<Vec<Value>, SearchMirrorError> {
        let needle = query.trim().to_lowercase();
        let documents = self.lock()?;
        let Some(index) = documents.get(&kind) else {
            return Ok(Vec::new());
        };
        Ok(index
            .values()
            .filter(|document| in_scope(document, scope))
            .filter(|document| needle.is_empty() || matches(document, &needle))
            .cloned()
            .collect())
    }
}
