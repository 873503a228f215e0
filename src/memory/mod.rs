//! Conversation store: accumulated processing history per submission.
//!
//! A record is the left fold of every partial update written for its id,
//! under a shallow merge: a later top-level key replaces the earlier value
//! wholesale (nested maps and lists are not merged).
//!
//! All operations take one store-wide lock for their whole duration, so the
//! read-merge-write in [`ConversationStore::append`] never loses a concurrent
//! update. Backing storage is process memory only.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;

/// A conversation record: string keys to arbitrary JSON values.
pub type Record = Map<String, Value>;

/// Turn a `json!({...})` value into a [`Record`].
///
/// Non-object values are wrapped under a `"value"` key.
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

/// Concurrent-safe, in-memory conversation store.
///
/// Shared by handle (`Arc<ConversationStore>`); there is no global instance.
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: Mutex<HashMap<String, Record>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the record for `id`.
    ///
    /// Fails with [`StoreError::AlreadyExists`] if `id` is present; use
    /// [`append`](Self::append) to update an existing record.
    pub async fn store(&self, id: &str, data: Record) -> Result<(), StoreError> {
        let mut conversations = self.conversations.lock().await;
        if conversations.contains_key(id) {
            return Err(StoreError::AlreadyExists { id: id.to_string() });
        }

        debug!(conversation_id = %id, keys = data.len(), "Conversation created");
        conversations.insert(id.to_string(), data);
        Ok(())
    }

    /// Shallow-merge `data` into the record for `id`, creating it if absent.
    pub async fn append(&self, id: &str, data: Record) {
        let mut conversations = self.conversations.lock().await;

        match conversations.get_mut(id) {
            Some(existing) => {
                debug!(conversation_id = %id, keys = data.len(), "Conversation merged");
                existing.extend(data);
            }
            None => {
                debug!(conversation_id = %id, "Append on absent conversation, creating it");
                conversations.insert(id.to_string(), data);
            }
        }
    }

    /// The current merged record for `id`, or `None` if never stored.
    pub async fn retrieve(&self, id: &str) -> Option<Record> {
        let conversations = self.conversations.lock().await;
        conversations.get(id).cloned()
    }

    /// Whether a record exists for `id`.
    pub async fn contains(&self, id: &str) -> bool {
        self.conversations.lock().await.contains_key(id)
    }

    /// Number of stored conversations.
    pub async fn len(&self) -> usize {
        self.conversations.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.lock().await.is_empty()
    }
}
