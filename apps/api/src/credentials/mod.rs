//! Credential store: short-lived cache of user-supplied backend API keys.
//!
//! Each entry is `{value, stored_at}` with a fixed TTL checked on read.
//! Expired entries are purged when touched and reported as absent, which the
//! gateway then treats exactly like a missing credential.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct CredentialEntry {
    value: String,
    stored_at: DateTime<Utc>,
}

/// Handle returned to the client after storing a credential.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialTicket {
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct CredentialStore {
    entries: Arc<RwLock<HashMap<Uuid, CredentialEntry>>>,
    ttl: Duration,
}

impl CredentialStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Stores `value` under a fresh session id.
    pub async fn put(&self, value: String, now: DateTime<Utc>) -> CredentialTicket {
        let session_id = Uuid::new_v4();
        self.entries.write().await.insert(
            session_id,
            CredentialEntry {
                value,
                stored_at: now,
            },
        );
        CredentialTicket {
            session_id,
            expires_at: now + self.ttl,
        }
    }

    /// Returns the credential if present and younger than the TTL.
    /// An expired entry is removed.
    pub async fn get(&self, session_id: Uuid, now: DateTime<Utc>) -> Option<String> {
        {
            let entries = self.entries.read().await;
            let entry = entries.get(&session_id)?;
            if now - entry.stored_at < self.ttl {
                return Some(entry.value.clone());
            }
        }

        debug!("Credential session {session_id} expired, purging");
        self.entries.write().await.remove(&session_id);
        None
    }

    pub async fn remove(&self, session_id: Uuid) -> bool {
        self.entries.write().await.remove(&session_id).is_some()
    }

    /// Drops every expired entry. Returns how many were removed.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| now - e.stored_at < self.ttl);
        before - entries.len()
    }
}
