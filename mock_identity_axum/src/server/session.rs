use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use mock_identity::SecurityContext;

use crate::errors::MockMvcError;
use crate::utils::gen_random_string;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct StoredSession {
    pub(crate) context: SecurityContext,
    pub(crate) csrf_token: String,
    pub(crate) expires_at: DateTime<Utc>,
    pub(crate) ttl: u64,
}

impl StoredSession {
    fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Expiry instant `ttl` seconds from now; a ttl past the representable range is an error
fn expiry_after(ttl: u64) -> Result<DateTime<Utc>, MockMvcError> {
    let out_of_range = || MockMvcError::Session(format!("Session max age {ttl}s is out of range"));
    let seconds = i64::try_from(ttl).map_err(|_| out_of_range())?;
    let delta = Duration::try_seconds(seconds).ok_or_else(out_of_range)?;
    Utc::now().checked_add_signed(delta).ok_or_else(out_of_range)
}

/// In-memory session store scoped to one `MockMvc`
///
/// Sessions are kept serialized, as they would be in an external cache.
#[derive(Clone, Default, Debug)]
pub(crate) struct SessionStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl SessionStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store a new session under a fresh random id
    pub(crate) async fn create(
        &self,
        context: SecurityContext,
        ttl: u64,
    ) -> Result<(String, StoredSession), MockMvcError> {
        let expires_at = expiry_after(ttl)?;
        let session_id = gen_random_string(32)?;
        let session = StoredSession {
            context,
            csrf_token: gen_random_string(32)?,
            expires_at,
            ttl,
        };
        self.entries
            .lock()
            .await
            .insert(session_id.clone(), serde_json::to_string(&session)?);
        tracing::debug!("Created session, ttl {}s", ttl);
        Ok((session_id, session))
    }

    /// Expired sessions are dropped on access
    pub(crate) async fn get(&self, session_id: &str) -> Result<Option<StoredSession>, MockMvcError> {
        let mut entries = self.entries.lock().await;
        let Some(value) = entries.get(session_id) else {
            return Ok(None);
        };
        let session: StoredSession = serde_json::from_str(value)?;
        if session.is_expired() {
            tracing::debug!("Session expired at {}", session.expires_at);
            entries.remove(session_id);
            return Ok(None);
        }
        Ok(Some(session))
    }

    pub(crate) async fn remove(&self, session_id: &str) -> bool {
        self.entries.lock().await.remove(session_id).is_some()
    }

    pub(crate) async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
