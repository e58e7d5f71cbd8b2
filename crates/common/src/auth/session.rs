//! Persisted session token
//!
//! Stores the current access token and its absolute expiry (epoch
//! milliseconds) as two string entries in a [`KeyValueStore`]:
//! `<namespace>:token` and `<namespace>:tokenExpiry`.

use std::sync::Arc;

use tracing::warn;

use crate::storage::{KeyValueStore, StorageResult};
use crate::time::Clock;

/// Token store backed by a namespaced key-value store.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    token_key: String,
    expiry_key: String,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("token_key", &self.token_key)
            .field("expiry_key", &self.expiry_key)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, namespace: &str) -> Self {
        Self {
            store,
            clock,
            token_key: format!("{namespace}:token"),
            expiry_key: format!("{namespace}:tokenExpiry"),
        }
    }

    #[must_use]
    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    #[must_use]
    pub fn expiry_key(&self) -> &str {
        &self.expiry_key
    }

    /// Store `token`, expiring `expires_in_secs` from now.
    ///
    /// # Errors
    /// Returns error if the backing store cannot be written.
    pub fn save(&self, token: &str, expires_in_secs: i64) -> StorageResult<()> {
        let now = i64::try_from(self.clock.millis_since_epoch()).unwrap_or(i64::MAX);
        let expires_at = now.saturating_add(expires_in_secs.saturating_mul(1000));
        self.store.set(&self.token_key, token)?;
        self.store.set(&self.expiry_key, &expires_at.to_string())
    }

    /// Stored token, if any.
    ///
    /// # Errors
    /// Returns error if the backing store cannot be read.
    pub fn read(&self) -> StorageResult<Option<String>> {
        self.store.get(&self.token_key)
    }

    /// Stored absolute expiry in epoch milliseconds. An unparsable value
    /// reads as `None`.
    ///
    /// # Errors
    /// Returns error if the backing store cannot be read.
    pub fn expires_at_ms(&self) -> StorageResult<Option<i64>> {
        Ok(self.store.get(&self.expiry_key)?.and_then(|raw| raw.trim().parse().ok()))
    }

    /// True when no expiry is stored, the stored expiry is unreadable, or the
    /// current time is past it.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        match self.expires_at_ms() {
            Ok(Some(expires_at)) => {
                let now = i64::try_from(self.clock.millis_since_epoch()).unwrap_or(i64::MAX);
                now > expires_at
            }
            Ok(None) => true,
            Err(err) => {
                warn!(error = %err, "Failed to read token expiry; treating session as expired");
                true
            }
        }
    }

    /// Remove both entries.
    ///
    /// # Errors
    /// Returns error if the backing store cannot be written.
    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(&self.token_key)?;
        self.store.remove(&self.expiry_key)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::session.
    use std::time::Duration;

    use super::*;
    use crate::storage::MemoryStore;
    use crate::time::MockClock;

    fn session_with_clock() -> (SessionStore, Arc<MemoryStore>, MockClock) {
        let store = Arc::new(MemoryStore::new());
        let clock = MockClock::at_millis(1_700_000_000_000);
        let session = SessionStore::new(store.clone(), Arc::new(clock.clone()), "@dashboardLovable");
        (session, store, clock)
    }

    /// Validates `SessionStore::save` behavior for the expiry boundary
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms the expiry is stored as `now + expires_in * 1000`.
    /// - Ensures the token is not expired one millisecond before and exactly
    ///   at the expiry.
    /// - Ensures the token is expired one millisecond after.
    #[test]
    fn test_expiry_boundary() {
        let (session, store, clock) = session_with_clock();
        session.save("abc", 60).unwrap();

        assert_eq!(
            store.get("@dashboardLovable:tokenExpiry").unwrap().as_deref(),
            Some("1700000060000")
        );
        assert_eq!(session.read().unwrap().as_deref(), Some("abc"));

        clock.advance(Duration::from_millis(59_999));
        assert!(!session.is_expired());
        clock.advance(Duration::from_millis(1));
        assert!(!session.is_expired());
        clock.advance(Duration::from_millis(1));
        assert!(session.is_expired());
    }

    #[test]
    fn test_missing_or_garbage_expiry_is_expired() {
        let (session, store, _clock) = session_with_clock();
        assert!(session.is_expired());

        store.set("@dashboardLovable:token", "abc").unwrap();
        assert!(session.is_expired());

        store.set("@dashboardLovable:tokenExpiry", "not-a-number").unwrap();
        assert_eq!(session.expires_at_ms().unwrap(), None);
        assert!(session.is_expired());
    }

    #[test]
    fn test_clear_removes_both_entries() {
        let (session, store, _clock) = session_with_clock();
        session.save("abc", 60).unwrap();
        session.clear().unwrap();

        assert!(store.is_empty());
        assert_eq!(session.read().unwrap(), None);
        assert!(session.is_expired());
    }

    #[test]
    fn test_zero_lifetime_expires_after_now() {
        let (session, _store, clock) = session_with_clock();
        session.save("abc", 0).unwrap();
        assert!(!session.is_expired());
        clock.advance(Duration::from_millis(1));
        assert!(session.is_expired());
    }
}
