//! Process-local registry of revoked token identifiers.
//!
//! An entry only matters until the token it names would have expired on its
//! own; after that lookups treat it as absent and drop it. The registry is
//! not persisted and not shared between server instances.
use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

#[derive(Debug, Default)]
pub struct RevocationRegistry {
    /// jti -> original expiry of the token
    entries: DashMap<String, DateTime<Utc>>,
}

impl RevocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke a token until its natural expiry. Revoking twice is a no-op.
    pub fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) {
        self.entries.entry(jti.to_string()).or_insert(expires_at);
    }

    /// Whether `jti` is revoked right now
    pub fn is_revoked(&self, jti: &str) -> bool {
        self.is_revoked_at(jti, Utc::now())
    }

    /// Whether `jti` is revoked at `now`; expired entries are removed on the way
    pub fn is_revoked_at(&self, jti: &str, now: DateTime<Utc>) -> bool {
        // copy the expiry out so no shard lock is held during removal
        let expires_at = match self.entries.get(jti) {
            Some(entry) => *entry,
            None => return false,
        };
        if expires_at > now {
            return true;
        }
        self.entries.remove_if(jti, |_, expiry| *expiry <= now);
        false
    }

    /// Drop every entry whose token has expired. Returns how many were dropped.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expiry| *expiry > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Periodically purge expired entries
pub fn start_revocation_sweeper(registry: Arc<RevocationRegistry>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval_timer = tokio::time::interval(every);
        loop {
            interval_timer.tick().await;
            trace!("Purging expired revocations...");
            let purged = registry.purge_expired(Utc::now());
            if purged > 0 {
                debug!(purged, remaining = registry.len(), "purged expired revocations");
            }
        }
    })
}
