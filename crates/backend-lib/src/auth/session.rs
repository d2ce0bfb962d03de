// ============================
// notes-backend-lib/src/auth/session.rs
// ============================
//! Last-issued-token-per-user records for strict single-session mode.
use std::{sync::Arc, time::Duration};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use notes_common::UserId;
use redis::aio::ConnectionManager;
use crate::error::AppError;

/// Where the currently valid token of each user is recorded.
///
/// Writing a new token for a user replaces the previous one, which is what
/// invalidates older sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The token currently on record for the user
    async fn get(&self, user_id: UserId) -> Result<Option<String>, AppError>;

    /// Record `token` as the user's only valid token for `ttl`
    async fn set(&self, user_id: UserId, token: &str, ttl: Duration) -> Result<(), AppError>;

    /// Forget the user's session
    async fn clear(&self, user_id: UserId) -> Result<(), AppError>;
}

/// Session store kept in process memory
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<DashMap<UserId, (String, DateTime<Utc>)>>,
}

impl MemorySessionStore {
    /// Create a new session store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, user_id: UserId) -> Result<Option<String>, AppError> {
        let now = Utc::now();
        let record = self.sessions.get(&user_id).map(|entry| entry.clone());
        match record {
            Some((token, expires_at)) if expires_at > now => Ok(Some(token)),
            Some(_) => {
                self.sessions.remove_if(&user_id, |_, (_, expires_at)| *expires_at <= now);
                Ok(None)
            },
            None => Ok(None),
        }
    }

    async fn set(&self, user_id: UserId, token: &str, ttl: Duration) -> Result<(), AppError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|_| AppError::Internal("session ttl out of range".to_string()))?;
        self.sessions.insert(user_id, (token.to_string(), Utc::now() + ttl));
        Ok(())
    }

    async fn clear(&self, user_id: UserId) -> Result<(), AppError> {
        self.sessions.remove(&user_id);
        Ok(())
    }
}

/// Redis-backed session store, shared by every server instance
#[derive(Clone)]
pub struct RedisSessionStore {
    redis: ConnectionManager,
}

impl RedisSessionStore {
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let client = redis::Client::open(url)?;
        let redis = ConnectionManager::new(client).await?;
        tracing::info!("connected to redis session store");
        Ok(Self { redis })
    }

    fn key(user_id: UserId) -> String {
        format!("auth:{user_id}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, user_id: UserId) -> Result<Option<String>, AppError> {
        let mut conn = self.redis.clone();
        let token: Option<String> = redis::cmd("GET")
            .arg(Self::key(user_id))
            .query_async(&mut conn)
            .await?;
        Ok(token)
    }

    async fn set(&self, user_id: UserId, token: &str, ttl: Duration) -> Result<(), AppError> {
        let mut conn = self.redis.clone();
        redis::cmd("SET")
            .arg(Self::key(user_id))
            .arg(token)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn clear(&self, user_id: UserId) -> Result<(), AppError> {
        let mut conn = self.redis.clone();
        redis::cmd("DEL")
            .arg(Self::key(user_id))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}
