// ============================
// notes-backend-lib/src/lib.rs
// ============================
//! Core backend functionality for the notes API server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;

use std::sync::Arc;
use crate::auth::{
    AuthService, DefaultAuth, MemorySessionStore, RedisSessionStore, RevocationRegistry,
    SessionStore, TokenIssuer,
};
use crate::config::{SessionMode, Settings};
use crate::error::AppError;
use crate::middleware::RequestGate;
use crate::storage::Storage;

pub use router::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// Registration, login and logout
    pub auth: Arc<dyn AuthService>,
    /// Request gate in front of protected routes
    pub gate: Arc<RequestGate>,
    /// Revoked token identifiers, shared with the gate
    pub revocations: Arc<RevocationRegistry>,
    /// Storage backend
    pub storage: S,
    /// Settings the state was built from
    pub settings: Arc<Settings>,
}

impl<S: Storage + Clone + 'static> AppState<S> {
    /// Build the state. Strict-session mode records sessions in process memory.
    pub fn new(storage: S, settings: Settings) -> Result<Self, AppError> {
        let sessions = match settings.session.mode {
            SessionMode::Strict => Some(Arc::new(MemorySessionStore::new()) as Arc<dyn SessionStore>),
            SessionMode::Stateless => None,
        };
        Self::with_session_store(storage, settings, sessions)
    }

    /// Build the state, connecting to Redis when strict mode names a server
    pub async fn connect(storage: S, settings: Settings) -> Result<Self, AppError> {
        match (settings.session.mode, settings.session.redis_url.as_deref()) {
            (SessionMode::Strict, Some(url)) => {
                let store = RedisSessionStore::connect(url).await?;
                Self::with_session_store(storage, settings, Some(Arc::new(store)))
            },
            _ => Self::new(storage, settings),
        }
    }

    /// Build the state around an explicit session store
    pub fn with_session_store(
        storage: S,
        settings: Settings,
        sessions: Option<Arc<dyn SessionStore>>,
    ) -> Result<Self, AppError> {
        let sessions = match settings.session.mode {
            SessionMode::Strict => Some(sessions.ok_or_else(|| {
                AppError::Configuration("strict session mode needs a session store".to_string())
            })?),
            SessionMode::Stateless => {
                if sessions.is_some() {
                    tracing::warn!("session store ignored in stateless mode");
                }
                None
            },
        };

        let tokens = Arc::new(TokenIssuer::new(&settings.jwt)?);
        let revocations = Arc::new(RevocationRegistry::new());
        let auth = Arc::new(DefaultAuth::new(
            storage.clone(),
            &settings,
            Arc::clone(&tokens),
            Arc::clone(&revocations),
            sessions.clone(),
        ));
        let gate = Arc::new(RequestGate::new(tokens, Arc::clone(&revocations), sessions));

        Ok(Self {
            auth,
            gate,
            revocations,
            storage,
            settings: Arc::new(settings),
        })
    }
}
