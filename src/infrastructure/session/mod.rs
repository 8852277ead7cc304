//! Visitor session plumbing on top of `actix-session`.
//!
//! The middleware owns the cookie and store lifecycle. Everything else reads
//! and writes through the typed helpers below (rate window, form snapshot,
//! theme preference, CSRF token).

use std::time::Duration;

use actix_session::{
    config::{CookieContentSecurity, PersistentSession},
    storage::SessionStore,
    Session, SessionMiddleware,
};
use actix_web::cookie::{time::Duration as CookieDuration, Key, SameSite};
use deadpool_redis::{Config, Pool, Runtime};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::SessionError;

pub mod csrf;

/// Cookie naming, lifetime and signing secret for visitor sessions.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub ttl: Duration,
    pub secure: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            cookie_name: "unisurf_session".to_string(),
            ttl: Duration::from_secs(60 * 60 * 24),
            secure: false,
        }
    }
}

/// Builds the session middleware around `store`.
pub fn session_middleware<S: SessionStore>(store: S, key: Key, settings: &SessionSettings) -> SessionMiddleware<S> {
    let ttl = CookieDuration::seconds(settings.ttl.as_secs() as i64);

    SessionMiddleware::builder(store, key)
        .cookie_name(settings.cookie_name.clone())
        .cookie_secure(settings.secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .cookie_content_security(CookieContentSecurity::Private)
        .session_lifecycle(PersistentSession::default().session_ttl(ttl))
        .build()
}

/// Cookie key derived from the configured secret. An empty secret yields a
/// random key, so sessions do not survive a restart.
pub fn session_key(secret: &str) -> Result<Key, SessionError> {
    if secret.is_empty() {
        tracing::warn!("No session secret configured, using a random key");
        return Ok(Key::generate());
    }
    Key::try_from(secret.as_bytes()).map_err(|e| SessionError::InvalidKey(e.to_string()))
}

/// Reads a value; an undecodable entry is dropped and reads as absent.
pub fn read<T: DeserializeOwned>(session: &Session, key: &str) -> Option<T> {
    match session.get::<T>(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Dropping undecodable session value under '{}': {}", key, e);
            session.remove(key);
            None
        }
    }
}

pub fn write<T: Serialize>(session: &Session, key: &str, value: &T) {
    if let Err(e) = session.insert(key, value) {
        tracing::error!("Failed to store session value '{}': {}", key, e);
    }
}

/// Reads a value and deletes it in the same step.
pub fn take<T: DeserializeOwned>(session: &Session, key: &str) -> Option<T> {
    let value = read(session, key);
    session.remove(key);
    value
}

/// Where session state lives, as reported by the health check.
#[derive(Clone)]
pub enum SessionBackend {
    /// State is carried in the encrypted cookie itself.
    Cookie,
    /// State is kept in Redis; the pool is only used for liveness pings.
    Redis(Pool),
}

impl SessionBackend {
    pub fn redis(url: &str) -> Result<Self, SessionError> {
        let pool = Config::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| SessionError::Backend(format!("Redis pool creation error: {}", e)))?;
        Ok(SessionBackend::Redis(pool))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SessionBackend::Cookie => "cookie",
            SessionBackend::Redis(_) => "redis",
        }
    }

    pub async fn ping(&self) -> Result<(), SessionError> {
        let SessionBackend::Redis(pool) = self else {
            return Ok(());
        };
        let mut conn = pool.get().await.map_err(|e| SessionError::Backend(e.to_string()))?;
        let pong: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| SessionError::Backend(e.to_string()))?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(SessionError::Backend(format!("Unexpected PING reply: {}", pong)))
        }
    }
}
