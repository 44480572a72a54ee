use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tokio::time::Instant;

pub const ACCOUNT_TYPE: &str = "HOSTED_OR_GOOGLE";
pub const SERVICE: &str = "ac2dm";

const AUTH_KEY: &str = "Auth";
const ERROR_KEY: &str = "Error";

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Application identifier reported to ClientLogin, e.g. `com.example.myapp`.
    pub source: String,
}

impl Credentials {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            source: source.into(),
        }
    }

    pub(crate) fn login_form(&self) -> [(&'static str, &str); 5] {
        [
            ("Email", self.username.as_str()),
            ("Passwd", self.password.as_str()),
            ("accountType", ACCOUNT_TYPE),
            ("source", self.source.as_str()),
            ("service", SERVICE),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn header_value(&self) -> String {
        format!("GoogleLogin auth={}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginResponseError {
    #[error("login response has no Auth line")]
    MissingToken,
    #[error("login response Auth line carries no usable token")]
    MalformedToken,
}

fn is_token_char(c: &char) -> bool {
    c.is_ascii_alphanumeric() || *c == '_' || *c == '-'
}

fn field_value<'a>(body: &'a str, wanted: &str) -> Option<&'a str> {
    body.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        key.trim().eq_ignore_ascii_case(wanted).then_some(value)
    })
}

/// Extracts the token from a ClientLogin body of `key=value` lines.
///
/// Only a line whose key is `Auth` counts; an `Auth=` buried mid-line after
/// another field (`SID=x Auth=abc`) is not picked up.
pub fn parse_login_response(body: &str) -> Result<AuthToken, LoginResponseError> {
    let value = field_value(body, AUTH_KEY).ok_or(LoginResponseError::MissingToken)?;
    let token: String = value.chars().take_while(is_token_char).collect();

    if token.is_empty() {
        return Err(LoginResponseError::MalformedToken);
    }

    Ok(AuthToken(token))
}

/// The `Error=` value ClientLogin sends alongside a rejection, if any.
pub fn login_error(body: &str) -> Option<&str> {
    field_value(body, ERROR_KEY)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

struct CachedToken {
    token: AuthToken,
    fetched_at: Instant,
}

/// Opt-in reuse of a login token across sends.
pub(crate) struct TokenCache {
    ttl: Duration,
    current: RwLock<Option<CachedToken>>,
    init_lock: Mutex<()>,
}

impl TokenCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            current: RwLock::new(None),
            init_lock: Mutex::new(()),
        }
    }

    pub(crate) async fn get(&self) -> Option<AuthToken> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| cached.token.clone())
    }

    pub(crate) async fn store(&self, token: AuthToken) {
        let mut lock = self.current.write().await;
        *lock = Some(CachedToken {
            token,
            fetched_at: Instant::now(),
        });
    }

    /// Drops the cached token only if it is still `token`; a newer login is kept.
    pub(crate) async fn invalidate_if(&self, token: &AuthToken) {
        let mut lock = self.current.write().await;
        if lock.as_ref().is_some_and(|cached| cached.token == *token) {
            *lock = None;
        }
    }

    pub(crate) async fn lock_init(&self) -> MutexGuard<'_, ()> {
        self.init_lock.lock().await
    }

    #[cfg(any(test, feature = "test-support"))]
    pub(crate) async fn set_token_for_test(&self, token: &str) {
        self.store(AuthToken(token.to_string())).await;
    }
}
