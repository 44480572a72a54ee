use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, error, warn};
use url::Url;

use crate::auth::{AuthToken, Credentials, TokenCache, login_error, parse_login_response};
use crate::error::{Error, Result};
use crate::message::{AndroidMessage, Message};
use crate::response::parse_delivery_response;
use crate::service::NotificationService;

pub const LOGIN_URL: &str = "https://www.google.com/accounts/ClientLogin";
pub const SEND_URL: &str = "https://android.apis.google.com/c2dm/send";

/// Delivers [`AndroidMessage`]s through Google's C2DM HTTP API.
///
/// Every [`send`](C2dmSender::send) logs in first and posts the message with the
/// fresh token, unless [`with_token_cache`](C2dmSender::with_token_cache) was used.
/// The token never lives on the sender otherwise, so one instance can be shared
/// across tasks.
#[non_exhaustive]
pub struct C2dmSender {
    client: Client,
    credentials: Credentials,
    login_url: String,
    send_url: String,
    timeout: Option<Duration>,
    token_cache: Option<TokenCache>,
}

impl C2dmSender {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: Client::new(),
            credentials,
            login_url: LOGIN_URL.to_string(),
            send_url: SEND_URL.to_string(),
            timeout: None,
            token_cache: None,
        }
    }

    /// Override the ClientLogin endpoint (mock servers, proxies).
    pub fn with_login_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.login_url = Url::parse(url.as_ref())?.to_string();
        Ok(self)
    }

    /// Override the C2DM send endpoint (mock servers, proxies).
    pub fn with_send_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.send_url = Url::parse(url.as_ref())?.to_string();
        Ok(self)
    }

    /// Per-request timeout. Without one the client waits indefinitely.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reuse a login token for `ttl` instead of logging in on every send.
    #[must_use]
    pub fn with_token_cache(mut self, ttl: Duration) -> Self {
        self.token_cache = Some(TokenCache::new(ttl));
        self
    }

    /// Disables TLS certificate verification on both endpoints.
    ///
    /// Only for test rigs that terminate TLS with self-signed certificates.
    pub fn danger_accept_invalid_certs(mut self) -> Result<Self> {
        warn!("c2dm sender configured to accept invalid TLS certificates");

        self.client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(Error::Client)?;
        Ok(self)
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub async fn send(&self, message: &Message) -> Result<bool> {
        let Some(android) = message.as_android() else {
            return Err(Error::UnsupportedMessage(message.kind()));
        };

        let Some(token) = self.auth_token().await? else {
            return Ok(false);
        };

        self.deliver(&token, android).await
    }

    async fn auth_token(&self) -> Result<Option<AuthToken>> {
        let Some(cache) = &self.token_cache else {
            return self.authenticate().await;
        };

        if let Some(token) = cache.get().await {
            return Ok(Some(token));
        }

        let _guard = cache.lock_init().await;

        if let Some(token) = cache.get().await {
            return Ok(Some(token));
        }

        let token = self.authenticate().await?;
        if let Some(ref token) = token {
            cache.store(token.clone()).await;
        }

        Ok(token)
    }

    async fn authenticate(&self) -> Result<Option<AuthToken>> {
        let response = self
            .request(self.client.post(&self.login_url))
            .form(&self.credentials.login_form())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Transport)?;

        if status != StatusCode::OK {
            error!(
                status_code = status.as_u16(),
                reason = login_error(&body),
                "c2dm authentication failed"
            );
            return Ok(None);
        }

        match parse_login_response(&body) {
            Ok(token) => {
                debug!("c2dm auth token acquired");
                Ok(Some(token))
            }
            Err(e) => {
                error!(error = %e, "c2dm login response unusable");
                Ok(None)
            }
        }
    }

    async fn deliver(&self, token: &AuthToken, message: &AndroidMessage) -> Result<bool> {
        let response = self
            .request(self.client.post(&self.send_url))
            .header(AUTHORIZATION, token.header_value())
            .form(&message.message_body())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Transport)?;

        if status == StatusCode::UNAUTHORIZED {
            if let Some(cache) = &self.token_cache {
                cache.invalidate_if(token).await;
            }
        }

        match parse_delivery_response(&body) {
            Ok(message_id) => {
                debug!(%message_id, "c2dm message delivered");
                Ok(true)
            }
            Err(e) => {
                error!(
                    error = e.detail(),
                    status_code = status.as_u16(),
                    "c2dm error received"
                );
                Ok(false)
            }
        }
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    /// Seed the token cache. No effect unless the cache is enabled.
    #[cfg(any(test, feature = "test-support"))]
    pub async fn set_token_for_test(&self, token: &str) {
        if let Some(cache) = &self.token_cache {
            cache.set_token_for_test(token).await;
        }
    }
}

#[async_trait]
impl NotificationService for C2dmSender {
    async fn send(&self, message: &Message) -> Result<bool> {
        C2dmSender::send(self, message).await
    }
}
