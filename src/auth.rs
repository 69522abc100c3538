//! Credential handling for the NGI API.
//!
//! Nothing here is global: a [`CredentialService`] is built from explicit
//! [`Credentials`] and owned by the client that uses it, and per-user session
//! state travels as a [`SessionContext`] value.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{NgiError, Result};

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// NGI account email and API key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            api_key: api_key.into().trim().to_string(),
        }
    }

    /// Both fields are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.api_key.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// AccessToken
// ---------------------------------------------------------------------------

/// Bearer token issued by the NGI `/auth` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Token issued at `now`, valid for the configured lifetime.
    pub fn issued(token: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at: now + ChronoDuration::hours(config::TOKEN_LIFETIME_HOURS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

// ---------------------------------------------------------------------------
// CredentialService
// ---------------------------------------------------------------------------

/// Exchanges credentials for access tokens and caches the current token.
pub struct CredentialService {
    credentials: Credentials,
    auth_url: String,
    timeout: Duration,
    token: Option<AccessToken>,
}

impl CredentialService {
    /// Create a service that authenticates against `{api_base}/auth`.
    pub fn new(credentials: Credentials, api_base: &str) -> Self {
        Self {
            credentials,
            auth_url: format!(
                "{}/{}",
                api_base.trim_end_matches('/'),
                config::AUTH_ENDPOINT
            ),
            timeout: config::AUTH_TIMEOUT,
            token: None,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// The cached token, if any (it may be expired).
    pub fn cached_token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    /// Seed the cache, e.g. with a token carried in a [`SessionContext`].
    pub fn restore(&mut self, token: AccessToken) {
        self.token = Some(token);
    }

    /// Drop the cached token so the next request re-authenticates.
    pub fn invalidate(&mut self) {
        self.token = None;
    }

    /// Return a usable bearer token, requesting a new one when the cached
    /// token is missing or expired.
    pub fn token(&mut self, client: &Client) -> Result<String> {
        let now = Utc::now();
        if let Some(token) = &self.token {
            if !token.is_expired(now) {
                return Ok(token.token.clone());
            }
            tracing::debug!("NGI access token expired at {}", token.expires_at);
        }

        let fresh = self.request_token(client, now)?;
        let bearer = fresh.token.clone();
        self.token = Some(fresh);
        Ok(bearer)
    }

    /// Check the credentials by requesting a token. Any failure counts as
    /// invalid.
    pub fn verify(&mut self, client: &Client) -> bool {
        match self.request_token(client, Utc::now()) {
            Ok(token) => {
                self.token = Some(token);
                true
            }
            Err(e) => {
                tracing::warn!("NGI credential check failed: {}", e);
                false
            }
        }
    }

    fn request_token(&self, client: &Client, now: DateTime<Utc>) -> Result<AccessToken> {
        if !self.credentials.is_complete() {
            return Err(NgiError::Auth("email and API key are required".into()));
        }

        tracing::debug!("Requesting NGI access token for {}", self.credentials.email);
        let resp = client
            .post(&self.auth_url)
            .timeout(self.timeout)
            .json(&serde_json::json!({
                "email": self.credentials.email,
                "password": self.credentials.api_key,
            }))
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NgiError::Auth(format!("auth endpoint returned {}", status)));
        }

        let body: TokenResponse = resp.json()?;
        match body.access_token {
            Some(token) if !token.is_empty() => Ok(AccessToken::issued(token, now)),
            _ => Err(NgiError::Auth("auth response had no access_token".into())),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

/// Per-user login state, passed explicitly to whatever handles a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_email: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub remember_me: bool,
    #[serde(default)]
    pub token: Option<AccessToken>,
}

impl SessionContext {
    /// Start a session at `now`: eight hours, or seven days with remember-me.
    pub fn start(user_email: impl Into<String>, remember_me: bool, now: DateTime<Utc>) -> Self {
        let lifetime = if remember_me {
            ChronoDuration::days(config::REMEMBER_ME_DAYS)
        } else {
            ChronoDuration::hours(config::SESSION_HOURS)
        };
        Self {
            user_email: user_email.into(),
            expires_at: Some(now + lifetime),
            remember_me,
            token: None,
        }
    }

    /// A session without an expiry timestamp is never valid.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| now < at).unwrap_or(false)
    }

    /// The carried token, when present and unexpired.
    pub fn live_token(&self, now: DateTime<Utc>) -> Option<&AccessToken> {
        self.token.as_ref().filter(|t| !t.is_expired(now))
    }
}
