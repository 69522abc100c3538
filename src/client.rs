//! Authenticated HTTP access to the NGI REST API.

use std::time::Duration;

use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::auth::{AccessToken, CredentialService, Credentials, SessionContext};
use crate::cache::ResponseCache;
use crate::error::{NgiError, Result};

/// Blocking NGI API client with an optional response cache.
///
/// Requests are issued one at a time with no retry. The HTTP client is created
/// lazily on first use.
pub struct NgiClient {
    api_base: String,
    /// If true, never call the API (serve cached responses only).
    pub offline: bool,
    timeout: Duration,
    client: Option<Client>,
    auth: Option<CredentialService>,
    cache: Option<ResponseCache>,
}

impl NgiClient {
    pub fn new(
        api_base: &str,
        credentials: Option<Credentials>,
        cache: Option<ResponseCache>,
        offline: bool,
        timeout: Duration,
    ) -> Self {
        let api_base = api_base.trim_end_matches('/').to_string();
        let auth = credentials.map(|c| CredentialService::new(c, &api_base));
        Self {
            api_base,
            offline,
            timeout,
            client: None,
            auth,
            cache,
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    /// Lazy HTTP client, created on first use.
    pub fn http(&mut self) -> Result<&Client> {
        if self.client.is_none() {
            self.client = Some(
                Client::builder()
                    .timeout(self.timeout)
                    .redirect(reqwest::redirect::Policy::limited(10))
                    .build()?,
            );
        }
        self.client
            .as_ref()
            .ok_or_else(|| NgiError::InvalidArgument("HTTP client unavailable".into()))
    }

    /// Check the configured credentials against the auth endpoint.
    pub fn verify_credentials(&mut self) -> Result<bool> {
        let client = self.http()?.clone();
        let auth = self
            .auth
            .as_mut()
            .ok_or_else(|| NgiError::Auth("no credentials configured".into()))?;
        Ok(auth.verify(&client))
    }

    /// Reuse the token carried by a session instead of authenticating again.
    pub fn restore_session(&mut self, session: &SessionContext) {
        if let (Some(auth), Some(token)) = (self.auth.as_mut(), session.live_token(Utc::now())) {
            auth.restore(token.clone());
        }
    }

    /// Current cached token, for carrying in a [`SessionContext`].
    pub fn current_token(&self) -> Option<AccessToken> {
        self.auth.as_ref().and_then(|a| a.cached_token().cloned())
    }

    /// Start a session for the configured user, carrying the current token
    /// so a later client can skip authentication.
    pub fn start_session(&self, remember_me: bool) -> Result<SessionContext> {
        let auth = self
            .auth
            .as_ref()
            .ok_or_else(|| NgiError::Auth("no credentials configured".into()))?;
        let mut session = SessionContext::start(&auth.credentials().email, remember_me, Utc::now());
        session.token = self.current_token();
        Ok(session)
    }

    /// GET `{api_base}/{endpoint}` with query parameters and parse the JSON body.
    pub fn get_json(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value> {
        let is_final = ResponseCache::is_final(params, Utc::now().date_naive());

        if let Some(cache) = &self.cache {
            if self.offline || is_final {
                match cache.load(endpoint, params) {
                    Ok(Some(value)) => return Ok(value),
                    Ok(None) => {}
                    Err(e) if self.offline => return Err(e),
                    Err(_) => {}
                }
            }
        }

        if self.offline {
            return Err(NgiError::NotFound(format!(
                "{} {:?} not cached and offline mode is enabled",
                endpoint, params
            )));
        }

        let value = self.fetch(endpoint, params)?;

        if is_final {
            if let Some(cache) = &self.cache {
                if let Err(e) = cache.store(endpoint, params, &value) {
                    tracing::warn!("Failed to cache {} response: {}", endpoint, e);
                }
            }
        }

        Ok(value)
    }

    fn fetch(&mut self, endpoint: &str, params: &[(&str, &str)]) -> Result<serde_json::Value> {
        let client = self.http()?.clone();
        let auth = self
            .auth
            .as_mut()
            .ok_or_else(|| NgiError::Auth("no valid credentials configured".into()))?;
        let token = auth.token(&client)?;

        let url = format!("{}/{}", self.api_base, endpoint.trim_start_matches('/'));
        tracing::info!("GET {} {:?}", url, params);

        let resp = client
            .get(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params)
            .send()?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            auth.invalidate();
            return Err(NgiError::Auth(format!("{} rejected the access token", endpoint)));
        }

        let resp = resp.error_for_status()?;
        Ok(resp.json()?)
    }
}
