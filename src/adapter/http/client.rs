//! Marketplace REST API client.
//!
//! Every request carries the session's bearer token and a fresh
//! `X-Request-Id`. Idempotent reads are retried on timeouts and connection
//! failures; a 401 triggers one token refresh and a single replay.
//! Authentication calls live here too since they write to the session.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use super::dto::{self, AuthPayload, Envelope, LoginRequest, RefreshRequest, Registration};
use crate::adapter::session::Session;
use crate::config::ApiConfig;
use crate::domain::error::ValidationError;
use crate::domain::User;
use crate::error::{ApiError, Result};
use crate::port::{Ack, ListQuery, Page, StoredTokens};

/// HTTP client for the marketplace backend.
pub struct MarketplaceClient {
    http: HttpClient,
    base_url: Url,
    session: Arc<Session>,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl MarketplaceClient {
    /// Create a client with default HTTP settings and no retries.
    pub fn new(base_url: &str, session: Arc<Session>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(),
            base_url: Url::parse(base_url)?,
            session,
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
        })
    }

    pub fn from_config(config: &ApiConfig, session: Arc<Session>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(concat!("mcdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Ok(Self {
            http,
            base_url: Url::parse(&config.base_url)?,
            session,
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Absolute URL for a path under the base URL. Segments are percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header("X-Request-Id", Uuid::new_v4().to_string());
        match self.session.access_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn dispatch(
        &self,
        method: &Method,
        url: &Url,
        query: &[(&'static str, String)],
        body: Option<&Value>,
    ) -> Result<Response> {
        let max_attempts = if *method == Method::GET {
            self.retry_max_attempts.max(1)
        } else {
            1
        };
        let mut attempt = 0;

        loop {
            attempt += 1;
            let mut builder = self.request(method.clone(), url.clone()).query(query);
            if let Some(body) = body {
                builder = builder.json(body);
            }
            match builder.send().await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "HTTP request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = dto::error_message(status.as_u16(), &body);
            debug!(status = status.as_u16(), %message, "Request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }

    fn should_refresh(&self, response: &Response, refreshed: bool) -> bool {
        response.status() == StatusCode::UNAUTHORIZED
            && !refreshed
            && self.session.refresh_token().is_some()
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&'static str, String)],
        body: Option<&Value>,
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        let mut refreshed = false;

        loop {
            let response = self.dispatch(&method, &url, query, body).await?;
            if self.should_refresh(&response, refreshed) {
                refreshed = true;
                debug!(url = %url, "Access token rejected, refreshing");
                match self.refresh().await {
                    Ok(()) => continue,
                    Err(err) => warn!(error = %err, "Token refresh failed"),
                }
            }
            return Self::decode(response).await;
        }
    }

    pub(crate) async fn get_data<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let envelope: Envelope<T> = self.send(Method::GET, segments, query, None).await?;
        envelope.into_data()
    }

    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &ListQuery,
    ) -> Result<Page<T>> {
        let envelope: Envelope<Vec<T>> = self
            .send(Method::GET, segments, &query.to_pairs(), None)
            .await?;
        let page = envelope.into_page()?;
        debug!(path = segments.join("/"), count = page.items.len(), "Fetched page");
        Ok(page)
    }

    /// Unpaginated list; a missing `data` array is empty.
    pub(crate) async fn get_items<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<Vec<T>> {
        let envelope: Envelope<Vec<T>> = self.send(Method::GET, segments, query, None).await?;
        Ok(envelope.into_page()?.items)
    }

    pub(crate) async fn post_data<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &Value,
    ) -> Result<T> {
        let envelope: Envelope<T> = self.send(Method::POST, segments, &[], Some(body)).await?;
        envelope.into_data()
    }

    pub(crate) async fn post_ack(&self, segments: &[&str], body: Option<&Value>) -> Result<Ack> {
        let envelope: Envelope<Value> = self.send(Method::POST, segments, &[], body).await?;
        envelope.into_ack()
    }

    /// Multipart upload. Carries the bearer token; reqwest sets the
    /// multipart content type itself.
    pub(crate) async fn upload(&self, segments: &[&str], field: &str, file: &Path) -> Result<Ack> {
        if !file.is_file() {
            return Err(ValidationError::MissingFile {
                path: file.display().to_string(),
            }
            .into());
        }
        let bytes = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let url = self.endpoint(segments)?;
        let mut refreshed = false;

        loop {
            let part = Part::bytes(bytes.clone()).file_name(file_name.clone());
            let form = Form::new().part(field.to_string(), part);
            let response = self
                .request(Method::POST, url.clone())
                .multipart(form)
                .send()
                .await?;
            if self.should_refresh(&response, refreshed) {
                refreshed = true;
                match self.refresh().await {
                    Ok(()) => continue,
                    Err(err) => warn!(error = %err, "Token refresh failed"),
                }
            }
            info!(url = %url, file = %file_name, size = bytes.len(), "Uploaded file");
            let envelope: Envelope<Value> = Self::decode(response).await?;
            return envelope.into_ack();
        }
    }

    async fn authenticate(&self, segments: &[&str], body: &Value) -> Result<AuthPayload> {
        let url = self.endpoint(segments)?;
        let response = self
            .http
            .post(url)
            .header("X-Request-Id", Uuid::new_v4().to_string())
            .json(body)
            .send()
            .await?;
        let envelope: Envelope<AuthPayload> = Self::decode(response).await?;
        let payload = envelope.into_data()?;
        self.session.set_tokens(StoredTokens {
            access_token: payload.access_token.clone(),
            refresh_token: payload.refresh_token.clone(),
        })?;
        Ok(payload)
    }

    /// Sign in and persist the returned tokens.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<User>> {
        let body = serde_json::to_value(LoginRequest { email, password })?;
        let payload = self.authenticate(&["auth", "login"], &body).await?;
        info!(email, "Signed in");
        Ok(payload.user)
    }

    /// Create an account and persist the returned tokens.
    pub async fn register(&self, registration: &Registration) -> Result<Option<User>> {
        let body = serde_json::to_value(registration)?;
        let payload = self.authenticate(&["auth", "register"], &body).await?;
        info!(email = %registration.email, "Registered account");
        Ok(payload.user)
    }

    /// Exchange the stored refresh token for a new access token.
    pub async fn refresh(&self) -> Result<()> {
        let Some(refresh_token) = self.session.refresh_token() else {
            return Err(ApiError::Unauthorized.into());
        };
        let url = self.endpoint(&["auth", "refresh"])?;
        let response = self
            .http
            .post(url)
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })
            .send()
            .await?;
        let envelope: Envelope<AuthPayload> = Self::decode(response).await?;
        let payload = envelope.into_data()?;
        self.session.set_tokens(StoredTokens {
            access_token: payload.access_token,
            refresh_token: payload.refresh_token.or(Some(refresh_token)),
        })?;
        debug!("Access token refreshed");
        Ok(())
    }

    /// Sign out. The local session is cleared even if the server call fails.
    pub async fn logout(&self) -> Result<()> {
        if self.session.is_signed_in() {
            if let Err(err) = self.post_ack(&["auth", "logout"], None).await {
                warn!(error = %err, "Server-side logout failed");
            }
        }
        self.session.clear()
    }
}
