//! HTTP client for communicating with the `DevClub` API
//!
//! Every request carries the session's bearer token when one is present. A
//! 401 from any endpoint evicts the session (token cleared, navigation to
//! `/admin/login`) before the error is returned; no other status touches the
//! token.

use crate::session::SessionContext;
use devclub_core::types::{
    AdminProfile, Analytics, City, Department, Faculty, LoginHistoryEntry, OtpVerification,
    RegisteredUser, RegistrationDraft, TokenResponse,
};
use devclub_core::{Config, Error, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Detail used when a 401 carries no message
const UNAUTHORIZED_DETAIL: &str = "Could not validate credentials";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API client for making HTTP requests to the `DevClub` API server
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    session: SessionContext,
}

impl ApiClient {
    /// Create a new API client with the default timeout
    ///
    /// `base_url` includes the `/api` prefix, e.g. `http://host:8000/api`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT, session)
    }

    /// Create a new API client with an explicit per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
        session: SessionContext,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Configuration {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            timeout,
            session,
        })
    }

    /// Create a client from the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &Config, session: SessionContext) -> Result<Self> {
        Self::with_timeout(config.api.base_url.clone(), config.request_timeout(), session)
    }

    /// Session this client reads its token from
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a registration; the server emails a verification code
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the server rejects it.
    pub async fn register(&self, draft: &RegistrationDraft) -> Result<RegisteredUser> {
        let request = self.client.post(self.url("/auth/register")).json(draft);
        self.send(request, "Registration failed").await
    }

    /// Check a verification code
    ///
    /// This only performs the request; storing the returned token is the
    /// caller's job (see [`SessionContext::establish`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the code is rejected.
    pub async fn verify_otp(&self, email: &str, otp_code: &str) -> Result<TokenResponse> {
        let body = OtpVerification {
            email: email.to_string(),
            otp_code: otp_code.to_string(),
        };
        let request = self.client.post(self.url("/auth/verify-otp")).json(&body);
        self.send(request, "OTP verification failed").await
    }

    /// Every commune
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    pub async fn get_cities(&self) -> Result<Vec<City>> {
        let request = self.client.get(self.url("/data/cities"));
        self.send(request, "Failed to load cities").await
    }

    /// Communes of one wilaya
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    pub async fn get_cities_by_wilaya(&self, wilaya_code: &str) -> Result<Vec<City>> {
        let path = format!("/data/cities/{}", urlencoding::encode(wilaya_code));
        let request = self.client.get(self.url(&path));
        self.send(request, "Failed to load cities").await
    }

    /// Every faculty
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    pub async fn get_faculties(&self) -> Result<Vec<Faculty>> {
        let request = self.client.get(self.url("/data/faculties"));
        self.send(request, "Failed to load faculties").await
    }

    /// Departments of one faculty
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    pub async fn get_departments_by_faculty(&self, faculty_id: i64) -> Result<Vec<Department>> {
        let path = format!("/data/departments/{faculty_id}");
        let request = self.client.get(self.url(&path));
        self.send(request, "Failed to load departments").await
    }

    /// Exchange admin credentials for a token
    ///
    /// Credentials go form-encoded as `username` / `password`. Like
    /// [`Self::verify_otp`], the token is returned, not stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the credentials are rejected.
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let request = self
            .client
            .post(self.url("/admin/login"))
            .form(&[("username", email), ("password", password)]);
        self.send(request, "Login failed").await
    }

    /// Profile of the signed-in admin
    ///
    /// # Errors
    ///
    /// Fails without a request when no token is present.
    pub async fn get_admin_profile(&self) -> Result<AdminProfile> {
        self.require_token()?;
        let request = self.client.get(self.url("/admin/profile"));
        self.send(request, "Failed to fetch admin profile").await
    }

    /// Recent logins of the signed-in admin
    ///
    /// # Errors
    ///
    /// Fails without a request when no token is present.
    pub async fn get_admin_login_history(&self) -> Result<Vec<LoginHistoryEntry>> {
        self.require_token()?;
        let request = self.client.get(self.url("/admin/login-history"));
        self.send(request, "Failed to fetch login history").await
    }

    /// Dashboard aggregates
    ///
    /// # Errors
    ///
    /// Fails without a request when no token is present.
    pub async fn get_analytics(&self) -> Result<Analytics> {
        self.require_token()?;
        let request = self.client.get(self.url("/admin/analytics"));
        self.send(request, "Failed to fetch analytics").await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn require_token(&self) -> Result<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(Error::Authentication("Not authenticated".to_string()))
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &'static str,
    ) -> Result<T> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "API response");

        let body = response.bytes().await.map_err(|e| self.transport_error(&e))?;

        if status == StatusCode::UNAUTHORIZED {
            let detail = extract_detail(&body).unwrap_or_else(|| UNAUTHORIZED_DETAIL.to_string());
            self.session.evict();
            return Err(Error::Authentication(detail));
        }

        if !status.is_success() {
            let detail = extract_detail(&body).unwrap_or_else(|| fallback.to_string());
            warn!(status = status.as_u16(), "API request failed: {}", detail);
            return Err(Error::Request {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }

    fn transport_error(&self, err: &reqwest::Error) -> Error {
        if err.is_timeout() {
            let duration_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
            warn!(duration_ms, "API request timed out");
            Error::Timeout { duration_ms }
        } else {
            warn!("API request got no response: {}", err);
            Error::network()
        }
    }
}

/// Pull a human-readable message out of an error body
///
/// Understands `{"detail": "..."}` and the validation form
/// `{"detail": [{"msg": "..."}, ...]}`, whose messages are joined with `; `.
fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
