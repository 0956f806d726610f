//! Remote data gateway
//!
//! [`ApiClient`] wraps every backend call: it builds the URL, attaches the
//! session's bearer token, unwraps the `{ "data": … }` envelope and turns
//! failures into [`ApiError`]. Each call is a single attempt.
//!
//! Endpoint groups live in their own files as further `impl ApiClient`
//! blocks.

mod auth;
mod buyers;
mod dashboard;
mod error;
mod inventory;
mod sample_requests;
mod upload;

pub use error::ApiError;
pub use upload::UploadFile;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use url::Url;

use crate::core::session::SessionHandle;

/// Successful response wrapper
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error response body; only `message` is read
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Typed client for the fabric ERP backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
}

impl ApiClient {
    /// Create a client for `base_url`, authenticating as `session`
    pub fn new(base_url: &str, session: SessionHandle) -> Result<Self, ApiError> {
        let parsed =
            Url::parse(base_url).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("ferp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// `/seg/seg/...` with every segment percent-encoded
    ///
    /// Empty, `.` and `..` segments are refused.
    fn resource_path(segments: &[&str]) -> Result<String, ApiError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ApiError::InvalidId(bad.to_string()));
        }
        let root = "http://localhost/";
        let mut scratch = Url::parse(root).map_err(|_| ApiError::InvalidUrl(root.to_string()))?;
        scratch
            .path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(root.to_string()))?
            .extend(segments.iter().copied());
        Ok(scratch.path().to_string())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.endpoint(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and unwrap the response envelope
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<Envelope<T>, ApiError> {
        let started = Instant::now();
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "request failed");
            ApiError::Network(e)
        })?;

        let status = response.status();
        tracing::debug!(
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response"
        );

        let body = response.bytes().await.map_err(ApiError::Network)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .unwrap_or_default()
                .message;
            if status == StatusCode::UNAUTHORIZED {
                self.session.sign_out();
            }
            return Err(ApiError::from_status(status, message));
        }

        if body.is_empty() {
            return Ok(Envelope {
                data: None,
                message: None,
            });
        }

        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send a request whose envelope must carry `data`
    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        self.send(method, path, builder)
            .await?
            .data
            .ok_or_else(|| ApiError::Decode(format!("response to {} has no data", path)))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path).query(query);
        self.fetch(Method::GET, path, builder).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path).json(body);
        self.fetch(Method::POST, path, builder).await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::PUT, path).json(body);
        self.fetch(Method::PUT, path, builder).await
    }

    /// PATCH where only success matters; returns the server message
    async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<String>, ApiError> {
        let builder = self.request(Method::PATCH, path).json(body);
        let envelope: Envelope<serde_json::Value> =
            self.send(Method::PATCH, path, builder).await?;
        Ok(envelope.message)
    }

    /// DELETE; returns the server message
    async fn delete(&self, path: &str) -> Result<Option<String>, ApiError> {
        let builder = self.request(Method::DELETE, path);
        let envelope: Envelope<serde_json::Value> =
            self.send(Method::DELETE, path, builder).await?;
        Ok(envelope.message)
    }
}
