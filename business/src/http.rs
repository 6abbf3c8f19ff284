//! Thin HTTP client over `reqwest` returning owned, `Send` responses.
//!
//! Responses are fully buffered before they are handed back, so callers can
//! inspect the status and body without holding on to the connection.
//! Backends report failures as JSON with a `message` (or `error`) field;
//! [`Response::error_message`] pulls that out so it can be shown to users.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use thiserror::Error;

/// A buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Backend-supplied error message, if the body carries a non-blank one.
    pub fn error_message(&self) -> Option<String> {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
            error: Option<String>,
        }

        let body: ErrorBody = self.json().ok()?;
        [body.message, body.error]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}

/// Transport-level failure: the request never produced a response.
#[derive(Debug, Clone, Error)]
#[error("HTTP error: {message}")]
pub struct HttpError {
    pub message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(e.to_string())
    }
}

pub type HttpResult<T> = Result<T, HttpError>;

/// One request being put together.
#[derive(Debug)]
pub struct RequestBuilder {
    inner: reqwest::RequestBuilder,
}

impl RequestBuilder {
    pub fn header(self, name: &str, value: &str) -> Self {
        Self {
            inner: self.inner.header(name, value),
        }
    }

    /// Add `Authorization: Bearer` when a token is present.
    pub fn bearer(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => Self {
                inner: self.inner.header(AUTHORIZATION, format!("Bearer {token}")),
            },
            None => self,
        }
    }

    pub fn body(self, body: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: self.inner.body(body.into()),
        }
    }

    pub fn json<T: serde::Serialize>(self, value: &T) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(value)?;
        Ok(self.header(CONTENT_TYPE.as_str(), "application/json").body(bytes))
    }

    pub async fn send(self) -> HttpResult<Response> {
        let response = self.inner.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        log::debug!("HTTP {status}, {} byte body", body.len());

        Ok(Response { status, body })
    }
}

/// HTTP client sharing one connection pool across requests.
///
/// ```ignore
/// let response = Client::new()
///     .post("https://pm.example.com/api/v1/posts/drafts")
///     .bearer(Some("token"))
///     .send()
///     .await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, url: impl reqwest::IntoUrl) -> RequestBuilder {
        RequestBuilder {
            inner: self.inner.post(url),
        }
    }

    pub fn put(&self, url: impl reqwest::IntoUrl) -> RequestBuilder {
        RequestBuilder {
            inner: self.inner.put(url),
        }
    }

    pub fn delete(&self, url: impl reqwest::IntoUrl) -> RequestBuilder {
        RequestBuilder {
            inner: self.inner.delete(url),
        }
    }
}
