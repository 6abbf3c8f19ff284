//! Backend collaborators of the upload session.
//!
//! [`AttachmentApi`] is the seam the session talks through; the transport and
//! the session are generic over it so tests can swap in scripted backends.
//! [`HttpAttachmentApi`] is the real implementation.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::{Client, HttpError, Response};
use crate::{AttachmentId, BusinessConfig, PostId};

/// Shown when a failure carries no usable message of its own.
pub const GENERIC_UPLOAD_ERROR: &str = "Upload failed";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("request failed with status {status}")]
    Status {
        status: u16,
        /// Message supplied by the backend in the response body.
        message: Option<String>,
    },
    #[error("malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Backend message if there is one, else this error's own message, else a generic one.
    pub fn user_message(&self) -> String {
        if let Some(message) = self.backend_message() {
            return message.to_owned();
        }
        if self.detail().trim().is_empty() {
            GENERIC_UPLOAD_ERROR.to_owned()
        } else {
            self.to_string()
        }
    }

    /// The underlying cause's text, without this error's prefix.
    fn detail(&self) -> String {
        match self {
            Self::Http(e) => e.message.clone(),
            Self::Status { status, .. } => status.to_string(),
            Self::Decode(e) => e.to_string(),
            Self::Io(e) => e.to_string(),
        }
    }
}

/// Where to send the bytes of one file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub attachment_id: AttachmentId,
    pub upload_url: String,
}

/// Everything persisted when a draft is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSubmission {
    pub post_id: PostId,
    pub title: String,
    pub body: String,
    pub stage_id: Option<String>,
    pub attachment_ids: Vec<AttachmentId>,
}

pub trait AttachmentApi: Clone + Send + Sync + 'static {
    /// Reserve an id for a new draft post.
    fn create_post_id(&self) -> impl Future<Output = Result<PostId, ApiError>> + Send;

    fn issue_upload_url(
        &self,
        post_id: PostId,
        file_name: &str,
    ) -> impl Future<Output = Result<UploadTarget, ApiError>> + Send;

    /// PUT the raw bytes to a presigned location.
    fn upload_to_storage(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn delete_attachment(
        &self,
        attachment_id: AttachmentId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn submit_post(
        &self,
        post: &PostSubmission,
    ) -> impl Future<Output = Result<PostId, ApiError>> + Send;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueUploadUrlRequest<'a> {
    post_id: PostId,
    file_name: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePostIdResponse {
    post_id: PostId,
}

#[derive(Deserialize)]
struct SubmitPostResponse {
    id: PostId,
}

#[derive(Debug, Clone)]
pub struct HttpAttachmentApi {
    client: Client,
    config: BusinessConfig,
}

impl HttpAttachmentApi {
    pub fn new(config: BusinessConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url())
    }
}

fn check(response: Response) -> Result<Response, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status: response.status,
            message: response.error_message(),
        })
    }
}

impl AttachmentApi for HttpAttachmentApi {
    async fn create_post_id(&self) -> Result<PostId, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/v1/posts/drafts"))
            .bearer(self.config.token())
            .send()
            .await?;

        let body: CreatePostIdResponse = check(response)?.json()?;
        log::debug!("draft post id issued: {}", body.post_id);
        Ok(body.post_id)
    }

    async fn issue_upload_url(
        &self,
        post_id: PostId,
        file_name: &str,
    ) -> Result<UploadTarget, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/v1/attachments/upload-url"))
            .bearer(self.config.token())
            .json(&IssueUploadUrlRequest { post_id, file_name })?
            .send()
            .await?;

        Ok(check(response)?.json()?)
    }

    async fn upload_to_storage(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        // presigned: the URL itself is the credential
        let response = self
            .client
            .put(upload_url)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        check(response).map(drop)
    }

    async fn delete_attachment(&self, attachment_id: AttachmentId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.endpoint(&format!("/v1/attachments/{attachment_id}")))
            .bearer(self.config.token())
            .send()
            .await?;

        check(response).map(drop)
    }

    async fn submit_post(&self, post: &PostSubmission) -> Result<PostId, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/v1/posts"))
            .bearer(self.config.token())
            .json(post)?
            .send()
            .await?;

        let body: SubmitPostResponse = check(response)?.json()?;
        Ok(body.id)
    }
}
