//! In-memory backend for unit tests.
//!
//! `FakeApi` issues attachment ids `A1`, `A2`, ... in call order, records every
//! request it sees, and can be scripted to fail a given step or to hold a
//! storage upload until the test releases it.
//!
//! # Example
//!
//! ```ignore
//! let api = FakeApi::new();
//! api.fail_next(Step::Storage, Some("signature expired"));
//!
//! let mut session = UploadSession::open(api.clone(), BusinessConfig::default()).await?;
//! session.select_files(vec![text_file("a.txt")]);
//! session.wait_idle().await;
//! ```

#![cfg(test)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::api::{ApiError, AttachmentApi, PostSubmission, UploadTarget};
use crate::{AttachmentId, PostId, SourceFile};

/// Backend call that can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    DraftId,
    Issue,
    Storage,
    Delete,
    Submit,
}

#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub url: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Default)]
struct Inner {
    failures: Vec<(Step, Option<String>)>,
    holds: VecDeque<Arc<Notify>>,
    next_attachment: u32,
    issued_for: Vec<(String, String)>,
    uploads: Vec<StoredUpload>,
    deleted: Vec<AttachmentId>,
    submissions: Vec<PostSubmission>,
}

#[derive(Clone, Default)]
pub struct FakeApi {
    inner: Arc<Mutex<Inner>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("lock poisoned")
    }

    /// Make the next call of `step` fail, optionally with a backend message.
    pub fn fail_next(&self, step: Step, message: Option<&str>) {
        self.lock()
            .failures
            .push((step, message.map(str::to_owned)));
    }

    /// Hold the next storage upload until the returned handle is notified.
    pub fn hold_next_storage(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().holds.push_back(gate.clone());
        gate
    }

    pub fn uploads(&self) -> Vec<StoredUpload> {
        self.lock().uploads.clone()
    }

    /// `(post id, file name)` of every issued upload location.
    pub fn issued_for(&self) -> Vec<(String, String)> {
        self.lock().issued_for.clone()
    }

    pub fn deleted(&self) -> Vec<AttachmentId> {
        self.lock().deleted.clone()
    }

    pub fn submissions(&self) -> Vec<PostSubmission> {
        self.lock().submissions.clone()
    }

    fn scripted_failure(&self, step: Step) -> Result<(), ApiError> {
        let mut inner = self.lock();
        match inner.failures.iter().position(|(s, _)| *s == step) {
            Some(index) => {
                let (_, message) = inner.failures.remove(index);
                Err(ApiError::Status {
                    status: 500,
                    message,
                })
            }
            None => Ok(()),
        }
    }
}

impl AttachmentApi for FakeApi {
    async fn create_post_id(&self) -> Result<PostId, ApiError> {
        self.scripted_failure(Step::DraftId)?;
        Ok(PostId::from("P1"))
    }

    async fn issue_upload_url(
        &self,
        post_id: PostId,
        file_name: &str,
    ) -> Result<UploadTarget, ApiError> {
        self.scripted_failure(Step::Issue)?;
        let mut inner = self.lock();
        inner.next_attachment += 1;
        inner
            .issued_for
            .push((post_id.to_string(), file_name.to_owned()));
        let id = format!("A{}", inner.next_attachment);
        Ok(UploadTarget {
            attachment_id: AttachmentId::from(id.as_str()),
            upload_url: format!("memory://storage/{id}"),
        })
    }

    async fn upload_to_storage(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let hold = self.lock().holds.pop_front();
        if let Some(gate) = hold {
            gate.notified().await;
        }

        self.scripted_failure(Step::Storage)?;
        self.lock().uploads.push(StoredUpload {
            url: upload_url.to_owned(),
            content_type: content_type.to_owned(),
            size: bytes.len(),
        });
        Ok(())
    }

    async fn delete_attachment(&self, attachment_id: AttachmentId) -> Result<(), ApiError> {
        self.scripted_failure(Step::Delete)?;
        self.lock().deleted.push(attachment_id);
        Ok(())
    }

    async fn submit_post(&self, post: &PostSubmission) -> Result<PostId, ApiError> {
        self.scripted_failure(Step::Submit)?;
        self.lock().submissions.push(post.clone());
        Ok(PostId::from("POST-1"))
    }
}

pub fn text_file(name: &str) -> SourceFile {
    SourceFile::from_bytes(name, "text/plain", vec![b'x'; 1024])
}
