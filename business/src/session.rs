//! One post-authoring session.
//!
//! [`UploadSession`] is the single owner of the record collection. Transports
//! run as background tasks and report [`RecordEvent`]s through the session's
//! [`StateRuntime`]; nothing changes until the owner calls [`UploadSession::sync`]
//! (or one of the waiting helpers, which sync for you).
//!
//! A retry supersedes any transport still running for the same record, and a
//! delete forgets the record; late events from either are dropped.

use std::fmt;
use std::io::Write;
use std::path::Path;

use stagepost_states::StateRuntime;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::api::{ApiError, AttachmentApi, PostSubmission};
use crate::registry::{apply_update, dedupe, to_records_excluding};
use crate::validate::{Violation, validate_file};
use crate::{
    BusinessConfig, PostDraft, PostId, RecordEvent, RecordId, SourceFile, UploadRecord,
    UploadStatus, transport,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to create a draft post: {}", .0.user_message())]
    DraftId(#[source] ApiError),
    #[error("no attachment with id {0}")]
    UnknownRecord(RecordId),
    #[error("failed to delete attachment: {}", .0.user_message())]
    DeleteFailed(#[source] ApiError),
    #[error("the post needs a title")]
    EmptyTitle,
    #[error("{unfinished} attachment(s) still uploading and {failed} failed")]
    NotReady { unfinished: usize, failed: usize },
    #[error("failed to submit post: {}", .0.user_message())]
    Submit(#[source] ApiError),
    #[error("failed to prepare preview: {0}")]
    Preview(#[from] std::io::Error),
}

/// Asked before a record is removed. Returning `false` leaves everything untouched.
pub trait ConfirmDelete {
    fn confirm(&self, record: &UploadRecord) -> bool;
}

impl<F> ConfirmDelete for F
where
    F: Fn(&UploadRecord) -> bool,
{
    fn confirm(&self, record: &UploadRecord) -> bool {
        self(record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFile {
    pub name: String,
    pub violations: Vec<Violation>,
}

impl fmt::Display for RejectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// What happened to one batch handed to [`UploadSession::select_files`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionReport {
    pub rejected: Vec<RejectedFile>,
    /// Files skipped because a record with the same name already exists.
    pub duplicates: usize,
    pub accepted: Vec<RecordId>,
}

impl SelectionReport {
    /// One line per rejected file, or `None` when nothing was rejected.
    pub fn rejection_message(&self) -> Option<String> {
        if self.rejected.is_empty() {
            return None;
        }
        let lines: Vec<String> = self.rejected.iter().map(ToString::to_string).collect();
        Some(lines.join("\n"))
    }

    pub fn duplicate_message(&self) -> Option<String> {
        match self.duplicates {
            0 => None,
            1 => Some("1 file was skipped because it is already attached".to_owned()),
            n => Some(format!("{n} files were skipped because they are already attached")),
        }
    }
}

/// A temporary local copy of one record, viewable through [`Preview::url`].
///
/// The copy is removed when the preview is dropped.
#[derive(Debug)]
pub struct Preview {
    record_id: RecordId,
    name: String,
    size: u64,
    content_type: String,
    file: NamedTempFile,
}

impl Preview {
    fn create(record: &UploadRecord, bytes: &[u8]) -> std::io::Result<Self> {
        let suffix = Path::new(record.name())
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("stagepost-preview-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        Ok(Self {
            record_id: record.id(),
            name: record.name().to_owned(),
            size: record.size(),
            content_type: record.content_type().to_owned(),
            file,
        })
    }

    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn url(&self) -> String {
        format!("file://{}", self.path().display())
    }
}

pub struct UploadSession<A: AttachmentApi> {
    api: A,
    config: BusinessConfig,
    draft: PostDraft,
    records: Vec<UploadRecord>,
    runtime: StateRuntime<RecordId, RecordEvent>,
    preview: Option<Preview>,
}

impl<A: AttachmentApi> UploadSession<A> {
    /// Reserve a draft post id on the backend and start an empty session.
    pub async fn open(api: A, config: BusinessConfig) -> Result<Self, SessionError> {
        let post_id = api
            .create_post_id()
            .await
            .map_err(SessionError::DraftId)?;
        log::info!("opened upload session for draft {post_id}");

        Ok(Self {
            api,
            config,
            draft: PostDraft::new(post_id),
            records: Vec::new(),
            runtime: StateRuntime::new(),
            preview: None,
        })
    }

    pub fn draft(&self) -> &PostDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut PostDraft {
        &mut self.draft
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    pub fn records(&self) -> &[UploadRecord] {
        &self.records
    }

    pub fn record(&self, id: RecordId) -> Option<&UploadRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    fn require(&self, id: RecordId) -> Result<&UploadRecord, SessionError> {
        self.record(id).ok_or(SessionError::UnknownRecord(id))
    }

    /// Validate, de-duplicate, and start uploading `files`.
    pub fn select_files(&mut self, files: Vec<SourceFile>) -> SelectionReport {
        let mut report = SelectionReport::default();

        let mut valid = Vec::with_capacity(files.len());
        for file in files {
            let violations = validate_file(&file, self.config.max_file_size_mb);
            if violations.is_empty() {
                valid.push(file);
            } else {
                log::debug!("rejected {}: {violations:?}", file.name());
                report.rejected.push(RejectedFile {
                    name: file.name().to_owned(),
                    violations,
                });
            }
        }

        let candidates = valid.len();
        let survivors = dedupe(valid, &self.records);
        report.duplicates = candidates - survivors.len();

        for record in to_records_excluding(survivors, &self.records) {
            report.accepted.push(record.id());
            self.records.push(record.clone());
            self.spawn_transport(record);
        }

        log::info!(
            "selected {} file(s): {} rejected, {} duplicate",
            report.accepted.len(),
            report.rejected.len(),
            report.duplicates
        );
        report
    }

    fn spawn_transport(&mut self, record: UploadRecord) {
        let api = self.api.clone();
        let post_id = self.draft.id();
        self.runtime.spawn(record.id(), move |updater| async move {
            transport::upload(&api, &record, post_id, &updater).await;
        });
    }

    /// Start a fresh transport for `id`, whatever its status.
    pub fn retry(&mut self, id: RecordId) -> Result<(), SessionError> {
        let record = self.require(id)?.clone();
        log::info!("retrying {}", record.name());
        self.spawn_transport(record);
        Ok(())
    }

    /// Remove a record once `confirm` agrees.
    ///
    /// A successfully uploaded record is deleted on the backend first; if that
    /// fails the record stays as it was.
    pub async fn delete(
        &mut self,
        id: RecordId,
        confirm: &impl ConfirmDelete,
    ) -> Result<DeleteOutcome, SessionError> {
        self.sync();
        let record = self.require(id)?;

        if !confirm.confirm(record) {
            return Ok(DeleteOutcome::Cancelled);
        }

        if let UploadStatus::Success { attachment_id } = record.status() {
            self.api
                .delete_attachment(*attachment_id)
                .await
                .map_err(SessionError::DeleteFailed)?;
        }

        self.runtime.forget(&id);
        self.records.retain(|r| r.id() != id);
        if self.preview.as_ref().is_some_and(|p| p.record_id() == id) {
            self.close_preview();
        }
        log::info!("removed attachment record {id}");
        Ok(DeleteOutcome::Removed)
    }

    /// Copy the record's bytes to a temporary file, replacing any open preview.
    pub async fn open_preview(&mut self, id: RecordId) -> Result<&Preview, SessionError> {
        let record = self.require(id)?;
        let bytes = record.source().read_bytes().await?;
        let preview = Preview::create(record, &bytes)?;
        log::debug!("preview of {} at {}", preview.name(), preview.url());

        Ok(&*self.preview.insert(preview))
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Merge every queued transport event. Returns the ids that changed.
    pub fn sync(&mut self) -> Vec<RecordId> {
        let mut changed = Vec::new();
        for (id, event) in self.runtime.drain() {
            log::debug!("{id}: {event:?}");
            self.records = apply_update(&self.records, id, event);
            if !changed.contains(&id) {
                changed.push(id);
            }
        }
        changed
    }

    /// Transports spawned and not yet joined.
    pub fn in_flight(&self) -> usize {
        self.runtime.task_count()
    }

    /// Wait for one transport to finish, then sync.
    ///
    /// Returns the ids that changed, or `None` when no transport was running.
    pub async fn wait_one(&mut self) -> Option<Vec<RecordId>> {
        let joined = self.runtime.join_next().await;
        let changed = self.sync();
        joined.then_some(changed)
    }

    pub async fn wait_idle(&mut self) {
        self.runtime.wait_idle().await;
        self.sync();
    }

    /// No record is pending or uploading.
    pub fn is_settled(&self) -> bool {
        !self.records.iter().any(|r| r.status().is_in_progress())
    }

    /// Persist the draft with every uploaded attachment.
    pub async fn submit(&mut self) -> Result<PostId, SessionError> {
        self.sync();

        if !self.draft.has_title() {
            return Err(SessionError::EmptyTitle);
        }

        let unfinished = self
            .records
            .iter()
            .filter(|r| r.status().is_in_progress())
            .count();
        let failed = self.records.iter().filter(|r| r.status().is_error()).count();
        if unfinished > 0 || failed > 0 {
            return Err(SessionError::NotReady { unfinished, failed });
        }

        let submission = PostSubmission {
            post_id: self.draft.id(),
            title: self.draft.title.clone(),
            body: self.draft.body.clone(),
            stage_id: self.draft.stage_id.clone(),
            attachment_ids: self
                .records
                .iter()
                .filter_map(UploadRecord::remote_attachment_id)
                .collect(),
        };

        let id = self
            .api
            .submit_post(&submission)
            .await
            .map_err(SessionError::Submit)?;
        log::info!(
            "submitted post {id} with {} attachment(s)",
            submission.attachment_ids.len()
        );
        Ok(id)
    }

    /// Let running transports finish, release the preview, and hand back the records.
    pub async fn shutdown(mut self) -> Vec<UploadRecord> {
        self.wait_idle().await;
        self.close_preview();
        self.records
    }
}
