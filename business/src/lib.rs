//! Staging file attachments for a draft post: validation, de-duplication,
//! presigned uploads, and the session that ties them together.

pub mod api;
mod config;
mod draft;
mod file;
pub mod http;
mod ids;
mod record;
pub mod registry;
pub mod session;
pub mod transport;
pub mod validate;

#[cfg(test)]
mod test_utils;

pub use api::{ApiError, AttachmentApi, HttpAttachmentApi, PostSubmission, UploadTarget};
pub use config::BusinessConfig;
pub use draft::PostDraft;
pub use file::{FileOrigin, SourceFile};
pub use ids::{AttachmentId, PostId, RecordId};
pub use record::{RecordEvent, UploadRecord, UploadStatus};
pub use session::{
    ConfirmDelete, DeleteOutcome, Preview, RejectedFile, SelectionReport, SessionError,
    UploadSession,
};
pub use validate::{Violation, format_size, validate_file};
