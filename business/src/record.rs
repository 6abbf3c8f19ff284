use std::fmt;

use crate::{AttachmentId, RecordId, SourceFile};

/// Upload progress checkpoints reported by the transport.
pub const PROGRESS_ISSUED: u8 = 10;
pub const PROGRESS_TRANSFERRED: u8 = 80;
pub const PROGRESS_DONE: u8 = 100;

/// Lifecycle of one attached file.
///
/// `Pending -> Uploading -> Success | Error`, and `Error -> Uploading` on
/// retry. Removal is not a status: deleted records leave the collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Pending,
    Uploading {
        progress: u8,
        attachment_id: Option<AttachmentId>,
    },
    Success {
        attachment_id: AttachmentId,
    },
    Error {
        message: String,
        attachment_id: Option<AttachmentId>,
    },
}

impl UploadStatus {
    pub fn progress(&self) -> u8 {
        match self {
            Self::Pending | Self::Error { .. } => 0,
            Self::Uploading { progress, .. } => *progress,
            Self::Success { .. } => PROGRESS_DONE,
        }
    }

    /// Backend id, once one has been issued for this file.
    pub fn attachment_id(&self) -> Option<AttachmentId> {
        match self {
            Self::Pending => None,
            Self::Uploading { attachment_id, .. } | Self::Error { attachment_id, .. } => {
                *attachment_id
            }
            Self::Success { attachment_id } => Some(*attachment_id),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Pending or uploading.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Pending | Self::Uploading { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Uploading { .. } => "uploading",
            Self::Success { .. } => "success",
            Self::Error { .. } => "error",
        }
    }

    /// Merge a transport event into this status.
    pub fn apply(&self, event: RecordEvent) -> Self {
        let attachment_id = self.attachment_id();
        let current = match self {
            Self::Uploading { progress, .. } => *progress,
            _ => 0,
        };

        match event {
            RecordEvent::Started => Self::Uploading {
                progress: 0,
                attachment_id,
            },
            RecordEvent::Issued { attachment_id } => Self::Uploading {
                progress: current.max(PROGRESS_ISSUED),
                attachment_id: Some(attachment_id),
            },
            RecordEvent::Transferred => Self::Uploading {
                progress: current.max(PROGRESS_TRANSFERRED),
                attachment_id,
            },
            RecordEvent::Completed { attachment_id } => Self::Success { attachment_id },
            RecordEvent::Failed { message } => Self::Error {
                message,
                attachment_id,
            },
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Uploading { progress, .. } => write!(f, "uploading {progress}%"),
            Self::Success { .. } => write!(f, "✓ uploaded"),
            Self::Error { message, .. } => write!(f, "✗ {message}"),
        }
    }
}

/// Partial-state update emitted by the transport for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordEvent {
    /// Transfer began; progress reset to 0 and any previous error cleared.
    Started,
    /// Upload location issued; progress 10.
    Issued { attachment_id: AttachmentId },
    /// Bytes accepted by storage; progress 80.
    Transferred,
    /// Progress 100.
    Completed { attachment_id: AttachmentId },
    Failed { message: String },
}

/// One file attached to the draft.
#[derive(Debug, Clone)]
pub struct UploadRecord {
    id: RecordId,
    source: SourceFile,
    status: UploadStatus,
}

impl UploadRecord {
    pub fn new(id: RecordId, source: SourceFile) -> Self {
        Self {
            id,
            source,
            status: UploadStatus::Pending,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    /// Copy of this record with `event` merged into its status.
    pub(crate) fn with_event(&self, event: RecordEvent) -> Self {
        Self {
            id: self.id,
            source: self.source.clone(),
            status: self.status.apply(event),
        }
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn size(&self) -> u64 {
        self.source.size()
    }

    pub fn content_type(&self) -> &str {
        self.source.content_type()
    }

    pub fn progress(&self) -> u8 {
        self.status.progress()
    }

    pub fn error(&self) -> Option<&str> {
        self.status.error()
    }

    pub fn remote_attachment_id(&self) -> Option<AttachmentId> {
        self.status.attachment_id()
    }
}

/// Records compare by identity and status; the source bytes are not compared.
impl PartialEq for UploadRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.status == other.status
            && self.name() == other.name()
            && self.size() == other.size()
            && self.content_type() == other.content_type()
    }
}

impl Eq for UploadRecord {}

#[cfg(test)]
mod tests {
    use super::*;

    fn issued() -> AttachmentId {
        AttachmentId::from("att-1")
    }

    #[test]
    fn test_pending_defaults() {
        let status = UploadStatus::default();
        assert_eq!(status, UploadStatus::Pending);
        assert_eq!(status.progress(), 0);
        assert!(status.attachment_id().is_none());
        assert!(status.error().is_none());
        assert!(status.is_in_progress());
    }

    #[test]
    fn test_happy_path_progress() {
        let status = UploadStatus::Pending.apply(RecordEvent::Started);
        assert_eq!(status.progress(), 0);
        assert_eq!(status.label(), "uploading");

        let status = status.apply(RecordEvent::Issued {
            attachment_id: issued(),
        });
        assert_eq!(status.progress(), 10);
        assert_eq!(status.attachment_id(), Some(issued()));

        let status = status.apply(RecordEvent::Transferred);
        assert_eq!(status.progress(), 80);
        assert_eq!(status.attachment_id(), Some(issued()));

        let status = status.apply(RecordEvent::Completed {
            attachment_id: issued(),
        });
        assert!(status.is_success());
        assert_eq!(status.progress(), 100);
        assert_eq!(status.attachment_id(), Some(issued()));
    }

    #[test]
    fn test_failure_keeps_issued_id_and_resets_progress() {
        let status = UploadStatus::Uploading {
            progress: 10,
            attachment_id: Some(issued()),
        }
        .apply(RecordEvent::Failed {
            message: "storage rejected".to_owned(),
        });

        assert!(status.is_error());
        assert_eq!(status.progress(), 0);
        assert_eq!(status.error(), Some("storage rejected"));
        assert_eq!(status.attachment_id(), Some(issued()));
    }

    #[test]
    fn test_retry_clears_error_but_keeps_id() {
        let status = UploadStatus::Error {
            message: "boom".to_owned(),
            attachment_id: Some(issued()),
        }
        .apply(RecordEvent::Started);

        assert_eq!(
            status,
            UploadStatus::Uploading {
                progress: 0,
                attachment_id: Some(issued())
            }
        );
        assert!(status.error().is_none());
    }

    #[test]
    fn test_progress_never_moves_backwards_while_uploading() {
        let status = UploadStatus::Uploading {
            progress: 80,
            attachment_id: Some(issued()),
        }
        .apply(RecordEvent::Issued {
            attachment_id: issued(),
        });
        assert_eq!(status.progress(), 80);
    }

    #[test]
    fn test_display() {
        assert_eq!(UploadStatus::Pending.to_string(), "pending");
        assert_eq!(
            UploadStatus::Uploading {
                progress: 10,
                attachment_id: None
            }
            .to_string(),
            "uploading 10%"
        );
        assert_eq!(
            UploadStatus::Error {
                message: "nope".to_owned(),
                attachment_id: None
            }
            .to_string(),
            "✗ nope"
        );
    }
}
