use stagepost_states::LatestOnlyUpdater;

use crate::api::{ApiError, AttachmentApi};
use crate::{AttachmentId, PostId, RecordEvent, RecordId, UploadRecord};

pub type RecordUpdater = LatestOnlyUpdater<RecordId, RecordEvent>;

/// Upload one record: request a presigned location, then PUT the bytes there.
///
/// Reports only through `updater`. Fails fast; retrying is up to the caller.
pub async fn upload<A: AttachmentApi>(
    api: &A,
    record: &UploadRecord,
    post_id: PostId,
    updater: &RecordUpdater,
) {
    updater.set(RecordEvent::Started);

    match transfer(api, record, post_id, updater).await {
        Ok(attachment_id) => {
            log::info!("uploaded {} as attachment {attachment_id}", record.name());
            updater.set(RecordEvent::Transferred);
            updater.set(RecordEvent::Completed { attachment_id });
        }
        Err(e) => {
            log::warn!("upload of {} failed: {e}", record.name());
            updater.set(RecordEvent::Failed {
                message: e.user_message(),
            });
        }
    }
}

async fn transfer<A: AttachmentApi>(
    api: &A,
    record: &UploadRecord,
    post_id: PostId,
    updater: &RecordUpdater,
) -> Result<AttachmentId, ApiError> {
    let target = api.issue_upload_url(post_id, record.name()).await?;
    updater.set(RecordEvent::Issued {
        attachment_id: target.attachment_id,
    });

    let bytes = record.source().read_bytes().await?;
    log::debug!(
        "sending {} bytes of {} to storage",
        bytes.len(),
        record.name()
    );
    api.upload_to_storage(&target.upload_url, record.content_type(), bytes)
        .await?;

    Ok(target.attachment_id)
}
