//! Pure transformations over the record collection.
//!
//! The session never edits records in place: every status change goes
//! through [`apply_update`], which touches only the record it names.

use std::collections::HashSet;

use crate::{RecordEvent, RecordId, SourceFile, UploadRecord};

/// Drop candidates whose name is already tracked, or repeated earlier in `candidates`.
///
/// Names compare exactly (case-sensitive). Order of survivors is preserved.
pub fn dedupe(candidates: Vec<SourceFile>, existing: &[UploadRecord]) -> Vec<SourceFile> {
    let mut seen: HashSet<String> = existing.iter().map(|r| r.name().to_owned()).collect();
    candidates
        .into_iter()
        .filter(|file| seen.insert(file.name().to_owned()))
        .collect()
}

/// One `Pending` record per file, each with a fresh id unique within the batch.
pub fn to_records(files: Vec<SourceFile>) -> Vec<UploadRecord> {
    to_records_excluding(files, &[])
}

/// Like [`to_records`], but no new id collides with any of `existing`.
pub fn to_records_excluding(
    files: Vec<SourceFile>,
    existing: &[UploadRecord],
) -> Vec<UploadRecord> {
    let mut taken: HashSet<RecordId> = existing.iter().map(UploadRecord::id).collect();
    taken.reserve(files.len());
    files
        .into_iter()
        .map(|file| UploadRecord::new(RecordId::generate_unique(&mut taken), file))
        .collect()
}

/// New collection with `event` merged into the record named `id`.
///
/// Every other record is carried over unchanged; an unknown `id` yields an
/// unchanged collection.
pub fn apply_update(
    records: &[UploadRecord],
    id: RecordId,
    event: RecordEvent,
) -> Vec<UploadRecord> {
    records
        .iter()
        .map(|record| {
            if record.id() == id {
                record.with_event(event.clone())
            } else {
                record.clone()
            }
        })
        .collect()
}
