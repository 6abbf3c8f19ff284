//! Identifier newtypes.
//!
//! All three are interned (`Ustr`), so they are `Copy` and cheap to pass into
//! spawned tasks.

use std::collections::HashSet;
use std::fmt;

use chrono::Utc;
use rand::Rng as _;
use serde::{Deserialize, Serialize};
use ustr::Ustr;

/// Locally generated identity of an [`UploadRecord`](crate::UploadRecord).
///
/// Unique within one session only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(Ustr);

impl RecordId {
    /// Millisecond timestamp plus a random suffix.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix: u32 = rand::thread_rng().r#gen();
        Self(Ustr::from(&format!("{millis:x}-{suffix:08x}")))
    }

    /// Generate an id not present in `taken`, and reserve it.
    pub(crate) fn generate_unique(taken: &mut HashSet<Self>) -> Self {
        loop {
            let id = Self::generate();
            if taken.insert(id) {
                return id;
            }
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(Ustr::from(value))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend identity of a draft post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Ustr);

impl PostId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(Ustr::from(value))
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend identity of an uploaded attachment, issued with its upload URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentId(Ustr);

impl AttachmentId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for AttachmentId {
    fn from(value: &str) -> Self {
        Self(Ustr::from(value))
    }
}

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_have_time_and_random_parts() {
        let id = RecordId::generate();
        let (time, random) = id.as_str().split_once('-').unwrap();
        assert!(i64::from_str_radix(time, 16).is_ok());
        assert_eq!(random.len(), 8);
    }

    #[test]
    fn test_generate_unique_never_repeats() {
        let mut taken = HashSet::new();
        for _ in 0..500 {
            RecordId::generate_unique(&mut taken);
        }
        assert_eq!(taken.len(), 500);
    }

    #[test]
    fn test_attachment_id_serde_is_transparent() {
        let id = AttachmentId::from("att-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""att-1""#);

        let parsed: AttachmentId = serde_json::from_str(r#""att-1""#).unwrap();
        assert_eq!(parsed, id);
    }
}
