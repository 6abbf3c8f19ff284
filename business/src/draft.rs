use crate::PostId;

/// The not-yet-submitted post that attachments are staged for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    id: PostId,
    pub title: String,
    pub body: String,
    pub stage_id: Option<String>,
}

impl PostDraft {
    pub fn new(id: PostId) -> Self {
        Self {
            id,
            title: String::new(),
            body: String::new(),
            stage_id: None,
        }
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}
