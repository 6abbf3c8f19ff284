use ustr::Ustr;

use crate::validate::DEFAULT_MAX_FILE_SIZE_MB;

#[derive(Debug, Clone)]
pub struct BusinessConfig {
    pub api_base_url: String,
    /// Bearer token sent with every backend request.
    ///
    /// Never sent to presigned storage URLs.
    pub token: Option<String>,
    /// Per-file size limit applied before anything is uploaded.
    pub max_file_size_mb: u64,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_max_file_size_mb(mut self, max_file_size_mb: u64) -> Self {
        self.max_file_size_mb = max_file_size_mb;
        self
    }

    pub fn api_url(&self) -> Ustr {
        let base = self.api_base_url.trim_end_matches('/');
        if base.is_empty() {
            Ustr::from("/api")
        } else {
            Ustr::from(&format!("{base}/api"))
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_owned(),
            token: None,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
        }
    }
}
