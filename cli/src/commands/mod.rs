//! Command implementations for the `stagepost` CLI.

pub mod completions;
pub mod config;
pub mod upload;

pub use completions::generate_completions;
pub use config::run_config;
pub use upload::{UploadArgs, run_upload};
