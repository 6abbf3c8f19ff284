use anyhow::Result;
use tracing::instrument;

use crate::config::Config;
use crate::output::Output;

/// Print the saved configuration, after applying any values given.
#[instrument(skip_all, name = "config")]
pub fn run_config(
    api_url: Option<String>,
    token: Option<String>,
    max_size_mb: Option<u64>,
) -> Result<()> {
    let out = Output::new();
    let mut config = Config::load()?;

    if apply_changes(&mut config, api_url, token, max_size_mb) {
        let path = config.save()?;
        out.success(format!("Saved {}", path.display()));
    }

    out.labeled_indent("api_url", config.api_url.as_deref().unwrap_or("(default)"), 2);
    out.labeled_indent(
        "token",
        if config.token.is_some() { "(set)" } else { "(not set)" },
        2,
    );
    out.labeled_indent(
        "max_file_size_mb",
        config
            .max_file_size_mb
            .map_or_else(|| "(default)".to_owned(), |mb| mb.to_string()),
        2,
    );
    Ok(())
}

/// Returns whether anything changed.
fn apply_changes(
    config: &mut Config,
    api_url: Option<String>,
    token: Option<String>,
    max_size_mb: Option<u64>,
) -> bool {
    let before = config.clone();
    if api_url.is_some() {
        config.api_url = api_url;
    }
    if token.is_some() {
        config.token = token;
    }
    if max_size_mb.is_some() {
        config.max_file_size_mb = max_size_mb;
    }
    *config != before
}
