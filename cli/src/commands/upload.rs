//! Upload files into a fresh draft post.

use std::fmt;
use std::io::IsTerminal as _;
use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use inquire::{Confirm, Select};
use stagepost_business::{
    BusinessConfig, ConfirmDelete, DeleteOutcome, HttpAttachmentApi, RecordId, SelectionReport,
    SourceFile, UploadRecord, UploadSession, format_size,
};
use tracing::instrument;

use crate::output::Output;

type Session = UploadSession<HttpAttachmentApi>;

pub struct UploadArgs {
    pub files: Vec<PathBuf>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub stage: Option<String>,
    pub submit: bool,
    pub interactive: bool,
}

#[instrument(skip_all, name = "upload", fields(file_count = args.files.len(), submit = args.submit))]
pub async fn run_upload(config: BusinessConfig, args: UploadArgs) -> Result<()> {
    let out = Output::new();
    let sources = read_sources(&args.files)?;

    let api = HttpAttachmentApi::new(config.clone());
    let mut session = UploadSession::open(api, config)
        .await
        .context("Failed to open a draft post")?;
    out.info(format!("Draft post {}", session.draft().id()));

    {
        let draft = session.draft_mut();
        draft.title = args.title.unwrap_or_default();
        draft.body = args.body.unwrap_or_default();
        draft.stage_id = args.stage;
    }

    let report = session.select_files(sources);
    print_report(&out, &report);
    wait_for_uploads(&mut session, &out).await;

    out.newline();
    out.record_table(session.records());

    if args.interactive {
        if std::io::stdin().is_terminal() {
            interact(&mut session, &out).await?;
        } else {
            out.warning("Not a terminal, skipping interactive mode");
        }
    }

    let failed = session
        .records()
        .iter()
        .filter(|r| r.status().is_error())
        .count();

    if args.submit && failed == 0 {
        let post_id = session.submit().await.context("Failed to submit post")?;
        out.success(format!("Submitted post {post_id}"));
    }

    session.shutdown().await;

    if failed > 0 {
        bail!("{failed} upload(s) failed");
    }
    Ok(())
}

/// Build sources for `paths`, guessing each content type from its extension.
pub fn read_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    paths
        .iter()
        .map(|path| {
            let content_type = mime_guess::from_path(path)
                .first_or_octet_stream()
                .to_string();
            SourceFile::from_path(path, content_type)
                .with_context(|| format!("Failed to read file: {}", path.display()))
        })
        .collect()
}

fn print_report(out: &Output, report: &SelectionReport) {
    if let Some(rejections) = report.rejection_message() {
        for line in rejections.lines() {
            out.error(line);
        }
    }
    if let Some(duplicates) = report.duplicate_message() {
        out.warning(duplicates);
    }
    if report.accepted.is_empty() {
        out.dim("Nothing new to upload.");
    } else {
        out.info(format!("Uploading {} file(s)...", report.accepted.len()));
    }
}

/// Wait for every running transport, printing each record as it finishes.
async fn wait_for_uploads(session: &mut Session, out: &Output) {
    while let Some(changed) = session.wait_one().await {
        for id in changed {
            if let Some(record) = session.record(id)
                && !record.status().is_in_progress()
            {
                out.record_outcome(record);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Retry,
    Delete,
    Preview,
    Done,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Retry => "Retry a failed upload",
            Self::Delete => "Delete an attachment",
            Self::Preview => "Preview an attachment",
            Self::Done => "Done",
        })
    }
}

fn available_actions(records: &[UploadRecord]) -> Vec<Action> {
    let mut actions = Vec::with_capacity(4);
    if records.iter().any(|r| r.status().is_error()) {
        actions.push(Action::Retry);
    }
    if !records.is_empty() {
        actions.push(Action::Delete);
        actions.push(Action::Preview);
    }
    actions.push(Action::Done);
    actions
}

struct RecordChoice {
    id: RecordId,
    label: String,
}

impl fmt::Display for RecordChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn pick_record<'a>(
    prompt: &str,
    records: impl Iterator<Item = &'a UploadRecord>,
) -> Result<Option<RecordId>> {
    let choices: Vec<RecordChoice> = records
        .map(|record| RecordChoice {
            id: record.id(),
            label: format!("{} [{}]", record.name(), record.status()),
        })
        .collect();

    let choice = Select::new(prompt, choices)
        .with_help_message("Use arrow keys to navigate, Enter to select, Esc to go back")
        .prompt_skippable()
        .context("Failed to select attachment")?;
    Ok(choice.map(|c| c.id))
}

/// Asks on the terminal before an attachment is removed.
struct InquireConfirm;

impl ConfirmDelete for InquireConfirm {
    fn confirm(&self, record: &UploadRecord) -> bool {
        Confirm::new(&format!("Delete {}?", record.name()))
            .with_default(false)
            .prompt()
            .unwrap_or(false)
    }
}

#[instrument(skip_all, name = "interactive")]
async fn interact(session: &mut Session, out: &Output) -> Result<()> {
    loop {
        let action = Select::new("What next?", available_actions(session.records()))
            .prompt_skippable()
            .context("Failed to select action")?;

        match action {
            None | Some(Action::Done) => return Ok(()),
            Some(Action::Retry) => {
                let failed = session.records().iter().filter(|r| r.status().is_error());
                let Some(id) = pick_record("Retry which file?", failed)? else {
                    continue;
                };
                session.retry(id)?;
                wait_for_uploads(session, out).await;
            }
            Some(Action::Delete) => {
                let Some(id) = pick_record("Delete which file?", session.records().iter())? else {
                    continue;
                };
                match session.delete(id, &InquireConfirm).await {
                    Ok(DeleteOutcome::Removed) => out.success("Attachment removed"),
                    Ok(DeleteOutcome::Cancelled) => out.dim("Kept."),
                    Err(e) => out.error(e),
                }
            }
            Some(Action::Preview) => {
                let Some(id) = pick_record("Preview which file?", session.records().iter())?
                else {
                    continue;
                };
                let preview = session.open_preview(id).await?;
                out.labeled_indent("name", preview.name(), 2);
                out.labeled_indent("size", format_size(preview.size()), 2);
                out.labeled_indent("type", preview.content_type(), 2);
                out.labeled_indent("url", preview.url(), 2);

                Confirm::new("Close the preview?")
                    .with_default(true)
                    .prompt_skippable()
                    .context("Failed to read answer")?;
                session.close_preview();
            }
        }

        out.newline();
        out.record_table(session.records());
    }
}
