//! Styled terminal output.

use console::{Term, style};
use std::fmt::Display;

use stagepost_business::{UploadRecord, UploadStatus, format_size};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Terminal output helper for consistent styled output.
pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper writing to stdout.
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✓").green().bold(), message)),
        );
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✗").red().bold(), message)),
        );
    }

    /// Print a warning message with a yellow warning sign.
    pub fn warning(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("⚠").yellow().bold(), message)),
        );
    }

    /// Print an info message with a blue info icon.
    pub fn info(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("ℹ").blue().bold(), message)),
        );
    }

    /// Print a plain message without any prefix.
    pub fn print(&self, message: impl Display) {
        drop(self.term.write_line(&message.to_string()));
    }

    /// Print an empty line.
    pub fn newline(&self) {
        drop(self.term.write_line(""));
    }

    /// Print a dim/muted message.
    pub fn dim(&self, message: impl Display) {
        drop(self.term.write_line(&style(message).dim().to_string()));
    }

    /// Print a labeled value with indentation.
    pub fn labeled_indent(&self, label: impl Display, value: impl Display, indent: usize) {
        let spaces = " ".repeat(indent);
        drop(
            self.term
                .write_line(&format!("{spaces}{}: {}", style(label).dim(), value)),
        );
    }

    /// Print the outcome of one finished upload.
    pub fn record_outcome(&self, record: &UploadRecord) {
        match record.status() {
            UploadStatus::Success { attachment_id } => self.success(format!(
                "{} uploaded ({})",
                style(record.name()).white().bold(),
                style(attachment_id).dim()
            )),
            UploadStatus::Error { message, .. } => {
                self.error(format!("{}: {message}", style(record.name()).white().bold()));
            }
            UploadStatus::Pending | UploadStatus::Uploading { .. } => {}
        }
    }

    /// Print every record as a table, or a dim note when there are none.
    pub fn record_table(&self, records: &[UploadRecord]) {
        if records.is_empty() {
            self.dim("No attachments.");
            return;
        }
        let mut table = Table::new(record_rows(records));
        table.with(Style::rounded());
        self.print(table);
    }
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "File")]
    name: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Type")]
    content_type: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn record_rows(records: &[UploadRecord]) -> Vec<RecordRow> {
    records
        .iter()
        .map(|record| RecordRow {
            name: record.name().to_owned(),
            size: format_size(record.size()),
            content_type: record.content_type().to_owned(),
            status: record.status().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use stagepost_business::SourceFile;
    use stagepost_business::registry::to_records;

    use super::*;

    #[test]
    fn test_record_rows() {
        let records = to_records(vec![SourceFile::from_bytes(
            "plan.pdf",
            "application/pdf",
            vec![0_u8; 2048],
        )]);

        let rows = record_rows(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "plan.pdf");
        assert_eq!(rows[0].size, "2.0 KB");
        assert_eq!(rows[0].content_type, "application/pdf");
        assert_eq!(rows[0].status, "pending");
    }
}
