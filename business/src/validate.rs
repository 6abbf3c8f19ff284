//! Pre-upload checks on selected files.

use std::fmt;

use crate::SourceFile;

/// Size limit applied when none is configured.
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 5;

/// Extensions that are never accepted, compared against the lower-cased name.
pub const DENIED_EXTENSIONS: &[&str] = &[
    ".exe", ".bat", ".cmd", ".com", ".pif", ".scr", ".vbs", ".js", ".jar", ".app", ".deb", ".pkg",
    ".rpm", ".dmg", ".msi", ".run", ".sh",
];

/// One reason a file was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    TooLarge { limit_mb: u64, size: u64 },
    DangerousExtension { extension: &'static str },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { limit_mb, size } => write!(
                f,
                "file size must not exceed {limit_mb}MB (current size: {})",
                format_size(*size)
            ),
            Self::DangerousExtension { extension } => write!(
                f,
                "{extension} files are not allowed for security reasons"
            ),
        }
    }
}

/// Collect every violation for `file`; an empty list means it may be uploaded.
pub fn validate_file(file: &SourceFile, max_size_mb: u64) -> Vec<Violation> {
    let mut violations = Vec::new();

    if file.size() > max_size_mb.saturating_mul(1024 * 1024) {
        violations.push(Violation::TooLarge {
            limit_mb: max_size_mb,
            size: file.size(),
        });
    }

    let name = file.name().to_lowercase();
    if let Some(extension) = DENIED_EXTENSIONS
        .iter()
        .copied()
        .find(|ext| name.ends_with(ext))
    {
        violations.push(Violation::DangerousExtension { extension });
    }

    violations
}

pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / KB)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / MB)
    } else {
        format!("{:.2} GB", bytes as f64 / GB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: usize) -> SourceFile {
        SourceFile::from_bytes(name, "application/octet-stream", vec![0_u8; size])
    }

    const LIMIT: usize = 5 * 1024 * 1024;

    #[test]
    fn test_small_safe_file_passes() {
        assert!(validate_file(&file("notes.txt", 1024), 5).is_empty());
    }

    #[test]
    fn test_size_boundary() {
        assert!(validate_file(&file("exact.bin", LIMIT), 5).is_empty());

        let violations = validate_file(&file("over.bin", LIMIT + 1), 5);
        assert_eq!(
            violations,
            vec![Violation::TooLarge {
                limit_mb: 5,
                size: (LIMIT + 1) as u64
            }]
        );
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        for name in ["setup.exe", "SETUP.EXE", "Run.Sh", "bundle.JS"] {
            let violations = validate_file(&file(name, 10), 5);
            assert_eq!(violations.len(), 1, "{name} should be rejected");
            assert!(matches!(
                violations[0],
                Violation::DangerousExtension { .. }
            ));
        }
    }

    #[test]
    fn test_extension_must_be_a_suffix() {
        assert!(validate_file(&file("exe-notes.txt", 10), 5).is_empty());
        assert!(validate_file(&file("script.json", 10), 5).is_empty());
    }

    #[test]
    fn test_both_violations_are_collected() {
        let violations = validate_file(&file("huge.msi", LIMIT + 10), 5);
        assert_eq!(violations.len(), 2);
        assert!(matches!(violations[0], Violation::TooLarge { .. }));
        assert_eq!(
            violations[1],
            Violation::DangerousExtension { extension: ".msi" }
        );
    }

    #[test]
    fn test_custom_limit() {
        assert!(validate_file(&file("a.png", 1024 * 1024 + 1), 1).len() == 1);
        assert!(validate_file(&file("a.png", 1024 * 1024 + 1), 2).is_empty());
    }

    #[test]
    fn test_violation_messages() {
        let too_large = Violation::TooLarge {
            limit_mb: 5,
            size: 6 * 1024 * 1024,
        };
        assert_eq!(
            too_large.to_string(),
            "file size must not exceed 5MB (current size: 6.0 MB)"
        );

        let dangerous = Violation::DangerousExtension { extension: ".bat" };
        assert!(dangerous.to_string().contains("security"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
