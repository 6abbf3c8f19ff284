use std::{io, path::PathBuf, sync::Arc};

/// Where a source file's bytes live.
#[derive(Debug, Clone)]
pub enum FileOrigin {
    Memory(Arc<[u8]>),
    /// Read when the transfer starts, not when the file is selected.
    Disk(PathBuf),
}

/// A file handed to the session for upload.
///
/// Name, size and content type are captured once, when the file is selected.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    size: u64,
    content_type: String,
    origin: FileOrigin,
}

impl SourceFile {
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            content_type: content_type.into(),
            origin: FileOrigin::Memory(bytes),
        }
    }

    /// Describe a file on disk. Only its metadata is read here.
    pub fn from_path(path: impl Into<PathBuf>, content_type: impl Into<String>) -> io::Result<Self> {
        let path = path.into();
        let metadata = std::fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("path has no file name: {}", path.display()),
                )
            })?;

        Ok(Self {
            name,
            size: metadata.len(),
            content_type: content_type.into(),
            origin: FileOrigin::Disk(path),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn origin(&self) -> &FileOrigin {
        &self.origin
    }

    pub async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        match &self.origin {
            FileOrigin::Memory(bytes) => Ok(bytes.to_vec()),
            FileOrigin::Disk(path) => tokio::fs::read(path).await,
        }
    }
}
