//! Uploaded video inputs and the temporary file handle the decoder reads.

use crate::error::MediaResult;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::debug;

/// A video supplied by the user.
#[derive(Debug, Clone)]
pub enum VideoInput {
    /// A file already on disk.
    Path(PathBuf),
    /// Uploaded bytes held in memory. `name` is the original file name,
    /// used for display and to keep the container extension.
    Bytes { name: String, data: Arc<[u8]> },
}

impl VideoInput {
    /// Input backed by a file on disk.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Input backed by uploaded bytes.
    pub fn bytes(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes {
            name: name.into(),
            data: data.into(),
        }
    }

    /// File name shown to the user.
    pub fn display_name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Bytes { name, .. } => name.clone(),
        }
    }
}

/// Uploaded bytes spooled to a temporary file so FFmpeg can read them.
///
/// The file is removed when the guard is dropped. Whoever owns the guard
/// owns the handle, so it is released exactly once whether sampling
/// succeeds or fails.
#[derive(Debug)]
pub struct TempVideo {
    file: NamedTempFile,
}

impl TempVideo {
    /// Write `data` to a fresh temporary file, keeping `name`'s extension.
    pub fn spool(name: &str, data: &[u8]) -> MediaResult<Self> {
        let suffix = Path::new(name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("tripcut-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(data)?;
        file.flush()?;

        debug!(path = %file.path().display(), bytes = data.len(), "Spooled upload to temporary file");
        Ok(Self { file })
    }

    /// Path of the temporary file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl Drop for TempVideo {
    fn drop(&mut self) {
        debug!(path = %self.file.path().display(), "Releasing temporary video handle");
    }
}
