use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::error::{Error, Result};

static TEMP_SOURCE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Where the entry translation unit comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Path(PathBuf),
    /// C++ source text, compiled from a temporary file.
    Text(String),
}

impl InputSource {
    /// A path when `input` names an existing file, source text otherwise.
    pub fn detect(input: &str) -> Self {
        let candidate = Path::new(input);
        if !input.contains('\n') && candidate.is_file() {
            Self::Path(candidate.to_path_buf())
        } else {
            Self::Text(input.to_string())
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

impl From<PathBuf> for InputSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for InputSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

/// A `.cpp` file holding inline source text, removed on drop.
#[derive(Debug)]
pub(crate) struct TempSource {
    path: PathBuf,
}

impl TempSource {
    pub(crate) fn create(text: &str) -> Result<Self> {
        let id = TEMP_SOURCE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!("cpp-to-json-{}-{id}.cpp", std::process::id()));
        std::fs::write(&path, text).map_err(|e| Error::Provider {
            file: path.clone(),
            message: format!("failed to write temporary source: {e}"),
        })?;
        debug!("[source] wrote inline source to {}", path.display());
        Ok(Self {
            path,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempSource {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("[source] failed to remove {}: {e}", self.path.display());
        }
    }
}
