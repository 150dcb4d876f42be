//! Layered configuration.
//!
//! Settings are split into one file per category. [`Settings`] aggregates
//! them and merges `cpp-to-json.toml` patches over the defaults; the CLI
//! applies its flags on top and normalizes once more.

pub(crate) mod compiler;
pub(crate) mod logging;
pub(crate) mod traversal;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use compiler::CompilerSettings;
use compiler::CompilerSettingsPatch;
use logging::LoggingSettingsPatch;
pub use logging::{LogLevel, LoggingSettings};
use serde::Deserialize;
use tracing::debug;
use traversal::TraversalSettingsPatch;
pub use traversal::{DEFAULT_ALIAS_PASSES, MAX_ALIAS_PASSES, MIN_ALIAS_PASSES, TraversalSettings};

use crate::error::{Error, Result};

pub const CONFIG_FILENAME: &str = "cpp-to-json.toml";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub compiler: CompilerSettings,
    pub traversal: TraversalSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Parse a TOML document and merge it over the defaults.
    pub fn from_toml_str(
        content: &str,
        path: &Path,
    ) -> Result<Self> {
        let patch: SettingsPatch = toml::from_str(content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut settings = Self::default();
        settings.apply_patch(patch);
        settings.normalize();
        Ok(settings)
    }

    /// Read settings from an explicit configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("[config] loading {}", path.display());
        Self::from_toml_str(&content, path)
    }

    /// Settings for an extraction starting at `start`: the nearest
    /// `cpp-to-json.toml` above it, or the defaults when there is none.
    pub fn discover(start: &Path) -> Result<Self> {
        match find_config_file(start) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    fn apply_patch(
        &mut self,
        patch: SettingsPatch,
    ) {
        if let Some(p) = patch.compiler {
            self.compiler.apply_patch(p);
        }
        if let Some(p) = patch.traversal {
            self.traversal.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
    }

    pub fn normalize(&mut self) {
        self.compiler.normalize();
        self.traversal.normalize();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct SettingsPatch {
    compiler: Option<CompilerSettingsPatch>,
    traversal: Option<TraversalSettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, toml::Value>,
}

/// Walks parent directories from `start` looking for `cpp-to-json.toml`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() {
        start.parent()?
    } else {
        start
    };
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

#[cfg(test)]
#[path = "../../tests/src/config_tests.rs"]
mod tests;
