use std::collections::{HashMap, HashSet};

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct CompilerSettings {
    /// Compiler binary used for the AST dump.
    pub clang: String,
    /// Language standard passed as `-std=`.
    pub std: String,
    pub include_paths: Vec<String>,
    pub extra_flags: Vec<String>,
    /// Append the directories listed in the `INCLUDE` environment variable.
    pub use_include_env: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            clang: "clang++".to_string(),
            std: "c++17".to_string(),
            include_paths: Vec::new(),
            extra_flags: Vec::new(),
            use_include_env: true,
        }
    }
}

impl CompilerSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: CompilerSettingsPatch,
    ) {
        if let Some(v) = patch.clang {
            self.clang = v;
        }
        if let Some(v) = patch.std {
            self.std = v;
        }
        if let Some(v) = patch.include_paths {
            self.include_paths = v;
        }
        if let Some(v) = patch.extra_flags {
            self.extra_flags = v;
        }
        if let Some(v) = patch.use_include_env {
            self.use_include_env = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        let defaults = Self::default();
        self.clang = self.clang.trim().to_string();
        if self.clang.is_empty() {
            self.clang = defaults.clang;
        }
        self.std = self.std.trim().trim_start_matches("-std=").to_string();
        if self.std.is_empty() {
            self.std = defaults.std;
        }
        let mut seen = HashSet::new();
        self.include_paths = self
            .include_paths
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .filter(|p| seen.insert(p.clone()))
            .collect();
        self.extra_flags = self.extra_flags.iter().map(|f| f.trim().to_string()).filter(|f| !f.is_empty()).collect();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(crate) struct CompilerSettingsPatch {
    pub(crate) clang: Option<String>,
    pub(crate) std: Option<String>,
    pub(crate) include_paths: Option<Vec<String>>,
    pub(crate) extra_flags: Option<Vec<String>>,
    pub(crate) use_include_env: Option<bool>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
