use std::collections::{HashMap, HashSet};

use serde::Deserialize;

pub const MIN_ALIAS_PASSES: usize = 1;
pub const MAX_ALIAS_PASSES: usize = 4096;
pub const DEFAULT_ALIAS_PASSES: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct TraversalSettings {
    pub traverse_includes: bool,
    /// When non-empty, an include is followed only if one of these matches.
    pub include_regexes: Vec<String>,
    pub exclude_regexes: Vec<String>,
    pub skip_system_headers: bool,
    /// Upper bound on alias substitution passes per type spelling.
    pub max_alias_passes: usize,
}

impl Default for TraversalSettings {
    fn default() -> Self {
        Self {
            traverse_includes: true,
            include_regexes: Vec::new(),
            exclude_regexes: Vec::new(),
            skip_system_headers: true,
            max_alias_passes: DEFAULT_ALIAS_PASSES,
        }
    }
}

impl TraversalSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: TraversalSettingsPatch,
    ) {
        if let Some(v) = patch.traverse_includes {
            self.traverse_includes = v;
        }
        if let Some(v) = patch.include_regexes {
            self.include_regexes = v;
        }
        if let Some(v) = patch.exclude_regexes {
            self.exclude_regexes = v;
        }
        if let Some(v) = patch.skip_system_headers {
            self.skip_system_headers = v;
        }
        if let Some(v) = patch.max_alias_passes {
            self.max_alias_passes = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.max_alias_passes = self.max_alias_passes.clamp(MIN_ALIAS_PASSES, MAX_ALIAS_PASSES);
        self.include_regexes = dedupe_patterns(&self.include_regexes);
        self.exclude_regexes = dedupe_patterns(&self.exclude_regexes);
    }
}

fn dedupe_patterns(patterns: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    patterns
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(crate) struct TraversalSettingsPatch {
    pub(crate) traverse_includes: Option<bool>,
    pub(crate) include_regexes: Option<Vec<String>>,
    pub(crate) exclude_regexes: Option<Vec<String>>,
    pub(crate) skip_system_headers: Option<bool>,
    pub(crate) max_alias_passes: Option<usize>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
