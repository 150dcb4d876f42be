use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::ast::{AstTree, NodeKind};
use crate::config::DEFAULT_ALIAS_PASSES;

static ELABORATED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:struct|class)\s").expect("elaborated type pattern is valid"));

/// `typedef` / `using` aliases declared at the top level of one file.
///
/// Resolution is textual: every whole-word occurrence of an alias name is
/// replaced by its target, regardless of the scope the spelling came from.
#[derive(Debug, Clone)]
pub struct AliasMap {
    targets: HashMap<String, String>,
    pattern: Option<Regex>,
    max_passes: usize,
}

impl Default for AliasMap {
    fn default() -> Self {
        Self::empty(DEFAULT_ALIAS_PASSES)
    }
}

impl AliasMap {
    pub fn empty(max_passes: usize) -> Self {
        Self {
            targets: HashMap::new(),
            pattern: None,
            max_passes: max_passes.max(1),
        }
    }

    /// Aliases that are direct children of the translation unit and were
    /// declared in `file`.
    pub fn from_translation_unit(
        tree: &AstTree,
        file: &Path,
        max_passes: usize,
    ) -> Self {
        let aliases = tree.children(tree.root()).iter().map(|&id| tree.node(id)).filter(|node| {
            matches!(node.kind, NodeKind::Typedef | NodeKind::TypeAlias) && node.is_in_file(file) && !node.name.is_empty()
        });

        let mut map = Self::empty(max_passes);
        for alias in aliases {
            let target = alias.type_text.clone().unwrap_or_default();
            // `typedef struct foo foo;` names the type it aliases.
            if ELABORATED_RE.replace_all(&target, "").trim() == alias.name {
                continue;
            }
            map.targets.insert(alias.name.clone(), target);
        }
        map.rebuild_pattern();
        debug!("[alias] {} aliases in {}", map.targets.len(), file.display());
        map
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        target: impl Into<String>,
    ) {
        self.targets.insert(name.into(), target.into());
        self.rebuild_pattern();
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<&str> {
        self.targets.get(name).map(String::as_str)
    }

    /// Substitute aliases until a pass changes nothing, then drop
    /// `struct ` / `class ` keywords.
    pub fn resolve(
        &self,
        text: &str,
    ) -> String {
        let mut resolved = text.to_string();
        if let Some(pattern) = &self.pattern {
            let mut passes = 0;
            while pattern.is_match(&resolved) {
                if passes == self.max_passes {
                    warn!("[alias] gave up resolving `{text}` after {passes} passes");
                    break;
                }
                resolved = pattern
                    .replace_all(&resolved, |caps: &Captures<'_>| self.targets.get(&caps[0]).cloned().unwrap_or_default())
                    .into_owned();
                passes += 1;
            }
        }
        ELABORATED_RE.replace_all(&resolved, "").into_owned()
    }

    fn rebuild_pattern(&mut self) {
        if self.targets.is_empty() {
            self.pattern = None;
            return;
        }
        let mut names: Vec<&str> = self.targets.keys().map(String::as_str).collect();
        names.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternation = names.iter().map(|name| regex::escape(name)).collect::<Vec<_>>().join("|");
        self.pattern = Regex::new(&format!(r"\b(?:{alternation})\b")).ok();
    }
}

#[cfg(test)]
#[path = "../../tests/src/extract/alias_tests.rs"]
mod tests;
