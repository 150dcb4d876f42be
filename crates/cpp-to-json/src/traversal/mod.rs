//! Multi-file traversal: parse the entry file, validate what it declares,
//! then follow its includes breadth-first.

mod source;

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info};

pub use source::InputSource;
use source::TempSource;

use crate::ast::{AstProvider, ParsedUnit};
use crate::config::{DEFAULT_ALIAS_PASSES, TraversalSettings};
use crate::error::{Error, Result};
use crate::extract::{AliasMap, collect_functions, collect_value_types};
use crate::resolve::{Resolver, TypePolicy, UnsupportedSink, ValueTypeSet};
use crate::schema::Extraction;
use crate::vfs::{is_system_header, normalized_path};

/// Compiles into an include/exclude filter.
pub trait IntoRegex {
    fn into_regex(self) -> Result<Regex>;
}

impl IntoRegex for Regex {
    fn into_regex(self) -> Result<Regex> {
        Ok(self)
    }
}

impl IntoRegex for &Regex {
    fn into_regex(self) -> Result<Regex> {
        Ok(self.clone())
    }
}

impl IntoRegex for &str {
    fn into_regex(self) -> Result<Regex> {
        Ok(Regex::new(self)?)
    }
}

impl IntoRegex for String {
    fn into_regex(self) -> Result<Regex> {
        self.as_str().into_regex()
    }
}

impl IntoRegex for &String {
    fn into_regex(self) -> Result<Regex> {
        self.as_str().into_regex()
    }
}

/// Knobs for one [`obtain_functions`] call.
///
/// Include and exclude patterns match at the start of the canonical
/// include path, so `.*/vendor/.*` rather than `vendor/`.
#[derive(Debug, Clone)]
pub struct ObtainOptions {
    pub traverse_includes: bool,
    pub include_regexes: Vec<Regex>,
    pub exclude_regexes: Vec<Regex>,
    pub skip_system_headers: bool,
    pub max_alias_passes: usize,
}

impl Default for ObtainOptions {
    fn default() -> Self {
        Self {
            traverse_includes: true,
            include_regexes: Vec::new(),
            exclude_regexes: Vec::new(),
            skip_system_headers: false,
            max_alias_passes: DEFAULT_ALIAS_PASSES,
        }
    }
}

impl ObtainOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &TraversalSettings) -> Result<Self> {
        Self {
            traverse_includes: settings.traverse_includes,
            skip_system_headers: settings.skip_system_headers,
            max_alias_passes: settings.max_alias_passes,
            ..Self::default()
        }
        .with_include_regexes(&settings.include_regexes)?
        .with_exclude_regexes(&settings.exclude_regexes)
    }

    pub fn with_traverse_includes(
        mut self,
        traverse: bool,
    ) -> Self {
        self.traverse_includes = traverse;
        self
    }

    pub fn with_skip_system_headers(
        mut self,
        skip: bool,
    ) -> Self {
        self.skip_system_headers = skip;
        self
    }

    pub fn with_include_regexes<I>(
        mut self,
        patterns: I,
    ) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: IntoRegex,
    {
        for pattern in patterns {
            self.include_regexes.push(pattern.into_regex()?);
        }
        Ok(self)
    }

    pub fn with_exclude_regexes<I>(
        mut self,
        patterns: I,
    ) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: IntoRegex,
    {
        for pattern in patterns {
            self.exclude_regexes.push(pattern.into_regex()?);
        }
        Ok(self)
    }

    /// Should an include at `path` be followed?
    fn admits(
        &self,
        path: &Path,
    ) -> bool {
        let text = path.to_string_lossy();
        if self.exclude_regexes.iter().any(|re| matches_at_start(re, &text)) {
            debug!("[traversal] excluded {}", path.display());
            return false;
        }
        if !self.include_regexes.is_empty() && !self.include_regexes.iter().any(|re| matches_at_start(re, &text)) {
            debug!("[traversal] not included {}", path.display());
            return false;
        }
        if self.skip_system_headers && is_system_header(path) {
            debug!("[traversal] skipped system header {}", path.display());
            return false;
        }
        true
    }
}

fn matches_at_start(
    re: &Regex,
    text: &str,
) -> bool {
    re.find(text).is_some_and(|m| m.start() == 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileState {
    Queued,
    Parsing,
    Done,
}

/// Extract every supported function and value type reachable from
/// `source`.
///
/// Items the policy rejects are left out of the result and reported to
/// `on_unsupported`. A parse error in any visited file fails the call.
pub fn obtain_functions(
    source: InputSource,
    options: &ObtainOptions,
    provider: &mut dyn AstProvider,
    policy: &dyn TypePolicy,
    on_unsupported: &mut dyn UnsupportedSink,
) -> Result<Extraction> {
    let temp;
    let (entry, inline_entry) = match source {
        InputSource::Path(path) => (normalized_path(&path), false),
        InputSource::Text(text) => {
            temp = TempSource::create(&text)?;
            (normalized_path(temp.path()), true)
        },
    };

    let mut traversal = Traversal {
        options,
        provider,
        policy,
        sink: on_unsupported,
        queue: VecDeque::new(),
        states: HashMap::new(),
        extraction: Extraction::default(),
        entry: entry.clone(),
        inline_entry,
    };
    traversal.enqueue(entry);
    traversal.run()?;

    let extraction = traversal.extraction;
    info!(
        "[traversal] extracted {} functions and {} value types from {} files",
        extraction.iter().map(|entry| entry.function_list.len()).sum::<usize>(),
        extraction.iter().map(|entry| entry.value_type_list.len()).sum::<usize>(),
        extraction.len()
    );
    Ok(extraction)
}

struct Traversal<'a> {
    options: &'a ObtainOptions,
    provider: &'a mut dyn AstProvider,
    policy: &'a dyn TypePolicy,
    sink: &'a mut dyn UnsupportedSink,
    queue: VecDeque<PathBuf>,
    states: HashMap<PathBuf, FileState>,
    extraction: Extraction,
    entry: PathBuf,
    inline_entry: bool,
}

impl Traversal<'_> {
    fn run(&mut self) -> Result<()> {
        while let Some(file) = self.queue.pop_front() {
            self.states.insert(file.clone(), FileState::Parsing);
            self.process(&file)?;
            self.states.insert(file, FileState::Done);
        }
        Ok(())
    }

    fn enqueue(
        &mut self,
        file: PathBuf,
    ) {
        if let Some(state) = self.states.get(&file) {
            debug!("[traversal] {} already {state:?}", file.display());
            return;
        }
        debug!("[traversal] queued {}", file.display());
        self.states.insert(file.clone(), FileState::Queued);
        self.queue.push_back(file);
    }

    /// Result key for `file`: `None` stands for inline source text.
    fn key_for(
        &self,
        file: &Path,
    ) -> Option<PathBuf> {
        if self.inline_entry && file == self.entry {
            None
        } else {
            Some(file.to_path_buf())
        }
    }

    fn process(
        &mut self,
        file: &Path,
    ) -> Result<()> {
        info!("[traversal] parsing {}", file.display());
        let unit = self.provider.parse(file)?;
        if unit.diagnostics.iter().any(|d| d.is_error()) {
            return Err(Error::Parse {
                file: file.to_path_buf(),
                diagnostics: unit.diagnostics.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"),
            });
        }

        let key = self.key_for(file);
        let includes = direct_includes(&unit, file);
        self.extraction.entry_mut(key.as_deref()).include_list = includes.clone();

        if self.options.traverse_includes {
            for include in &includes {
                let include = normalized_path(include);
                if self.options.admits(&include) {
                    self.enqueue(include);
                }
            }
        }

        self.validate(&unit, file, key.as_deref());
        Ok(())
    }

    fn validate(
        &mut self,
        unit: &ParsedUnit,
        file: &Path,
        key: Option<&Path>,
    ) {
        let tree = &unit.tree;
        let aliases = AliasMap::from_translation_unit(tree, file, self.options.max_alias_passes);
        let scan = collect_value_types(tree, file, &aliases);
        let functions = collect_functions(tree, file, &aliases);
        debug!(
            "[traversal] {}: {} functions, {} value type candidates, {} rejected",
            file.display(),
            functions.len(),
            scan.accepted.len(),
            scan.rejected.len()
        );

        for rejected in &scan.rejected {
            self.sink.unsupported(&rejected.name, key, Some(rejected.line));
        }

        let resolver = Resolver::new(ValueTypeSet::new(&scan.accepted), self.policy);
        for record in scan.accepted.iter().filter(|record| record.file == file) {
            if !resolver.is_valid_value_type(Some(record)) {
                self.sink.unsupported(&record.name, key, Some(record.definition_line));
            }
        }

        for function in functions {
            if resolver.is_valid_function(&function) {
                self.extraction.entry_mut(key).function_list.push(function);
            } else {
                self.sink.unsupported(&function.name, key, function.line());
            }
        }

        for record in resolver.required_value_types() {
            let owner = self.key_for(&record.file);
            if !self.extraction.contains(owner.as_deref()) {
                let includes = direct_includes(unit, &record.file);
                self.extraction.entry_mut(owner.as_deref()).include_list = includes;
            }
            // One record per (name, file). The declaring file's own pass
            // resolves that file's aliases, so its copy wins.
            let entry = self.extraction.entry_mut(owner.as_deref());
            let known =
                entry.value_type_list.iter().position(|known| known.name == record.name && known.file == record.file);
            match known {
                Some(index) if record.file == file => entry.value_type_list[index] = record.clone(),
                Some(_) => {},
                None => entry.value_type_list.push(record.clone()),
            }
        }
    }
}

/// Files `file` itself includes, in inclusion order.
fn direct_includes(
    unit: &ParsedUnit,
    file: &Path,
) -> Vec<PathBuf> {
    let mut includes: Vec<PathBuf> = Vec::new();
    for inclusion in unit.includes.iter().filter(|inclusion| inclusion.includer == file) {
        if !includes.contains(&inclusion.included) {
            includes.push(inclusion.included.clone());
        }
    }
    includes
}

#[cfg(test)]
#[path = "../../tests/src/traversal_tests.rs"]
mod tests;
