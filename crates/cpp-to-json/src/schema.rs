//! Serializable extraction result.
//!
//! Field names are part of the output contract consumed by code
//! generators; keep them stable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A free function whose every parameter and return type was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    pub raw_return_type: String,
    pub simple_return_type: String,
    pub var_names: Vec<String>,
    pub raw_var_types: Vec<String>,
    pub simple_var_types: Vec<String>,
    pub declaration_line: Option<u32>,
    pub definition_line: Option<u32>,
    #[serde(skip)]
    pub file: PathBuf,
}

impl FunctionRecord {
    /// Line reported for the function: its definition, else its declaration.
    pub fn line(&self) -> Option<u32> {
        self.definition_line.or(self.declaration_line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorRecord {
    pub var_names: Vec<String>,
    pub raw_var_types: Vec<String>,
    pub simple_var_types: Vec<String>,
    pub definition_line: u32,
}

/// A move-only aggregate safe to marshal by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueTypeRecord {
    pub name: String,
    pub var_names: Vec<String>,
    pub raw_var_types: Vec<String>,
    pub simple_var_types: Vec<String>,
    pub definition_line: u32,
    pub constructor_list: Vec<ConstructorRecord>,
    pub base_structs: Vec<String>,
    #[serde(skip)]
    pub file: PathBuf,
}

/// Everything extracted for one file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileEntry {
    /// Canonical path, or `None` for source text passed inline.
    pub file: Option<PathBuf>,
    pub function_list: Vec<FunctionRecord>,
    pub value_type_list: Vec<ValueTypeRecord>,
    pub include_list: Vec<PathBuf>,
}

impl FileEntry {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self {
            file,
            ..Self::default()
        }
    }
}

/// Per-file results in attribution order. The first entry is always the
/// entry file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extraction {
    entries: Vec<FileEntry>,
}

impl Extraction {
    pub fn get(
        &self,
        file: Option<&Path>,
    ) -> Option<&FileEntry> {
        self.entries.iter().find(|entry| entry.file.as_deref() == file)
    }

    pub fn contains(
        &self,
        file: Option<&Path>,
    ) -> bool {
        self.get(file).is_some()
    }

    /// Entry for `file`, appended when absent.
    pub(crate) fn entry_mut(
        &mut self,
        file: Option<&Path>,
    ) -> &mut FileEntry {
        let index = match self.entries.iter().position(|entry| entry.file.as_deref() == file) {
            Some(index) => index,
            None => {
                self.entries.push(FileEntry::new(file.map(Path::to_path_buf)));
                self.entries.len() - 1
            },
        };
        &mut self.entries[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> + '_ {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Extraction {
    type Item = FileEntry;
    type IntoIter = std::vec::IntoIter<FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Extraction {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
