//! Dependency validity: may a function or value type cross the interop
//! boundary, given the policy and the value types of the current unit?

mod policy;

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

pub use policy::{
    AcceptAll, AllowList, IgnoreUnsupported, STANDARD_ACCEPTED, STANDARD_IGNORED, StructVerifier, TypePolicy,
    UnsupportedLog, UnsupportedSink, UnsupportedSymbol,
};

use crate::schema::{FunctionRecord, ValueTypeRecord};

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w']+").expect("word pattern is valid"));

/// Stable identity of a value type: qualified name and declaring file.
pub type TypeKey = (String, PathBuf);

fn key_of(record: &ValueTypeRecord) -> TypeKey {
    (record.name.clone(), record.file.clone())
}

/// Value types discovered in the current translation unit.
#[derive(Debug, Clone, Copy)]
pub struct ValueTypeSet<'a> {
    records: &'a [ValueTypeRecord],
}

impl<'a> ValueTypeSet<'a> {
    pub fn new(records: &'a [ValueTypeRecord]) -> Self {
        Self {
            records,
        }
    }

    /// First record whose qualified name equals `simple_name`.
    pub fn find(
        &self,
        simple_name: &str,
    ) -> Option<&'a ValueTypeRecord> {
        self.records.iter().find(|record| record.name == simple_name)
    }

    pub fn get(
        &self,
        key: &TypeKey,
    ) -> Option<&'a ValueTypeRecord> {
        self.records.iter().find(|record| record.name == key.0 && record.file == key.1)
    }
}

/// Value types accepted so far, in acceptance order, plus those whose
/// validation is under way.
#[derive(Debug, Clone, Default)]
pub struct Visited {
    order: Vec<TypeKey>,
    accepted: HashSet<TypeKey>,
    in_progress: HashSet<TypeKey>,
}

impl Visited {
    pub fn contains(
        &self,
        key: &TypeKey,
    ) -> bool {
        self.accepted.contains(key) || self.in_progress.contains(key)
    }

    pub fn keys(&self) -> &[TypeKey] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn insert(
        &mut self,
        key: TypeKey,
    ) {
        if self.accepted.insert(key.clone()) {
            self.order.push(key);
        }
    }

    /// Forget every acceptance after the first `len`.
    fn truncate(
        &mut self,
        len: usize,
    ) {
        for key in self.order.drain(len.min(self.order.len())..) {
            self.accepted.remove(&key);
        }
    }
}

/// Validity resolution for one translation unit.
pub struct Resolver<'a> {
    types: ValueTypeSet<'a>,
    policy: &'a dyn TypePolicy,
    visited: RefCell<Visited>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        types: ValueTypeSet<'a>,
        policy: &'a dyn TypePolicy,
    ) -> Self {
        Self {
            types,
            policy,
            visited: RefCell::new(Visited::default()),
        }
    }

    /// Every word token of `text` is accepted by the policy.
    pub fn test_and_verify(
        &self,
        text: &str,
    ) -> bool {
        WORD_RE.find_iter(text).all(|token| self.policy.accepts(token.as_str(), self))
    }

    pub fn is_valid_value_type(
        &self,
        record: Option<&ValueTypeRecord>,
    ) -> bool {
        let Some(record) = record else {
            return false;
        };
        let key = key_of(record);
        if self.visited.borrow().contains(&key) {
            return true;
        }

        // Records accepted below this point may lean on `record` being
        // valid while it is still in progress.
        let checkpoint = {
            let mut visited = self.visited.borrow_mut();
            visited.in_progress.insert(key.clone());
            visited.len()
        };
        let valid = record.simple_var_types.iter().all(|ty| self.member_type_is_valid(ty, record))
            && record
                .constructor_list
                .iter()
                .flat_map(|constructor| constructor.simple_var_types.iter())
                .all(|ty| self.member_type_is_valid(ty, record));

        let mut visited = self.visited.borrow_mut();
        visited.in_progress.remove(&key);
        if valid {
            trace!("[resolve] accepted value type {}", record.name);
            visited.insert(key);
        } else {
            visited.truncate(checkpoint);
        }
        valid
    }

    pub fn is_valid_function(
        &self,
        function: &FunctionRecord,
    ) -> bool {
        function
            .simple_var_types
            .iter()
            .chain(std::iter::once(&function.simple_return_type))
            .all(|ty| self.test_and_verify(ty) || self.is_valid_value_type(self.types.find(ty)))
    }

    fn member_type_is_valid(
        &self,
        ty: &str,
        owner: &ValueTypeRecord,
    ) -> bool {
        if self.test_and_verify(ty) {
            return true;
        }
        match self.types.find(ty) {
            Some(found) if key_of(found) == key_of(owner) => true,
            found => self.is_valid_value_type(found),
        }
    }

    /// Accepted value types in acceptance order, dependencies first.
    pub fn required_value_types(&self) -> Vec<&'a ValueTypeRecord> {
        self.visited.borrow().keys().iter().filter_map(|key| self.types.get(key)).collect()
    }

    pub fn into_visited(self) -> Visited {
        self.visited.into_inner()
    }
}

impl StructVerifier for Resolver<'_> {
    fn verify(
        &self,
        token: &str,
    ) -> bool {
        self.is_valid_value_type(self.types.find(token))
    }
}

#[cfg(test)]
#[path = "../../tests/src/resolve/resolver_tests.rs"]
mod tests;
