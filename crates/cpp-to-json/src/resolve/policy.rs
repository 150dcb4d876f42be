use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Answers whether a type token names a value type that validates.
///
/// Handed to [`TypePolicy::accepts`] so a policy can fall back to the
/// value types discovered in the current translation unit.
pub trait StructVerifier {
    fn verify(
        &self,
        token: &str,
    ) -> bool;
}

/// Decides whether a bare type token (`int`, `vector`, `std`, ...) may
/// appear in an extracted signature.
pub trait TypePolicy {
    fn accepts(
        &self,
        token: &str,
        verifier: &dyn StructVerifier,
    ) -> bool;
}

impl<F> TypePolicy for F
where
    F: Fn(&str, &dyn StructVerifier) -> bool,
{
    fn accepts(
        &self,
        token: &str,
        verifier: &dyn StructVerifier,
    ) -> bool {
        self(token, verifier)
    }
}

/// Accepts every token.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl TypePolicy for AcceptAll {
    fn accepts(
        &self,
        _token: &str,
        _verifier: &dyn StructVerifier,
    ) -> bool {
        true
    }
}

pub const STANDARD_ACCEPTED: &[&str] = &[
    "double", "int32_t", "int64_t", "uint32_t", "uint64_t", "int", "bool", "float", "char", "vector", "map", "pair",
    "tuple", "string", "void",
];

pub const STANDARD_IGNORED: &[&str] = &["const", "signed", "unsigned", "std"];

/// Accepts listed tokens, tolerates ignored ones, and otherwise asks the
/// [`StructVerifier`].
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    accepted: HashSet<String>,
    ignored: HashSet<String>,
}

impl AllowList {
    pub fn new<A, I>(
        accepted: A,
        ignored: I,
    ) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            accepted: accepted.into_iter().map(Into::into).collect(),
            ignored: ignored.into_iter().map(Into::into).collect(),
        }
    }

    /// Primitive and standard-library tokens that marshal as-is.
    pub fn standard() -> Self {
        Self::new(STANDARD_ACCEPTED.iter().copied(), STANDARD_IGNORED.iter().copied())
    }

    pub fn accept(
        mut self,
        token: impl Into<String>,
    ) -> Self {
        self.accepted.insert(token.into());
        self
    }

    pub fn ignore(
        mut self,
        token: impl Into<String>,
    ) -> Self {
        self.ignored.insert(token.into());
        self
    }
}

impl TypePolicy for AllowList {
    fn accepts(
        &self,
        token: &str,
        verifier: &dyn StructVerifier,
    ) -> bool {
        self.accepted.contains(token) || self.ignored.contains(token) || verifier.verify(token)
    }
}

/// Receives every function or value type left out of the result.
pub trait UnsupportedSink {
    fn unsupported(
        &mut self,
        name: &str,
        file: Option<&Path>,
        line: Option<u32>,
    );
}

impl<F> UnsupportedSink for F
where
    F: FnMut(&str, Option<&Path>, Option<u32>),
{
    fn unsupported(
        &mut self,
        name: &str,
        file: Option<&Path>,
        line: Option<u32>,
    ) {
        self(name, file, line)
    }
}

/// Drops every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreUnsupported;

impl UnsupportedSink for IgnoreUnsupported {
    fn unsupported(
        &mut self,
        _name: &str,
        _file: Option<&Path>,
        _line: Option<u32>,
    ) {
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedSymbol {
    pub name: String,
    /// `None` for source text passed inline.
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
}

/// Collects reports in arrival order.
#[derive(Debug, Clone, Default)]
pub struct UnsupportedLog {
    pub symbols: Vec<UnsupportedSymbol>,
}

impl UnsupportedLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.symbols.iter().map(|symbol| symbol.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl UnsupportedSink for UnsupportedLog {
    fn unsupported(
        &mut self,
        name: &str,
        file: Option<&Path>,
        line: Option<u32>,
    ) {
        self.symbols.push(UnsupportedSymbol {
            name: name.to_string(),
            file: file.map(Path::to_path_buf),
            line,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/src/resolve/policy_tests.rs"]
mod tests;
