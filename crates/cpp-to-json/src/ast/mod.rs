//! Provider-neutral view of a parsed translation unit.
//!
//! Extraction never touches Clang's JSON directly. An [`AstProvider`] turns a
//! file into a [`ParsedUnit`]: an arena of [`AstNode`]s carrying exactly the
//! facts the extractor needs (kind, spelling, location, declared type text,
//! access, special-member classification and `= delete` / `= default`
//! markers), plus the unit's inclusion edges and diagnostics.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    TranslationUnit,
    Namespace,
    Struct,
    Class,
    Field,
    Constructor,
    Method,
    Function,
    Parameter,
    Typedef,
    TypeAlias,
    Enum,
    AccessSpecifier,
    BaseSpecifier,
    /// Any other declaration kind, labelled with the provider's kind name.
    Other(String),
}

impl NodeKind {
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Struct | Self::Class)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    pub fn from_spelling(spelling: &str) -> Option<Self> {
        match spelling {
            "public" => Some(Self::Public),
            "protected" => Some(Self::Protected),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

/// Copy/move classification of a constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialMember {
    Copy,
    Move,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: NodeKind,
    /// Unqualified spelling; empty for anonymous declarations and unnamed
    /// parameters.
    pub name: String,
    pub file: Option<PathBuf>,
    /// 1-based line of the declaration's name.
    pub line: u32,
    /// Declared type text: field/parameter type, alias target, function
    /// return type or base type.
    pub type_text: Option<String>,
    pub access: Option<Access>,
    pub special_member: Option<SpecialMember>,
    pub is_deleted: bool,
    pub is_defaulted: bool,
    /// Function-like declaration carrying a body.
    pub has_body: bool,
    parent: Option<NodeId>,
    semantic_parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl AstNode {
    pub fn new(
        kind: NodeKind,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            file: None,
            line: 0,
            type_text: None,
            access: None,
            special_member: None,
            is_deleted: false,
            is_defaulted: false,
            has_body: false,
            parent: None,
            semantic_parent: None,
            children: Vec::new(),
        }
    }

    pub fn at(
        mut self,
        file: impl Into<PathBuf>,
        line: u32,
    ) -> Self {
        self.file = Some(file.into());
        self.line = line;
        self
    }

    pub fn with_type(
        mut self,
        type_text: impl Into<String>,
    ) -> Self {
        self.type_text = Some(type_text.into());
        self
    }

    pub fn with_access(
        mut self,
        access: Access,
    ) -> Self {
        self.access = Some(access);
        self
    }

    pub fn with_special_member(
        mut self,
        special_member: SpecialMember,
    ) -> Self {
        self.special_member = Some(special_member);
        self
    }

    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    pub fn defaulted(mut self) -> Self {
        self.is_defaulted = true;
        self
    }

    pub fn with_body(mut self) -> Self {
        self.has_body = true;
        self
    }

    pub fn is_in_file(
        &self,
        file: &Path,
    ) -> bool {
        self.file.as_deref() == Some(file)
    }

    pub fn is_public(&self) -> bool {
        self.access == Some(Access::Public)
    }
}

/// Arena holding every node of one translation unit. The root is always a
/// [`NodeKind::TranslationUnit`] node.
#[derive(Debug, Clone)]
pub struct AstTree {
    nodes: Vec<AstNode>,
}

impl Default for AstTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AstTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![AstNode::new(NodeKind::TranslationUnit, "")],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append `node` as the last child of `parent`.
    pub fn push(
        &mut self,
        parent: NodeId,
        mut node: AstNode,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(
        &self,
        id: NodeId,
    ) -> &AstNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(
        &mut self,
        id: NodeId,
    ) -> &mut AstNode {
        &mut self.nodes[id.0]
    }

    pub fn children(
        &self,
        id: NodeId,
    ) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Direct children of kind [`NodeKind::Parameter`], in declaration order.
    pub fn parameters(
        &self,
        id: NodeId,
    ) -> impl Iterator<Item = &AstNode> + '_ {
        self.children(id).iter().map(|&child| self.node(child)).filter(|child| child.kind == NodeKind::Parameter)
    }

    /// Declaration context of `id`: an explicitly recorded context (an
    /// out-of-line definition's enclosing namespace) or the lexical parent.
    pub fn semantic_parent(
        &self,
        id: NodeId,
    ) -> Option<NodeId> {
        let node = &self.nodes[id.0];
        node.semantic_parent.or(node.parent)
    }

    pub fn set_semantic_parent(
        &mut self,
        id: NodeId,
        parent: NodeId,
    ) {
        self.nodes[id.0].semantic_parent = Some(parent);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

/// One inclusion edge of a translation unit: `includer` has an `#include`
/// that resolved to `included`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inclusion {
    pub includer: PathBuf,
    pub included: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Error,
    Warning,
    Note,
}

impl Severity {
    pub fn from_spelling(spelling: &str) -> Self {
        match spelling {
            "fatal error" => Self::Fatal,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Note,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fatal => "fatal error",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: Option<String>,
    pub line: u32,
    pub column: u32,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Fatal | Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{file}:{}:{}: {}: {}", self.line, self.column, self.severity.as_str(), self.message),
            None => write!(f, "{}: {}", self.severity.as_str(), self.message),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedUnit {
    pub tree: AstTree,
    pub includes: Vec<Inclusion>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses a single file into a [`ParsedUnit`].
///
/// The call is blocking. Diagnostics are returned, not raised: deciding that
/// a unit is unusable is the traversal's job.
pub trait AstProvider {
    fn parse(
        &mut self,
        file: &Path,
    ) -> Result<ParsedUnit>;
}

#[cfg(test)]
#[path = "../../tests/src/ast_tests.rs"]
mod tests;
