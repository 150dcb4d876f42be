use clang_ast::{BareSourceLocation, Id, SourceLocation, SourceRange};
use serde::Deserialize;

pub type Node = clang_ast::Node<Clang>;

/// Typed representation of the Clang AST node kinds the converter reads.
///
/// Each variant corresponds to a Clang AST node `"kind"` value.
/// The `Other` fallback keeps the kind name and skips everything else.
#[derive(Deserialize)]
pub enum Clang {
    // --- Scopes ---
    NamespaceDecl(DeclData),
    CXXRecordDecl(DeclData),

    // --- Members ---
    FieldDecl(DeclData),
    CXXConstructorDecl(DeclData),
    CXXMethodDecl(DeclData),
    AccessSpecDecl(DeclData),
    EnumDecl(DeclData),

    // --- Functions ---
    FunctionDecl(DeclData),
    ParmVarDecl(DeclData),
    // Only its presence is read; the payload keeps body locations flowing
    // through clang-ast's file tracking.
    CompoundStmt(#[allow(dead_code)] StmtData),

    // --- Aliases ---
    TypedefDecl(DeclData),
    TypeAliasDecl(DeclData),

    // --- Catch-all ---
    // The `loc` and `range` fields MUST be deserialized even for unrecognized
    // node kinds. The `clang-ast` crate tracks "current file" state across the
    // deserialization stream via `SourceLocation`; if we skip locations for
    // nodes that set the file path, all subsequent nodes inherit the wrong
    // file.
    Other {
        kind: clang_ast::Kind,
        #[serde(default)]
        loc: Option<SourceLocation>,
        #[allow(dead_code)]
        #[serde(default)]
        range: Option<SourceRange>,
    },
}

/// Common data for all declaration nodes.
///
/// Only a handful of attributes apply to any given kind; the rest stay
/// `None`.
#[derive(Deserialize, Debug)]
pub struct DeclData {
    pub name: Option<String>,
    pub loc: Option<SourceLocation>,
    /// Never read, but deserialized so clang-ast sees every location.
    #[allow(dead_code)]
    pub range: Option<SourceRange>,
    #[serde(rename = "isImplicit")]
    pub is_implicit: Option<bool>,
    #[serde(rename = "type")]
    pub ty: Option<QualType>,
    /// Set on out-of-line definitions whose declaration context differs from
    /// the lexical one.
    #[serde(rename = "parentDeclContextId")]
    pub parent_decl_context_id: Option<Id>,
    /// `AccessSpecDecl` only.
    pub access: Option<String>,
    /// `CXXRecordDecl` only: `struct`, `class` or `union`.
    #[serde(rename = "tagUsed")]
    pub tag_used: Option<String>,
    #[serde(default)]
    pub bases: Vec<BaseSpecifier>,
    #[serde(rename = "explicitlyDeleted")]
    pub explicitly_deleted: Option<bool>,
    /// `"default"` for `= default`.
    #[serde(rename = "explicitlyDefaulted")]
    pub explicitly_defaulted: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct StmtData {
    #[allow(dead_code)]
    pub range: Option<SourceRange>,
}

#[derive(Deserialize, Debug)]
pub struct BaseSpecifier {
    pub access: Option<String>,
    #[serde(rename = "type")]
    pub ty: Option<QualType>,
}

/// Clang's qualified type representation.
#[derive(Deserialize, Debug)]
pub struct QualType {
    #[serde(rename = "qualType")]
    pub qual_type: Option<String>,
}

impl DeclData {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
    pub fn is_implicit(&self) -> bool {
        self.is_implicit.unwrap_or(false)
    }
    pub fn is_deleted(&self) -> bool {
        self.explicitly_deleted.unwrap_or(false)
    }
    pub fn is_defaulted(&self) -> bool {
        self.explicitly_defaulted.as_deref() == Some("default")
    }
    pub fn qual_type(&self) -> Option<&str> {
        self.ty.as_ref().and_then(|t| t.qual_type.as_deref())
    }
    pub fn is_union(&self) -> bool {
        self.tag_used.as_deref() == Some("union")
    }
}

impl BaseSpecifier {
    pub fn qual_type(&self) -> Option<&str> {
        self.ty.as_ref().and_then(|t| t.qual_type.as_deref())
    }
}

/// Extract the best concrete source location from a [`SourceLocation`].
///
/// Prefers the expansion location (where a macro was invoked) over the
/// spelling location inside the macro definition.
pub fn resolve_loc(loc: &SourceLocation) -> Option<&BareSourceLocation> {
    loc.expansion_loc.as_ref().or(loc.spelling_loc.as_ref())
}
