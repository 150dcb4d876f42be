use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clang_ast::SourceLocation;
use tracing::debug;

use crate::ast::{Access, AstNode, AstTree, NodeId, NodeKind, SpecialMember};
use crate::clang::clang_nodes::{Clang, DeclData, Node, resolve_loc};
use crate::vfs::normalized_path;

/// Converts a deserialized Clang AST into an [`AstTree`].
///
/// Only the shapes the extractor reads are kept: namespaces, records and
/// their direct members, free functions with their parameters, and
/// top-level aliases. Implicit declarations (injected class names,
/// compiler-declared special members, builtin typedefs) are dropped.
pub(crate) struct Converter {
    tree: AstTree,
    /// Clang node id → converted scope, for `parentDeclContextId` lookups.
    scopes: HashMap<String, NodeId>,
    files: HashMap<Arc<str>, PathBuf>,
}

impl Converter {
    pub(crate) fn new() -> Self {
        Self {
            tree: AstTree::new(),
            scopes: HashMap::new(),
            files: HashMap::new(),
        }
    }

    pub(crate) fn convert(
        mut self,
        root: &Node,
    ) -> AstTree {
        let tree_root = self.tree.root();
        for child in &root.inner {
            self.convert_scope_member(child, tree_root);
        }
        debug!("[convert] built AST tree with {} nodes", self.tree.len());
        self.tree
    }

    /// Children of the translation unit or of a namespace.
    fn convert_scope_member(
        &mut self,
        node: &Node,
        parent: NodeId,
    ) {
        match &node.kind {
            Clang::NamespaceDecl(d) => {
                let id = self.push_decl(node, d, NodeKind::Namespace, parent);
                for child in &node.inner {
                    self.convert_scope_member(child, id);
                }
            },
            Clang::CXXRecordDecl(d) if !d.is_implicit() && !d.is_union() => {
                self.convert_record(node, d, parent);
            },
            Clang::FunctionDecl(d) if !d.is_implicit() => {
                let id = self.push_function(node, d, NodeKind::Function, parent);
                if let Some(context) = self.declaration_context(d) {
                    self.tree.set_semantic_parent(id, context);
                }
            },
            Clang::TypedefDecl(d) if !d.is_implicit() => {
                self.push_decl(node, d, NodeKind::Typedef, parent);
            },
            Clang::TypeAliasDecl(d) if !d.is_implicit() => {
                self.push_decl(node, d, NodeKind::TypeAlias, parent);
            },
            Clang::CXXConstructorDecl(d) if !d.is_implicit() => {
                self.push_function(node, d, NodeKind::Constructor, parent);
            },
            Clang::CXXMethodDecl(d) if !d.is_implicit() => {
                self.push_function(node, d, NodeKind::Method, parent);
            },
            Clang::EnumDecl(d) if !d.is_implicit() => {
                self.push_decl(node, d, NodeKind::Enum, parent);
            },
            _ => {},
        }
    }

    fn convert_record(
        &mut self,
        node: &Node,
        data: &DeclData,
        parent: NodeId,
    ) -> NodeId {
        let is_class = data.tag_used.as_deref() == Some("class");
        let kind = if is_class {
            NodeKind::Class
        } else {
            NodeKind::Struct
        };
        let id = self.push_decl(node, data, kind, parent);
        if let Some(context) = self.declaration_context(data) {
            self.tree.set_semantic_parent(id, context);
        }

        let record_name = data.name().to_owned();
        let file = self.tree.node(id).file.clone();
        let line = self.tree.node(id).line;

        for base in &data.bases {
            let mut base_node = AstNode::new(NodeKind::BaseSpecifier, base.qual_type().unwrap_or_default());
            base_node.file = file.clone();
            base_node.line = line;
            base_node.type_text = base.qual_type().map(str::to_owned);
            base_node.access = base.access.as_deref().and_then(Access::from_spelling);
            self.tree.push(id, base_node);
        }

        let mut access = if is_class {
            Access::Private
        } else {
            Access::Public
        };

        for child in &node.inner {
            let member = match &child.kind {
                Clang::AccessSpecDecl(d) => {
                    if let Some(spec) = d.access.as_deref().and_then(Access::from_spelling) {
                        access = spec;
                    }
                    Some(self.push_decl(child, d, NodeKind::AccessSpecifier, id))
                },
                Clang::FieldDecl(d) if !d.is_implicit() => Some(self.push_decl(child, d, NodeKind::Field, id)),
                Clang::CXXConstructorDecl(d) if !d.is_implicit() => {
                    let ctor = self.push_function(child, d, NodeKind::Constructor, id);
                    let params: Vec<&str> =
                        self.tree.parameters(ctor).map(|p| p.type_text.as_deref().unwrap_or_default()).collect();
                    if let Some(special) = classify_constructor(&record_name, &params) {
                        self.tree.node_mut(ctor).special_member = Some(special);
                    }
                    Some(ctor)
                },
                Clang::CXXMethodDecl(d) if !d.is_implicit() => Some(self.push_function(child, d, NodeKind::Method, id)),
                Clang::EnumDecl(d) if !d.is_implicit() => Some(self.push_decl(child, d, NodeKind::Enum, id)),
                Clang::CXXRecordDecl(d) if d.is_union() => Some(self.push_other("union", d.loc.as_ref(), id)),
                Clang::CXXRecordDecl(d) if !d.is_implicit() => Some(self.convert_record(child, d, id)),
                Clang::TypedefDecl(d) if !d.is_implicit() => Some(self.push_decl(child, d, NodeKind::Typedef, id)),
                Clang::TypeAliasDecl(d) if !d.is_implicit() => Some(self.push_decl(child, d, NodeKind::TypeAlias, id)),
                Clang::FunctionDecl(d) if !d.is_implicit() => {
                    Some(self.push_function(child, d, NodeKind::Function, id))
                },
                Clang::NamespaceDecl(_)
                | Clang::ParmVarDecl(_)
                | Clang::CompoundStmt(_)
                | Clang::FieldDecl(_)
                | Clang::CXXConstructorDecl(_)
                | Clang::CXXMethodDecl(_)
                | Clang::EnumDecl(_)
                | Clang::CXXRecordDecl(_)
                | Clang::TypedefDecl(_)
                | Clang::TypeAliasDecl(_)
                | Clang::FunctionDecl(_) => None,
                Clang::Other {
                    kind,
                    loc,
                    ..
                } => {
                    let kind = format!("{kind:?}");
                    // Doc comments hang off declarations as `FullComment` nodes.
                    if kind.ends_with("Comment") {
                        None
                    } else {
                        Some(self.push_other(&kind, loc.as_ref(), id))
                    }
                },
            };

            if let Some(member) = member
                && self.tree.node(member).kind != NodeKind::AccessSpecifier
            {
                self.tree.node_mut(member).access = Some(access);
            }
        }

        id
    }

    fn push_function(
        &mut self,
        node: &Node,
        data: &DeclData,
        kind: NodeKind,
        parent: NodeId,
    ) -> NodeId {
        let mut function = self.decl_node(data, kind);
        function.type_text = data.qual_type().map(return_type);
        function.is_deleted = data.is_deleted();
        function.is_defaulted = data.is_defaulted();
        function.has_body = node.inner.iter().any(|child| matches!(child.kind, Clang::CompoundStmt(_)));
        let id = self.tree.push(parent, function);

        for child in &node.inner {
            if let Clang::ParmVarDecl(d) = &child.kind {
                self.push_decl(child, d, NodeKind::Parameter, id);
            }
        }
        id
    }

    fn push_decl(
        &mut self,
        node: &Node,
        data: &DeclData,
        kind: NodeKind,
        parent: NodeId,
    ) -> NodeId {
        let is_scope = matches!(kind, NodeKind::Namespace | NodeKind::Struct | NodeKind::Class);
        let decl = self.decl_node(data, kind);
        let id = self.tree.push(parent, decl);
        if is_scope {
            self.scopes.insert(node.id.to_string(), id);
        }
        id
    }

    fn push_other(
        &mut self,
        kind: &str,
        loc: Option<&SourceLocation>,
        parent: NodeId,
    ) -> NodeId {
        let mut other = AstNode::new(NodeKind::Other(kind.to_owned()), "");
        if let Some((file, line)) = loc.and_then(|loc| self.location(loc)) {
            other.file = Some(file);
            other.line = line;
        }
        self.tree.push(parent, other)
    }

    fn decl_node(
        &mut self,
        data: &DeclData,
        kind: NodeKind,
    ) -> AstNode {
        let mut decl = AstNode::new(kind, data.name());
        if let Some((file, line)) = data.loc.as_ref().and_then(|loc| self.location(loc)) {
            decl.file = Some(file);
            decl.line = line;
        }
        decl.type_text = data.qual_type().map(str::to_owned);
        decl
    }

    fn declaration_context(
        &self,
        data: &DeclData,
    ) -> Option<NodeId> {
        let id = data.parent_decl_context_id.as_ref()?;
        self.scopes.get(&id.to_string()).copied()
    }

    fn location(
        &mut self,
        loc: &SourceLocation,
    ) -> Option<(PathBuf, u32)> {
        let bare = resolve_loc(loc)?;
        if bare.file.is_empty() || bare.line == 0 {
            return None;
        }
        let file = self
            .files
            .entry(Arc::clone(&bare.file))
            .or_insert_with(|| normalized_path(std::path::Path::new(&*bare.file)))
            .clone();
        Some((file, bare.line as u32))
    }
}

/// Return type of a function `qualType` such as `int (int, float)`,
/// `vector<int> (const map<int, int> &) noexcept` or the trailing form
/// `auto (int) -> int`.
pub(crate) fn return_type(function_type: &str) -> String {
    let mut depth = 0usize;
    let mut params_start = None;
    for (i, ch) in function_type.char_indices() {
        match ch {
            '<' | '[' => depth += 1,
            '>' | ']' => depth = depth.saturating_sub(1),
            '(' if depth == 0 => {
                params_start = Some(i);
                break;
            },
            _ => {},
        }
    }

    let Some(start) = params_start else {
        return function_type.trim().to_owned();
    };

    let head = function_type[..start].trim();
    if head == "auto"
        && let Some((_, trailing)) = function_type[start..].rsplit_once("->")
    {
        return trailing.trim().to_owned();
    }
    head.to_owned()
}

/// Classify a constructor of `record_name` from its parameter types:
/// a single `T &&` is a move constructor, a single `T &` / `const T &` a
/// copy constructor.
pub(crate) fn classify_constructor(
    record_name: &str,
    param_types: &[&str],
) -> Option<SpecialMember> {
    let [param] = param_types else {
        return None;
    };
    let text = param.trim();
    let (base, special) = if let Some(base) = text.strip_suffix("&&") {
        (base, SpecialMember::Move)
    } else if let Some(base) = text.strip_suffix('&') {
        (base, SpecialMember::Copy)
    } else {
        return None;
    };

    let base: Vec<&str> = base
        .split_whitespace()
        .filter(|word| !matches!(*word, "const" | "volatile" | "struct" | "class"))
        .collect();
    let [type_name] = base.as_slice() else {
        return None;
    };
    let unqualified = type_name.rsplit("::").next().unwrap_or(type_name);
    (!record_name.is_empty() && unqualified == record_name).then_some(special)
}

#[cfg(test)]
#[path = "../../tests/src/clang/convert_tests.rs"]
mod tests;
