use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ast::{AstNode, AstTree, NodeId, NodeKind, SpecialMember};
use crate::extract::alias::AliasMap;
use crate::extract::qualified_name::full_name;
use crate::extract::type_text::simplify;
use crate::schema::{ConstructorRecord, ValueTypeRecord};

/// Structural verdict for one struct/class declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Accepted(ValueTypeRecord),
    /// Has members, but at least one of them rules the type out.
    Invalid,
    /// No members at all: a forward declaration.
    NotADefinition,
}

/// A struct/class declared in the processed file that failed the
/// structural checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedValueType {
    pub name: String,
    pub file: PathBuf,
    pub line: u32,
}

/// Value types found in one translation unit.
#[derive(Debug, Clone, Default)]
pub struct ValueTypeScan {
    /// Structurally acceptable records from every file of the unit.
    pub accepted: Vec<ValueTypeRecord>,
    /// Structural failures declared in the processed file.
    pub rejected: Vec<RejectedValueType>,
}

/// Judge a struct/class by its direct members.
pub fn evaluate(
    tree: &AstTree,
    id: NodeId,
    aliases: &AliasMap,
) -> Evaluation {
    let node = tree.node(id);
    let children = tree.children(id);
    if children.is_empty() {
        return Evaluation::NotADefinition;
    }

    let mut record = ValueTypeRecord {
        name: full_name(tree, id),
        var_names: Vec::new(),
        raw_var_types: Vec::new(),
        simple_var_types: Vec::new(),
        definition_line: node.line,
        constructor_list: Vec::new(),
        base_structs: Vec::new(),
        file: node.file.clone().unwrap_or_default(),
    };
    let move_assignment_type = format!("{} &&", aliases.resolve(&node.name));
    let mut valid = true;
    let mut has_move = false;

    for &child_id in children {
        let child = tree.node(child_id);
        match &child.kind {
            NodeKind::Constructor => {
                if child.is_deleted {
                    continue;
                }
                let mut constructor = constructor_record(tree, child_id, aliases);
                match child.special_member {
                    Some(SpecialMember::Move) if child.is_public() => {
                        has_move = true;
                        if child.is_defaulted
                            && let [name] = constructor.var_names.as_mut_slice()
                            && name.is_empty()
                        {
                            *name = "other".to_string();
                        }
                    },
                    Some(SpecialMember::Copy) if child.is_public() => valid = false,
                    _ => {},
                }
                record.constructor_list.push(constructor);
            },
            NodeKind::Field => {
                let raw = aliases.resolve(child.type_text.as_deref().unwrap_or_default());
                record.var_names.push(child.name.clone());
                record.simple_var_types.push(simplify(&raw));
                record.raw_var_types.push(raw);
                if !child.is_public() {
                    valid = false;
                }
            },
            NodeKind::Method => {
                if child.is_deleted {
                    continue;
                }
                if !is_move_assignment(tree, child_id, child, aliases, &move_assignment_type) {
                    valid = false;
                }
            },
            NodeKind::BaseSpecifier => {
                record.base_structs.push(aliases.resolve(child.type_text.as_deref().unwrap_or(&child.name)));
            },
            NodeKind::Enum | NodeKind::AccessSpecifier => {},
            _ => valid = false,
        }
    }

    if valid && has_move {
        Evaluation::Accepted(record)
    } else {
        debug!("[value-type] {} is not a value type (move constructor: {has_move})", record.name);
        Evaluation::Invalid
    }
}

fn constructor_record(
    tree: &AstTree,
    id: NodeId,
    aliases: &AliasMap,
) -> ConstructorRecord {
    let mut constructor = ConstructorRecord {
        var_names: Vec::new(),
        raw_var_types: Vec::new(),
        simple_var_types: Vec::new(),
        definition_line: tree.node(id).line,
    };
    for param in tree.parameters(id) {
        let raw = aliases.resolve(param.type_text.as_deref().unwrap_or_default());
        constructor.var_names.push(param.name.clone());
        constructor.simple_var_types.push(simplify(&raw));
        constructor.raw_var_types.push(raw);
    }
    constructor
}

fn is_move_assignment(
    tree: &AstTree,
    id: NodeId,
    method: &AstNode,
    aliases: &AliasMap,
    move_type: &str,
) -> bool {
    method.name == "operator="
        && method.is_public()
        && tree.parameters(id).all(|param| aliases.resolve(param.type_text.as_deref().unwrap_or_default()) == move_type)
}

/// Evaluate every struct/class at namespace scope in the unit.
///
/// Records from included headers are kept so the processed file's
/// functions can refer to them; structural failures are only reported for
/// `file` itself.
pub fn collect_value_types(
    tree: &AstTree,
    file: &Path,
    aliases: &AliasMap,
) -> ValueTypeScan {
    let mut scan = ValueTypeScan::default();
    visit_scope(tree, tree.root(), file, aliases, &mut scan);
    scan
}

fn visit_scope(
    tree: &AstTree,
    scope: NodeId,
    file: &Path,
    aliases: &AliasMap,
    scan: &mut ValueTypeScan,
) {
    for &id in tree.children(scope) {
        let node = tree.node(id);
        if node.kind == NodeKind::Namespace {
            visit_scope(tree, id, file, aliases, scan);
            continue;
        }
        if !node.kind.is_record() {
            continue;
        }
        match evaluate(tree, id, aliases) {
            Evaluation::Accepted(record) => scan.accepted.push(record),
            Evaluation::Invalid if node.is_in_file(file) => scan.rejected.push(RejectedValueType {
                name: full_name(tree, id),
                file: file.to_path_buf(),
                line: node.line,
            }),
            Evaluation::Invalid | Evaluation::NotADefinition => {},
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/extract/value_type_tests.rs"]
mod tests;
