use std::collections::HashMap;
use std::path::Path;

use crate::ast::{AstTree, NodeId, NodeKind};
use crate::extract::alias::AliasMap;
use crate::extract::qualified_name::full_name;
use crate::extract::type_text::simplify;
use crate::schema::FunctionRecord;

/// Everything that makes two sightings the same function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FunctionSignature {
    name: String,
    raw_return_type: String,
    simple_return_type: String,
    var_names: Vec<String>,
    raw_var_types: Vec<String>,
    simple_var_types: Vec<String>,
}

impl FunctionSignature {
    fn into_record(
        self,
        file: &Path,
    ) -> FunctionRecord {
        FunctionRecord {
            name: self.name,
            raw_return_type: self.raw_return_type,
            simple_return_type: self.simple_return_type,
            var_names: self.var_names,
            raw_var_types: self.raw_var_types,
            simple_var_types: self.simple_var_types,
            declaration_line: None,
            definition_line: None,
            file: file.to_path_buf(),
        }
    }
}

/// Free functions declared in `file`, in first-sighting order.
///
/// A declaration and a later definition of the same signature collapse
/// into one record carrying both lines. Namespaces are searched; record
/// members and constructors are not.
pub fn collect_functions(
    tree: &AstTree,
    file: &Path,
    aliases: &AliasMap,
) -> Vec<FunctionRecord> {
    let mut collector = Collector {
        tree,
        file,
        aliases,
        records: Vec::new(),
        index: HashMap::new(),
    };
    collector.visit_scope(tree.root());
    collector.records
}

struct Collector<'a> {
    tree: &'a AstTree,
    file: &'a Path,
    aliases: &'a AliasMap,
    records: Vec<FunctionRecord>,
    index: HashMap<FunctionSignature, usize>,
}

impl Collector<'_> {
    fn visit_scope(
        &mut self,
        scope: NodeId,
    ) {
        let tree = self.tree;
        for &id in tree.children(scope) {
            match tree.node(id).kind {
                NodeKind::Namespace => self.visit_scope(id),
                NodeKind::Function if tree.node(id).is_in_file(self.file) => self.add(id),
                _ => {},
            }
        }
    }

    fn add(
        &mut self,
        id: NodeId,
    ) {
        let tree = self.tree;
        let node = tree.node(id);
        let raw_return_type = self.aliases.resolve(node.type_text.as_deref().unwrap_or_default());
        let mut signature = FunctionSignature {
            name: full_name(tree, id),
            simple_return_type: simplify(&raw_return_type),
            raw_return_type,
            var_names: Vec::new(),
            raw_var_types: Vec::new(),
            simple_var_types: Vec::new(),
        };
        for param in tree.parameters(id) {
            let raw = self.aliases.resolve(param.type_text.as_deref().unwrap_or_default());
            signature.var_names.push(param.name.clone());
            signature.simple_var_types.push(simplify(&raw));
            signature.raw_var_types.push(raw);
        }

        let index = match self.index.get(&signature) {
            Some(&index) => index,
            None => {
                let index = self.records.len();
                self.records.push(signature.clone().into_record(self.file));
                self.index.insert(signature, index);
                index
            },
        };

        let record = &mut self.records[index];
        if node.has_body {
            record.definition_line = Some(node.line);
        }
        if record.declaration_line.is_none() {
            record.declaration_line = Some(node.line);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/extract/functions_tests.rs"]
mod tests;
