use crate::ast::{AstTree, NodeId, NodeKind};

/// `A::B::name` for `id`, following declaration contexts up to the
/// translation unit. Anonymous scopes contribute an empty segment.
pub fn full_name(
    tree: &AstTree,
    id: NodeId,
) -> String {
    let mut name = tree.node(id).name.clone();
    let mut current = tree.semantic_parent(id);
    while let Some(parent) = current {
        let node = tree.node(parent);
        if node.kind == NodeKind::TranslationUnit {
            break;
        }
        name = format!("{}::{name}", node.name);
        current = tree.semantic_parent(parent);
    }
    name
}

#[cfg(test)]
#[path = "../../tests/src/extract/qualified_name_tests.rs"]
mod tests;
