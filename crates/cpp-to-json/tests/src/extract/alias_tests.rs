use super::*;
use crate::ast::AstNode;

const FILE: &str = "/nonexistent/types.hpp";

fn alias_tree() -> AstTree {
    let mut tree = AstTree::new();
    let root = tree.root();
    tree.push(root, AstNode::new(NodeKind::Typedef, "Index").at(FILE, 1).with_type("long"));
    tree.push(root, AstNode::new(NodeKind::TypeAlias, "Ids").at(FILE, 2).with_type("std::vector<Index>"));
    tree.push(root, AstNode::new(NodeKind::Typedef, "Handle").at(FILE, 3).with_type("struct handle_impl *"));
    tree.push(root, AstNode::new(NodeKind::Typedef, "Foreign").at("/nonexistent/other.hpp", 1).with_type("double"));
    let ns = tree.push(root, AstNode::new(NodeKind::Namespace, "ns").at(FILE, 5));
    tree.push(ns, AstNode::new(NodeKind::Typedef, "Nested").at(FILE, 6).with_type("float"));
    tree
}

#[test]
fn collects_top_level_aliases_of_the_processed_file() {
    let aliases = AliasMap::from_translation_unit(&alias_tree(), Path::new(FILE), 64);
    assert_eq!(aliases.len(), 3);
    assert_eq!(aliases.get("Index"), Some("long"));
    assert_eq!(aliases.get("Foreign"), None);
    assert_eq!(aliases.get("Nested"), None);
}

#[test]
fn resolves_aliases_to_a_fixpoint() {
    let aliases = AliasMap::from_translation_unit(&alias_tree(), Path::new(FILE), 64);
    assert_eq!(aliases.resolve("Ids"), "std::vector<long>");
    assert_eq!(aliases.resolve("const Index &"), "const long &");
    assert_eq!(aliases.resolve("Handle"), "handle_impl *");
}

#[test]
fn substitution_is_whole_word_and_scope_blind() {
    let aliases = AliasMap::from_translation_unit(&alias_tree(), Path::new(FILE), 64);
    assert_eq!(aliases.resolve("IndexSet"), "IndexSet");
    assert_eq!(aliases.resolve("other::Index"), "other::long");
}

#[test]
fn alias_free_text_is_unchanged_apart_from_elaborated_keywords() {
    let aliases = AliasMap::from_translation_unit(&alias_tree(), Path::new(FILE), 64);
    assert_eq!(aliases.resolve("map<int, bool>"), "map<int, bool>");
    assert_eq!(aliases.resolve("struct Point"), "Point");
    assert_eq!(aliases.resolve("const class Widget &"), "const Widget &");
    assert_eq!(aliases.resolve("subclass x"), "subclass x");
    assert_eq!(AliasMap::default().resolve("struct Point &&"), "Point &&");
}

#[test]
fn self_naming_typedef_is_not_an_alias() {
    let mut tree = AstTree::new();
    let root = tree.root();
    tree.push(root, AstNode::new(NodeKind::Typedef, "point").at(FILE, 1).with_type("struct point"));
    let aliases = AliasMap::from_translation_unit(&tree, Path::new(FILE), 64);
    assert!(aliases.is_empty());
    assert_eq!(aliases.resolve("point"), "point");
}

#[test]
fn cyclic_aliases_stop_at_the_pass_budget() {
    let mut aliases = AliasMap::empty(8);
    aliases.insert("A", "B");
    aliases.insert("B", "A");
    let resolved = aliases.resolve("A");
    assert!(resolved == "A" || resolved == "B");
}
