use super::*;

#[test]
fn push_links_children_in_order() {
    let mut tree = AstTree::new();
    let ns = tree.push(tree.root(), AstNode::new(NodeKind::Namespace, "ns"));
    let first = tree.push(ns, AstNode::new(NodeKind::Function, "first"));
    let second = tree.push(ns, AstNode::new(NodeKind::Function, "second"));

    assert_eq!(tree.children(tree.root()), &[ns]);
    assert_eq!(tree.children(ns), &[first, second]);
    assert_eq!(tree.semantic_parent(first), Some(ns));
    assert_eq!(tree.semantic_parent(tree.root()), None);
    assert_eq!(tree.len(), 4);
}

#[test]
fn semantic_parent_override_wins_over_lexical_parent() {
    let mut tree = AstTree::new();
    let ns = tree.push(tree.root(), AstNode::new(NodeKind::Namespace, "ns"));
    let out_of_line = tree.push(tree.root(), AstNode::new(NodeKind::Function, "f").with_body());
    tree.set_semantic_parent(out_of_line, ns);

    assert_eq!(tree.semantic_parent(out_of_line), Some(ns));
    assert_eq!(tree.children(tree.root()), &[ns, out_of_line]);
}

#[test]
fn parameters_skip_other_children() {
    let mut tree = AstTree::new();
    let f = tree.push(tree.root(), AstNode::new(NodeKind::Function, "f"));
    tree.push(f, AstNode::new(NodeKind::Parameter, "a").with_type("int"));
    tree.push(f, AstNode::new(NodeKind::Other("CompoundStmt".to_string()), ""));
    tree.push(f, AstNode::new(NodeKind::Parameter, "b").with_type("float"));

    let names: Vec<&str> = tree.parameters(f).map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn empty_tree_has_only_the_translation_unit() {
    let tree = AstTree::new();
    assert!(tree.is_empty());
    assert_eq!(tree.node(tree.root()).kind, NodeKind::TranslationUnit);
}

#[test]
fn node_location_helpers() {
    let node = AstNode::new(NodeKind::Field, "a").at("/src/a.hpp", 3).with_access(Access::Public);
    assert!(node.is_in_file(Path::new("/src/a.hpp")));
    assert!(!node.is_in_file(Path::new("/src/b.hpp")));
    assert!(node.is_public());
    assert_eq!(node.line, 3);
}

#[test]
fn diagnostics_display_like_the_compiler() {
    let located = Diagnostic {
        file: Some("main.cpp".to_string()),
        line: 4,
        column: 9,
        severity: Severity::Error,
        message: "unknown type name 'foo'".to_string(),
    };
    assert!(located.is_error());
    assert_eq!(located.to_string(), "main.cpp:4:9: error: unknown type name 'foo'");

    let driver = Diagnostic {
        file: None,
        line: 0,
        column: 0,
        severity: Severity::Warning,
        message: "argument unused during compilation".to_string(),
    };
    assert!(!driver.is_error());
    assert_eq!(driver.to_string(), "warning: argument unused during compilation");
}

#[test]
fn severity_spellings() {
    assert_eq!(Severity::from_spelling("fatal error"), Severity::Fatal);
    assert_eq!(Severity::from_spelling("error"), Severity::Error);
    assert_eq!(Severity::from_spelling("warning"), Severity::Warning);
    assert_eq!(Severity::from_spelling("note"), Severity::Note);
    assert_eq!(Access::from_spelling("protected"), Some(Access::Protected));
    assert_eq!(Access::from_spelling("none"), None);
}
