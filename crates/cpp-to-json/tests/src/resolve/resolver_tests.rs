use std::path::Path;

use super::*;
use crate::schema::ConstructorRecord;

fn value_type(
    name: &str,
    file: &str,
    field_types: &[&str],
) -> ValueTypeRecord {
    ValueTypeRecord {
        name: name.to_string(),
        var_names: (0..field_types.len()).map(|i| format!("f{i}")).collect(),
        raw_var_types: field_types.iter().map(|ty| ty.to_string()).collect(),
        simple_var_types: field_types.iter().map(|ty| ty.to_string()).collect(),
        definition_line: 1,
        constructor_list: vec![ConstructorRecord {
            var_names: vec!["other".to_string()],
            raw_var_types: vec![format!("{name} &&")],
            simple_var_types: vec![name.to_string()],
            definition_line: 2,
        }],
        base_structs: Vec::new(),
        file: PathBuf::from(file),
    }
}

fn function(
    name: &str,
    params: &[&str],
    ret: &str,
) -> FunctionRecord {
    FunctionRecord {
        name: name.to_string(),
        raw_return_type: ret.to_string(),
        simple_return_type: ret.to_string(),
        var_names: (0..params.len()).map(|i| format!("p{i}")).collect(),
        raw_var_types: params.iter().map(|ty| ty.to_string()).collect(),
        simple_var_types: params.iter().map(|ty| ty.to_string()).collect(),
        declaration_line: Some(1),
        definition_line: Some(1),
        file: PathBuf::from("/src/main.cpp"),
    }
}

fn reject_all(
    _token: &str,
    _verifier: &dyn StructVerifier,
) -> bool {
    false
}

#[test]
fn missing_record_is_invalid() {
    let policy = AllowList::standard();
    let resolver = Resolver::new(ValueTypeSet::new(&[]), &policy);
    assert!(!resolver.is_valid_value_type(None));
}

#[test]
fn self_referential_field_terminates() {
    let records = vec![value_type("Node", "/src/list.hpp", &["int", "Node"])];

    let standard = AllowList::standard();
    let resolver = Resolver::new(ValueTypeSet::new(&records), &standard);
    assert!(resolver.is_valid_value_type(Some(&records[0])));

    let strict = reject_all;
    let resolver = Resolver::new(ValueTypeSet::new(&records), &strict);
    assert!(!resolver.is_valid_value_type(Some(&records[0])), "`int` is rejected by the strict policy");

    let records = vec![value_type("Node", "/src/list.hpp", &["Node"])];
    let resolver = Resolver::new(ValueTypeSet::new(&records), &strict);
    assert!(resolver.is_valid_value_type(Some(&records[0])));
}

#[test]
fn mutually_referential_records_terminate() {
    let records = vec![value_type("A", "/src/a.hpp", &["B"]), value_type("B", "/src/b.hpp", &["A"])];
    let policy = AllowList::standard();
    let resolver = Resolver::new(ValueTypeSet::new(&records), &policy);
    assert!(resolver.is_valid_value_type(Some(&records[0])));
    let required: Vec<&str> = resolver.required_value_types().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(required, vec!["B", "A"]);
}

#[test]
fn dependents_of_a_rejected_record_are_rejected_too() {
    let records = vec![value_type("A", "/src/a.hpp", &["B", "Unknown"]), value_type("B", "/src/b.hpp", &["A"])];
    let policy = AllowList::standard();
    let resolver = Resolver::new(ValueTypeSet::new(&records), &policy);

    assert!(!resolver.is_valid_value_type(Some(&records[0])));
    assert!(resolver.required_value_types().is_empty());
    assert!(!resolver.is_valid_function(&function("take", &["B"], "void")));
    assert!(resolver.required_value_types().is_empty());
}

#[test]
fn independent_acceptances_survive_a_failed_sibling() {
    let records = vec![value_type("Point", "/src/geo.hpp", &["float"]), value_type("Shape", "/src/geo.hpp", &["Texture"])];
    let policy = AllowList::standard();
    let resolver = Resolver::new(ValueTypeSet::new(&records), &policy);

    assert!(resolver.is_valid_value_type(Some(&records[0])));
    assert!(!resolver.is_valid_value_type(Some(&records[1])));
    let required: Vec<&str> = resolver.required_value_types().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(required, vec!["Point"]);
}

#[test]
fn unknown_field_type_is_invalid() {
    let records = vec![value_type("Shape", "/src/shape.hpp", &["int", "Texture"])];
    let policy = AllowList::standard();
    let resolver = Resolver::new(ValueTypeSet::new(&records), &policy);
    assert!(!resolver.is_valid_value_type(Some(&records[0])));
    assert!(resolver.required_value_types().is_empty());
}

#[test]
fn constructor_parameters_are_checked() {
    let mut record = value_type("Shape", "/src/shape.hpp", &["int"]);
    record.constructor_list.push(ConstructorRecord {
        var_names: vec!["t".to_string()],
        raw_var_types: vec!["Texture".to_string()],
        simple_var_types: vec!["Texture".to_string()],
        definition_line: 3,
    });
    let records = vec![record];
    let policy = AllowList::standard();
    let resolver = Resolver::new(ValueTypeSet::new(&records), &policy);
    assert!(!resolver.is_valid_value_type(Some(&records[0])));
}

#[test]
fn token_test_splits_words() {
    let policy = AllowList::standard();
    let resolver = Resolver::new(ValueTypeSet::new(&[]), &policy);
    assert!(resolver.test_and_verify("std::vector<std::pair<int, bool>>"));
    assert!(resolver.test_and_verify("unsigned char"));
    assert!(!resolver.test_and_verify("std::vector<Point>"));
    assert!(resolver.test_and_verify(""));
}

#[test]
fn functions_pull_in_their_value_types_dependencies_first() {
    let records = vec![value_type("go", "/src/header1.hpp", &["int", "go2"]), value_type("go2", "/src/header2.hpp", &["int"])];
    let policy = AllowList::standard();
    let resolver = Resolver::new(ValueTypeSet::new(&records), &policy);

    assert!(resolver.is_valid_function(&function("gox", &["int"], "go")));
    let required: Vec<(&str, &Path)> =
        resolver.required_value_types().iter().map(|r| (r.name.as_str(), r.file.as_path())).collect();
    assert_eq!(required, vec![("go2", Path::new("/src/header2.hpp")), ("go", Path::new("/src/header1.hpp"))]);
}

#[test]
fn function_with_unknown_types_is_invalid() {
    let records = vec![value_type("Point", "/src/point.hpp", &["int"])];
    let policy = AllowList::standard();
    let resolver = Resolver::new(ValueTypeSet::new(&records), &policy);
    assert!(!resolver.is_valid_function(&function("draw", &["Point", "Canvas"], "void")));
    assert!(!resolver.is_valid_function(&function("make", &[], "Canvas")));
    assert!(resolver.is_valid_function(&function("main", &[], "int")));
}

#[test]
fn accept_all_never_consults_value_types() {
    let records = vec![value_type("Point", "/src/point.hpp", &["Texture"])];
    let resolver = Resolver::new(ValueTypeSet::new(&records), &AcceptAll);
    assert!(resolver.is_valid_function(&function("f", &["Point"], "Widget")));
    assert!(resolver.required_value_types().is_empty());
}

#[test]
fn visited_is_keyed_by_name_and_file() {
    let records = vec![value_type("Point", "/src/a.hpp", &["int"]), value_type("Point", "/src/b.hpp", &["int"])];
    let policy = AllowList::standard();
    let resolver = Resolver::new(ValueTypeSet::new(&records), &policy);
    assert!(resolver.is_valid_value_type(Some(&records[0])));
    assert!(resolver.is_valid_value_type(Some(&records[1])));
    let visited = resolver.into_visited();
    assert_eq!(visited.len(), 2);
    assert!(visited.contains(&("Point".to_string(), PathBuf::from("/src/b.hpp"))));
}
