use super::*;

#[test]
fn defaults() {
    let settings = Settings::default();
    assert_eq!(settings.compiler.clang, "clang++");
    assert_eq!(settings.compiler.std, "c++17");
    assert!(settings.compiler.use_include_env);
    assert!(settings.traversal.traverse_includes);
    assert!(settings.traversal.skip_system_headers);
    assert_eq!(settings.traversal.max_alias_passes, DEFAULT_ALIAS_PASSES);
    assert_eq!(settings.logging.level, LogLevel::Warn);
}

#[test]
fn parses_full_document() {
    let content = r#"
[compiler]
clang = "clang++-17"
std = "-std=c++20"
include_paths = ["include", " third_party/include ", "include", ""]
extra_flags = ["-DNDEBUG"]
use_include_env = false

[traversal]
traverse_includes = false
include_regexes = [".*/src/.*"]
exclude_regexes = [".*/generated/.*", ".*/generated/.*"]
skip_system_headers = false
max_alias_passes = 100000

[logging]
level = "debug"
"#;
    let settings = Settings::from_toml_str(content, Path::new("cpp-to-json.toml")).expect("valid config");
    assert_eq!(settings.compiler.clang, "clang++-17");
    assert_eq!(settings.compiler.std, "c++20");
    assert_eq!(settings.compiler.include_paths, vec!["include", "third_party/include"]);
    assert_eq!(settings.compiler.extra_flags, vec!["-DNDEBUG"]);
    assert!(!settings.compiler.use_include_env);
    assert!(!settings.traversal.traverse_includes);
    assert_eq!(settings.traversal.include_regexes, vec![".*/src/.*"]);
    assert_eq!(settings.traversal.exclude_regexes, vec![".*/generated/.*"]);
    assert!(!settings.traversal.skip_system_headers);
    assert_eq!(settings.traversal.max_alias_passes, MAX_ALIAS_PASSES);
    assert_eq!(settings.logging.level, LogLevel::Debug);
}

#[test]
fn partial_document_keeps_other_defaults() {
    let content = r#"
unknown_top_level = 1

[compiler]
include_paths = ["vendor"]
future_option = true
"#;
    let settings = Settings::from_toml_str(content, Path::new("cpp-to-json.toml")).expect("valid config");
    assert_eq!(settings.compiler.include_paths, vec!["vendor"]);
    assert_eq!(settings.compiler.clang, "clang++");
    assert_eq!(settings.traversal, TraversalSettings::default());
}

#[test]
fn blank_compiler_falls_back_to_default() {
    let settings =
        Settings::from_toml_str("[compiler]\nclang = \"  \"\nstd = \"\"\n", Path::new("x.toml")).expect("valid config");
    assert_eq!(settings.compiler.clang, "clang++");
    assert_eq!(settings.compiler.std, "c++17");
}

#[test]
fn malformed_document_is_a_config_error() {
    let err = Settings::from_toml_str("[traversal]\nmax_alias_passes = \"many\"\n", Path::new("bad.toml"))
        .expect_err("wrong type");
    assert!(matches!(err, Error::Config { ref path, .. } if path == Path::new("bad.toml")));
}

#[test]
fn discovers_config_in_parent_directory() {
    let root = std::env::temp_dir().join(format!("cpp-to-json-config-test-{}", std::process::id()));
    let nested = root.join("src/detail");
    std::fs::create_dir_all(&nested).expect("create dirs");
    std::fs::write(root.join(CONFIG_FILENAME), "[logging]\nlevel = \"trace\"\n").expect("write config");
    let source = nested.join("main.cpp");
    std::fs::write(&source, "int main() { return 0; }\n").expect("write source");

    assert_eq!(find_config_file(&source), Some(root.join(CONFIG_FILENAME)));
    let settings = Settings::discover(&source).expect("config loads");
    assert_eq!(settings.logging.level, LogLevel::Trace);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn missing_explicit_config_is_an_error() {
    let err = Settings::load(Path::new("/nonexistent/cpp-to-json.toml")).expect_err("file is missing");
    assert!(matches!(err, Error::Config { .. }));
}
