use super::*;

struct Knows(&'static [&'static str]);

impl StructVerifier for Knows {
    fn verify(
        &self,
        token: &str,
    ) -> bool {
        self.0.iter().any(|known| *known == token)
    }
}

#[test]
fn standard_allow_list_accepts_primitives_and_ignores_qualifiers() {
    let policy = AllowList::standard();
    let nothing = Knows(&[]);
    for token in ["int", "int64_t", "vector", "string", "void", "std", "unsigned", "const"] {
        assert!(policy.accepts(token, &nothing), "{token} should be accepted");
    }
    assert!(!policy.accepts("Point", &nothing));
    assert!(!policy.accepts("size_t", &nothing));
}

#[test]
fn allow_list_falls_back_to_the_verifier() {
    let policy = AllowList::standard().accept("size_t");
    let verifier = Knows(&["Point"]);
    assert!(policy.accepts("Point", &verifier));
    assert!(policy.accepts("size_t", &verifier));
    assert!(!policy.accepts("Shape", &verifier));
}

#[test]
fn closures_are_policies() {
    let only_structs = |token: &str, verifier: &dyn StructVerifier| verifier.verify(token);
    let verifier = Knows(&["Point"]);
    assert!(only_structs.accepts("Point", &verifier));
    assert!(!only_structs.accepts("int", &verifier));
    assert!(AcceptAll.accepts("anything", &verifier));
}

#[test]
fn unsupported_log_keeps_arrival_order() {
    let mut log = UnsupportedLog::new();
    log.unsupported("Point", Some(Path::new("/src/a.hpp")), Some(3));
    log.unsupported("go", None, None);

    assert_eq!(log.len(), 2);
    assert_eq!(log.names().collect::<Vec<_>>(), vec!["Point", "go"]);
    assert_eq!(
        log.symbols[0],
        UnsupportedSymbol {
            name: "Point".to_string(),
            file: Some(PathBuf::from("/src/a.hpp")),
            line: Some(3),
        }
    );
    assert_eq!(log.symbols[1].file, None);
}

#[test]
fn closures_are_sinks() {
    let mut seen = Vec::new();
    {
        let mut sink = |name: &str, _file: Option<&Path>, line: Option<u32>| seen.push((name.to_string(), line));
        sink.unsupported("f", None, Some(1));
    }
    IgnoreUnsupported.unsupported("ignored", None, None);
    assert_eq!(seen, vec![("f".to_string(), Some(1))]);
}
