use once_cell::sync::Lazy;
use regex::Regex;

static CONST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bconst\b").expect("const pattern is valid"));

/// "Simple" spelling of a type: `const`, pointers and references removed.
///
/// `const char *` becomes `char`, `vector<int> &` becomes `vector<int>`.
/// The result doubles as the lookup key for user-defined value types.
pub fn simplify(raw: &str) -> String {
    let without_const = CONST_RE.replace_all(raw, "");
    without_const.replace(['*', '&'], "").trim().to_string()
}

#[cfg(test)]
#[path = "../../tests/src/extract/type_text_tests.rs"]
mod tests;
