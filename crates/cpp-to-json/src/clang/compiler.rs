use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::ast::{Diagnostic, Inclusion, Severity};
use crate::config::CompilerSettings;
use crate::error::{Error, Result};
use crate::vfs::normalized_path;

static DIAGNOSTIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(.*?):(\d+):(\d+):|[^\s:]+:)?\s*(fatal error|error|warning|note):\s*(.*)$")
        .expect("diagnostic pattern is valid")
});

static INCLUDE_TRACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\.+) (.+)$").expect("include trace pattern is valid"));

/// Raw output of one `-ast-dump=json` run.
pub(crate) struct AstDump {
    pub(crate) json: String,
    pub(crate) stderr: String,
    pub(crate) success: bool,
}

/// Build the compiler argument list for dumping `file`.
///
/// `-H` makes the preprocessor print every header it enters, one per line,
/// prefixed with one dot per nesting level; that trace is how inclusion
/// edges are recovered without a second preprocessor run.
pub(crate) fn ast_dump_args(
    settings: &CompilerSettings,
    include_env: Option<&str>,
    file: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-x".to_string(),
        "c++".to_string(),
        format!("-std={}", settings.std),
        "-fsyntax-only".to_string(),
        "-fno-color-diagnostics".to_string(),
        "-H".to_string(),
        "-Xclang".to_string(),
        "-ast-dump=json".to_string(),
    ];

    let mut seen_includes = HashSet::with_capacity(settings.include_paths.len());
    let env_paths = include_env
        .filter(|_| settings.use_include_env)
        .map(|value| std::env::split_paths(value).map(|p| p.display().to_string()).collect::<Vec<_>>())
        .unwrap_or_default();

    for p in settings.include_paths.iter().chain(env_paths.iter()) {
        if p.trim().is_empty() {
            continue;
        }
        if seen_includes.insert(p.clone()) {
            args.push("-I".to_string());
            args.push(p.clone());
        }
    }

    args.extend(settings.extra_flags.iter().cloned());
    args.push(file.display().to_string());
    args
}

/// Run Clang's JSON AST dump for `file`.
pub(crate) fn run_ast_dump(
    settings: &CompilerSettings,
    file: &Path,
) -> Result<AstDump> {
    let include_env = std::env::var("INCLUDE").ok();
    let args = ast_dump_args(settings, include_env.as_deref(), file);

    debug!("AST dump: {} {}", settings.clang, args.join(" "));

    let output = Command::new(&settings.clang).args(&args).output().map_err(|e| Error::Provider {
        file: file.to_path_buf(),
        message: format!("failed to run `{}`: {e}", settings.clang),
    })?;

    let json = String::from_utf8(output.stdout).map_err(|e| Error::Provider {
        file: file.to_path_buf(),
        message: format!("AST dump is not valid UTF-8: {e}"),
    })?;
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    debug!("[ast-dump] produced {} bytes of JSON for {}", json.len(), file.display());

    Ok(AstDump {
        json,
        stderr,
        success: output.status.success(),
    })
}

/// Parse compiler stderr into diagnostics.
///
/// Expected format: `filename:line:column: severity: message`, or a
/// driver-level `clang++: error: message` without a location.
pub(crate) fn parse_diagnostics(output: &str) -> Vec<Diagnostic> {
    output.lines().filter_map(parse_diagnostic_line).collect()
}

fn parse_diagnostic_line(line: &str) -> Option<Diagnostic> {
    let caps = DIAGNOSTIC_RE.captures(line)?;

    let file = caps.get(1).map(|m| m.as_str().to_owned());
    let line_num = caps.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    let column = caps.get(3).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    let severity = Severity::from_spelling(caps.get(4)?.as_str());
    let message = caps.get(5)?.as_str().to_string();

    Some(Diagnostic {
        file,
        line: line_num,
        column,
        severity,
        message,
    })
}

/// Rebuild inclusion edges from the `-H` header trace.
///
/// A line with `n` dots was entered from the most recent line with `n - 1`
/// dots; one dot means the main file.
pub(crate) fn parse_include_trace(
    main_file: &Path,
    output: &str,
) -> Vec<Inclusion> {
    let mut stack: Vec<PathBuf> = vec![main_file.to_path_buf()];
    let mut includes = Vec::new();

    for line in output.lines() {
        let Some(caps) = INCLUDE_TRACE_RE.captures(line) else {
            continue;
        };
        let depth = caps[1].len();
        if depth > stack.len() {
            debug!("[include-trace] skipping orphan line: {line}");
            continue;
        }

        let included = normalized_path(Path::new(caps[2].trim()));
        stack.truncate(depth);
        includes.push(Inclusion {
            includer: stack[depth - 1].clone(),
            included: included.clone(),
        });
        stack.push(included);
    }

    includes
}

#[cfg(test)]
#[path = "../../tests/src/clang/compiler_tests.rs"]
mod tests;
