//! [`AstProvider`] backed by Clang's JSON AST dump.

mod clang_nodes;
mod compiler;
mod convert;

use std::path::Path;

use tracing::{debug, info, warn};

use crate::ast::{AstProvider, AstTree, ParsedUnit, Severity};
use crate::config::CompilerSettings;
use crate::error::{Error, Result};

use self::clang_nodes::Node;
use self::compiler::{parse_diagnostics, parse_include_trace, run_ast_dump};
use self::convert::Converter;

/// Parses C++ files by running `clang -Xclang -ast-dump=json`.
#[derive(Debug, Clone, Default)]
pub struct ClangProvider {
    settings: CompilerSettings,
}

impl ClangProvider {
    pub fn new(settings: CompilerSettings) -> Self {
        Self {
            settings,
        }
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }
}

impl AstProvider for ClangProvider {
    fn parse(
        &mut self,
        file: &Path,
    ) -> Result<ParsedUnit> {
        let dump = run_ast_dump(&self.settings, file)?;
        let diagnostics = parse_diagnostics(&dump.stderr);
        let includes = parse_include_trace(file, &dump.stderr);

        for diagnostic in diagnostics.iter().filter(|d| d.severity == Severity::Warning) {
            warn!("[clang] {diagnostic}");
        }

        let has_errors = diagnostics.iter().any(|d| d.is_error());
        if !dump.json.trim_start().starts_with('{') {
            if has_errors {
                // The caller turns these into a parse error.
                return Ok(ParsedUnit {
                    tree: AstTree::new(),
                    includes,
                    diagnostics,
                });
            }
            return Err(Error::Provider {
                file: file.to_path_buf(),
                message: if dump.success {
                    "compiler produced no AST dump".to_string()
                } else {
                    dump.stderr.trim().to_string()
                },
            });
        }

        let root: Node = serde_json::from_str(&dump.json).map_err(|e| Error::Provider {
            file: file.to_path_buf(),
            message: format!("malformed AST dump: {e}"),
        })?;
        let tree = Converter::new().convert(&root);

        info!("[clang] parsed {} ({} nodes, {} includes)", file.display(), tree.len(), includes.len());
        debug!("[clang] {} diagnostics for {}", diagnostics.len(), file.display());

        Ok(ParsedUnit {
            tree,
            includes,
            diagnostics,
        })
    }
}
