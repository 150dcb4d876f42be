pub mod ast;
pub mod clang;
pub mod config;
pub mod error;
pub mod extract;
pub mod resolve;
pub mod schema;
pub mod traversal;
pub mod vfs;

pub use ast::{AstNode, AstProvider, AstTree, Diagnostic, Inclusion, NodeId, NodeKind, ParsedUnit};
pub use clang::ClangProvider;
pub use config::Settings;
pub use error::{Error, Result};
pub use resolve::{
    AcceptAll, AllowList, IgnoreUnsupported, StructVerifier, TypePolicy, UnsupportedLog, UnsupportedSink,
    UnsupportedSymbol,
};
pub use schema::{ConstructorRecord, Extraction, FileEntry, FunctionRecord, ValueTypeRecord};
pub use traversal::{InputSource, IntoRegex, ObtainOptions, obtain_functions};
