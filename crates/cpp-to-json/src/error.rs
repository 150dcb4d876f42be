//! Error type shared by the provider, the traversal and configuration.
//!
//! Only failures that abort an extraction live here. Functions and value
//! types that cannot cross the interop boundary are not errors: they are
//! reported through an [`UnsupportedSink`](crate::UnsupportedSink) and the
//! traversal carries on.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The AST provider reported error diagnostics for a translation unit.
    ///
    /// A malformed translation unit is not recoverable; no partial result is
    /// returned for the call.
    #[error("failed to parse {}:\n{diagnostics}", file.display())]
    Parse {
        file: PathBuf,
        diagnostics: String,
    },

    /// The AST provider itself could not run or produced unusable output.
    #[error("AST provider failed for {}: {message}", file.display())]
    Provider {
        file: PathBuf,
        message: String,
    },

    /// An include/exclude pattern did not compile.
    #[error("invalid include filter pattern: {0}")]
    Regex(#[from] regex::Error),

    /// A configuration file could not be read or parsed.
    #[error("invalid configuration in {}: {message}", path.display())]
    Config {
        path: PathBuf,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
