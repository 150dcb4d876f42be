use std::path::{Path, PathBuf};

/// Canonical identity of a file on disk.
///
/// Falls back to the path as given when it cannot be canonicalized (the
/// file does not exist, or it only lives inside an in-memory AST).
pub fn normalized_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Returns `true` if a file path looks like a system / toolchain header.
pub fn is_system_header(path: &Path) -> bool {
    let path = path.to_string_lossy();
    path.contains("/Toolchains/")
        || path.contains("/SDKs/")
        || path.contains("/usr/include/")
        || path.contains("/usr/local/include/")
        || path.contains("/usr/lib/gcc/")
        || path.contains("/lib/clang/")
        || path.is_empty()
}

#[cfg(test)]
#[path = "../../tests/src/vfs_tests.rs"]
mod tests;
