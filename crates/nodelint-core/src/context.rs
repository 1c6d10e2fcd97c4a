//! Per-file context passed to checkers.

use std::path::{Path, PathBuf};

/// Context provided to checkers for one file.
///
/// Carries the file path and source text; checkers use the path for
/// diagnostic locations and may re-read the file for best-effort
/// whole-source scans.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the analysis root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            relative_path,
        }
    }

    /// Builds a [`crate::Location`] for a node in this file.
    #[must_use]
    pub fn location(&self, node: tree_sitter::Node<'_>) -> crate::Location {
        crate::Location::from_node(self.relative_path.clone(), node)
    }
}
