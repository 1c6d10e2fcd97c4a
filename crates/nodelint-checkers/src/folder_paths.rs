//! Checker enforcing `folder_paths` usage over direct filesystem access.
//!
//! # Detected Patterns
//!
//! - Calls to filesystem functions (`os.path.*`, `os.listdir`, `glob.glob`,
//!   `pathlib.Path`, `shutil.*`, ...) not routed through `folder_paths`
//! - String literals that look like hardcoded project-relative paths
//! - Files that perform filesystem operations without importing
//!   `folder_paths` at all (reported once, at end of file)
//!
//! # Allowed Patterns
//!
//! - `os.path.join`/`exists`/`isfile`/`isdir` when `folder_paths` is
//!   imported (safe once the base directory came from the helper)
//! - Calls whose source text contains the local `folder_paths` alias
//! - Any filesystem call when `allow_direct_fs_when_imported` is set and
//!   the helper is imported

use crate::patterns::{
    suggestion_for, FILESYSTEM_FUNCTIONS, HARDCODED_PATH_PATTERNS, SAFE_WITH_FOLDER_PATHS,
};
use nodelint_core::ast::{call_name, import_from_module, import_names, node_text};
use nodelint_core::{Checker, DiagnosticSink, FileContext, RuleCode};
use tree_sitter::Node;

/// The sanctioned filesystem-helper module.
const HELPER_MODULE: &str = "folder_paths";

/// Enforces usage of the `folder_paths` module for filesystem operations.
#[derive(Debug, Clone)]
pub struct FolderPathsChecker {
    allow_direct_fs_when_imported: bool,

    // Per-file state, reset in visit_module
    helper_imported: bool,
    helper_alias: String,
    has_filesystem_operations: bool,
}

impl Default for FolderPathsChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderPathsChecker {
    /// Creates a new checker with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allow_direct_fs_when_imported: false,
            helper_imported: false,
            helper_alias: HELPER_MODULE.to_string(),
            has_filesystem_operations: false,
        }
    }

    /// When enabled, importing `folder_paths` permits every known
    /// filesystem call, not just the path-predicate subset.
    #[must_use]
    pub fn allow_direct_fs_when_imported(mut self, allow: bool) -> Self {
        self.allow_direct_fs_when_imported = allow;
        self
    }

    fn is_allowed_filesystem_call(&self, func_name: &str, call: Node<'_>, source: &str) -> bool {
        if self.helper_imported
            && (self.allow_direct_fs_when_imported || SAFE_WITH_FOLDER_PATHS.contains(&func_name))
        {
            return true;
        }

        // Cheap approximation of "applied to a value derived from the helper"
        node_text(call, source).contains(&self.helper_alias)
    }
}

impl Checker for FolderPathsChecker {
    fn name(&self) -> &'static str {
        "folder-paths"
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[
            RuleCode::UseFolderPaths,
            RuleCode::HardcodedPath,
            RuleCode::MissingFolderPaths,
        ]
    }

    fn visit_module(
        &mut self,
        _node: Node<'_>,
        _ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
        self.helper_imported = false;
        self.helper_alias = HELPER_MODULE.to_string();
        self.has_filesystem_operations = false;
    }

    fn visit_import(
        &mut self,
        node: Node<'_>,
        ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
        for name in import_names(node, ctx.content) {
            if name.module == HELPER_MODULE {
                self.helper_imported = true;
                if let Some(alias) = name.alias {
                    self.helper_alias = alias;
                }
            }
        }
    }

    fn visit_import_from(
        &mut self,
        node: Node<'_>,
        ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
        if import_from_module(node, ctx.content).as_deref() == Some(HELPER_MODULE) {
            self.helper_imported = true;
        }
    }

    fn visit_call(&mut self, node: Node<'_>, ctx: &FileContext<'_>, sink: &mut dyn DiagnosticSink) {
        let Some(func_name) = call_name(node, ctx.content) else {
            return;
        };

        if !FILESYSTEM_FUNCTIONS.contains(&func_name.as_str()) {
            return;
        }

        self.has_filesystem_operations = true;

        if !self.is_allowed_filesystem_call(&func_name, node, ctx.content) {
            let suggestion = suggestion_for(&func_name);
            sink.emit(
                RuleCode::UseFolderPaths,
                ctx.location(node),
                vec![format!("{func_name}. {suggestion}")],
            );
        }
    }

    fn visit_constant(
        &mut self,
        node: Node<'_>,
        ctx: &FileContext<'_>,
        sink: &mut dyn DiagnosticSink,
    ) {
        let literal = node_text(node, ctx.content);
        for pattern in HARDCODED_PATH_PATTERNS.iter() {
            if pattern.is_match(literal) {
                sink.emit(
                    RuleCode::HardcodedPath,
                    ctx.location(node),
                    vec![literal.to_string()],
                );
                break;
            }
        }
    }

    fn leave_module(
        &mut self,
        node: Node<'_>,
        ctx: &FileContext<'_>,
        sink: &mut dyn DiagnosticSink,
    ) {
        if self.has_filesystem_operations && !self.helper_imported {
            sink.emit(RuleCode::MissingFolderPaths, ctx.location(node), vec![]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodelint_core::{parse_module, run_checker, Diagnostic, DiagnosticBuffer};
    use std::path::Path;

    fn check(code: &str) -> Vec<Diagnostic> {
        check_with(FolderPathsChecker::new(), code)
    }

    fn check_with(mut checker: FolderPathsChecker, code: &str) -> Vec<Diagnostic> {
        let tree = parse_module(code).expect("Failed to parse");
        let ctx = FileContext::new(Path::new("test.py"), code, Path::new("."));
        let mut sink = DiagnosticBuffer::new();
        run_checker(&mut checker, &tree, &ctx, &mut sink);
        sink.into_diagnostics()
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<RuleCode> {
        diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn glob_without_import_emits_call_and_missing_import() {
        let diagnostics = check(
            r#"
import glob

def scan():
    return glob.glob("*.bin")
"#,
        );
        assert_eq!(
            codes(&diagnostics),
            vec![RuleCode::UseFolderPaths, RuleCode::MissingFolderPaths]
        );
        assert!(diagnostics[0].message().contains("glob.glob"));
        assert!(diagnostics[0].message().contains("then glob.glob()"));
    }

    #[test]
    fn safe_subset_is_allowed_when_helper_imported() {
        let diagnostics = check(
            r#"
import folder_paths
import os

def resolve(name):
    base = folder_paths.get_directory("checkpoints")
    candidate = os.path.join(base, name)
    if os.path.exists(candidate) and os.path.isfile(candidate):
        return candidate
    return None
"#,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn listdir_is_not_in_safe_subset() {
        let diagnostics = check(
            r#"
import folder_paths
import os

def entries():
    return os.listdir("checkpoints")
"#,
        );
        assert_eq!(codes(&diagnostics), vec![RuleCode::UseFolderPaths]);
    }

    #[test]
    fn alias_substring_in_call_text_is_allowed() {
        let diagnostics = check(
            r#"
import folder_paths
import os

def entries():
    return os.listdir(folder_paths.get_directory("checkpoints"))
"#,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn renamed_alias_is_tracked() {
        let diagnostics = check(
            r#"
import folder_paths as fp
import os

def entries():
    return os.listdir(fp.get_directory("checkpoints"))
"#,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn broad_leniency_option_allows_all_filesystem_calls() {
        let code = r#"
import folder_paths
import os

def entries():
    return os.listdir("checkpoints")
"#;
        let diagnostics =
            check_with(FolderPathsChecker::new().allow_direct_fs_when_imported(true), code);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn hardcoded_relative_path_fires_once() {
        // Both patterns match; first match wins, one diagnostic
        let diagnostics = check("CHECKPOINT_DIR = \"./models/checkpoints\"\n");
        assert_eq!(codes(&diagnostics), vec![RuleCode::HardcodedPath]);
        assert!(diagnostics[0].message().contains("./models/checkpoints"));
    }

    #[test]
    fn plain_literal_is_not_a_path() {
        let diagnostics = check("GREETING = \"hello world\"\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn no_filesystem_calls_means_no_missing_import() {
        let diagnostics = check("def add(a, b):\n    return a + b\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unresolvable_call_target_is_skipped() {
        let diagnostics = check("handlers[0](\"x\")\nresults = [f() for f in fns]\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn state_resets_between_files() {
        let mut checker = FolderPathsChecker::new();

        // File 1 imports the helper
        let first = "import folder_paths\nimport os\nos.listdir(folder_paths.base)\n";
        let tree = parse_module(first).expect("parse");
        let ctx = FileContext::new(Path::new("first.py"), first, Path::new("."));
        let mut sink = DiagnosticBuffer::new();
        run_checker(&mut checker, &tree, &ctx, &mut sink);
        assert!(sink.into_diagnostics().is_empty());

        // File 2 does not; the import must not leak over
        let second = "import os\nos.listdir(\"x\")\n";
        let tree = parse_module(second).expect("parse");
        let ctx = FileContext::new(Path::new("second.py"), second, Path::new("."));
        let mut sink = DiagnosticBuffer::new();
        run_checker(&mut checker, &tree, &ctx, &mut sink);
        assert_eq!(
            codes(&sink.into_diagnostics()),
            vec![RuleCode::UseFolderPaths, RuleCode::MissingFolderPaths]
        );
    }

    #[test]
    fn identical_input_yields_identical_diagnostics() {
        let code = "import glob\nglob.glob(\"*.bin\")\nPATH = \"./models/x\"\n";
        let first = check(code);
        let second = check(code);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
