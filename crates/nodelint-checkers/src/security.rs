//! Security checker: code execution, shell calls, route registration,
//! obfuscation.
//!
//! # Detected Patterns
//!
//! - `eval(...)` / `exec(...)` calls
//! - `subprocess.*` and legacy shell helpers (`os.system`, `os.popen`,
//!   `commands.getoutput`)
//! - `routes`/`app` attribute access on the `PromptServer` singleton
//! - Whole-file obfuscation idioms (joined-character exec/eval, `chr()`
//!   codes, hex-decoded bytes, dynamic imports)
//!
//! The route check is textual on the dotted attribute form: any chain
//! containing both the `PromptServer` marker and `instance` matches. That
//! over-matches aliased identifiers on purpose; it stays robust to import
//! aliasing without type information.

use crate::patterns::{
    OBFUSCATION_PATTERNS, REQUIREMENT_URL_PATTERN, SERVER_SINGLETON_MARKER, SHELL_EXEC_FUNCTIONS,
};
use nodelint_core::ast::{attribute_name, call_name, node_text};
use nodelint_core::{Checker, DiagnosticSink, FileContext, Location, RuleCode};
use std::path::Path;
use tracing::debug;
use tree_sitter::Node;

/// Checker for security issues in custom nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityChecker;

impl SecurityChecker {
    /// Creates a new security checker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Scans requirements-style text for direct URLs.
    ///
    /// Requirement files are not syntax trees, so this hook is driven
    /// separately from tree traversal: the caller supplies the file path
    /// and its text, one finding per offending line.
    pub fn scan_requirements(&self, path: &Path, text: &str, sink: &mut dyn DiagnosticSink) {
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if REQUIREMENT_URL_PATTERN.is_match(line) {
                sink.emit(
                    RuleCode::NoDirectUrls,
                    Location::new(path.to_path_buf(), index + 1, 1),
                    vec![line.to_string()],
                );
            }
        }
    }
}

impl Checker for SecurityChecker {
    fn name(&self) -> &'static str {
        "security"
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[
            RuleCode::NoEval,
            RuleCode::NoExec,
            RuleCode::NoDirectUrls,
            RuleCode::NoObfuscation,
            RuleCode::SubprocessWarning,
            RuleCode::NoCustomRoutes,
        ]
    }

    fn visit_module(
        &mut self,
        node: Node<'_>,
        ctx: &FileContext<'_>,
        sink: &mut dyn DiagnosticSink,
    ) {
        // Whole-file scan over the raw source. Re-reads the path best-effort:
        // if the file cannot be read the scan is skipped, never the analysis.
        let Ok(source) = std::fs::read_to_string(ctx.path) else {
            debug!("Skipping obfuscation scan, cannot read {}", ctx.path.display());
            return;
        };

        for pattern in OBFUSCATION_PATTERNS.iter() {
            if pattern.is_match(&source) {
                sink.emit(RuleCode::NoObfuscation, ctx.location(node), vec![]);
                break;
            }
        }
    }

    fn visit_call(&mut self, node: Node<'_>, ctx: &FileContext<'_>, sink: &mut dyn DiagnosticSink) {
        let Some(func_name) = call_name(node, ctx.content) else {
            return;
        };

        match func_name.as_str() {
            "eval" => sink.emit(RuleCode::NoEval, ctx.location(node), vec![]),
            "exec" => sink.emit(RuleCode::NoExec, ctx.location(node), vec![]),
            name if name.starts_with("subprocess.") || SHELL_EXEC_FUNCTIONS.contains(&name) => {
                sink.emit(
                    RuleCode::SubprocessWarning,
                    ctx.location(node),
                    vec![func_name.clone()],
                );
            }
            _ => {}
        }
    }

    fn visit_attribute(
        &mut self,
        node: Node<'_>,
        ctx: &FileContext<'_>,
        sink: &mut dyn DiagnosticSink,
    ) {
        let Some(attr) = attribute_name(node, ctx.content) else {
            return;
        };
        if attr != "routes" && attr != "app" {
            return;
        }

        let dotted = node_text(node, ctx.content);
        if dotted.contains(SERVER_SINGLETON_MARKER) && dotted.contains("instance") {
            sink.emit(
                RuleCode::NoCustomRoutes,
                ctx.location(node),
                vec![dotted.to_string()],
            );
        }
    }
}
