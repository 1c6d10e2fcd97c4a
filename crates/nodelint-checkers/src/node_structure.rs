//! Checker for node class structure and framework API usage.
//!
//! # Detected Patterns
//!
//! - Manual device-selection calls (`torch.cuda.*`, `torch.device`) that
//!   bypass the host's `model_management` API
//! - Imports reaching into internal framework namespaces (`comfy.*` not
//!   under a public API prefix)
//!
//! Classes that look like plugin nodes are recorded as candidates (schema
//! markers, processing-method names, or a `Node` base class). The candidate
//! list drives no diagnostics yet; it is kept as an extension point for
//! structural compliance checks.

use crate::patterns::{is_internal_import, DEVICE_PATTERNS};
use nodelint_core::ast::{call_name, import_from_module, import_names, node_text};
use nodelint_core::{Checker, DiagnosticSink, FileContext, Location, RuleCode};
use std::collections::HashSet;
use tree_sitter::Node;

/// Class-level markers of the node schema.
const SCHEMA_MARKERS: &[&str] = &["INPUT_TYPES", "RETURN_TYPES", "FUNCTION", "CATEGORY"];

/// Method names typical of a node's processing entry point.
const PROCESSING_METHODS: &[&str] = &["execute", "process", "forward", "run"];

/// A class judged likely to be a plugin node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCandidate {
    /// Class name as written.
    pub name: String,
    /// Where the class is defined.
    pub location: Location,
}

/// Checker for node structure and API compliance.
#[derive(Debug, Clone, Default)]
pub struct NodeStructureChecker {
    // Per-file state, reset in visit_module
    node_classes: Vec<NodeCandidate>,
}

impl NodeStructureChecker {
    /// Creates a new checker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Node candidates recorded for the current file.
    #[must_use]
    pub fn node_classes(&self) -> &[NodeCandidate] {
        &self.node_classes
    }

    fn check_import_path(
        module: &str,
        node: Node<'_>,
        ctx: &FileContext<'_>,
        sink: &mut dyn DiagnosticSink,
    ) {
        if is_internal_import(module) {
            sink.emit(
                RuleCode::NonApiImport,
                ctx.location(node),
                vec![module.to_string()],
            );
        }
    }

    /// Syntactic heuristic for "this class is probably a plugin node".
    ///
    /// Allowed to over- and under-match; no inheritance resolution across
    /// files is attempted.
    fn is_likely_node(class_def: Node<'_>, source: &str) -> bool {
        let mut method_names: HashSet<&str> = HashSet::new();
        let mut class_attrs: HashSet<&str> = HashSet::new();

        if let Some(body) = class_def.child_by_field_name("body") {
            let mut cursor = body.walk();
            for stmt in body.named_children(&mut cursor) {
                match stmt.kind() {
                    "function_definition" => {
                        if let Some(name) = stmt.child_by_field_name("name") {
                            method_names.insert(node_text(name, source));
                        }
                    }
                    "decorated_definition" => {
                        if let Some(def) = stmt.child_by_field_name("definition") {
                            if def.kind() == "function_definition" {
                                if let Some(name) = def.child_by_field_name("name") {
                                    method_names.insert(node_text(name, source));
                                }
                            }
                        }
                    }
                    "expression_statement" => {
                        let Some(inner) = stmt.named_child(0) else {
                            continue;
                        };
                        if inner.kind() == "assignment" {
                            if let Some(left) = inner.child_by_field_name("left") {
                                if left.kind() == "identifier" {
                                    class_attrs.insert(node_text(left, source));
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        let has_schema_marker = SCHEMA_MARKERS
            .iter()
            .any(|marker| method_names.contains(marker) || class_attrs.contains(marker));
        let has_processing_method = PROCESSING_METHODS
            .iter()
            .any(|method| method_names.contains(method));

        let has_node_base = class_def
            .child_by_field_name("superclasses")
            .map_or(false, |superclasses| {
                let mut cursor = superclasses.walk();
                let has_base = superclasses.named_children(&mut cursor).any(|base| {
                    base.kind() == "identifier" && node_text(base, source).contains("Node")
                });
                has_base
            });

        has_schema_marker || has_processing_method || has_node_base
    }
}

impl Checker for NodeStructureChecker {
    fn name(&self) -> &'static str {
        "node-structure"
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[RuleCode::UseModelManagement, RuleCode::NonApiImport]
    }

    fn visit_module(
        &mut self,
        _node: Node<'_>,
        _ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
        self.node_classes.clear();
    }

    fn visit_import(
        &mut self,
        node: Node<'_>,
        ctx: &FileContext<'_>,
        sink: &mut dyn DiagnosticSink,
    ) {
        for name in import_names(node, ctx.content) {
            Self::check_import_path(&name.module, node, ctx, sink);
        }
    }

    fn visit_import_from(
        &mut self,
        node: Node<'_>,
        ctx: &FileContext<'_>,
        sink: &mut dyn DiagnosticSink,
    ) {
        if let Some(module) = import_from_module(node, ctx.content) {
            Self::check_import_path(&module, node, ctx, sink);
        }
    }

    fn visit_call(&mut self, node: Node<'_>, ctx: &FileContext<'_>, sink: &mut dyn DiagnosticSink) {
        let Some(func_name) = call_name(node, ctx.content) else {
            return;
        };

        for pattern in DEVICE_PATTERNS {
            if func_name.contains(pattern) {
                sink.emit(
                    RuleCode::UseModelManagement,
                    ctx.location(node),
                    vec![(*pattern).to_string()],
                );
                break;
            }
        }
    }

    fn visit_class_def(
        &mut self,
        node: Node<'_>,
        ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
        if Self::is_likely_node(node, ctx.content) {
            let name = node
                .child_by_field_name("name")
                .map(|n| node_text(n, ctx.content).to_string())
                .unwrap_or_default();
            self.node_classes.push(NodeCandidate {
                name,
                location: ctx.location(node),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodelint_core::{parse_module, run_checker, Diagnostic, DiagnosticBuffer};
    use std::path::Path;

    fn run(checker: &mut NodeStructureChecker, code: &str) -> Vec<Diagnostic> {
        let tree = parse_module(code).expect("Failed to parse");
        let ctx = FileContext::new(Path::new("test.py"), code, Path::new("."));
        let mut sink = DiagnosticBuffer::new();
        run_checker(checker, &tree, &ctx, &mut sink);
        sink.into_diagnostics()
    }

    fn check(code: &str) -> Vec<Diagnostic> {
        run(&mut NodeStructureChecker::new(), code)
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<RuleCode> {
        diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn schema_attrs_classify_candidate_without_methods() {
        let mut checker = NodeStructureChecker::new();
        run(
            &mut checker,
            r#"
class Upscaler:
    RETURN_TYPES = ("IMAGE",)
    FUNCTION = "upscale"
"#,
        );
        let names: Vec<_> = checker.node_classes().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Upscaler"]);
    }

    #[test]
    fn processing_method_classifies_candidate() {
        let mut checker = NodeStructureChecker::new();
        run(
            &mut checker,
            "class Worker:\n    def execute(self, image):\n        return image\n",
        );
        assert_eq!(checker.node_classes().len(), 1);
    }

    #[test]
    fn node_base_class_classifies_candidate() {
        let mut checker = NodeStructureChecker::new();
        run(&mut checker, "class Sharpen(BaseNode):\n    pass\n");
        assert_eq!(checker.node_classes().len(), 1);
    }

    #[test]
    fn decorated_classmethod_marker_counts() {
        let mut checker = NodeStructureChecker::new();
        run(
            &mut checker,
            r#"
class Loader:
    @classmethod
    def INPUT_TYPES(cls):
        return {}
"#,
        );
        assert_eq!(checker.node_classes().len(), 1);
    }

    #[test]
    fn plain_class_is_not_a_candidate() {
        let mut checker = NodeStructureChecker::new();
        run(
            &mut checker,
            "class Settings:\n    verbose = False\n    def load(self):\n        pass\n",
        );
        assert!(checker.node_classes().is_empty());
    }

    #[test]
    fn candidate_list_resets_between_files() {
        let mut checker = NodeStructureChecker::new();
        run(&mut checker, "class A(BaseNode):\n    pass\n");
        assert_eq!(checker.node_classes().len(), 1);
        run(&mut checker, "x = 1\n");
        assert!(checker.node_classes().is_empty());
    }

    #[test]
    fn candidates_drive_no_diagnostics() {
        let diagnostics = check(
            r#"
class Upscaler:
    RETURN_TYPES = ("IMAGE",)
    FUNCTION = "upscale"
"#,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn cuda_availability_check_is_flagged() {
        let diagnostics = check("import torch\nif torch.cuda.is_available():\n    pass\n");
        assert_eq!(codes(&diagnostics), vec![RuleCode::UseModelManagement]);
        assert!(diagnostics[0].message().contains("torch.cuda.is_available"));
    }

    #[test]
    fn device_constructor_matches_by_substring_once() {
        let diagnostics = check("device = torch.device(\"cuda:0\")\n");
        assert_eq!(codes(&diagnostics), vec![RuleCode::UseModelManagement]);
        assert_eq!(diagnostics[0].args, vec!["torch.device"]);
    }

    #[test]
    fn internal_from_import_is_flagged() {
        let diagnostics = check("from comfy.some_internal import thing\n");
        assert_eq!(codes(&diagnostics), vec![RuleCode::NonApiImport]);
        assert_eq!(diagnostics[0].args, vec!["comfy.some_internal"]);
    }

    #[test]
    fn public_api_import_is_allowed() {
        let diagnostics = check("from comfy_api.latest import IO\nimport folder_paths\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn internal_plain_import_is_flagged() {
        let diagnostics = check("import comfy.utils\n");
        assert_eq!(codes(&diagnostics), vec![RuleCode::NonApiImport]);
    }
}
