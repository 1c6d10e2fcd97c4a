//! Checker trait and the per-file traversal driver.

use crate::catalog::RuleCode;
use crate::context::FileContext;
use crate::types::DiagnosticSink;
use tree_sitter::{Node, Tree};

/// A per-file checker driven by node-kind dispatch.
///
/// The driver calls `visit_module` on the module root first (checkers reset
/// their per-file state there), then dispatches one `visit_*` call per node
/// in depth-first order, then calls `leave_module` for end-of-file
/// decisions. All handlers default to no-ops.
///
/// Checkers keep whatever per-file state they need in `&mut self`; state
/// must never survive across files, which the `visit_module` reset
/// guarantees as long as the driver contract is honored.
///
/// # Example
///
/// ```ignore
/// struct NoPrint;
///
/// impl Checker for NoPrint {
///     fn name(&self) -> &'static str { "no-print" }
///     fn codes(&self) -> &'static [RuleCode] { &[RuleCode::SubprocessWarning] }
///
///     fn visit_call(&mut self, node: Node<'_>, ctx: &FileContext<'_>, sink: &mut dyn DiagnosticSink) {
///         if ast::call_name(node, ctx.content).as_deref() == Some("print") {
///             sink.emit(RuleCode::SubprocessWarning, ctx.location(node), vec![]);
///         }
///     }
/// }
/// ```
pub trait Checker {
    /// Kebab-case name of this checker (e.g. "folder-paths").
    fn name(&self) -> &'static str;

    /// Rule codes this checker can emit.
    fn codes(&self) -> &'static [RuleCode];

    /// Called once per file on the module root, before any other node.
    fn visit_module(
        &mut self,
        _node: Node<'_>,
        _ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
    }

    /// `import a, b as c` statements.
    fn visit_import(
        &mut self,
        _node: Node<'_>,
        _ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
    }

    /// `from x import y` statements.
    fn visit_import_from(
        &mut self,
        _node: Node<'_>,
        _ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
    }

    /// Call expressions.
    fn visit_call(
        &mut self,
        _node: Node<'_>,
        _ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
    }

    /// Attribute-access expressions.
    fn visit_attribute(
        &mut self,
        _node: Node<'_>,
        _ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
    }

    /// String literals.
    fn visit_constant(
        &mut self,
        _node: Node<'_>,
        _ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
    }

    /// Class definitions.
    fn visit_class_def(
        &mut self,
        _node: Node<'_>,
        _ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
    }

    /// Function definitions.
    fn visit_function_def(
        &mut self,
        _node: Node<'_>,
        _ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
    }

    /// Assignment statements.
    fn visit_assignment(
        &mut self,
        _node: Node<'_>,
        _ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
    }

    /// Called once per file after the last node.
    fn leave_module(
        &mut self,
        _node: Node<'_>,
        _ctx: &FileContext<'_>,
        _sink: &mut dyn DiagnosticSink,
    ) {
    }
}

/// Type alias for boxed Checker trait objects.
pub type CheckerBox = Box<dyn Checker>;

/// Runs one checker over one file's tree.
///
/// Performs a single synchronous pass: `visit_module` (reset), depth-first
/// dispatch, `leave_module`. Diagnostics go straight into `sink`.
pub fn run_checker(
    checker: &mut dyn Checker,
    tree: &Tree,
    ctx: &FileContext<'_>,
    sink: &mut dyn DiagnosticSink,
) {
    let root = tree.root_node();
    checker.visit_module(root, ctx, sink);
    walk(checker, root, ctx, sink);
    checker.leave_module(root, ctx, sink);
}

fn walk(
    checker: &mut dyn Checker,
    node: Node<'_>,
    ctx: &FileContext<'_>,
    sink: &mut dyn DiagnosticSink,
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        dispatch(checker, child, ctx, sink);
        walk(checker, child, ctx, sink);
    }
}

fn dispatch(
    checker: &mut dyn Checker,
    node: Node<'_>,
    ctx: &FileContext<'_>,
    sink: &mut dyn DiagnosticSink,
) {
    match node.kind() {
        "import_statement" => checker.visit_import(node, ctx, sink),
        "import_from_statement" => checker.visit_import_from(node, ctx, sink),
        "call" => checker.visit_call(node, ctx, sink),
        "attribute" => checker.visit_attribute(node, ctx, sink),
        "string" => checker.visit_constant(node, ctx, sink),
        "class_definition" => checker.visit_class_def(node, ctx, sink),
        "function_definition" => checker.visit_function_def(node, ctx, sink),
        "assignment" => checker.visit_assignment(node, ctx, sink),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_module;
    use crate::types::DiagnosticBuffer;
    use std::path::Path;

    #[derive(Default)]
    struct Recorder {
        events: Vec<&'static str>,
    }

    impl Checker for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }
        fn codes(&self) -> &'static [RuleCode] {
            &[]
        }
        fn visit_module(&mut self, _: Node<'_>, _: &FileContext<'_>, _: &mut dyn DiagnosticSink) {
            self.events.push("module");
        }
        fn visit_import(&mut self, _: Node<'_>, _: &FileContext<'_>, _: &mut dyn DiagnosticSink) {
            self.events.push("import");
        }
        fn visit_call(&mut self, _: Node<'_>, _: &FileContext<'_>, _: &mut dyn DiagnosticSink) {
            self.events.push("call");
        }
        fn visit_constant(&mut self, _: Node<'_>, _: &FileContext<'_>, _: &mut dyn DiagnosticSink) {
            self.events.push("string");
        }
        fn visit_class_def(&mut self, _: Node<'_>, _: &FileContext<'_>, _: &mut dyn DiagnosticSink) {
            self.events.push("class");
        }
        fn leave_module(&mut self, _: Node<'_>, _: &FileContext<'_>, _: &mut dyn DiagnosticSink) {
            self.events.push("leave");
        }
    }

    #[test]
    fn dispatch_order_wraps_module_events_around_body() {
        let code = "import os\n\nclass Loader:\n    def run(self):\n        return open(\"x\")\n";
        let tree = parse_module(code).expect("parse");
        let ctx = FileContext::new(Path::new("test.py"), code, Path::new("."));
        let mut sink = DiagnosticBuffer::new();
        let mut recorder = Recorder::default();

        run_checker(&mut recorder, &tree, &ctx, &mut sink);

        assert_eq!(recorder.events.first(), Some(&"module"));
        assert_eq!(recorder.events.last(), Some(&"leave"));
        assert!(recorder.events.contains(&"import"));
        assert!(recorder.events.contains(&"class"));
        assert!(recorder.events.contains(&"call"));
        assert!(recorder.events.contains(&"string"));
    }

    #[test]
    fn nested_calls_are_each_dispatched() {
        let code = "eval(exec(x))\n";
        let tree = parse_module(code).expect("parse");
        let ctx = FileContext::new(Path::new("test.py"), code, Path::new("."));
        let mut sink = DiagnosticBuffer::new();
        let mut recorder = Recorder::default();

        run_checker(&mut recorder, &tree, &ctx, &mut sink);

        let calls = recorder.events.iter().filter(|e| **e == "call").count();
        assert_eq!(calls, 2);
    }
}
