//! Python syntax tree helpers: parsing and best-effort name resolution.
//!
//! Name resolution here is deliberately textual. Flattening a call target to
//! a dotted string needs no symbol table and stays cheap; targets that are
//! not plain identifier/attribute chains resolve to `None` and are skipped
//! by checkers rather than reported.

use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

/// Errors producing a syntax tree from source text.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The Python grammar could not be loaded into the parser.
    #[error("Failed to load Python grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser produced no tree (cancelled or invalid input).
    #[error("Parser produced no syntax tree")]
    NoTree,
}

/// Parses one Python module into a syntax tree.
///
/// A tree containing error nodes is still returned; checkers degrade to
/// under-reporting on malformed regions instead of aborting.
///
/// # Errors
///
/// Returns an error if the grammar cannot be loaded or parsing yields
/// no tree at all.
pub fn parse_module(source: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_python::LANGUAGE.into())?;
    parser.parse(source, None).ok_or(ParseError::NoTree)
}

/// Source text of a node, or `""` if the span is not valid UTF-8.
#[must_use]
pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Flattens an identifier/attribute chain into a dotted name.
///
/// `os.path.join` resolves to `"os.path.join"`; anything containing a call,
/// subscript, or other expression resolves to `None`.
#[must_use]
pub fn dotted_name(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "identifier" => Some(node_text(node, source).to_string()),
        "attribute" => {
            let object = node.child_by_field_name("object")?;
            let attr = node.child_by_field_name("attribute")?;
            let base = dotted_name(object, source)?;
            Some(format!("{base}.{}", node_text(attr, source)))
        }
        _ => None,
    }
}

/// Fully-qualified textual name of a call target, best-effort.
#[must_use]
pub fn call_name(call: Node<'_>, source: &str) -> Option<String> {
    let func = call.child_by_field_name("function")?;
    dotted_name(func, source)
}

/// Name of the attribute being accessed (the rightmost segment).
#[must_use]
pub fn attribute_name<'s>(attribute: Node<'_>, source: &'s str) -> Option<&'s str> {
    attribute
        .child_by_field_name("attribute")
        .map(|n| node_text(n, source))
}

/// One name bound by an `import` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedName {
    /// Dotted module path as written.
    pub module: String,
    /// Local alias, if `as` was used.
    pub alias: Option<String>,
}

/// Extracts the names bound by an `import` statement.
#[must_use]
pub fn import_names(import: Node<'_>, source: &str) -> Vec<ImportedName> {
    let mut cursor = import.walk();
    let mut names = Vec::new();

    for child in import.children_by_field_name("name", &mut cursor) {
        match child.kind() {
            "dotted_name" => names.push(ImportedName {
                module: node_text(child, source).to_string(),
                alias: None,
            }),
            "aliased_import" => {
                let Some(name) = child.child_by_field_name("name") else {
                    continue;
                };
                names.push(ImportedName {
                    module: node_text(name, source).to_string(),
                    alias: child
                        .child_by_field_name("alias")
                        .map(|a| node_text(a, source).to_string()),
                });
            }
            _ => {}
        }
    }

    names
}

/// Module path of a `from <module> import ...` statement.
///
/// Relative imports (`from . import x`) yield the textual form as written
/// (e.g. `"."` or `".utils"`).
#[must_use]
pub fn import_from_module(import_from: Node<'_>, source: &str) -> Option<String> {
    import_from
        .child_by_field_name("module_name")
        .map(|n| node_text(n, source).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_of_kind<'t>(tree: &'t Tree, kind: &str) -> Node<'t> {
        fn find<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
            if node.kind() == kind {
                return Some(node);
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if let Some(found) = find(child, kind) {
                    return Some(found);
                }
            }
            None
        }
        find(tree.root_node(), kind).unwrap_or_else(|| panic!("no {kind} node"))
    }

    #[test]
    fn parse_produces_module_root() {
        let tree = parse_module("x = 1\n").expect("parse");
        assert_eq!(tree.root_node().kind(), "module");
    }

    #[test]
    fn call_name_flattens_attribute_chain() {
        let code = "os.path.join(a, b)\n";
        let tree = parse_module(code).expect("parse");
        let call = first_of_kind(&tree, "call");
        assert_eq!(call_name(call, code).as_deref(), Some("os.path.join"));
    }

    #[test]
    fn call_name_is_none_for_subscript_target() {
        let code = "handlers[0]()\n";
        let tree = parse_module(code).expect("parse");
        let call = first_of_kind(&tree, "call");
        assert_eq!(call_name(call, code), None);
    }

    #[test]
    fn import_names_capture_alias() {
        let code = "import folder_paths as fp\n";
        let tree = parse_module(code).expect("parse");
        let import = first_of_kind(&tree, "import_statement");
        let names = import_names(import, code);
        assert_eq!(
            names,
            vec![ImportedName {
                module: "folder_paths".to_string(),
                alias: Some("fp".to_string()),
            }]
        );
    }

    #[test]
    fn import_names_handle_multiple_modules() {
        let code = "import os, glob\n";
        let tree = parse_module(code).expect("parse");
        let import = first_of_kind(&tree, "import_statement");
        let modules: Vec<_> = import_names(import, code)
            .into_iter()
            .map(|n| n.module)
            .collect();
        assert_eq!(modules, vec!["os", "glob"]);
    }

    #[test]
    fn import_from_extracts_module_path() {
        let code = "from comfy.model_management import get_torch_device\n";
        let tree = parse_module(code).expect("parse");
        let import = first_of_kind(&tree, "import_from_statement");
        assert_eq!(
            import_from_module(import, code).as_deref(),
            Some("comfy.model_management")
        );
    }
}
