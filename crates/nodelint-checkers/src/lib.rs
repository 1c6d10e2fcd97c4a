//! # nodelint-checkers
//!
//! Built-in checkers for nodelint.
//!
//! | Checker | Rules | What it enforces |
//! |---------|-------|------------------|
//! | `folder-paths` | C9001, C9002, W9003 | filesystem access through `folder_paths` |
//! | `security` | E9101, E9102, W9103, E9104, W9105, E9106 | no eval/exec, shell caution, no custom routes, no obfuscation |
//! | `node-structure` | W9204, E9206 | device management API, public-API imports only |
//!
//! ## Usage
//!
//! ```ignore
//! use nodelint_core::Analyzer;
//! use nodelint_checkers::all_checkers;
//!
//! let mut builder = Analyzer::builder().root("./my_custom_node");
//! for checker in all_checkers(&config) {
//!     builder = builder.checker_box(checker);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod folder_paths;
mod node_structure;
mod security;

/// Shared pattern tables used by the checkers.
pub mod patterns;

pub use folder_paths::FolderPathsChecker;
pub use node_structure::{NodeCandidate, NodeStructureChecker};
pub use security::SecurityChecker;

/// Re-export core types for convenience.
pub use nodelint_core::{Checker, CheckerBox, Diagnostic, RuleCode, Severity};

use nodelint_core::Config;

/// Names of all built-in checkers, in registration order.
pub const CHECKER_NAMES: &[&str] = &["folder-paths", "security", "node-structure"];

/// Constructs one checker by name, honoring its options in `config`.
#[must_use]
pub fn checker_by_name(name: &str, config: &Config) -> Option<CheckerBox> {
    match name {
        "folder-paths" => {
            let allow_direct = config
                .checker("folder-paths")
                .map_or(false, |c| c.get_bool("allow_direct_fs_when_imported", false));
            Some(Box::new(
                FolderPathsChecker::new().allow_direct_fs_when_imported(allow_direct),
            ))
        }
        "security" => Some(Box::new(SecurityChecker::new())),
        "node-structure" => Some(Box::new(NodeStructureChecker::new())),
        _ => None,
    }
}

/// Constructs every built-in checker, honoring options in `config`.
#[must_use]
pub fn all_checkers(config: &Config) -> Vec<CheckerBox> {
    CHECKER_NAMES
        .iter()
        .filter_map(|name| checker_by_name(name, config))
        .collect()
}
