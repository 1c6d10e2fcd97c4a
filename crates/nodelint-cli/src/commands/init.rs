//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# nodelint configuration

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./my_custom_node"

# Glob patterns to exclude from analysis
exclude = [
    "**/.venv/**",
    "**/__pycache__/**",
]

# Checker configurations
# Each checker can be enabled/disabled and carries its own options

[checkers.folder-paths]
enabled = true
# Treat any filesystem call as acceptable once folder_paths is imported
# allow_direct_fs_when_imported = true

[checkers.security]
enabled = true

[checkers.node-structure]
enabled = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("nodelint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created nodelint.toml");
    println!("\nNext steps:");
    println!("  1. Edit nodelint.toml to configure checkers");
    println!("  2. Run: nodelint check");

    Ok(())
}
