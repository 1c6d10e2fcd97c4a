//! Check command implementation.

use anyhow::{Context, Result};
use nodelint_checkers::{all_checkers, checker_by_name, SecurityChecker};
use nodelint_core::{Analyzer, Config, DiagnosticBuffer};
use std::path::Path;

use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    checkers_filter: Option<String>,
    exclude: Vec<String>,
    requirements: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(path, config_path)?;

    let mut builder = Analyzer::builder().root(path).config(config.clone());

    for pattern in exclude {
        builder = builder.exclude(pattern);
    }

    let checkers_to_add = if let Some(filter) = checkers_filter {
        let mut selected = Vec::new();
        for name in filter.split(',').map(str::trim) {
            match checker_by_name(name, &config) {
                Some(checker) => selected.push(checker),
                None => tracing::warn!("Unknown checker: {}", name),
            }
        }
        selected
    } else {
        all_checkers(&config)
    };

    for checker in checkers_to_add {
        builder = builder.checker_box(checker);
    }

    let mut analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {:?} with {} checkers",
        path,
        analyzer.checker_count()
    );

    let mut result = analyzer.analyze().context("Analysis failed")?;

    if let Some(requirements_path) = requirements {
        scan_requirements(requirements_path, &mut result)?;
    }

    super::output::print(&result, format)?;

    // Exit with error code if there are errors
    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Loads config per the resolver's priority order, falling back to defaults.
fn load_config(path: &Path, config_path: Option<&Path>) -> Result<Config> {
    match crate::config_resolver::resolve(path, config_path).path() {
        Some(resolved) => {
            tracing::info!("Using config: {}", resolved.display());
            Config::from_file(resolved)
                .with_context(|| format!("Failed to load config: {}", resolved.display()))
        }
        None => Ok(Config::default()),
    }
}

fn scan_requirements(path: &Path, result: &mut nodelint_core::LintResult) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read requirements: {}", path.display()))?;

    let mut sink = DiagnosticBuffer::new();
    SecurityChecker::new().scan_requirements(path, &text, &mut sink);
    result.diagnostics.extend(sink.into_diagnostics());
    Ok(())
}
