//! Analyzer driving checker execution over a file set.

use crate::ast::{parse_module, ParseError};
use crate::checker::{run_checker, CheckerBox};
use crate::config::Config;
use crate::context::FileContext;
use crate::types::{DiagnosticBuffer, LintResult};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a Python source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    checkers: Vec<CheckerBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a checker to the analyzer.
    #[must_use]
    pub fn checker<C: crate::Checker + 'static>(mut self, checker: C) -> Self {
        self.checkers.push(Box::new(checker));
        self
    }

    /// Adds a boxed checker to the analyzer.
    #[must_use]
    pub fn checker_box(mut self, checker: CheckerBox) -> Self {
        self.checkers.push(checker);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        if let Some(ref config) = self.config {
            exclude_patterns.extend(config.analyzer.exclude.clone());
        }

        if exclude_patterns.is_empty() {
            exclude_patterns.extend([
                "**/.venv/**".to_string(),
                "**/__pycache__/**".to_string(),
            ]);
        }

        Ok(Analyzer {
            root,
            checkers: self.checkers,
            exclude_patterns,
            config: self.config.unwrap_or_default(),
        })
    }
}

/// Orchestrates checker execution over a directory of Python files.
///
/// Use [`Analyzer::builder()`] to construct an instance. Checkers are
/// stateful per file; `analyze` takes `&mut self` because each checker's
/// per-file state is reset and rebuilt for every file visited.
pub struct Analyzer {
    root: PathBuf,
    checkers: Vec<CheckerBox>,
    exclude_patterns: Vec<String>,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered checkers.
    #[must_use]
    pub fn checker_count(&self) -> usize {
        self.checkers.len()
    }

    /// Analyzes all files and returns the results.
    ///
    /// A file that cannot be read or parsed is logged and skipped; the
    /// rest of the file set is still analyzed.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails.
    pub fn analyze(&mut self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to analyze", files.len());

        for file_path in &files {
            match Self::analyze_file(
                &mut self.checkers,
                &self.config,
                &self.root,
                file_path,
            ) {
                Ok(diagnostics) => {
                    result.diagnostics.extend(diagnostics);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                }
                Err(AnalyzerError::Io(e)) => {
                    warn!("Failed to read {}: {}", file_path.display(), e);
                }
                Err(e) => return Err(e),
            }
        }

        // Deterministic output: order by file, then position
        result.diagnostics.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });

        info!(
            "Analysis complete: {} diagnostics in {} files",
            result.diagnostics.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Analyzes a single file with every enabled checker.
    fn analyze_file(
        checkers: &mut [CheckerBox],
        config: &Config,
        root: &Path,
        path: &Path,
    ) -> Result<Vec<crate::Diagnostic>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let tree = parse_module(&content).map_err(|e: ParseError| AnalyzerError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let ctx = FileContext::new(path, &content, root);
        let mut sink = DiagnosticBuffer::new();

        for checker in checkers.iter_mut() {
            if !config.is_checker_enabled(checker.name()) {
                debug!("Skipping disabled checker: {}", checker.name());
                continue;
            }
            run_checker(checker.as_mut(), &tree, &ctx, &mut sink);
        }

        Ok(sink.into_diagnostics())
    }

    /// Discovers all Python source files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let pattern = format!("{}/**/*.py", self.root.display());
        let mut files = Vec::new();

        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(|e| AnalyzerError::Io(e.into_error()))?;

            if self.should_exclude(&path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path);
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/__pycache__/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty() && path_str.contains(&normalized_pattern) {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RuleCode;
    use crate::checker::Checker;
    use crate::types::DiagnosticSink;
    use std::io::Write;
    use tree_sitter::Node;

    struct FlagEveryCall;

    impl Checker for FlagEveryCall {
        fn name(&self) -> &'static str {
            "flag-every-call"
        }
        fn codes(&self) -> &'static [RuleCode] {
            &[RuleCode::SubprocessWarning]
        }
        fn visit_call(
            &mut self,
            node: Node<'_>,
            ctx: &FileContext<'_>,
            sink: &mut dyn DiagnosticSink,
        ) {
            sink.emit(
                RuleCode::SubprocessWarning,
                ctx.location(node),
                vec!["call".to_string()],
            );
        }
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/.venv/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.checker_count(), 0);
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/.venv/**")
            .exclude("**/__pycache__/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/foo/.venv/lib/site.py")));
        assert!(analyzer.should_exclude(Path::new("/foo/__pycache__/mod.py")));
        assert!(!analyzer.should_exclude(Path::new("/foo/nodes/loader.py")));
    }

    #[test]
    fn analyze_walks_directory_and_skips_unparseable_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = dir.path().join("node.py");
        std::fs::write(&good, "x = open(\"f\")\n").expect("write");
        // Not UTF-8: read_to_string fails, file is skipped
        let mut bad = std::fs::File::create(dir.path().join("broken.py")).expect("create");
        bad.write_all(&[0xff, 0xfe, 0x00]).expect("write bytes");

        let mut analyzer = Analyzer::builder()
            .root(dir.path())
            .checker(FlagEveryCall)
            .build()
            .expect("build");

        let result = analyzer.analyze().expect("analyze");
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, RuleCode::SubprocessWarning);
    }

    #[test]
    fn diagnostics_are_sorted_by_file_then_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("b.py"), "f()\n").expect("write");
        std::fs::write(dir.path().join("a.py"), "g()\nh()\n").expect("write");

        let mut analyzer = Analyzer::builder()
            .root(dir.path())
            .checker(FlagEveryCall)
            .build()
            .expect("build");

        let result = analyzer.analyze().expect("analyze");
        let files: Vec<_> = result
            .diagnostics
            .iter()
            .map(|d| d.location.file.clone())
            .collect();
        assert_eq!(
            files,
            vec![
                PathBuf::from("a.py"),
                PathBuf::from("a.py"),
                PathBuf::from("b.py")
            ]
        );
        assert!(result.diagnostics[0].location.line <= result.diagnostics[1].location.line);
    }
}
