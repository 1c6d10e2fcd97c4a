//! # nodelint-core
//!
//! Core engine for linting Python custom-node plugins.
//!
//! This crate provides the foundational pieces for building node linters:
//!
//! - [`RuleCode`] and the static message catalogue
//! - [`Checker`] trait with per-node-kind dispatch over tree-sitter trees
//! - [`DiagnosticSink`] for collecting findings as checkers emit them
//! - [`Analyzer`] for orchestrating checker execution over a file set
//!
//! ## Example
//!
//! ```ignore
//! use nodelint_core::Analyzer;
//!
//! let mut analyzer = Analyzer::builder()
//!     .root("./my_custom_node")
//!     .checker(MyChecker::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! result.print_report();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod catalog;
mod checker;
mod config;
mod context;
mod types;

/// Python syntax tree helpers for checker implementations.
pub mod ast;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use ast::{parse_module, ParseError};
pub use catalog::{MessageSpec, RuleCode};
pub use checker::{run_checker, Checker, CheckerBox};
pub use config::{AnalyzerConfig, CheckerConfig, Config, ConfigError};
pub use context::FileContext;
pub use types::{
    Diagnostic, DiagnosticBuffer, DiagnosticSink, LintResult, Location, RenderedDiagnostic,
    Severity,
};
