//! Shared pattern library: known-bad call names, path regexes, prefixes.
//!
//! Everything here is process-wide immutable data, built once on first use
//! and shared read-only by all checkers. Matching is textual on dotted call
//! names; aliased stdlib calls (`from os import path`) are out of scope.

use once_cell::sync::Lazy;
use regex::Regex;

/// Filesystem functions that should go through `folder_paths`.
pub const FILESYSTEM_FUNCTIONS: &[&str] = &[
    "os.path.join",
    "os.path.exists",
    "os.path.isfile",
    "os.path.isdir",
    "os.path.dirname",
    "os.path.basename",
    "os.path.abspath",
    "os.path.realpath",
    "os.listdir",
    "os.makedirs",
    "os.mkdir",
    "os.walk",
    "os.getcwd",
    "glob.glob",
    "glob.iglob",
    "pathlib.Path",
    "shutil.copy",
    "shutil.copy2",
    "shutil.copytree",
    "shutil.move",
    "os.scandir",
    "os.stat",
    "os.lstat",
];

/// Path predicates that are safe once a base directory came from
/// `folder_paths`; they get benefit of the doubt whenever the helper
/// module is imported at all.
pub const SAFE_WITH_FOLDER_PATHS: &[&str] = &[
    "os.path.join",
    "os.path.exists",
    "os.path.isfile",
    "os.path.isdir",
];

/// Regexes matching string literals that look like hardcoded paths.
///
/// Applied to the literal's source text including quotes; ordered, first
/// match wins.
pub static HARDCODED_PATH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Relative paths like "../" or "./"
        r#"['"]\.\.?/"#,
        // Well-known project directories appearing as a path segment
        r#"['"][^'"]*/(models|input|output|temp)[^'"]*['"]"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid path pattern: {e}")))
    .collect()
});

/// Regexes matching code-obfuscation idioms in raw source text.
///
/// Ordered, first match wins, at most one finding per file.
pub static OBFUSCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"exec\s*\(\s*''\.join\(",
        r"eval\s*\(\s*''\.join\(",
        r"__import__\s*\(\s*''\.join\(",
        r"chr\s*\(\s*\d+\s*\)",
        r"bytes\.fromhex\s*\(",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid obfuscation pattern: {e}")))
    .collect()
});

/// Legacy shell-execution helpers flagged alongside the `subprocess.` namespace.
pub const SHELL_EXEC_FUNCTIONS: &[&str] = &["os.system", "os.popen", "commands.getoutput"];

/// Manual device-selection calls that bypass `model_management`.
///
/// Substring-matched against the dotted call name; ordered, first match wins.
pub const DEVICE_PATTERNS: &[&str] = &[
    "torch.cuda.is_available",
    "torch.cuda.device_count",
    "torch.cuda.set_device",
    "torch.cuda.current_device",
    "torch.device",
];

/// Public API module prefixes that are always allowed.
pub const API_PREFIXES: &[&str] = &["comfy_api"];

/// Internal framework prefixes that must not be imported from.
pub const INTERNAL_PREFIXES: &[&str] = &["comfy"];

/// Marker token naming the shared server singleton type.
pub const SERVER_SINGLETON_MARKER: &str = "PromptServer";

/// Matches direct URLs in requirement lines.
pub static REQUIREMENT_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bhttps?://\S+|\bgit\+\S+")
        .unwrap_or_else(|e| panic!("invalid url pattern: {e}"))
});

/// Per-function fix suggestion for disallowed filesystem calls.
#[must_use]
pub fn suggestion_for(func_name: &str) -> &'static str {
    match func_name {
        "os.path.join" => "Use folder_paths.get_directory() to get base paths first",
        "os.listdir" => "Use folder_paths.get_directory() then os.listdir()",
        "glob.glob" => "Use folder_paths.get_directory() then glob.glob()",
        "pathlib.Path" => "Use folder_paths.get_directory() / pathlib.Path()",
        "os.makedirs" => "Use folder_paths.get_directory() to get base paths",
        _ => "Consider using folder_paths.get_directory()",
    }
}

/// True if `module` reaches into an internal namespace without going
/// through a public API prefix.
#[must_use]
pub fn is_internal_import(module: &str) -> bool {
    let internal = INTERNAL_PREFIXES
        .iter()
        .any(|prefix| module.starts_with(&format!("{prefix}.")));
    let public = API_PREFIXES.iter().any(|prefix| module.starts_with(prefix));
    internal && !public
}
