//! Static message catalogue mapping rule codes to ids, names, and templates.
//!
//! Every diagnostic kind the engine can emit is declared here exactly once.
//! Checkers refer to rules by [`RuleCode`] variant; ids, severities, and
//! message templates are never recomputed at analysis time.

use crate::types::Severity;

/// Identifies one diagnostic kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCode {
    /// C9001: direct filesystem access that should go through `folder_paths`.
    UseFolderPaths,
    /// C9002: string literal that looks like a hardcoded project path.
    HardcodedPath,
    /// W9003: filesystem operations without importing `folder_paths`.
    MissingFolderPaths,
    /// E9101: use of `eval()`.
    NoEval,
    /// E9102: use of `exec()`.
    NoExec,
    /// W9103: direct URL in a requirements file.
    NoDirectUrls,
    /// E9104: code obfuscation idiom detected in the file source.
    NoObfuscation,
    /// W9105: subprocess or shell-execution call.
    SubprocessWarning,
    /// E9106: route/app access on the shared server singleton.
    NoCustomRoutes,
    /// W9204: manual device selection bypassing `model_management`.
    UseModelManagement,
    /// E9206: import reaching into an internal framework namespace.
    NonApiImport,
}

/// One catalogue entry: short id, kebab name, severity, message template.
///
/// Templates use `{}` placeholders filled left-to-right from the
/// diagnostic's argument strings.
#[derive(Debug, Clone, Copy)]
pub struct MessageSpec {
    /// Short alphanumeric id (e.g. "C9001").
    pub id: &'static str,
    /// Kebab-case rule name (e.g. "use-folder-paths").
    pub name: &'static str,
    /// Severity of diagnostics carrying this code.
    pub severity: Severity,
    /// Human message template.
    pub template: &'static str,
    /// Longer rationale shown by `list-rules`.
    pub description: &'static str,
}

impl RuleCode {
    /// All declared rule codes, in catalogue order.
    pub const ALL: &'static [RuleCode] = &[
        Self::UseFolderPaths,
        Self::HardcodedPath,
        Self::MissingFolderPaths,
        Self::NoEval,
        Self::NoExec,
        Self::NoDirectUrls,
        Self::NoObfuscation,
        Self::SubprocessWarning,
        Self::NoCustomRoutes,
        Self::UseModelManagement,
        Self::NonApiImport,
    ];

    /// Returns the catalogue entry for this code.
    #[must_use]
    pub fn spec(self) -> &'static MessageSpec {
        match self {
            Self::UseFolderPaths => &MessageSpec {
                id: "C9001",
                name: "use-folder-paths",
                severity: Severity::Warning,
                template:
                    "Direct filesystem access detected: {}. Use folder_paths.get_directory() instead",
                description:
                    "Nodes should use the folder_paths module for filesystem operations to \
                     ensure compatibility across environments and cloud deployments.",
            },
            Self::HardcodedPath => &MessageSpec {
                id: "C9002",
                name: "hardcoded-path",
                severity: Severity::Warning,
                template:
                    "Hardcoded path detected: {}. Use folder_paths.get_directory() to get base paths",
                description:
                    "Hardcoded paths should be avoided. Use folder_paths.get_directory() to \
                     get base directories like 'models', 'input', 'output'.",
            },
            Self::MissingFolderPaths => &MessageSpec {
                id: "W9003",
                name: "missing-folder-paths",
                severity: Severity::Warning,
                template: "Consider importing folder_paths when using filesystem operations",
                description:
                    "File contains filesystem operations but doesn't import folder_paths. \
                     Add 'import folder_paths' to use the host's path utilities.",
            },
            Self::NoEval => &MessageSpec {
                id: "E9101",
                name: "no-eval",
                severity: Severity::Error,
                template: "Use of eval() detected. This is a security risk and not allowed in nodes",
                description:
                    "eval() can execute arbitrary code and poses serious security risks.",
            },
            Self::NoExec => &MessageSpec {
                id: "E9102",
                name: "no-exec",
                severity: Severity::Error,
                template: "Use of exec() detected. This is a security risk and not allowed in nodes",
                description:
                    "exec() can execute arbitrary code and poses serious security risks.",
            },
            Self::NoDirectUrls => &MessageSpec {
                id: "W9103",
                name: "no-direct-urls",
                severity: Severity::Warning,
                template: "Direct URL in requirements detected: {}. Use package names instead",
                description:
                    "Requirements files should use package names and version specifiers \
                     rather than direct URLs, for security and reproducibility.",
            },
            Self::NoObfuscation => &MessageSpec {
                id: "E9104",
                name: "no-obfuscation",
                severity: Severity::Error,
                template: "Code obfuscation detected. Nodes must be readable and maintainable",
                description:
                    "Obfuscated code is not allowed in nodes for security and \
                     maintainability reasons.",
            },
            Self::SubprocessWarning => &MessageSpec {
                id: "W9105",
                name: "subprocess-warning",
                severity: Severity::Warning,
                template: "subprocess call detected: {}. Be cautious with system commands",
                description:
                    "Subprocess calls can be security risks. Ensure proper input validation \
                     and consider whether the operation is necessary.",
            },
            Self::NoCustomRoutes => &MessageSpec {
                id: "E9106",
                name: "no-custom-routes",
                severity: Severity::Error,
                template:
                    "Custom route registration detected: {}. Nodes must not add custom server routes",
                description:
                    "Adding routes via the PromptServer singleton is prohibited. Custom \
                     nodes must not modify the web server routing.",
            },
            Self::UseModelManagement => &MessageSpec {
                id: "W9204",
                name: "use-model-management",
                severity: Severity::Warning,
                template:
                    "Manual device handling detected: {}. Use model_management.get_torch_device() instead",
                description:
                    "Use the host's model_management.get_torch_device() instead of manual \
                     device detection for better compatibility.",
            },
            Self::NonApiImport => &MessageSpec {
                id: "E9206",
                name: "non-api-import",
                severity: Severity::Error,
                template: "Direct import from non-API module: {}",
                description:
                    "Avoid importing from internal framework modules. Use only public API \
                     modules to ensure forward compatibility.",
            },
        }
    }

    /// Short alphanumeric id (e.g. "C9001").
    #[must_use]
    pub fn id(self) -> &'static str {
        self.spec().id
    }

    /// Kebab-case rule name (e.g. "use-folder-paths").
    #[must_use]
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Severity for this rule.
    #[must_use]
    pub fn severity(self) -> Severity {
        self.spec().severity
    }

    /// Renders the message template with the given arguments.
    ///
    /// `{}` placeholders are substituted left-to-right; missing arguments
    /// render as empty strings, surplus arguments are ignored.
    #[must_use]
    pub fn render(self, args: &[String]) -> String {
        let template = self.spec().template;
        let mut out = String::with_capacity(template.len());
        let mut parts = template.split("{}");
        if let Some(first) = parts.next() {
            out.push_str(first);
        }
        for (i, part) in parts.enumerate() {
            out.push_str(args.get(i).map_or("", String::as_str));
            out.push_str(part);
        }
        out
    }

    /// Looks up a rule code by its id or kebab name.
    #[must_use]
    pub fn lookup(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.id() == key || c.name() == key)
    }
}
