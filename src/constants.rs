//! Common constants used throughout skelinit.
//! Values identifying the default `python-package-template` skeleton live in
//! `config::Skeleton::default`; this module only holds fixed tables.

/// Supported skeleton configuration file names
pub const CONFIG_FILES: [&str; 3] = ["skeleton.json", "skeleton.yml", "skeleton.yaml"];

/// Extra exclusion patterns, one glob per line
pub const IGNORE_FILE: &str = ".initignore";

/// Directory names never rewritten or scanned, wherever they appear.
pub const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".venv",
    ".ruff_cache",
    ".pytest_cache",
    "__pycache__",
    "node_modules",
    "site",
    "dist",
    "build",
];

/// File names never rewritten: the lockfile, changelog history and coverage data.
pub const EXCLUDED_FILES: &[&str] = &["uv.lock", "CHANGELOG.md", ".coverage"];

/// Extensions of binary, media and archive files.
pub const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "gz", "zip", "whl", "tar", "inv", "so", "dylib", "pdf",
];

/// Common standard library modules a package must not shadow.
pub const STDLIB_MODULES: &[&str] = &[
    "abc",
    "ast",
    "asyncio",
    "base64",
    "collections",
    "contextlib",
    "copy",
    "csv",
    "dataclasses",
    "datetime",
    "decimal",
    "enum",
    "functools",
    "hashlib",
    "http",
    "importlib",
    "inspect",
    "io",
    "itertools",
    "json",
    "logging",
    "math",
    "multiprocessing",
    "operator",
    "os",
    "pathlib",
    "pickle",
    "platform",
    "pprint",
    "queue",
    "random",
    "re",
    "secrets",
    "shutil",
    "signal",
    "socket",
    "sqlite3",
    "string",
    "struct",
    "subprocess",
    "sys",
    "test",
    "textwrap",
    "threading",
    "time",
    "tomllib",
    "typing",
    "unittest",
    "uuid",
    "warnings",
    "xml",
    "zipfile",
    "email",
];

/// Marker pair bounding skeleton-only documentation.
pub const TEMPLATE_ONLY_START: &str = "<!-- TEMPLATE-ONLY-START -->";
pub const TEMPLATE_ONLY_END: &str = "<!-- TEMPLATE-ONLY-END -->";

/// Marker pair bounding the commented-out publishing steps of the release workflow.
pub const PUBLISHING_START: &str = "# PYPI-START";
pub const PUBLISHING_END: &str = "# PYPI-END";

/// Line in the pre-commit configuration the license hook is inserted before.
pub const PRE_COMMIT_HOOK_MARKER: &str = "  # Keep rev in sync with ruff version";

/// Content of the changelog after reset.
pub const CHANGELOG_HEADER: &str = "# CHANGELOG\n\n<!-- version list -->\n";

/// Version every initialized project starts from.
pub const INITIAL_VERSION: &str = "0.1.0";

/// Placeholder the import command uses for the module name.
pub const MODULE_PLACEHOLDER: &str = "{module}";
