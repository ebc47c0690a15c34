//! Error handling for skelinit.
//! Defines the error taxonomy and result type used throughout the initializer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a package name is refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("invalid package name '{name}': must start with a lowercase letter, contain only [a-z0-9_-] and end with a letter or digit")]
    InvalidFormat { name: String },

    #[error("'{name}' is the skeleton's own placeholder name, please choose another")]
    ReservedName { name: String },

    #[error("package name '{name}' would shadow the standard library module '{module}'")]
    StdlibCollision { name: String, module: String },
}

/// Custom error types for initializer operations.
///
/// Input errors are raised before any file is touched. Structural errors abort
/// the run. External failures are normally downgraded to report warnings by the
/// orchestrator, the variants exist so components can say what went wrong.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error(transparent)]
    Name(#[from] NameError),

    #[error("{field} is required (use {flag} in non-interactive mode)")]
    MissingRequiredField { field: String, flag: String },

    #[error("{field} must be a single line")]
    MultilineValueRejected { field: String },

    #[error("{field} cannot be empty")]
    EmptyValue { field: String },

    #[error("invalid email '{email}' (must contain @)")]
    InvalidEmail { email: String },

    #[error("invalid GitHub owner '{owner}': only alphanumeric characters or hyphens, not at either end")]
    InvalidGithubOwner { owner: String },

    #[error("unknown license key '{key}'. Available: {available}")]
    UnknownLicenseKey { key: String, available: String },

    #[error("invalid choice: {choice}")]
    InvalidChoice { choice: String },

    #[error("prompt failed: {0}")]
    PromptError(String),

    /// The user declined the confirmation step.
    #[error("aborted")]
    Aborted,

    #[error("license text for '{key}' is unavailable: {reason}")]
    LicenseFetchUnavailable { key: String, reason: String },

    #[error("command '{command}' failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("{metadata_file} not found in '{root}', run from the project root")]
    ProjectRootInvalid { root: String, metadata_file: String },

    #[error("package directory '{path}' not found. Has this skeleton already been initialized?")]
    PackageDirectoryMissing { path: PathBuf },

    #[error("cannot rename package directory: '{path}' already exists")]
    PackageDirectoryExists { path: PathBuf },

    #[error("marker '{marker}' not found in '{path}'")]
    MarkerNotFound { path: PathBuf, marker: String },

    #[error("marker '{start}' in '{path}' is never closed by '{end}'")]
    UnterminatedMarker { path: PathBuf, start: String, end: String },

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("ignore pattern error: {0}")]
    IgnorePatternError(String),

    #[error("template rendering failed: {0}")]
    TemplateError(#[from] minijinja::Error),

    #[error("cannot build the template context: {0}")]
    ContextError(#[from] serde_json::Error),

    #[error("failed to walk '{path}': {reason}")]
    WalkError { path: PathBuf, reason: String },
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error happened before any file was modified.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::Name(_)
                | Error::MissingRequiredField { .. }
                | Error::MultilineValueRejected { .. }
                | Error::EmptyValue { .. }
                | Error::InvalidEmail { .. }
                | Error::InvalidGithubOwner { .. }
                | Error::UnknownLicenseKey { .. }
                | Error::InvalidChoice { .. }
        )
    }
}

/// Default error handler that prints the error and exits the program.
///
/// A declined confirmation is not a failure and exits with status 0.
pub fn default_error_handler(err: Error) {
    if let Error::Aborted = err {
        println!("Aborted.");
        std::process::exit(0);
    }
    eprintln!("error: {err}");
    if err.is_input_error() {
        eprintln!("No files were changed. Re-run with corrected input.");
    }
    std::process::exit(1);
}
