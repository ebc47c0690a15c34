//! Post-initialization checks. Every problem becomes a warning; nothing here
//! aborts the run.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};

use crate::ignore::{FileFailure, FileSet};
use crate::toolchain::Toolchain;

/// Outcome of a run: `passed` holds exactly when there are no warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub passed: bool,
    pub warnings: Vec<String>,
}

/// Builds the final report from the warnings collected over the run.
pub fn aggregate(warnings: Vec<String>) -> ValidationReport {
    ValidationReport { passed: warnings.is_empty(), warnings }
}

/// Scans the files of the set for any of `patterns`.
/// Files that are not valid UTF-8 are skipped.
///
/// # Returns
/// * `Vec<PathBuf>` - relative paths of the files with leftovers, sorted
pub fn find_stale_references<S: AsRef<str>>(files: &FileSet, patterns: &[S]) -> Vec<PathBuf> {
    let mut stale = Vec::new();

    for (relative, path) in files.iter() {
        let content = match fs::read(&path).map(String::from_utf8) {
            Ok(Ok(content)) => content,
            Ok(Err(_)) => {
                trace!("Skipping non UTF-8 file {}", relative.display());
                continue;
            }
            Err(e) => {
                debug!("Cannot read {}: {e}", relative.display());
                continue;
            }
        };
        if patterns.iter().any(|p| content.contains(p.as_ref())) {
            stale.push(relative.to_path_buf());
        }
    }

    stale
}

/// Formats the stale-reference warning, or `None` when the tree is clean.
pub fn stale_references_warning(stale: &[PathBuf]) -> Option<String> {
    if stale.is_empty() {
        return None;
    }
    let listing: String = stale.iter().map(|p| format!("\n    {}", p.display())).collect();
    Some(format!("Stale template references found in:{listing}"))
}

/// Formats the warning for paths the scan could not walk into.
pub fn unscanned_paths_warning(unreadable: &[FileFailure]) -> Option<String> {
    if unreadable.is_empty() {
        return None;
    }
    let listing: String = unreadable.iter().map(|f| format!("\n    {f}")).collect();
    Some(format!("Could not scan for stale template references in:{listing}"))
}

/// Runs the import check, logging the failure reason.
pub fn verify_importable(toolchain: &dyn Toolchain, root: &Path, module: &str) -> bool {
    match toolchain.verify_importable(root, module) {
        Ok(()) => true,
        Err(e) => {
            warn!("Import check for '{module}' failed: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_passes_only_without_warnings() {
        assert!(aggregate(Vec::new()).passed);
        let report = aggregate(vec!["LICENSE needs attention".to_string()]);
        assert!(!report.passed);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_stale_references_warning_lists_paths() {
        assert_eq!(stale_references_warning(&[]), None);
        let warning = stale_references_warning(&[PathBuf::from("docs/a.md")]).unwrap();
        assert_eq!(warning, "Stale template references found in:\n    docs/a.md");
    }

    #[test]
    fn test_unscanned_paths_warning_lists_reasons() {
        assert_eq!(unscanned_paths_warning(&[]), None);
        let failure = FileFailure { path: PathBuf::from("private"), reason: "Permission denied".to_string() };
        assert_eq!(
            unscanned_paths_warning(&[failure]).unwrap(),
            "Could not scan for stale template references in:\n    private: Permission denied"
        );
    }
}
