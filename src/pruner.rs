//! Removal of skeleton-only scaffolding and of the documentation lines that
//! describe it.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use regex::Regex;

use crate::error::{Error, Result};
use crate::rewriter::{edit_file, markers};

/// Path fragments of pruned artifacts as they appear in structure listings.
const PRUNED_ARTIFACTS: [&str; 13] = [
    "template/",
    "conftest.py",
    "test_template_structure",
    "test_init_license",
    "test_init_flags",
    "e2e/",
    "Dockerfile",
    "verify-project.sh",
    "run-e2e.sh",
    "e2e.yml",
    ".dockerignore",
    "cli/",
    "cli-release.yml",
];

/// Comments that mark a line as a structure-listing entry for skeleton infrastructure.
const LISTING_HINTS: [&str; 13] = [
    "# Template",
    "# Fixtures",
    "# Docker",
    "# Parameterized",
    "# Container-side",
    "# Host-side",
    "# E2E",
    "# CLI",
    "Verifies template",
    "Integration tests",
    "Docker build",
    "Template-specific",
    "pypkgkit",
];

const E2E_SECTION_HEADING: &str = "### On Push to Main and Pull Request";
const TEMPLATE_TESTS_HEADING: &str = "## Template Tests";
const CLI_JOB_COMMENT: &str = "# CLI package";
const CLI_JOB: &str = "cli-tests";

/// Deletes each path under `root` that exists, files and directories alike.
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - the relative paths that were removed
pub fn remove_template_only_paths<P: AsRef<Path>>(root: P, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut removed = Vec::new();
    for relative in paths {
        let path = root.join(relative);
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else if path.exists() {
            fs::remove_file(&path)?;
        } else {
            continue;
        }
        debug!("Removed {}", relative.display());
        removed.push(relative.clone());
    }
    Ok(removed)
}

/// A documentation line describing pruned infrastructure names an artifact
/// and carries one of the listing hints.
pub fn is_template_doc_line(line: &str) -> bool {
    if line.trim().is_empty() {
        return false;
    }
    PRUNED_ARTIFACTS.iter().any(|artifact| line.contains(artifact))
        && LISTING_HINTS.iter().any(|hint| line.contains(hint))
}

/// Removes structure-listing lines of pruned artifacts and the e2e workflow
/// section from a markdown document.
pub fn remove_doc_references<P: AsRef<Path>>(document: P) -> Result<bool> {
    edit_file(document, |content| {
        let content = markers::remove_lines(content, is_template_doc_line);
        Ok(remove_e2e_section(&content))
    })
}

fn remove_e2e_section(content: &str) -> String {
    let mut result = Vec::new();
    let mut skipping = false;
    for line in content.split('\n') {
        if line.contains(E2E_SECTION_HEADING) && line.contains("e2e") {
            skipping = true;
            continue;
        }
        if skipping && line.starts_with("###") {
            skipping = false;
        }
        if !skipping {
            result.push(line);
        }
    }
    result.join("\n")
}

/// Removes the skeleton-tests section from the testing guide.
pub fn remove_template_tests_section<P: AsRef<Path>>(guide: P) -> Result<bool> {
    edit_file(guide, |content| Ok(markers::remove_heading_section(content, TEMPLATE_TESTS_HEADING)))
}

/// Removes the CLI test job, from its comment to the next top-level job, and
/// drops it from every `needs:` list.
pub fn strip_cli_job<P: AsRef<Path>>(ci_workflow: P) -> Result<bool> {
    let top_level_job = Regex::new(r"^  \S").map_err(|e| Error::ConfigError(e.to_string()))?;
    edit_file(ci_workflow, |content| {
        let mut kept = Vec::new();
        let mut skipping = false;
        for line in content.split('\n') {
            if line.trim().starts_with(CLI_JOB_COMMENT) {
                skipping = true;
                continue;
            }
            if skipping && line.trim() == format!("{CLI_JOB}:") {
                continue;
            }
            if skipping && top_level_job.is_match(line) {
                skipping = false;
            }
            if !skipping {
                kept.push(line.to_string());
            }
        }

        let cleaned: Vec<String> = kept
            .into_iter()
            .map(|line| {
                if line.contains("needs:") && line.contains(CLI_JOB) {
                    line.replace(&format!(", {CLI_JOB}"), "")
                        .replace(&format!("{CLI_JOB}, "), "")
                        .replace(CLI_JOB, "")
                } else {
                    line
                }
            })
            .collect();
        Ok(cleaned.join("\n"))
    })
}
