//! Documentation edits: README, agent guide, docs index and the release workflow.

use std::fs;
use std::path::Path;

use super::{edit_file, markers, replace_in_file};
use crate::constants::{PUBLISHING_END, PUBLISHING_START, TEMPLATE_ONLY_END, TEMPLATE_ONLY_START};
use crate::error::Result;

const COVERAGE_BADGE_HOST: &str = "codecov.io";
const STRUCTURE_HINT: &str = "# Package source (rename this)";
const SKELETON_LICENSE_NOTE: &str = "Apache-2.0 license (configurable via init.py)";

/// Removes coverage badges and swaps the skeleton blurb for the project description.
pub fn update_readme_intro<P: AsRef<Path>>(readme: P, skeleton_blurb: &str, description: &str) -> Result<bool> {
    edit_file(readme, |content| {
        let content = markers::remove_lines(content, |line| line.contains(COVERAGE_BADGE_HOST));
        Ok(content.replace(skeleton_blurb, description).replace(STRUCTURE_HINT, "# Package source"))
    })
}

/// Replaces the skeleton-only section of a document with `replacement`.
/// Missing documents are skipped; a present document must carry the markers.
pub fn replace_template_section<P: AsRef<Path>>(document: P, replacement: &str) -> Result<bool> {
    let path = document.as_ref();
    edit_file(path, |content| {
        markers::strip_marked_section(path, content, TEMPLATE_ONLY_START, TEMPLATE_ONLY_END, Some(replacement))
    })
}

/// Rewrites the skeleton's license note and drops the lines describing the
/// initializer scripts from a document.
pub fn strip_initializer_references<P: AsRef<Path>>(document: P, spdx_id: &str) -> Result<bool> {
    edit_file(document, |content| {
        let content = content.replace(SKELETON_LICENSE_NOTE, &format!("{spdx_id} license"));
        Ok(markers::remove_lines(&content, |line| {
            (line.contains("init.sh") || line.contains("init.py"))
                && (line.contains("Interactive") || line.contains("initialization"))
        }))
    })
}

pub fn write_docs_index<P: AsRef<Path>>(docs_index: P, rendered: &str) -> Result<bool> {
    let path = docs_index.as_ref();
    if !path.is_file() {
        return Ok(false);
    }
    fs::write(path, rendered)?;
    Ok(true)
}

/// Uncomments the publishing steps of the release workflow.
pub fn enable_publishing<P: AsRef<Path>>(release_workflow: P) -> Result<bool> {
    let path = release_workflow.as_ref();
    edit_file(path, |content| {
        let content = markers::uncomment_marked_block(path, content, PUBLISHING_START, PUBLISHING_END)?;
        Ok(content.replace("Run init.py with --pypi, or uncomment", "Uncomment"))
    })
}

/// Removes the initializer hint from the release workflow when publishing stays disabled.
pub fn strip_publishing_hint<P: AsRef<Path>>(release_workflow: P) -> Result<bool> {
    replace_in_file(release_workflow, "Run init.py with --pypi, or uncomment", "Uncomment")
}
