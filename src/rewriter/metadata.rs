//! Project metadata edits: version and changelog reset, keyword and TODO
//! cleanup, license fields and generated license files.

use std::fs;
use std::path::Path;

use regex::{NoExpand, Regex};

use super::{edit_file, markers, replace_in_file};
use crate::constants::{CHANGELOG_HEADER, INITIAL_VERSION, PRE_COMMIT_HOOK_MARKER};
use crate::error::{Error, Result};
use crate::license::map_to_classifier;

/// License the skeleton ships with.
pub const SKELETON_SPDX: &str = "Apache-2.0";
pub const SKELETON_LICENSE_FIELD: &str = "license = {text = \"Apache-2.0\"}";
pub const SKELETON_CLASSIFIER: &str = "License :: OSI Approved :: Apache Software License";
pub const SKELETON_RECIPE_LICENSE: &str = "license: Apache-2.0";
pub const SKELETON_KEYWORDS: &str = "keywords = [\"template\", \"python\", \"uv\", \"ruff\", \"pyright\"]";
pub const SKELETON_TODO: &str = "# TODO: Update the --upgrade-package";

const INSERT_LICENSE_HOOK: &str = "  - repo: https://github.com/Lucas-C/pre-commit-hooks
    rev: v1.5.5
    hooks:
      - id: insert-license
        files: \\.py$
        args:
          - --license-filepath=LICENSE_HEADER
          - --comment-style=#
          - --detect-license-in-X-top-lines=5
";

/// Sets the top-level `version = "..."` line to the initial version.
pub fn reset_version<P: AsRef<Path>>(metadata_file: P) -> Result<bool> {
    let version = Regex::new(r#"(?m)^version = ".*"$"#).map_err(|e| Error::ConfigError(e.to_string()))?;
    let replacement = format!("version = \"{INITIAL_VERSION}\"");
    edit_file(metadata_file, |content| {
        Ok(version.replacen(content, 1, NoExpand(&replacement)).into_owned())
    })
}

/// Overwrites the changelog with an empty header.
pub fn reset_changelog<P: AsRef<Path>>(changelog: P) -> Result<()> {
    fs::write(changelog, CHANGELOG_HEADER)?;
    Ok(())
}

pub fn clear_keywords<P: AsRef<Path>>(metadata_file: P) -> Result<bool> {
    replace_in_file(metadata_file, SKELETON_KEYWORDS, "keywords = []")
}

pub fn remove_todo_comments<P: AsRef<Path>>(metadata_file: P) -> Result<bool> {
    edit_file(metadata_file, |content| {
        Ok(markers::remove_lines(content, |line| line.contains(SKELETON_TODO)))
    })
}

/// Writes the license identifier into the metadata file and replaces the
/// classifier. When the identifier has no classifier the stale one is removed
/// instead.
pub fn update_metadata_license<P: AsRef<Path>>(metadata_file: P, spdx_id: &str) -> Result<()> {
    let metadata_file = metadata_file.as_ref();
    replace_in_file(metadata_file, SKELETON_LICENSE_FIELD, &format!("license = {{text = \"{spdx_id}\"}}"))?;

    match map_to_classifier(spdx_id) {
        Some(classifier) => {
            replace_in_file(metadata_file, SKELETON_CLASSIFIER, classifier)?;
        }
        None => {
            edit_file(metadata_file, |content| {
                Ok(markers::remove_lines(content, |line| line.contains(SKELETON_CLASSIFIER)))
            })?;
        }
    }
    Ok(())
}

/// Writes the license identifier into the packaging recipe.
pub fn update_recipe_license<P: AsRef<Path>>(recipe_file: P, spdx_id: &str) -> Result<bool> {
    replace_in_file(recipe_file, SKELETON_RECIPE_LICENSE, &format!("license: {spdx_id}"))
}

pub fn write_license<P: AsRef<Path>>(license_file: P, text: &str) -> Result<()> {
    let mut text = text.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    fs::write(license_file, text)?;
    Ok(())
}

pub fn write_license_header<P: AsRef<Path>>(header_file: P, rendered: &str) -> Result<()> {
    fs::write(header_file, rendered)?;
    Ok(())
}

/// Adds the insert-license hook to the pre-commit configuration. Absent
/// configuration files are skipped.
pub fn add_insert_license_hook<P: AsRef<Path>>(pre_commit_file: P) -> Result<bool> {
    let path = pre_commit_file.as_ref();
    edit_file(path, |content| markers::inject_block(path, content, PRE_COMMIT_HOOK_MARKER, INSERT_LICENSE_HOOK))
}

/// Comment lines (`# ...`) used as per-file license headers.
pub fn license_header_lines(year: i32, author: &str, spdx_id: &str) -> Vec<String> {
    vec![format!("# Copyright {year} {author}"), format!("# SPDX-License-Identifier: {spdx_id}")]
}
