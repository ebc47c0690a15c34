//! Line-based structural edits bounded by marker lines.
//! All functions work on file content and leave every line outside the edited
//! region byte-for-byte intact.

use std::path::Path;

use regex::Regex;

use crate::error::{Error, Result};

/// Replaces the lines from the one containing `start` through the one containing
/// `end` (both inclusive) with `replacement`. A `None` replacement removes the
/// section. Every marked section in the content is replaced.
///
/// # Errors
/// * `Error::MarkerNotFound` when `start` does not occur
/// * `Error::UnterminatedMarker` when a section is never closed
pub fn strip_marked_section(
    path: &Path,
    content: &str,
    start: &str,
    end: &str,
    replacement: Option<&str>,
) -> Result<String> {
    if !content.contains(start) {
        return Err(Error::MarkerNotFound { path: path.to_path_buf(), marker: start.to_string() });
    }

    let mut result: Vec<&str> = Vec::new();
    let mut inside = false;
    for line in content.split('\n') {
        if !inside && line.contains(start) {
            inside = true;
            if let Some(replacement) = replacement {
                result.push(replacement.trim_end_matches('\n'));
            }
            continue;
        }
        if inside {
            if line.contains(end) {
                inside = false;
            }
            continue;
        }
        result.push(line);
    }

    if inside {
        return Err(Error::UnterminatedMarker {
            path: path.to_path_buf(),
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(result.join("\n"))
}

/// Inserts `block` immediately before the first line containing `marker`.
/// Content that already contains the block is returned unchanged.
///
/// # Errors
/// * `Error::MarkerNotFound` when `marker` does not occur
pub fn inject_block(path: &Path, content: &str, marker: &str, block: &str) -> Result<String> {
    if content.contains(block) {
        return Ok(content.to_string());
    }
    match content.find(marker) {
        Some(at) => {
            let line_start = content[..at].rfind('\n').map(|i| i + 1).unwrap_or(0);
            let mut updated = String::with_capacity(content.len() + block.len());
            updated.push_str(&content[..line_start]);
            updated.push_str(block);
            updated.push_str(&content[line_start..]);
            Ok(updated)
        }
        None => Err(Error::MarkerNotFound { path: path.to_path_buf(), marker: marker.to_string() }),
    }
}

/// Uncomments the lines between the `start` and `end` marker lines and drops
/// the markers. Bare `#` lines inside the block are removed; `# ` prefixes are
/// stripped while keeping the indentation.
pub fn uncomment_marked_block(path: &Path, content: &str, start: &str, end: &str) -> Result<String> {
    if !content.contains(start) {
        return Err(Error::MarkerNotFound { path: path.to_path_buf(), marker: start.to_string() });
    }

    let bare_comment = Regex::new(r"^\s*#$").map_err(|e| Error::ConfigError(e.to_string()))?;
    let comment_prefix = Regex::new(r"^(\s*)# ").map_err(|e| Error::ConfigError(e.to_string()))?;

    let mut result = Vec::new();
    let mut inside = false;
    for line in content.split('\n') {
        if line.contains(start) {
            inside = true;
            continue;
        }
        if line.contains(end) {
            inside = false;
            continue;
        }
        if !inside {
            result.push(line.to_string());
        } else if !bare_comment.is_match(line) {
            result.push(comment_prefix.replace(line, "$1").into_owned());
        }
    }
    Ok(result.join("\n"))
}

/// Removes the section starting at the line equal to `heading` (after trimming)
/// up to, not including, the next heading of the same or higher level.
/// Content without the heading is returned unchanged.
pub fn remove_heading_section(content: &str, heading: &str) -> String {
    let level = heading.chars().take_while(|c| *c == '#').count();
    let mut result = Vec::new();
    let mut skipping = false;
    for line in content.split('\n') {
        if line.trim() == heading {
            skipping = true;
            continue;
        }
        if skipping {
            let line_level = line.chars().take_while(|c| *c == '#').count();
            let is_heading = line_level > 0 && line[line_level..].starts_with(' ');
            if is_heading && line_level <= level {
                skipping = false;
            } else {
                continue;
            }
        }
        result.push(line);
    }
    result.join("\n")
}

/// Drops every line for which `predicate` holds.
pub fn remove_lines<F: Fn(&str) -> bool>(content: &str, predicate: F) -> String {
    content.split('\n').filter(|line| !predicate(line)).collect::<Vec<_>>().join("\n")
}
