//! Tree rewriting.
//! Applies the ordered substitution rules across a [`FileSet`], renames the
//! package directory and prepends license headers. A file that cannot be read
//! or written is recorded and skipped; the rest of the tree is still processed.

use std::fs;
use std::path::{Path, PathBuf};

use globset::Glob;
use log::{debug, trace};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::ignore::FileSet;
use crate::rules::SubstitutionRule;

pub use crate::ignore::FileFailure;

pub mod docs;
pub mod markers;
pub mod metadata;

/// Result of a bulk pass over many files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// Files whose content changed, relative to the root.
    pub changed: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

/// Applies the rules applicable to `relative` in order.
pub fn rewrite_content(content: &str, relative: &Path, rules: &[SubstitutionRule]) -> String {
    rules
        .iter()
        .filter(|rule| rule.applies_to(relative))
        .fold(content.to_string(), |acc, rule| rule.apply(&acc).into_owned())
}

/// Applies every rule to every file of the set, writing each file at most once.
pub fn apply_substitutions(files: &FileSet, rules: &[SubstitutionRule]) -> RewriteOutcome {
    let mut outcome = RewriteOutcome::default();

    for (relative, path) in files.iter() {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                outcome.failures.push(FileFailure { path: relative.to_path_buf(), reason: e.to_string() });
                continue;
            }
        };

        let updated = rewrite_content(&content, relative, rules);
        if updated == content {
            trace!("Unchanged: {}", relative.display());
            continue;
        }

        match fs::write(&path, updated) {
            Ok(()) => {
                debug!("Rewrote {}", relative.display());
                outcome.changed.push(relative.to_path_buf());
            }
            Err(e) => {
                outcome.failures.push(FileFailure { path: relative.to_path_buf(), reason: e.to_string() })
            }
        }
    }

    outcome
}

/// Replaces all occurrences of `old` in a single file. Missing files are ignored.
///
/// # Returns
/// * `Result<bool>` - whether the file changed
pub fn replace_in_file<P: AsRef<Path>>(path: P, old: &str, new: &str) -> Result<bool> {
    edit_file(path, |content| Ok(content.replace(old, new)))
}

/// Reads a file, transforms it and writes it back if the content changed.
/// A missing file is not an error and reports no change.
pub fn edit_file<P, F>(path: P, edit: F) -> Result<bool>
where
    P: AsRef<Path>,
    F: FnOnce(&str) -> Result<String>,
{
    let path = path.as_ref();
    if !path.is_file() {
        trace!("Skipping missing file {}", path.display());
        return Ok(false);
    }
    let content = fs::read_to_string(path)?;
    let updated = edit(&content)?;
    if updated == content {
        return Ok(false);
    }
    fs::write(path, updated)?;
    debug!("Edited {}", path.display());
    Ok(true)
}

/// Moves the package directory from `old_name` to `new_name` under `root`.
///
/// # Errors
/// * `Error::PackageDirectoryMissing` when the source directory does not exist
/// * `Error::PackageDirectoryExists` when the target already exists
pub fn rename_package_directory<P: AsRef<Path>>(root: P, old_name: &str, new_name: &str) -> Result<PathBuf> {
    let root = root.as_ref();
    let source = root.join(old_name);
    let target = root.join(new_name);

    if !source.is_dir() {
        return Err(Error::PackageDirectoryMissing { path: source });
    }
    if source == target {
        return Ok(target);
    }
    if target.exists() {
        return Err(Error::PackageDirectoryExists { path: target });
    }

    fs::rename(&source, &target)?;
    debug!("Renamed {} -> {}", source.display(), target.display());
    Ok(target)
}

/// Prepends `header` to `content`, after an interpreter directive if there is
/// one. Content that already carries the header is returned unchanged.
pub fn prepend_header(content: &str, header: &[String]) -> String {
    let header_block = header.join("\n");
    let (shebang, rest) = match content.strip_prefix("#!") {
        Some(_) => match content.split_once('\n') {
            Some((first, rest)) => (Some(first), rest),
            None => (Some(content), ""),
        },
        None => (None, content),
    };

    if rest.starts_with(&header_block) {
        return content.to_string();
    }

    match shebang {
        Some(first) => format!("{first}\n{header_block}\n{rest}"),
        None => format!("{header_block}\n{rest}"),
    }
}

/// Prepends a comment header to every file under `dirs` whose name matches `glob`.
/// A file or directory that cannot be processed is recorded and skipped.
///
/// # Returns
/// * `Result<RewriteOutcome>` - files that received the header, relative to `root`,
///   and the ones that could not be processed
pub fn apply_license_headers<P: AsRef<Path>>(
    root: P,
    dirs: &[PathBuf],
    glob: &str,
    header: &[String],
) -> Result<RewriteOutcome> {
    let root = root.as_ref();
    let matcher = Glob::new(glob)
        .map_err(|e| Error::IgnorePatternError(format!("'{glob}': {e}")))?
        .compile_matcher();
    let relative = |path: &Path| path.strip_prefix(root).unwrap_or(path).to_path_buf();
    let mut outcome = RewriteOutcome::default();

    for dir in dirs {
        let dir = root.join(dir);
        if !dir.is_dir() {
            continue;
        }
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(relative).unwrap_or_else(|| relative(&dir));
                    outcome.failures.push(FileFailure { path, reason: e.to_string() });
                    continue;
                }
            };
            if !entry.file_type().is_file() || !matcher.is_match(entry.file_name()) {
                continue;
            }
            match edit_file(entry.path(), |content| Ok(prepend_header(content, header))) {
                Ok(true) => outcome.changed.push(relative(entry.path())),
                Ok(false) => (),
                Err(e) => outcome.failures.push(FileFailure { path: relative(entry.path()), reason: e.to_string() }),
            }
        }
    }

    Ok(outcome)
}
