//! File set enumeration.
//! Builds the exclusion glob set (version-control internals, caches, build
//! output, the lockfile, changelog history, binaries, skeleton-only files and
//! the initializer itself, plus anything listed in `.initignore`) and walks the
//! project tree once to produce the [`FileSet`] every rewrite works on.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use log::{debug, trace, warn};
use walkdir::WalkDir;

use crate::config::Skeleton;
use crate::constants::{BINARY_EXTENSIONS, EXCLUDED_DIRS, EXCLUDED_FILES, IGNORE_FILE};
use crate::error::{Error, Result};

/// A file or directory that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for FileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// Snapshot of the files eligible for rewriting, relative to `root`, sorted.
/// Entries the walk could not read are kept aside in `unreadable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    root: PathBuf,
    files: Vec<PathBuf>,
    unreadable: Vec<FileFailure>,
}

impl FileSet {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths relative to the root.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn unreadable(&self) -> &[FileFailure] {
        &self.unreadable
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains<P: AsRef<Path>>(&self, relative: P) -> bool {
        self.files.iter().any(|f| f == relative.as_ref())
    }

    /// Iterates `(relative, absolute)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, PathBuf)> + '_ {
        self.files.iter().map(move |f| (f.as_path(), self.root.join(f)))
    }
}

fn add_glob(builder: &mut GlobSetBuilder, pattern: &str) -> Result<()> {
    let glob = Glob::new(pattern)
        .map_err(|e| Error::IgnorePatternError(format!("'{pattern}': {e}")))?;
    builder.add(glob);
    Ok(())
}

fn add_path(builder: &mut GlobSetBuilder, path: &Path) -> Result<()> {
    let pattern = path.to_string_lossy().replace('\\', "/");
    let pattern = pattern.trim_end_matches('/');
    add_glob(builder, pattern)?;
    add_glob(builder, &format!("{pattern}/**"))
}

/// Builds the exclusion set for a skeleton.
///
/// # Arguments
/// * `root` - Project root, searched for an `.initignore` file
/// * `skeleton` - Supplies the entry points and skeleton-only paths
///
/// # Errors
/// * `Error::IgnorePatternError` if a pattern cannot be compiled
pub fn build_exclusions<P: AsRef<Path>>(root: P, skeleton: &Skeleton) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for dir in EXCLUDED_DIRS {
        add_glob(&mut builder, &format!("**/{dir}"))?;
        add_glob(&mut builder, &format!("**/{dir}/**"))?;
    }
    for file in EXCLUDED_FILES {
        add_glob(&mut builder, &format!("**/{file}"))?;
    }
    for ext in BINARY_EXTENSIONS {
        add_glob(&mut builder, &format!("**/*.{ext}"))?;
    }
    for path in skeleton.entry_points.iter().chain(skeleton.prune_paths().iter()) {
        add_path(&mut builder, path)?;
    }
    add_glob(&mut builder, IGNORE_FILE)?;

    let ignore_path = root.as_ref().join(IGNORE_FILE);
    if let Ok(contents) = read_to_string(&ignore_path) {
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            add_glob(&mut builder, line)?;
        }
    } else {
        debug!("{IGNORE_FILE} does not exist");
    }

    builder
        .build()
        .map_err(|e| Error::IgnorePatternError(format!("cannot build exclusion set: {e}")))
}

/// Walks the tree once and returns every regular file not matched by `exclusions`.
/// Excluded directories are not descended into. Entries that cannot be read
/// are recorded in [`FileSet::unreadable`] and the walk carries on.
pub fn enumerate_files<P: AsRef<Path>>(root: P, exclusions: &GlobSet) -> Result<FileSet> {
    let root = root.as_ref();
    let mut files = Vec::new();
    let mut unreadable = Vec::new();

    let walker = WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(|entry| {
        match entry.path().strip_prefix(root) {
            Ok(rel) if rel.as_os_str().is_empty() => true,
            Ok(rel) => !exclusions.is_match(rel),
            Err(_) => false,
        }
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root);
                let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
                warn!("Cannot read {}: {e}", relative.display());
                unreadable.push(FileFailure { path: relative, reason: e.to_string() });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::WalkError { path: entry.path().to_path_buf(), reason: e.to_string() })?
            .to_path_buf();
        trace!("Eligible file: {}", relative.display());
        files.push(relative);
    }

    debug!("{} files eligible under {}", files.len(), root.display());
    Ok(FileSet { root: root.to_path_buf(), files, unreadable })
}
