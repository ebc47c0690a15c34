//! The resolved project description and the context threaded through every step.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::Skeleton;
use crate::license::LicenseInfo;
use crate::names::{to_kebab_case, to_snake_case, to_title_case};

/// Everything the initializer knows about the new project. Built once by the
/// input collector and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectProfile {
    pub kebab_name: String,
    pub snake_name: String,
    pub title_name: String,
    pub author_name: String,
    pub author_email: String,
    pub github_owner: String,
    /// `owner/kebab-name`
    pub github_repo: String,
    pub description: String,
    /// `None` keeps the skeleton's license untouched.
    pub license: Option<LicenseInfo>,
    pub enable_publishing: bool,
}

impl ProjectProfile {
    /// Derives the name variants and repository from an already validated name.
    pub fn new(
        name: &str,
        author_name: impl Into<String>,
        author_email: impl Into<String>,
        github_owner: impl Into<String>,
        description: impl Into<String>,
        license: Option<LicenseInfo>,
        enable_publishing: bool,
    ) -> Self {
        let kebab_name = to_kebab_case(name);
        let github_owner = github_owner.into();
        Self {
            snake_name: to_snake_case(&kebab_name),
            title_name: to_title_case(&kebab_name),
            github_repo: format!("{github_owner}/{kebab_name}"),
            kebab_name,
            author_name: author_name.into(),
            author_email: author_email.into(),
            github_owner,
            description: description.into(),
            license,
            enable_publishing,
        }
    }

    pub fn license_spdx(&self) -> Option<&str> {
        self.license.as_ref().map(|l| l.spdx_id.as_str())
    }

    pub fn license_label(&self) -> String {
        match &self.license {
            Some(license) => format!("{} ({})", license.name, license.spdx_id),
            None => "unchanged".to_string(),
        }
    }

    /// Ordered rows for the confirmation and summary tables.
    pub fn summary_rows(&self) -> IndexMap<&'static str, String> {
        let mut rows = IndexMap::new();
        rows.insert("Package name (kebab)", self.kebab_name.clone());
        rows.insert("Package name (snake)", self.snake_name.clone());
        rows.insert("Package name (title)", self.title_name.clone());
        rows.insert("Author", format!("{} <{}>", self.author_name, self.author_email));
        rows.insert("GitHub repo", self.github_repo.clone());
        rows.insert("Description", self.description.clone());
        rows.insert(
            "Publishing",
            if self.enable_publishing { "yes" } else { "no" }.to_string(),
        );
        rows.insert("License", self.license_label());
        rows
    }

    pub fn render_summary_rows(&self) -> String {
        let rows = self.summary_rows();
        let width = rows.keys().map(|k| k.len()).max().unwrap_or(0) + 2;
        rows.iter()
            .map(|(key, value)| format!("  {:<width$}{}\n", format!("{key}:"), value))
            .collect()
    }
}

/// Explicit run context: the project root, the skeleton description and the
/// resolved profile. No component reads the working directory or environment.
#[derive(Debug, Clone)]
pub struct InitContext {
    pub root: PathBuf,
    pub skeleton: Skeleton,
    pub profile: ProjectProfile,
    /// Copyright year written to license files and headers.
    pub year: i32,
}

impl InitContext {
    pub fn new(root: impl Into<PathBuf>, skeleton: Skeleton, profile: ProjectProfile, year: i32) -> Self {
        Self { root: root.into(), skeleton, profile, year }
    }

    /// Resolves a skeleton-relative path against the project root.
    pub fn path<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        self.root.join(relative)
    }

    pub fn package_dir(&self) -> PathBuf {
        self.root.join(&self.profile.snake_name)
    }
}
