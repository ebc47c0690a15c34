//! Skeleton description.
//! Everything that identifies the unconfigured skeleton (placeholder names,
//! template metadata, paths of files the initializer edits or removes, external
//! commands) is gathered in [`Skeleton`]. The defaults describe the
//! `python-package-template` skeleton; a skeleton may override them with a
//! `skeleton.json`, `skeleton.yml` or `skeleton.yaml` file at its root.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::CONFIG_FILES;
use crate::error::{Error, Result};
use crate::names::{to_snake_case, to_title_case};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Skeleton {
    /// The skeleton's own package name, in kebab-case.
    pub placeholder: String,
    pub template_owner: String,
    pub template_author: String,
    pub template_email: String,
    /// Former repository names still referenced by URLs in the skeleton.
    pub legacy_repo_names: Vec<String>,
    /// Repository name used in the documentation-site URL.
    pub docs_repo: String,
    /// Description in the project metadata and recipe.
    pub template_description: String,
    /// Longer blurb at the top of the README.
    pub readme_description: String,

    pub metadata_file: PathBuf,
    pub recipe_file: PathBuf,
    pub codeowners_file: PathBuf,
    pub changelog_file: PathBuf,
    pub license_file: PathBuf,
    pub license_header_file: PathBuf,
    pub readme_file: PathBuf,
    pub agent_guide_file: PathBuf,
    pub docs_index_file: PathBuf,
    pub pre_commit_file: PathBuf,
    pub release_workflow: PathBuf,
    pub ci_workflow: PathBuf,
    pub testing_guide_file: PathBuf,

    /// The initializer's own entry points, removed as the very last step.
    pub entry_points: Vec<PathBuf>,
    /// Scaffolding that only supports the unconfigured skeleton.
    pub template_only_paths: Vec<PathBuf>,
    /// Directories, besides the package directory, that receive license headers.
    pub license_header_dirs: Vec<PathBuf>,
    pub license_header_glob: String,

    pub lock_command: Vec<String>,
    /// `{module}` is replaced by the package's snake_case name.
    pub import_command: Vec<String>,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self {
            placeholder: "python-package-template".to_string(),
            template_owner: "michaelellis003".to_string(),
            template_author: "Michael Ellis".to_string(),
            template_email: "michaelellis003@gmail.com".to_string(),
            legacy_repo_names: vec!["uv-python-template".to_string()],
            docs_repo: "uv-python-template".to_string(),
            template_description: "A production-ready template for starting new Python packages."
                .to_string(),
            readme_description: "A production-ready template for starting new Python packages. \
                Clone it, rename a few things, and start building \u{2014} dependency management, \
                linting, type checking, testing, and CI/CD are already wired up."
                .to_string(),
            metadata_file: PathBuf::from("pyproject.toml"),
            recipe_file: PathBuf::from("recipe/meta.yaml"),
            codeowners_file: PathBuf::from(".github/CODEOWNERS"),
            changelog_file: PathBuf::from("CHANGELOG.md"),
            license_file: PathBuf::from("LICENSE"),
            license_header_file: PathBuf::from("LICENSE_HEADER"),
            readme_file: PathBuf::from("README.md"),
            agent_guide_file: PathBuf::from("CLAUDE.md"),
            docs_index_file: PathBuf::from("docs/index.md"),
            pre_commit_file: PathBuf::from(".pre-commit-config.yaml"),
            release_workflow: PathBuf::from(".github/workflows/release.yml"),
            ci_workflow: PathBuf::from(".github/workflows/ci.yml"),
            testing_guide_file: PathBuf::from(".claude/rules/testing.md"),
            entry_points: vec![PathBuf::from("scripts/init.sh"), PathBuf::from("scripts/init.py")],
            template_only_paths: vec![
                PathBuf::from("tests/template"),
                PathBuf::from("tests/e2e"),
                PathBuf::from("cli"),
                PathBuf::from(".dockerignore"),
                PathBuf::from(".github/workflows/e2e.yml"),
                PathBuf::from(".github/workflows/cli-release.yml"),
            ],
            license_header_dirs: vec![PathBuf::from("tests")],
            license_header_glob: "*.py".to_string(),
            lock_command: vec!["uv".to_string(), "lock".to_string()],
            import_command: vec![
                "uv".to_string(),
                "run".to_string(),
                "python".to_string(),
                "-c".to_string(),
                "import {module}".to_string(),
            ],
        }
    }
}

impl Skeleton {
    pub fn placeholder_snake(&self) -> String {
        to_snake_case(&self.placeholder)
    }

    pub fn placeholder_title(&self) -> String {
        to_title_case(&self.placeholder)
    }

    /// The package directory as it exists before renaming.
    pub fn package_dir(&self) -> PathBuf {
        PathBuf::from(self.placeholder_snake())
    }

    /// Names a new project may not take.
    pub fn reserved_names(&self) -> Vec<String> {
        vec![self.placeholder.clone(), self.placeholder_snake()]
    }

    /// Strings that must not survive initialization anywhere in the tree.
    pub fn stale_patterns(&self) -> Vec<String> {
        let mut patterns = vec![self.placeholder_snake(), self.placeholder.clone()];
        patterns.extend(self.legacy_repo_names.iter().cloned());
        patterns.push(self.template_owner.clone());
        patterns.push(self.template_author.clone());
        patterns
    }

    /// Paths the pruner removes: template-only scaffolding plus the skeleton
    /// configuration files themselves.
    pub fn prune_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.template_only_paths.clone();
        paths.extend(CONFIG_FILES.iter().map(PathBuf::from));
        paths
    }
}

/// Loads the skeleton description from the project root, trying each of the
/// supported file names in turn and falling back to the built-in defaults.
///
/// # Errors
/// * `Error::ConfigError` if a configuration file exists but cannot be parsed
pub fn load_skeleton<P: AsRef<Path>>(root: P) -> Result<Skeleton> {
    for file in CONFIG_FILES {
        let config_path = root.as_ref().join(file);
        if config_path.exists() {
            debug!("Loading skeleton configuration from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path).map_err(Error::IoError)?;
            return parse_skeleton(&content);
        }
    }

    debug!("No skeleton configuration found (tried: {}), using defaults", CONFIG_FILES.join(", "));
    Ok(Skeleton::default())
}

/// Parses a skeleton description, JSON first and YAML as fallback.
pub fn parse_skeleton(content: &str) -> Result<Skeleton> {
    match serde_json::from_str(content) {
        Ok(skeleton) => Ok(skeleton),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid skeleton configuration: {e}"))),
    }
}
