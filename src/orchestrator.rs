//! Initialization pipeline.
//!
//! Runs the components in a fixed order over an explicit [`InitContext`]:
//! inputs are collected and confirmed, the tree is rewritten and pruned, the
//! external toolchain regenerates the lockfile, the result is validated and
//! reported, and finally the initializer's own entry points are removed.
//!
//! Input and structural errors abort the run. External failures and
//! per-file failures become warnings that are reported together at the end.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use log::{debug, warn};

use crate::collector::{self, InputFlags};
use crate::config::Skeleton;
use crate::constants::{PRE_COMMIT_HOOK_MARKER, PUBLISHING_END, PUBLISHING_START, TEMPLATE_ONLY_END, TEMPLATE_ONLY_START};
use crate::error::{Error, Result};
use crate::ignore::{build_exclusions, enumerate_files, FileFailure};
use crate::license::{LicenseResolver, LicenseSource};
use crate::profile::{InitContext, ProjectProfile};
use crate::prompt::Prompter;
use crate::pruner;
use crate::renderer::{self, profile_context, TemplateRenderer};
use crate::rewriter::{self, docs, metadata};
use crate::rules::ordered_rules;
use crate::toolchain::{with_module, Toolchain};
use crate::validator::{self, ValidationReport};

/// Run states. A run only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    CollectingInputs,
    Confirming,
    Rewriting,
    Pruning,
    Validating,
    Reporting,
    Terminated,
}

/// Removes the initializer's own entry points. Runs once, after the report.
pub trait SelfRemover {
    /// Returns the relative paths actually removed.
    fn remove(&self, root: &Path, entry_points: &[PathBuf]) -> Result<Vec<PathBuf>>;
}

/// Deletes the entry point files from disk.
pub struct EntryPointRemover;

impl SelfRemover for EntryPointRemover {
    fn remove(&self, root: &Path, entry_points: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for entry_point in entry_points {
            let path = root.join(entry_point);
            if path.is_file() {
                fs::remove_file(&path)?;
                removed.push(entry_point.clone());
            }
        }
        Ok(removed)
    }
}

/// The external collaborators of a run.
pub struct Collaborators<'a> {
    pub prompter: &'a dyn Prompter,
    pub licenses: &'a dyn LicenseSource,
    pub toolchain: &'a dyn Toolchain,
    pub renderer: &'a dyn TemplateRenderer,
    pub self_remover: &'a dyn SelfRemover,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub name: &'static str,
    pub outcome: StepOutcome,
}

/// What a completed run did.
#[derive(Debug, Clone)]
pub struct InitSummary {
    pub profile: ProjectProfile,
    pub steps: Vec<StepRecord>,
    pub report: ValidationReport,
    /// Entry points removed by the terminal step.
    pub removed_entry_points: Vec<PathBuf>,
    /// Set when self-removal failed. Never affects the exit status.
    pub self_removal_error: Option<String>,
}

impl InitSummary {
    pub fn exit_code(&self) -> i32 {
        if self.report.passed {
            0
        } else {
            1
        }
    }
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Initializes the skeleton at `root` described by `skeleton`.
pub fn initialize<P: AsRef<Path>>(
    root: P,
    skeleton: Skeleton,
    flags: &InputFlags,
    collaborators: &Collaborators,
    year: i32,
) -> Result<InitSummary> {
    Initializer::new(collaborators).run(root.as_ref(), skeleton, flags, year)
}

/// Drives one run through its stages.
pub struct Initializer<'a> {
    collaborators: &'a Collaborators<'a>,
    stage: Stage,
    steps: Vec<StepRecord>,
    warnings: Vec<String>,
}

impl<'a> Initializer<'a> {
    pub fn new(collaborators: &'a Collaborators<'a>) -> Self {
        Self { collaborators, stage: Stage::CollectingInputs, steps: Vec::new(), warnings: Vec::new() }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn run(mut self, root: &Path, skeleton: Skeleton, flags: &InputFlags, year: i32) -> Result<InitSummary> {
        preflight(root, &skeleton)?;

        let resolver = LicenseResolver::new(self.collaborators.licenses);
        let profile = collector::collect(flags, &skeleton.reserved_names(), self.collaborators.prompter, &resolver)?;
        check_target(root, &skeleton, &profile)?;

        self.advance(Stage::Confirming);
        collector::confirm(&profile, flags.assume_yes, self.collaborators.prompter)?;

        let ctx = InitContext::new(root, skeleton, profile, year);

        self.advance(Stage::Rewriting);
        self.rename(&ctx)?;
        self.substitute(&ctx)?;
        self.update_documents(&ctx)?;
        self.reset_metadata(&ctx)?;
        self.setup_license(&ctx, &resolver)?;
        self.setup_publishing(&ctx)?;
        self.write_docs_index(&ctx)?;

        self.advance(Stage::Pruning);
        self.prune(&ctx)?;

        self.advance(Stage::Validating);
        self.regenerate_lockfile(&ctx);
        self.validate(&ctx);

        self.advance(Stage::Reporting);
        let report = validator::aggregate(std::mem::take(&mut self.warnings));
        let mut summary = InitSummary {
            profile: ctx.profile.clone(),
            steps: std::mem::take(&mut self.steps),
            report,
            removed_entry_points: Vec::new(),
            self_removal_error: None,
        };
        print_summary(&summary);

        self.advance(Stage::Terminated);
        match self.collaborators.self_remover.remove(&ctx.root, &ctx.skeleton.entry_points) {
            Ok(removed) => summary.removed_entry_points = removed,
            Err(e) => {
                eprintln!("warning: could not remove the initializer: {e}");
                summary.self_removal_error = Some(e.to_string());
            }
        }
        Ok(summary)
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "stage {next:?} after {:?}", self.stage);
        debug!("{:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    fn done(&mut self, name: &'static str) {
        self.steps.push(StepRecord { name, outcome: StepOutcome::Done });
    }

    fn skipped(&mut self, name: &'static str, reason: impl Into<String>) {
        self.steps.push(StepRecord { name, outcome: StepOutcome::Skipped(reason.into()) });
    }

    fn warn(&mut self, message: String) {
        eprintln!("warning: {message}");
        self.warnings.push(message);
    }

    /// Turns an I/O failure on a single file into a warning; any other error
    /// still aborts the run.
    fn tolerate<T>(&mut self, ctx: &InitContext, path: &Path, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(Error::IoError(e)) => {
                let relative = path.strip_prefix(&ctx.root).unwrap_or(path);
                let message = format!("Could not update {}: {e}. Update it by hand.", relative.display());
                if !self.warnings.contains(&message) {
                    self.warn(message);
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn warn_failures(&mut self, failures: &[FileFailure], action: &str) {
        for failure in failures {
            self.warn(format!("Could not {action} {failure}. Update it by hand."));
        }
    }

    fn render(&self, template: &str, ctx: &InitContext) -> Result<String> {
        let context = profile_context(&ctx.profile, ctx.year, metadata::SKELETON_SPDX)?;
        self.collaborators.renderer.render(template, &context)
    }

    fn rename(&mut self, ctx: &InitContext) -> Result<()> {
        let old = ctx.skeleton.placeholder_snake();
        println!("==> Renaming {old}/ -> {}/", ctx.profile.snake_name);
        rewriter::rename_package_directory(&ctx.root, &old, &ctx.profile.snake_name)?;
        self.done("Rename package directory");
        Ok(())
    }

    fn substitute(&mut self, ctx: &InitContext) -> Result<()> {
        println!("==> Updating package name references...");
        let exclusions = build_exclusions(&ctx.root, &ctx.skeleton)?;
        let files = enumerate_files(&ctx.root, &exclusions)?;
        let rules = ordered_rules(&ctx.skeleton, &ctx.profile);
        let outcome = rewriter::apply_substitutions(&files, &rules);
        debug!("{} of {} files rewritten", outcome.changed.len(), files.len());

        self.warn_failures(files.unreadable(), "read");
        self.warn_failures(&outcome.failures, "rewrite");
        self.done("Update name, author and URL references");
        Ok(())
    }

    fn update_documents(&mut self, ctx: &InitContext) -> Result<()> {
        println!("==> Updating README...");
        let skeleton = &ctx.skeleton;
        let spdx = ctx.profile.license_spdx().unwrap_or(metadata::SKELETON_SPDX);
        let getting_started = self.render(renderer::GETTING_STARTED, ctx)?;
        let blurb = self.render(renderer::PROJECT_BLURB, ctx)?;

        let readme = ctx.path(&skeleton.readme_file);
        let intro = docs::update_readme_intro(&readme, &skeleton.readme_description, &ctx.profile.description);
        self.tolerate(ctx, &readme, intro)?;
        self.tolerate(ctx, &readme, docs::replace_template_section(&readme, &getting_started))?;

        let guide = ctx.path(&skeleton.agent_guide_file);
        self.tolerate(ctx, &guide, docs::replace_template_section(&guide, &blurb))?;

        for document in [&readme, &guide] {
            self.tolerate(ctx, document, docs::strip_initializer_references(document, spdx))?;
        }
        self.done("Update README and agent guide");
        Ok(())
    }

    fn reset_metadata(&mut self, ctx: &InitContext) -> Result<()> {
        let metadata_file = ctx.path(&ctx.skeleton.metadata_file);
        let changelog = ctx.path(&ctx.skeleton.changelog_file);

        println!("==> Updating keywords...");
        self.tolerate(ctx, &metadata_file, metadata::clear_keywords(&metadata_file))?;

        println!("==> Resetting version to {}...", crate::constants::INITIAL_VERSION);
        self.tolerate(ctx, &metadata_file, metadata::reset_version(&metadata_file))?;
        self.tolerate(ctx, &changelog, metadata::reset_changelog(&changelog))?;

        println!("==> Cleaning up TODO comments...");
        self.tolerate(ctx, &metadata_file, metadata::remove_todo_comments(&metadata_file))?;
        self.done("Reset version, changelog and keywords");
        Ok(())
    }

    fn setup_license(&mut self, ctx: &InitContext, resolver: &LicenseResolver) -> Result<()> {
        let Some(license) = ctx.profile.license.clone() else {
            self.skipped("License setup", "no license selected");
            return Ok(());
        };
        let skeleton = &ctx.skeleton;
        println!("==> Setting up {} license...", license.spdx_id);

        let metadata_file = ctx.path(&skeleton.metadata_file);
        self.tolerate(ctx, &metadata_file, metadata::update_metadata_license(&metadata_file, &license.spdx_id))?;
        let recipe = ctx.path(&skeleton.recipe_file);
        self.tolerate(ctx, &recipe, metadata::update_recipe_license(&recipe, &license.spdx_id))?;

        let license_file = ctx.path(&skeleton.license_file);
        match resolver.resolve(&license, &ctx.profile.author_name, ctx.year) {
            Ok(record) => {
                self.tolerate(ctx, &license_file, metadata::write_license(&license_file, &record.full_text))?;
            }
            Err(Error::LicenseFetchUnavailable { reason, .. }) => {
                self.warn(format!(
                    "Could not fetch the {} license text ({reason}). {} was left unchanged, replace it manually.",
                    license.spdx_id,
                    skeleton.license_file.display(),
                ));
            }
            Err(e) => return Err(e),
        }

        let header = self.render(renderer::LICENSE_HEADER, ctx)?;
        let header_file = ctx.path(&skeleton.license_header_file);
        self.tolerate(ctx, &header_file, metadata::write_license_header(&header_file, &header))?;
        let pre_commit = ctx.path(&skeleton.pre_commit_file);
        self.tolerate(ctx, &pre_commit, metadata::add_insert_license_hook(&pre_commit))?;

        let lines = metadata::license_header_lines(ctx.year, &ctx.profile.author_name, &license.spdx_id);
        let mut dirs = vec![PathBuf::from(&ctx.profile.snake_name)];
        dirs.extend(skeleton.license_header_dirs.iter().cloned());
        let outcome = rewriter::apply_license_headers(&ctx.root, &dirs, &skeleton.license_header_glob, &lines)?;
        debug!("License headers added to {} files", outcome.changed.len());
        self.warn_failures(&outcome.failures, "add a license header to");

        self.done("License setup");
        Ok(())
    }

    fn setup_publishing(&mut self, ctx: &InitContext) -> Result<()> {
        let workflow = ctx.path(&ctx.skeleton.release_workflow);
        if ctx.profile.enable_publishing {
            println!("==> Enabling PyPI publishing...");
            self.tolerate(ctx, &workflow, docs::enable_publishing(&workflow))?;
            self.done("Enable publishing");
        } else {
            self.tolerate(ctx, &workflow, docs::strip_publishing_hint(&workflow))?;
            self.skipped("Enable publishing", "not requested");
        }
        Ok(())
    }

    fn write_docs_index(&mut self, ctx: &InitContext) -> Result<()> {
        let rendered = self.render(renderer::DOCS_INDEX, ctx)?;
        let docs_index = ctx.path(&ctx.skeleton.docs_index_file);
        match self.tolerate(ctx, &docs_index, docs::write_docs_index(&docs_index, &rendered))? {
            Some(true) => self.done("Regenerate docs index"),
            Some(false) => self.skipped("Regenerate docs index", "no docs index"),
            None => self.skipped("Regenerate docs index", "write failed"),
        }
        Ok(())
    }

    fn prune(&mut self, ctx: &InitContext) -> Result<()> {
        println!("==> Removing template infrastructure...");
        let skeleton = &ctx.skeleton;
        let mut removed = 0;
        for path in skeleton.prune_paths() {
            let result = pruner::remove_template_only_paths(&ctx.root, std::slice::from_ref(&path));
            if let Some(paths) = self.tolerate(ctx, &ctx.path(&path), result)? {
                removed += paths.len();
            }
        }
        debug!("Pruned {removed} paths");

        let ci = ctx.path(&skeleton.ci_workflow);
        self.tolerate(ctx, &ci, pruner::strip_cli_job(&ci))?;
        for document in [&skeleton.readme_file, &skeleton.agent_guide_file] {
            let document = ctx.path(document);
            self.tolerate(ctx, &document, pruner::remove_doc_references(&document))?;
        }
        let testing_guide = ctx.path(&skeleton.testing_guide_file);
        self.tolerate(ctx, &testing_guide, pruner::remove_template_tests_section(&testing_guide))?;
        self.done("Remove template-only files");
        Ok(())
    }

    fn regenerate_lockfile(&mut self, ctx: &InitContext) {
        println!("==> Regenerating lockfile...");
        match self.collaborators.toolchain.regenerate_lockfile(&ctx.root) {
            Ok(()) => self.done("Regenerate lockfile"),
            Err(e) => {
                warn!("{e}");
                let command = ctx.skeleton.lock_command.join(" ");
                self.warn(format!("Lockfile regeneration failed. Run \"{command}\" manually."));
                self.skipped("Regenerate lockfile", "command failed");
            }
        }
    }

    fn validate(&mut self, ctx: &InitContext) {
        println!("==> Validating initialized project...");
        let module = &ctx.profile.snake_name;
        if !validator::verify_importable(self.collaborators.toolchain, &ctx.root, module) {
            let command = with_module(&ctx.skeleton.import_command, module).join(" ");
            self.warn(format!("Could not import '{module}'. Check with: {command}"));
        }

        let files = match build_exclusions(&ctx.root, &ctx.skeleton).and_then(|e| enumerate_files(&ctx.root, &e)) {
            Ok(files) => files,
            Err(e) => {
                self.warn(format!("Could not scan for stale template references: {e}"));
                self.skipped("Validate", "scan failed");
                return;
            }
        };
        if let Some(message) = validator::unscanned_paths_warning(files.unreadable()) {
            self.warn(message);
        }
        let stale = validator::find_stale_references(&files, &ctx.skeleton.stale_patterns());
        if let Some(message) = validator::stale_references_warning(&stale) {
            self.warn(message);
        }
        self.done("Validate");
    }
}

/// Checks every precondition that can be checked before the user is asked anything.
///
/// # Errors
/// * `Error::ProjectRootInvalid` when the metadata file is missing
/// * `Error::PackageDirectoryMissing` when the skeleton's package directory is missing
/// * `Error::MarkerNotFound` when a document the run edits lacks its markers
pub fn preflight(root: &Path, skeleton: &Skeleton) -> Result<()> {
    if !root.join(&skeleton.metadata_file).is_file() {
        return Err(Error::ProjectRootInvalid {
            root: root.display().to_string(),
            metadata_file: skeleton.metadata_file.display().to_string(),
        });
    }
    let package_dir = root.join(skeleton.package_dir());
    if !package_dir.is_dir() {
        return Err(Error::PackageDirectoryMissing { path: package_dir });
    }
    for document in [&skeleton.readme_file, &skeleton.agent_guide_file] {
        require_markers(&root.join(document), &[TEMPLATE_ONLY_START, TEMPLATE_ONLY_END])?;
    }
    Ok(())
}

/// Preconditions that depend on the collected profile.
pub fn check_target(root: &Path, skeleton: &Skeleton, profile: &ProjectProfile) -> Result<()> {
    let target = root.join(&profile.snake_name);
    if target != root.join(skeleton.package_dir()) && target.exists() {
        return Err(Error::PackageDirectoryExists { path: target });
    }
    if profile.enable_publishing {
        require_markers(&root.join(&skeleton.release_workflow), &[PUBLISHING_START, PUBLISHING_END])?;
    }
    if profile.license.is_some() {
        require_markers(&root.join(&skeleton.pre_commit_file), &[PRE_COMMIT_HOOK_MARKER])?;
    }
    Ok(())
}

/// A missing file passes; a present one must contain every marker.
fn require_markers(path: &Path, markers: &[&str]) -> Result<()> {
    if !path.is_file() {
        return Ok(());
    }
    let content = fs::read_to_string(path)?;
    match markers.iter().find(|marker| !content.contains(**marker)) {
        Some(marker) => Err(Error::MarkerNotFound { path: path.to_path_buf(), marker: marker.to_string() }),
        None => Ok(()),
    }
}

/// Prints the outcome, the resolved profile and the follow-up steps.
pub fn print_summary(summary: &InitSummary) {
    let profile = &summary.profile;
    println!();
    if summary.report.passed {
        println!("==> Project initialized successfully!");
    } else {
        println!("warning: Project initialized with warnings (see below).");
    }

    println!();
    print!("{}", profile.render_summary_rows());

    println!();
    println!("Steps:");
    for step in &summary.steps {
        match &step.outcome {
            StepOutcome::Done => println!("  [done]    {}", step.name),
            StepOutcome::Skipped(reason) => println!("  [skipped] {} ({reason})", step.name),
        }
    }

    if !summary.report.warnings.is_empty() {
        println!();
        println!("Needs manual attention:");
        for warning in &summary.report.warnings {
            println!("  - {warning}");
        }
    }

    println!();
    println!("Next steps:");
    for (i, step) in next_steps(profile).iter().enumerate() {
        println!("  {}. {step}", i + 1);
    }

    if profile.enable_publishing {
        println!();
        println!("PyPI setup:");
        println!("  1. Go to https://pypi.org/manage/account/publishing/");
        println!("  2. Add a trusted publisher:");
        println!("       Owner:    {}", profile.github_owner);
        println!("       Repo:     {}", profile.kebab_name);
        println!("       Workflow: release.yml");
        println!("  3. (Optional) Set up TestPyPI the same way at");
        println!("     https://test.pypi.org/manage/account/publishing/");
        println!("     with workflow: test-publish.yml");
    }
    println!();
}

fn next_steps(profile: &ProjectProfile) -> Vec<String> {
    vec![
        "Review the changes:     git diff".to_string(),
        "Install deps:           uv sync".to_string(),
        "Run tests:              uv run pytest -v --cov".to_string(),
        "Enable pre-commit:      uv run pre-commit install".to_string(),
        format!("Replace the demo code in {}/main.py", profile.snake_name),
        "Commit initialized state:\n       git add -A && git commit -m 'chore: initialize from template'".to_string(),
        "Push to your repo:\n       git remote set-url origin <your-repo-url>\n       git push -u origin main".to_string(),
        "Enable GitHub Pages:    Settings > Pages > Source: GitHub Actions".to_string(),
        "Set up branch protection: ./scripts/setup-repo.sh".to_string(),
    ]
}
