mod common;

use std::fs;
use std::path::{Path, PathBuf};

use common::{
    acme_flags, files_containing, read, skeleton_tree, RecordingSelfRemover, StubLicenseSource, StubPrompter,
    StubToolchain, SKELETON_LICENSE,
};
use skelinit::collector::InputFlags;
use skelinit::config::load_skeleton;
use skelinit::error::{Error, NameError, Result};
use skelinit::orchestrator::{initialize, Collaborators, InitSummary, StepOutcome};
use skelinit::renderer::MiniJinjaRenderer;
use skelinit::toolchain::Toolchain;

struct Harness {
    prompter: StubPrompter,
    licenses: StubLicenseSource,
    toolchain: StubToolchain,
    renderer: MiniJinjaRenderer,
    self_remover: RecordingSelfRemover,
}

impl Harness {
    fn new() -> Self {
        Self {
            prompter: StubPrompter::non_interactive(),
            licenses: StubLicenseSource::reachable(),
            toolchain: StubToolchain::working(),
            renderer: MiniJinjaRenderer::new(),
            self_remover: RecordingSelfRemover::default(),
        }
    }

    fn run(&self, root: &Path, flags: &InputFlags) -> Result<InitSummary> {
        let collaborators = Collaborators {
            prompter: &self.prompter,
            licenses: &self.licenses,
            toolchain: &self.toolchain,
            renderer: &self.renderer,
            self_remover: &self.self_remover,
        };
        initialize(root, load_skeleton(root)?, flags, &collaborators, common::YEAR)
    }
}

/// Every placeholder form, searched outside the files the initializer never owns.
fn leftover_placeholders(root: &Path) -> Vec<PathBuf> {
    let ignored = [
        PathBuf::from("scripts/init.sh"),
        PathBuf::from("scripts/init.py"),
        PathBuf::from("docs/assets/logo.png"),
    ];
    ["python_package_template", "python-package-template", "Python Package Template"]
        .iter()
        .flat_map(|needle| files_containing(root, needle))
        .filter(|path| !ignored.contains(path))
        .collect()
}

#[test_log::test]
fn test_acme_widgets_end_to_end() {
    let tree = skeleton_tree();
    let root = tree.path();
    let harness = Harness::new();

    let summary = harness.run(root, &acme_flags()).unwrap();

    assert!(summary.report.passed, "{:?}", summary.report.warnings);
    assert_eq!(summary.exit_code(), 0);
    assert!(root.join("acme_widgets").is_dir());
    assert!(!root.join("python_package_template").exists());

    let pyproject = read(root, "pyproject.toml");
    assert!(pyproject.contains("name = \"Ada Lovelace\""));
    assert!(pyproject.contains("email = \"ada@example.com\""));
    assert!(pyproject.contains("license = {text = \"MIT\"}"));
    assert!(pyproject.contains("License :: OSI Approved :: MIT License"));
    assert!(pyproject.contains("version = \"0.1.0\""));
    assert!(pyproject.contains("keywords = []"));

    let license = read(root, "LICENSE");
    assert!(license.starts_with("MIT License\n\nCopyright (c) 2026 Ada Lovelace\n"));
    assert_eq!(read(root, "LICENSE_HEADER"), "Copyright 2026 Ada Lovelace\nSPDX-License-Identifier: MIT\n");
    assert!(read(root, "acme_widgets/main.py")
        .starts_with("#!/usr/bin/env python\n# Copyright 2026 Ada Lovelace\n# SPDX-License-Identifier: MIT\n"));
    assert_eq!(read(root, "CHANGELOG.md"), "# CHANGELOG\n\n<!-- version list -->\n");

    assert!(leftover_placeholders(root).is_empty(), "{:?}", leftover_placeholders(root));
}

#[test]
fn test_documents_are_customised() {
    let tree = skeleton_tree();
    let root = tree.path();
    Harness::new().run(root, &acme_flags()).unwrap();

    let readme = read(root, "README.md");
    assert!(readme.starts_with("# Acme Widgets\n"));
    assert!(readme.contains("\nWidget toolkit\n"));
    assert!(readme.contains("git clone https://github.com/adaco/acme-widgets.git"));
    assert!(readme.contains("├── acme_widgets/  # Package source\n"));
    assert!(readme.contains("Licensed under the MIT license."));
    assert!(!readme.contains("codecov"));
    assert!(!readme.contains("TEMPLATE-ONLY"));
    assert!(!readme.contains("init.sh"));

    let claude = read(root, "CLAUDE.md");
    assert!(claude.contains("**acme-widgets** \u{2014} Widget toolkit."));
    assert!(claude.contains("Licensed MIT."));

    assert!(read(root, "docs/index.md").starts_with("# Acme Widgets\n\nWidget toolkit\n"));
    assert_eq!(read(root, ".github/CODEOWNERS"), "* @adaco\n");
    assert!(read(root, "recipe/meta.yaml").contains("    - adaco\n"));
    assert!(read(root, ".pre-commit-config.yaml").contains("id: insert-license"));
    assert!(!read(root, ".github/workflows/ci.yml").contains("cli-tests"));
    assert!(!read(root, ".claude/rules/testing.md").contains("## Template Tests"));
}

#[test]
fn test_pruning_and_self_removal() {
    let tree = skeleton_tree();
    let root = tree.path();
    let harness = Harness::new();

    let summary = harness.run(root, &acme_flags()).unwrap();

    for pruned in ["tests/template", "tests/e2e", "cli", ".dockerignore", ".github/workflows/e2e.yml"] {
        assert!(!root.join(pruned).exists(), "{pruned} should be pruned");
    }
    let calls = harness.self_remover.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], vec![PathBuf::from("scripts/init.sh"), PathBuf::from("scripts/init.py")]);
    assert_eq!(summary.removed_entry_points.len(), 2);
    assert_eq!(*harness.toolchain.calls.borrow(), vec!["lock", "import acme_widgets"]);
    assert_eq!(read(root, "uv.lock"), "[[package]]\nname = \"regenerated\"\n");
}

#[test]
fn test_license_fetch_failure_is_a_single_warning() {
    let tree = skeleton_tree();
    let root = tree.path();
    let harness = Harness { licenses: StubLicenseSource::unreachable(), ..Harness::new() };

    let summary = harness.run(root, &acme_flags()).unwrap();

    assert_eq!(read(root, "LICENSE"), SKELETON_LICENSE);
    assert_eq!(summary.report.warnings.len(), 1, "{:?}", summary.report.warnings);
    assert!(summary.report.warnings[0].contains("LICENSE"));
    assert!(!summary.report.passed);
    assert_ne!(summary.exit_code(), 0);
    // Metadata still reflects the chosen license.
    assert!(read(root, "pyproject.toml").contains("license = {text = \"MIT\"}"));
}

#[test]
fn test_unreadable_file_is_reported_but_run_completes() {
    let tree = skeleton_tree();
    let root = tree.path();
    fs::write(root.join("legacy.txt"), b"\xff python_package_template\n").unwrap();
    fs::write(root.join("docs/extra.md"), "see python_package_template\n").unwrap();

    let harness = Harness::new();
    let summary = harness.run(root, &acme_flags()).unwrap();

    assert!(!summary.report.passed);
    assert_ne!(summary.exit_code(), 0);
    assert_eq!(summary.report.warnings.len(), 1);
    assert!(summary.report.warnings[0].contains("legacy.txt"));
    assert_eq!(read(root, "docs/extra.md"), "see acme_widgets\n");
    assert!(root.join("acme_widgets").is_dir());
    assert_eq!(harness.self_remover.calls.borrow().len(), 1);
}

#[test_log::test]
fn test_unreadable_source_file_does_not_stop_the_run() {
    let tree = skeleton_tree();
    let root = tree.path();
    fs::write(root.join("tests/legacy_latin1.py"), b"# caf\xe9\nx = 1\n").unwrap();

    let harness = Harness::new();
    let summary = harness.run(root, &acme_flags()).unwrap();

    assert_ne!(summary.exit_code(), 0);
    let mentions: Vec<&String> =
        summary.report.warnings.iter().filter(|w| w.contains("legacy_latin1.py")).collect();
    assert_eq!(mentions.len(), 2, "{:?}", summary.report.warnings);
    assert!(mentions.iter().any(|w| w.starts_with("Could not add a license header to tests/legacy_latin1.py")));
    // Other files still got their headers and the later stages ran.
    assert!(read(root, "tests/test_main.py").starts_with("# Copyright 2026 Ada Lovelace\n"));
    assert!(!root.join("tests/template").exists());
    assert_eq!(*harness.toolchain.calls.borrow(), vec!["lock", "import acme_widgets"]);
    assert_eq!(harness.self_remover.calls.borrow().len(), 1);
}

#[test]
fn test_unreadable_metadata_file_becomes_warnings() {
    let tree = skeleton_tree();
    let root = tree.path();
    let mut pyproject = fs::read(root.join("pyproject.toml")).unwrap();
    pyproject.extend_from_slice(b"# \xff\n");
    fs::write(root.join("pyproject.toml"), pyproject).unwrap();

    let harness = Harness::new();
    let summary = harness.run(root, &acme_flags()).unwrap();

    assert_ne!(summary.exit_code(), 0);
    assert!(summary.report.warnings.iter().any(|w| w.starts_with("Could not rewrite pyproject.toml")));
    let updates: Vec<&String> =
        summary.report.warnings.iter().filter(|w| w.starts_with("Could not update pyproject.toml")).collect();
    assert_eq!(updates.len(), 1, "{:?}", summary.report.warnings);
    // The rest of the tree was still initialized.
    assert!(root.join("acme_widgets").is_dir());
    assert!(read(root, "LICENSE").starts_with("MIT License\n"));
    assert_eq!(read(root, "CHANGELOG.md"), "# CHANGELOG\n\n<!-- version list -->\n");
    assert_eq!(harness.self_remover.calls.borrow().len(), 1);
}

#[cfg(unix)]
#[test]
fn test_unwalkable_directory_is_reported_but_run_completes() {
    use std::os::unix::fs::PermissionsExt;

    let tree = skeleton_tree();
    let root = tree.path();
    let private = root.join("private");
    fs::create_dir(&private).unwrap();
    fs::write(private.join("notes.md"), "python_package_template\n").unwrap();
    fs::set_permissions(&private, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&private).is_ok() {
        // Permissions are not enforced for this user.
        fs::set_permissions(&private, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let harness = Harness::new();
    let result = harness.run(root, &acme_flags());
    fs::set_permissions(&private, fs::Permissions::from_mode(0o755)).unwrap();
    let summary = result.unwrap();

    assert_ne!(summary.exit_code(), 0);
    assert!(summary.report.warnings.iter().any(|w| w.starts_with("Could not read private")));
    assert!(summary
        .report
        .warnings
        .iter()
        .any(|w| w.starts_with("Could not scan for stale template references in:\n    private")));
    assert!(read(root, "pyproject.toml").contains("name = \"acme-widgets\""));
    assert_eq!(harness.self_remover.calls.borrow().len(), 1);
}

/// Writes a placeholder file during the lockfile step, after the rewrite.
struct LateWriter(StubToolchain);

impl Toolchain for LateWriter {
    fn regenerate_lockfile(&self, root: &Path) -> Result<()> {
        fs::write(root.join("NOTES.md"), "python-package-template leftovers\n")?;
        self.0.regenerate_lockfile(root)
    }

    fn verify_importable(&self, root: &Path, module: &str) -> Result<()> {
        self.0.verify_importable(root, module)
    }
}

#[test]
fn test_stale_reference_fails_validation() {
    let tree = skeleton_tree();
    let root = tree.path();
    let harness = Harness::new();
    let late = LateWriter(StubToolchain::working());
    let collaborators = Collaborators {
        prompter: &harness.prompter,
        licenses: &harness.licenses,
        toolchain: &late,
        renderer: &harness.renderer,
        self_remover: &harness.self_remover,
    };

    let summary = initialize(root, load_skeleton(root).unwrap(), &acme_flags(), &collaborators, common::YEAR).unwrap();

    assert_eq!(summary.report.warnings.len(), 1);
    assert!(summary.report.warnings[0].starts_with("Stale template references found in:"));
    assert!(summary.report.warnings[0].contains("NOTES.md"));
    assert_eq!(summary.exit_code(), 1);
    // Everything else was still applied.
    assert!(read(root, "pyproject.toml").contains("name = \"acme-widgets\""));
    assert_eq!(harness.self_remover.calls.borrow().len(), 1);
}

#[test]
fn test_lockfile_and_import_failures_are_warnings() {
    let tree = skeleton_tree();
    let root = tree.path();
    let harness = Harness {
        toolchain: StubToolchain { lock_ok: false, import_ok: false, calls: Default::default() },
        ..Harness::new()
    };

    let summary = harness.run(root, &acme_flags()).unwrap();

    assert_eq!(summary.report.warnings.len(), 2);
    assert!(summary.report.warnings[0].contains("\"uv lock\""));
    assert!(summary.report.warnings[1].contains("uv run python -c import acme_widgets"));
    assert!(summary
        .steps
        .iter()
        .any(|s| s.name == "Regenerate lockfile" && matches!(s.outcome, StepOutcome::Skipped(_))));
}

#[test]
fn test_skipping_license_keeps_license_files() {
    let tree = skeleton_tree();
    let root = tree.path();
    let flags = InputFlags { license: Some("none".into()), ..acme_flags() };

    let summary = Harness::new().run(root, &flags).unwrap();

    assert!(summary.report.passed);
    assert_eq!(read(root, "LICENSE"), SKELETON_LICENSE);
    assert!(!root.join("LICENSE_HEADER").exists());
    assert!(read(root, "pyproject.toml").contains("license = {text = \"Apache-2.0\"}"));
    assert!(read(root, "README.md").contains("Licensed under the Apache-2.0 license."));
    assert!(summary
        .steps
        .iter()
        .any(|s| s.name == "License setup" && s.outcome == StepOutcome::Skipped("no license selected".into())));
}

#[test]
fn test_publishing_enabled() {
    let tree = skeleton_tree();
    let root = tree.path();
    let flags = InputFlags { enable_publishing: true, ..acme_flags() };

    let summary = Harness::new().run(root, &flags).unwrap();

    assert!(summary.profile.enable_publishing);
    let release = read(root, ".github/workflows/release.yml");
    assert!(release.contains("      - name: Publish to PyPI\n"));
    assert!(!release.contains("PYPI-START"));
}

#[test]
fn test_input_errors_leave_tree_untouched() {
    let tree = skeleton_tree();
    let root = tree.path();
    let flags = InputFlags { name: Some("json".into()), ..acme_flags() };
    let harness = Harness::new();

    let err = harness.run(root, &flags).unwrap_err();

    assert!(matches!(err, Error::Name(NameError::StdlibCollision { .. })));
    assert!(root.join("python_package_template").is_dir());
    assert!(read(root, "pyproject.toml").contains("python-package-template"));
    assert!(harness.self_remover.calls.borrow().is_empty());
}

#[test]
fn test_declined_confirmation_aborts_before_changes() {
    let tree = skeleton_tree();
    let root = tree.path();
    let harness = Harness {
        prompter: StubPrompter::interactive().with_confirms(&[false]),
        ..Harness::new()
    };
    let flags = InputFlags { assume_yes: false, enable_publishing: true, ..acme_flags() };

    let err = harness.run(root, &flags).unwrap_err();

    assert!(matches!(err, Error::Aborted));
    assert!(root.join("python_package_template").is_dir());
}

#[test]
fn test_preflight_failures() {
    let tree = skeleton_tree();
    let root = tree.path();
    let harness = Harness::new();

    fs::rename(root.join("python_package_template"), root.join("elsewhere")).unwrap();
    assert!(matches!(harness.run(root, &acme_flags()), Err(Error::PackageDirectoryMissing { .. })));
    fs::rename(root.join("elsewhere"), root.join("python_package_template")).unwrap();

    fs::create_dir(root.join("acme_widgets")).unwrap();
    assert!(matches!(harness.run(root, &acme_flags()), Err(Error::PackageDirectoryExists { .. })));
    fs::remove_dir(root.join("acme_widgets")).unwrap();

    fs::write(root.join("CLAUDE.md"), "# CLAUDE.md\n").unwrap();
    assert!(matches!(harness.run(root, &acme_flags()), Err(Error::MarkerNotFound { .. })));

    fs::remove_file(root.join("pyproject.toml")).unwrap();
    assert!(matches!(harness.run(root, &acme_flags()), Err(Error::ProjectRootInvalid { .. })));

    assert!(harness.self_remover.calls.borrow().is_empty());
}

#[test]
fn test_self_removal_failure_keeps_exit_status() {
    let tree = skeleton_tree();
    let harness = Harness {
        self_remover: RecordingSelfRemover { fail: true, ..Default::default() },
        ..Harness::new()
    };

    let summary = harness.run(tree.path(), &acme_flags()).unwrap();

    assert!(summary.report.passed);
    assert_eq!(summary.exit_code(), 0);
    assert!(summary.self_removal_error.is_some());
}

#[test]
fn test_skeleton_configuration_is_loaded_and_pruned() {
    let tree = skeleton_tree();
    let root = tree.path();
    fs::write(root.join("skeleton.json"), r#"{"license_header_dirs": []}"#).unwrap();

    Harness::new().run(root, &acme_flags()).unwrap();

    assert!(!root.join("skeleton.json").exists());
    assert_eq!(read(root, "tests/test_main.py"), "from acme_widgets.main import hello\n");
}
