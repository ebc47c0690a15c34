#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use skelinit::collector::InputFlags;
use skelinit::config::Skeleton;
use skelinit::error::{Error, Result};
use skelinit::license::{LicenseDocument, LicenseSource, LicenseSummary};
use skelinit::orchestrator::SelfRemover;
use skelinit::prompt::Prompter;
use skelinit::toolchain::Toolchain;
use tempfile::TempDir;
use walkdir::WalkDir;

pub const YEAR: i32 = 2026;

pub const MIT_BODY: &str = "MIT License\n\nCopyright (c) [year] [fullname]\n\n\
Permission is hereby granted, free of charge, to any person obtaining a copy\n\
of this software and associated documentation files (the \"Software\").\n";

pub const SKELETON_LICENSE: &str = "Apache License\nVersion 2.0, January 2004\n";

fn pyproject() -> String {
    r#"[project]
name = "python-package-template"
version = "1.4.2"
description = "A production-ready template for starting new Python packages."
readme = "README.md"
authors = [
    {name = "Michael Ellis", email = "michaelellis003@gmail.com"},
]
license = {text = "Apache-2.0"}
keywords = ["template", "python", "uv", "ruff", "pyright"]
classifiers = [
    "License :: OSI Approved :: Apache Software License",
    "Programming Language :: Python :: 3",
]

[project.urls]
Homepage = "https://github.com/michaelellis003/python-package-template"
Repository = "https://github.com/michaelellis003/uv-python-template"
Documentation = "https://michaelellis003.github.io/uv-python-template/"

[tool.uv]
# TODO: Update the --upgrade-package list before release
dev-dependencies = ["pytest"]

[tool.coverage.run]
source = ["python_package_template"]
"#
    .to_string()
}

fn readme() -> String {
    format!(
        r#"# Python Package Template

[![codecov](https://codecov.io/gh/michaelellis003/python-package-template/graph/badge.svg)](https://codecov.io/gh/michaelellis003/python-package-template)
[![CI](https://github.com/michaelellis003/python-package-template/actions/workflows/ci.yml/badge.svg)](https://github.com/michaelellis003/python-package-template/actions)

{}

<!-- TEMPLATE-ONLY-START -->
## Using This Template

Run `./scripts/init.sh` and answer the questions.
<!-- TEMPLATE-ONLY-END -->

## Project Structure

```
├── python_package_template/  # Package source (rename this)
├── tests/
│   ├── template/             # Template structure tests
│   └── test_main.py
├── scripts/
│   ├── init.sh               # Interactive project initialization
│   └── setup-repo.sh
```

## CI

### On Push to Main and Pull Request (e2e.yml)

Builds the Docker image and runs the end-to-end suite.

### On Release

Publishes documentation.

Licensed under the Apache-2.0 license (configurable via init.py).
"#,
        Skeleton::default().readme_description
    )
}

const CLAUDE_MD: &str = r#"# CLAUDE.md

<!-- TEMPLATE-ONLY-START -->
This repository is a template. Run scripts/init.py to initialize it.
<!-- TEMPLATE-ONLY-END -->

## Structure

```
├── python_package_template/  # Package source
├── tests/
│   ├── template/   # Template structure tests
│   ├── e2e/        # E2E container tests
│   └── test_main.py
```
"#;

const CI_WORKFLOW: &str = r#"name: CI
on: [push]
jobs:
  lint:
    runs-on: ubuntu-latest
    steps:
      - run: uv run ruff check python_package_template

  # CLI package tests
  cli-tests:
    runs-on: ubuntu-latest
    steps:
      - run: cd cli && uv run pytest

  ci-pass:
    needs: [lint, cli-tests]
    runs-on: ubuntu-latest
"#;

const RELEASE_WORKFLOW: &str = r#"name: Release
jobs:
  release:
    steps:
      - uses: actions/checkout@v4
      # Run init.py with --pypi, or uncomment the block below to publish.
      # PYPI-START
      # - name: Publish to PyPI
      #
      #   uses: pypa/gh-action-pypi-publish@release/v1
      # PYPI-END
"#;

const PRE_COMMIT: &str = r#"repos:
  # Keep rev in sync with ruff version
  - repo: https://github.com/astral-sh/ruff-pre-commit
    rev: v0.6.0
"#;

const TESTING_GUIDE: &str = r#"# Testing

## Unit Tests

Run pytest.

## Template Tests

Run tests/template against python_package_template.

## Coverage

Use --cov.
"#;

const RECIPE: &str = r#"package:
  name: python-package-template
about:
  summary: A production-ready template for starting new Python packages.
  license: Apache-2.0
extra:
  recipe-maintainers:
    - michaelellis003
"#;

/// Files of the skeleton fixture, relative path and content.
pub fn skeleton_files() -> Vec<(&'static str, String)> {
    vec![
        ("pyproject.toml", pyproject()),
        ("README.md", readme()),
        ("CLAUDE.md", CLAUDE_MD.to_string()),
        ("CHANGELOG.md", "# CHANGELOG\n\n## v1.4.2\n- Released by Michael Ellis\n".to_string()),
        ("LICENSE", SKELETON_LICENSE.to_string()),
        ("uv.lock", "[[package]]\nname = \"python-package-template\"\n".to_string()),
        ("python_package_template/__init__.py", "\"\"\"Python Package Template.\"\"\"\n".to_string()),
        (
            "python_package_template/main.py",
            "#!/usr/bin/env python\n\"\"\"Entry point for python-package-template.\"\"\"\n\n\ndef hello() -> str:\n    return 'hello'\n"
                .to_string(),
        ),
        ("tests/test_main.py", "from python_package_template.main import hello\n".to_string()),
        (
            "tests/template/test_template_structure.py",
            "import python_package_template\n".to_string(),
        ),
        ("tests/e2e/Dockerfile", "FROM python:3.12\n".to_string()),
        ("cli/pyproject.toml", "[project]\nname = \"pypkgkit\"\n".to_string()),
        ("scripts/init.sh", "#!/bin/sh\npython scripts/init.py \"$@\"\n".to_string()),
        ("scripts/init.py", "PLACEHOLDER = 'python_package_template'\n".to_string()),
        ("recipe/meta.yaml", RECIPE.to_string()),
        ("docs/index.md", "# Python Package Template\n\nSkeleton docs.\n".to_string()),
        (".github/CODEOWNERS", "* @michaelellis003\n".to_string()),
        (".github/workflows/ci.yml", CI_WORKFLOW.to_string()),
        (".github/workflows/release.yml", RELEASE_WORKFLOW.to_string()),
        (".github/workflows/e2e.yml", "name: E2E\n".to_string()),
        (".github/workflows/cli-release.yml", "name: CLI Release\n".to_string()),
        (".dockerignore", ".venv\n".to_string()),
        (".pre-commit-config.yaml", PRE_COMMIT.to_string()),
        (".claude/rules/testing.md", TESTING_GUIDE.to_string()),
    ]
}

pub fn write_files(root: &Path, files: &[(&str, String)]) {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

/// A temporary directory holding a complete, unconfigured skeleton.
pub fn skeleton_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_files(dir.path(), &skeleton_files());
    // Binary content is never touched, even when it contains the placeholder.
    fs::create_dir_all(dir.path().join("docs/assets")).unwrap();
    fs::write(dir.path().join("docs/assets/logo.png"), b"\x89PNG\r\n\x1a\npython_package_template\xff").unwrap();
    dir
}

pub fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

/// Copies a directory tree.
pub fn copy_tree(source: &Path, target: &Path) {
    for entry in WalkDir::new(source) {
        let entry = entry.unwrap();
        let relative = entry.path().strip_prefix(source).unwrap();
        let destination = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination).unwrap();
        } else {
            fs::copy(entry.path(), &destination).unwrap();
        }
    }
}

/// Relative paths of every file under `root` whose content contains `needle`.
pub fn files_containing(root: &Path, needle: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| fs::read(e.path()).map(|c| String::from_utf8_lossy(&c).contains(needle)).unwrap_or(false))
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect()
}

/// Flags for the acme-widgets scenario.
pub fn acme_flags() -> InputFlags {
    InputFlags {
        name: Some("acme-widgets".to_string()),
        author: Some("Ada Lovelace".to_string()),
        email: Some("ada@example.com".to_string()),
        github_owner: Some("adaco".to_string()),
        description: Some("Widget toolkit".to_string()),
        license: Some("mit".to_string()),
        enable_publishing: false,
        assume_yes: true,
    }
}

/// Answers questions from queues filled by the test.
#[derive(Default)]
pub struct StubPrompter {
    pub interactive: bool,
    pub texts: RefCell<VecDeque<String>>,
    pub confirms: RefCell<VecDeque<bool>>,
    pub selects: RefCell<VecDeque<usize>>,
    /// Every prompt shown, in order.
    pub asked: RefCell<Vec<String>>,
}

impl StubPrompter {
    pub fn non_interactive() -> Self {
        Self::default()
    }

    pub fn interactive() -> Self {
        Self { interactive: true, ..Self::default() }
    }

    pub fn with_texts(self, texts: &[&str]) -> Self {
        self.texts.borrow_mut().extend(texts.iter().map(|t| t.to_string()));
        self
    }

    pub fn with_confirms(self, answers: &[bool]) -> Self {
        self.confirms.borrow_mut().extend(answers.iter().copied());
        self
    }

    pub fn with_selects(self, answers: &[usize]) -> Self {
        self.selects.borrow_mut().extend(answers.iter().copied());
        self
    }
}

impl Prompter for StubPrompter {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn text(&self, prompt: &str) -> Result<String> {
        self.asked.borrow_mut().push(prompt.to_string());
        self.texts
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::PromptError(format!("no answer for '{prompt}'")))
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        self.asked.borrow_mut().push(prompt.to_string());
        Ok(self.confirms.borrow_mut().pop_front().unwrap_or(default))
    }

    fn select(&self, prompt: &str, _items: &[String], default: usize) -> Result<usize> {
        self.asked.borrow_mut().push(prompt.to_string());
        Ok(self.selects.borrow_mut().pop_front().unwrap_or(default))
    }
}

/// In-memory license source.
pub struct StubLicenseSource {
    pub reachable: bool,
    pub fetches: RefCell<Vec<String>>,
}

impl StubLicenseSource {
    pub fn reachable() -> Self {
        Self { reachable: true, fetches: RefCell::new(Vec::new()) }
    }

    pub fn unreachable() -> Self {
        Self { reachable: false, fetches: RefCell::new(Vec::new()) }
    }
}

impl LicenseSource for StubLicenseSource {
    fn list(&self) -> Result<Vec<LicenseSummary>> {
        if !self.reachable {
            return Err(Error::LicenseFetchUnavailable { key: "*".into(), reason: "timed out".into() });
        }
        Ok(vec![
            LicenseSummary { key: "apache-2.0".into(), name: "Apache License 2.0".into() },
            LicenseSummary { key: "mit".into(), name: "MIT License".into() },
            LicenseSummary { key: "wtfpl".into(), name: "Do What The F*ck You Want To Public License".into() },
        ])
    }

    fn fetch(&self, key: &str) -> Result<LicenseDocument> {
        self.fetches.borrow_mut().push(key.to_string());
        if !self.reachable {
            return Err(Error::LicenseFetchUnavailable { key: key.into(), reason: "timed out".into() });
        }
        Ok(LicenseDocument { key: key.into(), name: "MIT License".into(), body: MIT_BODY.into() })
    }
}

/// Toolchain that records calls instead of running commands.
pub struct StubToolchain {
    pub lock_ok: bool,
    pub import_ok: bool,
    pub calls: RefCell<Vec<String>>,
}

impl StubToolchain {
    pub fn working() -> Self {
        Self { lock_ok: true, import_ok: true, calls: RefCell::new(Vec::new()) }
    }
}

impl Toolchain for StubToolchain {
    fn regenerate_lockfile(&self, root: &Path) -> Result<()> {
        self.calls.borrow_mut().push("lock".to_string());
        if !self.lock_ok {
            return Err(Error::CommandFailed { command: "uv lock".into(), reason: "exit status: 2".into() });
        }
        fs::write(root.join("uv.lock"), "[[package]]\nname = \"regenerated\"\n")?;
        Ok(())
    }

    fn verify_importable(&self, root: &Path, module: &str) -> Result<()> {
        self.calls.borrow_mut().push(format!("import {module}"));
        if self.import_ok && root.join(module).is_dir() {
            Ok(())
        } else {
            Err(Error::CommandFailed { command: format!("import {module}"), reason: "ModuleNotFoundError".into() })
        }
    }
}

/// Records the terminal self-removal step without touching the tree.
#[derive(Default)]
pub struct RecordingSelfRemover {
    pub fail: bool,
    pub calls: RefCell<Vec<Vec<PathBuf>>>,
}

impl SelfRemover for RecordingSelfRemover {
    fn remove(&self, _root: &Path, entry_points: &[PathBuf]) -> Result<Vec<PathBuf>> {
        self.calls.borrow_mut().push(entry_points.to_vec());
        if self.fail {
            return Err(Error::IoError(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only")));
        }
        Ok(entry_points.to_vec())
    }
}
