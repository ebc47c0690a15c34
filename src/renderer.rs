//! Rendering of the text blocks the initializer generates.
//! Templates are MiniJinja sources rendered against the serialised profile.

use minijinja::Environment;
use serde::Serialize;

use crate::error::Result;
use crate::profile::ProjectProfile;

/// Getting-started section replacing the skeleton-only README block.
pub const GETTING_STARTED: &str = r#"## Getting Started

### Prerequisites
- Python 3.10+
- [uv](https://docs.astral.sh/uv/getting-started/installation/)

### Installation

```bash
git clone https://github.com/{{ github_repo }}.git
cd {{ kebab_name }}
uv sync
```

### Running Tests

```bash
uv run pytest -v --cov
```

### Pre-commit Hooks

```bash
uv run pre-commit install
```
"#;

/// One-line project blurb replacing the skeleton-only agent guide block.
pub const PROJECT_BLURB: &str = "**{{ kebab_name }}** \u{2014} {{ description }}. Uses uv, Ruff, Pyright, and pre-commit\nhooks. Licensed {{ license_name }}.\n";

pub const DOCS_INDEX: &str = r#"# {{ title_name }}

{{ description }}

## Features

- **[uv](https://docs.astral.sh/uv/)** for fast Python package management
- **[Ruff](https://docs.astral.sh/ruff/)** for linting and formatting
- **[Pyright](https://github.com/microsoft/pyright)** for static type checking
- **[Pytest](https://docs.pytest.org/)** with coverage for testing
- **GitHub Actions** CI/CD with auto-release on merge to main

## Quick Start

```bash
git clone https://github.com/{{ github_repo }}.git
cd {{ kebab_name }}
uv sync
uv run pytest -v --cov
```

## Next Steps

- [API Reference](api.md) — auto-generated documentation for all public functions
"#;

pub const LICENSE_HEADER: &str = "Copyright {{ year }} {{ author_name }}\nSPDX-License-Identifier: {{ spdx_id }}\n";

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        Ok(self.env.render_str(template, context)?)
    }
}

#[derive(Serialize)]
struct RenderContext<'a> {
    #[serde(flatten)]
    profile: &'a ProjectProfile,
    year: i32,
    license_name: String,
    spdx_id: Option<&'a str>,
}

/// Builds the rendering context for a profile.
///
/// `license_name` falls back to `fallback_license` when the profile keeps the
/// skeleton's license.
pub fn profile_context(profile: &ProjectProfile, year: i32, fallback_license: &str) -> Result<serde_json::Value> {
    let context = RenderContext {
        profile,
        year,
        license_name: profile
            .license_spdx()
            .map(str::to_string)
            .unwrap_or_else(|| fallback_license.to_string()),
        spdx_id: profile.license_spdx(),
    };
    Ok(serde_json::to_value(context)?)
}
