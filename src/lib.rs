//! skelinit turns a generic package skeleton into a concrete project.
//! It renames the package, rewrites names, authors and URLs across the tree,
//! sets up a license, prunes skeleton-only scaffolding, validates the result
//! and finally removes its own entry points.

/// Command-line interface module for skelinit
pub mod cli;

/// Gathers the project profile from flags and prompts
pub mod collector;

/// Skeleton description
/// Supports JSON and YAML overrides (skeleton.json, skeleton.yml, skeleton.yaml)
pub mod config;

pub mod constants;

/// Error types and handling for skelinit
pub mod error;

/// File set enumeration and exclusion patterns
/// Processes .initignore files to exclude additional paths
pub mod ignore;

/// License listing, resolution and classifier mapping
pub mod license;

/// Package name case conversions and validation
pub mod names;

/// Sequences the whole initialization run
pub mod orchestrator;

pub mod profile;

/// User input and interaction handling
pub mod prompt;

/// Removal of skeleton-only files and their documentation references
pub mod pruner;

/// Rendering of generated text blocks
pub mod renderer;

/// Bulk substitution and structural file edits
pub mod rewriter;

/// Ordered substitution rules
pub mod rules;

/// Lockfile regeneration and import checks through external commands
pub mod toolchain;

/// Post-initialization checks and the final report
pub mod validator;
