//! Command-line interface implementation for skelinit.
//! Provides argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments structure for skelinit.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "skelinit: turn the package skeleton into your project",
    long_about = None
)]
pub struct Args {
    /// Package name (kebab-case or snake_case)
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Author name (e.g. "Jane Smith")
    #[arg(long)]
    pub author: Option<String>,

    /// Author email
    #[arg(long)]
    pub email: Option<String>,

    /// GitHub username or organization
    #[arg(long)]
    pub github_owner: Option<String>,

    /// Short project description
    #[arg(long)]
    pub description: Option<String>,

    /// License key (e.g. mit, bsd-3-clause, gpl-3.0), or "none" to keep the current license
    #[arg(long, value_name = "KEY")]
    pub license: Option<String>,

    /// Enable publishing steps in the release workflow
    #[arg(long, visible_alias = "pypi")]
    pub enable_publishing: bool,

    /// Project root to initialize
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Do not contact the license metadata service
    #[arg(long)]
    pub offline: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => e.exit(),
    }
}
