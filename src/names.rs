//! Package name transforms and validation.

use std::sync::OnceLock;

use heck::ToTitleCase;
use regex::Regex;

use crate::constants::STDLIB_MODULES;
use crate::error::{Error, NameError, Result};

const DEFAULT_RESERVED: [&str; 2] = ["python-package-template", "python_package_template"];

fn name_regex() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| Regex::new(r"^[a-z]([a-z0-9_-]*[a-z0-9])?$").expect("valid regex"))
}

fn owner_regex() -> &'static Regex {
    static OWNER_RE: OnceLock<Regex> = OnceLock::new();
    OWNER_RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?$").expect("valid regex")
    })
}

/// Hyphens become underscores.
pub fn to_snake_case(name: &str) -> String {
    name.replace('-', "_")
}

/// Underscores become hyphens.
pub fn to_kebab_case(name: &str) -> String {
    name.replace('_', "-")
}

/// Capitalizes each hyphen- or underscore-delimited word and joins them with spaces.
pub fn to_title_case(name: &str) -> String {
    to_kebab_case(name).to_title_case()
}

/// Validates a package name against the default skeleton's reserved names.
pub fn validate_name(name: &str) -> std::result::Result<(), NameError> {
    validate_name_with(name, &DEFAULT_RESERVED)
}

/// Validates a package name.
///
/// # Errors
/// * `NameError::InvalidFormat` when the name does not match `^[a-z]([a-z0-9_-]*[a-z0-9])?$`
/// * `NameError::ReservedName` when it equals one of `reserved`
/// * `NameError::StdlibCollision` when its snake_case form is a standard library module
pub fn validate_name_with<S: AsRef<str>>(
    name: &str,
    reserved: &[S],
) -> std::result::Result<(), NameError> {
    if !name_regex().is_match(name) {
        return Err(NameError::InvalidFormat { name: name.to_string() });
    }

    if reserved.iter().any(|r| r.as_ref() == name) {
        return Err(NameError::ReservedName { name: name.to_string() });
    }

    let snake = to_snake_case(name);
    if STDLIB_MODULES.contains(&snake.as_str()) {
        return Err(NameError::StdlibCollision { name: name.to_string(), module: snake });
    }

    Ok(())
}

pub fn validate_github_owner(owner: &str) -> Result<()> {
    if owner_regex().is_match(owner) {
        Ok(())
    } else {
        Err(Error::InvalidGithubOwner { owner: owner.to_string() })
    }
}
