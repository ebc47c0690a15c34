//! Input collection.
//! Builds a [`ProjectProfile`] from command-line flags, asking the user for
//! anything missing when a terminal is attached and failing fast otherwise.

use log::debug;

use crate::cli::Args;
use crate::error::{Error, Result};
use crate::license::{LicenseInfo, LicenseResolver};
use crate::names::{to_kebab_case, validate_github_owner, validate_name_with};
use crate::profile::ProjectProfile;
use crate::prompt::Prompter;

/// Values supplied on the command line, before prompting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFlags {
    pub name: Option<String>,
    pub author: Option<String>,
    pub email: Option<String>,
    pub github_owner: Option<String>,
    pub description: Option<String>,
    pub license: Option<String>,
    pub enable_publishing: bool,
    /// Skip the final confirmation.
    pub assume_yes: bool,
}

impl From<&Args> for InputFlags {
    fn from(args: &Args) -> Self {
        Self {
            name: args.name.clone(),
            author: args.author.clone(),
            email: args.email.clone(),
            github_owner: args.github_owner.clone(),
            description: args.description.clone(),
            license: args.license.clone(),
            enable_publishing: args.enable_publishing,
            assume_yes: args.yes,
        }
    }
}

/// A required single-valued field and the flag that supplies it.
struct Field {
    label: &'static str,
    flag: &'static str,
}

const NAME: Field = Field { label: "Package name", flag: "--name" };
const AUTHOR: Field = Field { label: "Author name", flag: "--author" };
const EMAIL: Field = Field { label: "Author email", flag: "--email" };
const OWNER: Field = Field { label: "GitHub owner", flag: "--github-owner" };
const DESCRIPTION: Field = Field { label: "Short description", flag: "--description" };

/// Collects the project profile.
///
/// # Arguments
/// * `flags` - Values given on the command line
/// * `reserved` - Names the new package may not take
/// * `prompter` - Source of answers for missing values
/// * `licenses` - Resolver used to validate or offer license keys
///
/// # Errors
/// * Input errors for missing, malformed or multi-line values
pub fn collect<S: AsRef<str>>(
    flags: &InputFlags,
    reserved: &[S],
    prompter: &dyn Prompter,
    licenses: &LicenseResolver,
) -> Result<ProjectProfile> {
    let name = to_kebab_case(&required(flags.name.as_deref(), &NAME, prompter)?);
    validate_name_with(&name, reserved)?;

    let author = required(flags.author.as_deref(), &AUTHOR, prompter)?;
    ensure_single_line(&author, AUTHOR.label)?;

    let email = required(flags.email.as_deref(), &EMAIL, prompter)?;
    validate_email(&email)?;

    let github_owner = required(flags.github_owner.as_deref(), &OWNER, prompter)?;
    validate_github_owner(&github_owner)?;

    let description = required(flags.description.as_deref(), &DESCRIPTION, prompter)?;
    validate_description(&description)?;

    let enable_publishing = collect_publishing(flags.enable_publishing, prompter)?;
    let license = collect_license(flags.license.as_deref(), prompter, licenses)?;

    let profile = ProjectProfile::new(
        &name,
        author,
        email,
        github_owner,
        description,
        license,
        enable_publishing,
    );
    debug!("Collected profile: {profile:?}");
    Ok(profile)
}

/// Prints the profile and asks for confirmation when a terminal is attached.
///
/// # Errors
/// * `Error::Aborted` when the user declines
pub fn confirm(profile: &ProjectProfile, assume_yes: bool, prompter: &dyn Prompter) -> Result<()> {
    println!("{}", "-".repeat(41));
    print!("{}", profile.render_summary_rows());
    println!("{}", "-".repeat(41));

    if assume_yes || !prompter.is_interactive() {
        return Ok(());
    }
    if prompter.confirm("Proceed?", true)? {
        Ok(())
    } else {
        Err(Error::Aborted)
    }
}

fn required(value: Option<&str>, field: &Field, prompter: &dyn Prompter) -> Result<String> {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        return Ok(value.to_string());
    }

    if !prompter.is_interactive() {
        return Err(Error::MissingRequiredField {
            field: field.label.to_string(),
            flag: field.flag.to_string(),
        });
    }

    loop {
        let answer = prompter.text(field.label)?;
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
        println!("  {} cannot be empty.", field.label);
    }
}

fn ensure_single_line(value: &str, field: &str) -> Result<()> {
    if value.contains('\n') || value.contains('\r') {
        return Err(Error::MultilineValueRejected { field: field.to_string() });
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    ensure_single_line(email, EMAIL.label)?;
    if !email.contains('@') {
        return Err(Error::InvalidEmail { email: email.to_string() });
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(Error::EmptyValue { field: DESCRIPTION.label.to_string() });
    }
    ensure_single_line(description, DESCRIPTION.label)
}

fn collect_publishing(flag: bool, prompter: &dyn Prompter) -> Result<bool> {
    if flag {
        return Ok(true);
    }
    if !prompter.is_interactive() {
        return Ok(false);
    }
    prompter.confirm("Enable PyPI publishing?", false)
}

fn collect_license(
    key: Option<&str>,
    prompter: &dyn Prompter,
    licenses: &LicenseResolver,
) -> Result<Option<LicenseInfo>> {
    if let Some(key) = key {
        return licenses.find(key);
    }
    if !prompter.is_interactive() {
        return Ok(None);
    }

    let listing = licenses.list_licenses();
    if listing.abbreviated {
        println!("note: license list unavailable, showing common licenses only");
    }
    let mut items = vec!["Skip (keep existing license)".to_string()];
    items.extend(listing.licenses.iter().map(|l| format!("{} ({})", l.name, l.key)));

    let choice = prompter.select("Select a license", &items, 0)?;
    match choice {
        0 => Ok(None),
        n if n <= listing.licenses.len() => Ok(Some(listing.licenses[n - 1].clone())),
        n => Err(Error::InvalidChoice { choice: n.to_string() }),
    }
}
