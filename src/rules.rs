//! Substitution rules.
//! Each rule is a typed literal replacement. The order returned by
//! [`ordered_rules`] is a contract: repository URLs are rewritten before the
//! bare package names they contain.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::config::Skeleton;
use crate::profile::ProjectProfile;

/// The files a rule applies to, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileScope {
    All,
    Only(PathBuf),
}

impl FileScope {
    pub fn contains(&self, relative: &Path) -> bool {
        match self {
            FileScope::All => true,
            FileScope::Only(path) => path == relative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionRule {
    /// Repository or documentation-site URL fragment.
    Url { from: String, to: String },
    /// Package identifier in one case style.
    Identifier { from: String, to: String },
    /// Literal text such as author metadata or descriptions.
    Text { from: String, to: String, scope: FileScope },
}

impl SubstitutionRule {
    pub fn pattern(&self) -> &str {
        match self {
            SubstitutionRule::Url { from, .. }
            | SubstitutionRule::Identifier { from, .. }
            | SubstitutionRule::Text { from, .. } => from,
        }
    }

    pub fn replacement(&self) -> &str {
        match self {
            SubstitutionRule::Url { to, .. }
            | SubstitutionRule::Identifier { to, .. }
            | SubstitutionRule::Text { to, .. } => to,
        }
    }

    pub fn applies_to(&self, relative: &Path) -> bool {
        match self {
            SubstitutionRule::Text { scope, .. } => scope.contains(relative),
            _ => true,
        }
    }

    /// Replaces every occurrence of the pattern. Borrowed when nothing matched.
    pub fn apply<'a>(&self, content: &'a str) -> Cow<'a, str> {
        let pattern = self.pattern();
        if pattern.is_empty() || !content.contains(pattern) {
            return Cow::Borrowed(content);
        }
        Cow::Owned(content.replace(pattern, self.replacement()))
    }
}

/// Escapes a value for a TOML basic (double-quoted) string: backslashes are
/// doubled first, then double quotes are escaped.
pub fn escape_toml_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Builds the ordered substitution list.
///
/// 1. repository URLs
/// 2. author name and email
/// 3. documentation-site URL
/// 4. snake_case identifier
/// 5. kebab-case identifier
/// 6. Title Case display name
///
/// followed by the file-scoped owner and description rewrites.
pub fn ordered_rules(skeleton: &Skeleton, profile: &ProjectProfile) -> Vec<SubstitutionRule> {
    let owner = &skeleton.template_owner;
    let metadata = FileScope::Only(skeleton.metadata_file.clone());
    let recipe = FileScope::Only(skeleton.recipe_file.clone());

    let mut rules = vec![SubstitutionRule::Url {
        from: format!("{owner}/{}", skeleton.placeholder),
        to: profile.github_repo.clone(),
    }];
    rules.extend(skeleton.legacy_repo_names.iter().map(|legacy| SubstitutionRule::Url {
        from: format!("{owner}/{legacy}"),
        to: profile.github_repo.clone(),
    }));

    rules.extend([
        SubstitutionRule::Text {
            from: format!("name = \"{}\"", skeleton.template_author),
            to: format!("name = \"{}\"", escape_toml_string(&profile.author_name)),
            scope: metadata.clone(),
        },
        SubstitutionRule::Text {
            from: format!("email = \"{}\"", skeleton.template_email),
            to: format!("email = \"{}\"", escape_toml_string(&profile.author_email)),
            scope: metadata.clone(),
        },
        SubstitutionRule::Text {
            from: skeleton.template_author.clone(),
            to: escape_toml_string(&profile.author_name),
            scope: metadata.clone(),
        },
        SubstitutionRule::Text {
            from: skeleton.template_email.clone(),
            to: escape_toml_string(&profile.author_email),
            scope: metadata.clone(),
        },
        SubstitutionRule::Text {
            from: skeleton.template_author.clone(),
            to: profile.author_name.clone(),
            scope: FileScope::All,
        },
        SubstitutionRule::Text {
            from: skeleton.template_email.clone(),
            to: profile.author_email.clone(),
            scope: FileScope::All,
        },
        SubstitutionRule::Text {
            from: format!("@{owner}"),
            to: format!("@{}", profile.github_owner),
            scope: FileScope::Only(skeleton.codeowners_file.clone()),
        },
        SubstitutionRule::Url {
            from: format!("{owner}.github.io/{}", skeleton.docs_repo),
            to: format!("{}.github.io/{}", profile.github_owner, profile.kebab_name),
        },
        SubstitutionRule::Identifier {
            from: skeleton.placeholder_snake(),
            to: profile.snake_name.clone(),
        },
        SubstitutionRule::Identifier {
            from: skeleton.placeholder.clone(),
            to: profile.kebab_name.clone(),
        },
        SubstitutionRule::Identifier {
            from: skeleton.placeholder_title(),
            to: profile.title_name.clone(),
        },
        SubstitutionRule::Text {
            from: owner.clone(),
            to: profile.github_owner.clone(),
            scope: recipe.clone(),
        },
        SubstitutionRule::Text {
            from: skeleton.template_description.clone(),
            to: escape_toml_string(&profile.description),
            scope: metadata,
        },
        SubstitutionRule::Text {
            from: skeleton.template_description.clone(),
            to: profile.description.clone(),
            scope: recipe,
        },
    ]);
    rules
}
