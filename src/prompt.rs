//! User interaction.
//! The [`Prompter`] trait is the only way the collector talks to the user, so
//! tests can answer questions without a terminal.

use std::io::IsTerminal;

use dialoguer::{Confirm, Input, Select};

use crate::error::{Error, Result};

pub trait Prompter {
    /// Whether questions can be asked at all.
    fn is_interactive(&self) -> bool;

    /// Asks for free text. The answer may be empty; callers decide whether to retry.
    fn text(&self, prompt: &str) -> Result<String>;

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Returns the index of the chosen item.
    fn select(&self, prompt: &str, items: &[String], default: usize) -> Result<usize>;
}

/// Prompter backed by dialoguer, interactive only when stdin is a terminal.
pub struct DialoguerPrompter {
    interactive: bool,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self { interactive: std::io::stdin().is_terminal() }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn text(&self, prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::PromptError(e.to_string()))
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))
    }

    fn select(&self, prompt: &str, items: &[String], default: usize) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .default(default)
            .items(items)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))
    }
}

/// A prompter for runs without a terminal: every question is unanswerable.
pub struct NonInteractivePrompter;

impl Prompter for NonInteractivePrompter {
    fn is_interactive(&self) -> bool {
        false
    }

    fn text(&self, prompt: &str) -> Result<String> {
        Err(Error::PromptError(format!("cannot ask '{prompt}' without a terminal")))
    }

    fn confirm(&self, _prompt: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn select(&self, _prompt: &str, _items: &[String], default: usize) -> Result<usize> {
        Ok(default)
    }
}
