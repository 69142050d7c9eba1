//! User input and interaction handling.
//! The wizard talks to the user through the [`Prompter`] trait so the answer
//! collection logic can run against a scripted prompter in tests.

use crate::error::{Error, Result};
use dialoguer::{Confirm, Input};
use std::io;

/// Asks the user questions.
pub trait Prompter {
    /// Asks for a line of text, offering `default` when it is not empty.
    fn text(&self, prompt: &str, default: &str) -> Result<String>;

    /// Asks a yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Interactive terminal prompter backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&self, prompt: &str, default: &str) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(prompt_error)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }
}

/// Ctrl-C while a prompt is open aborts generation.
fn prompt_error(e: dialoguer::Error) -> Error {
    match e {
        dialoguer::Error::IO(ref io_err) if io_err.kind() == io::ErrorKind::Interrupted => {
            Error::Cancelled
        }
        e => Error::PromptError(e.to_string()),
    }
}

/// Interprets a free-form yes/no answer.
///
/// # Returns
/// * `(is_valid, value)`
pub fn yes_no_prompt(answer: &str) -> (bool, bool) {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" => (true, true),
        "n" | "no" | "false" => (true, false),
        _ => (false, false),
    }
}
