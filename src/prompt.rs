use crate::commit::validate_subject;
use console::style;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};

/// Abstraction over a string input prompt.
///
/// Implementors define how string input is collected from the user,
/// including any styling or interactivity. This trait enables testability
/// by decoupling user input from the logic that consumes it.
pub trait StringPrompter {
    /// Prompt the user for a string input.
    ///
    /// # Parameters
    /// - `prompt`: The message shown to the user.
    /// - `default`: Default value if the user presses Enter without input.
    ///   An empty default accepts empty input.
    ///
    /// # Returns
    /// `Ok(String)` if input is successfully collected, or an `Err(String)` describing the failure.
    fn prompt(&mut self, prompt: &str, default: &str) -> Result<String, String>;
}

/// Abstraction over a boolean (yes/no) confirmation prompt.
pub trait ConfirmPrompter {
    /// Prompt the user for a yes/no confirmation.
    ///
    /// # Returns
    /// `Ok(true)` if confirmed, `Ok(false)` if declined, or `Err(String)` on input failure.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, String>;
}

/// Default implementation of `StringPrompter` using `dialoguer::Input`.
pub struct DialoguerStringPrompter;

impl StringPrompter for DialoguerStringPrompter {
    fn prompt(&mut self, prompt: &str, default: &str) -> Result<String, String> {
        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme).with_prompt(prompt);
        input = if default.is_empty() {
            input.allow_empty(true)
        } else {
            input.default(default.to_string())
        };
        match input.interact_text() {
            Ok(v) => Ok(v),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Default implementation of `ConfirmPrompter` using `dialoguer::Confirm`.
pub struct DialoguerConfirmPrompter;

impl ConfirmPrompter for DialoguerConfirmPrompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, String> {
        let theme = ColorfulTheme::default();
        let confirm = Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(default);
        match confirm.interact() {
            Ok(v) => Ok(v),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Prompt until the user enters a non-empty, single-line subject of at most
/// `max_len` characters.
///
/// Each rejected attempt prints the reason and asks again. Only a failure of
/// the prompter itself ends the loop with an error.
///
/// # Returns
/// - `Ok(String)` with the accepted, trimmed subject.
/// - `Err(String)` if the input could not be collected.
pub fn ask_subject<P: StringPrompter>(prompter: &mut P, max_len: usize) -> Result<String, String> {
    let prompt = format!("Enter a new commit message (<= {} chars)", max_len);
    loop {
        let candidate = prompter.prompt(&prompt, "")?;
        match validate_subject(&candidate, max_len) {
            Ok(subject) => return Ok(subject),
            Err(e) => {
                eprintln!("{}", style(format!("Message rejected: {}", e)).yellow());
            }
        }
    }
}

/// Ask whether to proceed with rewriting `count` commits.
pub fn confirm_rewrite<P: ConfirmPrompter>(prompter: &mut P, count: usize) -> Result<bool, String> {
    let prompt = format!("Rewrite {} commit(s) now? History will be replaced.", count);
    prompter.confirm(&prompt, false)
}

/// Ask whether to fetch and force-push (with lease) the rewritten branch.
pub fn confirm_push<P: ConfirmPrompter>(prompter: &mut P) -> Result<bool, String> {
    let prompt = "Fetch and run `git push --force-with-lease` now?";
    prompter.confirm(prompt, false)
}
