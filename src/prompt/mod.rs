//! Terminal interaction used when a value must be chosen by the user.

mod setup_context;
mod terminal;

pub use setup_context::setup_context;
pub use terminal::Terminal;

use thiserror::Error;

/// Set to `1` or `true` to disable every prompt.
pub const NON_INTERACTIVE_ENV: &str = "STEP_NON_INTERACTIVE";

pub type PromptResult<T> = Result<T, PromptError>;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("cannot prompt for {what}: terminal not available or non-interactive mode enabled")]
    NonInteractive { what: String },
    #[error("cannot prompt for {what}: use --{flag} to specify this value non-interactively")]
    NonInteractiveFlag { what: String, flag: String },
    #[error(transparent)]
    Inquire(#[from] inquire::InquireError),
}

impl PromptError {
    pub fn non_interactive(what: impl Into<String>) -> Self {
        Self::NonInteractive { what: what.into() }
    }

    pub fn non_interactive_flag(what: impl Into<String>, flag: impl Into<String>) -> Self {
        Self::NonInteractiveFlag {
            what: what.into(),
            flag: flag.into(),
        }
    }
}

pub trait Prompter {
    /// Whether prompting is possible at all.
    fn can_prompt(&self) -> bool;

    /// Announces a value that was chosen without asking.
    fn print_selected(&self, label: &str, value: &str) -> PromptResult<()>;

    /// Asks for one of `items` and returns its index.
    fn select(&self, message: &str, items: &[String]) -> PromptResult<usize>;

    /// Asks for a non-empty line of text.
    fn text(&self, message: &str, default: Option<&str>) -> PromptResult<String>;
}

/// Interprets the value of [`NON_INTERACTIVE_ENV`].
pub fn non_interactive(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true"))
}

/// Rejects empty or whitespace only input.
pub fn validate_not_empty(input: &str) -> Result<(), String> {
    if input.trim().is_empty() {
        return Err("value cannot be empty".into());
    }
    Ok(())
}
