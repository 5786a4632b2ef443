use super::{NON_INTERACTIVE_ENV, PromptError, PromptResult, Prompter, non_interactive};
use inquire::{CustomUserError, Select, Text, validator::Validation};
use owo_colors::OwoColorize;
use std::{
    env,
    io::{self, IsTerminal},
};

/// [`Prompter`] backed by the controlling terminal.
#[derive(Debug, Default)]
pub struct Terminal;

impl Prompter for Terminal {
    fn can_prompt(&self) -> bool {
        if non_interactive(env::var(NON_INTERACTIVE_ENV).ok().as_deref()) {
            return false;
        }
        io::stdin().is_terminal() && io::stderr().is_terminal()
    }

    fn print_selected(&self, label: &str, value: &str) -> PromptResult<()> {
        eprintln!("{} {}: {}", "✔".green(), label, value.bold());
        Ok(())
    }

    fn select(&self, message: &str, items: &[String]) -> PromptResult<usize> {
        if !self.can_prompt() {
            return Err(PromptError::non_interactive("selection"));
        }

        let choice = Select::new(message, items.to_vec()).raw_prompt()?;
        Ok(choice.index)
    }

    fn text(&self, message: &str, default: Option<&str>) -> PromptResult<String> {
        if !self.can_prompt() {
            return Err(PromptError::non_interactive(message));
        }

        let mut prompt = Text::new(message).with_validator(
            |input: &str| -> Result<Validation, CustomUserError> {
                Ok(match super::validate_not_empty(input) {
                    Ok(()) => Validation::Valid,
                    Err(msg) => Validation::Invalid(msg.into()),
                })
            },
        );
        if let Some(default) = default {
            prompt = prompt.with_default(default);
        }

        Ok(prompt.prompt()?.trim().to_owned())
    }
}
