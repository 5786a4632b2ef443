use super::{PromptError, PromptResult, Prompter};
use crate::context::Context;

/// Builds a new context, asking for whichever of `authority` and `profile`
/// was not supplied. The profile defaults to the authority name.
pub fn setup_context(
    prompter: &dyn Prompter,
    name: &str,
    authority: Option<String>,
    profile: Option<String>,
) -> PromptResult<Context> {
    let authority = match authority {
        Some(authority) => authority,
        None if prompter.can_prompt() => prompter.text("Authority name", Some(name))?,
        None => return Err(PromptError::non_interactive_flag("authority", "authority")),
    };

    let profile = match profile {
        Some(profile) => profile,
        None if prompter.can_prompt() => prompter.text("Profile name", Some(&authority))?,
        None => return Err(PromptError::non_interactive_flag("profile", "profile")),
    };

    Ok(Context::new(name, profile, authority))
}
