//! Work done before a command's action runs: pick the context, load its
//! defaults and fill the flags the user left unset.

use crate::{
    Result,
    config::{ConfigLoader, ResolvedConfig},
    context::ContextState,
    flags::{BoundFlag, CommandSpec, ExplicitFlags, FlagBinder},
    prompt::Prompter,
};
use std::path::PathBuf;

/// Commands that never read defaults.
pub const NO_CONTEXT_COMMANDS: [&str; 8] = [
    "ca bootstrap",
    "ca init",
    "context",
    "context add",
    "context current",
    "context list",
    "context remove",
    "context select",
];

/// Skipped only when a context is selected.
const CONTEXT_SKIP_PREFIX: &str = "ca bootstrap-helper";

/// What the user asked for on this invocation.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Space separated command path, e.g. `"ca token"`.
    pub full_name: String,
    /// Value of `--context`.
    pub context: Option<String>,
    /// Value of `--config`.
    pub config_file: Option<PathBuf>,
}

impl Invocation {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    /// Listing, selecting and editing contexts must work with no context
    /// selected.
    pub fn is_context_command(&self) -> bool {
        self.full_name == "context" || self.full_name.starts_with("context ")
    }
}

#[derive(Debug, Default)]
pub struct Prepared {
    pub config: ResolvedConfig,
    pub bound: Vec<BoundFlag>,
}

/// Resolves the context, loads defaults and binds flags for `cmd`.
///
/// `env` looks up environment variables for flag bindings.
pub fn before_action<E>(
    state: &mut ContextState,
    cmd: &CommandSpec,
    invocation: &Invocation,
    explicit: &dyn ExplicitFlags,
    prompter: &dyn Prompter,
    env: E,
) -> Result<Prepared>
where
    E: Fn(&str) -> Option<String>,
{
    if NO_CONTEXT_COMMANDS.contains(&invocation.full_name.as_str()) {
        return Ok(Prepared::default());
    }

    if let Some(name) = invocation.context.as_deref() {
        state.switch(name)?;
    } else if state.current().is_none()
        && state.enabled()
        && !invocation.is_context_command()
        && prompter.can_prompt()
    {
        state.user_select(prompter)?;
    }

    if state.current().is_some() && invocation.full_name.starts_with(CONTEXT_SKIP_PREFIX) {
        return Ok(Prepared::default());
    }

    let config = ConfigLoader::for_state(state)
        .with_legacy_file(invocation.config_file.clone())
        .context_command(invocation.is_context_command())
        .load(state.current())?;

    if state.current().is_some() {
        state.cache_current_config(config.values.clone());
    }

    let bound = FlagBinder::new(&config.values, env).bind(cmd, explicit)?;
    Ok(Prepared { config, bound })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_commands() {
        assert!(Invocation::new("context add").is_context_command());
        assert!(Invocation::new("context").is_context_command());
        assert!(!Invocation::new("contexts").is_context_command());
        assert!(!Invocation::new("ca token").is_context_command());
    }
}
