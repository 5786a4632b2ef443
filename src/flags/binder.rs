use super::{CommandSpec, Flag, FlagError, FlagResult, FlagValue, ValueSource};
use crate::config::ConfigMap;

/// Reports which flags the user passed explicitly on the command line.
pub trait ExplicitFlags {
    fn is_set(&self, name: &str) -> bool;
}

impl ExplicitFlags for [&str] {
    fn is_set(&self, name: &str) -> bool {
        self.contains(&name)
    }
}

impl<const N: usize> ExplicitFlags for [&str; N] {
    fn is_set(&self, name: &str) -> bool {
        self.as_slice().is_set(name)
    }
}

impl ExplicitFlags for clap::ArgMatches {
    /// Flag `ca-url` maps to the clap id `ca_url`.
    fn is_set(&self, name: &str) -> bool {
        let id = name.replace('-', "_");
        matches!(self.try_contains_id(&id), Ok(true))
            && self.value_source(&id) == Some(clap::parser::ValueSource::CommandLine)
    }
}

/// A value filled in for a flag the user did not pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundFlag {
    /// Primary alias of the flag.
    pub name: String,
    /// Alias the value was found under.
    pub key: String,
    pub value: FlagValue,
    pub source: ValueSource,
}

/// Fills unset flags from the environment and the resolved defaults.
pub struct FlagBinder<'a, E> {
    config: &'a ConfigMap,
    env: E,
}

impl<'a, E> FlagBinder<'a, E>
where
    E: Fn(&str) -> Option<String>,
{
    pub fn new(config: &'a ConfigMap, env: E) -> Self {
        Self { config, env }
    }

    /// Binds every flag of `cmd` in declaration order.
    ///
    /// A flag the user passed under any alias is left alone, as is a flag
    /// marked to ignore the environment. Otherwise its environment variable
    /// wins, then the first alias with a configured value.
    pub fn bind(&self, cmd: &CommandSpec, explicit: &dyn ExplicitFlags) -> FlagResult<Vec<BoundFlag>> {
        let mut bound = Vec::new();

        for flag in &cmd.flags {
            if flag.ignores_env() {
                continue;
            }
            if flag.names().any(|name| explicit.is_set(name)) {
                continue;
            }
            if let Some(value) = self.bind_flag(flag)? {
                tracing::debug!(flag = %value.name, source = %value.source, "bound flag");
                bound.push(value);
            }
        }

        Ok(bound)
    }

    fn bind_flag(&self, flag: &Flag) -> FlagResult<Option<BoundFlag>> {
        if let Some(var) = flag.env_var.as_deref()
            && let Some(raw) = (self.env)(var).filter(|raw| !raw.is_empty())
        {
            let value = flag
                .kind
                .parse_str(&raw)
                .map_err(|reason| invalid(flag, ValueSource::Environment, &raw, reason))?;
            return Ok(Some(BoundFlag {
                name: flag.primary().to_owned(),
                key: var.to_owned(),
                value,
                source: ValueSource::Environment,
            }));
        }

        for name in flag.names() {
            let Some(raw) = self.config.get(name) else {
                continue;
            };
            let value = flag
                .kind
                .from_config(raw)
                .map_err(|reason| invalid(flag, ValueSource::ConfigFile, &raw.to_string(), reason))?;
            return Ok(Some(BoundFlag {
                name: flag.primary().to_owned(),
                key: name.to_owned(),
                value,
                source: ValueSource::ConfigFile,
            }));
        }

        Ok(None)
    }
}

fn invalid(flag: &Flag, origin: ValueSource, value: &str, reason: String) -> FlagError {
    FlagError::InvalidValue {
        flag: flag.primary().to_owned(),
        origin,
        value: value.to_owned(),
        reason,
    }
}
