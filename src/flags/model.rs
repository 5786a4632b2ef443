use std::{fmt, time::Duration};

/// Assigning this as a flag's environment variable turns off both
/// environment and config file lookup for the flag.
pub const IGNORE_ENV_VAR: &str = "STEP_IGNORE_ENV_VAR";

const ENV_PREFIX: &str = "STEP_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    String,
    Bool,
    Int,
    Uint,
    Float,
    Duration,
    StringList,
    IntList,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Duration(Duration),
    StringList(Vec<String>),
    IntList(Vec<i64>),
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Duration(d) => write!(f, "{d:?}"),
            Self::StringList(items) => f.write_str(&items.join(",")),
            Self::IntList(items) => {
                let items: Vec<String> = items.iter().map(i64::to_string).collect();
                f.write_str(&items.join(","))
            }
        }
    }
}

/// Where a bound value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    CommandLine,
    Environment,
    ConfigFile,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CommandLine => "command line",
            Self::Environment => "environment",
            Self::ConfigFile => "config file",
        })
    }
}

/// A declared command flag.
///
/// `name` lists the aliases separated by commas, e.g. `"ca-url, c"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Flag {
    pub name: String,
    pub kind: FlagKind,
    pub env_var: Option<String>,
}

impl Flag {
    pub fn new(name: impl Into<String>, kind: FlagKind) -> Self {
        Self {
            name: name.into(),
            kind,
            env_var: None,
        }
    }

    pub fn with_env_var(mut self, env_var: impl Into<String>) -> Self {
        self.env_var = Some(env_var.into());
        self
    }

    /// Never filled from the environment or config files.
    pub fn ignore_env(self) -> Self {
        self.with_env_var(IGNORE_ENV_VAR)
    }

    pub fn ignores_env(&self) -> bool {
        self.env_var.as_deref() == Some(IGNORE_ENV_VAR)
    }

    /// Aliases in declaration order, trimmed.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.name
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn primary(&self) -> &str {
        self.names().next().unwrap_or_default()
    }
}

/// `STEP_` followed by the first alias upper-cased, dashes as underscores.
pub fn env_var_name(flag_name: &str) -> String {
    let first = flag_name.split(',').next().unwrap_or_default().trim();
    format!("{ENV_PREFIX}{}", first.replace('-', "_").to_uppercase())
}

/// A command and the flags it declares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandSpec {
    pub name: String,
    pub flags: Vec<Flag>,
    pub subcommands: Vec<CommandSpec>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn subcommand(mut self, cmd: CommandSpec) -> Self {
        self.subcommands.push(cmd);
        self
    }

    /// Gives every flag without an environment variable its derived name,
    /// recursively through subcommands.
    pub fn install_env_vars(&mut self) {
        for flag in &mut self.flags {
            if flag.env_var.is_none() {
                flag.env_var = Some(env_var_name(&flag.name));
            }
        }

        for sub in &mut self.subcommands {
            sub.install_env_vars();
        }
    }
}

/// Top level commands known to the binary.
#[derive(Debug, Default)]
pub struct Registry {
    commands: Vec<CommandSpec>,
}

impl Registry {
    /// Adds `cmd` after installing its environment bindings.
    pub fn register(&mut self, mut cmd: CommandSpec) {
        cmd.install_env_vars();
        self.commands.push(cmd);
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// Looks up a command by its space separated full name.
    pub fn find(&self, full_name: &str) -> Option<&CommandSpec> {
        let mut parts = full_name.split_whitespace();
        let first = parts.next()?;
        let mut cmd = self.commands.iter().find(|c| c.name == first)?;

        for part in parts {
            cmd = cmd.subcommands.iter().find(|c| c.name == part)?;
        }

        Some(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_are_trimmed_in_order() {
        let flag = Flag::new(" ca-url , c,", FlagKind::String);

        assert_eq!(flag.names().collect::<Vec<_>>(), ["ca-url", "c"]);
        assert_eq!(flag.primary(), "ca-url");
    }

    #[test]
    fn env_var_names() {
        assert_eq!(env_var_name("ca-url, c"), "STEP_CA_URL");
        assert_eq!(env_var_name("x5c-cert"), "STEP_X5C_CERT");
        assert_eq!(env_var_name("force"), "STEP_FORCE");
    }

    #[test]
    fn registration_installs_env_vars_recursively() {
        let mut registry = Registry::default();
        registry.register(
            CommandSpec::new("ca")
                .flag(Flag::new("ca-url", FlagKind::String))
                .subcommand(
                    CommandSpec::new("token")
                        .flag(Flag::new("not-after", FlagKind::Duration))
                        .flag(Flag::new("password-file", FlagKind::String).ignore_env())
                        .flag(Flag::new("root", FlagKind::String).with_env_var("STEP_ROOT_CA")),
                ),
        );

        let ca = registry.find("ca").unwrap();
        assert_eq!(ca.flags[0].env_var.as_deref(), Some("STEP_CA_URL"));

        let token = registry.find("ca token").unwrap();
        assert_eq!(token.flags[0].env_var.as_deref(), Some("STEP_NOT_AFTER"));
        assert!(token.flags[1].ignores_env());
        assert_eq!(token.flags[2].env_var.as_deref(), Some("STEP_ROOT_CA"));

        assert!(registry.find("ca missing").is_none());
        assert!(registry.find("").is_none());
    }
}
