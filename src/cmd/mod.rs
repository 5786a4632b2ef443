pub mod context;
pub mod defaults;

use clap::{ArgMatches, Args, Parser, Subcommand};
use std::{env, path::PathBuf};
use stepctx::{
    Result,
    command::{Invocation, before_action},
    context::ContextState,
    flags::{CommandSpec, Flag, FlagKind, Registry},
    prompt::Terminal,
};

#[derive(Parser)]
#[command(
    name = "stepctx",
    version,
    about = "manage step contexts and inspect resolved flag defaults"
)]
pub struct Cli {
    /// Context to use for this command only
    #[arg(long, global = true)]
    pub context: Option<String>,
    /// Defaults file used when contexts are not in use
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage contexts
    Context {
        #[command(subcommand)]
        action: Option<ContextCommand>,
    },
    /// Show the value every flag resolves to
    Defaults(DefaultsArgs),
}

#[derive(Subcommand, Default)]
pub enum ContextCommand {
    /// Print the current context
    #[default]
    Current,
    /// List contexts alphabetically
    List,
    /// Persist the default context
    Select { name: String },
    /// Add a context, prompting for missing values
    Add {
        name: String,
        #[arg(long)]
        authority: Option<String>,
        #[arg(long)]
        profile: Option<String>,
    },
    /// Remove a context other than the current one
    Remove { name: String },
}

#[derive(Args)]
pub struct DefaultsArgs {
    #[arg(long = "ca-url")]
    pub ca_url: Option<String>,
    #[arg(long)]
    pub fingerprint: Option<String>,
    #[arg(long)]
    pub root: Option<String>,
    #[arg(long = "not-after")]
    pub not_after: Option<String>,
    #[arg(long)]
    pub san: Vec<String>,
}

/// Flag declarations mirroring the clap definitions above.
pub fn registry() -> Registry {
    let mut registry = Registry::default();

    registry.register(
        CommandSpec::new("context")
            .subcommand(CommandSpec::new("current"))
            .subcommand(CommandSpec::new("list"))
            .subcommand(CommandSpec::new("select"))
            .subcommand(
                CommandSpec::new("add")
                    .flag(Flag::new("authority", FlagKind::String).ignore_env())
                    .flag(Flag::new("profile", FlagKind::String).ignore_env()),
            )
            .subcommand(CommandSpec::new("remove")),
    );
    registry.register(
        CommandSpec::new("defaults")
            .flag(Flag::new("ca-url", FlagKind::String))
            .flag(Flag::new("fingerprint", FlagKind::String))
            .flag(Flag::new("root", FlagKind::String))
            .flag(Flag::new("not-after", FlagKind::Duration))
            .flag(Flag::new("san", FlagKind::StringList)),
    );

    registry
}

/// Space separated path of the invoked subcommand and its matches.
fn leaf(matches: &ArgMatches) -> (String, &ArgMatches) {
    let mut names = Vec::new();
    let mut current = matches;

    while let Some((name, sub)) = current.subcommand() {
        names.push(name);
        current = sub;
    }

    (names.join(" "), current)
}

pub fn run(cli: Cli, matches: &ArgMatches, state: &mut ContextState) -> Result<()> {
    let registry = registry();
    let prompter = Terminal;

    let (full_name, leaf_matches) = leaf(matches);
    let spec = registry
        .find(&full_name)
        .cloned()
        .unwrap_or_else(|| CommandSpec::new(full_name.clone()));

    let invocation = Invocation {
        full_name,
        context: cli.context,
        config_file: cli.config,
    };
    let prepared = before_action(
        state,
        &spec,
        &invocation,
        leaf_matches,
        &prompter,
        |key| env::var(key).ok(),
    )?;

    match cli.command {
        Command::Context { action } => context::handle(action.unwrap_or_default(), state, &prompter),
        Command::Defaults(args) => defaults::handle(&args, &spec, &prepared),
    }
}
