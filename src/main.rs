mod cmd;

use clap::{CommandFactory, FromArgMatches};
use cmd::Cli;
use std::process;
use stepctx::{context::ContextState, path::StepPath};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();

    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    // Without a known configuration layout nothing else can run.
    let paths = match StepPath::from_env() {
        Ok(paths) => paths,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };
    let mut state = match ContextState::init(paths) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };

    if let Err(err) = cmd::run(cli, &matches, &mut state) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
