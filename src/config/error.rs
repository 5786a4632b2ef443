use crate::context::ContextError;
use std::{io, path::PathBuf};
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Contexts exist but none is selected.
    #[error(
        "no default context is selected; run 'step context select <name>' to select one, \
         or remove {} to disable contexts",
        .contexts_file.display()
    )]
    ContextRequired { contexts_file: PathBuf },
    #[error("cannot load defaults for context '{name}': {source}")]
    InvalidContext {
        name: String,
        #[source]
        source: ContextError,
    },
    #[error("authority configuration not found: {}", .path.display())]
    MissingAuthority { path: PathBuf },
    #[error("error reading {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("error parsing {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
