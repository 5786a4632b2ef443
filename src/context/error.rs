use crate::{path::PathError, prompt::PromptError};
use std::{io, path::PathBuf};
use thiserror::Error;

pub type ContextResult<T> = Result<T, ContextError>;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("context '{0}' not found")]
    NotFound(String),
    #[error("cannot remove current context '{0}'; use 'step context select' to switch contexts")]
    RemoveCurrent(String),
    #[error("no contexts available")]
    Empty,
    #[error("context cannot have an empty name")]
    EmptyName,
    #[error("context cannot have an empty authority value")]
    EmptyAuthority,
    #[error("context cannot have an empty profile value")]
    EmptyProfile,
    #[error("invalid context '{name}' in {}: {source}", .path.display())]
    Invalid {
        name: String,
        path: PathBuf,
        #[source]
        source: Box<ContextError>,
    },
    #[error("selection {index} is out of range for {count} contexts")]
    SelectionOutOfRange { index: usize, count: usize },
    #[error("error reading {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("error writing {}: {source}", .path.display())]
    WriteFile {
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
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
}
