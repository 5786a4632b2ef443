use crate::{
    config::ConfigError, context::ContextError, flags::FlagError, path::PathError,
    prompt::PromptError,
};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Flag(#[from] FlagError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
}
