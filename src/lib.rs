//! Context selection and flag defaults shared by the step command line tools.
//!
//! A base directory (`$STEPPATH` or `~/.step`) may hold several named
//! contexts, each pairing an authority with a profile. Before a command runs,
//! the defaults of the selected context are merged and applied to every flag
//! the user did not pass.

pub mod command;
pub mod config;
pub mod context;
mod error;
pub mod flags;
pub mod path;
pub mod prompt;

pub use error::{Error, Result};
