//! Per-invocation defaults read from JSON files.

mod error;
mod loader;
mod value;

pub use error::*;
pub use loader::*;
pub use value::*;
