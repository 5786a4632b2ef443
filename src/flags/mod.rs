//! Declared command flags and how unset ones get their values.

mod binder;
mod convert;
mod error;
mod model;

pub use binder::*;
pub use convert::{parse_bool, parse_duration};
pub use error::*;
pub use model::*;
