use super::ValueSource;
use thiserror::Error;

pub type FlagResult<T> = Result<T, FlagError>;

#[derive(Debug, Error)]
pub enum FlagError {
    #[error("invalid value '{value}' for flag '--{flag}' from {origin}: {reason}")]
    InvalidValue {
        flag: String,
        origin: ValueSource,
        value: String,
        reason: String,
    },
}
