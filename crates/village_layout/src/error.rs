//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Generation itself never fails once options are accepted: a building type that cannot
//! be placed is dropped and a wall without qualifying road exits falls back to a default
//! gate. The only caller-visible failure is [`Error::InvalidOptions`].
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_options_message_names_the_problem() {
        let err = Error::InvalidOptions("unknown size 'huge'".into());
        assert_eq!(err.to_string(), "invalid options: unknown size 'huge'");
    }
}
