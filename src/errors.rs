//! Unified error types for `PromptPay` Buddy.
//!
//! Payload encoding, amount parsing and account lookups each have a dedicated
//! variant so callers can tell bad user input apart from infrastructure failures.

use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The payee is neither a 10-digit mobile number nor a 13-digit national ID.
    #[error("Invalid PromptPay ID: {value}")]
    InvalidPayee {
        /// The identifier as supplied by the caller
        value: String,
    },

    /// A TLV value does not fit the two-digit length header.
    #[error("TLV field {tag} is {len} bytes long, the maximum is 99")]
    FieldTooLong {
        /// Tag of the offending field
        tag: String,
        /// Byte length of the rejected value
        len: usize,
    },

    /// The amount could not be parsed or is out of range.
    #[error("Invalid amount: {input}")]
    InvalidAmount {
        /// The amount as supplied by the caller
        input: String,
    },

    /// A payload string could not be decoded.
    #[error("Malformed payload: {reason}")]
    MalformedPayload {
        /// What was wrong with it
        reason: String,
    },

    /// No configured account matches the requested one.
    #[error("No PromptPay account matches '{query}'")]
    AccountNotFound {
        /// The account name or number that was looked up
        query: String,
    },

    /// The account configuration file or environment could not be used.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// A `SeaORM` query or connection failed.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem access failed, e.g. creating the `SQLite` data directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable such as `DISCORD_TOKEN` is missing.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Discord API or gateway failure, boxed to keep `Error` small.
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_bad_input() {
        let err = Error::FieldTooLong {
            tag: "29".to_string(),
            len: 120,
        };
        assert_eq!(
            err.to_string(),
            "TLV field 29 is 120 bytes long, the maximum is 99"
        );

        let err = Error::from(std::env::VarError::NotPresent);
        assert!(matches!(err, Error::EnvVar(_)));
        assert!(err.to_string().starts_with("Environment variable error: "));

        let err = Error::from(sea_orm::DbErr::Custom("gone".to_string()));
        assert_eq!(err.to_string(), "Database error: Custom Error: gone");
    }
}
