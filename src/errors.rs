//! Unified error type for the budgie breeding records.
//!
//! Validation errors block the write that triggered them. Rows belonging to
//! another tenant surface as [`Error::NotFound`], never as a distinct
//! "forbidden" signal; [`Error::Forbidden`] is reserved for the coarse
//! capability check on the acting account.

use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Storage failure, including unique-index violations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A bird was assigned as its own father or mother
    #[error("Bird cannot be its own {role}")]
    SelfParent {
        /// `father` or `mother`
        role: String,
    },

    /// A bird was assigned a parent born on or after its own birth date
    #[error("Bird must be born after its {role}")]
    Chronology {
        /// `father` or `mother`
        role: String,
    },

    /// Date of death lies before date of birth
    #[error("Date of death cannot be before date of birth")]
    DeathBeforeBirth,

    /// A required input was empty or absent
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// Value outside its allowed range
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Name of the offending field
        field: String,
        /// The rejected value
        value: String,
    },

    /// The same tenant registered a ring number twice
    #[error("Ring number '{ring_number}' is already registered")]
    DuplicateRingNumber {
        /// The duplicated ring number
        ring_number: String,
    },

    /// Import file extension is not `.csv` or `.xlsx`
    #[error("Unsupported import format: '{extension}' (expected .csv or .xlsx)")]
    UnsupportedFormat {
        /// The rejected extension
        extension: String,
    },

    /// Row is absent or not visible to the actor
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `bird`
        entity: &'static str,
        /// Identifier the caller used
        id: String,
    },

    /// The acting account may not use this feature at all
    #[error("Account is not allowed to use this feature")]
    Forbidden,

    /// CSV reading or writing failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet reading failure
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Formatting a response failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Serenity/Poise framework failure
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether the error is a user-facing validation rejection.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::SelfParent { .. }
                | Self::Chronology { .. }
                | Self::DeathBeforeBirth
                | Self::MissingField { .. }
                | Self::InvalidValue { .. }
                | Self::DuplicateRingNumber { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
