use thiserror::Error;

/// Errors produced by the pure state and fun-fact rules.
///
/// The `Display` text of each variant is the message returned to API clients,
/// so keep them stable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid state abbreviation parameter")]
    InvalidStateCode,

    #[error("{0}")]
    Validation(String),

    #[error("No Fun Facts found for {state}")]
    NoFunFacts { state: String },

    #[error("No Fun Fact found at that index for {state}")]
    IndexOutOfRange { state: String },

    #[error("Invalid states dataset: {0}")]
    Dataset(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}
