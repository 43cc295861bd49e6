use crate::rules::Rejection;

#[derive(Debug, thiserror::Error)]
pub enum SalonError {
    #[error("{0}")]
    Rejected(#[from] Rejection),
    #[error("appointment not found: {0}")]
    NotFound(String),
    #[error("invalid selection {position}: choose a number between 1 and {len}")]
    InvalidSelection { position: usize, len: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read appointments file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write appointments file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize appointments: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize {what}: {reason}")]
    Deserialization { what: &'static str, reason: String },
}

impl SalonError {
    /// Returns the business rule that refused the operation, if that is why it failed.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            SalonError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

pub type SalonResult<T> = std::result::Result<T, SalonError>;
