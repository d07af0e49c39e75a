use thiserror::Error;
use validator::ValidationErrors;

/// Error taxonomy for the game engines.
///
/// Domain terminations (loss, timeout, sequence exhaustion) are not errors;
/// they come back as part of the round result. This enum covers malformed
/// input, access violations and storage failures only.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Invalid choice: {0}")]
    InvalidChoice(String),

    #[error("Invalid deck: {0}")]
    InvalidDeck(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    // NotFound and Forbidden share one message so a caller probing foreign
    // ids cannot tell a missing game from someone else's.
    #[error("Cannot access the requested game")]
    NotFound,

    #[error("Cannot access the requested game")]
    Forbidden,

    #[error("Game is already finished")]
    AlreadyTerminal,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl GameError {
    pub fn invalid_choice(value: impl Into<String>) -> Self {
        GameError::InvalidChoice(value.into())
    }

    pub fn invalid_deck(reason: impl Into<String>) -> Self {
        GameError::InvalidDeck(reason.into())
    }

    pub fn invalid_encoding(reason: impl Into<String>) -> Self {
        GameError::InvalidEncoding(reason.into())
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        GameError::Conflict(reason.into())
    }

    pub fn storage(reason: impl Into<String>) -> Self {
        GameError::StorageError(reason.into())
    }
}

impl From<ValidationErrors> for GameError {
    fn from(errors: ValidationErrors) -> Self {
        GameError::ValidationError(errors.to_string())
    }
}
