//! Error types for the messaging core.

use thiserror::Error;

/// Result type alias for broker operations
pub type BrokerResult<T> = Result<T, BrokerError>;

/// Main error type for the messaging core
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Operation referenced a room id absent from the registry
    #[error("room not found: {id}")]
    RoomUnknown { id: String },

    /// A send carried blank or whitespace-only text
    #[error("message body must not be empty")]
    EmptyBody,

    /// Bootstrap directory fetch failed; callers substitute the seed dataset
    #[error("directory transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl BrokerError {
    /// Create a not found error for rooms
    pub fn room_unknown(id: impl Into<String>) -> Self {
        Self::RoomUnknown { id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_unknown_constructor() {
        let error = BrokerError::room_unknown("missingRoom");
        assert!(matches!(error, BrokerError::RoomUnknown { .. }));
        assert_eq!(error.to_string(), "room not found: missingRoom");
    }

    #[test]
    fn test_empty_body_message() {
        assert_eq!(
            BrokerError::EmptyBody.to_string(),
            "message body must not be empty"
        );
    }
}
