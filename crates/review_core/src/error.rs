//! Error types for review operations

use thiserror::Error;

/// Failure of a review operation
///
/// `Display` yields only the user-facing message; callers add the context
/// ("Error processing image: ...") appropriate to where it is shown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    /// Rejected locally before any request was sent
    #[error("{0}")]
    Validation(String),

    /// Request failed or the response could not be read
    #[error("{message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Server answered but reported failure or sent an unusable payload
    #[error("{0}")]
    Application(String),
}

impl ReviewError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    pub fn application(message: impl Into<String>) -> Self {
        Self::Application(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// HTTP status, when the failure came with one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_message_only() {
        let error = ReviewError::transport(Some(500), "bad image");
        assert_eq!(error.to_string(), "bad image");
        assert_eq!(error.status(), Some(500));

        let error = ReviewError::validation("Image file is required");
        assert!(error.is_validation());
        assert_eq!(error.status(), None);
    }
}
