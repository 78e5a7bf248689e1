// Error taxonomy for the marketplace client.
// Validation failures never reach the network layer; cancellation is a
// distinct outcome that flows must swallow rather than surface.

use thiserror::Error;

// Remote and transport failures
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Not signed in")]
    Unauthenticated,
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for direct display. Prefers the API's own message,
    /// falling back to a canned one keyed by HTTP status.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { status, message } if message.is_empty() => {
                fallback_message(*status).to_string()
            }
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Unauthenticated => "Please sign in to continue.".to_string(),
            ApiError::Cancelled => String::new(),
            ApiError::Network(_) | ApiError::Decode(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

/// Canned user-facing message for an HTTP status when the API body carries
/// no message of its own.
pub fn fallback_message(status: u16) -> &'static str {
    match status {
        400 | 401 => "Incorrect email or password",
        409 => "There is already a booking reserved for this date.",
        429 => "Too many attempts. Please wait a moment.",
        500 => "Server error. Please try again later.",
        _ => "Request failed. Please try again.",
    }
}

// Client-side booking validation failures, surfaced inline next to the form.
// One variant per rule, checked in order; the first failure wins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select both a check-in and a check-out date.")]
    MissingDates,

    #[error("Check-in date cannot be in the past.")]
    PastCheckIn,

    #[error("Check-out must be after check-in.")]
    CheckOutNotAfterCheckIn,

    #[error("At least one guest is required.")]
    NoGuests,

    #[error("This venue sleeps at most {max_guests} guests.")]
    TooManyGuests { max_guests: u32 },

    #[error("Please sign in to book a stay.")]
    NotSignedIn,

    #[error("You already have a booking for these dates.")]
    DuplicateBooking,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_messages_by_status() {
        assert_eq!(fallback_message(400), "Incorrect email or password");
        assert_eq!(fallback_message(401), "Incorrect email or password");
        assert_eq!(
            fallback_message(409),
            "There is already a booking reserved for this date."
        );
        assert_eq!(fallback_message(429), "Too many attempts. Please wait a moment.");
        assert_eq!(fallback_message(500), "Server error. Please try again later.");
        assert_eq!(fallback_message(418), "Request failed. Please try again.");
    }

    #[test]
    fn test_user_message_prefers_api_message() {
        let err = ApiError::Status {
            status: 400,
            message: "Venue name is required".to_string(),
        };
        assert_eq!(err.user_message(), "Venue name is required");

        let bare = ApiError::Status {
            status: 401,
            message: String::new(),
        };
        assert_eq!(bare.user_message(), "Incorrect email or password");
    }

    #[test]
    fn test_cancelled_is_distinct() {
        assert!(ApiError::Cancelled.is_cancelled());
        assert!(!ApiError::Network("timed out".to_string()).is_cancelled());
        assert_eq!(ApiError::Cancelled.status(), None);
    }
}
