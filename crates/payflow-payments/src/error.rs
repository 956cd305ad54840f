//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
///
/// The `String` payloads of [`PaymentError::OrderCreationFailed`] and
/// [`PaymentError::VerificationFailed`] are operator detail. They are logged,
/// never sent to the caller; use [`PaymentError::user_message`] for responses.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Amount missing, not an integer, or below one major unit
    #[error("Invalid amount")]
    InvalidAmount,

    /// Processor key id or secret absent from the environment
    #[error("Configuration error: {0}")]
    MisconfiguredCredentials(String),

    /// One of payment id, order id or signature absent
    #[error("Missing required fields")]
    MissingFields,

    /// Supplied signature does not match the expected HMAC
    #[error("Invalid signature")]
    InvalidSignature,

    /// Processor rejected the order or could not be reached
    #[error("Order creation failed: {0}")]
    OrderCreationFailed(String),

    /// Unexpected failure while verifying a payment
    #[error("Verification failed: {0}")]
    VerificationFailed(String),
}

impl PaymentError {
    /// Whether the caller's input caused this error (HTTP 400 rather than 500)
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount | Self::MissingFields | Self::InvalidSignature
        )
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            Self::InvalidAmount => "Invalid amount",
            Self::MisconfiguredCredentials(message) => message,
            Self::MissingFields => "Missing required fields",
            Self::InvalidSignature => "Invalid signature",
            Self::OrderCreationFailed(_) => "Failed to create order",
            Self::VerificationFailed(_) => "Failed to verify payment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(PaymentError::InvalidAmount.is_client_error());
        assert!(PaymentError::MissingFields.is_client_error());
        assert!(PaymentError::InvalidSignature.is_client_error());
        assert!(!PaymentError::MisconfiguredCredentials("x".into()).is_client_error());
        assert!(!PaymentError::OrderCreationFailed("x".into()).is_client_error());
        assert!(!PaymentError::VerificationFailed("x".into()).is_client_error());
    }

    #[test]
    fn test_user_message_hides_detail() {
        let err = PaymentError::OrderCreationFailed("BAD_REQUEST_ERROR: key mismatch".into());
        assert_eq!(err.user_message(), "Failed to create order");

        let err = PaymentError::VerificationFailed("hmac init".into());
        assert_eq!(err.user_message(), "Failed to verify payment");
    }
}
