//! Client Error Types

use thiserror::Error;

/// Errors surfaced to the user by the payment flow
///
/// Closing the checkout widget is not an error; see
/// [`WidgetOutcome::Dismissed`](crate::checkout::WidgetOutcome::Dismissed).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Amount empty, non-numeric or zero
    #[error("invalid amount")]
    InvalidAmount,

    /// A payment is already in progress
    #[error("payment already in progress")]
    Busy,

    /// Checkout script could not be loaded
    #[error("checkout script failed to load")]
    ScriptLoadFailed,

    /// Order initiation failed; carries the server's message
    #[error("order creation failed: {0}")]
    OrderCreationFailed(String),

    /// Checkout widget could not be opened or returned nothing usable
    #[error("checkout widget failed: {0}")]
    WidgetFailed(String),

    /// Confirmation does not belong to the order the widget was opened with
    #[error("confirmation for order {received} while awaiting {expected}")]
    OrderMismatch { expected: String, received: String },

    /// Verification request could not be completed
    #[error("verification request failed")]
    VerificationFailed,
}

impl ClientError {
    /// Short, non-technical text for the status banner
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidAmount => "Please enter a valid amount".into(),
            Self::Busy => "A payment is already in progress".into(),
            Self::ScriptLoadFailed => "Failed to load Razorpay SDK".into(),
            Self::OrderCreationFailed(message) => message.clone(),
            Self::OrderMismatch { .. } => "Payment verification failed".into(),
            Self::VerificationFailed => "Error verifying payment".into(),
            Self::WidgetFailed(_) => "Something went wrong".into(),
        }
    }
}
