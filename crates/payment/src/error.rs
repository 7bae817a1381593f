//! Payment error types.

use thiserror::Error;

/// Errors surfaced by the payment gateway adapter.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The processor failed or rejected the request.
    ///
    /// `retryable` is true only for transport-level failures; business
    /// rejections such as a declined payment must not be retried.
    #[error("Payment gateway error: {detail}")]
    Gateway { detail: String, retryable: bool },

    /// The processor does not recognise the order id.
    #[error("Payment not found: {0}")]
    NotFound(String),

    /// The order was captured by an earlier call; nothing was charged this time.
    #[error("Payment {0} has already been captured")]
    AlreadyCaptured(String),
}

impl PaymentError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::Gateway { retryable: true, .. })
    }
}

/// Convenience type alias for payment results.
pub type Result<T> = std::result::Result<T, PaymentError>;
