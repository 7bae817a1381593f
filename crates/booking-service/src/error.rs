//! Service error types.

use booking::{BookingError, BookingId, Money, PaymentStatus, RepositoryError};
use payment::PaymentError;
use thiserror::Error;

/// Errors returned by [`crate::BookingService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Validation, availability, lifecycle or storage failure.
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// The payment gateway failed or rejected the request.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// The processor reported a capture that did not complete.
    #[error("Capture of order {order_id} ended with status {status}")]
    PaymentNotCompleted {
        order_id: String,
        status: PaymentStatus,
    },

    /// The captured amount differs from the booking price.
    #[error("Captured {captured} but the booking price is {price}")]
    PaymentAmountMismatch { captured: Money, price: Money },

    /// A capture could not be refunded after the booking failed to persist.
    #[error("Refund of capture {transaction_id} failed ({reason}) after: {original}")]
    CompensationFailed {
        transaction_id: String,
        reason: String,
        original: Box<ServiceError>,
    },

    /// The task writing a captured booking was cancelled before it finished,
    /// so neither the booking nor a refund can be confirmed.
    #[error("Settlement of a captured payment did not finish: {0}")]
    SettlementAborted(String),

    /// Version conflicts persisted through every retry.
    #[error("Booking {booking_id} was modified concurrently; gave up after {attempts} attempts")]
    ConcurrentModification { booking_id: BookingId, attempts: u32 },
}

impl ServiceError {
    /// True when repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Payment(e) => e.is_retryable(),
            ServiceError::ConcurrentModification { .. } => true,
            ServiceError::Booking(BookingError::Repository(RepositoryError::Backend(_))) => true,
            _ => false,
        }
    }

    /// True when the caller supplied bad input or asked for something the
    /// business rules forbid.
    pub fn is_client_error(&self) -> bool {
        match self {
            ServiceError::Booking(e) => e.is_client_error(),
            _ => false,
        }
    }

    /// Returns the booking error, if this is one.
    pub fn as_booking_error(&self) -> Option<&BookingError> {
        match self {
            ServiceError::Booking(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        ServiceError::Booking(BookingError::from(err))
    }
}

/// Convenience type alias for service results.
pub type Result<T> = std::result::Result<T, ServiceError>;
