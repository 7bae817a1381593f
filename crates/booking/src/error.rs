//! Booking error types.

use common::BookingId;
use thiserror::Error;

use crate::configuration::ResourceConfiguration;
use crate::period::RentalPeriod;
use crate::repository::RepositoryError;
use crate::status::BookingStatus;

/// Errors that can occur while validating, pricing or transitioning bookings.
#[derive(Debug, Error)]
pub enum BookingError {
    /// A required request field was absent or blank.
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// A configuration tag is not a member of its enumeration.
    #[error("Invalid configuration: {0:?}")]
    InvalidConfiguration(String),

    /// A date could not be parsed as a timestamp.
    #[error("Invalid date format: {value:?}")]
    InvalidDateFormat { value: String },

    /// The rental would start before the current time.
    #[error("Rental start {start} is in the past")]
    RentalInPast { start: chrono::DateTime<chrono::Utc> },

    /// The rental end is not strictly after its start.
    #[error("Return {end} must be after rental start {start}")]
    ReturnBeforeRental {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// A customer field failed format validation.
    #[error("Invalid customer {field}: {reason}")]
    InvalidCustomerField {
        field: &'static str,
        reason: &'static str,
    },

    /// The resource is already held for an overlapping period.
    #[error("{resource} is not available for {requested}; conflicts with {} booking(s)", conflicts.len())]
    ResourceNotAvailable {
        resource: ResourceConfiguration,
        requested: RentalPeriod,
        conflicts: Vec<RentalPeriod>,
    },

    /// The requested status is not reachable from the current one.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// The requested status is not one of the known statuses.
    #[error("Unknown status: {0:?}")]
    UnknownStatus(String),

    /// No booking exists with the given ID.
    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    /// The price table has no entry for the pair.
    #[error("No price for configuration ({resource}, {option})")]
    UnknownConfiguration { resource: String, option: String },

    /// The repository failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl BookingError {
    /// True for the three date-range validation failures.
    pub fn is_invalid_date_range(&self) -> bool {
        matches!(
            self,
            BookingError::InvalidDateFormat { .. }
                | BookingError::RentalInPast { .. }
                | BookingError::ReturnBeforeRental { .. }
        )
    }

    /// True when the caller supplied bad input and retrying unchanged cannot succeed.
    pub fn is_client_error(&self) -> bool {
        self.is_invalid_date_range()
            || matches!(
                self,
                BookingError::MissingRequiredField(_)
                    | BookingError::InvalidConfiguration(_)
                    | BookingError::InvalidCustomerField { .. }
                    | BookingError::UnknownStatus(_)
            )
    }
}

/// Convenience type alias for booking results.
pub type Result<T> = std::result::Result<T, BookingError>;
