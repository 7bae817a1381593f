//! Validated status transitions for a single booking.

use chrono::{DateTime, Utc};

use crate::booking::Booking;
use crate::error::{BookingError, Result};
use crate::status::BookingStatus;

/// Applies status transitions along the edges of the status table.
///
/// Stateless; persisting the returned booking is the caller's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingStateMachine;

impl BookingStateMachine {
    pub fn transition(
        booking: &Booking,
        requested: BookingStatus,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let current = booking.status();
        if !current.can_transition_to(requested) {
            return Err(BookingError::InvalidStatusTransition {
                from: current,
                to: requested,
            });
        }
        Ok(booking.with_status(requested, now))
    }
}
