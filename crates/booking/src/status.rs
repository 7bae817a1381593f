//! Booking status lifecycle.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// The status of a booking in its lifecycle.
///
/// State transitions:
/// ```text
/// Pending ──► Confirmed ──► Completed
///    │            │
///    └────────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Created, awaiting confirmation.
    #[default]
    Pending,

    /// Confirmed by the operator; the equipment is committed.
    Confirmed,

    /// Cancelled (terminal state).
    Cancelled,

    /// Rental finished and equipment returned (terminal state).
    Completed,
}

use BookingStatus::{Cancelled, Completed, Confirmed, Pending};

/// Allowed transitions, one row per source status.
const TRANSITIONS: [(BookingStatus, &[BookingStatus]); 4] = [
    (Pending, &[Confirmed, Cancelled]),
    (Confirmed, &[Completed, Cancelled]),
    (Cancelled, &[]),
    (Completed, &[]),
];

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [Pending, Confirmed, Cancelled, Completed];

    /// Statuses that do not hold the resource for their dates.
    pub const RELEASED: [BookingStatus; 2] = [Cancelled, Completed];

    /// Returns the statuses reachable in one step from this one.
    pub fn allowed_transitions(&self) -> &'static [BookingStatus] {
        TRANSITIONS
            .iter()
            .find(|(from, _)| from == self)
            .map(|(_, to)| *to)
            .unwrap_or(&[])
    }

    /// Returns true if `next` is reachable in one step.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Returns true if a booking in this status blocks its dates for other bookings.
    pub fn holds_resource(&self) -> bool {
        !Self::RELEASED.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Pending => "pending",
            Confirmed => "confirmed",
            Cancelled => "cancelled",
            Completed => "completed",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BookingError::UnknownStatus(s.to_string()))
    }
}
