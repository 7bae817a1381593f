//! Persistence port for bookings.

use async_trait::async_trait;
use common::{BookingId, Version};
use thiserror::Error;

use crate::booking::Booking;
use crate::configuration::ResourceConfiguration;
use crate::period::RentalPeriod;
use crate::status::BookingStatus;

/// Errors reported by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A conditional insert found an overlapping booking at write time.
    #[error("Booking {existing} already holds {resource} for an overlapping period")]
    Overlap {
        resource: ResourceConfiguration,
        existing: BookingId,
        period: RentalPeriod,
    },

    /// An update was based on a stale version.
    #[error("Concurrency conflict for booking {booking_id}: expected version {expected}, found {actual}")]
    VersionConflict {
        booking_id: BookingId,
        expected: Version,
        actual: Version,
    },

    /// Insert of an ID that already exists.
    #[error("Booking already exists: {0}")]
    DuplicateId(BookingId),

    /// Update of an ID that does not exist.
    #[error("Booking not stored: {0}")]
    Missing(BookingId),

    /// The storage backend failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Storage for bookings.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Returns bookings for `resource` whose period overlaps `period`
    /// (inclusive), skipping any whose status is in `exclude_statuses`.
    async fn find_overlapping(
        &self,
        resource: ResourceConfiguration,
        period: &RentalPeriod,
        exclude_statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, RepositoryError>;

    /// Stores a new booking at `Version::first()`.
    ///
    /// The insert is conditional: if a resource-holding booking for the same
    /// resource overlaps at write time, it fails with `Overlap`.
    async fn insert(&self, booking: Booking) -> Result<Booking, RepositoryError>;

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, RepositoryError>;

    /// Replaces a stored booking if its version still matches, returning
    /// the booking at its new version.
    async fn update(&self, booking: Booking) -> Result<Booking, RepositoryError>;

    /// Returns all bookings for a resource, oldest rental first.
    async fn find_by_resource(
        &self,
        resource: ResourceConfiguration,
    ) -> Result<Vec<Booking>, RepositoryError>;
}
