//! Availability checks over the booking repository.

use crate::booking::Booking;
use crate::configuration::ResourceConfiguration;
use crate::error::{BookingError, Result};
use crate::period::RentalPeriod;
use crate::repository::BookingRepository;
use crate::status::BookingStatus;

/// Decides whether a resource is free for a period.
///
/// Only `pending` and `confirmed` bookings hold a resource; cancelled and
/// completed bookings release their dates immediately. Taking a
/// [`RentalPeriod`] means date validation has already happened.
#[derive(Debug, Clone)]
pub struct AvailabilityChecker<R> {
    repository: R,
}

impl<R: BookingRepository> AvailabilityChecker<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns the bookings that would conflict with `period`.
    #[tracing::instrument(skip(self), fields(%resource, %period))]
    pub async fn conflicts(
        &self,
        resource: ResourceConfiguration,
        period: &RentalPeriod,
    ) -> Result<Vec<Booking>> {
        let existing = self
            .repository
            .find_overlapping(resource, period, &BookingStatus::RELEASED)
            .await?;

        // Re-apply the rule locally; repositories may over-select.
        Ok(existing
            .into_iter()
            .filter(|b| b.conflicts_with(resource, period))
            .collect())
    }

    pub async fn is_available(
        &self,
        resource: ResourceConfiguration,
        period: &RentalPeriod,
    ) -> Result<bool> {
        Ok(self.conflicts(resource, period).await?.is_empty())
    }

    /// Fails with `ResourceNotAvailable` listing the conflicting periods.
    pub async fn ensure_available(
        &self,
        resource: ResourceConfiguration,
        period: &RentalPeriod,
    ) -> Result<()> {
        let conflicts = self.conflicts(resource, period).await?;
        if conflicts.is_empty() {
            return Ok(());
        }
        tracing::debug!(conflicts = conflicts.len(), "resource not available");
        Err(BookingError::ResourceNotAvailable {
            resource,
            requested: *period,
            conflicts: conflicts.iter().map(|b| *b.period()).collect(),
        })
    }
}
