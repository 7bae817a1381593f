use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{BookingId, Version};
use tokio::sync::RwLock;

use crate::booking::Booking;
use crate::configuration::ResourceConfiguration;
use crate::period::RentalPeriod;
use crate::repository::{BookingRepository, RepositoryError};
use crate::status::BookingStatus;

/// In-memory booking repository.
///
/// Checks overlap and versions under a single write lock, so it honours the
/// conditional-insert and expected-version contracts of [`BookingRepository`]
/// the way a transactional store would.
#[derive(Clone, Default)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<HashMap<BookingId, Booking>>>,
}

impl InMemoryBookingRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of bookings stored.
    pub async fn booking_count(&self) -> usize {
        self.bookings.read().await.len()
    }

    /// Returns every stored booking.
    pub async fn all(&self) -> Vec<Booking> {
        self.bookings.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find_overlapping(
        &self,
        resource: ResourceConfiguration,
        period: &RentalPeriod,
        exclude_statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, RepositoryError> {
        let store = self.bookings.read().await;
        let mut found: Vec<_> = store
            .values()
            .filter(|b| {
                b.resource() == resource
                    && !exclude_statuses.contains(&b.status())
                    && b.period().overlaps(period)
            })
            .cloned()
            .collect();
        found.sort_by_key(|b| b.period().start());
        Ok(found)
    }

    async fn insert(&self, booking: Booking) -> Result<Booking, RepositoryError> {
        let mut store = self.bookings.write().await;

        if store.contains_key(&booking.id()) {
            return Err(RepositoryError::DuplicateId(booking.id()));
        }

        if let Some(existing) = store
            .values()
            .find(|b| b.conflicts_with(booking.resource(), booking.period()))
        {
            return Err(RepositoryError::Overlap {
                resource: booking.resource(),
                existing: existing.id(),
                period: *existing.period(),
            });
        }

        let stored = booking.with_version(Version::first());
        store.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, RepositoryError> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn update(&self, booking: Booking) -> Result<Booking, RepositoryError> {
        let mut store = self.bookings.write().await;

        let current = store
            .get(&booking.id())
            .ok_or(RepositoryError::Missing(booking.id()))?;

        if current.version() != booking.version() {
            return Err(RepositoryError::VersionConflict {
                booking_id: booking.id(),
                expected: booking.version(),
                actual: current.version(),
            });
        }

        let next = booking.version().next();
        let stored = booking.with_version(next);
        store.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn find_by_resource(
        &self,
        resource: ResourceConfiguration,
    ) -> Result<Vec<Booking>, RepositoryError> {
        let store = self.bookings.read().await;
        let mut found: Vec<_> = store
            .values()
            .filter(|b| b.resource() == resource)
            .cloned()
            .collect();
        found.sort_by_key(|b| b.period().start());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{NewBooking, PaymentRecord};
    use crate::configuration::OptionConfiguration;
    use crate::customer::Customer;
    use crate::lifecycle::BookingStateMachine;
    use crate::pricing::PriceTable;
    use chrono::{DateTime, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()
    }

    fn booking(resource: ResourceConfiguration, start: &str, end: &str) -> Booking {
        Booking::create(
            NewBooking {
                resource,
                option: OptionConfiguration::None,
                period: RentalPeriod::parse(start, end, now()).unwrap(),
                customer: Customer::new("Ann", "ann@example.com", "5551234567", "1 Main St")
                    .unwrap(),
                payment: PaymentRecord::pending(None),
            },
            &PriceTable::standard(),
            now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_first_version() {
        let repo = InMemoryBookingRepository::new();
        let stored = repo
            .insert(booking(ResourceConfiguration::Small, "2025-06-01", "2025-06-03"))
            .await
            .unwrap();

        assert_eq!(stored.version(), Version::first());
        assert_eq!(repo.booking_count().await, 1);
        assert_eq!(repo.find_by_id(stored.id()).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_insert_rejects_overlap_on_same_resource() {
        let repo = InMemoryBookingRepository::new();
        let first = repo
            .insert(booking(ResourceConfiguration::Small, "2025-06-01", "2025-06-03"))
            .await
            .unwrap();

        let result = repo
            .insert(booking(ResourceConfiguration::Small, "2025-06-03", "2025-06-04"))
            .await;
        assert!(matches!(
            result,
            Err(RepositoryError::Overlap { existing, .. }) if existing == first.id()
        ));

        // Other resources are independent
        repo.insert(booking(ResourceConfiguration::Large, "2025-06-01", "2025-06-03"))
            .await
            .unwrap();
        assert_eq!(repo.booking_count().await, 2);
    }

    #[tokio::test]
    async fn test_insert_ignores_released_bookings() {
        let repo = InMemoryBookingRepository::new();
        let first = repo
            .insert(booking(ResourceConfiguration::Small, "2025-06-01", "2025-06-03"))
            .await
            .unwrap();
        let cancelled =
            BookingStateMachine::transition(&first, BookingStatus::Cancelled, now()).unwrap();
        repo.update(cancelled).await.unwrap();

        repo.insert(booking(ResourceConfiguration::Small, "2025-06-02", "2025-06-04"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_with_stale_version_conflicts() {
        let repo = InMemoryBookingRepository::new();
        let stored = repo
            .insert(booking(ResourceConfiguration::Medium, "2025-06-01", "2025-06-03"))
            .await
            .unwrap();

        let confirmed =
            BookingStateMachine::transition(&stored, BookingStatus::Confirmed, now()).unwrap();
        let updated = repo.update(confirmed).await.unwrap();
        assert_eq!(updated.version(), Version::first().next());

        let stale =
            BookingStateMachine::transition(&stored, BookingStatus::Cancelled, now()).unwrap();
        let result = repo.update(stale).await;
        assert!(matches!(
            result,
            Err(RepositoryError::VersionConflict { expected, actual, .. })
                if expected == Version::first() && actual == Version::first().next()
        ));
    }

    #[tokio::test]
    async fn test_update_unknown_booking() {
        let repo = InMemoryBookingRepository::new();
        let never_stored = booking(ResourceConfiguration::Small, "2025-06-01", "2025-06-03");
        let result = repo.update(never_stored).await;
        assert!(matches!(result, Err(RepositoryError::Missing(_))));
    }

    #[tokio::test]
    async fn test_find_overlapping_respects_exclusions() {
        let repo = InMemoryBookingRepository::new();
        let first = repo
            .insert(booking(ResourceConfiguration::Small, "2025-06-01", "2025-06-03"))
            .await
            .unwrap();
        let confirmed = repo
            .update(BookingStateMachine::transition(&first, BookingStatus::Confirmed, now()).unwrap())
            .await
            .unwrap();
        repo.update(BookingStateMachine::transition(&confirmed, BookingStatus::Completed, now()).unwrap())
            .await
            .unwrap();

        let period = RentalPeriod::parse("2025-06-02", "2025-06-05", now()).unwrap();
        let all = repo
            .find_overlapping(ResourceConfiguration::Small, &period, &[])
            .await
            .unwrap();
        assert_eq!(all.len(), 1);

        let holding = repo
            .find_overlapping(ResourceConfiguration::Small, &period, &BookingStatus::RELEASED)
            .await
            .unwrap();
        assert!(holding.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_resource_sorted_by_start() {
        let repo = InMemoryBookingRepository::new();
        repo.insert(booking(ResourceConfiguration::Small, "2025-06-10", "2025-06-12"))
            .await
            .unwrap();
        repo.insert(booking(ResourceConfiguration::Small, "2025-06-01", "2025-06-03"))
            .await
            .unwrap();
        repo.insert(booking(ResourceConfiguration::Medium, "2025-06-01", "2025-06-03"))
            .await
            .unwrap();

        let small = repo
            .find_by_resource(ResourceConfiguration::Small)
            .await
            .unwrap();
        assert_eq!(small.len(), 2);
        assert!(small[0].period().start() < small[1].period().start());
    }
}
