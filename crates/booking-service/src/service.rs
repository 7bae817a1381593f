//! Booking orchestration.

use std::sync::Arc;
use std::time::Instant;

use booking::{
    AvailabilityChecker, Booking, BookingError, BookingId, BookingRepository, BookingStateMachine,
    BookingStatus, Clock, Currency, Money, NewBooking, OptionConfiguration, PaymentRecord,
    PaymentStatus, PriceTable, RentalPeriod, RepositoryError, ResourceConfiguration, SystemClock,
};
use chrono::{DateTime, Utc};
use payment::{PaymentGateway, PaymentProcessor};
use tracing::Instrument;

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::locks::KeyedLocks;
use crate::request::CreateBookingRequest;

/// A processor order opened for a quoted booking, awaiting payer approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub order_id: String,
    pub amount: Money,
    pub currency: Currency,
}

/// Composes validation, availability, pricing, the status lifecycle and
/// the payment gateway over a booking repository.
///
/// Creation holds a per-resource lock across check-then-insert, and the
/// repository re-checks overlap at write time. Status updates hold a
/// per-booking lock across load-transition-update and retry on version
/// conflicts up to `max_conflict_retries` times.
pub struct BookingService<R, P> {
    repository: R,
    availability: AvailabilityChecker<R>,
    prices: Arc<PriceTable>,
    gateway: Arc<PaymentGateway<P>>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
    resource_locks: KeyedLocks<ResourceConfiguration>,
    booking_locks: KeyedLocks<BookingId>,
}

impl<R, P> BookingService<R, P>
where
    R: BookingRepository + Clone + 'static,
    P: PaymentProcessor + 'static,
{
    /// Creates a service with the standard price table and the system clock.
    pub fn new(repository: R, processor: P, config: ServiceConfig) -> Self {
        Self {
            availability: AvailabilityChecker::new(repository.clone()),
            repository,
            prices: Arc::new(PriceTable::standard()),
            gateway: Arc::new(PaymentGateway::new(processor)),
            clock: Arc::new(SystemClock),
            config,
            resource_locks: KeyedLocks::new(),
            booking_locks: KeyedLocks::new(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_prices(mut self, prices: PriceTable) -> Self {
        if !prices.is_complete() {
            tracing::warn!("price table does not cover every configuration");
        }
        self.prices = Arc::new(prices);
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn gateway(&self) -> &PaymentGateway<P> {
        &self.gateway
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Whether `resource` is free for the raw date range.
    #[tracing::instrument(skip(self))]
    pub async fn request_availability(&self, resource: &str, start: &str, end: &str) -> Result<bool> {
        let resource: ResourceConfiguration = resource.parse()?;
        let period = RentalPeriod::parse(start, end, self.clock.now())?;
        Ok(self.availability.is_available(resource, &period).await?)
    }

    /// Price for a configuration pair.
    #[tracing::instrument(skip(self))]
    pub async fn quote(&self, resource: &str, option: &str) -> Result<Money> {
        let resource: ResourceConfiguration = resource.parse()?;
        let option: OptionConfiguration = option.parse()?;
        Ok(self.prices.price(resource, option)?)
    }

    /// Validates and persists a new `pending` booking.
    ///
    /// The payment is recorded as completed only when the request says it
    /// was captured beforehand; see [`Self::checkout`] for the flow that
    /// captures through the gateway.
    #[tracing::instrument(
        skip(self, request),
        fields(
            resource = ?request.resource_configuration,
            option = ?request.option_configuration,
        )
    )]
    pub async fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking> {
        let started = Instant::now();
        let now = self.clock.now();
        let input = request.validate(now)?;

        let reference = request.payment_reference().map(str::to_string);
        let payment = match reference {
            Some(reference) if request.payment_captured => PaymentRecord::captured(
                reference,
                request.transaction_id().map(str::to_string),
                Money::zero(),
            ),
            reference => PaymentRecord::pending(reference),
        };

        let _guard = self.resource_locks.lock(input.resource).await;
        self.ensure_not_started(&input.period)?;
        self.availability
            .ensure_available(input.resource, &input.period)
            .await
            .inspect_err(record_conflict)?;

        let booking = insert_booking(
            &self.repository,
            &self.prices,
            self.clock.now(),
            NewBooking {
                resource: input.resource,
                option: input.option,
                period: input.period,
                customer: input.customer,
                payment,
            },
        )
        .await?;

        metrics::histogram!("booking_create_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        Ok(booking)
    }

    /// Applies a status transition given as a raw tag.
    pub async fn update_booking_status(&self, id: BookingId, requested: &str) -> Result<Booking> {
        let requested: BookingStatus = requested.parse()?;
        self.transition_booking(id, requested).await
    }

    /// Loads, transitions and stores a booking under its per-id lock.
    #[tracing::instrument(skip_all, fields(booking_id = %id, to = %requested))]
    pub async fn transition_booking(&self, id: BookingId, requested: BookingStatus) -> Result<Booking> {
        let _guard = self.booking_locks.lock(id).await;
        let max_attempts = self.config.max_conflict_retries.saturating_add(1);
        let mut attempts = 0;

        loop {
            attempts += 1;
            let current = self.load(id).await?;
            let next = BookingStateMachine::transition(&current, requested, self.clock.now())
                .inspect_err(|e| tracing::warn!(error = %e, "status transition rejected"))?;

            match self.repository.update(next).await {
                Ok(updated) => {
                    metrics::counter!(
                        "booking_status_transitions_total",
                        "from" => current.status().as_str(),
                        "to" => requested.as_str()
                    )
                    .increment(1);
                    tracing::info!(from = %current.status(), version = %updated.version(), "booking status changed");
                    return Ok(updated);
                }
                Err(RepositoryError::VersionConflict { .. }) if attempts < max_attempts => {
                    tracing::warn!(attempts, "version conflict, retrying");
                }
                Err(RepositoryError::VersionConflict { .. }) => {
                    return Err(ServiceError::ConcurrentModification {
                        booking_id: id,
                        attempts,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_booking(&self, id: BookingId) -> Result<Booking> {
        self.load(id).await
    }

    /// All bookings for a resource, ordered by rental start.
    pub async fn bookings_for(&self, resource: ResourceConfiguration) -> Result<Vec<Booking>> {
        Ok(self.repository.find_by_resource(resource).await?)
    }

    /// Quotes a configuration and opens a processor order for that amount.
    #[tracing::instrument(skip(self))]
    pub async fn begin_payment(&self, resource: &str, option: &str) -> Result<PaymentIntent> {
        let amount = self.quote(resource, option).await?;
        let currency = self.config.currency.clone();
        let description = format!("Rental {} / {}", resource.trim(), option.trim());

        let order_id = self
            .gateway
            .create_payment(amount, &currency, &description)
            .await?;

        Ok(PaymentIntent {
            order_id,
            amount,
            currency,
        })
    }

    /// Captures `order_id` and persists the booking it pays for.
    ///
    /// Validation and the availability check run before anything is
    /// charged, and the booking is written only after a completed capture
    /// of exactly the booking price. If the write fails after capture, the
    /// capture is refunded and the write error returned.
    ///
    /// Once a capture has completed, the write and any refund run on a
    /// spawned task holding the resource lock, so dropping this future
    /// cannot leave a charge without either a booking or a refund.
    #[tracing::instrument(skip(self, request), fields(resource = ?request.resource_configuration))]
    pub async fn checkout(&self, request: CreateBookingRequest, order_id: &str) -> Result<Booking> {
        let started = Instant::now();
        let input = request.validate(self.clock.now())?;
        let price = self.prices.price(input.resource, input.option)?;

        let guard = self.resource_locks.lock(input.resource).await;
        self.ensure_not_started(&input.period)?;
        self.availability
            .ensure_available(input.resource, &input.period)
            .await
            .inspect_err(record_conflict)?;

        let capture = self.gateway.capture_payment(order_id).await?;
        if capture.status != PaymentStatus::Completed {
            tracing::warn!(order_id, status = %capture.status, "capture did not complete");
            return Err(ServiceError::PaymentNotCompleted {
                order_id: order_id.to_string(),
                status: capture.status,
            });
        }

        if capture.amount != price {
            let mismatch = ServiceError::PaymentAmountMismatch {
                captured: capture.amount,
                price,
            };
            return Err(compensate(&*self.gateway, &capture.transaction_id, mismatch).await);
        }

        let new = NewBooking {
            resource: input.resource,
            option: input.option,
            period: input.period,
            customer: input.customer,
            payment: PaymentRecord::captured(
                order_id,
                Some(capture.transaction_id.clone()),
                capture.amount,
            ),
        };
        let repository = self.repository.clone();
        let prices = Arc::clone(&self.prices);
        let gateway = Arc::clone(&self.gateway);
        let clock = Arc::clone(&self.clock);
        let transaction_id = capture.transaction_id;

        let settle = tokio::spawn(
            async move {
                let _guard = guard;
                match insert_booking(&repository, &*prices, clock.now(), new).await {
                    Ok(booking) => Ok(booking),
                    Err(e) => Err(compensate(&*gateway, &transaction_id, e).await),
                }
            }
            .in_current_span(),
        );

        let booking = match settle.await {
            Ok(result) => result?,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => return Err(ServiceError::SettlementAborted(e.to_string())),
        };
        metrics::histogram!("booking_create_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        Ok(booking)
    }

    /// Rejects a period that started while the request waited for its lock.
    fn ensure_not_started(&self, period: &RentalPeriod) -> Result<()> {
        let start = period.start();
        if start < self.clock.now() {
            return Err(BookingError::RentalInPast { start }.into());
        }
        Ok(())
    }

    async fn load(&self, id: BookingId) -> Result<Booking> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| BookingError::BookingNotFound(id).into())
    }

}

/// Prices and stores a booking. The caller holds the resource lock.
async fn insert_booking<R: BookingRepository>(
    repository: &R,
    prices: &PriceTable,
    now: DateTime<Utc>,
    new: NewBooking,
) -> Result<Booking> {
    let resource = new.resource;
    let requested = new.period;
    let booking = Booking::create(new, prices, now)?;

    match repository.insert(booking).await {
        Ok(stored) => {
            metrics::counter!("bookings_created_total", "resource" => resource.as_str())
                .increment(1);
            tracing::info!(
                booking_id = %stored.id(),
                price = %stored.price(),
                payment = %stored.payment().status,
                "booking created"
            );
            Ok(stored)
        }
        // Another writer sharing the repository got there first.
        Err(RepositoryError::Overlap { period, .. }) => {
            let err = BookingError::ResourceNotAvailable {
                resource,
                requested,
                conflicts: vec![period],
            };
            record_conflict(&err);
            Err(err.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Refunds a capture whose booking could not be stored.
async fn compensate<P: PaymentProcessor>(
    gateway: &PaymentGateway<P>,
    transaction_id: &str,
    original: ServiceError,
) -> ServiceError {
    metrics::counter!("booking_compensations_total").increment(1);
    tracing::warn!(transaction_id, error = %original, "refunding capture");

    match gateway.refund_payment(transaction_id).await {
        Ok(refund) => {
            tracing::info!(transaction_id, refund_id = %refund.refund_id, "capture refunded");
            original
        }
        Err(e) => {
            tracing::error!(transaction_id, error = %e, "refund failed");
            ServiceError::CompensationFailed {
                transaction_id: transaction_id.to_string(),
                reason: e.to_string(),
                original: Box::new(original),
            }
        }
    }
}

fn record_conflict(err: &BookingError) {
    if let BookingError::ResourceNotAvailable { resource, .. } = err {
        metrics::counter!("booking_conflicts_total", "resource" => resource.as_str()).increment(1);
        tracing::warn!(%resource, "resource not available");
    }
}
