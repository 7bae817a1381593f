//! The booking entity.

use chrono::{DateTime, Utc};
use common::{BookingId, Money, PaymentStatus, Version};
use serde::{Deserialize, Serialize};

use crate::configuration::{OptionConfiguration, ResourceConfiguration};
use crate::customer::Customer;
use crate::error::{BookingError, Result};
use crate::period::RentalPeriod;
use crate::pricing::PriceTable;
use crate::status::BookingStatus;

/// Payment details recorded on a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Order identifier returned by the payment processor.
    pub external_reference: Option<String>,
    /// Capture transaction identifier, once captured.
    pub transaction_id: Option<String>,
    /// Amount captured; equals the booking price when present.
    pub captured_amount: Option<Money>,
    pub status: PaymentStatus,
}

impl PaymentRecord {
    /// No payment collected yet.
    pub fn pending(external_reference: Option<String>) -> Self {
        Self {
            external_reference,
            transaction_id: None,
            captured_amount: None,
            status: PaymentStatus::Pending,
        }
    }

    /// A capture that the caller has already completed against the processor.
    pub fn captured(
        external_reference: impl Into<String>,
        transaction_id: Option<String>,
        amount: Money,
    ) -> Self {
        Self {
            external_reference: Some(external_reference.into()),
            transaction_id,
            captured_amount: Some(amount),
            status: PaymentStatus::Completed,
        }
    }
}

/// Everything needed to create a booking except the derived fields.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub resource: ResourceConfiguration,
    pub option: OptionConfiguration,
    pub period: RentalPeriod,
    pub customer: Customer,
    pub payment: PaymentRecord,
}

/// A reservation of one physical unit for one contiguous period.
///
/// Price and capacity are derived at creation and have no setters; status
/// changes only through [`crate::BookingStateMachine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    id: BookingId,
    resource: ResourceConfiguration,
    option: OptionConfiguration,
    capacity: u32,
    price: Money,
    period: RentalPeriod,
    customer: Customer,
    payment: PaymentRecord,
    status: BookingStatus,
    version: Version,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a pending booking, pricing it from `prices`.
    ///
    /// The customer is re-validated and the rental must not have started at
    /// `now`, however long ago the period itself was validated. If the payment record carries a captured amount, it is replaced by the
    /// derived price so the two can never disagree.
    pub fn create(new: NewBooking, prices: &PriceTable, now: DateTime<Utc>) -> Result<Self> {
        new.customer.validate()?;
        let start = new.period.start();
        if start < now {
            return Err(BookingError::RentalInPast { start });
        }
        let price = prices.price(new.resource, new.option)?;
        let mut payment = new.payment;
        if payment.captured_amount.is_some() {
            payment.captured_amount = Some(price);
        }

        Ok(Self {
            id: BookingId::new(),
            resource: new.resource,
            option: new.option,
            capacity: new.resource.capacity(),
            price,
            period: new.period,
            customer: new.customer,
            payment,
            status: BookingStatus::Pending,
            version: Version::initial(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> BookingId {
        self.id
    }

    pub fn resource(&self) -> ResourceConfiguration {
        self.resource
    }

    pub fn option(&self) -> OptionConfiguration {
        self.option
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn period(&self) -> &RentalPeriod {
        &self.period
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn payment(&self) -> &PaymentRecord {
        &self.payment
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true if this booking blocks `period` for its resource.
    pub fn conflicts_with(&self, resource: ResourceConfiguration, period: &RentalPeriod) -> bool {
        self.resource == resource && self.status.holds_resource() && self.period.overlaps(period)
    }

    pub(crate) fn with_status(&self, status: BookingStatus, now: DateTime<Utc>) -> Self {
        Self {
            status,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Stamps the version a repository stored this booking at.
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }
}
