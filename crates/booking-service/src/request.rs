//! Raw booking payloads as they arrive from a caller.

use booking::{
    BookingError, Customer, OptionConfiguration, RentalPeriod, ResourceConfiguration,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Customer contact fields, each possibly absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A booking request before any validation.
///
/// Blank strings count as missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateBookingRequest {
    pub resource_configuration: Option<String>,
    pub option_configuration: Option<String>,
    pub rental_start: Option<String>,
    pub rental_end: Option<String>,
    pub customer: CustomerDetails,
    /// Processor order id the payment was created under.
    pub payment_reference: Option<String>,
    /// Set when the caller has already captured the payment.
    pub payment_captured: bool,
    pub transaction_id: Option<String>,
}

/// A request that passed shape, configuration, date and customer checks.
#[derive(Debug, Clone)]
pub(crate) struct ValidatedRequest {
    pub resource: ResourceConfiguration,
    pub option: OptionConfiguration,
    pub period: RentalPeriod,
    pub customer: Customer,
}

impl CreateBookingRequest {
    /// Validates in order: required fields, configuration tags, dates, customer.
    pub(crate) fn validate(&self, now: DateTime<Utc>) -> Result<ValidatedRequest, BookingError> {
        let resource = required(&self.resource_configuration, "resource_configuration")?;
        let option = required(&self.option_configuration, "option_configuration")?;
        let start = required(&self.rental_start, "rental_start")?;
        let end = required(&self.rental_end, "rental_end")?;
        let name = required(&self.customer.name, "customer.name")?;
        let email = required(&self.customer.email, "customer.email")?;
        let phone = required(&self.customer.phone, "customer.phone")?;
        let address = required(&self.customer.address, "customer.address")?;
        if self.payment_captured {
            required(&self.payment_reference, "payment_reference")?;
        }

        let resource: ResourceConfiguration = resource.parse()?;
        let option: OptionConfiguration = option.parse()?;
        let period = RentalPeriod::parse(start, end, now)?;
        let customer = Customer::new(name, email, phone, address)?;

        Ok(ValidatedRequest {
            resource,
            option,
            period,
            customer,
        })
    }

    /// The payment reference, ignoring blank values.
    pub(crate) fn payment_reference(&self) -> Option<&str> {
        present(&self.payment_reference)
    }

    pub(crate) fn transaction_id(&self) -> Option<&str> {
        present(&self.transaction_id)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, BookingError> {
    present(value).ok_or(BookingError::MissingRequiredField(field))
}
