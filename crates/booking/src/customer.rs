//! Customer contact details attached to a booking.

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::{BookingError, Result};

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// Who the booking is for. Opaque to the booking logic beyond validation.
///
/// Only built through [`Customer::new`] or deserialization, both of which
/// validate every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredCustomer")]
pub struct Customer {
    name: String,
    email: String,
    phone: String,
    address: String,
}

#[derive(Deserialize)]
struct StoredCustomer {
    name: String,
    email: String,
    phone: String,
    address: String,
}

impl TryFrom<StoredCustomer> for Customer {
    type Error = BookingError;

    fn try_from(stored: StoredCustomer) -> Result<Self> {
        Self::new(stored.name, stored.email, stored.phone, stored.address)
    }
}

impl Customer {
    /// Creates a customer after trimming and validating every field.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self> {
        let customer = Self {
            name: name.into().trim().to_string(),
            email: email.into().trim().to_string(),
            phone: phone.into().trim().to_string(),
            address: address.into().trim().to_string(),
        };
        customer.validate()?;
        Ok(customer)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BookingError::MissingRequiredField("customer.name"));
        }
        if self.address.trim().is_empty() {
            return Err(BookingError::MissingRequiredField("customer.address"));
        }
        if !self.email.validate_email() {
            return Err(BookingError::InvalidCustomerField {
                field: "email",
                reason: "not a valid email address",
            });
        }
        validate_phone(&self.phone)
    }
}

/// Digits with an optional leading `+`; spaces, dashes, dots and parentheses allowed as separators.
fn validate_phone(phone: &str) -> Result<()> {
    let invalid = |reason| BookingError::InvalidCustomerField {
        field: "phone",
        reason,
    };

    let body = phone.strip_prefix('+').unwrap_or(phone);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '(' | ')'))
    {
        return Err(invalid("contains characters other than digits and separators"));
    }

    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(invalid("must contain between 7 and 15 digits"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(email: &str, phone: &str) -> Result<Customer> {
        Customer::new("Jan Kowalski", email, phone, "ul. Polna 1, Warszawa")
    }

    #[test]
    fn test_valid_customer() {
        let c = customer("  jan@example.com ", "+48 600-100-200").unwrap();
        assert_eq!(c.email(), "jan@example.com");
        assert_eq!(c.phone(), "+48 600-100-200");
    }

    #[test]
    fn test_invalid_email() {
        for bad in ["jan", "jan@", "@example.com", "jan example@x.com"] {
            let err = customer(bad, "600100200").unwrap_err();
            assert!(
                matches!(err, BookingError::InvalidCustomerField { field: "email", .. }),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_invalid_phone() {
        for bad in ["12345", "phone", "+48 600 100 200 300 400", "600100200x", "++48600100200"] {
            let err = customer("jan@example.com", bad).unwrap_err();
            assert!(
                matches!(err, BookingError::InvalidCustomerField { field: "phone", .. }),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_deserialize_validates_fields() {
        let json = r#"{"name":"","email":"nope","phone":"x","address":""}"#;
        assert!(serde_json::from_str::<Customer>(json).is_err());

        let c = customer("jan@example.com", "600100200").unwrap();
        let restored: Customer = serde_json::from_str(&serde_json::to_string(&c).unwrap()).unwrap();
        assert_eq!(restored, c);
    }

    #[test]
    fn test_blank_name_is_missing() {
        let err = Customer::new(" ", "jan@example.com", "600100200", "addr").unwrap_err();
        assert!(matches!(err, BookingError::MissingRequiredField("customer.name")));
    }
}
