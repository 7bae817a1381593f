//! Value objects shared by the booking, payment and service crates.

mod money;
mod payment_status;
mod types;

pub use money::{Currency, InvalidCurrency, Money};
pub use payment_status::PaymentStatus;
pub use types::{BookingId, Version};
