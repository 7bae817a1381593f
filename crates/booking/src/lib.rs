//! Booking domain for the rental engine.
//!
//! This crate holds everything that decides whether a booking may exist:
//! - closed configuration sets and the price table keyed by them
//! - the booking status lifecycle and its transition table
//! - rental period validation and the inclusive overlap rule
//! - the availability checker over the `BookingRepository` port
//!
//! Nothing here talks to a payment processor; see the `payment` crate.

pub mod availability;
pub mod booking;
pub mod clock;
pub mod configuration;
pub mod customer;
pub mod error;
pub mod lifecycle;
pub mod memory;
pub mod period;
pub mod pricing;
pub mod repository;
pub mod status;

pub use availability::AvailabilityChecker;
pub use booking::{Booking, NewBooking, PaymentRecord};
pub use clock::{Clock, FixedClock, SystemClock};
pub use common::{BookingId, Currency, Money, PaymentStatus, Version};
pub use configuration::{OptionConfiguration, ResourceConfiguration};
pub use customer::Customer;
pub use error::{BookingError, Result};
pub use lifecycle::BookingStateMachine;
pub use memory::InMemoryBookingRepository;
pub use period::RentalPeriod;
pub use pricing::PriceTable;
pub use repository::{BookingRepository, RepositoryError};
pub use status::BookingStatus;
