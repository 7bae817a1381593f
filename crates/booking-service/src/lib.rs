//! Booking orchestrator for the rental engine.
//!
//! [`BookingService`] is the entry point an outer layer calls:
//!
//! ```text
//! request_availability ─┐
//! quote ────────────────┼─> PriceTable / AvailabilityChecker
//! create_booking ───────┘        │
//!                                v
//!                     resource lock ─> conditional insert
//!
//! begin_payment ─> gateway.create_payment
//! checkout ──────> validate ─> resource lock ─> availability
//!                  ─> gateway.capture_payment ─> insert
//!                                  (refund on failed insert)
//!
//! update_booking_status ─> booking lock ─> state machine ─> versioned update
//! ```

pub mod config;
pub mod error;
pub mod locks;
pub mod request;
pub mod service;
pub mod telemetry;

pub use config::{LogFormat, ServiceConfig};
pub use error::{Result, ServiceError};
pub use locks::{KeyedGuard, KeyedLocks};
pub use request::{CreateBookingRequest, CustomerDetails};
pub use service::{BookingService, PaymentIntent};
pub use telemetry::init_tracing;
