//! Payment gateway adapter.
//!
//! The [`PaymentProcessor`] trait speaks the processor's own vocabulary
//! (order/capture ids, upper-case status strings, classified failures).
//! [`PaymentGateway`] wraps a processor behind the engine's stable interface:
//! create, capture and refund, with statuses normalised to
//! [`common::PaymentStatus`] and failures mapped to [`PaymentError`].

pub mod error;
pub mod gateway;
pub mod memory;
pub mod processor;

pub use error::{PaymentError, Result};
pub use gateway::{CaptureResult, PaymentGateway, RefundResult};
pub use memory::InMemoryPaymentProcessor;
pub use processor::{
    CreateOrderRequest, PaymentProcessor, ProcessorCapture, ProcessorError, ProcessorErrorKind,
    ProcessorOrder, ProcessorRefund,
};
