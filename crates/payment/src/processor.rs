//! Port for the external payment processor.

use async_trait::async_trait;
use common::{Currency, Money};
use thiserror::Error;

/// Request to open a payment order with the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderRequest {
    pub amount: Money,
    pub currency: Currency,
    pub description: String,
}

/// An order opened with the processor, awaiting payer approval and capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorOrder {
    pub order_id: String,
    /// Processor status string, e.g. `CREATED`.
    pub status: String,
}

/// Outcome of capturing an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorCapture {
    pub capture_id: String,
    /// Processor status string, e.g. `COMPLETED` or `DECLINED`.
    pub status: String,
    pub amount: Money,
}

/// Outcome of refunding a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorRefund {
    pub refund_id: String,
    pub status: String,
}

/// How the processor classified a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessorErrorKind {
    /// Connection refused, reset, DNS failure.
    Transport,
    Timeout,
    /// Bad credentials or account setup.
    Misconfigured,
    InvalidRequest,
    /// The payer's instrument was declined.
    Declined,
    /// Unknown order or capture id.
    NotFound,
    /// The order has already been captured.
    AlreadyCaptured,
}

impl ProcessorErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessorErrorKind::Transport => "transport",
            ProcessorErrorKind::Timeout => "timeout",
            ProcessorErrorKind::Misconfigured => "misconfigured",
            ProcessorErrorKind::InvalidRequest => "invalid_request",
            ProcessorErrorKind::Declined => "declined",
            ProcessorErrorKind::NotFound => "not_found",
            ProcessorErrorKind::AlreadyCaptured => "already_captured",
        }
    }
}

/// Failure reported by a processor client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} error: {message}", .kind.as_str())]
pub struct ProcessorError {
    pub kind: ProcessorErrorKind,
    pub message: String,
}

impl ProcessorError {
    pub fn new(kind: ProcessorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Network-level processor operations.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<ProcessorOrder, ProcessorError>;

    async fn capture_order(&self, order_id: &str) -> Result<ProcessorCapture, ProcessorError>;

    async fn refund_capture(&self, capture_id: &str) -> Result<ProcessorRefund, ProcessorError>;
}
