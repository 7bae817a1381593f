//! In-memory payment processor for testing.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use common::{Currency, Money};

use crate::processor::{
    CreateOrderRequest, PaymentProcessor, ProcessorCapture, ProcessorError, ProcessorErrorKind,
    ProcessorOrder, ProcessorRefund,
};

#[derive(Debug, Clone)]
struct OrderEntry {
    amount: Money,
    currency: Currency,
    capture_id: Option<String>,
    refunded: bool,
}

#[derive(Debug, Default)]
struct InMemoryProcessorState {
    orders: HashMap<String, OrderEntry>,
    /// capture id -> order id
    captures: HashMap<String, String>,
    next_id: u32,
    fail_next_create: Option<ProcessorErrorKind>,
    fail_next_capture: Option<ProcessorErrorKind>,
    fail_next_refund: Option<ProcessorErrorKind>,
    capture_status: Option<String>,
    capture_amount: Option<Money>,
}

impl InMemoryProcessorState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{:04}", self.next_id)
    }
}

/// In-memory processor that approves every order unless told otherwise.
///
/// Orders are captured for the amount they were created with. Failure
/// injection is one-shot: each `fail_next_*` setting applies to the next
/// matching call only.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentProcessor {
    state: Arc<RwLock<InMemoryProcessorState>>,
}

impl InMemoryPaymentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, InMemoryProcessorState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, InMemoryProcessorState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the next `create_order` call fail with `kind`.
    pub fn fail_next_create(&self, kind: ProcessorErrorKind) {
        self.write().fail_next_create = Some(kind);
    }

    /// Makes the next `capture_order` call fail with `kind`.
    pub fn fail_next_capture(&self, kind: ProcessorErrorKind) {
        self.write().fail_next_capture = Some(kind);
    }

    /// Makes the next `refund_capture` call fail with `kind`.
    pub fn fail_next_refund(&self, kind: ProcessorErrorKind) {
        self.write().fail_next_refund = Some(kind);
    }

    /// Reports `status` (e.g. `DECLINED`) on every following capture.
    pub fn set_capture_status(&self, status: impl Into<String>) {
        self.write().capture_status = Some(status.into());
    }

    /// Captures `amount` instead of the order amount on every following capture.
    pub fn set_capture_amount(&self, amount: Money) {
        self.write().capture_amount = Some(amount);
    }

    pub fn order_count(&self) -> usize {
        self.read().orders.len()
    }

    /// Number of orders that have been charged.
    pub fn capture_count(&self) -> usize {
        self.read().captures.len()
    }

    pub fn refund_count(&self) -> usize {
        self.read().orders.values().filter(|o| o.refunded).count()
    }

    /// Returns true if the capture has been refunded.
    pub fn is_refunded(&self, capture_id: &str) -> bool {
        let state = self.read();
        state
            .captures
            .get(capture_id)
            .and_then(|order_id| state.orders.get(order_id))
            .is_some_and(|o| o.refunded)
    }

    /// Returns the amount and currency an order was created with.
    pub fn order(&self, order_id: &str) -> Option<(Money, Currency)> {
        self.read()
            .orders
            .get(order_id)
            .map(|o| (o.amount, o.currency.clone()))
    }
}

#[async_trait]
impl PaymentProcessor for InMemoryPaymentProcessor {
    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<ProcessorOrder, ProcessorError> {
        let mut state = self.write();

        if let Some(kind) = state.fail_next_create.take() {
            return Err(ProcessorError::new(kind, "order creation rejected"));
        }
        if !request.amount.is_positive() {
            return Err(ProcessorError::new(
                ProcessorErrorKind::InvalidRequest,
                format!("amount must be positive, got {}", request.amount),
            ));
        }

        let order_id = state.next_id("ORDER");
        state.orders.insert(
            order_id.clone(),
            OrderEntry {
                amount: request.amount,
                currency: request.currency,
                capture_id: None,
                refunded: false,
            },
        );

        Ok(ProcessorOrder {
            order_id,
            status: "CREATED".to_string(),
        })
    }

    async fn capture_order(&self, order_id: &str) -> Result<ProcessorCapture, ProcessorError> {
        let mut state = self.write();

        if let Some(kind) = state.fail_next_capture.take() {
            return Err(ProcessorError::new(kind, format!("capture of {order_id} failed")));
        }

        let Some(order) = state.orders.get(order_id).cloned() else {
            return Err(ProcessorError::new(ProcessorErrorKind::NotFound, order_id));
        };
        if order.capture_id.is_some() {
            return Err(ProcessorError::new(ProcessorErrorKind::AlreadyCaptured, order_id));
        }

        let status = state
            .capture_status
            .clone()
            .unwrap_or_else(|| "COMPLETED".to_string());
        let amount = state.capture_amount.unwrap_or(order.amount);
        let capture_id = state.next_id("CAPTURE");

        if status.eq_ignore_ascii_case("COMPLETED") {
            state.captures.insert(capture_id.clone(), order_id.to_string());
            if let Some(entry) = state.orders.get_mut(order_id) {
                entry.capture_id = Some(capture_id.clone());
            }
        }

        Ok(ProcessorCapture {
            capture_id,
            status,
            amount,
        })
    }

    async fn refund_capture(&self, capture_id: &str) -> Result<ProcessorRefund, ProcessorError> {
        let mut state = self.write();

        if let Some(kind) = state.fail_next_refund.take() {
            return Err(ProcessorError::new(kind, format!("refund of {capture_id} failed")));
        }

        let Some(order_id) = state.captures.get(capture_id).cloned() else {
            return Err(ProcessorError::new(ProcessorErrorKind::NotFound, capture_id));
        };
        if let Some(entry) = state.orders.get_mut(&order_id) {
            if entry.refunded {
                return Err(ProcessorError::new(
                    ProcessorErrorKind::InvalidRequest,
                    format!("capture {capture_id} already refunded"),
                ));
            }
            entry.refunded = true;
        }
        let refund_id = state.next_id("REFUND");

        Ok(ProcessorRefund {
            refund_id,
            status: "COMPLETED".to_string(),
        })
    }
}
