//! Adapter from the processor port to the engine's payment interface.

use common::{Currency, Money, PaymentStatus};

use crate::error::{PaymentError, Result};
use crate::processor::{CreateOrderRequest, PaymentProcessor, ProcessorError, ProcessorErrorKind};

/// Result of capturing a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub amount: Money,
}

/// Result of refunding a captured payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundResult {
    pub refund_id: String,
    pub status: PaymentStatus,
}

/// Thin translation layer over a [`PaymentProcessor`].
///
/// Performs no business validation. Stateless apart from the processor
/// client it owns, so it can be shared across concurrent callers.
#[derive(Debug, Clone)]
pub struct PaymentGateway<P> {
    processor: P,
}

impl<P: PaymentProcessor> PaymentGateway<P> {
    pub fn new(processor: P) -> Self {
        Self { processor }
    }

    /// Returns a reference to the underlying processor client.
    pub fn processor(&self) -> &P {
        &self.processor
    }

    /// Opens a payment order and returns the processor's order id.
    #[tracing::instrument(skip_all, fields(%amount, %currency))]
    pub async fn create_payment(
        &self,
        amount: Money,
        currency: &Currency,
        description: &str,
    ) -> Result<String> {
        let order = self
            .processor
            .create_order(CreateOrderRequest {
                amount,
                currency: currency.clone(),
                description: description.to_string(),
            })
            .await
            .map_err(|e| translate("create", e))?;

        metrics::counter!("payments_created_total").increment(1);
        tracing::debug!(order_id = %order.order_id, status = %order.status, "payment order created");
        Ok(order.order_id)
    }

    /// Captures an approved order.
    ///
    /// A second capture of the same order never charges again; it fails with
    /// [`PaymentError::AlreadyCaptured`].
    #[tracing::instrument(skip(self))]
    pub async fn capture_payment(&self, order_id: &str) -> Result<CaptureResult> {
        let capture = self
            .processor
            .capture_order(order_id)
            .await
            .map_err(|e| translate("capture", e))?;

        let status = normalize_status(&capture.status)?;
        metrics::counter!("payments_captured_total", "status" => status.as_str()).increment(1);
        tracing::info!(
            order_id,
            transaction_id = %capture.capture_id,
            %status,
            "payment captured"
        );

        Ok(CaptureResult {
            transaction_id: capture.capture_id,
            status,
            amount: capture.amount,
        })
    }

    /// Refunds a capture in full.
    #[tracing::instrument(skip(self))]
    pub async fn refund_payment(&self, transaction_id: &str) -> Result<RefundResult> {
        let refund = self
            .processor
            .refund_capture(transaction_id)
            .await
            .map_err(|e| translate("refund", e))?;

        // A completed refund is reported as COMPLETED on the refund object.
        let status = match normalize_status(&refund.status)? {
            PaymentStatus::Completed => PaymentStatus::Refunded,
            other => other,
        };
        metrics::counter!("payment_refunds_total").increment(1);
        tracing::info!(transaction_id, refund_id = %refund.refund_id, %status, "payment refunded");

        Ok(RefundResult {
            refund_id: refund.refund_id,
            status,
        })
    }
}

/// Maps the processor's status vocabulary onto [`PaymentStatus`].
pub fn normalize_status(raw: &str) -> Result<PaymentStatus> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "COMPLETED" => Ok(PaymentStatus::Completed),
        "CREATED" | "SAVED" | "APPROVED" | "PENDING" | "PAYER_ACTION_REQUIRED" => {
            Ok(PaymentStatus::Pending)
        }
        "DECLINED" | "DENIED" | "FAILED" | "VOIDED" => Ok(PaymentStatus::Failed),
        "REFUNDED" | "PARTIALLY_REFUNDED" => Ok(PaymentStatus::Refunded),
        _ => Err(PaymentError::Gateway {
            detail: format!("unrecognised processor status {raw:?}"),
            retryable: false,
        }),
    }
}

fn translate(operation: &'static str, error: ProcessorError) -> PaymentError {
    metrics::counter!("payment_failures_total", "kind" => error.kind.as_str()).increment(1);
    tracing::warn!(operation, kind = error.kind.as_str(), message = %error.message, "payment processor error");

    match error.kind {
        ProcessorErrorKind::NotFound => PaymentError::NotFound(error.message),
        ProcessorErrorKind::AlreadyCaptured => PaymentError::AlreadyCaptured(error.message),
        ProcessorErrorKind::Transport | ProcessorErrorKind::Timeout => PaymentError::Gateway {
            detail: format!("{operation} failed: {error}"),
            retryable: true,
        },
        ProcessorErrorKind::Misconfigured
        | ProcessorErrorKind::InvalidRequest
        | ProcessorErrorKind::Declined => PaymentError::Gateway {
            detail: format!("{operation} failed: {error}"),
            retryable: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_known_statuses() {
        assert_eq!(normalize_status("COMPLETED").unwrap(), PaymentStatus::Completed);
        assert_eq!(normalize_status("completed").unwrap(), PaymentStatus::Completed);
        assert_eq!(normalize_status("CREATED").unwrap(), PaymentStatus::Pending);
        assert_eq!(normalize_status("PAYER_ACTION_REQUIRED").unwrap(), PaymentStatus::Pending);
        assert_eq!(normalize_status("DECLINED").unwrap(), PaymentStatus::Failed);
        assert_eq!(normalize_status("VOIDED").unwrap(), PaymentStatus::Failed);
        assert_eq!(normalize_status("PARTIALLY_REFUNDED").unwrap(), PaymentStatus::Refunded);
    }

    #[test]
    fn test_normalize_unknown_status_is_not_retryable() {
        let err = normalize_status("ON_HOLD").unwrap_err();
        assert!(matches!(err, PaymentError::Gateway { retryable: false, .. }));
    }

    #[test]
    fn test_translate_classification() {
        let cases = [
            (ProcessorErrorKind::Transport, true),
            (ProcessorErrorKind::Timeout, true),
            (ProcessorErrorKind::Misconfigured, false),
            (ProcessorErrorKind::InvalidRequest, false),
            (ProcessorErrorKind::Declined, false),
        ];
        for (kind, retryable) in cases {
            let err = translate("capture", ProcessorError::new(kind, "boom"));
            assert!(matches!(err, PaymentError::Gateway { .. }));
            assert_eq!(err.is_retryable(), retryable, "{kind:?}");
        }
    }

    #[test]
    fn test_translate_not_found_and_already_captured() {
        let err = translate("capture", ProcessorError::new(ProcessorErrorKind::NotFound, "ORDER-9"));
        assert!(matches!(err, PaymentError::NotFound(id) if id == "ORDER-9"));

        let err = translate(
            "capture",
            ProcessorError::new(ProcessorErrorKind::AlreadyCaptured, "ORDER-1"),
        );
        assert!(matches!(err, PaymentError::AlreadyCaptured(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_gateway_detail_carries_processor_message() {
        let err = translate(
            "create",
            ProcessorError::new(ProcessorErrorKind::Misconfigured, "invalid client id"),
        );
        assert!(err.to_string().contains("invalid client id"));
    }
}
