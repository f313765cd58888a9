use uuid::Uuid;

use gka_domain::order::{GatewayPaymentStatus, OrderStatus, PaymentStatus};

use crate::domain::repository::{OrderRepository, PaymentGateway};
use crate::domain::types::{Order, OrderGuard};
use crate::error::StoreServiceError;

// ── ResolvePayment ───────────────────────────────────────────────────────────

/// Applies a gateway payment status to an order. Shared by the webhook and the
/// polled verify endpoint.
///
/// Only an order whose payment is still `pending` is settled. The write is
/// conditional on the status pair the order was read with and is retried on a
/// fresh read, so duplicate or racing notifications resolve once and never
/// overwrite a concurrent cancellation.
/// The fulfilment status only moves while the order is still `created`; a
/// payment landing on an order the customer already cancelled updates the
/// payment status alone.
pub struct ResolvePaymentUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ResolvePaymentUseCase<O> {
    pub async fn execute(
        &self,
        cashfree_order_id: &str,
        status: &GatewayPaymentStatus,
    ) -> Result<Order, StoreServiceError> {
        let order = self
            .orders
            .find_by_cashfree_id(cashfree_order_id)
            .await?
            .ok_or(StoreServiceError::OrderNotFound)?;
        self.settle(order, status).await
    }

    pub async fn settle(
        &self,
        mut order: Order,
        status: &GatewayPaymentStatus,
    ) -> Result<Order, StoreServiceError> {
        let Some((payment_status, order_status)) = status.settlement() else {
            return Ok(order);
        };
        // Each lost write means the row moved forward, so this terminates.
        loop {
            if order.payment_status != PaymentStatus::Pending {
                return Ok(order);
            }
            let guard = OrderGuard::of(&order);
            let mut updated = order.clone();
            updated.payment_status = payment_status;
            if updated.order_status == OrderStatus::Created {
                let note = match payment_status {
                    PaymentStatus::Paid => "payment received",
                    _ => "payment failed",
                };
                updated.set_status(order_status, Some(note.into()));
            } else {
                updated.updated_at = chrono::Utc::now();
            }

            if self.orders.update_guarded(&updated, guard).await? {
                tracing::info!(
                    order_id = %updated.id,
                    payment_status = %updated.payment_status,
                    order_status = %updated.order_status,
                    "payment settled"
                );
                return Ok(updated);
            }

            tracing::debug!(order_id = %order.id, "order changed during settlement, reloading");
            order = self
                .orders
                .find_by_id(order.id)
                .await?
                .ok_or(StoreServiceError::OrderNotFound)?;
        }
    }
}

// ── VerifyPayment ────────────────────────────────────────────────────────────

/// Customer-triggered poll of the gateway for an order's latest payment.
pub struct VerifyPaymentUseCase<O: OrderRepository, G: PaymentGateway> {
    pub resolve: ResolvePaymentUseCase<O>,
    pub gateway: G,
}

impl<O: OrderRepository, G: PaymentGateway> VerifyPaymentUseCase<O, G> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        cashfree_order_id: &str,
    ) -> Result<Order, StoreServiceError> {
        let order = self
            .resolve
            .orders
            .find_by_cashfree_id(cashfree_order_id)
            .await?
            .filter(|o| o.user_id == user_id)
            .ok_or(StoreServiceError::OrderNotFound)?;
        if order.payment_status != PaymentStatus::Pending {
            return Ok(order);
        }

        let payments = self.gateway.fetch_payments(cashfree_order_id).await?;
        // max_by_key keeps the last of equal keys, i.e. the gateway's latest.
        let Some(latest) = payments.iter().max_by_key(|p| p.payment_time) else {
            return Ok(order);
        };
        let status = GatewayPaymentStatus::parse(&latest.payment_status);
        self.resolve.settle(order, &status).await
    }
}
