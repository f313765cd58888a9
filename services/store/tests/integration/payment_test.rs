use gka_domain::order::{GatewayPaymentStatus, OrderStatus, PaymentMethod, PaymentStatus};
use gka_store::domain::types::Order;
use gka_store::error::StoreServiceError;
use gka_store::usecase::order::{
    CancelOrderUseCase, CreateOrderInput, CreateOrderUseCase,
};
use gka_store::usecase::payment::{ResolvePaymentUseCase, VerifyPaymentUseCase};

use crate::helpers::{
    MockGateway, MockOrderRepo, MockOtpStore, MockUserRepo, payment, test_address, test_items,
    test_user,
};

/// A user plus one pending online order, and the repo holding it.
async fn pending_order() -> (uuid::Uuid, Order, MockOrderRepo) {
    let user = test_user();
    let create = CreateOrderUseCase {
        orders: MockOrderRepo::empty(),
        users: MockUserRepo::new(vec![user.clone()]),
        gateway: MockGateway::ok(),
        otp: MockOtpStore::verified(user.id, "9876543210"),
    };
    let order = create
        .execute(CreateOrderInput {
            user_id: user.id,
            shipping: test_address(),
            items: test_items(),
            payment_method: PaymentMethod::Cashfree,
            notes: None,
            delivery_preference: None,
        })
        .await
        .unwrap();
    (user.id, order, create.orders)
}

fn cf_id(order: &Order) -> String {
    order.cashfree_order_id.clone().unwrap()
}

// ── ResolvePaymentUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_mark_paid_and_confirmed_on_success() {
    let (_, order, orders) = pending_order().await;
    let resolve = ResolvePaymentUseCase {
        orders: orders.share(),
    };

    let settled = resolve
        .execute(&cf_id(&order), &GatewayPaymentStatus::parse("SUCCESS"))
        .await
        .unwrap();

    assert_eq!(settled.payment_status, PaymentStatus::Paid);
    assert_eq!(settled.order_status, OrderStatus::Confirmed);
    let stored = orders.orders_handle().lock().unwrap()[0].clone();
    assert_eq!(stored.payment_status, PaymentStatus::Paid);
    assert_eq!(stored.order_status, OrderStatus::Confirmed);
    assert_eq!(stored.timeline.len(), 2);
}

#[tokio::test]
async fn should_mark_failed_and_cancelled_on_failure() {
    let (_, order, orders) = pending_order().await;
    let settled = ResolvePaymentUseCase {
        orders: orders.share(),
    }
    .execute(&cf_id(&order), &GatewayPaymentStatus::parse("FAILED"))
    .await
    .unwrap();

    assert_eq!(settled.payment_status, PaymentStatus::Failed);
    assert_eq!(settled.order_status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn should_ignore_non_terminal_status() {
    let (_, order, orders) = pending_order().await;
    let settled = ResolvePaymentUseCase {
        orders: orders.share(),
    }
    .execute(&cf_id(&order), &GatewayPaymentStatus::parse("USER_DROPPED"))
    .await
    .unwrap();

    assert_eq!(settled.payment_status, PaymentStatus::Pending);
    assert_eq!(settled.order_status, OrderStatus::Created);
    assert_eq!(orders.write_count(), 0);
}

#[tokio::test]
async fn should_settle_duplicate_webhook_once() {
    let (_, order, orders) = pending_order().await;
    let resolve = ResolvePaymentUseCase {
        orders: orders.share(),
    };
    let success = GatewayPaymentStatus::parse("SUCCESS");

    resolve.execute(&cf_id(&order), &success).await.unwrap();
    let again = resolve.execute(&cf_id(&order), &success).await.unwrap();

    assert_eq!(again.payment_status, PaymentStatus::Paid);
    assert_eq!(again.timeline.len(), 2, "duplicate must not append to the timeline");
    assert_eq!(orders.write_count(), 1);
}

#[tokio::test]
async fn should_let_first_settlement_win_a_race() {
    let (_, order, orders) = pending_order().await;
    // Both requests loaded the order while it was still pending.
    let stale = order.clone();
    let webhook = ResolvePaymentUseCase {
        orders: orders.share(),
    };
    let poll = ResolvePaymentUseCase {
        orders: orders.share(),
    };

    webhook
        .settle(order, &GatewayPaymentStatus::Success)
        .await
        .unwrap();
    let loser = poll
        .settle(stale, &GatewayPaymentStatus::Failed)
        .await
        .unwrap();

    assert_eq!(loser.payment_status, PaymentStatus::Paid);
    assert_eq!(loser.order_status, OrderStatus::Confirmed);
    assert_eq!(orders.write_count(), 1);
}

#[tokio::test]
async fn should_not_revive_cancelled_order_on_late_payment() {
    let (user_id, order, orders) = pending_order().await;
    CancelOrderUseCase {
        orders: orders.share(),
    }
    .execute(user_id, order.id)
    .await
    .unwrap();

    let settled = ResolvePaymentUseCase {
        orders: orders.share(),
    }
    .execute(&cf_id(&order), &GatewayPaymentStatus::Success)
    .await
    .unwrap();

    assert_eq!(settled.payment_status, PaymentStatus::Paid);
    assert_eq!(settled.order_status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn should_keep_cancellation_made_after_settlement_read() {
    let (user_id, order, orders) = pending_order().await;
    // The webhook loaded the order before the customer cancelled it.
    let stale = order.clone();
    CancelOrderUseCase {
        orders: orders.share(),
    }
    .execute(user_id, order.id)
    .await
    .unwrap();

    let settled = ResolvePaymentUseCase {
        orders: orders.share(),
    }
    .settle(stale, &GatewayPaymentStatus::Success)
    .await
    .unwrap();

    assert_eq!(settled.payment_status, PaymentStatus::Paid);
    assert_eq!(settled.order_status, OrderStatus::Cancelled);
    let stored = orders.orders_handle().lock().unwrap()[0].clone();
    assert_eq!(stored.order_status, OrderStatus::Cancelled);
    assert_eq!(stored.payment_status, PaymentStatus::Paid);
    assert_eq!(stored.timeline.len(), 2);
    assert_eq!(
        stored.timeline[1].note.as_deref(),
        Some("cancelled by customer")
    );
    assert_eq!(orders.write_count(), 2);
}

#[tokio::test]
async fn should_record_failed_payment_on_order_cancelled_mid_settlement() {
    let (user_id, order, orders) = pending_order().await;
    let stale = order.clone();
    CancelOrderUseCase {
        orders: orders.share(),
    }
    .execute(user_id, order.id)
    .await
    .unwrap();

    let settled = ResolvePaymentUseCase {
        orders: orders.share(),
    }
    .settle(stale, &GatewayPaymentStatus::Failed)
    .await
    .unwrap();

    assert_eq!(settled.payment_status, PaymentStatus::Failed);
    assert_eq!(settled.order_status, OrderStatus::Cancelled);
    let stored = orders.orders_handle().lock().unwrap()[0].clone();
    assert_eq!(stored.timeline.len(), 2);
    assert_eq!(stored.timeline[1].status, OrderStatus::Cancelled);
    assert_eq!(
        stored.timeline[1].note.as_deref(),
        Some("cancelled by customer")
    );
}

#[tokio::test]
async fn should_reject_cancel_after_order_moved_on() {
    let (user_id, order, orders) = pending_order().await;
    ResolvePaymentUseCase {
        orders: orders.share(),
    }
    .settle(order.clone(), &GatewayPaymentStatus::Success)
    .await
    .unwrap();
    orders.orders_handle().lock().unwrap()[0].order_status = OrderStatus::Processing;

    let result = CancelOrderUseCase {
        orders: orders.share(),
    }
    .execute(user_id, order.id)
    .await;

    assert!(matches!(
        result,
        Err(StoreServiceError::InvalidStatusTransition {
            from: OrderStatus::Processing,
            to: OrderStatus::Cancelled,
        })
    ));
}

#[tokio::test]
async fn should_return_not_found_for_unknown_gateway_order() {
    let (_, _, orders) = pending_order().await;
    let result = ResolvePaymentUseCase { orders }
        .execute("order_unknown", &GatewayPaymentStatus::Success)
        .await;

    assert!(matches!(result, Err(StoreServiceError::OrderNotFound)));
}

// ── VerifyPaymentUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_apply_latest_gateway_payment() {
    let (user_id, order, orders) = pending_order().await;
    let verify = VerifyPaymentUseCase {
        resolve: ResolvePaymentUseCase {
            orders: orders.share(),
        },
        gateway: MockGateway::with_payments(vec![
            payment("SUCCESS", 1),
            payment("FAILED", 10),
        ]),
    };

    let settled = verify.execute(user_id, &cf_id(&order)).await.unwrap();

    assert_eq!(settled.payment_status, PaymentStatus::Paid);
    assert_eq!(settled.order_status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn should_leave_order_pending_without_payments() {
    let (user_id, order, orders) = pending_order().await;
    let verify = VerifyPaymentUseCase {
        resolve: ResolvePaymentUseCase {
            orders: orders.share(),
        },
        gateway: MockGateway::ok(),
    };

    let unchanged = verify.execute(user_id, &cf_id(&order)).await.unwrap();

    assert_eq!(unchanged.payment_status, PaymentStatus::Pending);
    assert_eq!(orders.write_count(), 0);
}

#[tokio::test]
async fn should_hide_other_users_payment_status() {
    let (_, order, orders) = pending_order().await;
    let verify = VerifyPaymentUseCase {
        resolve: ResolvePaymentUseCase { orders },
        gateway: MockGateway::with_payments(vec![payment("SUCCESS", 1)]),
    };

    let result = verify.execute(uuid::Uuid::now_v7(), &cf_id(&order)).await;

    assert!(matches!(result, Err(StoreServiceError::OrderNotFound)));
}

#[tokio::test]
async fn should_surface_gateway_error_on_verify() {
    let (user_id, order, orders) = pending_order().await;
    let verify = VerifyPaymentUseCase {
        resolve: ResolvePaymentUseCase { orders },
        gateway: MockGateway::failing(),
    };

    let result = verify.execute(user_id, &cf_id(&order)).await;

    assert!(matches!(result, Err(StoreServiceError::PaymentGateway(_))));
}
