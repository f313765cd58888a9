use gka_domain::order::{OrderStatus, PaymentMethod, PaymentStatus};
use gka_store::domain::types::OrderItem;
use gka_store::error::StoreServiceError;
use gka_store::usecase::order::{
    CancelOrderUseCase, CreateOrderInput, CreateOrderUseCase, GetOrderUseCase,
    UpdateOrderStatusInput, UpdateOrderStatusUseCase, cashfree_order_id,
};

use crate::helpers::{
    MockGateway, MockOrderRepo, MockOtpStore, MockUserRepo, test_address, test_items, test_user,
};

fn input(user_id: uuid::Uuid, method: PaymentMethod) -> CreateOrderInput {
    CreateOrderInput {
        user_id,
        shipping: test_address(),
        items: test_items(),
        payment_method: method,
        notes: Some("ring the bell".into()),
        delivery_preference: None,
    }
}

fn usecase(
    user: &gka_store::domain::types::User,
    gateway: MockGateway,
) -> CreateOrderUseCase<MockOrderRepo, MockUserRepo, MockGateway, MockOtpStore> {
    CreateOrderUseCase {
        orders: MockOrderRepo::empty(),
        users: MockUserRepo::new(vec![user.clone()]),
        gateway,
        otp: MockOtpStore::verified(user.id, "9876543210"),
    }
}

// ── CreateOrderUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_confirm_cod_order_immediately() {
    let user = test_user();
    let usecase = usecase(&user, MockGateway::ok());
    let requests = usecase.gateway.requests_handle();

    let order = usecase
        .execute(input(user.id, PaymentMethod::Cod))
        .await
        .unwrap();

    assert_eq!(order.order_status, OrderStatus::Confirmed);
    assert_eq!(order.payment_status, PaymentStatus::Cod);
    let statuses: Vec<_> = order.timeline.iter().map(|e| e.status).collect();
    assert_eq!(statuses, vec![OrderStatus::Created, OrderStatus::Confirmed]);
    assert!(order.cashfree_order_id.is_none());
    assert!(requests.lock().unwrap().is_empty(), "COD must not call the gateway");
    assert_eq!(usecase.orders.orders_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_compute_cod_totals() {
    let user = test_user();
    let order = usecase(&user, MockGateway::ok())
        .execute(input(user.id, PaymentMethod::Cod))
        .await
        .unwrap();

    let t = order.totals;
    assert_eq!(t.subtotal, 548.0);
    assert_eq!(t.shipping_cost, 75.0);
    assert_eq!(t.cod_charges, 25.0);
    assert_eq!(t.total_amount, t.subtotal + t.shipping_cost - t.discount);
}

#[tokio::test]
async fn should_compute_prepaid_totals_without_discount() {
    let user = test_user();
    let order = usecase(&user, MockGateway::ok())
        .execute(input(user.id, PaymentMethod::Cashfree))
        .await
        .unwrap();

    let t = order.totals;
    assert_eq!(t.shipping_cost, 50.0);
    assert_eq!(t.cod_charges, 0.0);
    assert_eq!(t.discount, 0.0);
    assert_eq!(t.total_amount, 598.0);
}

#[tokio::test]
async fn should_open_gateway_session_for_online_order() {
    let user = test_user();
    let usecase = usecase(&user, MockGateway::ok());
    let requests = usecase.gateway.requests_handle();

    let order = usecase
        .execute(input(user.id, PaymentMethod::Cashfree))
        .await
        .unwrap();

    assert_eq!(order.order_status, OrderStatus::Created);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.timeline.len(), 1);
    let expected_id = cashfree_order_id(order.id);
    assert_eq!(order.cashfree_order_id.as_deref(), Some(expected_id.as_str()));
    assert_eq!(
        order.payment_session_id.as_deref(),
        Some(format!("session_{expected_id}").as_str())
    );

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].amount, order.totals.total_amount);
    assert_eq!(requests[0].customer_phone, "9876543210");
    assert_eq!(requests[0].customer_email, user.email);
}

#[tokio::test]
async fn should_persist_nothing_when_gateway_fails() {
    let user = test_user();
    let usecase = usecase(&user, MockGateway::failing());

    let result = usecase.execute(input(user.id, PaymentMethod::Cashfree)).await;

    assert!(
        matches!(result, Err(StoreServiceError::PaymentGateway(_))),
        "expected PaymentGateway, got {result:?}"
    );
    assert!(usecase.orders.orders_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_require_verified_phone() {
    let user = test_user();
    let usecase = CreateOrderUseCase {
        orders: MockOrderRepo::empty(),
        users: MockUserRepo::new(vec![user.clone()]),
        gateway: MockGateway::ok(),
        otp: MockOtpStore::verified(user.id, "9123456789"),
    };

    let result = usecase.execute(input(user.id, PaymentMethod::Cod)).await;

    assert!(matches!(result, Err(StoreServiceError::PhoneNotVerified)));
}

#[tokio::test]
async fn should_reject_missing_items() {
    let user = test_user();
    let result = usecase(&user, MockGateway::ok())
        .execute(CreateOrderInput {
            items: Vec::<OrderItem>::new(),
            ..input(user.id, PaymentMethod::Cod)
        })
        .await;

    assert!(matches!(result, Err(StoreServiceError::MissingField("items"))));
}

#[tokio::test]
async fn should_derive_full_address() {
    let user = test_user();
    let order = usecase(&user, MockGateway::ok())
        .execute(input(user.id, PaymentMethod::Cod))
        .await
        .unwrap();

    assert_eq!(
        order.full_address,
        "12 MG Road, Near City Mall, Pune, Maharashtra - 411001"
    );
}

// ── GetOrderUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_hide_other_users_orders() {
    let user = test_user();
    let create = usecase(&user, MockGateway::ok());
    let order = create
        .execute(input(user.id, PaymentMethod::Cod))
        .await
        .unwrap();

    let get = GetOrderUseCase {
        orders: create.orders.share(),
    };
    assert_eq!(get.execute(user.id, order.id).await.unwrap().id, order.id);
    let result = get.execute(uuid::Uuid::now_v7(), order.id).await;
    assert!(matches!(result, Err(StoreServiceError::OrderNotFound)));
}

// ── CancelOrderUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_cancel_confirmed_order_and_append_timeline() {
    let user = test_user();
    let create = usecase(&user, MockGateway::ok());
    let order = create
        .execute(input(user.id, PaymentMethod::Cod))
        .await
        .unwrap();

    let cancel = CancelOrderUseCase {
        orders: create.orders.share(),
    };
    let cancelled = cancel.execute(user.id, order.id).await.unwrap();

    assert_eq!(cancelled.order_status, OrderStatus::Cancelled);
    assert_eq!(cancelled.timeline.len(), 3);
    let stored = create.orders.orders_handle().lock().unwrap()[0].clone();
    assert_eq!(stored.order_status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn should_not_cancel_processing_order() {
    let user = test_user();
    let create = usecase(&user, MockGateway::ok());
    let order = create
        .execute(input(user.id, PaymentMethod::Cod))
        .await
        .unwrap();
    UpdateOrderStatusUseCase {
        orders: create.orders.share(),
    }
    .execute(UpdateOrderStatusInput {
        order_id: order.id,
        status: OrderStatus::Processing,
        note: None,
    })
    .await
    .unwrap();

    let result = CancelOrderUseCase {
        orders: create.orders.share(),
    }
    .execute(user.id, order.id)
    .await;

    assert!(
        matches!(
            result,
            Err(StoreServiceError::InvalidStatusTransition {
                from: OrderStatus::Processing,
                to: OrderStatus::Cancelled
            })
        ),
        "got {result:?}"
    );
}

// ── UpdateOrderStatusUseCase ─────────────────────────────────────────────────

#[tokio::test]
async fn should_walk_forward_chain_with_notes() {
    let user = test_user();
    let create = usecase(&user, MockGateway::ok());
    let order = create
        .execute(input(user.id, PaymentMethod::Cod))
        .await
        .unwrap();
    let update = UpdateOrderStatusUseCase {
        orders: create.orders.share(),
    };

    for status in [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        update
            .execute(UpdateOrderStatusInput {
                order_id: order.id,
                status,
                note: Some(format!("moved to {status}")),
            })
            .await
            .unwrap();
    }

    let stored = create.orders.orders_handle().lock().unwrap()[0].clone();
    assert_eq!(stored.order_status, OrderStatus::Delivered);
    assert_eq!(stored.timeline.len(), 5);
    assert_eq!(
        stored.timeline.last().unwrap().note.as_deref(),
        Some("moved to delivered")
    );
}

#[tokio::test]
async fn should_reject_skipping_statuses() {
    let user = test_user();
    let create = usecase(&user, MockGateway::ok());
    let order = create
        .execute(input(user.id, PaymentMethod::Cod))
        .await
        .unwrap();

    let result = UpdateOrderStatusUseCase {
        orders: create.orders.share(),
    }
    .execute(UpdateOrderStatusInput {
        order_id: order.id,
        status: OrderStatus::Delivered,
        note: None,
    })
    .await;

    assert!(matches!(
        result,
        Err(StoreServiceError::InvalidStatusTransition { .. })
    ));
    assert_eq!(create.orders.write_count(), 0);
}
