//! Order placement: partitioning, payment compensation, cart drain semantics

mod common;

use std::sync::Arc;

use common::{test_db, ScriptedGateway};
use mandi_server::db::models::{
    CartItemCreate, NotificationType, OrderStatus, PaymentMethodType, PaymentStatus,
};
use mandi_server::db::repository::{
    CartRepository, NotificationRepository, OrderRepository, PaymentRepository,
};
use mandi_server::orders::{
    CheckoutInfo, FulfillmentService, OrderError, OrderPlacementService,
};
use mandi_server::payment::PaymentService;

const BUYER: &str = "customer-1";
const RETAILER_A: &str = "retailer-a";
const RETAILER_B: &str = "retailer-b";

fn checkout_info() -> CheckoutInfo {
    CheckoutInfo {
        delivery_address: "12 MG Road, Bengaluru, KA 560001".to_string(),
        delivery_latitude: Some(12.9716),
        delivery_longitude: Some(77.5946),
        notes: Some("Leave at the door".to_string()),
        payment_method: PaymentMethodType::Card,
    }
}

fn cart_line(seller: &str, product: &str, qty: i64, price: f64) -> CartItemCreate {
    CartItemCreate {
        buyer_id: BUYER.to_string(),
        seller_id: seller.to_string(),
        product_id: product.to_string(),
        product_name: format!("Product {}", product),
        quantity: qty,
        unit_price: price,
    }
}

fn placement(
    db: &surrealdb::Surreal<surrealdb::engine::local::Db>,
    gateway: ScriptedGateway,
) -> OrderPlacementService {
    let payments = PaymentService::new(db.clone(), Arc::new(gateway));
    OrderPlacementService::new(db.clone(), payments)
}

#[tokio::test]
async fn test_cart_partitions_into_one_order_per_seller() {
    let (db, _tmp) = test_db().await;
    let cart = CartRepository::new(db.clone());
    cart.add(cart_line(RETAILER_A, "p1", 2, 100.0)).await.unwrap();
    cart.add(cart_line(RETAILER_B, "p2", 1, 50.0)).await.unwrap();

    let service = placement(&db, ScriptedGateway::always(true));
    let order_ids = service.checkout(BUYER, &checkout_info()).await.unwrap();
    assert_eq!(order_ids.len(), 2);

    let orders = OrderRepository::new(db.clone());
    let placed = orders.find_by_buyer(BUYER).await.unwrap();
    assert_eq!(placed.len(), 2);

    // Each order holds only its seller's items; totals add up to the cart total
    let mut grand_total = 0.0;
    for order in &placed {
        assert_eq!(order.status, OrderStatus::Pending);
        let items = orders.find_items(&order.order_id).await.unwrap();
        assert!(!items.is_empty());
        let expected_total: f64 = items.iter().map(|i| i.subtotal).sum();
        assert_eq!(order.total_amount, expected_total);
        match order.seller_id.as_str() {
            RETAILER_A => {
                assert_eq!(items.len(), 1);
                assert_eq!(order.total_amount, 200.0);
            }
            RETAILER_B => {
                assert_eq!(items.len(), 1);
                assert_eq!(order.total_amount, 50.0);
            }
            other => panic!("unexpected seller {}", other),
        }
        grand_total += order.total_amount;
    }
    assert_eq!(grand_total, 250.0);

    // Cart fully drained
    assert!(cart.list_by_buyer(BUYER).await.unwrap().is_empty());

    // One completed transaction and one order_placed notification per partition
    let payments = PaymentRepository::new(db.clone());
    for order in &placed {
        let txns = payments.find_by_order(&order.order_id).await.unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].status, PaymentStatus::Completed);
        assert!(txns[0].completed_at.is_some());
    }

    let notifications = NotificationRepository::new(db.clone());
    let inbox = notifications.list_by_user(BUYER).await.unwrap();
    let placed_count = inbox
        .iter()
        .filter(|n| n.kind == NotificationType::OrderPlaced)
        .count();
    let paid_count = inbox
        .iter()
        .filter(|n| n.kind == NotificationType::PaymentSuccess)
        .count();
    assert_eq!(placed_count, 2);
    assert_eq!(paid_count, 2);
}

#[tokio::test]
async fn test_payment_failure_compensates_and_aborts_remaining_partitions() {
    let (db, _tmp) = test_db().await;
    let cart = CartRepository::new(db.clone());
    cart.add(cart_line(RETAILER_A, "p1", 2, 100.0)).await.unwrap();
    cart.add(cart_line(RETAILER_B, "p2", 1, 50.0)).await.unwrap();

    // Partitions run in seller order: retailer-a succeeds, retailer-b declines
    let service = placement(&db, ScriptedGateway::new(&[true, false]));
    let err = service.checkout(BUYER, &checkout_info()).await.unwrap_err();
    assert!(matches!(err, OrderError::PaymentDeclined(_)));

    let orders = OrderRepository::new(db.clone());
    let placed = orders.find_by_buyer(BUYER).await.unwrap();

    // Partition A committed with its charge; partition B fully compensated
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].seller_id, RETAILER_A);
    assert_eq!(placed[0].total_amount, 200.0);
    let items = orders.find_items(&placed[0].order_id).await.unwrap();
    assert_eq!(items.len(), 1);

    let payments = PaymentRepository::new(db.clone());
    let txns_a = payments.find_by_order(&placed[0].order_id).await.unwrap();
    assert_eq!(txns_a.len(), 1);
    assert_eq!(txns_a[0].status, PaymentStatus::Completed);
    assert_eq!(txns_a[0].amount, 200.0);

    // The failed charge leaves its transaction row (and nothing else)
    let mut res = db
        .query("SELECT * FROM payment_transaction WHERE status = 'failed'")
        .await
        .unwrap();
    let failed: Vec<serde_json::Value> = res.take(0).unwrap();
    assert_eq!(failed.len(), 1);

    // Total placement failed, so the cart is untouched
    assert_eq!(cart.list_by_buyer(BUYER).await.unwrap().len(), 2);

    let notifications = NotificationRepository::new(db.clone());
    let inbox = notifications.list_by_user(BUYER).await.unwrap();
    assert!(inbox.iter().any(|n| n.kind == NotificationType::PaymentSuccess));
    assert!(inbox.iter().any(|n| n.kind == NotificationType::PaymentFailed));
}

#[tokio::test]
async fn test_empty_cart_is_rejected_before_any_write() {
    let (db, _tmp) = test_db().await;
    let service = placement(&db, ScriptedGateway::always(true));

    let err = service.checkout(BUYER, &checkout_info()).await.unwrap_err();
    assert!(matches!(err, OrderError::Validation(_)));

    let orders = OrderRepository::new(db.clone());
    assert!(orders.find_by_buyer(BUYER).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_first_partition_decline_leaves_no_orders() {
    let (db, _tmp) = test_db().await;
    let cart = CartRepository::new(db.clone());
    cart.add(cart_line(RETAILER_A, "p1", 1, 75.0)).await.unwrap();
    cart.add(cart_line(RETAILER_B, "p2", 1, 25.0)).await.unwrap();

    let service = placement(&db, ScriptedGateway::always(false));
    let err = service.checkout(BUYER, &checkout_info()).await.unwrap_err();
    assert!(matches!(err, OrderError::PaymentDeclined(_)));

    let orders = OrderRepository::new(db.clone());
    assert!(orders.find_by_buyer(BUYER).await.unwrap().is_empty());
    // 购物车原样保留
    assert_eq!(cart.list_by_buyer(BUYER).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_seller_decides_pending_customer_orders() {
    let (db, _tmp) = test_db().await;
    let cart = CartRepository::new(db.clone());
    cart.add(cart_line(RETAILER_A, "p1", 1, 40.0)).await.unwrap();
    cart.add(cart_line(RETAILER_B, "p2", 1, 60.0)).await.unwrap();

    let service = placement(&db, ScriptedGateway::always(true));
    service.checkout(BUYER, &checkout_info()).await.unwrap();

    let orders = OrderRepository::new(db.clone());
    let placed = orders.find_by_buyer(BUYER).await.unwrap();
    let order_a = placed.iter().find(|o| o.seller_id == RETAILER_A).unwrap();
    let order_b = placed.iter().find(|o| o.seller_id == RETAILER_B).unwrap();

    let fulfillment = FulfillmentService::new(db.clone());

    // Wrong seller cannot see the order
    let err = fulfillment.confirm(&order_a.order_id, RETAILER_B).await.unwrap_err();
    assert!(matches!(err, OrderError::NotFound(_)));

    fulfillment.confirm(&order_a.order_id, RETAILER_A).await.unwrap();
    fulfillment.cancel(&order_b.order_id, RETAILER_B).await.unwrap();

    let confirmed = orders.find_by_id(&order_a.order_id).await.unwrap().unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
    let cancelled = orders.find_by_id(&order_b.order_id).await.unwrap().unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    // Both terminal decisions refuse a second decision
    let err = fulfillment.confirm(&order_a.order_id, RETAILER_A).await.unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition { .. }));
    let err = fulfillment.cancel(&order_b.order_id, RETAILER_B).await.unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_invalid_cart_line_fails_validation() {
    let (db, _tmp) = test_db().await;
    let cart = CartRepository::new(db.clone());
    // 直接写入一条非法行，模拟脏数据
    cart.add(CartItemCreate {
        buyer_id: BUYER.to_string(),
        seller_id: RETAILER_A.to_string(),
        product_id: "p1".to_string(),
        product_name: "Broken".to_string(),
        quantity: -3,
        unit_price: 10.0,
    })
    .await
    .unwrap();

    let service = placement(&db, ScriptedGateway::always(true));
    let err = service.checkout(BUYER, &checkout_info()).await.unwrap_err();
    assert!(matches!(err, OrderError::Validation(_)));
}
