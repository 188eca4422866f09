//! Scenario: an order walks its lifecycle through the admin workflow.
//!
//! GREEN when:
//! - Placed → Processing is applied and persisted,
//! - repeating Processing is accepted as a no-op with no write,
//! - a stale client asking Placed → Delivered on a fresh order is refused
//!   with the sequence in the message and Processing as the allowed next step,
//! - concurrent advances of the same order apply exactly once.

use std::sync::{Arc, Barrier};
use std::thread;

use wst_cart::{checkout, Cart, DiscountPolicy, ProductRef};
use wst_lifecycle::OrderStatus;
use wst_schemas::{Cents, OrderDraft};
use wst_store::{AdminError, ListParams, MemoryOrderStore, OrderAdmin, PaginationLimits, StatusUpdate};

fn admin() -> OrderAdmin {
    OrderAdmin::new(Arc::new(MemoryOrderStore::new()), PaginationLimits::default())
}

fn placed_draft() -> OrderDraft {
    let mut cart = Cart::new();
    cart.add(ProductRef::new("3", "Kingfisher Print", Cents::new(4200)))
        .unwrap();
    let quote = DiscountPolicy::default().quote(None, cart.total_price);
    checkout(&cart, &quote, Some("birder@example.com")).unwrap()
}

#[test]
fn scenario_end_to_end_lifecycle() {
    let a = admin();
    let order = a.place_order(placed_draft()).unwrap();
    assert_eq!(order.status, OrderStatus::Placed);

    // Placed -> Processing: applied.
    let up = a.update_status(order.id, "Processing").unwrap();
    match &up {
        StatusUpdate::Applied { order: o, from, .. } => {
            assert_eq!(*from, OrderStatus::Placed);
            assert_eq!(o.status, OrderStatus::Processing);
            assert_eq!(o.version, 2);
        }
        other => panic!("expected Applied, got {other:?}"),
    }
    assert_eq!(a.get(order.id).unwrap().status, OrderStatus::Processing);

    // Repeat: no-op, unchanged.
    let again = a.update_status(order.id, "Processing").unwrap();
    assert!(matches!(again, StatusUpdate::NoOp { .. }));
    let stored = a.get(order.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Processing);
    assert_eq!(stored.version, 2, "no-op must not write");

    // Stale client on a separate, fresh order.
    let fresh = a.place_order(placed_draft()).unwrap();
    match a.update_status(fresh.id, "Delivered").unwrap() {
        StatusUpdate::Rejected {
            message,
            current_status,
            allowed_next_status,
        } => {
            assert!(
                message.contains("Must follow sequence: Placed → Processing → Delivered"),
                "{message}"
            );
            assert_eq!(current_status, OrderStatus::Placed);
            assert_eq!(allowed_next_status, Some(OrderStatus::Processing));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
    assert_eq!(a.get(fresh.id).unwrap().status, OrderStatus::Placed);
}

#[test]
fn scenario_unknown_requested_status_is_refused() {
    let a = admin();
    let order = a.place_order(placed_draft()).unwrap();
    let up = a.update_status(order.id, "Cancelled").unwrap();
    assert!(!up.is_accepted());
    assert_eq!(up.message(), "New status \"Cancelled\" is not valid.");
}

#[test]
fn scenario_concurrent_advances_apply_once() {
    let a = admin();
    let order = a.place_order(placed_draft()).unwrap();

    let n = 8;
    let barrier = Arc::new(Barrier::new(n));
    let handles: Vec<_> = (0..n)
        .map(|_| {
            let a = a.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                a.update_status(order.id, "Processing")
            })
        })
        .collect();

    let mut applied = 0;
    for h in handles {
        match h.join().unwrap() {
            Ok(StatusUpdate::Applied { .. }) => applied += 1,
            Ok(StatusUpdate::NoOp { .. }) => {}
            Err(AdminError::Conflict { current_status, .. }) => {
                assert_eq!(current_status, OrderStatus::Processing);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
    assert_eq!(applied, 1);
    let stored = a.get(order.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Processing);
    assert_eq!(stored.version, 2);
}

#[test]
fn scenario_dashboard_listing_and_stats() {
    let a = admin();
    let first = a.place_order(placed_draft()).unwrap();
    a.place_order(placed_draft()).unwrap();
    a.update_status(first.id, "Processing").unwrap();

    let processing = a
        .list(&ListParams {
            status: Some("Processing".into()),
            ..ListParams::default()
        })
        .unwrap();
    assert_eq!(processing.orders.len(), 1);
    assert_eq!(processing.orders[0].id, first.id);

    let stats = a.stats().unwrap();
    assert_eq!(stats.total.total_orders, 2);
    assert_eq!(stats.total.total_revenue, Cents::new(8400));

    let mine = a.orders_for_email("BIRDER@example.com").unwrap();
    assert_eq!(mine.len(), 2);
}
