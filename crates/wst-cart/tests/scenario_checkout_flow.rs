//! Scenario: browse → cart → coupon → checkout.
//!
//! GREEN when:
//! - cart totals track every add/update/remove,
//! - SAVE10 reduces the charged total and is recorded on the draft,
//! - the cart serialises in the shape the storefront templates read.

use wst_cart::{checkout, Cart, DiscountPolicy, ProductRef};
use wst_schemas::Cents;

#[test]
fn scenario_cart_to_discounted_order() {
    let lynx = ProductRef::new("11", "Lynx Plush", Cents::new(1999));
    let otter = ProductRef::new("12", "Otter Socks", Cents::new(650));

    let mut cart = Cart::new();
    cart.add(lynx.clone()).unwrap();
    cart.add(otter.clone()).unwrap();
    cart.add(otter).unwrap();
    assert_eq!(cart.total_qty, 3);
    assert_eq!(cart.total_price, Cents::new(3299));

    cart.update("11", 2).unwrap();
    assert_eq!(cart.total_price, Cents::new(5298));

    let policy = DiscountPolicy::default();
    let quote = policy.quote(Some("save10"), cart.total_price);
    assert!(quote.is_applied());

    let draft = checkout(&cart, &quote, Some("Lynx.Fan@Example.com")).unwrap();
    // 10% of 52.98 = 5.298 -> 5.30
    assert_eq!(draft.discount.as_ref().unwrap().amount, Cents::new(530));
    assert_eq!(draft.total_price, Cents::new(4768));
    assert_eq!(draft.total_qty, 4);
    assert_eq!(draft.customer_email.as_deref(), Some("Lynx.Fan@Example.com"));

    // Cart is cleared after a successful checkout.
    cart.clear();
    assert!(cart.is_empty());
}

#[test]
fn scenario_cart_wire_shape() {
    let mut cart = Cart::new();
    cart.add(ProductRef::new("5", "Puffin Pin", Cents::new(300))).unwrap();

    let v = serde_json::to_value(&cart).unwrap();
    assert_eq!(v["totalQty"], 1);
    assert_eq!(v["totalPrice"], 300);
    assert_eq!(v["items"]["5"]["qty"], 1);
    assert_eq!(v["items"]["5"]["lineTotal"], 300);
    assert_eq!(v["items"]["5"]["product"]["image"], "/images/square.png");
}
