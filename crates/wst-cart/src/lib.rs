//! wst-cart
//!
//! Cart arithmetic, coupon discounts, and checkout into an [`OrderDraft`].
//!
//! The cart is a plain value: where it lives between requests (cookie,
//! session store, client) is the caller's business. Totals are always
//! recomputed from the lines, never patched incrementally.
//!
//! [`OrderDraft`]: wst_schemas::OrderDraft

mod cart;
mod checkout;
mod discount;

pub use cart::{Cart, CartError, CartLine, ProductRef, DEFAULT_PRODUCT_IMAGE};
pub use checkout::{checkout, CheckoutError};
pub use discount::{DiscountPolicy, DiscountQuote};
