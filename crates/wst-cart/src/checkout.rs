use std::fmt;

use wst_schemas::{OrderDraft, OrderItem};

use crate::{Cart, DiscountQuote};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    EmptyCart,
    /// The quote was priced against a different subtotal than the cart holds.
    StaleQuote,
}

impl fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutError::EmptyCart => f.write_str("cart is empty"),
            CheckoutError::StaleQuote => f.write_str("discount quote does not match cart total"),
        }
    }
}

impl std::error::Error for CheckoutError {}

/// Turn a priced cart into an order draft.
///
/// The draft total is the discounted total when a discount applies. The
/// customer email is trimmed; a blank email is dropped.
pub fn checkout(
    cart: &Cart,
    quote: &DiscountQuote,
    email: Option<&str>,
) -> Result<OrderDraft, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if quote.subtotal != cart.total_price {
        return Err(CheckoutError::StaleQuote);
    }

    let items = cart
        .items
        .values()
        .map(|line| OrderItem {
            product_id: line.product.id.clone(),
            name: line.product.name.clone(),
            price: line.product.price,
            qty: line.qty,
            line_total: line.line_total,
        })
        .collect();

    let customer_email = email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string);

    Ok(OrderDraft {
        items,
        total_qty: cart.total_qty,
        total_price: quote.discounted_total,
        discount: quote.applied.clone(),
        customer_email,
    })
}
