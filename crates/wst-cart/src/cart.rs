use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use wst_schemas::Cents;

pub const DEFAULT_PRODUCT_IMAGE: &str = "/images/square.png";

/// What the cart needs to know about a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: String,
    pub name: String,
    pub price: Cents,
    pub image: String,
}

impl ProductRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Cents) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: DEFAULT_PRODUCT_IMAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: ProductRef,
    pub qty: u32,
    pub line_total: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// `update` named a product that has no line in the cart.
    NotInCart(String),
    /// A line total or cart total does not fit in `Cents`.
    Overflow,
}

impl fmt::Display for CartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartError::NotInCart(id) => write!(f, "item not in cart: {id}"),
            CartError::Overflow => f.write_str("cart total overflow"),
        }
    }
}

impl std::error::Error for CartError {}

/// Lines keyed by product id; ordering is stable for rendering and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: BTreeMap<String, CartLine>,
    pub total_qty: u32,
    pub total_price: Cents,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.total_qty == 0
    }

    /// Add one unit of `product`, creating its line if needed.
    pub fn add(&mut self, product: ProductRef) -> Result<(), CartError> {
        let line = self
            .items
            .entry(product.id.clone())
            .or_insert_with(|| CartLine {
                product,
                qty: 0,
                line_total: Cents::ZERO,
            });
        line.qty = line.qty.checked_add(1).ok_or(CartError::Overflow)?;
        line.line_total = line
            .product
            .price
            .checked_mul_qty(line.qty)
            .ok_or(CartError::Overflow)?;
        self.recalc()
    }

    /// Set a line's quantity. A quantity of zero or less removes the line.
    pub fn update(&mut self, product_id: &str, qty: i64) -> Result<(), CartError> {
        if !self.items.contains_key(product_id) {
            return Err(CartError::NotInCart(product_id.to_string()));
        }
        if qty <= 0 {
            self.items.remove(product_id);
        } else if let Some(line) = self.items.get_mut(product_id) {
            let qty = u32::try_from(qty).map_err(|_| CartError::Overflow)?;
            line.line_total = line
                .product
                .price
                .checked_mul_qty(qty)
                .ok_or(CartError::Overflow)?;
            line.qty = qty;
        }
        self.recalc()
    }

    /// Drop a line. Absent lines are ignored.
    pub fn remove(&mut self, product_id: &str) -> Result<(), CartError> {
        self.items.remove(product_id);
        self.recalc()
    }

    pub fn clear(&mut self) {
        *self = Cart::default();
    }

    fn recalc(&mut self) -> Result<(), CartError> {
        let mut qty: u32 = 0;
        let mut price = Cents::ZERO;
        for line in self.items.values() {
            qty = qty.checked_add(line.qty).ok_or(CartError::Overflow)?;
            price = price
                .checked_add(line.line_total)
                .ok_or(CartError::Overflow)?;
        }
        self.total_qty = qty;
        self.total_price = price;
        Ok(())
    }
}
