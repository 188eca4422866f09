//! Shared order types for the storefront.
//!
//! Wire casing is camelCase to match the admin dashboard payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use wst_lifecycle::OrderStatus;

mod money;

pub use money::Cents;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub price: Cents,
    pub qty: u32,
    pub line_total: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscount {
    pub code: String,
    pub percent: u32,
    pub amount: Cents,
}

/// An order before it is persisted. The store assigns id, status and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub items: Vec<OrderItem>,
    pub total_qty: u32,
    pub total_price: Cents,
    pub discount: Option<AppliedDiscount>,
    pub customer_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub items: Vec<OrderItem>,
    pub total_qty: u32,
    /// Final amount charged, after any discount.
    pub total_price: Cents,
    pub discount: Option<AppliedDiscount>,
    pub status: OrderStatus,
    pub customer_email: Option<String>,
    /// Bumped on every persisted status change; used for compare-and-set.
    pub version: u64,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

impl Order {
    /// Materialise a draft as a freshly placed order.
    pub fn placed(id: Uuid, draft: OrderDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            items: draft.items,
            total_qty: draft.total_qty,
            total_price: draft.total_price,
            discount: draft.discount,
            status: OrderStatus::Placed,
            customer_email: draft.customer_email,
            version: 1,
            created_at_utc: now,
            updated_at_utc: now,
        }
    }
}
