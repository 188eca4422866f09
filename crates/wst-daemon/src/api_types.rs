//! Request and response types for all wst-daemon HTTP endpoints.
//!
//! Envelopes follow the admin dashboard contract: `{ success, data }` on
//! success, `{ success: false, error }` on failure. No business logic here.

use serde::{Deserialize, Serialize};
use wst_lifecycle::OrderStatus;
use wst_schemas::{Cents, Order};

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiData<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiData<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Admin: orders
// ---------------------------------------------------------------------------

/// Query string for `GET /v1/admin/orders`. Numbers arrive as strings so a
/// malformed `page` falls back to the default instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub email: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// 200 body for an accepted status update (applied or no-op).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdatedResponse {
    pub success: bool,
    pub message: String,
    /// `false` when the request was a no-op and nothing was written.
    pub changed: bool,
    pub data: Order,
}

/// 400 body for a status update refused by the lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRejectedResponse {
    pub success: bool,
    pub error: String,
    pub current_status: OrderStatus,
    pub allowed_next_status: Option<OrderStatus>,
}

/// 409 body when another request changed the order first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusConflictResponse {
    pub success: bool,
    pub error: String,
    pub current_status: OrderStatus,
    pub allowed_next_status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusesData {
    pub statuses: Vec<OrderStatus>,
}

// ---------------------------------------------------------------------------
// Storefront: checkout + history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: String,
    pub name: String,
    pub price: Cents,
    pub qty: u32,
    #[serde(default)]
    pub image: Option<String>,
}

/// Client-held cart submitted at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    #[serde(default)]
    pub coupon: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MyOrdersQuery {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyOrdersData {
    pub email: String,
    pub orders: Vec<Order>,
}
