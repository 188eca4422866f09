//! Admin order workflow.
//!
//! # Status update
//!
//! ```text
//!   request{status} ──► load order ──► is_valid_transition(current, requested)
//!                                        │
//!        Rejected ◄──────────────────────┼──────────────► NoOp (no write)
//!   (state untouched,                    │
//!    current + allowed next)             ▼
//!                                     Applied ──► compare_and_set(version)
//! ```
//!
//! A version conflict means another request advanced the order between our
//! load and our write; it is reported, never retried blindly.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use wst_lifecycle::{all_statuses, is_valid_transition, OrderStatus, Transition};
use wst_schemas::{Order, OrderDraft};

use crate::store::{OrderPage, OrderQuery, OrderStats, OrderStore, StoreError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    /// The request carried no status.
    MissingStatus,
    /// The customer lookup carried no email.
    MissingEmail,
    NotFound(Uuid),
    /// The order changed between load and write.
    Conflict { id: Uuid, current_status: OrderStatus },
    Store(StoreError),
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminError::MissingStatus => f.write_str("Status field is required"),
            AdminError::MissingEmail => f.write_str("Please enter an email address."),
            AdminError::NotFound(_) => f.write_str("Order not found"),
            AdminError::Conflict { current_status, .. } => write!(
                f,
                "Order was updated concurrently; it is now \"{current_status}\". Reload and retry."
            ),
            AdminError::Store(e) => write!(f, "order store failure: {e}"),
        }
    }
}

impl std::error::Error for AdminError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdminError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for AdminError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => AdminError::NotFound(id),
            other => AdminError::Store(other),
        }
    }
}

// ---------------------------------------------------------------------------
// StatusUpdate
// ---------------------------------------------------------------------------

/// Outcome of a status update request that reached the oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Persisted a one-step advance.
    Applied {
        order: Order,
        from: OrderStatus,
        message: String,
    },
    /// Requested status equals current; nothing written.
    NoOp { order: Order, message: String },
    /// Oracle refused; stored state untouched.
    Rejected {
        message: String,
        current_status: OrderStatus,
        /// `None` when the order is terminal.
        allowed_next_status: Option<OrderStatus>,
    },
}

impl StatusUpdate {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, StatusUpdate::Rejected { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            StatusUpdate::Applied { message, .. }
            | StatusUpdate::NoOp { message, .. }
            | StatusUpdate::Rejected { message, .. } => message,
        }
    }
}

// ---------------------------------------------------------------------------
// Listing params
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationLimits {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationLimits {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// Raw listing parameters as received from a transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub status: Option<String>,
    pub email: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// ---------------------------------------------------------------------------
// OrderAdmin
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct OrderAdmin {
    store: Arc<dyn OrderStore>,
    limits: PaginationLimits,
}

impl OrderAdmin {
    pub fn new(store: Arc<dyn OrderStore>, limits: PaginationLimits) -> Self {
        Self { store, limits }
    }

    pub fn statuses(&self) -> Vec<OrderStatus> {
        all_statuses()
    }

    pub fn place_order(&self, draft: OrderDraft) -> Result<Order, AdminError> {
        let order = self.store.insert(draft)?;
        info!(
            order_id = %order.id,
            total_price = %order.total_price,
            total_qty = order.total_qty,
            "order placed"
        );
        Ok(order)
    }

    pub fn get(&self, id: Uuid) -> Result<Order, AdminError> {
        self.store.get(id)?.ok_or(AdminError::NotFound(id))
    }

    /// Filtered listing. An unrecognised status filter matches nothing.
    pub fn list(&self, params: &ListParams) -> Result<OrderPage, AdminError> {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(self.limits.default_limit)
            .min(self.limits.max_limit)
            .max(1);

        let status = match params.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => match OrderStatus::parse(s) {
                Some(st) => Some(st),
                None => return Ok(OrderPage::empty(page, limit)),
            },
        };
        let email = params
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        Ok(self.store.list(&OrderQuery {
            status,
            email,
            page,
            limit,
        })?)
    }

    /// Every order whose customer email contains `email`, newest first.
    pub fn orders_for_email(&self, email: &str) -> Result<Vec<Order>, AdminError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AdminError::MissingEmail);
        }
        let page = self.store.list(&OrderQuery {
            status: None,
            email: Some(email),
            page: 1,
            limit: u32::MAX,
        })?;
        Ok(page.orders)
    }

    pub fn stats(&self) -> Result<OrderStats, AdminError> {
        Ok(self.store.stats()?)
    }

    /// Validate and apply a requested status change.
    pub fn update_status(&self, id: Uuid, requested: &str) -> Result<StatusUpdate, AdminError> {
        // Blank means absent; anything else goes to the oracle verbatim.
        if requested.trim().is_empty() {
            return Err(AdminError::MissingStatus);
        }

        let order = self.get(id)?;
        let verdict = is_valid_transition(order.status.as_str(), requested);
        let message = verdict.message();

        match verdict {
            Transition::Rejected(_) => {
                warn!(order_id = %id, current = %order.status, requested, %message, "status update rejected");
                Ok(StatusUpdate::Rejected {
                    message,
                    current_status: order.status,
                    allowed_next_status: order.status.next(),
                })
            }
            Transition::NoOp { .. } => {
                info!(order_id = %id, status = %order.status, "status update is a no-op");
                Ok(StatusUpdate::NoOp { order, message })
            }
            Transition::Applied { from, to } => {
                let updated = match self.store.compare_and_set_status(id, order.version, to) {
                    Ok(o) => o,
                    Err(StoreError::VersionConflict { .. }) => {
                        let current_status = self.get(id)?.status;
                        warn!(order_id = %id, %from, %to, current = %current_status, "status update lost a race");
                        return Err(AdminError::Conflict { id, current_status });
                    }
                    Err(e) => return Err(e.into()),
                };
                info!(order_id = %id, %from, %to, version = updated.version, "order status advanced");
                Ok(StatusUpdate::Applied {
                    order: updated,
                    from,
                    message: format!("Order status updated to \"{to}\""),
                })
            }
        }
    }
}
