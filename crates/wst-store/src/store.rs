use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wst_lifecycle::OrderStatus;
use wst_schemas::{Cents, Order, OrderDraft};

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(Uuid),
    /// Compare-and-set lost: someone else changed the order first.
    VersionConflict {
        id: Uuid,
        expected: u64,
        actual: u64,
    },
    /// A writer panicked while holding the store lock.
    Poisoned,
    /// Summed revenue does not fit in `Cents`.
    RevenueOverflow,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "order {id} not found"),
            StoreError::VersionConflict {
                id,
                expected,
                actual,
            } => write!(
                f,
                "order {id} changed concurrently (expected version {expected}, found {actual})"
            ),
            StoreError::Poisoned => f.write_str("order store lock poisoned"),
            StoreError::RevenueOverflow => f.write_str("order revenue total overflow"),
        }
    }
}

impl std::error::Error for StoreError {}

// ---------------------------------------------------------------------------
// Query / page types
// ---------------------------------------------------------------------------

/// Filter + page request. `page` and `limit` below 1 are treated as 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    /// Case-insensitive substring of the customer email.
    pub email: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            status: None,
            email: None,
            page: 1,
            limit: 10,
        }
    }
}

impl OrderQuery {
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(st) = self.status {
            if order.status != st {
                return false;
            }
        }
        if let Some(needle) = &self.email {
            let needle = needle.to_lowercase();
            match &order.customer_email {
                Some(e) if e.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_orders: u64,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total_orders: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = total_orders.div_ceil(u64::from(limit));
        Self {
            current_page: page.max(1),
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            total_orders,
            limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub pagination: Pagination,
}

impl OrderPage {
    pub fn empty(page: u32, limit: u32) -> Self {
        Self {
            orders: Vec::new(),
            pagination: Pagination::new(page, limit, 0),
        }
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusStats {
    pub status: OrderStatus,
    pub count: u64,
    pub total_revenue: Cents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalStats {
    pub total_orders: u64,
    pub total_revenue: Cents,
}

/// Order counts and revenue. `by_status` lists only statuses that have at
/// least one order, in sequence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub by_status: Vec<StatusStats>,
    pub total: TotalStats,
}

impl OrderStats {
    /// Fails with [`StoreError::RevenueOverflow`] when a revenue sum does not
    /// fit in `Cents`.
    pub fn from_orders<'a>(
        orders: impl IntoIterator<Item = &'a Order>,
    ) -> Result<Self, StoreError> {
        let mut buckets = OrderStatus::SEQUENCE.map(|status| StatusStats {
            status,
            count: 0,
            total_revenue: Cents::ZERO,
        });
        let mut total = TotalStats::default();
        for o in orders {
            let b = &mut buckets[o.status.index()];
            b.count += 1;
            b.total_revenue = b
                .total_revenue
                .checked_add(o.total_price)
                .ok_or(StoreError::RevenueOverflow)?;
            total.total_orders += 1;
            total.total_revenue = total
                .total_revenue
                .checked_add(o.total_price)
                .ok_or(StoreError::RevenueOverflow)?;
        }
        Ok(Self {
            by_status: buckets.into_iter().filter(|b| b.count > 0).collect(),
            total,
        })
    }
}

// ---------------------------------------------------------------------------
// OrderStore
// ---------------------------------------------------------------------------

/// Persistence collaborator for orders.
///
/// Implementations own concurrency control: `compare_and_set_status` must
/// fail with [`StoreError::VersionConflict`] rather than overwrite a change
/// it did not observe.
pub trait OrderStore: Send + Sync {
    /// Persist a draft as a new `Placed` order at version 1.
    fn insert(&self, draft: OrderDraft) -> Result<Order, StoreError>;

    fn get(&self, id: Uuid) -> Result<Option<Order>, StoreError>;

    /// Filtered page, newest first.
    fn list(&self, query: &OrderQuery) -> Result<OrderPage, StoreError>;

    /// Write `status` iff the stored version still equals `expected_version`.
    /// Bumps the version and `updated_at_utc` on success.
    fn compare_and_set_status(
        &self,
        id: Uuid,
        expected_version: u64,
        status: OrderStatus,
    ) -> Result<Order, StoreError>;

    fn stats(&self) -> Result<OrderStats, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_pages_up() {
        let p = Pagination::new(2, 10, 21);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.current_page, 2);

        let empty = Pagination::new(1, 10, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn pagination_clamps_zero_inputs() {
        let p = Pagination::new(0, 0, 5);
        assert_eq!(p.current_page, 1);
        assert_eq!(p.limit, 1);
        assert_eq!(p.total_pages, 5);
    }

    #[test]
    fn stats_serialise_camel_case() {
        let s = OrderStats::default();
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["total"]["totalOrders"], 0);
        assert!(v["byStatus"].as_array().unwrap().is_empty());
    }
}
