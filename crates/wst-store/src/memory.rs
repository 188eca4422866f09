//! In-process `OrderStore`.
//!
//! Orders live in a `HashMap` behind a single `RwLock`. Each insert takes a
//! monotonically increasing sequence number which defines "newest first"
//! independent of clock resolution.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;
use wst_lifecycle::OrderStatus;
use wst_schemas::{Order, OrderDraft};

use crate::store::{OrderPage, OrderQuery, OrderStats, OrderStore, Pagination, StoreError};

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    /// id -> (insert sequence, order)
    orders: HashMap<Uuid, (u64, Order)>,
}

#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    inner: RwLock<Inner>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

impl OrderStore for MemoryOrderStore {
    fn insert(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        let order = Order::placed(Uuid::new_v4(), draft, Utc::now());
        let mut g = self.write()?;
        let seq = g.next_seq;
        g.next_seq += 1;
        g.orders.insert(order.id, (seq, order.clone()));
        Ok(order)
    }

    fn get(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.read()?.orders.get(&id).map(|(_, o)| o.clone()))
    }

    fn list(&self, query: &OrderQuery) -> Result<OrderPage, StoreError> {
        let page = query.page.max(1);
        let limit = query.limit.max(1);

        let g = self.read()?;
        let mut hits: Vec<&(u64, Order)> =
            g.orders.values().filter(|(_, o)| query.matches(o)).collect();
        hits.sort_by(|a, b| b.0.cmp(&a.0));

        let skip = (page as usize - 1).saturating_mul(limit as usize);
        let orders = hits
            .iter()
            .skip(skip)
            .take(limit as usize)
            .map(|(_, o)| o.clone())
            .collect();

        Ok(OrderPage {
            orders,
            pagination: Pagination::new(page, limit, hits.len() as u64),
        })
    }

    fn compare_and_set_status(
        &self,
        id: Uuid,
        expected_version: u64,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        let mut g = self.write()?;
        let (_, order) = g.orders.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if order.version != expected_version {
            return Err(StoreError::VersionConflict {
                id,
                expected: expected_version,
                actual: order.version,
            });
        }
        order.status = status;
        order.version += 1;
        order.updated_at_utc = Utc::now();
        Ok(order.clone())
    }

    fn stats(&self) -> Result<OrderStats, StoreError> {
        let g = self.read()?;
        OrderStats::from_orders(g.orders.values().map(|(_, o)| o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wst_schemas::Cents;

    fn draft(email: Option<&str>, total: i64) -> OrderDraft {
        OrderDraft {
            items: Vec::new(),
            total_qty: 1,
            total_price: Cents::new(total),
            discount: None,
            customer_email: email.map(str::to_string),
        }
    }

    #[test]
    fn insert_assigns_placed_and_version_one() {
        let s = MemoryOrderStore::new();
        let o = s.insert(draft(None, 100)).unwrap();
        assert_eq!(o.status, OrderStatus::Placed);
        assert_eq!(o.version, 1);
        assert_eq!(s.get(o.id).unwrap(), Some(o));
    }

    #[test]
    fn get_missing_is_none() {
        let s = MemoryOrderStore::new();
        assert_eq!(s.get(Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn list_is_newest_first_and_paged() {
        let s = MemoryOrderStore::new();
        let ids: Vec<Uuid> = (0..5).map(|i| s.insert(draft(None, i)).unwrap().id).collect();

        let p1 = s
            .list(&OrderQuery {
                limit: 2,
                ..OrderQuery::default()
            })
            .unwrap();
        assert_eq!(p1.orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![ids[4], ids[3]]);
        assert_eq!(p1.pagination.total_pages, 3);
        assert_eq!(p1.pagination.total_orders, 5);

        let p3 = s
            .list(&OrderQuery {
                page: 3,
                limit: 2,
                ..OrderQuery::default()
            })
            .unwrap();
        assert_eq!(p3.orders.len(), 1);
        assert_eq!(p3.orders[0].id, ids[0]);

        let past_end = s
            .list(&OrderQuery {
                page: 9,
                limit: 2,
                ..OrderQuery::default()
            })
            .unwrap();
        assert!(past_end.orders.is_empty());
    }

    #[test]
    fn email_filter_is_case_insensitive_substring() {
        let s = MemoryOrderStore::new();
        s.insert(draft(Some("Bear@Woods.org"), 1)).unwrap();
        s.insert(draft(Some("moose@lake.org"), 1)).unwrap();
        s.insert(draft(None, 1)).unwrap();

        let page = s
            .list(&OrderQuery {
                email: Some("bear@".into()),
                ..OrderQuery::default()
            })
            .unwrap();
        assert_eq!(page.orders.len(), 1);
        assert_eq!(page.orders[0].customer_email.as_deref(), Some("Bear@Woods.org"));
    }

    #[test]
    fn compare_and_set_bumps_version() {
        let s = MemoryOrderStore::new();
        let o = s.insert(draft(None, 1)).unwrap();
        let updated = s
            .compare_and_set_status(o.id, 1, OrderStatus::Processing)
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Processing);
        assert_eq!(updated.version, 2);
        assert!(updated.updated_at_utc >= o.updated_at_utc);
    }

    #[test]
    fn stale_version_is_a_conflict_and_leaves_state() {
        let s = MemoryOrderStore::new();
        let o = s.insert(draft(None, 1)).unwrap();
        s.compare_and_set_status(o.id, 1, OrderStatus::Processing)
            .unwrap();

        let err = s
            .compare_and_set_status(o.id, 1, OrderStatus::Delivered)
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::VersionConflict {
                id: o.id,
                expected: 1,
                actual: 2
            }
        );
        assert_eq!(s.get(o.id).unwrap().unwrap().status, OrderStatus::Processing);
    }

    #[test]
    fn compare_and_set_missing_is_not_found() {
        let s = MemoryOrderStore::new();
        let id = Uuid::new_v4();
        assert_eq!(
            s.compare_and_set_status(id, 1, OrderStatus::Processing),
            Err(StoreError::NotFound(id))
        );
    }

    #[test]
    fn stats_group_by_status_in_sequence_order() {
        let s = MemoryOrderStore::new();
        let a = s.insert(draft(None, 1000)).unwrap();
        s.insert(draft(None, 500)).unwrap();
        s.compare_and_set_status(a.id, 1, OrderStatus::Processing)
            .unwrap();

        let st = s.stats().unwrap();
        assert_eq!(st.total.total_orders, 2);
        assert_eq!(st.total.total_revenue, Cents::new(1500));
        assert_eq!(st.by_status.len(), 2);
        assert_eq!(st.by_status[0].status, OrderStatus::Placed);
        assert_eq!(st.by_status[0].total_revenue, Cents::new(500));
        assert_eq!(st.by_status[1].status, OrderStatus::Processing);
        assert_eq!(st.by_status[1].count, 1);
    }

    #[test]
    fn revenue_overflow_is_an_error_not_a_panic() {
        let s = MemoryOrderStore::new();
        s.insert(draft(None, i64::MAX / 2 + 1)).unwrap();
        s.insert(draft(None, i64::MAX / 2 + 1)).unwrap();
        assert_eq!(s.stats(), Err(StoreError::RevenueOverflow));
    }
}
