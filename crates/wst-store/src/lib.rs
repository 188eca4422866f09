//! wst-store
//!
//! Order persistence boundary plus the admin workflow that drives the
//! status lifecycle.
//!
//! - [`OrderStore`] is the persistence collaborator. [`MemoryOrderStore`] is
//!   the in-process implementation used by the daemon and tests.
//! - [`OrderAdmin`] is the only caller of the lifecycle oracle: load, ask,
//!   and write only for a real change, guarded by a version check so two
//!   concurrent requests cannot both advance the same order.

mod admin;
mod memory;
mod store;

pub use admin::{AdminError, ListParams, OrderAdmin, PaginationLimits, StatusUpdate};
pub use memory::MemoryOrderStore;
pub use store::{OrderPage, OrderQuery, OrderStats, OrderStore, Pagination, StatusStats, StoreError, TotalStats};
