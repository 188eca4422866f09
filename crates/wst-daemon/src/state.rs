//! Shared runtime state for wst-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The order store is
//! in-process; swap the `OrderStore` behind `OrderAdmin` for a durable one.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;
use wst_cart::DiscountPolicy;
use wst_config::StoreSettings;
use wst_lifecycle::OrderStatus;
use wst_schemas::Cents;
use wst_store::{MemoryOrderStore, OrderAdmin, OrderStore, PaginationLimits};

// ---------------------------------------------------------------------------
// BusMsg: SSE event bus payload
// ---------------------------------------------------------------------------

/// Messages broadcast over the internal event bus and surfaced as SSE events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BusMsg {
    Heartbeat {
        ts_millis: i64,
    },
    OrderPlaced {
        order_id: Uuid,
        total_price: Cents,
    },
    StatusChanged {
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    },
    LogLine {
        level: String,
        msg: String,
    },
}

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    /// Broadcast bus for SSE.
    pub bus: broadcast::Sender<BusMsg>,
    pub build: BuildInfo,
    /// Order workflow over the configured store.
    pub admin: OrderAdmin,
    /// Coupon applied at checkout.
    pub discount: DiscountPolicy,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// In-memory store with default settings.
    pub fn new() -> Self {
        Self::from_settings(&StoreSettings::default())
    }

    pub fn from_settings(settings: &StoreSettings) -> Self {
        Self::with_store(Arc::new(MemoryOrderStore::new()), settings)
    }

    pub fn with_store(store: Arc<dyn OrderStore>, settings: &StoreSettings) -> Self {
        let (bus, _rx) = broadcast::channel::<BusMsg>(1024);
        let limits = PaginationLimits {
            default_limit: settings.pagination.default_limit,
            max_limit: settings.pagination.max_limit,
        };
        Self {
            bus,
            build: BuildInfo {
                service: "wst-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            admin: OrderAdmin::new(store, limits),
            discount: DiscountPolicy {
                code: settings.discount.code.clone(),
                percent: settings.discount.percent,
            },
        }
    }
}

/// Spawn a background task that emits a heartbeat SSE every `interval`.
pub fn spawn_heartbeat(bus: broadcast::Sender<BusMsg>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let ts = chrono::Utc::now().timestamp_millis();
            let _ = bus.send(BusMsg::Heartbeat { ts_millis: ts });
        }
    });
}
