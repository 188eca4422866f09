//! `OrderStatus` and the canonical status sequence.
//!
//! The sequence position of a status is its meaning: index order is the only
//! legal direction of travel. Lookups by string are exact and case-sensitive,
//! so `"placed"` is not a status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// OrderStatus
// ---------------------------------------------------------------------------

/// Every status an order can occupy, declared in sequence order.
///
/// `Ord` follows the sequence, so `Placed < Processing < Delivered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order confirmed at checkout. Every order starts here.
    Placed,
    /// Order is being prepared.
    Processing,
    /// Order handed to the customer. **Terminal.**
    Delivered,
}

impl OrderStatus {
    /// The canonical sequence.
    pub const SEQUENCE: [OrderStatus; 3] = [
        OrderStatus::Placed,
        OrderStatus::Processing,
        OrderStatus::Delivered,
    ];

    /// Position in [`OrderStatus::SEQUENCE`].
    pub const fn index(self) -> usize {
        match self {
            OrderStatus::Placed => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Delivered => 2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Placed => "Placed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Delivered => "Delivered",
        }
    }

    /// Exact lookup by name. Returns `None` for anything outside the sequence.
    pub fn parse(s: &str) -> Option<OrderStatus> {
        Self::SEQUENCE.iter().copied().find(|st| st.as_str() == s)
    }

    /// The immediate successor, or `None` when terminal.
    pub fn next(self) -> Option<OrderStatus> {
        Self::SEQUENCE.get(self.index() + 1).copied()
    }

    /// Returns `true` if no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UnknownStatus
// ---------------------------------------------------------------------------

/// Returned by [`OrderStatus::from_str`] for a string outside the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status: {:?}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::parse(s).ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Free lookups
// ---------------------------------------------------------------------------

/// Sequence index of a status name, or `None` when unrecognised.
pub fn status_index(s: &str) -> Option<usize> {
    OrderStatus::parse(s).map(OrderStatus::index)
}

/// Successor of a status name. `None` when the name is unrecognised or
/// already terminal.
pub fn next_status(current: &str) -> Option<OrderStatus> {
    OrderStatus::parse(current).and_then(OrderStatus::next)
}

/// A fresh copy of the canonical sequence, for populating selection controls.
pub fn all_statuses() -> Vec<OrderStatus> {
    OrderStatus::SEQUENCE.to_vec()
}

/// `Placed → Processing → Delivered`
pub fn sequence_display() -> String {
    OrderStatus::SEQUENCE
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" → ")
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
