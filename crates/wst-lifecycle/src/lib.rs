//! wst-lifecycle
//!
//! Order status lifecycle for the storefront.
//!
//! - Orders move through a fixed sequence: `Placed → Processing → Delivered`.
//! - A transition may stay put (no-op) or advance exactly one step.
//! - Backward moves, skips and unknown statuses are rejected.
//!
//! This crate is a pure decision oracle: no persistence, no clocks, no
//! shared state. Callers load the order, ask [`is_valid_transition`], and
//! persist only when the verdict is [`Transition::Applied`].

mod status;
mod transition;

pub use status::{all_statuses, next_status, sequence_display, status_index, OrderStatus, UnknownStatus};

pub use transition::{check_transition, is_valid_transition, Rejection, Transition, TransitionCheck};
