//! Transition oracle.
//!
//! # Rule
//!
//! With `i = index(current)` and `j = index(next)`, a request is legal iff
//! both indices exist and `j == i || j == i + 1`.
//!
//! ```text
//!   Placed ──► Processing ──► Delivered (term.)
//!     ↺            ↺              ↺        (same status = no-op)
//! ```
//!
//! Every failure is reported as a value ([`Transition::Rejected`]); nothing
//! here panics or returns `Err`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::status::{sequence_display, OrderStatus};

// ---------------------------------------------------------------------------
// Rejection
// ---------------------------------------------------------------------------

/// Why a requested transition was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The stored status is not a member of the sequence.
    UnknownCurrent(String),
    /// The requested status is not a member of the sequence.
    UnknownNext(String),
    /// Both statuses are known but the move goes backward or skips a step.
    Illegal { from: OrderStatus, to: OrderStatus },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UnknownCurrent(s) => write!(f, "Current status \"{s}\" is not valid."),
            Rejection::UnknownNext(s) => write!(f, "New status \"{s}\" is not valid."),
            Rejection::Illegal { from, to } => write!(
                f,
                "Cannot transition from \"{from}\" to \"{to}\". Must follow sequence: {}.",
                sequence_display()
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Verdict for a requested status change.
///
/// `NoOp` is kept apart from `Applied` so callers can skip a redundant write
/// while still reporting success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// `to` is the immediate successor of `from`.
    Applied { from: OrderStatus, to: OrderStatus },
    /// The requested status equals the current one.
    NoOp { status: OrderStatus },
    Rejected(Rejection),
}

impl Transition {
    /// `true` for `Applied` and `NoOp`.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Transition::Rejected(_))
    }

    /// `true` only when a write is required.
    pub fn changes_status(&self) -> bool {
        matches!(self, Transition::Applied { .. })
    }

    /// The status the order ends up in if the verdict is honoured.
    pub fn target(&self) -> Option<OrderStatus> {
        match self {
            Transition::Applied { to, .. } => Some(*to),
            Transition::NoOp { status } => Some(*status),
            Transition::Rejected(_) => None,
        }
    }

    /// Short machine-readable tag: `applied` | `noop` | `rejected`.
    pub fn outcome(&self) -> &'static str {
        match self {
            Transition::Applied { .. } => "applied",
            Transition::NoOp { .. } => "noop",
            Transition::Rejected(_) => "rejected",
        }
    }

    /// Human-readable explanation, suitable for surfacing to an operator.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Flatten into the `{valid, message}` shape used by transports.
    pub fn to_check(&self) -> TransitionCheck {
        TransitionCheck {
            valid: self.is_valid(),
            message: self.message(),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Applied { from, to } => {
                write!(f, "Valid transition from \"{from}\" to \"{to}\".")
            }
            Transition::NoOp { status } => write!(f, "Order is already in \"{status}\" status."),
            Transition::Rejected(r) => write!(f, "{r}"),
        }
    }
}

/// Flat `{valid, message}` view of a [`Transition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCheck {
    pub valid: bool,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Oracle
// ---------------------------------------------------------------------------

/// Typed oracle over two known statuses.
pub fn check_transition(current: OrderStatus, next: OrderStatus) -> Transition {
    let (i, j) = (current.index(), next.index());
    if j == i {
        Transition::NoOp { status: current }
    } else if j == i + 1 {
        Transition::Applied {
            from: current,
            to: next,
        }
    } else {
        Transition::Rejected(Rejection::Illegal {
            from: current,
            to: next,
        })
    }
}

/// String oracle: total over any pair of inputs.
///
/// The current status is checked first, so when both inputs are unknown the
/// rejection names the current one.
pub fn is_valid_transition(current: &str, next: &str) -> Transition {
    let Some(cur) = OrderStatus::parse(current) else {
        return Transition::Rejected(Rejection::UnknownCurrent(current.to_string()));
    };
    let Some(nxt) = OrderStatus::parse(next) else {
        return Transition::Rejected(Rejection::UnknownNext(next.to_string()));
    };
    check_transition(cur, nxt)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn same_status_is_a_valid_noop() {
        for s in OrderStatus::SEQUENCE {
            let t = is_valid_transition(s.as_str(), s.as_str());
            assert_eq!(t, Transition::NoOp { status: s });
            assert!(t.is_valid());
            assert!(!t.changes_status());
        }
    }

    #[test]
    fn single_forward_steps_are_applied() {
        assert_eq!(
            is_valid_transition("Placed", "Processing"),
            Transition::Applied { from: Placed, to: Processing }
        );
        assert_eq!(
            is_valid_transition("Processing", "Delivered"),
            Transition::Applied { from: Processing, to: Delivered }
        );
    }

    #[test]
    fn skip_is_rejected() {
        let t = is_valid_transition("Placed", "Delivered");
        assert!(!t.is_valid());
        assert_eq!(
            t,
            Transition::Rejected(Rejection::Illegal { from: Placed, to: Delivered })
        );
    }

    #[test]
    fn backward_moves_are_rejected() {
        for (from, to) in [(Processing, Placed), (Delivered, Processing), (Delivered, Placed)] {
            assert!(!check_transition(from, to).is_valid(), "{from} -> {to}");
        }
    }

    #[test]
    fn unknown_statuses_are_rejected_with_which_side() {
        assert_eq!(
            is_valid_transition("Placed", "Cancelled"),
            Transition::Rejected(Rejection::UnknownNext("Cancelled".into()))
        );
        assert_eq!(
            is_valid_transition("Bogus", "Placed"),
            Transition::Rejected(Rejection::UnknownCurrent("Bogus".into()))
        );
        assert_eq!(
            is_valid_transition("Bogus", "Nope"),
            Transition::Rejected(Rejection::UnknownCurrent("Bogus".into()))
        );
    }

    #[test]
    fn messages_distinguish_outcomes() {
        assert_eq!(
            is_valid_transition("Placed", "Processing").message(),
            "Valid transition from \"Placed\" to \"Processing\"."
        );
        assert_eq!(
            is_valid_transition("Processing", "Processing").message(),
            "Order is already in \"Processing\" status."
        );
        assert_eq!(
            is_valid_transition("Placed", "Delivered").message(),
            "Cannot transition from \"Placed\" to \"Delivered\". \
             Must follow sequence: Placed → Processing → Delivered."
        );
        assert_eq!(
            is_valid_transition("Placed", "").message(),
            "New status \"\" is not valid."
        );
    }

    #[test]
    fn check_view_flattens_verdict() {
        let check = is_valid_transition("Delivered", "Delivered").to_check();
        assert!(check.valid);
        assert_eq!(check.message, "Order is already in \"Delivered\" status.");

        let check = is_valid_transition("Processing", "Placed").to_check();
        assert!(!check.valid);
    }

    #[test]
    fn legality_matches_index_rule_exhaustively() {
        for cur in OrderStatus::SEQUENCE {
            for nxt in OrderStatus::SEQUENCE {
                let (i, j) = (cur.index(), nxt.index());
                let expected = j == i || j == i + 1;
                assert_eq!(check_transition(cur, nxt).is_valid(), expected, "{cur} -> {nxt}");
            }
        }
    }

    #[test]
    fn target_reports_resulting_status() {
        assert_eq!(check_transition(Placed, Processing).target(), Some(Processing));
        assert_eq!(check_transition(Placed, Placed).target(), Some(Placed));
        assert_eq!(check_transition(Placed, Delivered).target(), None);
    }
}
