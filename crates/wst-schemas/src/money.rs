//! Fixed-point money type.
//!
//! All prices and totals are whole cents stored as `i64`. There is no
//! `From<i64>`: construct with [`Cents::new`] so a raw integer is never
//! mistaken for a quantity or an id.
//!
//! Arithmetic is closed over `Cents`. Multiplying a unit price by a quantity
//! goes through [`Cents::checked_mul_qty`], which surfaces overflow instead
//! of wrapping.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A monetary amount in cents. `Cents::new(1999)` is 19.99.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    #[inline]
    pub const fn new(raw: i64) -> Self {
        Cents(raw)
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub fn checked_add(self, rhs: Cents) -> Option<Cents> {
        self.0.checked_add(rhs.0).map(Cents)
    }

    /// Unit price × quantity. `None` on overflow.
    #[inline]
    pub fn checked_mul_qty(self, qty: u32) -> Option<Cents> {
        self.0.checked_mul(i64::from(qty)).map(Cents)
    }

    /// `percent`% of this amount, rounded half away from zero to the cent.
    ///
    /// `None` on overflow.
    pub fn percent_of(self, percent: u32) -> Option<Cents> {
        let scaled = i128::from(self.0) * i128::from(percent);
        let half = if scaled >= 0 { 50 } else { -50 };
        let rounded = (scaled + half) / 100;
        i64::try_from(rounded).ok().map(Cents)
    }
}

impl Add for Cents {
    type Output = Cents;
    #[inline]
    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0 + rhs.0)
    }
}

impl Sub for Cents {
    type Output = Cents;
    #[inline]
    fn sub(self, rhs: Cents) -> Cents {
        Cents(self.0 - rhs.0)
    }
}

impl AddAssign for Cents {
    #[inline]
    fn add_assign(&mut self, rhs: Cents) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Cents {
    #[inline]
    fn sub_assign(&mut self, rhs: Cents) {
        self.0 -= rhs.0;
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
        iter.fold(Cents::ZERO, |acc, c| acc + c)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = (self.0 % 100).abs();
        // -0.50 would otherwise print as 0.50
        if self.0 < 0 && whole == 0 {
            write!(f, "-0.{frac:02}")
        } else {
            write!(f, "{whole}.{frac:02}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_two_decimals() {
        assert_eq!(Cents::new(1999).to_string(), "19.99");
        assert_eq!(Cents::new(5).to_string(), "0.05");
        assert_eq!(Cents::new(-50).to_string(), "-0.50");
        assert_eq!(Cents::new(-1234).to_string(), "-12.34");
    }

    #[test]
    fn percent_rounds_half_up() {
        // 10% of 12.34 -> 1.234 -> 1.23; 10% of 0.05 -> 0.005 -> 0.01
        assert_eq!(Cents::new(1234).percent_of(10), Some(Cents::new(123)));
        assert_eq!(Cents::new(5).percent_of(10), Some(Cents::new(1)));
        assert_eq!(Cents::new(4).percent_of(10), Some(Cents::new(0)));
        assert_eq!(Cents::new(10_000).percent_of(100), Some(Cents::new(10_000)));
    }

    #[test]
    fn mul_qty_detects_overflow() {
        assert_eq!(Cents::new(250).checked_mul_qty(4), Some(Cents::new(1000)));
        assert_eq!(Cents::new(i64::MAX).checked_mul_qty(2), None);
    }

    #[test]
    fn sum_of_lines() {
        let total: Cents = [Cents::new(100), Cents::new(250)].into_iter().sum();
        assert_eq!(total, Cents::new(350));
    }

    #[test]
    fn serializes_as_bare_integer() {
        assert_eq!(serde_json::to_string(&Cents::new(1999)).unwrap(), "1999");
    }
}
