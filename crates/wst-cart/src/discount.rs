use serde::{Deserialize, Serialize};
use wst_schemas::{AppliedDiscount, Cents};

/// A single coupon code worth a flat percentage off the cart subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountPolicy {
    pub code: String,
    pub percent: u32,
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        Self {
            code: "SAVE10".to_string(),
            percent: 10,
        }
    }
}

/// Result of pricing a coupon against a subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountQuote {
    pub applied: Option<AppliedDiscount>,
    pub subtotal: Cents,
    pub discounted_total: Cents,
}

impl DiscountQuote {
    pub fn none(subtotal: Cents) -> Self {
        Self {
            applied: None,
            subtotal,
            discounted_total: subtotal,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.applied.is_some()
    }
}

impl DiscountPolicy {
    /// Codes compare case-insensitively after trimming.
    pub fn matches(&self, coupon: &str) -> bool {
        let c = coupon.trim();
        !c.is_empty() && c.eq_ignore_ascii_case(self.code.trim())
    }

    /// Price `coupon` against `subtotal`. Unknown codes, missing codes, and
    /// empty carts leave the total unchanged.
    pub fn quote(&self, coupon: Option<&str>, subtotal: Cents) -> DiscountQuote {
        let Some(code) = coupon else {
            return DiscountQuote::none(subtotal);
        };
        if !self.matches(code) || !subtotal.is_positive() {
            return DiscountQuote::none(subtotal);
        }
        let Some(amount) = subtotal.percent_of(self.percent) else {
            return DiscountQuote::none(subtotal);
        };
        DiscountQuote {
            applied: Some(AppliedDiscount {
                code: self.code.to_ascii_uppercase(),
                percent: self.percent,
                amount,
            }),
            subtotal,
            discounted_total: subtotal - amount,
        }
    }
}
