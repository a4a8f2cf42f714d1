//! Pricing policy: acceptable price band derivation
//!
//! The band is computed once when a session starts and never changes. All
//! offer classification and counter-offer math works against this snapshot.

use crate::error::{BargainError, Result};
use serde::{Deserialize, Serialize};

/// Acceptable price band for one negotiation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    /// Published price: net rate plus the maximum markup
    pub base_price: f64,
    /// Lowest price the engine may ever agree to
    pub range_min: f64,
    /// Highest price worth countering at (base price less promo)
    pub range_max: f64,
}

impl PriceBand {
    /// Check whether a price falls inside the band (inclusive on both ends)
    pub fn contains(&self, price: f64) -> bool {
        price >= self.range_min && price <= self.range_max
    }
}

/// Compute the price band from net rate, markup bounds, and promo discount.
///
/// Fails if `markup_min >= markup_max`. Given that and a non-negative promo
/// discount, `range_min <= range_max` always holds.
pub fn compute_band(
    net_rate: f64,
    markup_min: f64,
    markup_max: f64,
    promo_discount: f64,
) -> Result<PriceBand> {
    if markup_min >= markup_max {
        return Err(BargainError::InvalidMarkupRange {
            min: markup_min,
            max: markup_max,
        });
    }

    let base_price = net_rate * (1.0 + markup_max / 100.0);
    let range_min = net_rate * (1.0 + markup_min / 100.0) - promo_discount;
    let range_max = base_price - promo_discount;

    Ok(PriceBand {
        base_price,
        range_min,
        range_max,
    })
}
