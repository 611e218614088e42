//! The tiered formula for converting a purchase amount into reward points.

use rust_decimal::{Decimal, prelude::ToPrimitive};

/// An integer number of reward points.
pub type Points = i64;

const LOWER_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const UPPER_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;
const UPPER_TIER_MULTIPLIER: Decimal = Decimal::TWO;

/// Calculate the reward points earned for a purchase of `amount` dollars.
///
/// - Every whole dollar spent over $100 earns 2 points, plus 50 points for the $50–$100 band.
/// - Every whole dollar spent over $50 and up to $100 earns 1 point.
/// - Purchases of $50 or less, including zero and negative amounts, earn nothing.
///
/// The thresholds are exclusive, so exactly $50 earns 0 points and exactly $100
/// earns 50 points. Fractions of a point are truncated, not rounded, e.g. $75.99
/// earns 25 points and $120.75 earns 91 points.
pub fn points_for(amount: Decimal) -> Points {
    if amount > UPPER_THRESHOLD {
        let lower_tier = to_points(UPPER_THRESHOLD - LOWER_THRESHOLD);
        let upper_tier = (amount - UPPER_THRESHOLD)
            .checked_mul(UPPER_TIER_MULTIPLIER)
            .map_or(Points::MAX, |points| to_points(points.trunc()));

        upper_tier.saturating_add(lower_tier)
    } else if amount > LOWER_THRESHOLD {
        to_points((amount - LOWER_THRESHOLD).trunc())
    } else {
        0
    }
}

/// Saturates rather than fails for amounts too large to count in [Points].
fn to_points(value: Decimal) -> Points {
    value.to_i64().unwrap_or(Points::MAX)
}
