//! # Money Module
//!
//! Arithmetic helpers for monetary amounts in the split engine.
//!
//! ## Why Floats Here?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SPLITTING IS DIVISION                                                  │
//! │                                                                         │
//! │  A 100.00 dish shared by 3 people is 33.333... each.                   │
//! │                                                                         │
//! │  Rounding every share to cents as it is computed compounds error       │
//! │  across items:                                                          │
//! │    3 such dishes → 33.33 × 3 = 99.99 per person, 0.03 lost overall     │
//! │                                                                         │
//! │  OUR RULE: keep unrounded shares all the way through aggregation,      │
//! │  round each participant's total exactly ONCE at the very end.          │
//! │    3 × 33.333... = 100.00 per person                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billsplit_core::money::{per_head, round_to_cents};
//!
//! let share = per_head(100.0, 3).unwrap();   // 33.333...
//! assert_eq!(round_to_cents(share * 3.0), 100.0);
//! assert_eq!(per_head(100.0, 0), None);       // nobody to split between
//! ```

/// Number of decimal places in the final totals.
pub const CURRENCY_DECIMALS: i32 = 2;

/// Shares at or below this magnitude are floating-point noise.
///
/// Used by the participant breakdown to drop lines like `1e-14` that appear
/// after dividing and re-multiplying. It is not a business threshold:
/// legitimate negative shares (correction lines) are far larger.
pub const SHARE_NOISE_THRESHOLD: f64 = 0.001;

/// Rounds an amount to currency precision, half away from zero.
///
/// ## Example
/// ```rust
/// use billsplit_core::money::round_to_cents;
///
/// assert_eq!(round_to_cents(45.004), 45.0);
/// assert_eq!(round_to_cents(2.675_000_1), 2.68);
/// assert_eq!(round_to_cents(-10.0), -10.0);
/// ```
pub fn round_to_cents(amount: f64) -> f64 {
    let factor = 10f64.powi(CURRENCY_DECIMALS);
    let rounded = (amount * factor).round() / factor;
    // Avoid handing "-0" to the presentation layer.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Splits `amount` evenly across `count` heads.
///
/// Returns `None` when there is nobody to split between, so callers can
/// never push `NaN` or `Infinity` into an aggregate.
#[inline]
pub fn per_head(amount: f64, count: usize) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(amount / count as f64)
    }
}

/// Returns true when a share is large enough to show as its own line.
#[inline]
pub fn is_significant(amount: f64) -> bool {
    amount.abs() > SHARE_NOISE_THRESHOLD
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(45.0), 45.0);
        assert_eq!(round_to_cents(33.333_333), 33.33);
        assert_eq!(round_to_cents(66.666_666), 66.67);
        assert_eq!(round_to_cents(-10.004), -10.0);
        assert_eq!(round_to_cents(-0.001), 0.0);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to_cents(0.125), 0.13);
        assert_eq!(round_to_cents(-0.125), -0.13);
    }

    #[test]
    fn test_per_head() {
        assert_eq!(per_head(10.0, 2), Some(5.0));
        assert_eq!(per_head(0.0, 4), Some(0.0));
        assert_eq!(per_head(10.0, 0), None);
    }

    #[test]
    fn test_is_significant() {
        assert!(is_significant(0.01));
        assert!(is_significant(-5.0));
        assert!(!is_significant(0.0));
        assert!(!is_significant(1e-12));
        assert!(!is_significant(SHARE_NOISE_THRESHOLD));
    }

    /// Documents why rounding happens once: per-item rounding drifts.
    #[test]
    fn test_single_rounding_avoids_drift() {
        let share = per_head(100.0, 3).unwrap();

        let rounded_each_time = round_to_cents(share) * 3.0;
        let rounded_once = round_to_cents(share * 3.0);

        assert!((rounded_each_time - 99.99).abs() < 1e-9);
        assert_eq!(rounded_once, 100.0);
    }
}
