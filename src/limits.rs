//! Cart Limits
//!
//! The two ceilings every cart enforces: a maximum order value and a
//! maximum quantity per line. A lower warning threshold marks carts that are
//! getting close to the order ceiling.

use rusty_money::{
    Money,
    iso::{Currency, USD},
};

/// Maximum cart total in minor units (150.00) before taxes and tips.
pub const MAX_CART_TOTAL_MINOR: i64 = 15_000;

/// Maximum quantity a single cart line may hold.
pub const MAX_ITEM_QUANTITY: u32 = 25;

/// Cart total in minor units (130.00) above which customers are warned.
pub const WARNING_THRESHOLD_MINOR: i64 = 13_000;

/// Ceilings applied to every committed cart state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartLimits {
    max_cart_total: Money<'static, Currency>,
    max_item_quantity: u32,
    warning_threshold: Money<'static, Currency>,
}

impl CartLimits {
    /// Create limits with the given order ceiling and per-line quantity cap.
    ///
    /// A zero quantity cap is raised to one so a line can always be added.
    /// The warning threshold starts at the ceiling, so nothing warns until
    /// [`CartLimits::with_warning_threshold`] lowers it.
    #[must_use]
    pub fn new(max_cart_total: Money<'static, Currency>, max_item_quantity: u32) -> Self {
        Self {
            max_cart_total,
            max_item_quantity: max_item_quantity.max(1),
            warning_threshold: max_cart_total,
        }
    }

    /// Warn once the cart total is above `threshold`.
    ///
    /// The threshold is kept within zero and the ceiling, in minor units of
    /// the ceiling's currency.
    #[must_use]
    pub fn with_warning_threshold(mut self, threshold: Money<'static, Currency>) -> Self {
        let minor = threshold
            .to_minor_units()
            .min(self.max_cart_total.to_minor_units())
            .max(0);

        self.warning_threshold = Money::from_minor(minor, self.currency());
        self
    }

    /// The maximum cart total.
    #[must_use]
    pub fn max_cart_total(&self) -> &Money<'static, Currency> {
        &self.max_cart_total
    }

    /// The maximum quantity per line.
    #[must_use]
    pub fn max_item_quantity(&self) -> u32 {
        self.max_item_quantity
    }

    /// The total above which a cart is near the limit.
    #[must_use]
    pub fn warning_threshold(&self) -> &Money<'static, Currency> {
        &self.warning_threshold
    }

    /// The currency the ceiling is expressed in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.max_cart_total.currency()
    }

    /// Clamp a requested quantity to the per-line cap.
    #[must_use]
    pub fn clamp_quantity(&self, quantity: u32) -> u32 {
        quantity.min(self.max_item_quantity)
    }

    /// Whether a total in minor units would breach the ceiling.
    #[must_use]
    pub fn exceeds(&self, total_minor: i64) -> bool {
        total_minor > self.max_cart_total.to_minor_units()
    }

    /// Whether a total in minor units is above the warning threshold.
    #[must_use]
    pub fn is_near_limit(&self, total_minor: i64) -> bool {
        total_minor > self.warning_threshold.to_minor_units()
    }
}

impl Default for CartLimits {
    fn default() -> Self {
        Self::new(Money::from_minor(MAX_CART_TOTAL_MINOR, USD), MAX_ITEM_QUANTITY)
            .with_warning_threshold(Money::from_minor(WARNING_THRESHOLD_MINOR, USD))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;

    use super::*;

    #[test]
    fn default_limits_match_store_policy() {
        let limits = CartLimits::default();

        assert_eq!(limits.max_cart_total(), &Money::from_minor(15_000, USD));
        assert_eq!(limits.max_item_quantity(), 25);
        assert_eq!(limits.currency(), USD);
        assert_eq!(limits.warning_threshold(), &Money::from_minor(13_000, USD));
    }

    #[test]
    fn near_limit_starts_above_the_warning_threshold() {
        let limits = CartLimits::default();

        assert!(!limits.is_near_limit(13_000));
        assert!(limits.is_near_limit(13_001));
        assert!(limits.is_near_limit(15_000));
    }

    #[test]
    fn warning_threshold_is_kept_under_the_ceiling() {
        let limits = CartLimits::new(Money::from_minor(5_000, USD), 25);

        assert!(!limits.is_near_limit(5_000));

        let limits = limits.with_warning_threshold(Money::from_minor(13_000, USD));
        assert_eq!(limits.warning_threshold(), &Money::from_minor(5_000, USD));

        let limits = limits.with_warning_threshold(Money::from_minor(-100, USD));
        assert_eq!(limits.warning_threshold(), &Money::from_minor(0, USD));
        assert!(limits.is_near_limit(1));
    }

    #[test]
    fn clamp_quantity_caps_at_maximum() {
        let limits = CartLimits::default();

        assert_eq!(limits.clamp_quantity(3), 3);
        assert_eq!(limits.clamp_quantity(25), 25);
        assert_eq!(limits.clamp_quantity(27), 25);
    }

    #[test]
    fn exceeds_is_strict() {
        let limits = CartLimits::default();

        assert!(!limits.exceeds(15_000));
        assert!(limits.exceeds(15_001));
    }

    #[test]
    fn zero_quantity_cap_is_raised_to_one() {
        let limits = CartLimits::new(Money::from_minor(1_000, GBP), 0);

        assert_eq!(limits.max_item_quantity(), 1);
        assert_eq!(limits.currency(), GBP);
    }
}
