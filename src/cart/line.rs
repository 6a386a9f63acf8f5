//! Cart Lines

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier of a cart line, stable for the life of the line.
    pub struct LineKey;
}

/// Something a customer wants to add to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCandidate {
    /// Display name, possibly carrying a customisation suffix.
    pub name: String,

    /// Price per unit.
    pub unit_price: Money<'static, Currency>,

    /// Requested quantity.
    pub quantity: u32,

    /// Grouping label.
    pub category: String,

    /// Display image reference.
    pub image: Option<String>,
}

impl LineCandidate {
    /// Create a new candidate without an image.
    pub fn new(
        name: impl Into<String>,
        unit_price: Money<'static, Currency>,
        quantity: u32,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
            category: category.into(),
            image: None,
        }
    }

    /// Attach an image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// One line in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    key: LineKey,
    name: String,
    unit_price: Money<'static, Currency>,
    quantity: u32,
    category: String,
    image: Option<String>,
}

impl CartLine {
    pub(crate) fn from_candidate(key: LineKey, candidate: LineCandidate, quantity: u32) -> Self {
        Self {
            key,
            name: candidate.name,
            unit_price: candidate.unit_price,
            quantity,
            category: candidate.category,
            image: candidate.image,
        }
    }

    /// The line's identifier.
    pub fn key(&self) -> LineKey {
        self.key
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price per unit.
    pub fn unit_price(&self) -> &Money<'static, Currency> {
        &self.unit_price
    }

    /// Quantity, always within `1..=max_item_quantity`.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Grouping label.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Display image reference, if any.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Two lines are the same product when name and category match exactly.
    pub fn is_same_product(&self, name: &str, category: &str) -> bool {
        self.name == name && self.category == category
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Money<'static, Currency> {
        Money::from_minor(self.line_total_minor(), self.unit_price.currency())
    }

    pub(crate) fn line_total_minor(&self) -> i64 {
        line_total_minor(self.unit_price.to_minor_units(), self.quantity)
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}

/// Multiply a unit price in minor units by a quantity, saturating on overflow.
pub(crate) fn line_total_minor(unit_minor: i64, quantity: u32) -> i64 {
    unit_minor.saturating_mul(i64::from(quantity))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn line_total_multiplies_unit_price() {
        let mut keys = SlotMap::<LineKey, ()>::with_key();
        let candidate = LineCandidate::new("Croissant", Money::from_minor(375, USD), 1, "Pastries");

        let line = CartLine::from_candidate(keys.insert(()), candidate, 4);

        assert_eq!(line.line_total(), Money::from_minor(1_500, USD));
    }

    #[test]
    fn same_product_requires_name_and_category() {
        let line = CartLine::from_candidate(
            LineKey::default(),
            LineCandidate::new("Latte", Money::from_minor(500, USD), 1, "Coffee"),
            1,
        );

        assert!(line.is_same_product("Latte", "Coffee"));
        assert!(!line.is_same_product("Latte", "Tea"));
        assert!(!line.is_same_product("latte", "Coffee"));
    }

    #[test]
    fn candidate_image_is_optional() {
        let candidate = LineCandidate::new("Bagel", Money::from_minor(250, USD), 1, "Breakfast")
            .with_image("bagel.jpg");

        assert_eq!(candidate.image.as_deref(), Some("bagel.jpg"));
    }
}
