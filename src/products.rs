//! Products

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::{allergens::Allergens, customizations::Customization};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// A purchasable menu item.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product name
    pub name: String,

    /// Short description
    pub description: String,

    /// Base price per unit
    pub price: Money<'static, Currency>,

    /// Menu category (e.g. "Coffee"), also the cart grouping label
    pub category: String,

    /// Optional finer grouping used for display
    pub subcategory: Option<String>,

    /// Image filename
    pub image: Option<String>,

    /// Allergens present in the product
    pub allergens: Allergens,

    /// Add-ons offered for this product
    pub customizations: SmallVec<[Customization; 4]>,

    /// Whether the product can currently be ordered
    pub available: bool,
}

impl Product {
    /// Create an available product with no description, image, allergens or add-ons.
    pub fn new(
        name: impl Into<String>,
        price: Money<'static, Currency>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            price,
            category: category.into(),
            subcategory: None,
            image: None,
            allergens: Allergens::default(),
            customizations: SmallVec::new(),
            available: true,
        }
    }

    /// Whether any add-ons are offered.
    pub fn is_customizable(&self) -> bool {
        !self.customizations.is_empty()
    }
}
