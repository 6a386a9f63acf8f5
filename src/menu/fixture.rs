//! Menu YAML documents

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::Deserialize;
use smallvec::SmallVec;

use crate::{
    allergens::Allergens,
    customizations::Customization,
    menu::MenuError,
    pricing::{currency_from_code, parse_price},
    products::Product,
};

/// Top-level menu document.
#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    /// ISO code of the menu currency
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Named add-on sets products can refer to
    #[serde(default)]
    pub customization_sets: FxHashMap<String, Vec<CustomizationFixture>>,

    /// Products in display order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product price (e.g., "5.00 USD")
    pub price: String,

    /// Menu category
    pub category: String,

    /// Optional finer grouping
    #[serde(default)]
    pub subcategory: Option<String>,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Image filename
    #[serde(default)]
    pub image: Option<String>,

    /// Allergen labels
    #[serde(default)]
    pub allergens: Vec<String>,

    /// Name of a customization set
    #[serde(default)]
    pub customizations: Option<String>,

    /// Whether the product can be ordered
    #[serde(default = "default_available")]
    pub available: bool,
}

/// Customization Fixture
#[derive(Debug, Clone, Deserialize)]
pub struct CustomizationFixture {
    /// Stable identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Extra cost (e.g., "0.65 USD")
    pub price: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_available() -> bool {
    true
}

impl MenuFixture {
    /// Convert the document into products, resolving customization sets.
    ///
    /// # Errors
    ///
    /// Returns an error for unparsable prices, unknown currencies or
    /// references to customization sets that do not exist.
    pub fn into_products(self) -> Result<(&'static Currency, Vec<Product>), MenuError> {
        let currency = currency_from_code(&self.currency)?;

        let sets = self
            .customization_sets
            .into_iter()
            .map(|(name, options)| {
                let options = options
                    .into_iter()
                    .map(Customization::try_from)
                    .collect::<Result<SmallVec<[Customization; 4]>, _>>()?;

                Ok((name, options))
            })
            .collect::<Result<FxHashMap<_, _>, MenuError>>()?;

        let products = self
            .products
            .into_iter()
            .map(|fixture| {
                let customizations = match &fixture.customizations {
                    Some(set) => sets
                        .get(set)
                        .cloned()
                        .ok_or_else(|| MenuError::UnknownCustomizationSet(set.clone()))?,
                    None => SmallVec::new(),
                };

                Ok(Product {
                    price: parse_price(&fixture.price)?,
                    allergens: fixture.allergens.iter().collect::<Allergens>(),
                    name: fixture.name,
                    description: fixture.description,
                    category: fixture.category,
                    subcategory: fixture.subcategory,
                    image: fixture.image,
                    customizations,
                    available: fixture.available,
                })
            })
            .collect::<Result<Vec<_>, MenuError>>()?;

        Ok((currency, products))
    }
}

impl TryFrom<CustomizationFixture> for Customization {
    type Error = MenuError;

    fn try_from(fixture: CustomizationFixture) -> Result<Self, Self::Error> {
        Ok(Customization {
            price: parse_price(&fixture.price)?,
            id: fixture.id,
            name: fixture.name,
        })
    }
}
