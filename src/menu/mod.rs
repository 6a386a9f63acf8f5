//! Menu
//!
//! The read-only catalog of purchasable products. The menu supplies
//! [`LineCandidate`]s to the cart; it never mutates a cart itself.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::LineCandidate,
    customizations::{CustomizationError, customize},
    pricing::PriceError,
    products::{Product, ProductKey},
};

pub mod fixture;

use fixture::MenuFixture;

/// Menu loading and lookup errors
#[derive(Debug, Error)]
pub enum MenuError {
    /// IO error reading a menu file
    #[error("Failed to read menu file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Price or currency parsing error
    #[error(transparent)]
    Price(#[from] PriceError),

    /// A product refers to a customization set that does not exist
    #[error("Unknown customization set: {0}")]
    UnknownCustomizationSet(String),

    /// Two products share a name
    #[error("Duplicate product: {0}")]
    DuplicateProduct(String),

    /// A product is priced in a different currency from the menu
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The product is not currently available
    #[error("{0} is currently unavailable")]
    Unavailable(String),

    /// Customization could not be applied
    #[error(transparent)]
    Customization(#[from] CustomizationError),
}

/// Menu catalog
#[derive(Debug)]
pub struct Menu {
    products: SlotMap<ProductKey, Product>,
    order: Vec<ProductKey>,
    names: FxHashMap<String, ProductKey>,
    currency: &'static Currency,
}

impl Menu {
    /// Create an empty menu priced in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            order: Vec::new(),
            names: FxHashMap::default(),
            currency,
        }
    }

    /// Load a menu from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a product is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MenuError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let menu = Self::from_yaml_str(&contents)?;

        debug!(path = %path.display(), products = menu.len(), "loaded menu");

        Ok(menu)
    }

    /// Parse a menu from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed, or if a product is invalid.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, MenuError> {
        let fixture: MenuFixture = serde_norway::from_str(yaml)?;
        let (currency, products) = fixture.into_products()?;

        let mut menu = Self::new(currency);

        for product in products {
            menu.insert(product)?;
        }

        Ok(menu)
    }

    /// Add a product to the menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already taken (ignoring case) or the
    /// product or any of its add-ons is priced in another currency.
    pub fn insert(&mut self, product: Product) -> Result<ProductKey, MenuError> {
        let currencies = std::iter::once(product.price.currency())
            .chain(product.customizations.iter().map(|option| option.price.currency()));

        for currency in currencies {
            if currency != self.currency {
                return Err(MenuError::CurrencyMismatch(
                    self.currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }
        }

        let name = product.name.to_lowercase();

        if self.names.contains_key(&name) {
            return Err(MenuError::DuplicateProduct(product.name));
        }

        let key = self.products.insert(product);

        self.names.insert(name, key);
        self.order.push(key);

        Ok(key)
    }

    /// Look up a product.
    pub fn get(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Find a product by name, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<(ProductKey, &Product)> {
        let key = *self.names.get(&name.trim().to_lowercase())?;

        self.products.get(key).map(|product| (key, product))
    }

    /// Iterate over products in menu order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product)> {
        self.order
            .iter()
            .filter_map(|&key| self.products.get(key).map(|product| (key, product)))
    }

    /// Categories in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();

        for (_, product) in self.iter() {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }

        categories
    }

    /// Products in a category.
    pub fn in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = (ProductKey, &'a Product)> + 'a {
        self.iter()
            .filter(move |(_, product)| product.category == category)
    }

    /// Products that do not contain an allergen.
    pub fn without_allergen<'a>(
        &'a self,
        allergen: &'a str,
    ) -> impl Iterator<Item = (ProductKey, &'a Product)> + 'a {
        self.iter()
            .filter(move |(_, product)| !product.allergens.contains(allergen))
    }

    /// Products whose name or description contains `query`, ignoring case.
    ///
    /// An empty query matches every product.
    pub fn search<'a>(
        &'a self,
        query: &'a str,
    ) -> impl Iterator<Item = (ProductKey, &'a Product)> + 'a {
        let query = query.to_lowercase();

        self.iter().filter(move |(_, product)| {
            product.name.to_lowercase().contains(&query)
                || product.description.to_lowercase().contains(&query)
        })
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the menu is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Menu currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Build a cart candidate for a product with the selected add-ons.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist, is unavailable, or an
    /// add-on id is not offered for it.
    pub fn candidate(
        &self,
        key: ProductKey,
        quantity: u32,
        customizations: &[&str],
    ) -> Result<LineCandidate, MenuError> {
        let product = self
            .products
            .get(key)
            .ok_or_else(|| MenuError::ProductNotFound(format!("{key:?}")))?;

        if !product.available {
            return Err(MenuError::Unavailable(product.name.clone()));
        }

        let (name, unit_price) = customize(
            &product.name,
            &product.price,
            &product.customizations,
            customizations,
        )?;

        let candidate = LineCandidate::new(name, unit_price, quantity, product.category.clone());

        Ok(match &product.image {
            Some(image) => candidate.with_image(image.clone()),
            None => candidate,
        })
    }
}
