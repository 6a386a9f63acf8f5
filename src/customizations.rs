//! Customizations
//!
//! Paid or free add-ons a customer can select for a product. A customised
//! product becomes its own cart line: the selected add-on names are appended
//! to the product name, and their prices to the unit price.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

/// Errors applying customizations to a product.
#[derive(Debug, Error, PartialEq)]
pub enum CustomizationError {
    /// The selected id is not offered for this product.
    #[error("customization {0} is not available")]
    Unknown(String),

    /// An add-on is priced in a different currency from the product.
    #[error("customization {0} has currency {1}, but product has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// A single add-on option.
#[derive(Debug, Clone, PartialEq)]
pub struct Customization {
    /// Stable identifier (e.g. `oat-milk`)
    pub id: String,

    /// Display name (e.g. "Oat Milk")
    pub name: String,

    /// Extra cost per unit
    pub price: Money<'static, Currency>,
}

/// Apply the selected add-ons to a product's name and unit price.
///
/// Selected ids may be given in any order and may repeat; the suffix lists
/// add-ons in the order they are offered. With nothing selected the name and
/// price are returned unchanged.
///
/// # Errors
///
/// Returns [`CustomizationError::Unknown`] if an id is not in `offered`, or
/// [`CustomizationError::CurrencyMismatch`] if an add-on's currency differs.
pub fn customize(
    name: &str,
    base_price: &Money<'static, Currency>,
    offered: &[Customization],
    selected: &[&str],
) -> Result<(String, Money<'static, Currency>), CustomizationError> {
    if let Some(unknown) = selected
        .iter()
        .find(|id| !offered.iter().any(|option| option.id == **id))
    {
        return Err(CustomizationError::Unknown((*unknown).to_string()));
    }

    let chosen: SmallVec<[&Customization; 4]> = offered
        .iter()
        .filter(|option| selected.contains(&option.id.as_str()))
        .collect();

    if chosen.is_empty() {
        return Ok((name.to_string(), *base_price));
    }

    let currency = base_price.currency();
    let mut unit_minor = base_price.to_minor_units();

    for option in &chosen {
        if option.price.currency() != currency {
            return Err(CustomizationError::CurrencyMismatch(
                option.id.clone(),
                option.price.currency().iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        unit_minor = unit_minor.saturating_add(option.price.to_minor_units());
    }

    let suffix = chosen
        .iter()
        .map(|option| option.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Ok((
        format!("{name} ({suffix})"),
        Money::from_minor(unit_minor, currency),
    ))
}
