//! Store configuration
//!
//! Order limits, checkout charges and contact details, loaded from YAML.
//! Every section is optional; anything left out falls back to the store's
//! standing policy.

use std::{fs, path::Path};

use jiff::civil::Time;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use smallvec::{SmallVec, smallvec};
use thiserror::Error;
use tracing::debug;

use crate::{
    checkout::CheckoutSettings,
    limits::{CartLimits, MAX_CART_TOTAL_MINOR, MAX_ITEM_QUANTITY, WARNING_THRESHOLD_MINOR},
    pricing::{PriceError, currency_from_code, parse_price, parse_rate},
    schedule::StoreHours,
};

const DEFAULT_PHONE: &str = "(908) 933-0123";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Price, rate or currency parsing error
    #[error(transparent)]
    Price(#[from] PriceError),

    /// A configured amount is in a different currency from the store
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// A limit is out of range
    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    /// Opening hours do not form a day
    #[error("Invalid hours: opening at {open} is not before closing at {close}")]
    InvalidHours {
        /// First slot
        open: Time,
        /// Last slot
        close: Time,
    },
}

/// Store configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Cart ceilings
    pub limits: CartLimits,

    /// Checkout charges
    pub checkout: CheckoutSettings,

    /// Pickup and delivery hours
    pub hours: StoreHours,

    /// Store phone number, used for pickup hand-off and large orders
    pub phone: String,

    /// Delivery platforms the store is listed on
    pub delivery_platforms: SmallVec<[String; 4]>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let limits = CartLimits::default();
        let currency = limits.currency();

        Self {
            limits,
            checkout: CheckoutSettings {
                tax_rate: Decimal::new(875, 4),
                delivery_fee: Money::from_minor(399, currency),
                default_tip: Decimal::new(18, 2),
            },
            hours: StoreHours::default(),
            phone: DEFAULT_PHONE.to_string(),
            delivery_platforms: smallvec![
                "UberEats".to_string(),
                "DoorDash".to_string(),
                "GrubHub".to_string(),
            ],
        }
    }
}

impl StoreConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a value is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let config = Self::from_yaml_str(&contents)?;

        debug!(path = %path.display(), "loaded store config");

        Ok(config)
    }

    /// Parse configuration from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed, or if a value is invalid.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let fixture: StoreConfigFixture = serde_norway::from_str(yaml)?;

        fixture.try_into()
    }

    /// Currency all amounts are expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.limits.currency()
    }

    /// Resolve a delivery platform name, ignoring case.
    pub fn delivery_platform(&self, name: &str) -> Option<&str> {
        self.delivery_platforms
            .iter()
            .find(|platform| platform.eq_ignore_ascii_case(name.trim()))
            .map(String::as_str)
    }

    /// Text of the blocking dialog shown when an order would exceed the limit.
    pub fn limit_message(&self) -> String {
        format!(
            "Order Limit Exceeded\n\nOur max online order amount is {} before taxes & tips. \
             Please call us at {} to place a larger order.",
            self.limits.max_cart_total(),
            self.phone
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoreConfigFixture {
    currency: Option<String>,
    limits: LimitsFixture,
    checkout: CheckoutFixture,
    hours: HoursFixture,
    phone: Option<String>,
    delivery_platforms: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LimitsFixture {
    max_cart_total: Option<String>,
    max_item_quantity: Option<u32>,
    warning_threshold: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CheckoutFixture {
    tax_rate: Option<String>,
    delivery_fee: Option<String>,
    default_tip: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HoursFixture {
    open: Option<Time>,
    close: Option<Time>,
    prep_minutes: Option<u16>,
}

impl TryFrom<StoreConfigFixture> for StoreConfig {
    type Error = ConfigError;

    fn try_from(fixture: StoreConfigFixture) -> Result<Self, Self::Error> {
        let defaults = StoreConfig::default();

        let currency = match &fixture.currency {
            Some(code) => currency_from_code(code)?,
            None => defaults.currency(),
        };

        let max_cart_total = match &fixture.limits.max_cart_total {
            Some(price) => in_currency(parse_price(price)?, currency)?,
            None => Money::from_minor(MAX_CART_TOTAL_MINOR, currency),
        };

        if max_cart_total.is_negative() {
            return Err(ConfigError::InvalidLimit(format!(
                "max_cart_total cannot be negative, got {max_cart_total}"
            )));
        }

        let max_item_quantity = fixture
            .limits
            .max_item_quantity
            .unwrap_or(MAX_ITEM_QUANTITY);

        if max_item_quantity == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_item_quantity must be at least 1".to_string(),
            ));
        }

        let warning_threshold = match &fixture.limits.warning_threshold {
            Some(price) => in_currency(parse_price(price)?, currency)?,
            None => Money::from_minor(WARNING_THRESHOLD_MINOR, currency),
        };

        if warning_threshold.is_negative() {
            return Err(ConfigError::InvalidLimit(format!(
                "warning_threshold cannot be negative, got {warning_threshold}"
            )));
        }

        let hours = StoreHours {
            open: fixture.hours.open.unwrap_or(defaults.hours.open),
            close: fixture.hours.close.unwrap_or(defaults.hours.close),
            prep_minutes: fixture.hours.prep_minutes.unwrap_or(defaults.hours.prep_minutes),
        };

        if hours.open >= hours.close {
            return Err(ConfigError::InvalidHours {
                open: hours.open,
                close: hours.close,
            });
        }

        let checkout = CheckoutSettings {
            tax_rate: fixture
                .checkout
                .tax_rate
                .as_deref()
                .map(parse_rate)
                .transpose()?
                .unwrap_or(defaults.checkout.tax_rate),
            delivery_fee: match &fixture.checkout.delivery_fee {
                Some(price) => in_currency(parse_price(price)?, currency)?,
                None => Money::from_minor(defaults.checkout.delivery_fee.to_minor_units(), currency),
            },
            default_tip: fixture
                .checkout
                .default_tip
                .as_deref()
                .map(parse_rate)
                .transpose()?
                .unwrap_or(defaults.checkout.default_tip),
        };

        Ok(StoreConfig {
            limits: CartLimits::new(max_cart_total, max_item_quantity)
                .with_warning_threshold(warning_threshold),
            checkout,
            hours,
            phone: fixture.phone.unwrap_or(defaults.phone),
            delivery_platforms: fixture
                .delivery_platforms
                .map_or(defaults.delivery_platforms, SmallVec::from_vec),
        })
    }
}

fn in_currency(
    money: Money<'static, Currency>,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, ConfigError> {
    if money.currency() == currency {
        Ok(money)
    } else {
        Err(ConfigError::CurrencyMismatch(
            currency.iso_alpha_code,
            money.currency().iso_alpha_code,
        ))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn empty_document_uses_store_policy() -> TestResult {
        let config = StoreConfig::from_yaml_str("{}")?;

        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.limits.max_item_quantity(), 25);
        assert_eq!(config.limits.max_cart_total(), &Money::from_minor(15_000, USD));

        Ok(())
    }

    #[test]
    fn sections_override_defaults() -> TestResult {
        let config = StoreConfig::from_yaml_str(
            r#"
currency: GBP
limits:
  max_cart_total: "90.00 GBP"
  max_item_quantity: 12
checkout:
  tax_rate: "20%"
phone: "01632 960123"
delivery_platforms: [Deliveroo]
"#,
        )?;

        assert_eq!(config.currency(), GBP);
        assert_eq!(config.limits.max_cart_total(), &Money::from_minor(9_000, GBP));
        assert_eq!(config.limits.max_item_quantity(), 12);
        assert_eq!(config.checkout.tax_rate, Decimal::new(20, 2));
        assert_eq!(config.checkout.delivery_fee, Money::from_minor(399, GBP));
        assert_eq!(config.checkout.default_tip, Decimal::new(18, 2));
        assert_eq!(config.delivery_platform("deliveroo"), Some("Deliveroo"));
        assert_eq!(config.delivery_platform("DoorDash"), None);

        Ok(())
    }

    #[test]
    fn mismatched_currency_is_rejected() {
        let result = StoreConfig::from_yaml_str(
            r#"
limits:
  max_cart_total: "90.00 GBP"
"#,
        );

        assert!(matches!(result, Err(ConfigError::CurrencyMismatch("USD", "GBP"))));
    }

    #[test]
    fn warning_threshold_and_hours_are_configurable() -> TestResult {
        let config = StoreConfig::from_yaml_str(
            r#"
limits:
  warning_threshold: "120.00 USD"
hours:
  open: "07:30"
  close: "19:00"
  prep_minutes: 45
"#,
        )?;

        assert_eq!(config.limits.warning_threshold(), &Money::from_minor(12_000, USD));
        assert_eq!(config.hours.open, Time::constant(7, 30, 0, 0));
        assert_eq!(config.hours.close, Time::constant(19, 0, 0, 0));
        assert_eq!(config.hours.prep_minutes, 45);

        Ok(())
    }

    #[test]
    fn default_warning_threshold_is_below_the_ceiling() -> TestResult {
        let config = StoreConfig::from_yaml_str("{}")?;

        assert_eq!(config.limits.warning_threshold(), &Money::from_minor(13_000, USD));
        assert!(!config.limits.is_near_limit(13_000));
        assert!(config.limits.is_near_limit(13_001));

        Ok(())
    }

    #[test]
    fn negative_warning_threshold_is_rejected() {
        let result = StoreConfig::from_yaml_str(r#"limits: { warning_threshold: "-1.00 USD" }"#);

        assert!(matches!(result, Err(ConfigError::InvalidLimit(_))));
    }

    #[test]
    fn closing_before_opening_is_rejected() {
        let result = StoreConfig::from_yaml_str(r#"hours: { open: "21:00", close: "06:00" }"#);

        assert!(matches!(result, Err(ConfigError::InvalidHours { .. })));
    }

    #[test]
    fn zero_item_quantity_is_rejected() {
        let result = StoreConfig::from_yaml_str("limits: { max_item_quantity: 0 }");

        assert!(matches!(result, Err(ConfigError::InvalidLimit(_))));
    }

    #[test]
    fn bad_rate_is_rejected() {
        let result = StoreConfig::from_yaml_str("checkout: { tax_rate: lots }");

        assert!(matches!(
            result,
            Err(ConfigError::Price(PriceError::InvalidPercentage(_)))
        ));
    }

    #[test]
    fn limit_message_names_ceiling_and_phone() {
        let message = StoreConfig::default().limit_message();

        assert!(message.starts_with("Order Limit Exceeded"));
        assert!(message.contains("$150.00"));
        assert!(message.contains("(908) 933-0123"));
    }
}
