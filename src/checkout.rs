//! Checkout
//!
//! Turns a cart into an order summary and hands the order off for
//! fulfilment. Pickup orders are handed to the store's phone line; delivery
//! orders to one of the configured third-party platforms. Nothing here
//! takes payment or talks to a point-of-sale system.

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, CartLine, CartObserver},
    config::StoreConfig,
    pricing::{PriceError, rate_of_minor},
};

/// Errors that can occur during checkout.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The requested delivery platform is not offered.
    #[error("delivery platform {0} is not available")]
    UnknownPlatform(String),

    /// A tip cannot be negative.
    #[error("tip cannot be negative")]
    NegativeTip,

    /// A fixed tip or the delivery fee is in a different currency from the
    /// cart (charge currency, cart currency).
    #[error("charge has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// The requested pickup or delivery time is not an open slot.
    #[error("{0} is not an available time")]
    UnavailableTime(DateTime),

    /// Rate application failed.
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// Store-wide checkout charges.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSettings {
    /// Sales tax as a fraction of the subtotal
    pub tax_rate: Decimal,

    /// Flat fee charged on delivery orders
    pub delivery_fee: Money<'static, Currency>,

    /// Suggested tip as a fraction of the subtotal
    pub default_tip: Decimal,
}

impl CheckoutSettings {
    /// The suggested tip.
    pub fn default_tip(&self) -> Tip {
        Tip::Percent(self.default_tip)
    }
}

/// How the order reaches the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fulfillment {
    /// Collected in store.
    Pickup,

    /// Delivered through a third-party platform.
    Delivery {
        /// Platform name, e.g. "DoorDash"
        platform: String,
    },
}

impl Fulfillment {
    /// Whether the order is delivered.
    pub fn is_delivery(&self) -> bool {
        matches!(self, Self::Delivery { .. })
    }
}

/// Gratuity added to the order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tip {
    /// A fraction of the subtotal.
    Percent(Decimal),

    /// A fixed amount.
    Amount(Money<'static, Currency>),
}

/// Order totals. Each component is rounded to whole minor units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutSummary {
    /// Cart total before charges
    pub subtotal: Money<'static, Currency>,

    /// Sales tax on the subtotal
    pub tax: Money<'static, Currency>,

    /// Delivery fee, zero for pickup
    pub delivery_fee: Money<'static, Currency>,

    /// Gratuity
    pub tip: Money<'static, Currency>,

    /// Amount due
    pub total: Money<'static, Currency>,
}

impl CheckoutSummary {
    /// Compute the summary for a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the tip is negative, if the tip or delivery fee is in
    /// another currency, or if a rate calculation overflows.
    pub fn for_cart<O: CartObserver>(
        cart: &Cart<O>,
        settings: &CheckoutSettings,
        fulfillment: &Fulfillment,
        tip: Tip,
    ) -> Result<Self, CheckoutError> {
        let currency = cart.currency();
        let subtotal = cart.total().to_minor_units();

        let tax = rate_of_minor(settings.tax_rate, subtotal)?;

        let delivery_fee = match fulfillment {
            Fulfillment::Delivery { .. } if settings.delivery_fee.currency() != currency => {
                return Err(CheckoutError::CurrencyMismatch(
                    settings.delivery_fee.currency().iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }
            Fulfillment::Delivery { .. } => settings.delivery_fee.to_minor_units(),
            Fulfillment::Pickup => 0,
        };

        let tip = match tip {
            Tip::Percent(rate) if rate.is_sign_negative() => return Err(CheckoutError::NegativeTip),
            Tip::Percent(rate) => rate_of_minor(rate, subtotal)?,
            Tip::Amount(amount) if amount.currency() != currency => {
                return Err(CheckoutError::CurrencyMismatch(
                    amount.currency().iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }
            Tip::Amount(amount) if amount.is_negative() => return Err(CheckoutError::NegativeTip),
            Tip::Amount(amount) => amount.to_minor_units(),
        };

        let total = [tax, delivery_fee, tip]
            .into_iter()
            .try_fold(subtotal, i64::checked_add)
            .ok_or(PriceError::Overflow)?;

        Ok(Self {
            subtotal: Money::from_minor(subtotal, currency),
            tax: Money::from_minor(tax, currency),
            delivery_fee: Money::from_minor(delivery_fee, currency),
            tip: Money::from_minor(tip, currency),
            total: Money::from_minor(total, currency),
        })
    }
}

/// What the customer asked for at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Pickup or delivery
    pub fulfillment: Fulfillment,

    /// Gratuity
    pub tip: Tip,

    /// Requested pickup or delivery slot, as soon as possible when absent
    pub time: Option<DateTime>,

    /// Free-text note for the kitchen
    pub notes: Option<String>,
}

/// Where the order is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    /// Phone the store to confirm a pickup order.
    Phone {
        /// Store phone number
        number: String,
    },

    /// Continue on a delivery platform.
    DeliveryPlatform {
        /// Platform name as configured
        name: String,
    },
}

/// A placed order, ready to be handed off.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderHandoff {
    /// Where the order goes next
    pub handoff: Handoff,

    /// Order totals
    pub summary: CheckoutSummary,

    /// Ordered lines
    pub lines: Vec<CartLine>,

    /// Scheduled slot, as soon as possible when absent
    pub time: Option<DateTime>,

    /// Customer note
    pub notes: Option<String>,
}

/// Place an order for the cart's contents and clear the cart.
///
/// The cart is only cleared when the order is accepted. A requested time must
/// be one of the store's slots still open at `now`.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] for an empty cart,
/// [`CheckoutError::UnknownPlatform`] for a delivery platform the store does
/// not use, [`CheckoutError::UnavailableTime`] for a time outside the open
/// slots, or any error from [`CheckoutSummary::for_cart`].
pub fn place_order<O: CartObserver>(
    cart: &mut Cart<O>,
    config: &StoreConfig,
    request: &OrderRequest,
    now: DateTime,
) -> Result<OrderHandoff, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let handoff = match &request.fulfillment {
        Fulfillment::Pickup => Handoff::Phone {
            number: config.phone.clone(),
        },
        Fulfillment::Delivery { platform } => Handoff::DeliveryPlatform {
            name: config
                .delivery_platform(platform)
                .ok_or_else(|| CheckoutError::UnknownPlatform(platform.clone()))?
                .to_string(),
        },
    };

    if let Some(time) = request.time.filter(|time| !config.hours.offers(now, *time)) {
        return Err(CheckoutError::UnavailableTime(time));
    }

    let summary =
        CheckoutSummary::for_cart(cart, &config.checkout, &request.fulfillment, request.tip)?;

    let lines = cart.lines().cloned().collect();

    cart.clear();

    info!(total = %summary.total, ?handoff, time = ?request.time, "order placed");

    Ok(OrderHandoff {
        handoff,
        summary,
        lines,
        time: request.time,
        notes: request.notes.clone(),
    })
}
