//! Pricing
//!
//! Parsing of human-written prices and rates, and rate application in minor units.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use thiserror::Error;

/// Errors that can occur while parsing or applying prices and rates.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Rate calculation overflowed.
    #[error("rate calculation overflowed")]
    Overflow,
}

/// Look up a supported currency by ISO code.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] for anything other than USD, GBP or EUR.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, PriceError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "USD" => Ok(USD),
        "GBP" => Ok(GBP),
        "EUR" => Ok(EUR),
        _ => Err(PriceError::UnknownCurrency(code.to_string())),
    }
}

/// Parse a price string (e.g. "5.00 USD") into money.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a decimal number, or if the currency code is not recognised.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, PriceError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PriceError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .trim_start_matches('$')
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or_else(|| PriceError::InvalidPrice(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency_from_code(code)?))
}

/// Parse a rate string into a fraction.
///
/// Accepts "8.75%" (percent points) or "0.0875" (fraction). Negative rates are rejected.
///
/// # Errors
///
/// Returns [`PriceError::InvalidPercentage`] if the string cannot be parsed or is negative.
pub fn parse_rate(s: &str) -> Result<Decimal, PriceError> {
    let trimmed = s.trim();

    let rate = if let Some(points) = trimmed.strip_suffix('%') {
        points
            .trim()
            .parse::<Decimal>()
            .map(|points| points / Decimal::ONE_HUNDRED)
    } else {
        trimmed.parse::<Decimal>()
    }
    .map_err(|_err| PriceError::InvalidPercentage(s.to_string()))?;

    if rate.is_sign_negative() {
        return Err(PriceError::InvalidPercentage(s.to_string()));
    }

    Ok(rate)
}

/// Apply a fractional rate to an amount in minor units, rounding half away from zero.
///
/// # Errors
///
/// Returns [`PriceError::Overflow`] if the result does not fit in minor units.
pub fn rate_of_minor(rate: Decimal, minor: i64) -> Result<i64, PriceError> {
    let Some(minor) = Decimal::from_i64(minor) else {
        return Err(PriceError::Overflow);
    };

    rate.checked_mul(minor)
        .map(|applied| applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_i64())
        .ok_or(PriceError::Overflow)
}
