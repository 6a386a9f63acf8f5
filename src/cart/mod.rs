//! Cart
//!
//! The shopping cart and the rules that govern it. Every mutation is
//! check-then-commit: the prospective total is computed first and the stored
//! state is only touched when every invariant still holds afterwards.
//!
//! - Lines are unique by `(name, category)`; adding a duplicate merges quantities.
//! - Every line quantity is within `1..=max_item_quantity`; a non-positive
//!   quantity update removes the line instead.
//! - The cart total never exceeds `max_cart_total`. A mutation that would breach
//!   it is declined in full and reported to the [`CartObserver`].

use std::fmt;

use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::limits::CartLimits;

pub mod line;
pub mod observer;

pub use line::{CartLine, LineCandidate, LineKey};
pub use observer::{CartObserver, LimitExceeded, NoopObserver, ObserverList};

use line::line_total_minor;

/// Errors returned by cart mutations. The cart is unchanged whenever one is returned.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The mutation would push the cart total above the order ceiling.
    #[error("order limit exceeded: {attempted} is over the {limit} maximum")]
    LimitExceeded {
        /// Total the cart would have had
        attempted: Money<'static, Currency>,
        /// Configured ceiling
        limit: Money<'static, Currency>,
    },

    /// The referenced line does not exist.
    #[error("cart line {0:?} not found")]
    NotFound(LineKey),

    /// A candidate was offered with a zero quantity.
    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    /// A candidate was offered with a negative unit price.
    #[error("unit price {0} is negative")]
    NegativePrice(Money<'static, Currency>),

    /// A candidate's currency differs from the cart currency (item currency, cart currency).
    #[error("item has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Outcome of a successful [`Cart::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now holds this (possibly clamped) quantity.
    Updated(u32),

    /// The requested quantity was not positive, so the line was removed (if present).
    Removed,
}

/// Shopping cart
pub struct Cart<O: CartObserver = NoopObserver> {
    lines: SlotMap<LineKey, CartLine>,
    order: Vec<LineKey>,
    limits: CartLimits,
    observer: O,
}

impl Cart<NoopObserver> {
    /// Create an empty cart that nobody listens to.
    #[must_use]
    pub fn new(limits: CartLimits) -> Self {
        Self::with_observer(limits, NoopObserver)
    }
}

impl Default for Cart<NoopObserver> {
    fn default() -> Self {
        Self::new(CartLimits::default())
    }
}

impl<O: CartObserver> Cart<O> {
    /// Create an empty cart that reports declined mutations to `observer`.
    pub fn with_observer(limits: CartLimits, observer: O) -> Self {
        Self {
            lines: SlotMap::with_key(),
            order: Vec::new(),
            limits,
            observer,
        }
    }

    /// Rebuild a cart from previously held candidates.
    ///
    /// Duplicates are merged and quantities clamped as [`Cart::add_line`] would.
    /// If any candidate is malformed or the combined total exceeds the ceiling,
    /// the whole state is discarded and the cart starts empty.
    pub fn restore(
        limits: CartLimits,
        candidates: impl IntoIterator<Item = LineCandidate>,
        observer: O,
    ) -> Self {
        let mut cart = Self::with_observer(limits, observer);

        for candidate in candidates {
            if let Err(err) = cart.validate(&candidate) {
                warn!(%err, name = %candidate.name, "discarding restored cart");
                cart.clear();
                return cart;
            }

            cart.stage(candidate);
        }

        let total = cart.total_minor();

        if cart.limits.exceeds(total) {
            warn!(
                total = %cart.money(total),
                limit = %cart.limits.max_cart_total(),
                "discarding restored cart over the order limit"
            );
            cart.clear();
        }

        cart
    }

    /// Add a candidate, merging it into an existing line for the same product.
    ///
    /// Returns the key of the new or merged line.
    ///
    /// # Errors
    ///
    /// - [`CartError::LimitExceeded`]: the resulting total would exceed the ceiling.
    /// - [`CartError::InvalidQuantity`], [`CartError::NegativePrice`],
    ///   [`CartError::CurrencyMismatch`]: the candidate is malformed.
    pub fn add_line(&mut self, candidate: LineCandidate) -> Result<LineKey, CartError> {
        self.validate(&candidate)?;

        let quantity = self.limits.clamp_quantity(candidate.quantity);
        let current_total = self.total_minor();

        let existing = self
            .find_same_product(&candidate.name, &candidate.category)
            .map(|line| {
                (
                    line.key(),
                    line.quantity(),
                    line.unit_price().to_minor_units(),
                    line.line_total_minor(),
                )
            });

        if let Some((key, existing_quantity, unit_minor, existing_total)) = existing {
            let merged = self
                .limits
                .clamp_quantity(existing_quantity.saturating_add(quantity));

            let prospective = current_total
                .saturating_sub(existing_total)
                .saturating_add(line_total_minor(unit_minor, merged));

            self.check_ceiling(prospective)?;

            if let Some(line) = self.lines.get_mut(key) {
                line.set_quantity(merged);
            }

            debug!(name = %candidate.name, quantity = merged, "merged cart line");

            return Ok(key);
        }

        let prospective = current_total.saturating_add(line_total_minor(
            candidate.unit_price.to_minor_units(),
            quantity,
        ));

        self.check_ceiling(prospective)?;

        debug!(name = %candidate.name, quantity, "added cart line");

        Ok(self.insert(candidate, quantity))
    }

    /// Set a line's quantity.
    ///
    /// A quantity of zero or less removes the line and always succeeds. Larger
    /// quantities are clamped to the per-line cap before the ceiling check.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotFound`]: no line has this key.
    /// - [`CartError::LimitExceeded`]: the resulting total would exceed the ceiling.
    pub fn update_quantity(
        &mut self,
        key: LineKey,
        quantity: i64,
    ) -> Result<QuantityUpdate, CartError> {
        if quantity <= 0 {
            self.remove_line(key);

            return Ok(QuantityUpdate::Removed);
        }

        let quantity = self
            .limits
            .clamp_quantity(u32::try_from(quantity).unwrap_or(u32::MAX));

        let line = self.lines.get(key).ok_or(CartError::NotFound(key))?;

        let prospective = self
            .total_minor()
            .saturating_sub(line.line_total_minor())
            .saturating_add(line_total_minor(line.unit_price().to_minor_units(), quantity));

        self.check_ceiling(prospective)?;

        if let Some(line) = self.lines.get_mut(key) {
            line.set_quantity(quantity);
        }

        debug!(?key, quantity, "updated cart line quantity");

        Ok(QuantityUpdate::Updated(quantity))
    }

    /// Remove a line if present, returning it.
    pub fn remove_line(&mut self, key: LineKey) -> Option<CartLine> {
        let line = self.lines.remove(key)?;

        self.order.retain(|&k| k != key);

        debug!(name = %line.name(), "removed cart line");

        Some(line)
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.order.clear();
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines().map(|line| u64::from(line.quantity())).sum()
    }

    /// Sum of `unit_price × quantity` across all lines.
    pub fn total(&self) -> Money<'static, Currency> {
        self.money(self.total_minor())
    }

    /// Whether the total is above the warning threshold, close to the ceiling.
    pub fn is_near_limit(&self) -> bool {
        self.limits.is_near_limit(self.total_minor())
    }

    /// How much more can be added before the ceiling is reached.
    pub fn remaining(&self) -> Money<'static, Currency> {
        let ceiling = self.limits.max_cart_total().to_minor_units();

        self.money(ceiling.saturating_sub(self.total_minor()).max(0))
    }

    /// Look up a line.
    pub fn line(&self, key: LineKey) -> Option<&CartLine> {
        self.lines.get(key)
    }

    /// Iterate over lines in insertion order.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.order.iter().filter_map(|&key| self.lines.get(key))
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The limits this cart enforces.
    pub fn limits(&self) -> &CartLimits {
        &self.limits
    }

    /// The cart currency.
    pub fn currency(&self) -> &'static Currency {
        self.limits.currency()
    }

    /// The registered observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// The registered observer, mutably.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    fn validate(&self, candidate: &LineCandidate) -> Result<(), CartError> {
        if candidate.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let item_currency = candidate.unit_price.currency();

        if item_currency != self.currency() {
            return Err(CartError::CurrencyMismatch(
                item_currency.iso_alpha_code,
                self.currency().iso_alpha_code,
            ));
        }

        if candidate.unit_price.is_negative() {
            return Err(CartError::NegativePrice(candidate.unit_price));
        }

        Ok(())
    }

    fn check_ceiling(&mut self, prospective: i64) -> Result<(), CartError> {
        if !self.limits.exceeds(prospective) {
            return Ok(());
        }

        let event = LimitExceeded {
            attempted_total: self.money(prospective),
            limit: *self.limits.max_cart_total(),
        };

        warn!(
            attempted = %event.attempted_total,
            limit = %event.limit,
            "declined cart mutation over the order limit"
        );

        self.observer.on_limit_exceeded(&event);

        Err(CartError::LimitExceeded {
            attempted: event.attempted_total,
            limit: event.limit,
        })
    }

    /// Merge or append without checking the ceiling.
    fn stage(&mut self, candidate: LineCandidate) {
        let quantity = self.limits.clamp_quantity(candidate.quantity);

        let existing = self
            .find_same_product(&candidate.name, &candidate.category)
            .map(CartLine::key);

        match existing.and_then(|key| self.lines.get_mut(key)) {
            Some(line) => {
                let merged = self
                    .limits
                    .clamp_quantity(line.quantity().saturating_add(quantity));

                line.set_quantity(merged);
            }
            None => {
                self.insert(candidate, quantity);
            }
        }
    }

    fn insert(&mut self, candidate: LineCandidate, quantity: u32) -> LineKey {
        let key = self
            .lines
            .insert_with_key(|key| CartLine::from_candidate(key, candidate, quantity));

        self.order.push(key);

        key
    }

    fn find_same_product(&self, name: &str, category: &str) -> Option<&CartLine> {
        self.lines()
            .find(|line| line.is_same_product(name, category))
    }

    fn total_minor(&self) -> i64 {
        self.lines()
            .fold(0_i64, |acc, line| acc.saturating_add(line.line_total_minor()))
    }

    fn money(&self, minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, self.currency())
    }
}

impl<O: CartObserver> fmt::Debug for Cart<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("lines", &self.lines().collect::<Vec<_>>())
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}
