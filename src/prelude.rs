//! Bakehouse prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    allergens::Allergens,
    cart::{
        Cart, CartError, CartLine, CartObserver, LimitExceeded, LineCandidate, LineKey,
        NoopObserver, ObserverList, QuantityUpdate,
    },
    checkout::{
        CheckoutError, CheckoutSettings, CheckoutSummary, Fulfillment, Handoff, OrderHandoff,
        OrderRequest, Tip, place_order,
    },
    config::{ConfigError, StoreConfig},
    customizations::{Customization, CustomizationError},
    limits::{CartLimits, MAX_CART_TOTAL_MINOR, MAX_ITEM_QUANTITY, WARNING_THRESHOLD_MINOR},
    menu::{Menu, MenuError},
    pricing::{PriceError, parse_price, parse_rate},
    products::{Product, ProductKey},
    schedule::{SLOT_MINUTES, StoreHours},
    ticket::{TicketError, write_order, write_ticket},
};
