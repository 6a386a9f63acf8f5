//! Bakehouse
//!
//! Shopping cart, menu catalog and checkout for a bakery & café's online
//! ordering. The cart enforces a per-line quantity cap and a maximum order
//! value; every declined mutation leaves it exactly as it was.

pub mod allergens;
pub mod cart;
pub mod checkout;
pub mod cli;
pub mod config;
pub mod customizations;
pub mod limits;
pub mod menu;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod schedule;
pub mod ticket;
