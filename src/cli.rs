//! Command-line ordering
//!
//! Drives a cart from the command line: every `--add` entry is looked up on
//! the menu and added in order, declined entries are reported and skipped,
//! and the resulting ticket is printed. With `--checkout` the order is placed
//! first and only an accepted order is printed, followed by its hand-off.

use std::{io, path::PathBuf, str::FromStr};

use clap::Parser;
use jiff::{
    Zoned,
    civil::{DateTime, Time},
};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::{Cart, LimitExceeded},
    checkout::{CheckoutError, Fulfillment, Handoff, OrderRequest, Tip, place_order},
    config::{ConfigError, StoreConfig},
    menu::{Menu, MenuError},
    pricing::{PriceError, parse_price, parse_rate},
    ticket::{TicketError, write_order, write_ticket},
};

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Menu could not be loaded or queried
    #[error(transparent)]
    Menu(#[from] MenuError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Checkout failed
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Ticket could not be written
    #[error(transparent)]
    Ticket(#[from] TicketError),

    /// Output could not be written
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A tip could not be parsed
    #[error("Invalid tip {0:?}: {1}")]
    InvalidTip(String, PriceError),
}

/// Place a bakery order from the command line
#[derive(Debug, Parser)]
#[command(name = "bakehouse", about = "Build a bakery order and print its ticket")]
pub struct Args {
    /// Menu YAML file
    #[arg(short, long, default_value = "fixtures/menu/cafe.yml")]
    pub menu: PathBuf,

    /// Store configuration YAML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Item to add, as NAME[:QTY][+ADDON,...] (repeatable)
    #[arg(short, long = "add", value_name = "ENTRY")]
    pub entries: Vec<OrderEntry>,

    /// Place the order: "pickup" or a delivery platform name
    #[arg(long, value_name = "FULFILLMENT")]
    pub checkout: Option<String>,

    /// Tip as a percentage ("18%") or a fixed amount ("5.00 USD")
    #[arg(long)]
    pub tip: Option<String>,

    /// Pickup or delivery time today as HH:MM, on a quarter hour
    #[arg(long, value_name = "HH:MM")]
    pub time: Option<Time>,
}

/// An `--add` entry that could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid order entry {0:?}: expected NAME[:QTY][+ADDON,...]")]
pub struct InvalidEntry(pub String);

/// One `--add` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEntry {
    /// Product name
    pub name: String,

    /// Requested quantity
    pub quantity: u32,

    /// Selected add-on ids
    pub customizations: SmallVec<[String; 4]>,
}

impl FromStr for OrderEntry {
    type Err = InvalidEntry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidEntry(s.to_string());

        let (item, addons) = match s.split_once('+') {
            Some((item, addons)) => (item, Some(addons)),
            None => (s, None),
        };

        let (name, quantity) = match item.rsplit_once(':') {
            Some((name, quantity)) => (
                name,
                quantity
                    .trim()
                    .parse::<u32>()
                    .map_err(|_err| invalid())?,
            ),
            None => (item, 1),
        };

        let name = name.trim();

        if name.is_empty() {
            return Err(invalid());
        }

        let customizations = addons
            .into_iter()
            .flat_map(|addons| addons.split(','))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ToString::to_string)
            .collect();

        Ok(Self {
            name: name.to_string(),
            quantity,
            customizations,
        })
    }
}

/// Run an order as of the current local time and write its ticket to `out`.
///
/// # Errors
///
/// See [`run_at`].
pub fn run(args: &Args, out: impl io::Write) -> Result<(), CliError> {
    run_at(args, Zoned::now().datetime(), out)
}

/// Run an order placed at `now` and write its ticket to `out`.
///
/// # Errors
///
/// Returns an error if the menu or config cannot be loaded, an entry names an
/// unknown product, checkout fails, or output cannot be written. A failed
/// checkout writes nothing beyond the skipped-entry notes.
pub fn run_at(args: &Args, now: DateTime, mut out: impl io::Write) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };

    let menu = Menu::load(&args.menu)?;

    let limit_message = config.limit_message();
    let mut cart = Cart::with_observer(config.limits, |event: &LimitExceeded| {
        warn!(attempted = %event.attempted_total, "{limit_message}");
    });

    for entry in &args.entries {
        let (key, _) = menu
            .find_by_name(&entry.name)
            .ok_or_else(|| MenuError::ProductNotFound(entry.name.clone()))?;

        let selected: SmallVec<[&str; 4]> =
            entry.customizations.iter().map(String::as_str).collect();

        let candidate = menu.candidate(key, entry.quantity, &selected)?;

        match cart.add_line(candidate) {
            Ok(_) => info!(name = %entry.name, quantity = entry.quantity, "added to cart"),
            Err(err) => writeln!(out, "Skipped {}: {err}", entry.name)?,
        }
    }

    let Some(fulfillment) = &args.checkout else {
        write_ticket(&mut out, &cart)?;

        return Ok(());
    };

    let fulfillment = if fulfillment.eq_ignore_ascii_case("pickup") {
        Fulfillment::Pickup
    } else {
        Fulfillment::Delivery {
            platform: fulfillment.clone(),
        }
    };

    let tip = match &args.tip {
        Some(tip) => parse_tip(tip)?,
        None => config.checkout.default_tip(),
    };

    let order = place_order(
        &mut cart,
        &config,
        &OrderRequest {
            fulfillment,
            tip,
            time: args.time.map(|time| now.date().to_datetime(time)),
            notes: None,
        },
        now,
    )?;

    write_order(&mut out, &order)?;

    match order.handoff {
        Handoff::Phone { number } => {
            writeln!(out, "Call {number} to confirm your pickup order.")?;
        }
        Handoff::DeliveryPlatform { name } => {
            writeln!(out, "Continue your order on {name}.")?;
        }
    }

    Ok(())
}

/// Parse a tip given as a percentage ("18%"), a fraction ("0.18") or an amount ("5.00 USD").
///
/// # Errors
///
/// Returns [`CliError::InvalidTip`] if the value matches none of these forms.
pub fn parse_tip(s: &str) -> Result<Tip, CliError> {
    if s.split_whitespace().count() == 2 {
        return parse_price(s)
            .map(Tip::Amount)
            .map_err(|err| CliError::InvalidTip(s.to_string(), err));
    }

    parse_rate(s)
        .map(Tip::Percent)
        .map_err(|err| CliError::InvalidTip(s.to_string(), err))
}
