//! Ticket
//!
//! Plain-text rendering of a cart, and of a placed order with its totals.

use std::io;

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine, CartObserver},
    checkout::OrderHandoff,
};

/// Errors that can occur when writing a ticket.
#[derive(Debug, Error)]
pub enum TicketError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Write the cart lines as a table, followed by the item count and subtotal.
///
/// Carts above the warning threshold get a note naming the order ceiling and
/// what is left under it.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_ticket<O: CartObserver>(
    mut out: impl io::Write,
    cart: &Cart<O>,
) -> Result<(), TicketError> {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty")?;

        return Ok(());
    }

    write_lines(&mut out, cart.lines())?;
    write_summary(
        &mut out,
        &[
            ("Items", cart.item_count().to_string()),
            ("Subtotal", cart.total().to_string()),
        ],
    )?;

    if cart.is_near_limit() {
        writeln!(
            out,
            "\nYour order is approaching the {} online limit ({} remaining).",
            cart.limits().max_cart_total(),
            cart.remaining()
        )?;
    }

    Ok(())
}

/// Write a placed order's lines and totals.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_order(mut out: impl io::Write, order: &OrderHandoff) -> Result<(), TicketError> {
    write_lines(&mut out, &order.lines)?;

    let summary = &order.summary;

    write_summary(
        &mut out,
        &[
            ("Subtotal", summary.subtotal.to_string()),
            ("Tax", summary.tax.to_string()),
            ("Delivery", summary.delivery_fee.to_string()),
            ("Tip", summary.tip.to_string()),
            ("Total", summary.total.to_string()),
        ],
    )?;

    if let Some(time) = order.time {
        writeln!(out, "\nReady at {} on {}.", time.time().strftime("%H:%M"), time.date())?;
    }

    if let Some(notes) = &order.notes {
        writeln!(out, "Note: {notes}")?;
    }

    Ok(())
}

fn write_lines<'a>(
    out: &mut impl io::Write,
    lines: impl IntoIterator<Item = &'a CartLine>,
) -> Result<(), TicketError> {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Category", "Unit Price", "Qty", "Line Total"]);

    for line in lines {
        builder.push_record([
            line.name().to_string(),
            line.category().to_string(),
            line.unit_price().to_string(),
            line.quantity().to_string(),
            line.line_total().to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..5), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

fn write_summary(out: &mut impl io::Write, rows: &[(&str, String)]) -> Result<(), TicketError> {
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, " {label:>label_width$}:  {value:>value_width$}")?;
    }

    Ok(())
}
