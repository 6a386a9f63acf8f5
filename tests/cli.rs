//! End-to-end runs of the command-line order flow against the bundled fixtures.

use std::path::PathBuf;

use jiff::civil::{DateTime, date};
use testresult::TestResult;

use bakehouse::{
    checkout::CheckoutError,
    cli::{Args, CliError, run, run_at},
    menu::MenuError,
};

fn morning() -> DateTime {
    date(2026, 10, 19).at(10, 7, 0, 0)
}

fn args(entries: &[&str], checkout: Option<&str>) -> anyhow::Result<Args> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures");

    Ok(Args {
        menu: root.join("menu/cafe.yml"),
        config: Some(root.join("config/store.yml")),
        entries: entries
            .iter()
            .map(|entry| entry.parse())
            .collect::<Result<_, _>>()?,
        checkout: checkout.map(ToString::to_string),
        tip: None,
        time: None,
    })
}

#[test]
fn ticket_without_checkout() -> TestResult {
    let mut out = Vec::new();

    run(&args(&["Latte:2+oat-milk", "Butter Croissant"], None)?, &mut out)?;

    let output = String::from_utf8(out)?;

    assert!(output.contains("Latte (Oat Milk)"));
    assert!(output.contains("Butter Croissant"));
    assert!(output.contains("$15.70"));
    assert!(!output.contains("Tax"));

    Ok(())
}

#[test]
fn over_limit_entries_are_skipped() -> TestResult {
    let mut out = Vec::new();

    run(
        &args(&["Sourdough:8", "Latte:3", "Latte:2"], None)?,
        &mut out,
    )?;

    let output = String::from_utf8(out)?;

    assert!(output.contains("Skipped Latte: order limit exceeded"));
    assert!(output.contains("$146.00"));
    assert!(output.contains("approaching the $150.00 online limit ($4.00 remaining)"));

    Ok(())
}

#[test]
fn pickup_checkout_hands_off_to_the_phone_line() -> TestResult {
    let mut out = Vec::new();

    run(&args(&["Sourdough"], Some("pickup"))?, &mut out)?;

    let output = String::from_utf8(out)?;

    assert!(output.contains("Tax:"));
    assert!(output.contains("$1.49"));
    assert!(output.contains("Call (908) 933-0123"));

    Ok(())
}

#[test]
fn delivery_checkout_names_the_platform() -> TestResult {
    let mut out = Vec::new();

    run(&args(&["Cappuccino:2"], Some("ubereats"))?, &mut out)?;

    let output = String::from_utf8(out)?;

    assert!(output.contains("$3.99"));
    assert!(output.contains("Continue your order on UberEats."));

    Ok(())
}

#[test]
fn unknown_product_fails_the_run() -> TestResult {
    let result = run(&args(&["Bagel"], None)?, Vec::new());

    assert!(matches!(
        result,
        Err(CliError::Menu(MenuError::ProductNotFound(name))) if name == "Bagel"
    ));

    Ok(())
}

#[test]
fn unknown_platform_prints_no_ticket() -> TestResult {
    let mut out = Vec::new();

    let result = run_at(&args(&["Sourdough"], Some("Postmates"))?, morning(), &mut out);

    assert!(matches!(
        result,
        Err(CliError::Checkout(CheckoutError::UnknownPlatform(name))) if name == "Postmates"
    ));
    assert!(out.is_empty());

    Ok(())
}

#[test]
fn empty_checkout_prints_no_ticket() -> TestResult {
    let mut out = Vec::new();

    let result = run_at(&args(&[], Some("pickup"))?, morning(), &mut out);

    assert!(matches!(
        result,
        Err(CliError::Checkout(CheckoutError::EmptyCart))
    ));
    assert!(out.is_empty());

    Ok(())
}

#[test]
fn scheduled_pickup_names_the_slot() -> TestResult {
    let mut args = args(&["Sourdough"], Some("pickup"))?;
    args.time = Some("10:45".parse()?);

    let mut out = Vec::new();
    run_at(&args, morning(), &mut out)?;

    let output = String::from_utf8(out)?;

    assert!(output.contains("Ready at 10:45 on 2026-10-19."));
    assert!(output.contains("Call (908) 933-0123"));

    Ok(())
}

#[test]
fn slot_inside_prep_time_is_refused() -> TestResult {
    let mut args = args(&["Sourdough"], Some("pickup"))?;
    args.time = Some("10:30".parse()?);

    let mut out = Vec::new();
    let result = run_at(&args, morning(), &mut out);

    assert!(matches!(
        result,
        Err(CliError::Checkout(CheckoutError::UnavailableTime(slot)))
            if slot == date(2026, 10, 19).at(10, 30, 0, 0)
    ));
    assert!(out.is_empty());

    Ok(())
}
