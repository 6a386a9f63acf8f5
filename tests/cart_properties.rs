//! Property tests for the cart invariants: the order ceiling, the per-line
//! quantity cap, product uniqueness and all-or-nothing mutations.

use std::{cell::Cell, collections::HashSet, rc::Rc};

use proptest::{prelude::*, sample::Index};
use rusty_money::{Money, iso::USD};

use bakehouse::prelude::*;

type Item = (&'static str, i64, &'static str);

const PRODUCTS: [Item; 6] = [
    ("Latte", 500, "Coffee"),
    ("Latte", 475, "Tea"),
    ("Sourdough", 1_700, "Breads"),
    ("Spicy Brooklyn Pizza", 1_875, "Pizza"),
    ("Decaf", 0, "Coffee"),
    ("Celebration Cake", 9_999, "Cakes"),
];

#[derive(Debug, Clone)]
enum Op {
    Add { item: Item, quantity: u32 },
    Update { line: Index, quantity: i64 },
    Remove { line: Index },
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        5 => (prop::sample::select(PRODUCTS.to_vec()), 0_u32..40)
            .prop_map(|(item, quantity)| Op::Add { item, quantity }),
        3 => (any::<Index>(), -3_i64..40)
            .prop_map(|(line, quantity)| Op::Update { line, quantity }),
        1 => any::<Index>().prop_map(|line| Op::Remove { line }),
        1 => Just(Op::Clear),
    ]
}

fn candidate((name, minor, category): Item, quantity: u32) -> LineCandidate {
    LineCandidate::new(name, Money::from_minor(minor, USD), quantity, category)
}

proptest! {
    /// Every reachable cart respects the ceiling, the quantity cap and line
    /// uniqueness; declined mutations change nothing and only ceiling
    /// rejections reach the observer.
    #[test]
    fn prop_invariants_hold_across_operations(ops in prop::collection::vec(op(), 1..60)) {
        let calls = Rc::new(Cell::new(0_usize));
        let counter = Rc::clone(&calls);

        let limits = CartLimits::default();
        let mut cart = Cart::with_observer(limits, move |_: &LimitExceeded| {
            counter.set(counter.get() + 1);
        });

        for op in ops {
            let before: Vec<CartLine> = cart.lines().cloned().collect();
            let notified = calls.get();

            let result = match op {
                Op::Add { item, quantity } => cart.add_line(candidate(item, quantity)).map(drop),
                Op::Update { line, quantity } => match before.get(line.index(before.len().max(1))) {
                    Some(existing) => cart.update_quantity(existing.key(), quantity).map(drop),
                    None => Ok(()),
                },
                Op::Remove { line } => {
                    if let Some(existing) = before.get(line.index(before.len().max(1))) {
                        prop_assert!(cart.remove_line(existing.key()).is_some());
                    }

                    Ok(())
                }
                Op::Clear => {
                    cart.clear();

                    Ok(())
                }
            };

            let after: Vec<CartLine> = cart.lines().cloned().collect();

            match result {
                Ok(()) => prop_assert_eq!(calls.get(), notified),
                Err(CartError::LimitExceeded { .. }) => {
                    prop_assert_eq!(&after, &before);
                    prop_assert_eq!(calls.get(), notified + 1);
                }
                Err(_) => {
                    prop_assert_eq!(&after, &before);
                    prop_assert_eq!(calls.get(), notified);
                }
            }

            prop_assert!(cart.total().to_minor_units() <= limits.max_cart_total().to_minor_units());

            let mut seen = HashSet::new();

            for line in &after {
                prop_assert!((1..=limits.max_item_quantity()).contains(&line.quantity()));
                prop_assert!(seen.insert((line.name().to_string(), line.category().to_string())));
            }
        }
    }

    /// A single add is accepted exactly when its clamped line total fits.
    #[test]
    fn prop_single_add_accepted_iff_within_ceiling(
        minor in 0_i64..20_000,
        quantity in 1_u32..60,
    ) {
        let mut cart = Cart::new(CartLimits::default());

        let result = cart.add_line(LineCandidate::new(
            "Special Order",
            Money::from_minor(minor, USD),
            quantity,
            "Catering",
        ));

        let clamped = quantity.min(MAX_ITEM_QUANTITY);
        let fits = minor * i64::from(clamped) <= MAX_CART_TOTAL_MINOR;

        prop_assert_eq!(result.is_ok(), fits);

        if fits {
            prop_assert_eq!(cart.item_count(), u64::from(clamped));
            prop_assert_eq!(cart.total(), Money::from_minor(minor * i64::from(clamped), USD));
        } else {
            prop_assert!(cart.is_empty());
        }
    }

    /// Repeated adds of one product collapse into one clamped line.
    #[test]
    fn prop_repeated_adds_merge_into_one_line(quantities in prop::collection::vec(1_u32..30, 1..10)) {
        let mut cart = Cart::new(CartLimits::default());

        let mut keys = HashSet::new();

        for &quantity in &quantities {
            let key = cart.add_line(LineCandidate::new(
                "Macaron",
                Money::from_minor(325, USD),
                quantity,
                "Pastries",
            ));

            prop_assert!(key.is_ok());
            keys.extend(key.ok());
        }

        let expected = quantities
            .iter()
            .fold(0_u32, |total, &quantity| (total + quantity).min(MAX_ITEM_QUANTITY));

        prop_assert_eq!(keys.len(), 1);
        prop_assert_eq!(cart.len(), 1);
        prop_assert_eq!(cart.item_count(), u64::from(expected));
    }
}
