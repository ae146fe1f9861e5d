//! Balance engine: stock per (product, location) derived by replaying the ledger.
//!
//! Current stock is never stored. Each product's standing quantity seeds its
//! location, then every movement is folded in timestamp order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockroom_core::{LocationId, ProductId};

use crate::names::NameBook;
use crate::{Location, Movement, Product};

/// One line of the balance report.
///
/// `qty` is wider than any single stored quantity so that folding `i64` inputs
/// cannot overflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRow {
    pub product_name: String,
    pub location_name: String,
    pub qty: i128,
}

impl BalanceRow {
    pub fn new(product_name: impl Into<String>, location_name: impl Into<String>, qty: i128) -> Self {
        Self {
            product_name: product_name.into(),
            location_name: location_name.into(),
            qty,
        }
    }
}

/// Net quantity per (product, location), zero entries included.
///
/// Movements are replayed in ascending `(timestamp, id)` order whatever order
/// they are passed in. Balances may go negative.
pub fn fold_ledger(products: &[Product], movements: &[Movement]) -> BTreeMap<(ProductId, LocationId), i128> {
    let mut ledger = BTreeMap::new();

    for product in products {
        if let Some((location_id, qty)) = product.seeded_stock() {
            *ledger.entry((product.id, location_id)).or_insert(0) += i128::from(qty);
        }
    }

    let mut ordered: Vec<&Movement> = movements.iter().collect();
    ordered.sort_by_key(|m| (m.timestamp, m.id));

    for movement in ordered {
        for (key, delta) in movement.deltas() {
            *ledger.entry(key).or_insert(0) += delta;
        }
    }

    ledger
}

/// Balance report rows: non-zero balances with display names, sorted by
/// `(product_name, location_name)` in ordinal string order.
pub fn compute_balances(products: &[Product], locations: &[Location], movements: &[Movement]) -> Vec<BalanceRow> {
    let names = NameBook::new(products, locations);

    let mut rows: Vec<BalanceRow> = fold_ledger(products, movements)
        .into_iter()
        .filter(|(_, qty)| *qty != 0)
        .map(|((product_id, location_id), qty)| {
            BalanceRow::new(
                names.product_name(product_id),
                names.location_name(Some(location_id)),
                qty,
            )
        })
        .collect();

    rows.sort_by(|a, b| {
        (a.product_name.as_str(), a.location_name.as_str())
            .cmp(&(b.product_name.as_str(), b.location_name.as_str()))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use stockroom_core::MovementId;

    use crate::names::{UNKNOWN_LOCATION, UNKNOWN_PRODUCT};
    use crate::{LocationFields, ProductFields};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn product(id: i64, name: &str, quantity: i64, location: Option<i64>) -> Product {
        Product::from_fields(
            ProductId::new(id),
            ProductFields {
                name: name.to_string(),
                description: None,
                quantity,
                location_id: location.map(LocationId::new),
            },
        )
    }

    fn location(id: i64, name: &str) -> Location {
        Location::from_fields(LocationId::new(id), LocationFields::named(name))
    }

    fn movement(id: i64, minutes: i64, product: i64, from: Option<i64>, to: Option<i64>, qty: i64) -> Movement {
        Movement {
            id: MovementId::new(id),
            timestamp: t0() + Duration::minutes(minutes),
            product_id: ProductId::new(product),
            from_location: from.map(LocationId::new),
            to_location: to.map(LocationId::new),
            qty,
        }
    }

    fn widget_world() -> (Vec<Product>, Vec<Location>) {
        (
            vec![product(1, "Widget", 10, Some(1))],
            vec![location(1, "Warehouse"), location(2, "Store")],
        )
    }

    #[test]
    fn seeded_stock_alone_is_reported() {
        let (products, locations) = widget_world();
        let rows = compute_balances(&products, &locations, &[]);
        assert_eq!(rows, vec![BalanceRow::new("Widget", "Warehouse", 10)]);
    }

    #[test]
    fn transfer_splits_stock_across_locations() {
        let (products, locations) = widget_world();
        let moves = vec![movement(1, 1, 1, Some(1), Some(2), 4)];

        let rows = compute_balances(&products, &locations, &moves);
        assert_eq!(
            rows,
            vec![
                BalanceRow::new("Widget", "Store", 4),
                BalanceRow::new("Widget", "Warehouse", 6),
            ]
        );
    }

    #[test]
    fn emptied_location_is_dropped() {
        let (products, locations) = widget_world();
        let moves = vec![
            movement(1, 1, 1, Some(1), Some(2), 4),
            movement(2, 2, 1, Some(1), Some(2), 6),
        ];

        let rows = compute_balances(&products, &locations, &moves);
        assert_eq!(rows, vec![BalanceRow::new("Widget", "Store", 10)]);
    }

    #[test]
    fn product_without_location_seeds_nothing() {
        let products = vec![product(1, "Widget", 25, None)];
        assert!(compute_balances(&products, &[], &[]).is_empty());
    }

    #[test]
    fn negative_balances_are_kept() {
        let (products, locations) = widget_world();
        let moves = vec![movement(1, 1, 1, Some(2), None, 3)];

        let rows = compute_balances(&products, &locations, &moves);
        assert_eq!(
            rows,
            vec![
                BalanceRow::new("Widget", "Store", -3),
                BalanceRow::new("Widget", "Warehouse", 10),
            ]
        );
    }

    #[test]
    fn dangling_references_use_placeholders() {
        let products = vec![product(1, "Widget", 0, None)];
        let locations = vec![location(1, "Warehouse")];
        let moves = vec![
            movement(1, 1, 99, None, Some(1), 2),
            movement(2, 2, 1, None, Some(42), 5),
        ];

        let rows = compute_balances(&products, &locations, &moves);
        assert_eq!(
            rows,
            vec![
                BalanceRow::new(UNKNOWN_PRODUCT, "Warehouse", 2),
                BalanceRow::new("Widget", UNKNOWN_LOCATION, 5),
            ]
        );
    }

    #[test]
    fn rows_sort_by_product_then_location_ordinally() {
        let products = vec![
            product(1, "b-widget", 1, Some(1)),
            product(2, "Zebra", 1, Some(2)),
            product(3, "Zebra", 1, Some(1)),
        ];
        let locations = vec![location(1, "aisle"), location(2, "Aisle")];

        let rows = compute_balances(&products, &locations, &[]);
        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.product_name.as_str(), r.location_name.as_str()))
            .collect();
        // Uppercase sorts before lowercase in ordinal order.
        assert_eq!(keys, vec![("Zebra", "Aisle"), ("Zebra", "aisle"), ("b-widget", "aisle")]);
    }

    #[test]
    fn replay_order_follows_timestamps_not_input_order() {
        let (products, locations) = widget_world();
        let forward = vec![
            movement(1, 1, 1, Some(1), Some(2), 4),
            movement(2, 5, 1, Some(2), None, 1),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(
            fold_ledger(&products, &forward),
            fold_ledger(&products, &backward)
        );
        assert_eq!(
            compute_balances(&products, &locations, &backward),
            vec![
                BalanceRow::new("Widget", "Store", 3),
                BalanceRow::new("Widget", "Warehouse", 6),
            ]
        );
    }

    #[test]
    fn balances_past_i64_range_do_not_wrap() {
        let products = vec![product(1, "Widget", i64::MAX, Some(1))];
        let locations = vec![location(1, "Warehouse")];
        let moves = vec![
            movement(1, 1, 1, None, Some(1), 1),
            movement(2, 2, 1, None, Some(1), i64::MAX),
        ];

        let rows = compute_balances(&products, &locations, &moves);
        let expected = i128::from(i64::MAX) * 2 + 1;
        assert_eq!(rows, vec![BalanceRow::new("Widget", "Warehouse", expected)]);
    }

    #[test]
    fn drain_below_i64_min_does_not_wrap() {
        let products = vec![product(1, "Widget", i64::MIN, Some(1))];
        let locations = vec![location(1, "Warehouse")];
        let moves = vec![movement(1, 1, 1, Some(1), None, 1)];

        let rows = compute_balances(&products, &locations, &moves);
        assert_eq!(rows[0].qty, i128::from(i64::MIN) - 1);
    }

    #[test]
    fn fold_ledger_keeps_zero_entries() {
        let (products, _) = widget_world();
        let moves = vec![movement(1, 1, 1, Some(1), None, 10)];
        let ledger = fold_ledger(&products, &moves);
        assert_eq!(ledger.get(&(ProductId::new(1), LocationId::new(1))), Some(&0));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_products() -> impl Strategy<Value = Vec<Product>> {
            prop::collection::vec((-50i64..50, prop::option::of(1i64..5)), 0..6).prop_map(|specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (qty, loc))| product(i as i64 + 1, &format!("P{i}"), qty, loc))
                    .collect()
            })
        }

        fn arb_movements(same_instant: bool) -> impl Strategy<Value = Vec<Movement>> {
            prop::collection::vec(
                (
                    1i64..8,
                    prop::option::of(1i64..5),
                    prop::option::of(1i64..5),
                    1i64..30,
                    0i64..10,
                ),
                0..20,
            )
            .prop_map(move |specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (pid, from, to, qty, minute))| {
                        let minute = if same_instant { 0 } else { minute };
                        movement(i as i64 + 1, minute, pid, from, to, qty)
                    })
                    .collect()
            })
        }

        fn locations() -> Vec<Location> {
            (1..5).map(|i| location(i, &format!("L{i}"))).collect()
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: the report never contains a zero balance.
            #[test]
            fn no_zero_rows(products in arb_products(), moves in arb_movements(false)) {
                let rows = compute_balances(&products, &locations(), &moves);
                prop_assert!(rows.iter().all(|r| r.qty != 0));
            }

            /// Property: permuting movements that share a timestamp changes nothing.
            #[test]
            fn same_instant_permutation_is_invisible(
                products in arb_products(),
                (moves, shuffled) in arb_movements(true)
                    .prop_flat_map(|m| (Just(m.clone()), Just(m).prop_shuffle())),
            ) {
                prop_assert_eq!(
                    compute_balances(&products, &locations(), &moves),
                    compute_balances(&products, &locations(), &shuffled)
                );
            }

            /// Property: the ledger conserves every seeded and moved unit.
            #[test]
            fn ledger_total_matches_inputs(products in arb_products(), moves in arb_movements(false)) {
                let seeded: i64 = products.iter().filter_map(|p| p.seeded_stock()).map(|(_, q)| q).sum();
                let moved: i128 = moves.iter().flat_map(|m| m.deltas()).map(|(_, d)| d).sum();
                let total: i128 = fold_ledger(&products, &moves).values().sum();
                prop_assert_eq!(total, i128::from(seeded) + moved);

                let reported: i128 = compute_balances(&products, &locations(), &moves).iter().map(|r| r.qty).sum();
                prop_assert_eq!(reported, total);
            }
        }
    }
}
