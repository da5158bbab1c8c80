//! Derived values over a product snapshot.
//!
//! Everything here is a pure function of its input: no I/O, no mutation, no
//! failure modes. Malformed quantities and prices have already been decoded
//! as zero by the model layer, so partial records simply contribute nothing.

use std::cmp::Reverse;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::{Product, Stock};
use crate::types::{SortKey, StockSeverity};

/// Totals above this are healthy.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Sum of quantities across every warehouse holding the product.
#[must_use]
pub fn total_stock(product: &Product) -> i64 {
    product
        .stocks
        .iter()
        .fold(0_i64, |acc, stock| acc.saturating_add(stock.quantity))
}

/// Classify a stock total for display.
#[must_use]
pub const fn stock_severity(total_stock: i64) -> StockSeverity {
    if total_stock > LOW_STOCK_THRESHOLD {
        StockSeverity::Ok
    } else if total_stock > 0 {
        StockSeverity::Low
    } else {
        StockSeverity::Critical
    }
}

/// Monetary value of everything on hand: total stock times unit price.
///
/// Saturates at `Decimal::MAX` (or `MIN`) instead of overflowing.
#[must_use]
pub fn product_value(product: &Product) -> Decimal {
    Decimal::from(total_stock(product)).saturating_mul(product.price)
}

/// Value of a single warehouse's holding at `price`.
#[must_use]
pub fn stock_value(stock: &Stock, price: Decimal) -> Decimal {
    Decimal::from(stock.quantity).saturating_mul(price)
}

/// Catalog-wide statistics.
///
/// The first four fields are computed locally from the snapshot. The last two
/// are reported by the catalog store and carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetStatistics {
    /// Number of products.
    pub total_products: u64,
    /// Products with a total stock of exactly zero.
    pub out_of_stock: u64,
    /// Units on hand across all products.
    pub total_stock_value: i64,
    /// Money on hand across all products.
    pub total_money_value: Decimal,
    /// Store-reported products with the largest additions.
    #[serde(default)]
    pub most_added_products: Vec<serde_json::Value>,
    /// Store-reported products with the largest removals.
    #[serde(default)]
    pub most_removed_products: Vec<serde_json::Value>,
}

/// Statistics the catalog store computes itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStatistics {
    /// The store's own product count, if it reports one.
    #[serde(default)]
    pub total_products: Option<u64>,
    /// Products with the largest additions.
    #[serde(default)]
    pub most_added_products: Vec<serde_json::Value>,
    /// Products with the largest removals.
    #[serde(default)]
    pub most_removed_products: Vec<serde_json::Value>,
}

impl FleetStatistics {
    /// Overlay store-reported fields onto locally computed totals.
    ///
    /// The store's product count wins when present; the ranking lists are
    /// taken as-is.
    #[must_use]
    pub fn merge_remote(mut self, remote: RemoteStatistics) -> Self {
        if let Some(total) = remote.total_products {
            self.total_products = total;
        }
        self.most_added_products = remote.most_added_products;
        self.most_removed_products = remote.most_removed_products;
        self
    }
}

/// Roll up the snapshot in a single pass.
#[must_use]
pub fn fleet_statistics(products: &[Product]) -> FleetStatistics {
    products.iter().fold(
        FleetStatistics::default(),
        |mut stats, product| {
            let total = total_stock(product);
            stats.total_products += 1;
            if total == 0 {
                stats.out_of_stock += 1;
            }
            stats.total_stock_value = stats.total_stock_value.saturating_add(total);
            stats.total_money_value = stats
                .total_money_value
                .saturating_add(product_value(product));
            stats
        },
    )
}

/// Whether a product matches a search query.
///
/// Names match case-insensitively; barcodes match as typed. An empty query
/// matches everything.
#[must_use]
pub fn matches_query(product: &Product, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    product.name.to_lowercase().contains(&query.to_lowercase()) || product.barcode.contains(query)
}

/// Filter then order a snapshot for display.
///
/// The sort is stable, so products that compare equal keep their snapshot
/// order and repeated calls return the same sequence.
#[must_use]
pub fn filter_and_sort<'a>(products: &'a [Product], query: &str, sort_key: SortKey) -> Vec<&'a Product> {
    let mut view: Vec<&Product> = products
        .iter()
        .filter(|product| matches_query(product, query))
        .collect();

    match sort_key {
        SortKey::Name => view.sort_by_cached_key(|p| name_key(&p.name)),
        SortKey::PriceAsc => view.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => view.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::StockAsc => view.sort_by_cached_key(|p| total_stock(p)),
        SortKey::StockDesc => {
            view.sort_by_cached_key(|p| Reverse(total_stock(p)));
        }
    }

    view
}

/// First product whose barcode is exactly `code`.
#[must_use]
pub fn find_by_barcode<'a>(products: &'a [Product], code: &str) -> Option<&'a Product> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    products.iter().find(|p| p.barcode == code)
}

/// Collation key for names.
///
/// Accents and case are ignored first, so `Éclair` sorts between `Abricot`
/// and `Zèbre`. Ties fall back to the case-folded name, then lowercase before
/// uppercase.
fn name_key(name: &str) -> (String, String, Reverse<String>) {
    let base: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    (base, name.to_lowercase(), Reverse(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::Localisation;
    use crate::types::{ProductId, WarehouseId};

    fn product(name: &str, price: i64, quantities: &[i64]) -> Product {
        product_with_barcode(name, "", price, quantities)
    }

    fn product_with_barcode(name: &str, barcode: &str, price: i64, quantities: &[i64]) -> Product {
        Product {
            id: ProductId::new(name.to_lowercase()),
            name: name.to_string(),
            kind: "product".to_string(),
            barcode: barcode.to_string(),
            price: Decimal::from(price),
            supplier: String::new(),
            image: String::new(),
            stocks: quantities
                .iter()
                .zip(1..)
                .map(|(&quantity, id)| Stock {
                    id: WarehouseId::new(id),
                    name: format!("W{id}"),
                    quantity,
                    localisation: Localisation::default(),
                })
                .collect(),
            edited_by: Vec::new(),
        }
    }

    fn apple_and_banana() -> Vec<Product> {
        vec![product("Apple", 10, &[5]), product("Banana", 5, &[0])]
    }

    fn names(view: &[&Product]) -> Vec<String> {
        view.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_total_stock_empty_is_zero_and_critical() {
        let p = product("Empty", 3, &[]);
        assert_eq!(total_stock(&p), 0);
        assert_eq!(stock_severity(total_stock(&p)), StockSeverity::Critical);
    }

    #[test]
    fn test_total_stock_sums_warehouses() {
        assert_eq!(total_stock(&product("P", 1, &[5, 3, -1])), 7);
    }

    #[test]
    fn test_total_stock_of_partial_record() {
        let p: Product = serde_json::from_value(json!({
            "id": 1,
            "name": "Partial",
            "stocks": [{"quantity": 4}, {"name": "no quantity"}, {"quantity": "oops"}]
        }))
        .unwrap();
        assert_eq!(total_stock(&p), 4);
        assert_eq!(product_value(&p), Decimal::ZERO);
    }

    #[test]
    fn test_stock_severity_boundaries() {
        assert_eq!(stock_severity(11), StockSeverity::Ok);
        assert_eq!(stock_severity(10), StockSeverity::Low);
        assert_eq!(stock_severity(1), StockSeverity::Low);
        assert_eq!(stock_severity(0), StockSeverity::Critical);
        assert_eq!(stock_severity(-3), StockSeverity::Critical);
    }

    #[test]
    fn test_product_value_is_exact() {
        let mut p = product("P", 0, &[3, 4]);
        p.price = "19.99".parse().unwrap();
        assert_eq!(product_value(&p), "139.93".parse::<Decimal>().unwrap());
        assert_eq!(product_value(&p), Decimal::from(total_stock(&p)) * p.price);
    }

    #[test]
    fn test_huge_values_saturate() {
        let mut p = product("Bullion", 0, &[10_000_000_000]);
        p.price = "100000000000000000000".parse().unwrap();

        assert_eq!(product_value(&p), Decimal::MAX);
        assert_eq!(stock_value(&p.stocks[0], p.price), Decimal::MAX);

        let stats = fleet_statistics(&[p.clone(), p]);
        assert_eq!(stats.total_money_value, Decimal::MAX);
        assert_eq!(stats.total_stock_value, 20_000_000_000);
    }

    #[test]
    fn test_stock_value() {
        let p = product("P", 4, &[3]);
        assert_eq!(stock_value(&p.stocks[0], p.price), Decimal::from(12));
    }

    #[test]
    fn test_fleet_statistics_scenario() {
        let stats = fleet_statistics(&apple_and_banana());
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.out_of_stock, 1);
        assert_eq!(stats.total_stock_value, 5);
        assert_eq!(stats.total_money_value, Decimal::from(50));
    }

    #[test]
    fn test_fleet_statistics_is_additive() {
        let products = vec![
            product("A", 100, &[5, 3]),
            product("B", 50, &[0]),
            product("C", 2, &[]),
            product("D", 7, &[2, -2]),
        ];
        let stats = fleet_statistics(&products);

        let units: i64 = products.iter().map(total_stock).sum();
        let empty = products.iter().filter(|p| total_stock(p) == 0).count();
        let money: Decimal = products.iter().map(product_value).sum();

        assert_eq!(stats.total_stock_value, units);
        assert_eq!(stats.out_of_stock, empty as u64);
        assert_eq!(stats.total_money_value, money);
        assert_eq!(stats.total_money_value, Decimal::from(800));
    }

    #[test]
    fn test_fleet_statistics_empty_snapshot() {
        assert_eq!(fleet_statistics(&[]), FleetStatistics::default());
    }

    #[test]
    fn test_merge_remote_passes_rankings_through() {
        let remote = RemoteStatistics {
            total_products: Some(3),
            most_added_products: vec![json!({"name": "Apple", "count": 12})],
            most_removed_products: vec![json!("Banana")],
        };
        let merged = fleet_statistics(&apple_and_banana()).merge_remote(remote);

        assert_eq!(merged.total_products, 3);
        assert_eq!(merged.out_of_stock, 1);
        assert_eq!(merged.most_added_products, vec![json!({"name": "Apple", "count": 12})]);
        assert_eq!(merged.most_removed_products, vec![json!("Banana")]);
    }

    #[test]
    fn test_merge_remote_keeps_local_count_when_absent() {
        let merged = fleet_statistics(&apple_and_banana()).merge_remote(RemoteStatistics::default());
        assert_eq!(merged.total_products, 2);
    }

    #[test]
    fn test_sort_scenarios() {
        let products = apple_and_banana();
        assert_eq!(
            names(&filter_and_sort(&products, "", SortKey::PriceDesc)),
            ["Apple", "Banana"]
        );
        assert_eq!(
            names(&filter_and_sort(&products, "", SortKey::StockAsc)),
            ["Banana", "Apple"]
        );
    }

    #[test]
    fn test_filter_is_case_insensitive_on_name() {
        let products = apple_and_banana();
        for query in ["ban", "BAN", "Ban"] {
            assert_eq!(names(&filter_and_sort(&products, query, SortKey::Name)), ["Banana"]);
        }
    }

    #[test]
    fn test_filter_matches_barcode_substring() {
        let products = vec![
            product_with_barcode("Apple", "4006381333931", 1, &[1]),
            product_with_barcode("Banana", "5012345678900", 1, &[1]),
        ];
        assert_eq!(names(&filter_and_sort(&products, "4006381333931", SortKey::Name)), ["Apple"]);
        assert_eq!(names(&filter_and_sort(&products, "123456", SortKey::Name)), ["Banana"]);
        assert!(filter_and_sort(&products, "999", SortKey::Name).is_empty());
    }

    #[test]
    fn test_empty_query_keeps_every_product_once() {
        let products = vec![
            product("cherry", 3, &[1]),
            product("Apple", 1, &[9]),
            product("banana", 2, &[4]),
        ];
        for key in SortKey::ALL {
            let view = filter_and_sort(&products, "", key);
            assert_eq!(view.len(), products.len());
            for p in &products {
                assert_eq!(view.iter().filter(|v| v.id == p.id).count(), 1);
            }
        }
        assert_eq!(
            names(&filter_and_sort(&products, "", SortKey::Name)),
            ["Apple", "banana", "cherry"]
        );
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let products = vec![
            product("First", 5, &[2]),
            product("Second", 5, &[2]),
            product("Third", 1, &[2]),
        ];
        assert_eq!(
            names(&filter_and_sort(&products, "", SortKey::PriceDesc)),
            ["First", "Second", "Third"]
        );
        assert_eq!(
            names(&filter_and_sort(&products, "", SortKey::StockDesc)),
            ["First", "Second", "Third"]
        );
        assert_eq!(
            names(&filter_and_sort(&products, "", SortKey::PriceAsc)),
            ["Third", "First", "Second"]
        );
    }

    #[test]
    fn test_filter_and_sort_is_idempotent() {
        let products = vec![
            product("b", 2, &[3]),
            product("a", 2, &[3]),
            product("B", 1, &[0]),
            product("ab", 9, &[12]),
        ];
        for key in SortKey::ALL {
            let first = filter_and_sort(&products, "b", key);
            let second = filter_and_sort(&products, "b", key);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_name_sort_folds_case() {
        let products = vec![product("b", 1, &[]), product("B", 1, &[]), product("a", 1, &[])];
        assert_eq!(names(&filter_and_sort(&products, "", SortKey::Name)), ["a", "b", "B"]);
    }

    #[test]
    fn test_name_sort_ignores_accents() {
        let products = vec![
            product("Zèbre", 1, &[]),
            product("Éclair", 1, &[]),
            product("Abricot", 1, &[]),
            product("eclair", 1, &[]),
        ];
        assert_eq!(
            names(&filter_and_sort(&products, "", SortKey::Name)),
            ["Abricot", "eclair", "Éclair", "Zèbre"]
        );
    }

    #[test]
    fn test_find_by_barcode_is_exact() {
        let products = vec![
            product_with_barcode("Apple", "12345", 1, &[]),
            product_with_barcode("Banana", "123", 1, &[]),
            product("Cherry", 1, &[]),
        ];
        assert_eq!(find_by_barcode(&products, "123").map(|p| p.name.as_str()), Some("Banana"));
        assert_eq!(find_by_barcode(&products, " 12345\n").map(|p| p.name.as_str()), Some("Apple"));
        assert!(find_by_barcode(&products, "1234").is_none());
        assert!(find_by_barcode(&products, "").is_none());
    }
}
