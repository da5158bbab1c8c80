//! Fleet statistics.

use std::io::Write;

use serde_json::Value;
use stockroom_client::ClientConfig;
use stockroom_core::FleetStatistics;
use stockroom_core::types::Money;

use super::{CommandError, connect};

/// Print fleet statistics.
///
/// # Errors
///
/// Returns an error if either statistics request fails.
pub async fn run(config: &ClientConfig, out: &mut impl Write) -> Result<(), CommandError> {
    let inventory = connect(config).await?;
    let stats = inventory.statistics().await?;
    write_statistics(out, &stats)?;
    Ok(())
}

fn write_statistics(out: &mut impl Write, stats: &FleetStatistics) -> std::io::Result<()> {
    writeln!(out, "Products:      {}", stats.total_products)?;
    writeln!(out, "Out of stock:  {}", stats.out_of_stock)?;
    writeln!(out, "Units on hand: {}", stats.total_stock_value)?;
    writeln!(out, "Stock value:   {}", Money::new(stats.total_money_value))?;

    for (title, entries) in [
        ("Most added", &stats.most_added_products),
        ("Most removed", &stats.most_removed_products),
    ] {
        if entries.is_empty() {
            continue;
        }
        writeln!(out, "{title}:")?;
        for entry in entries {
            writeln!(out, "  - {}", describe(entry))?;
        }
    }
    Ok(())
}

/// Ranking entries are opaque; show the name when there is one.
fn describe(entry: &Value) -> String {
    match entry {
        Value::String(s) => s.clone(),
        Value::Object(fields) => fields
            .get("name")
            .and_then(Value::as_str)
            .map_or_else(|| entry.to_string(), str::to_owned),
        other => other.to_string(),
    }
}
