/// Output formatting: terminal table and JSON.
use pizzarank_core::{RankedEntry, SortState};
use serde::Serialize;

#[derive(Serialize)]
struct JsonRankedEntry<'a> {
    rank: usize,
    value_rank: u8,
    name: &'a str,
    quantity: u32,
    diameter: f64,
    unit_price: f64,
    price_per_area: f64,
    total_area: f64,
    total_price: f64,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    sort: SortState,
    entries: Vec<JsonRankedEntry<'a>>,
}

/// Render the ranked list as a formatted terminal table.
pub fn render_table(ranked: &[RankedEntry], sort: SortState) -> String {
    if ranked.is_empty() {
        return "No offers yet.\n".to_string();
    }

    // Find the widest offer name for padding
    let name_width = ranked
        .iter()
        .map(|r| r.entry.name().chars().count())
        .max()
        .unwrap_or(4)
        .max(4); // at least "Name"

    let mut out = String::new();
    out.push_str(&format!(
        "Rank | Value | {:<name_width$} | Qty | Diameter |  Price | Price/area |  Area |  Total\n",
        "Name"
    ));
    out.push_str(&format!(
        "-----|-------|-{}-|-----|----------|--------|------------|-------|-------\n",
        "-".repeat(name_width)
    ));

    for r in ranked {
        let e = &r.entry;
        out.push_str(&format!(
            "{:>4} | {:>5} | {:<name_width$} | {:>3} | {:>8} | {:>6.2} | {:>10.4} | {:>5.0} | {:>6.2}\n",
            r.rank,
            r.value_rank,
            e.name(),
            e.quantity(),
            e.diameter(),
            e.unit_price(),
            e.price_per_area(),
            e.total_area().round(),
            e.total_price(),
        ));
    }

    out.push_str(&format!(
        "\n{} offers, sorted by {} ({})\n",
        ranked.len(),
        sort.key,
        sort.direction,
    ));
    out
}

/// Print the ranked list as a formatted terminal table.
pub fn print_table(ranked: &[RankedEntry], sort: SortState) {
    print!("{}", render_table(ranked, sort));
}

pub fn render_json(ranked: &[RankedEntry], sort: SortState) -> String {
    let entries = ranked
        .iter()
        .map(|r| JsonRankedEntry {
            rank: r.rank,
            value_rank: r.value_rank,
            name: r.entry.name(),
            quantity: r.entry.quantity(),
            diameter: r.entry.diameter(),
            unit_price: r.entry.unit_price(),
            price_per_area: r.entry.price_per_area(),
            total_area: r.entry.total_area(),
            total_price: r.entry.total_price(),
        })
        .collect();

    let output = JsonOutput { sort, entries };
    // Only strings and finite numbers, serialization cannot fail.
    serde_json::to_string_pretty(&output).unwrap_or_default()
}

/// Print results as JSON.
pub fn print_json(ranked: &[RankedEntry], sort: SortState) {
    println!("{}", render_json(ranked, sort));
}
