//! Renders a tour into three CSV sheets: preparation items, entries and an
//! income/expense/profit summary. Consumes only read-only records already
//! normalized through the rate table.

use crate::core::currency::RateTable;
use crate::core::model::Tour;
use crate::core::stats::tour_stats;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub fn run(tour: &Tour, rates: &RateTable, out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output dir {}", out_dir.display()))?;

    let base = sanitize_file_stem(&tour.name);
    let prep = write_prep_sheet(tour, rates, &sheet_path(out_dir, &base, "prep"))?;
    let entries = write_entries_sheet(tour, rates, &sheet_path(out_dir, &base, "entries"))?;
    let summary = write_summary_sheet(tour, rates, &sheet_path(out_dir, &base, "summary"))?;

    for path in [prep, entries, summary] {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn sheet_path(out_dir: &Path, base: &str, sheet: &str) -> PathBuf {
    out_dir.join(format!("{base}-report-{sheet}.csv"))
}

/// Keeps the tour name readable in a file name without letting it escape
/// the output directory.
fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    if cleaned.is_empty() {
        "tour".to_string()
    } else {
        cleaned
    }
}

fn write_prep_sheet(tour: &Tour, rates: &RateTable, path: &Path) -> Result<PathBuf> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record([
        "id", "category", "name", "status", "cost", "currency", "cost_twd", "due_date", "notes",
    ])?;
    for item in &tour.prep_items {
        wtr.write_record([
            item.id.to_string(),
            item.category.to_string(),
            item.name.clone(),
            item.status.to_string(),
            format!("{:.2}", item.cost),
            item.currency.to_string(),
            format!("{:.2}", rates.to_home(item.cost, item.currency)),
            item.due_date.to_string(),
            item.notes.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(path.to_path_buf())
}

fn write_entries_sheet(tour: &Tour, rates: &RateTable, path: &Path) -> Result<PathBuf> {
    let mut entries: Vec<_> = tour.entries.iter().collect();
    entries.sort_by_key(|e| e.date);

    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record([
        "id", "date", "description", "type", "amount", "currency", "amount_twd",
    ])?;
    for entry in entries {
        wtr.write_record([
            entry.id.to_string(),
            entry.date.to_string(),
            entry.description.clone(),
            entry.kind.to_string(),
            format!("{:.2}", entry.amount),
            entry.currency.to_string(),
            format!("{:.2}", rates.to_home(entry.amount, entry.currency)),
        ])?;
    }
    wtr.flush()?;
    Ok(path.to_path_buf())
}

fn write_summary_sheet(tour: &Tour, rates: &RateTable, path: &Path) -> Result<PathBuf> {
    let stats = tour_stats(tour, rates);
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(["item", "amount_twd"])?;
    wtr.write_record([String::from("income"), format!("{:.2}", stats.income)])?;
    wtr.write_record([String::from("expense"), format!("{:.2}", stats.expense)])?;
    wtr.write_record([String::from("profit"), format!("{:.2}", stats.profit)])?;
    wtr.flush()?;
    Ok(path.to_path_buf())
}
