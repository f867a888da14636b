//! Per-tour aggregation in the home currency.

use crate::core::currency::RateTable;
use crate::core::model::{EntryKind, Tour};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourStats {
    pub income: f64,
    pub expense: f64,
    pub profit: f64,
}

/// Folds a tour's entries and preparation items into home-currency totals.
///
/// Preparation items count as expense whether pending or completed; they are
/// committed budget, not actual spend. Pure: recomputed from the current
/// lists and rate table on every query, nothing is cached.
pub fn tour_stats(tour: &Tour, rates: &RateTable) -> TourStats {
    let income: f64 = tour
        .entries
        .iter()
        .filter(|e| e.kind == EntryKind::Income)
        .map(|e| rates.to_home(e.amount, e.currency))
        .sum();

    let raw_expense: f64 = tour
        .entries
        .iter()
        .filter(|e| e.kind == EntryKind::Expense)
        .map(|e| rates.to_home(e.amount, e.currency))
        .sum();

    let prep_cost: f64 = tour
        .prep_items
        .iter()
        .map(|p| rates.to_home(p.cost, p.currency))
        .sum();

    let expense = raw_expense + prep_cost;
    TourStats {
        income,
        expense,
        profit: income - expense,
    }
}
