use super::ui;
use crate::core::currency::RateTable;
use crate::core::model::{Tour, TourId};
use crate::core::stats::{TourStats, tour_stats};
use crate::store::LedgerStore;
use anyhow::Result;
use comfy_table::Cell;
use console::style;

pub fn run(store: &LedgerStore, tour: Option<TourId>) -> Result<()> {
    let rates = store.slots().load_rates();
    let ledger = store.ledger();

    let tours: Vec<&Tour> = match tour {
        Some(_) => vec![ledger.resolve_tour(tour)?],
        None => ledger.tours.iter().collect(),
    };
    if tours.is_empty() {
        println!("No tours yet; create one with `tourbook tour add <name>`");
        return Ok(());
    }

    render(&tours, &rates);
    Ok(())
}

pub fn render(tours: &[&Tour], rates: &RateTable) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Tour"),
        ui::header_cell("Start"),
        ui::header_cell("Income (TWD)"),
        ui::header_cell("Expense (TWD)"),
        ui::header_cell("Profit (TWD)"),
    ]);

    let mut grand = TourStats {
        income: 0.0,
        expense: 0.0,
        profit: 0.0,
    };
    for tour in tours {
        let stats = tour_stats(tour, rates);
        grand.income += stats.income;
        grand.expense += stats.expense;
        grand.profit += stats.profit;
        table.add_row(vec![
            Cell::new(&tour.name),
            Cell::new(tour.start_date),
            ui::money_cell(stats.income),
            ui::money_cell(stats.expense),
            ui::profit_cell(stats.profit),
        ]);
    }
    println!("{table}");

    if tours.len() > 1 {
        let term_width = console::Term::stdout()
            .size_checked()
            .map(|(_, w)| w as usize)
            .unwrap_or(80);
        let total_str = format!("Total profit (TWD): {:.2}", grand.profit);
        let styled_total = if grand.profit >= 0.0 {
            style(&total_str).bold().green()
        } else {
            style(&total_str).bold().red()
        };
        println!("{styled_total:>term_width$}");
    }
}
