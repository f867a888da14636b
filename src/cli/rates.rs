use super::{RatesCmd, ui};
use crate::core::currency::{Currency, RateProvider, RateTable};
use crate::providers::refresh::RateService;
use crate::store::LedgerStore;
use anyhow::Result;
use comfy_table::Cell;
use std::sync::Arc;

pub async fn run(
    store: &LedgerStore,
    provider: Arc<dyn RateProvider>,
    cmd: RatesCmd,
) -> Result<()> {
    match cmd {
        RatesCmd::Show => {
            show(&store.slots().load_rates());
        }
        RatesCmd::Refresh => {
            let service = RateService::new(
                provider,
                store.slots().load_rates(),
                Some(store.slots_shared()),
            );
            let spinner = ui::new_spinner("Fetching exchange rates...");
            let updated = service.refresh().await;
            spinner.finish_and_clear();
            if !updated {
                // Degrade to last known good; a failed refresh is not fatal.
                println!(
                    "{}",
                    ui::style_text("Refresh failed; keeping previous rates", ui::StyleType::Error)
                );
            }
            show(&service.current());
        }
    }
    Ok(())
}

fn show(rates: &RateTable) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Rate (TWD)"),
        ui::header_cell("Updated"),
    ]);
    for currency in Currency::ALL {
        match rates.quote(currency) {
            Some(quote) => table.add_row(vec![
                Cell::new(currency),
                Cell::new(format!("{:.4}", quote.rate)),
                Cell::new(quote.updated_at.format("%Y-%m-%d %H:%M UTC")),
            ]),
            None => table.add_row(vec![
                Cell::new(currency),
                Cell::new("1.0000"),
                Cell::new("never fetched"),
            ]),
        };
    }
    println!("{table}");
}
