use super::{TourCmd, ui};
use crate::store::LedgerStore;
use anyhow::Result;
use comfy_table::Cell;
use chrono::Local;

pub fn run(store: &mut LedgerStore, cmd: TourCmd) -> Result<()> {
    match cmd {
        TourCmd::Add { name, date } => {
            let start_date = date.unwrap_or_else(|| Local::now().date_naive());
            let id = store.create_tour(&name, start_date);
            println!("Created tour {id} '{name}' (now active)");
        }
        TourCmd::List => list(store),
        TourCmd::Use { id } => {
            store.select_tour(id)?;
            println!("Active tour is now {id}");
        }
        TourCmd::Rm { id, yes } => {
            let name = store
                .ledger()
                .tour(id)
                .map(|t| t.name.clone())
                .unwrap_or_default();
            if !ui::confirm(&format!("Delete tour {id} '{name}' and all its records?"), yes)? {
                println!("Aborted");
                return Ok(());
            }
            if store.delete_tour(id) {
                println!("Deleted tour {id}");
            } else {
                println!("No tour with id {id}");
            }
        }
    }
    Ok(())
}

fn list(store: &LedgerStore) {
    let ledger = store.ledger();
    if ledger.tours.is_empty() {
        println!("No tours yet; create one with `tourbook tour add <name>`");
        return;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Id"),
        ui::header_cell("Name"),
        ui::header_cell("Start"),
        ui::header_cell("Entries"),
        ui::header_cell("Prep items"),
    ]);
    for tour in &ledger.tours {
        table.add_row(vec![
            ui::active_marker(ledger.active_tour == Some(tour.id)),
            Cell::new(tour.id),
            Cell::new(&tour.name),
            Cell::new(tour.start_date),
            Cell::new(tour.entries.len()),
            Cell::new(tour.prep_items.len()),
        ]);
    }
    println!("{table}");
}
