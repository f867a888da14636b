use super::{EntryCmd, ui};
use crate::core::currency::{Currency, RateTable};
use crate::core::model::{EntryDraft, EntryKind, Tour};
use crate::store::LedgerStore;
use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::Cell;

pub fn run(store: &mut LedgerStore, cmd: EntryCmd) -> Result<()> {
    match cmd {
        EntryCmd::Add {
            tour,
            desc,
            kind,
            amount,
            currency,
            date,
        } => {
            let tour_id = store.ledger().resolve_tour(tour)?.id;
            let draft = EntryDraft {
                description: desc,
                kind: kind.parse::<EntryKind>()?,
                amount,
                currency: currency.parse::<Currency>()?,
                date: date.unwrap_or_else(|| Local::now().date_naive()),
            };
            draft.validate()?;
            let id = store.upsert_entry(tour_id, draft, None)?;
            println!("Recorded entry {id} in tour {tour_id}");
        }
        EntryCmd::Edit {
            tour,
            id,
            desc,
            kind,
            amount,
            currency,
            date,
        } => {
            let tour_id = store.ledger().resolve_tour(tour)?.id;
            let existing = store
                .ledger()
                .tour(tour_id)
                .and_then(|t| t.entry(id))
                .cloned()
                .with_context(|| format!("No entry with id {id} in tour {tour_id}"))?;

            // Overlay the provided flags onto the existing record, then run
            // it through the same upsert path as a create.
            let mut draft = EntryDraft::from(existing);
            if let Some(desc) = desc {
                draft.description = desc;
            }
            if let Some(kind) = kind {
                draft.kind = kind.parse::<EntryKind>()?;
            }
            if let Some(amount) = amount {
                draft.amount = amount;
            }
            if let Some(currency) = currency {
                draft.currency = currency.parse::<Currency>()?;
            }
            if let Some(date) = date {
                draft.date = date;
            }
            draft.validate()?;
            store.upsert_entry(tour_id, draft, Some(id))?;
            println!("Updated entry {id} in tour {tour_id}");
        }
        EntryCmd::Rm { id, tour, yes } => {
            let tour_id = store.ledger().resolve_tour(tour)?.id;
            if !ui::confirm(&format!("Delete entry {id} from tour {tour_id}?"), yes)? {
                println!("Aborted");
                return Ok(());
            }
            if store.delete_entry(tour_id, id)? {
                println!("Deleted entry {id}");
            } else {
                println!("No entry with id {id} in tour {tour_id}");
            }
        }
        EntryCmd::List { tour } => {
            let rates = store.slots().load_rates();
            let tour = store.ledger().resolve_tour(tour)?;
            list(tour, &rates);
        }
    }
    Ok(())
}

fn list(tour: &Tour, rates: &RateTable) {
    if tour.entries.is_empty() {
        println!("Tour '{}' has no entries", tour.name);
        return;
    }

    // Display order is by date; storage order is untouched.
    let mut entries: Vec<_> = tour.entries.iter().collect();
    entries.sort_by_key(|e| e.date);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Date"),
        ui::header_cell("Description"),
        ui::header_cell("Type"),
        ui::header_cell("Amount"),
        ui::header_cell("Value (TWD)"),
    ]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(entry.date),
            Cell::new(&entry.description),
            Cell::new(entry.kind),
            Cell::new(format!("{:.2} {}", entry.amount, entry.currency)),
            ui::money_cell(rates.to_home(entry.amount, entry.currency)),
        ]);
    }
    println!(
        "Entries for {}\n\n{table}",
        ui::style_text(&tour.name, ui::StyleType::Title)
    );
}
