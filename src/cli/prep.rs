use super::{PrepCmd, ui};
use crate::core::currency::{Currency, RateTable};
use crate::core::model::{PrepCategory, PrepDraft, PrepStatus, Tour};
use crate::store::LedgerStore;
use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::Cell;

pub fn run(store: &mut LedgerStore, cmd: PrepCmd) -> Result<()> {
    match cmd {
        PrepCmd::Add {
            tour,
            category,
            name,
            cost,
            currency,
            due,
            status,
            notes,
        } => {
            let tour_id = store.ledger().resolve_tour(tour)?.id;
            let status = match status {
                Some(s) => s.parse::<PrepStatus>()?,
                None => PrepStatus::Pending,
            };
            let draft = PrepDraft {
                category: category.parse::<PrepCategory>()?,
                name,
                status,
                cost,
                currency: currency.parse::<Currency>()?,
                due_date: due.unwrap_or_else(|| Local::now().date_naive()),
                notes,
            };
            draft.validate()?;
            let id = store.upsert_prep_item(tour_id, draft, None)?;
            println!("Added preparation item {id} to tour {tour_id}");
        }
        PrepCmd::Edit {
            tour,
            id,
            category,
            name,
            cost,
            currency,
            due,
            notes,
            status,
        } => {
            let tour_id = store.ledger().resolve_tour(tour)?.id;
            let existing = store
                .ledger()
                .tour(tour_id)
                .and_then(|t| t.prep_item(id))
                .cloned()
                .with_context(|| format!("No preparation item with id {id} in tour {tour_id}"))?;

            let mut draft = PrepDraft::from(existing);
            if let Some(category) = category {
                draft.category = category.parse::<PrepCategory>()?;
            }
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(cost) = cost {
                draft.cost = cost;
            }
            if let Some(currency) = currency {
                draft.currency = currency.parse::<Currency>()?;
            }
            if let Some(due) = due {
                draft.due_date = due;
            }
            if let Some(notes) = notes {
                draft.notes = Some(notes);
            }
            if let Some(status) = status {
                draft.status = status.parse::<PrepStatus>()?;
            }
            draft.validate()?;
            store.upsert_prep_item(tour_id, draft, Some(id))?;
            println!("Updated preparation item {id} in tour {tour_id}");
        }
        PrepCmd::Rm { id, tour, yes } => {
            let tour_id = store.ledger().resolve_tour(tour)?.id;
            if !ui::confirm(
                &format!("Delete preparation item {id} from tour {tour_id}?"),
                yes,
            )? {
                println!("Aborted");
                return Ok(());
            }
            if store.delete_prep_item(tour_id, id)? {
                println!("Deleted preparation item {id}");
            } else {
                println!("No preparation item with id {id} in tour {tour_id}");
            }
        }
        PrepCmd::Done { id, tour } => {
            let tour_id = store.ledger().resolve_tour(tour)?.id;
            store.set_prep_status(tour_id, id, PrepStatus::Completed)?;
            println!("Marked preparation item {id} completed");
        }
        PrepCmd::List { tour } => {
            let rates = store.slots().load_rates();
            let tour = store.ledger().resolve_tour(tour)?;
            list(tour, &rates);
        }
    }
    Ok(())
}

fn list(tour: &Tour, rates: &RateTable) {
    if tour.prep_items.is_empty() {
        println!("Tour '{}' has no preparation items", tour.name);
        return;
    }

    let mut items: Vec<_> = tour.prep_items.iter().collect();
    items.sort_by_key(|p| p.due_date);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Category"),
        ui::header_cell("Name"),
        ui::header_cell("Status"),
        ui::header_cell("Cost"),
        ui::header_cell("Cost (TWD)"),
        ui::header_cell("Due"),
        ui::header_cell("Notes"),
    ]);
    for item in items {
        table.add_row(vec![
            Cell::new(item.id),
            Cell::new(item.category),
            Cell::new(&item.name),
            Cell::new(item.status),
            Cell::new(format!("{:.2} {}", item.cost, item.currency)),
            ui::money_cell(rates.to_home(item.cost, item.currency)),
            Cell::new(item.due_date),
            Cell::new(item.notes.as_deref().unwrap_or("")),
        ]);
    }
    println!(
        "Preparation for {}\n\n{table}",
        ui::style_text(&tour.name, ui::StyleType::Title)
    );
}
