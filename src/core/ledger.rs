//! The in-memory tour collection and every mutation that touches it.
//!
//! Mutations are local and synchronous; nothing here performs I/O, so a
//! mutation cannot partially fail. Snapshotting the collection to storage
//! after a mutation is the store wrapper's concern.

use crate::core::model::{
    Entry, EntryDraft, EntryId, PrepDraft, PrepItem, PrepItemId, PrepStatus, Tour, TourId,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The authoritative list of tours.
///
/// Tour ids come from a stored monotonic counter and are never reused, not
/// even after a tour is deleted. `active_tour` is the tour that commands
/// operate on when no explicit tour id is given; creating a tour selects it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub tours: Vec<Tour>,
    #[serde(default)]
    last_tour_id: TourId,
    #[serde(default)]
    pub active_tour: Option<TourId>,
}

impl Ledger {
    pub fn tour(&self, id: TourId) -> Option<&Tour> {
        self.tours.iter().find(|t| t.id == id)
    }

    fn tour_mut(&mut self, id: TourId) -> Result<&mut Tour> {
        self.tours
            .iter_mut()
            .find(|t| t.id == id)
            .with_context(|| format!("No tour with id {id}"))
    }

    /// The tour an unqualified command targets: the explicitly requested id
    /// if given, otherwise the active tour.
    pub fn resolve_tour(&self, requested: Option<TourId>) -> Result<&Tour> {
        let id = requested
            .or(self.active_tour)
            .context("No tour selected; pass --tour or run `tour use <id>`")?;
        self.tour(id).with_context(|| format!("No tour with id {id}"))
    }

    pub fn create_tour(&mut self, name: impl Into<String>, start_date: NaiveDate) -> TourId {
        self.last_tour_id += 1;
        let id = self.last_tour_id;
        self.tours.push(Tour::new(id, name.into(), start_date));
        self.active_tour = Some(id);
        id
    }

    /// Removes a tour and everything it owns. Unknown ids are a no-op.
    pub fn delete_tour(&mut self, id: TourId) -> bool {
        let before = self.tours.len();
        self.tours.retain(|t| t.id != id);
        let removed = self.tours.len() < before;
        if removed && self.active_tour == Some(id) {
            self.active_tour = None;
        }
        removed
    }

    pub fn select_tour(&mut self, id: TourId) -> Result<()> {
        self.tour(id).with_context(|| format!("No tour with id {id}"))?;
        self.active_tour = Some(id);
        Ok(())
    }

    /// Creates a new entry or, when `editing` is set, replaces that entry's
    /// fields in place. Position and sibling entries are untouched on edit.
    pub fn upsert_entry(
        &mut self,
        tour_id: TourId,
        draft: EntryDraft,
        editing: Option<EntryId>,
    ) -> Result<EntryId> {
        draft.validate()?;
        let tour = self.tour_mut(tour_id)?;
        match editing {
            Some(id) => {
                let entry = tour
                    .entries
                    .iter_mut()
                    .find(|e| e.id == id)
                    .with_context(|| format!("No entry with id {id} in tour {tour_id}"))?;
                *entry = draft.into_entry(id);
                Ok(id)
            }
            None => {
                let id = tour.next_entry_id();
                tour.entries.push(draft.into_entry(id));
                Ok(id)
            }
        }
    }

    /// Removes an entry. A missing entry id is a no-op returning `false`;
    /// only an unknown tour is an error.
    pub fn delete_entry(&mut self, tour_id: TourId, entry_id: EntryId) -> Result<bool> {
        let tour = self.tour_mut(tour_id)?;
        let before = tour.entries.len();
        tour.entries.retain(|e| e.id != entry_id);
        Ok(tour.entries.len() < before)
    }

    pub fn upsert_prep_item(
        &mut self,
        tour_id: TourId,
        draft: PrepDraft,
        editing: Option<PrepItemId>,
    ) -> Result<PrepItemId> {
        draft.validate()?;
        let tour = self.tour_mut(tour_id)?;
        match editing {
            Some(id) => {
                let item = tour
                    .prep_items
                    .iter_mut()
                    .find(|p| p.id == id)
                    .with_context(|| format!("No preparation item with id {id} in tour {tour_id}"))?;
                *item = draft.into_item(id);
                Ok(id)
            }
            None => {
                let id = tour.next_prep_id();
                tour.prep_items.push(draft.into_item(id));
                Ok(id)
            }
        }
    }

    pub fn delete_prep_item(&mut self, tour_id: TourId, item_id: PrepItemId) -> Result<bool> {
        let tour = self.tour_mut(tour_id)?;
        let before = tour.prep_items.len();
        tour.prep_items.retain(|p| p.id != item_id);
        Ok(tour.prep_items.len() < before)
    }

    pub fn set_prep_status(
        &mut self,
        tour_id: TourId,
        item_id: PrepItemId,
        status: PrepStatus,
    ) -> Result<()> {
        let tour = self.tour_mut(tour_id)?;
        let item = tour
            .prep_items
            .iter_mut()
            .find(|p| p.id == item_id)
            .with_context(|| format!("No preparation item with id {item_id} in tour {tour_id}"))?;
        item.status = status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use crate::core::model::{EntryKind, PrepCategory};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry_draft(description: &str, kind: EntryKind, amount: f64) -> EntryDraft {
        EntryDraft {
            description: description.to_string(),
            kind,
            amount,
            currency: Currency::Twd,
            date: date(2024, 1, 1),
        }
    }

    fn prep_draft(name: &str, cost: f64) -> PrepDraft {
        PrepDraft {
            category: PrepCategory::Hotel,
            name: name.to_string(),
            status: PrepStatus::Pending,
            cost,
            currency: Currency::Twd,
            due_date: date(2024, 2, 1),
            notes: None,
        }
    }

    fn ledger_with_tour() -> (Ledger, TourId) {
        let mut ledger = Ledger::default();
        let id = ledger.create_tour("Tokyo", date(2024, 3, 10));
        (ledger, id)
    }

    #[test]
    fn test_create_tour_assigns_monotonic_ids_and_selects() {
        let mut ledger = Ledger::default();
        let first = ledger.create_tour("Tokyo", date(2024, 3, 10));
        let second = ledger.create_tour("Osaka", date(2024, 5, 1));
        assert_eq!((first, second), (1, 2));
        assert_eq!(ledger.active_tour, Some(second));

        ledger.delete_tour(second);
        let third = ledger.create_tour("Kyoto", date(2024, 6, 1));
        assert_eq!(third, 3, "deleted tour ids must not be reused");
    }

    #[test]
    fn test_delete_tour_clears_active_selection() {
        let (mut ledger, tour) = ledger_with_tour();
        assert!(ledger.delete_tour(tour));
        assert_eq!(ledger.active_tour, None);
        assert!(!ledger.delete_tour(tour), "second delete is a no-op");
    }

    #[test]
    fn test_sequential_adds_produce_unique_ids() {
        let (mut ledger, tour) = ledger_with_tour();
        let n = 5;
        for i in 0..n {
            ledger
                .upsert_entry(tour, entry_draft(&format!("e{i}"), EntryKind::Income, 1.0), None)
                .unwrap();
        }
        let entries = &ledger.tour(tour).unwrap().entries;
        assert_eq!(entries.len(), n);
        let mut ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), n);
    }

    #[test]
    fn test_entry_ids_not_reused_after_middle_deletion() {
        let (mut ledger, tour) = ledger_with_tour();
        for name in ["a", "b", "c"] {
            ledger
                .upsert_entry(tour, entry_draft(name, EntryKind::Expense, 1.0), None)
                .unwrap();
        }
        assert!(ledger.delete_entry(tour, 2).unwrap());
        let new_id = ledger
            .upsert_entry(tour, entry_draft("d", EntryKind::Expense, 1.0), None)
            .unwrap();
        assert_eq!(new_id, 4, "id 2 must never come back");
    }

    #[test]
    fn test_edit_replaces_in_place_and_preserves_siblings() {
        let (mut ledger, tour) = ledger_with_tour();
        for name in ["a", "b", "c"] {
            ledger
                .upsert_entry(tour, entry_draft(name, EntryKind::Expense, 10.0), None)
                .unwrap();
        }
        let before: Vec<Entry> = ledger.tour(tour).unwrap().entries.clone();

        let edited = ledger
            .upsert_entry(tour, entry_draft("b-edited", EntryKind::Income, 99.0), Some(2))
            .unwrap();
        assert_eq!(edited, 2);

        let after = &ledger.tour(tour).unwrap().entries;
        assert_eq!(after.len(), 3);
        assert_eq!(after[1].id, 2, "position preserved");
        assert_eq!(after[1].description, "b-edited");
        assert_eq!(after[1].kind, EntryKind::Income);
        assert_eq!(after[0], before[0], "siblings untouched");
        assert_eq!(after[2], before[2]);
    }

    #[test]
    fn test_edit_unknown_entry_is_an_error() {
        let (mut ledger, tour) = ledger_with_tour();
        let err = ledger
            .upsert_entry(tour, entry_draft("x", EntryKind::Income, 1.0), Some(7))
            .unwrap_err();
        assert!(err.to_string().contains("No entry with id 7"));
    }

    #[test]
    fn test_delete_missing_entry_is_a_noop() {
        let (mut ledger, tour) = ledger_with_tour();
        ledger
            .upsert_entry(tour, entry_draft("keep", EntryKind::Income, 1.0), None)
            .unwrap();
        let removed = ledger.delete_entry(tour, 42).unwrap();
        assert!(!removed);
        assert_eq!(ledger.tour(tour).unwrap().entries.len(), 1);
    }

    #[test]
    fn test_mutations_against_unknown_tour_fail() {
        let mut ledger = Ledger::default();
        assert!(ledger
            .upsert_entry(9, entry_draft("x", EntryKind::Income, 1.0), None)
            .is_err());
        assert!(ledger.delete_entry(9, 1).is_err());
        assert!(ledger.select_tour(9).is_err());
    }

    #[test]
    fn test_invalid_draft_does_not_mutate() {
        let (mut ledger, tour) = ledger_with_tour();
        assert!(ledger
            .upsert_entry(tour, entry_draft("", EntryKind::Income, 1.0), None)
            .is_err());
        assert!(ledger.tour(tour).unwrap().entries.is_empty());
    }

    #[test]
    fn test_prep_item_ids_scoped_per_tour() {
        let mut ledger = Ledger::default();
        let t1 = ledger.create_tour("Tokyo", date(2024, 3, 10));
        let t2 = ledger.create_tour("Osaka", date(2024, 5, 1));
        let a = ledger.upsert_prep_item(t1, prep_draft("hotel", 100.0), None).unwrap();
        let b = ledger.upsert_prep_item(t2, prep_draft("hotel", 200.0), None).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 1, "ids are unique per tour, not globally");
    }

    #[test]
    fn test_set_prep_status() {
        let (mut ledger, tour) = ledger_with_tour();
        let id = ledger.upsert_prep_item(tour, prep_draft("flight", 300.0), None).unwrap();
        ledger.set_prep_status(tour, id, PrepStatus::Completed).unwrap();
        assert_eq!(
            ledger.tour(tour).unwrap().prep_item(id).unwrap().status,
            PrepStatus::Completed
        );
        assert!(ledger.set_prep_status(tour, 99, PrepStatus::Pending).is_err());
    }

    #[test]
    fn test_resolve_tour_prefers_explicit_id() {
        let mut ledger = Ledger::default();
        let t1 = ledger.create_tour("Tokyo", date(2024, 3, 10));
        let t2 = ledger.create_tour("Osaka", date(2024, 5, 1));
        assert_eq!(ledger.resolve_tour(Some(t1)).unwrap().id, t1);
        assert_eq!(ledger.resolve_tour(None).unwrap().id, t2);
        ledger.delete_tour(t2);
        ledger.active_tour = None;
        assert!(ledger.resolve_tour(None).is_err());
    }
}
