//! The persistent ledger store: in-memory collection plus snapshot writes.

pub mod slots;

use crate::core::ledger::Ledger;
use crate::core::model::{EntryDraft, EntryId, PrepDraft, PrepItemId, PrepStatus, TourId};
use anyhow::Result;
use chrono::NaiveDate;
use slots::SlotStore;
use std::path::Path;
use std::sync::Arc;

/// Owns the authoritative [`Ledger`] for the process and snapshots it to the
/// storage slot after every mutation. Constructed once per session with an
/// explicit load; there is no ambient global state.
///
/// Persistence is best-effort by design: a failed snapshot write is logged
/// inside [`SlotStore`] and the in-memory mutation stands.
pub struct LedgerStore {
    ledger: Ledger,
    slots: Arc<SlotStore>,
}

impl LedgerStore {
    pub fn open(path: &Path) -> Result<Self> {
        let slots = Arc::new(SlotStore::open(path)?);
        let ledger = slots.load_ledger();
        Ok(Self { ledger, slots })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn slots(&self) -> &SlotStore {
        &self.slots
    }

    /// Shared handle for components that outlive a single call, like the
    /// background rate refresh.
    pub fn slots_shared(&self) -> Arc<SlotStore> {
        Arc::clone(&self.slots)
    }

    fn snapshot(&self) {
        self.slots.save_ledger(&self.ledger);
    }

    pub fn create_tour(&mut self, name: &str, start_date: NaiveDate) -> TourId {
        let id = self.ledger.create_tour(name, start_date);
        self.snapshot();
        id
    }

    pub fn delete_tour(&mut self, id: TourId) -> bool {
        let removed = self.ledger.delete_tour(id);
        self.snapshot();
        removed
    }

    pub fn select_tour(&mut self, id: TourId) -> Result<()> {
        self.ledger.select_tour(id)?;
        self.snapshot();
        Ok(())
    }

    pub fn upsert_entry(
        &mut self,
        tour_id: TourId,
        draft: EntryDraft,
        editing: Option<EntryId>,
    ) -> Result<EntryId> {
        let id = self.ledger.upsert_entry(tour_id, draft, editing)?;
        self.snapshot();
        Ok(id)
    }

    pub fn delete_entry(&mut self, tour_id: TourId, entry_id: EntryId) -> Result<bool> {
        let removed = self.ledger.delete_entry(tour_id, entry_id)?;
        self.snapshot();
        Ok(removed)
    }

    pub fn upsert_prep_item(
        &mut self,
        tour_id: TourId,
        draft: PrepDraft,
        editing: Option<PrepItemId>,
    ) -> Result<PrepItemId> {
        let id = self.ledger.upsert_prep_item(tour_id, draft, editing)?;
        self.snapshot();
        Ok(id)
    }

    pub fn delete_prep_item(&mut self, tour_id: TourId, item_id: PrepItemId) -> Result<bool> {
        let removed = self.ledger.delete_prep_item(tour_id, item_id)?;
        self.snapshot();
        Ok(removed)
    }

    pub fn set_prep_status(
        &mut self,
        tour_id: TourId,
        item_id: PrepItemId,
        status: PrepStatus,
    ) -> Result<()> {
        self.ledger.set_prep_status(tour_id, item_id, status)?;
        self.snapshot();
        Ok(())
    }

    /// Drops everything: in-memory ledger and both storage slots.
    pub fn reset(&mut self) {
        self.ledger = Ledger::default();
        self.slots.clear();
    }
}
