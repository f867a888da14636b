//! Durable storage: two named slots in a local fjall keyspace.
//!
//! The whole ledger is serialized as one JSON value under a fixed key; the
//! last fetched rate table lives under another. Both directions are
//! best-effort: a failed save is logged and swallowed, a failed or
//! unrecognizable load returns the fallback value. Callers never see an
//! error from this layer.

use crate::core::currency::RateTable;
use crate::core::ledger::Ledger;
use anyhow::{Context, Result};
use chrono::Utc;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use tracing::{debug, warn};

const LEDGER_KEY: &str = "ledger";
const RATES_KEY: &str = "rates";

/// Bump when the persisted shape changes incompatibly. Slots written by a
/// newer schema read as the fallback value instead of being guessed at.
const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, serde::Deserialize)]
struct Envelope<T> {
    version: u32,
    data: T,
}

#[derive(serde::Deserialize)]
struct VersionProbe {
    version: u32,
}

pub struct SlotStore {
    keyspace: Keyspace,
    slots: PartitionHandle,
}

impl SlotStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data dir: {}", path.display()))?;
        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open data store at {}", path.display()))?;
        let slots = keyspace
            .open_partition("tourbook", PartitionCreateOptions::default())
            .context("Failed to open data partition")?;
        Ok(Self { keyspace, slots })
    }

    fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let envelope = Envelope {
            version: SCHEMA_VERSION,
            data: value,
        };
        self.slots.insert(key, serde_json::to_vec(&envelope)?)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(bytes) = self.slots.get(key)? else {
            return Ok(None);
        };
        let probe: VersionProbe = serde_json::from_slice(&bytes)
            .with_context(|| format!("Slot '{key}' holds unparseable data"))?;
        if probe.version != SCHEMA_VERSION {
            warn!(
                slot = key,
                found = probe.version,
                expected = SCHEMA_VERSION,
                "Slot written by an unknown schema version, ignoring it"
            );
            return Ok(None);
        }
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)
            .with_context(|| format!("Slot '{key}' does not match the current schema"))?;
        Ok(Some(envelope.data))
    }

    pub fn save_ledger(&self, ledger: &Ledger) {
        if let Err(e) = self.put_json(LEDGER_KEY, ledger) {
            warn!(error = %e, "Failed to persist ledger; keeping in-memory state");
        }
    }

    pub fn load_ledger(&self) -> Ledger {
        match self.get_json::<Ledger>(LEDGER_KEY) {
            Ok(Some(ledger)) => ledger,
            Ok(None) => {
                debug!("No stored ledger, starting empty");
                Ledger::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load ledger, starting empty");
                Ledger::default()
            }
        }
    }

    pub fn save_rates(&self, rates: &RateTable) {
        if let Err(e) = self.put_json(RATES_KEY, rates) {
            warn!(error = %e, "Failed to persist rate table");
        }
    }

    pub fn load_rates(&self) -> RateTable {
        match self.get_json::<RateTable>(RATES_KEY) {
            Ok(Some(rates)) => rates,
            Ok(None) => {
                debug!("No stored rates, home currency only");
                RateTable::home_only(Utc::now())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load rate table, home currency only");
                RateTable::home_only(Utc::now())
            }
        }
    }

    /// Removes both slots. Backs the `reset` command.
    pub fn clear(&self) {
        for key in [LEDGER_KEY, RATES_KEY] {
            if let Err(e) = self.slots.remove(key) {
                warn!(slot = key, error = %e, "Failed to clear slot");
            }
        }
        if let Err(e) = self.keyspace.persist(PersistMode::SyncAll) {
            warn!(error = %e, "Failed to sync after clear");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use crate::core::model::{EntryDraft, EntryKind};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::default();
        let id = ledger
            .create_tour("Tokyo", NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        ledger
            .upsert_entry(
                id,
                EntryDraft {
                    description: "ramen".to_string(),
                    kind: EntryKind::Expense,
                    amount: 1200.0,
                    currency: Currency::Jpy,
                    date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
                },
                None,
            )
            .unwrap();
        ledger
    }

    #[test]
    fn test_ledger_round_trip() {
        let dir = tempdir().unwrap();
        let store = SlotStore::open(dir.path()).unwrap();
        let ledger = sample_ledger();

        store.save_ledger(&ledger);
        assert_eq!(store.load_ledger(), ledger);
    }

    #[test]
    fn test_missing_slot_falls_back() {
        let dir = tempdir().unwrap();
        let store = SlotStore::open(dir.path()).unwrap();
        assert_eq!(store.load_ledger(), Ledger::default());
        assert_eq!(store.load_rates().rate(Currency::Twd), 1.0);
    }

    #[test]
    fn test_corrupt_slot_falls_back() {
        let dir = tempdir().unwrap();
        let store = SlotStore::open(dir.path()).unwrap();
        store.slots.insert(LEDGER_KEY, b"definitely not json").unwrap();
        assert_eq!(store.load_ledger(), Ledger::default());
    }

    #[test]
    fn test_unknown_schema_version_falls_back() {
        let dir = tempdir().unwrap();
        let store = SlotStore::open(dir.path()).unwrap();
        let future = serde_json::json!({ "version": 99, "data": { "tours": [] } });
        store
            .slots
            .insert(LEDGER_KEY, serde_json::to_vec(&future).unwrap())
            .unwrap();
        assert_eq!(store.load_ledger(), Ledger::default());
    }

    #[test]
    fn test_rates_round_trip() {
        let dir = tempdir().unwrap();
        let store = SlotStore::open(dir.path()).unwrap();
        let now = Utc::now();
        let mut rates = RateTable::home_only(now);
        rates.insert(Currency::Usd, 31.5, now);
        rates.insert(Currency::Jpy, 0.21, now);

        store.save_rates(&rates);
        assert_eq!(store.load_rates(), rates);
    }

    #[test]
    fn test_clear_removes_both_slots() {
        let dir = tempdir().unwrap();
        let store = SlotStore::open(dir.path()).unwrap();
        store.save_ledger(&sample_ledger());
        store.clear();
        assert_eq!(store.load_ledger(), Ledger::default());
    }
}
