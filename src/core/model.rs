//! Domain records: tours, ledger entries and preparation items.

use crate::core::currency::Currency;
use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub type TourId = u32;
pub type EntryId = u32;
pub type PrepItemId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Income => write!(f, "income"),
            EntryKind::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for EntryKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(EntryKind::Income),
            "expense" => Ok(EntryKind::Expense),
            _ => Err(anyhow::anyhow!("Invalid entry type: {}", s)),
        }
    }
}

/// A single income or expense record, always owned by exactly one tour.
/// Ids are unique within the owning tour only; lookups must be scoped by
/// (tour, entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub description: String,
    pub kind: EntryKind,
    pub amount: f64,
    pub currency: Currency,
    pub date: NaiveDate,
}

/// Validated input for creating or replacing an entry. Built at the CLI
/// boundary; the ledger rejects drafts that slipped through unvalidated.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub description: String,
    pub kind: EntryKind,
    pub amount: f64,
    pub currency: Currency,
    pub date: NaiveDate,
}

impl EntryDraft {
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            bail!("Entry description must not be empty");
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            bail!("Entry amount must be a non-negative number");
        }
        Ok(())
    }

    pub(crate) fn into_entry(self, id: EntryId) -> Entry {
        Entry {
            id,
            description: self.description,
            kind: self.kind,
            amount: self.amount,
            currency: self.currency,
            date: self.date,
        }
    }
}

impl From<Entry> for EntryDraft {
    fn from(entry: Entry) -> Self {
        EntryDraft {
            description: entry.description,
            kind: entry.kind,
            amount: entry.amount,
            currency: entry.currency,
            date: entry.date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrepCategory {
    Hotel,
    Flight,
    Transport,
    Other,
}

impl Display for PrepCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrepCategory::Hotel => write!(f, "hotel"),
            PrepCategory::Flight => write!(f, "flight"),
            PrepCategory::Transport => write!(f, "transport"),
            PrepCategory::Other => write!(f, "other"),
        }
    }
}

impl FromStr for PrepCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hotel" => Ok(PrepCategory::Hotel),
            "flight" => Ok(PrepCategory::Flight),
            "transport" => Ok(PrepCategory::Transport),
            "other" => Ok(PrepCategory::Other),
            _ => Err(anyhow::anyhow!("Invalid preparation category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrepStatus {
    Pending,
    Completed,
}

impl Display for PrepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrepStatus::Pending => write!(f, "pending"),
            PrepStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for PrepStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PrepStatus::Pending),
            "completed" | "done" => Ok(PrepStatus::Completed),
            _ => Err(anyhow::anyhow!("Invalid preparation status: {}", s)),
        }
    }
}

/// A planned cost item. Counted as expense whether pending or completed:
/// the model is budgeted cost, not cash-basis accounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepItem {
    pub id: PrepItemId,
    pub category: PrepCategory,
    pub name: String,
    pub status: PrepStatus,
    pub cost: f64,
    pub currency: Currency,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PrepDraft {
    pub category: PrepCategory,
    pub name: String,
    pub status: PrepStatus,
    pub cost: f64,
    pub currency: Currency,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

impl PrepDraft {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("Preparation item name must not be empty");
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            bail!("Preparation item cost must be a non-negative number");
        }
        Ok(())
    }

    pub(crate) fn into_item(self, id: PrepItemId) -> PrepItem {
        PrepItem {
            id,
            category: self.category,
            name: self.name,
            status: self.status,
            cost: self.cost,
            currency: self.currency,
            due_date: self.due_date,
            notes: self.notes,
        }
    }
}

impl From<PrepItem> for PrepDraft {
    fn from(item: PrepItem) -> Self {
        PrepDraft {
            category: item.category,
            name: item.name,
            status: item.status,
            cost: item.cost,
            currency: item.currency,
            due_date: item.due_date,
            notes: item.notes,
        }
    }
}

/// A named, dated group owning its entries and preparation items
/// exclusively. The id counters record the last id ever assigned within
/// this tour, so deleted ids are never regenerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub id: TourId,
    pub name: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub prep_items: Vec<PrepItem>,
    #[serde(default)]
    pub(crate) last_entry_id: EntryId,
    #[serde(default)]
    pub(crate) last_prep_id: PrepItemId,
}

impl Tour {
    pub(crate) fn new(id: TourId, name: String, start_date: NaiveDate) -> Self {
        Tour {
            id,
            name,
            start_date,
            entries: Vec::new(),
            prep_items: Vec::new(),
            last_entry_id: 0,
            last_prep_id: 0,
        }
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn prep_item(&self, id: PrepItemId) -> Option<&PrepItem> {
        self.prep_items.iter().find(|p| p.id == id)
    }

    pub(crate) fn next_entry_id(&mut self) -> EntryId {
        self.last_entry_id += 1;
        self.last_entry_id
    }

    pub(crate) fn next_prep_id(&mut self) -> PrepItemId {
        self.last_prep_id += 1;
        self.last_prep_id
    }
}
