//! Command-line surface. All user input is validated here before anything
//! reaches the ledger.

pub mod entry;
pub mod export;
pub mod prep;
pub mod rates;
pub mod summary;
pub mod tour;
pub mod ui;
pub mod watch;

use crate::core::model::{EntryId, PrepItemId, TourId};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tourbook", version, about)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    pub config_path: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default configuration
    Setup,
    /// Manage tours
    #[command(subcommand)]
    Tour(TourCmd),
    /// Record income and expense entries
    #[command(subcommand)]
    Entry(EntryCmd),
    /// Manage preparation items
    #[command(subcommand)]
    Prep(PrepCmd),
    /// Display per-tour totals in TWD
    Summary {
        /// Tour id (defaults to every tour)
        #[arg(long)]
        tour: Option<TourId>,
    },
    /// Show or refresh exchange rates
    #[command(subcommand)]
    Rates(RatesCmd),
    /// Export a tour report as CSV sheets
    Export {
        /// Tour id (defaults to the active tour)
        #[arg(long)]
        tour: Option<TourId>,
        /// Directory the report files are written into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Keep rates fresh and redraw summaries until Ctrl-C
    Watch,
    /// Delete all stored data
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum TourCmd {
    /// Create a tour and make it the active one
    Add {
        name: String,
        /// Start date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List tours
    List,
    /// Select the tour other commands operate on
    Use { id: TourId },
    /// Delete a tour and everything it owns
    Rm {
        id: TourId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum EntryCmd {
    /// Record an income or expense entry
    Add {
        /// Tour id (defaults to the active tour)
        #[arg(long)]
        tour: Option<TourId>,
        /// What the money was for
        #[arg(long)]
        desc: String,
        /// income or expense
        #[arg(long = "type")]
        kind: String,
        #[arg(long)]
        amount: f64,
        /// TWD, JPY or USD
        #[arg(long)]
        currency: String,
        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Change fields of an existing entry
    Edit {
        #[arg(long)]
        tour: Option<TourId>,
        /// Entry id within the tour
        #[arg(long)]
        id: EntryId,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete an entry
    Rm {
        /// Entry id within the tour
        id: EntryId,
        #[arg(long)]
        tour: Option<TourId>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List a tour's entries by date
    List {
        #[arg(long)]
        tour: Option<TourId>,
    },
}

#[derive(Subcommand)]
pub enum PrepCmd {
    /// Add a preparation item
    Add {
        #[arg(long)]
        tour: Option<TourId>,
        /// hotel, flight, transport or other
        #[arg(long)]
        category: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        cost: f64,
        /// TWD, JPY or USD
        #[arg(long)]
        currency: String,
        /// Due date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        due: Option<NaiveDate>,
        /// pending or completed, defaults to pending
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change fields of an existing preparation item
    Edit {
        #[arg(long)]
        tour: Option<TourId>,
        /// Item id within the tour
        #[arg(long)]
        id: PrepItemId,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        cost: Option<f64>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
        /// pending or completed
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a preparation item
    Rm {
        /// Item id within the tour
        id: PrepItemId,
        #[arg(long)]
        tour: Option<TourId>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Mark a preparation item completed
    Done {
        /// Item id within the tour
        id: PrepItemId,
        #[arg(long)]
        tour: Option<TourId>,
    },
    /// List a tour's preparation items
    List {
        #[arg(long)]
        tour: Option<TourId>,
    },
}

#[derive(Subcommand)]
pub enum RatesCmd {
    /// Display the current rate table
    Show,
    /// Fetch fresh rates from the bank feed
    Refresh,
}
