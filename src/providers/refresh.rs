//! Holds the current rate table and keeps it fresh in the background.

use crate::core::currency::{RateProvider, RateTable};
use crate::store::slots::SlotStore;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// The process-wide rate table plus its refresh machinery.
///
/// `refresh` swaps the table wholesale on success and persists the fresh
/// copy; on any failure the previous table stays in place and the error is
/// only logged. `start` spawns a periodic background refresh; dropping the
/// service (or calling [`RateService::shutdown`]) aborts the task, so a
/// fetch still in flight at teardown is dropped instead of writing into a
/// dead table.
pub struct RateService {
    provider: Arc<dyn RateProvider>,
    table: Arc<RwLock<RateTable>>,
    store: Option<Arc<SlotStore>>,
    task: Option<JoinHandle<()>>,
}

impl RateService {
    pub fn new(
        provider: Arc<dyn RateProvider>,
        initial: RateTable,
        store: Option<Arc<SlotStore>>,
    ) -> Self {
        Self {
            provider,
            table: Arc::new(RwLock::new(initial)),
            store,
            task: None,
        }
    }

    /// A snapshot of the current table. Aggregation always reads the latest
    /// snapshot at query time; there is no snapshot isolation to maintain.
    pub fn current(&self) -> RateTable {
        self.table.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// One refresh attempt. Returns whether the table was replaced.
    pub async fn refresh(&self) -> bool {
        refresh_table(self.provider.as_ref(), &self.table, self.store.as_deref()).await
    }

    /// Spawns the periodic refresh loop, first attempt immediately.
    pub fn start(&mut self, every: Duration) {
        if self.task.is_some() {
            return;
        }
        let provider = Arc::clone(&self.provider);
        let table = Arc::clone(&self.table);
        let store = self.store.clone();
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                refresh_table(provider.as_ref(), &table, store.as_deref()).await;
            }
        }));
    }

    pub fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Stopped background rate refresh");
        }
    }
}

impl Drop for RateService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn refresh_table(
    provider: &dyn RateProvider,
    table: &RwLock<RateTable>,
    store: Option<&SlotStore>,
) -> bool {
    match provider.fetch_rates().await {
        Ok(fresh) => {
            *table.write().unwrap_or_else(|e| e.into_inner()) = fresh.clone();
            if let Some(store) = store {
                store.save_rates(&fresh);
            }
            debug!("Rate table refreshed");
            true
        }
        Err(e) => {
            warn!(error = %e, "Rate refresh failed, keeping last known rates");
            false
        }
    }
}
