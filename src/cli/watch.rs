use super::summary;
use crate::core::currency::RateProvider;
use crate::core::model::Tour;
use crate::providers::refresh::RateService;
use crate::store::LedgerStore;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Long-running mode: the rate service refreshes in the background while the
/// summary view is redrawn each interval. Ctrl-C tears the service down,
/// dropping any fetch still in flight.
pub async fn run(
    store: &LedgerStore,
    provider: Arc<dyn RateProvider>,
    refresh_every: Duration,
) -> Result<()> {
    let slots = store.slots_shared();
    let mut service = RateService::new(provider, slots.load_rates(), Some(slots));
    service.start(refresh_every);

    println!(
        "Refreshing rates every {} minutes; Ctrl-C to stop\n",
        refresh_every.as_secs() / 60
    );

    let mut redraw = tokio::time::interval(refresh_every);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("Ctrl-C received, shutting down watch");
                break;
            }
            _ = redraw.tick() => {
                let rates = service.current();
                let tours: Vec<&Tour> = store.ledger().tours.iter().collect();
                if tours.is_empty() {
                    println!("No tours yet");
                } else {
                    summary::render(&tours, &rates);
                }
            }
        }
    }
    service.shutdown();
    Ok(())
}
