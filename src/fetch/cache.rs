use crate::error::Result;
use crate::types::signals::ClientSignals;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Path prefixes that address the same posting. The first element is
/// rewritten to the second before keying.
pub const PATH_ALIASES: [(&str, &str); 1] = [("/nx/jobs/", "/jobs/")];

pub fn canonicalize(source_id: &str) -> String {
    PATH_ALIASES
        .iter()
        .fold(source_id.trim().to_string(), |id, (alias, canonical)| {
            id.replace(alias, canonical)
        })
}

type Slot = Arc<OnceCell<ClientSignals>>;

/// Session-lifetime signal cache keyed by canonical source id. Entries never
/// expire. Concurrent callers for one key share a single in-flight fetch;
/// failed fetches leave the slot empty so a later caller retries.
#[derive(Debug, Default)]
pub struct SignalCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl SignalCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached record for `source_id`, or runs `fetcher` with the
    /// canonical id and stores its result.
    pub async fn get_or_fetch<F, Fut>(&self, source_id: &str, fetcher: F) -> Result<ClientSignals>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<ClientSignals>>,
    {
        let key = canonicalize(source_id);
        let slot = self.slot(&key);

        if let Some(hit) = slot.get() {
            info!(source = %key, "signal cache hit");
            return Ok(hit.clone());
        }

        debug!(source = %key, "signal cache miss");
        match slot.get_or_try_init(|| fetcher(key.clone())).await {
            Ok(signals) => Ok(signals.clone()),
            Err(err) => {
                self.forget_empty(&key, &slot);
                Err(err)
            }
        }
    }

    pub fn get(&self, source_id: &str) -> Option<ClientSignals> {
        let key = canonicalize(source_id);
        self.lock().get(&key).and_then(|slot| slot.get().cloned())
    }

    /// Number of populated entries.
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &str) -> Slot {
        self.lock().entry(key.to_string()).or_default().clone()
    }

    /// Drops `slot` from the map if it is still the entry for `key` and no
    /// caller managed to fill it.
    fn forget_empty(&self, key: &str, slot: &Slot) {
        let mut slots = self.lock();
        let stale = slots
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && !current.initialized());
        if stale {
            slots.remove(key);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
