// Holder for the latest player index.
//
// Every refresh takes a generation number before it starts loading. When the
// load finishes, the new index is published only if no newer refresh has
// started and the store has not been shut down; otherwise it is dropped.
// Published indexes are shared as `Arc` snapshots and never mutated.

use std::sync::{Arc, Mutex, PoisonError};

use menace_core::PlayerIndex;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::loader::DatasetLoader;

/// What happened to a finished refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The index replaced the previous one.
    Published { generation: u64, players: usize },
    /// A newer refresh started while this one was loading.
    Stale { generation: u64 },
    /// The store was shut down while this refresh was loading.
    Closed { generation: u64 },
    /// Building the index panicked; the previous index stays current.
    Failed { generation: u64 },
}

#[derive(Debug, Default)]
struct Gate {
    generation: u64,
    closed: bool,
}

pub struct IndexStore {
    tx: watch::Sender<Arc<PlayerIndex>>,
    gate: Mutex<Gate>,
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexStore {
    /// A store holding an empty index until the first refresh publishes.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(PlayerIndex::default()));
        IndexStore {
            tx,
            gate: Mutex::new(Gate::default()),
        }
    }

    /// The current index.
    pub fn snapshot(&self) -> Arc<PlayerIndex> {
        self.tx.borrow().clone()
    }

    /// A receiver notified whenever a new index is published.
    pub fn subscribe(&self) -> watch::Receiver<Arc<PlayerIndex>> {
        self.tx.subscribe()
    }

    /// Stop accepting results. In-flight refreshes finish but are discarded.
    pub fn shutdown(&self) {
        self.gate().closed = true;
    }

    /// Load all datasets, build a fresh index off the async threads, and
    /// publish it unless it was superseded.
    pub async fn refresh(&self, loader: &DatasetLoader) -> RefreshOutcome {
        let generation = self.begin();
        let raw = loader.load().await;
        match tokio::task::spawn_blocking(move || PlayerIndex::build(&raw)).await {
            Ok(index) => self.publish(generation, index),
            Err(e) => {
                error!("building player index failed (gen: {generation}): {e}");
                RefreshOutcome::Failed { generation }
            }
        }
    }

    /// Claim the next generation number.
    fn begin(&self) -> u64 {
        let mut gate = self.gate();
        gate.generation += 1;
        gate.generation
    }

    fn publish(&self, generation: u64, index: PlayerIndex) -> RefreshOutcome {
        let gate = self.gate();
        if gate.closed {
            info!("discarding player index from gen {generation}: store shut down");
            return RefreshOutcome::Closed { generation };
        }
        if gate.generation != generation {
            info!(
                "discarding stale player index (gen: {generation}, current: {})",
                gate.generation
            );
            return RefreshOutcome::Stale { generation };
        }

        let players = index.len();
        if !index.unavailable().is_empty() {
            let missing: Vec<String> = index.unavailable().iter().map(|k| k.to_string()).collect();
            warn!("data unavailable: {}", missing.join(", "));
        }
        self.tx.send_replace(Arc::new(index));
        info!("published player index gen {generation} with {players} players");
        RefreshOutcome::Published {
            generation,
            players,
        }
    }

    fn gate(&self) -> std::sync::MutexGuard<'_, Gate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
