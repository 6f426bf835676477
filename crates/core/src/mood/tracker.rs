use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

use tokio::sync::watch;
use uuid::Uuid;

use super::state::MoodState;
use crate::types::{EmotionAnalysis, MoodSnapshot};

/// One tracked mood: the state under its update lock, plus a broadcast of
/// the latest snapshot for observers.
struct MoodCell {
    state: Mutex<MoodState>,
    tx: watch::Sender<MoodSnapshot>,
}

/// Keyed registry of per-persona mood states.
///
/// The append/evict/recompute cycle for one persona runs under that cell's
/// lock as a single unit, so concurrent observers of the same persona never
/// interleave updates or read a torn mood/stability pair.
pub struct MoodTracker {
    cells: RwLock<HashMap<Uuid, MoodCell>>,
}

impl MoodTracker {
    pub fn new() -> Self {
        Self { cells: RwLock::new(HashMap::new()) }
    }

    /// Track `state` under `id`, replacing any existing cell.
    pub fn register(&self, id: Uuid, state: MoodState) {
        let (tx, _rx) = watch::channel(state.snapshot());
        let cell = MoodCell { state: Mutex::new(state), tx };
        self.cells
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, cell);
    }

    /// Stop tracking `id`. Subscribers see the channel close.
    pub fn remove(&self, id: Uuid) -> bool {
        self.cells
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    /// Fold `analysis` into the mood tracked under `id` and broadcast the
    /// refreshed snapshot. `None` when the id is unknown.
    pub fn observe(&self, id: Uuid, analysis: &EmotionAnalysis) -> Option<MoodSnapshot> {
        let cells = self.cells.read().unwrap_or_else(PoisonError::into_inner);
        let cell = cells.get(&id)?;
        // observe() cannot panic, so a poisoned cell still holds a
        // consistent state.
        let mut state = cell.state.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = state.observe(analysis);
        // a failed send only means no subscribers remain
        let _ = cell.tx.send(snapshot);
        Some(snapshot)
    }

    /// Watch a persona's mood without holding any lock.
    pub fn subscribe(&self, id: Uuid) -> Option<watch::Receiver<MoodSnapshot>> {
        let cells = self.cells.read().unwrap_or_else(PoisonError::into_inner);
        cells.get(&id).map(|cell| cell.tx.subscribe())
    }

    pub fn snapshot(&self, id: Uuid) -> Option<MoodSnapshot> {
        let cells = self.cells.read().unwrap_or_else(PoisonError::into_inner);
        let cell = cells.get(&id)?;
        let state = cell.state.lock().unwrap_or_else(PoisonError::into_inner);
        Some(state.snapshot())
    }

    /// Clone of the full state under `id`, for callers that persist it.
    pub fn export(&self, id: Uuid) -> Option<MoodState> {
        let cells = self.cells.read().unwrap_or_else(PoisonError::into_inner);
        let cell = cells.get(&id)?;
        let state = cell.state.lock().unwrap_or_else(PoisonError::into_inner);
        Some(state.clone())
    }

    pub fn len(&self) -> usize {
        self.cells.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MoodTracker {
    fn default() -> Self {
        Self::new()
    }
}
