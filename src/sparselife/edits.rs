//! Buffered user edits and their reconciliation at the tick boundary.
//!
//! `add_cell`/`remove_cell` only record intent here. Nothing in the registry
//! or the worklists changes until [`EditBuffer::reconcile`] runs at the start
//! of the next tick, so edits made between ticks can never corrupt in-flight
//! simulation state.

use super::cell::{CellKey, CellKeyMap};
use super::registry::CellRegistry;
use super::worklist::Worklists;

/// Outcome of a reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Edits written into the registry and queued for propagation.
    pub committed: usize,
    /// Edits that reverted a natural flip still waiting in the changed worklist.
    pub cancelled: usize,
}

#[derive(Default)]
pub struct EditBuffer {
    /// Requested `alive` value per coordinate. Only holds entries that differ
    /// from the registry's current state.
    pending: CellKeyMap<bool>,
    dirty: bool,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// State a coordinate will have once pending edits are applied.
    pub fn effective_alive(&self, registry: &CellRegistry, key: CellKey) -> bool {
        match self.pending.get(&key) {
            Some(&target) => target,
            None => registry
                .get(key)
                .is_some_and(|idx| registry.cell(idx).alive),
        }
    }

    /// Request that `key` becomes `target`.
    ///
    /// A request that matches the effective state is ignored. A request that
    /// undoes a still-pending opposite request removes both.
    /// Returns `true` if the buffer changed.
    pub fn request(&mut self, registry: &CellRegistry, key: CellKey, target: bool) -> bool {
        if self.effective_alive(registry, key) == target {
            return false;
        }
        if self.pending.remove(&key).is_none() {
            self.pending.insert(key, target);
        }
        self.dirty = true;
        true
    }

    /// Fold every pending edit into the registry and the worklists, then
    /// clear the buffer.
    ///
    /// An edit on a cell whose natural flip has not been propagated yet
    /// reverts that flip: both are dropped and the neighbors never hear of
    /// either. Any other edit is committed with a freshly scanned neighbor
    /// count, appended to the changed worklist and queued for evaluation.
    pub fn reconcile(
        &mut self,
        registry: &mut CellRegistry,
        worklists: &mut Worklists,
        live: &mut u64,
    ) -> ReconcileStats {
        let mut stats = ReconcileStats::default();

        for (key, target) in self.pending.drain() {
            let (idx, _) = registry.get_or_create(key);
            let neighbor_count = registry.settled_neighbor_count(key);
            let cell = registry.cell_mut(idx);
            // Requests are filtered against the registry, which only a tick mutates.
            debug_assert_ne!(cell.alive, target, "stale edit at {:?}", key.coords());
            if cell.alive == target {
                continue;
            }

            cell.alive = target;
            if target {
                *live += 1;
            } else {
                *live -= 1;
            }

            if cell.queued_for_propagation {
                cell.queued_for_propagation = false;
                stats.cancelled += 1;
                continue;
            }

            cell.neighbor_count = neighbor_count;
            worklists.push_changed(registry, idx);
            worklists.queue_evaluation(registry, idx);
            stats.committed += 1;
        }

        if stats.cancelled > 0 {
            worklists.retain_changed(registry);
        }
        self.dirty = false;
        stats
    }
}
