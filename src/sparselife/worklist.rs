//! The two worklists shared by the tick phases.
//!
//! Membership is tracked by flags on the cell records themselves, so pushing
//! is O(1) and never produces duplicates.

use super::cell::CellIdx;
use super::registry::CellRegistry;

#[derive(Default)]
pub struct Worklists {
    /// Cells whose neighbor count changed and must be re-checked against the rules.
    pub evaluation: Vec<CellIdx>,
    /// Cells whose `alive` flipped and whose neighbors have not been told yet.
    pub changed: Vec<CellIdx>,
}

impl Worklists {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `idx` for evaluation unless it already is.
    /// Returns `true` if the cell was newly queued.
    #[inline]
    pub fn queue_evaluation(&mut self, registry: &mut CellRegistry, idx: CellIdx) -> bool {
        let cell = registry.cell_mut(idx);
        if cell.queued_for_evaluation {
            return false;
        }
        cell.queued_for_evaluation = true;
        self.evaluation.push(idx);
        true
    }

    /// Record that `idx` flipped and must be propagated.
    #[inline]
    pub fn push_changed(&mut self, registry: &mut CellRegistry, idx: CellIdx) {
        let cell = registry.cell_mut(idx);
        assert!(
            !cell.queued_for_propagation,
            "cell {:?} flipped twice without being propagated",
            cell.key.coords()
        );
        cell.queued_for_propagation = true;
        self.changed.push(idx);
    }

    /// Drop changed entries whose propagation flag was withdrawn.
    pub fn retain_changed(&mut self, registry: &CellRegistry) {
        self.changed
            .retain(|&idx| registry.cell(idx).queued_for_propagation);
    }
}
