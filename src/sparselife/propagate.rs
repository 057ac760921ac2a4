//! Neighbor-delta propagation.
//!
//! Instead of recounting every tracked cell, each flipped cell pushes a +1 or
//! -1 into its 8 neighbors. Work is O(changed * 8). Neighbors are created on
//! demand the first time they gain a living neighbor; a dying cell never
//! creates anything.
//!
//! The flipped cell itself is queued as well: its count is unchanged, but
//! when `birth[n] != survival[n]` its new state may not be stable.

use super::cell::MAX_NEIGHBORS;
use super::registry::CellRegistry;
use super::worklist::Worklists;

/// Drain the changed worklist into neighbor counts and the evaluation worklist.
/// Returns the number of changed cells that were propagated.
pub fn propagate_changes(registry: &mut CellRegistry, worklists: &mut Worklists) -> usize {
    let mut changed = std::mem::take(&mut worklists.changed);
    let propagated = changed.len();

    for &idx in &changed {
        let cell = registry.cell_mut(idx);
        assert!(
            cell.queued_for_propagation,
            "changed worklist entry {:?} is not flagged for propagation",
            cell.key.coords()
        );
        cell.queued_for_propagation = false;
        let key = cell.key;
        let became_alive = cell.alive;

        for neighbor_key in key.neighbors() {
            let neighbor = match registry.get(neighbor_key) {
                Some(existing) => {
                    let neighbor = registry.cell_mut(existing);
                    if became_alive {
                        debug_assert!(neighbor.neighbor_count < MAX_NEIGHBORS);
                        neighbor.neighbor_count += 1;
                    } else {
                        debug_assert!(neighbor.neighbor_count > 0);
                        neighbor.neighbor_count -= 1;
                    }
                    existing
                }
                None if became_alive => {
                    let (created, _) = registry.get_or_create(neighbor_key);
                    registry.cell_mut(created).neighbor_count = 1;
                    created
                }
                None => continue,
            };
            worklists.queue_evaluation(registry, neighbor);
        }
        worklists.queue_evaluation(registry, idx);
    }

    changed.clear();
    worklists.changed = changed;
    propagated
}
