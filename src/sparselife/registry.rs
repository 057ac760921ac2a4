//! Sparse cell registry.
//!
//! Records live in a flat slot vector addressed by [`CellIdx`]; a hash map
//! from [`CellKey`] to slot index is the single way to find or create them.
//! Pruned slots go on a free list and are reused by later creations, so a
//! `CellIdx` stays valid for as long as its record is registered.

use super::cell::{Cell, CellIdx, CellKey, CellKeyMap, CellView};

const INITIAL_CELL_CAPACITY: usize = 1024;

pub struct CellRegistry {
    slots: Vec<Cell>,
    index: CellKeyMap<CellIdx>,
    free_list: Vec<CellIdx>,
}

impl Default for CellRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CellRegistry {
    pub fn new() -> Self {
        let mut index = CellKeyMap::default();
        index.reserve(INITIAL_CELL_CAPACITY);
        Self {
            slots: Vec::with_capacity(INITIAL_CELL_CAPACITY),
            index,
            free_list: Vec::new(),
        }
    }

    /// Number of registered records.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Non-creating lookup.
    #[inline]
    pub fn get(&self, key: CellKey) -> Option<CellIdx> {
        self.index.get(&key).copied()
    }

    /// Return the record at `key`, creating a dead, isolated one if absent.
    /// The flag is `true` when the record was created by this call.
    pub fn get_or_create(&mut self, key: CellKey) -> (CellIdx, bool) {
        if let Some(&idx) = self.index.get(&key) {
            return (idx, false);
        }
        let cell = Cell::new(key);
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx.index()] = cell;
                idx
            }
            None => {
                let raw = u32::try_from(self.slots.len())
                    .expect("cell registry exceeded u32::MAX records");
                self.slots.push(cell);
                CellIdx(raw)
            }
        };
        self.index.insert(key, idx);
        (idx, true)
    }

    #[inline(always)]
    pub fn cell(&self, idx: CellIdx) -> &Cell {
        &self.slots[idx.index()]
    }

    #[inline(always)]
    pub fn cell_mut(&mut self, idx: CellIdx) -> &mut Cell {
        &mut self.slots[idx.index()]
    }

    /// Read-only view of the record at `key`, if tracked.
    pub fn view(&self, key: CellKey) -> Option<CellView> {
        self.get(key).map(|idx| self.cell(idx).view())
    }

    /// Iterate over every registered record, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.index.values().map(|&idx| &self.slots[idx.index()])
    }

    /// Count the Moore neighbors of `key` whose propagated state is alive.
    ///
    /// Neighbors still waiting in the changed worklist are counted by the
    /// state they had before the flip; the propagator accounts for the flip.
    pub fn settled_neighbor_count(&self, key: CellKey) -> u8 {
        key.neighbors()
            .filter_map(|n| self.get(n))
            .filter(|&idx| self.cell(idx).settled_alive())
            .count() as u8
    }

    /// Drop every dormant record (dead, zero neighbors, in no worklist).
    /// Returns how many records were removed.
    pub fn prune(&mut self) -> usize {
        let slots = &self.slots;
        let free_list = &mut self.free_list;
        let before = self.index.len();
        self.index.retain(|_, idx| {
            if slots[idx.index()].is_dormant() {
                free_list.push(*idx);
                false
            } else {
                true
            }
        });
        before - self.index.len()
    }
}
