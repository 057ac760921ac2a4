//! Cell records and the coordinate key used to address them.
//!
//! Coordinates are packed into a single `u64` (x in the high half, y in the
//! low half) so registry lookups never allocate and never collide.

use std::hash::{BuildHasherDefault, Hasher};

/// Moore neighborhood offsets, row by row from the south-west corner.
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// Largest possible live-neighbor count.
pub const MAX_NEIGHBORS: u8 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(u64);

impl CellKey {
    #[inline(always)]
    pub const fn new(x: i32, y: i32) -> Self {
        Self(((x as u32 as u64) << 32) | (y as u32 as u64))
    }

    #[inline(always)]
    pub const fn x(self) -> i32 {
        (self.0 >> 32) as u32 as i32
    }

    #[inline(always)]
    pub const fn y(self) -> i32 {
        self.0 as u32 as i32
    }

    #[inline(always)]
    pub const fn coords(self) -> (i32, i32) {
        (self.x(), self.y())
    }

    /// Key of the cell at `(x + dx, y + dy)`. Wraps at the `i32` boundary.
    #[inline(always)]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x().wrapping_add(dx), self.y().wrapping_add(dy))
    }

    /// The 8 Moore neighbors of this key.
    #[inline]
    pub fn neighbors(self) -> impl Iterator<Item = CellKey> {
        MOORE_OFFSETS
            .into_iter()
            .map(move |(dx, dy)| self.offset(dx, dy))
    }
}

/// Index of a record inside the registry's slot storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellIdx(pub u32);

impl CellIdx {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A tracked cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub key: CellKey,
    pub alive: bool,
    /// Live Moore neighbors as of the last propagation pass. Always in `0..=8`.
    pub neighbor_count: u8,
    /// Set while the cell sits in the evaluation worklist.
    pub queued_for_evaluation: bool,
    /// Set while the cell sits in the changed worklist, i.e. its current
    /// `alive` value has not been propagated to its neighbors yet.
    pub queued_for_propagation: bool,
}

impl Cell {
    pub fn new(key: CellKey) -> Self {
        Self {
            key,
            alive: false,
            neighbor_count: 0,
            queued_for_evaluation: false,
            queued_for_propagation: false,
        }
    }

    /// The state neighbors have already been told about.
    #[inline(always)]
    pub fn settled_alive(&self) -> bool {
        self.alive != self.queued_for_propagation
    }

    /// Dead, isolated and not referenced by either worklist.
    #[inline]
    pub fn is_dormant(&self) -> bool {
        !self.alive
            && self.neighbor_count == 0
            && !self.queued_for_evaluation
            && !self.queued_for_propagation
    }

    pub fn view(&self) -> CellView {
        CellView {
            x: self.key.x(),
            y: self.key.y(),
            alive: self.alive,
            neighbor_count: self.neighbor_count,
        }
    }
}

/// Read-only snapshot of a registry record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellView {
    pub x: i32,
    pub y: i32,
    pub alive: bool,
    pub neighbor_count: u8,
}

/// An entry of the changed worklist as seen by a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChangedCell {
    pub x: i32,
    pub y: i32,
    pub alive: bool,
}

// ── Hashing ─────────────────────────────────────────────────────────────

/// Two distinct Fibonacci-derived constants for mixing x and y independently,
/// so grid-aligned coordinate patterns do not collide systematically.
const MX: u64 = 0x517c_c1b7_2722_0a95;
const MY: u64 = 0x6c62_272e_07bb_0142;

#[inline(always)]
fn key_hash(packed: u64) -> u64 {
    let x = packed >> 32;
    let y = packed & 0xffff_ffff;
    x.wrapping_mul(MX) ^ y.wrapping_mul(MY).rotate_right(31)
}

/// Deterministic hasher for [`CellKey`].
#[derive(Default, Clone, Copy)]
pub struct CellKeyHasher(u64);

impl Hasher for CellKeyHasher {
    #[inline(always)]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline(always)]
    fn write_u64(&mut self, value: u64) {
        self.0 = key_hash(value ^ self.0);
    }

    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            self.write_u64(u64::from_le_bytes(buf));
        }
    }
}

pub type BuildCellKeyHasher = BuildHasherDefault<CellKeyHasher>;
pub type CellKeyMap<V> = std::collections::HashMap<CellKey, V, BuildCellKeyHasher>;
