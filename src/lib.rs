//! Sparse, incrementally updated life-like cellular automaton.
//!
//! Only cells that are alive or border a live cell are tracked, and each
//! tick touches only the neighborhoods of cells that just flipped.

pub mod sparselife;
pub use sparselife::{
    ConfigError, Pattern, RuleError, RuleTable, SparseLife, SparseLifeConfig, TickStats,
};
