//! SparseLife engine internals and public API.

mod cell;
mod edits;
mod engine;
mod error;
mod evaluate;
mod patterns;
mod propagate;
mod registry;
mod rules;
mod worklist;

pub use cell::{CellView, ChangedCell};
pub use engine::{DEFAULT_DISOBEDIENCE, DEFAULT_SEED, SparseLife, SparseLifeConfig, TickStats};
pub use error::{ConfigError, RuleError};
pub use patterns::Pattern;
pub use rules::RuleTable;
