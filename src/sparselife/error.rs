//! Error types for the sparse life engine.
//!
//! Only configuration is fallible. Registry and worklist desynchronization
//! is a programming error and panics instead.

use std::path::PathBuf;

/// Errors produced while parsing a rulestring such as `B3/S23`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The rulestring was empty or whitespace.
    #[error("empty rulestring")]
    Empty,

    /// The rulestring did not have exactly two `/`-separated parts.
    #[error("rulestring {0:?} must have the form B<digits>/S<digits> or <survival>/<birth>")]
    Malformed(String),

    /// The same side was given twice, e.g. `B3/B6`.
    #[error("rulestring {0:?} names the {1} side twice")]
    DuplicateSide(String, char),

    /// A neighbor count outside `0..=8` or a non-digit character.
    #[error("invalid neighbor count {found:?} in rulestring {rule:?}")]
    InvalidCount {
        /// The full rulestring.
        rule: String,
        /// The offending character.
        found: char,
    },
}

/// Errors that can occur when building or loading an engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        #[from]
        source: serde_yml::Error,
    },

    /// The configured rule could not be parsed.
    #[error("invalid rule: {source}")]
    Rule {
        /// The underlying rule error.
        #[from]
        source: RuleError,
    },

    /// The disobedience probability was outside `[0, 1]` or not finite.
    #[error("disobedience probability must be within [0, 1], got {0}")]
    Disobedience(f64),

    /// A prune interval of zero ticks.
    #[error("prune interval must be at least one tick")]
    PruneInterval,
}
