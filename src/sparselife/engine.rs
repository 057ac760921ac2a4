//! SparseLife engine: public API and the per-tick phase sequence.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::cell::{CellKey, CellView, ChangedCell};
use super::edits::EditBuffer;
use super::error::ConfigError;
use super::evaluate::evaluate_queued;
use super::propagate::propagate_changes;
use super::registry::CellRegistry;
use super::rules::RuleTable;
use super::worklist::Worklists;

/// Probability that a cell ignores a rule-mandated flip. Disabled by default.
pub const DEFAULT_DISOBEDIENCE: f64 = 0.0;

/// Seed used when none is configured, so default runs are reproducible.
pub const DEFAULT_SEED: u64 = 0x5EED_1234_ABCD_EF01;

/// Configuration for a SparseLife engine instance.
///
/// Use `SparseLifeConfig::default()` for the classic rule with no
/// perturbation and no pruning, or customise individual knobs via the
/// builder methods. Also deserializable from YAML:
///
/// ```yaml
/// rule: B36/S23
/// disobedience: 0.001
/// seed: 42
/// prune_interval: 64
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SparseLifeConfig {
    /// Survival/birth tables. Fixed for the lifetime of the engine.
    pub rule: RuleTable,
    /// Per-evaluation probability of ignoring a rule-mandated flip.
    pub disobedience: f64,
    /// Seed for the disobedience RNG.
    pub seed: u64,
    /// Prune dormant records every `n` ticks. `None` keeps every record
    /// ever created.
    pub prune_interval: Option<u64>,
}

impl Default for SparseLifeConfig {
    fn default() -> Self {
        Self {
            rule: RuleTable::conway(),
            disobedience: DEFAULT_DISOBEDIENCE,
            seed: DEFAULT_SEED,
            prune_interval: None,
        }
    }
}

impl SparseLifeConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML for this struct, or a
    /// validation error from [`SparseLifeConfig::validate`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] on malformed input (including an
    /// unparsable rulestring) or a validation error.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Disobedience`] if the probability is not within
    /// `[0, 1]`, [`ConfigError::PruneInterval`] for a zero interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.disobedience) {
            return Err(ConfigError::Disobedience(self.disobedience));
        }
        if self.prune_interval == Some(0) {
            return Err(ConfigError::PruneInterval);
        }
        Ok(())
    }

    pub fn rule(mut self, rule: RuleTable) -> Self {
        self.rule = rule;
        self
    }

    pub fn disobedience(mut self, probability: f64) -> Self {
        self.disobedience = probability;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn prune_interval(mut self, ticks: u64) -> Self {
        self.prune_interval = Some(ticks);
        self
    }
}

/// Work done by one [`SparseLife::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Generation reached by this tick.
    pub generation: u64,
    /// User edits committed into the registry.
    pub reconciled: usize,
    /// User edits that reverted a not-yet-propagated natural flip.
    pub cancelled: usize,
    /// Changed cells whose flip was pushed into their neighbors.
    pub propagated: usize,
    /// Cells checked against the rule tables.
    pub evaluated: usize,
    pub births: usize,
    pub deaths: usize,
    pub disobeyed: usize,
    /// Dormant records removed by scheduled pruning.
    pub pruned: usize,
}

pub struct SparseLife {
    registry: CellRegistry,
    worklists: Worklists,
    edits: EditBuffer,
    rule: RuleTable,
    disobedience: f64,
    rng: StdRng,
    live: u64,
    generation: u64,
    prune_interval: Option<u64>,
}

impl Default for SparseLife {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseLife {
    /// Classic B3/S23 engine with no disobedience and no pruning.
    pub fn new() -> Self {
        Self::build(SparseLifeConfig::default())
    }

    /// Create an engine with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error of `config`.
    pub fn with_config(config: SparseLifeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            rule = %config.rule,
            disobedience = config.disobedience,
            seed = config.seed,
            prune_interval = ?config.prune_interval,
            "sparse life engine created"
        );
        Ok(Self::build(config))
    }

    fn build(config: SparseLifeConfig) -> Self {
        Self {
            registry: CellRegistry::new(),
            worklists: Worklists::new(),
            edits: EditBuffer::new(),
            rule: config.rule,
            disobedience: config.disobedience,
            rng: StdRng::seed_from_u64(config.seed),
            live: 0,
            generation: 0,
            prune_interval: config.prune_interval,
        }
    }

    // ── Edits ───────────────────────────────────────────────────────────

    /// Request a live cell at `(x, y)`, applied at the start of the next tick.
    /// Undoes a pending `remove_cell` at the same coordinate instead.
    /// Returns `false` if the cell is already (or already going to be) alive.
    pub fn add_cell(&mut self, x: i32, y: i32) -> bool {
        self.edits.request(&self.registry, CellKey::new(x, y), true)
    }

    /// Request that the live cell at `(x, y)` dies at the start of the next tick.
    /// Undoes a pending `add_cell` at the same coordinate instead.
    /// Returns `false` if there is no (pending) live cell there.
    pub fn remove_cell(&mut self, x: i32, y: i32) -> bool {
        self.edits.request(&self.registry, CellKey::new(x, y), false)
    }

    /// Batch form of [`SparseLife::add_cell`].
    pub fn add_cells<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        for (x, y) in cells {
            self.add_cell(x, y);
        }
    }

    pub fn has_pending_edits(&self) -> bool {
        !self.edits.is_empty()
    }

    pub fn pending_edits(&self) -> usize {
        self.edits.len()
    }

    // ── Simulation ──────────────────────────────────────────────────────

    /// Advance one generation: reconcile edits (if any), propagate the
    /// previous flips, then evaluate every affected cell.
    pub fn tick(&mut self) -> TickStats {
        let reconcile = if self.edits.is_dirty() {
            self.edits
                .reconcile(&mut self.registry, &mut self.worklists, &mut self.live)
        } else {
            Default::default()
        };

        let propagated = propagate_changes(&mut self.registry, &mut self.worklists);

        let evaluate = evaluate_queued(
            &mut self.registry,
            &mut self.worklists,
            &self.rule,
            self.disobedience,
            &mut self.rng,
            &mut self.live,
        );

        self.generation += 1;

        let pruned = match self.prune_interval {
            Some(every) if self.generation % every == 0 => self.prune(),
            _ => 0,
        };

        let stats = TickStats {
            generation: self.generation,
            reconciled: reconcile.committed,
            cancelled: reconcile.cancelled,
            propagated,
            evaluated: evaluate.evaluated,
            births: evaluate.births,
            deaths: evaluate.deaths,
            disobeyed: evaluate.disobeyed,
            pruned,
        };
        trace!(
            generation = stats.generation,
            reconciled = stats.reconciled,
            cancelled = stats.cancelled,
            propagated = stats.propagated,
            evaluated = stats.evaluated,
            births = stats.births,
            deaths = stats.deaths,
            live = self.live,
            "tick"
        );
        stats
    }

    pub fn step_n(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Remove dormant records: dead, no live neighbors, in no worklist.
    /// Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        if self.registry.is_empty() {
            return 0;
        }
        let removed = self.registry.prune();
        debug!(
            removed,
            remaining = self.registry.len(),
            generation = self.generation,
            "pruned dormant cells"
        );
        removed
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Cells whose state flipped in the last tick (or whose edit was just
    /// reconciled), in the order they flipped.
    pub fn changed_cells(&self) -> impl Iterator<Item = ChangedCell> + '_ {
        self.worklists.changed.iter().map(|&idx| {
            let cell = self.registry.cell(idx);
            ChangedCell {
                x: cell.key.x(),
                y: cell.key.y(),
                alive: cell.alive,
            }
        })
    }

    /// Number of alive cells in the registry.
    pub fn live_count(&self) -> u64 {
        self.live
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Registry state at `(x, y)`. Pending edits are not visible here.
    pub fn is_alive(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_some_and(|cell| cell.alive)
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<CellView> {
        self.registry.view(CellKey::new(x, y))
    }

    /// Number of tracked records, alive or not.
    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }

    /// Every tracked record, in no particular order.
    pub fn cells(&self) -> impl Iterator<Item = CellView> + '_ {
        self.registry.iter().map(|cell| cell.view())
    }

    /// Cells waiting for the next evaluation pass.
    pub fn queued_for_evaluation(&self) -> usize {
        self.worklists.evaluation.len()
    }

    pub fn for_each_live<F: FnMut(i32, i32)>(&self, mut f: F) {
        for cell in self.registry.iter().filter(|cell| cell.alive) {
            f(cell.key.x(), cell.key.y());
        }
    }

    /// `(min_x, min_y, max_x, max_y)` of the live cells.
    pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
        let mut bounds: Option<(i32, i32, i32, i32)> = None;
        self.for_each_live(|x, y| {
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((min_x, min_y, max_x, max_y)) => {
                    (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
                }
            });
        });
        bounds
    }

    pub fn rule(&self) -> &RuleTable {
        &self.rule
    }

    pub fn disobedience(&self) -> f64 {
        self.disobedience
    }
}

#[cfg(test)]
mod tests {
    use super::{SparseLife, SparseLifeConfig};
    use crate::sparselife::error::ConfigError;
    use crate::sparselife::rules::RuleTable;

    #[test]
    fn config_rejects_out_of_range_values() {
        let bad = SparseLifeConfig::default().disobedience(1.5);
        assert!(matches!(
            SparseLife::with_config(bad),
            Err(ConfigError::Disobedience(_))
        ));
        let nan = SparseLifeConfig::default().disobedience(f64::NAN);
        assert!(matches!(nan.validate(), Err(ConfigError::Disobedience(_))));
        let zero = SparseLifeConfig::default().prune_interval(0);
        assert!(matches!(zero.validate(), Err(ConfigError::PruneInterval)));
    }

    #[test]
    fn config_parses_yaml() {
        let config = SparseLifeConfig::parse(
            "rule: B36/S23\ndisobedience: 0.25\nseed: 9\nprune_interval: 16\n",
        )
        .unwrap();
        assert_eq!(config.rule, RuleTable::high_life());
        assert_eq!(config.disobedience, 0.25);
        assert_eq!(config.seed, 9);
        assert_eq!(config.prune_interval, Some(16));

        let defaults = SparseLifeConfig::parse("{}").unwrap();
        assert_eq!(defaults, SparseLifeConfig::default());
    }

    #[test]
    fn config_yaml_errors_are_typed() {
        assert!(matches!(
            SparseLifeConfig::parse("rule: B9/S23\n"),
            Err(ConfigError::Yaml { .. })
        ));
        assert!(matches!(
            SparseLifeConfig::parse("disobedience: -0.1\n"),
            Err(ConfigError::Disobedience(_))
        ));
        assert!(matches!(
            SparseLifeConfig::parse("speed: 3\n"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn bounds_cover_live_cells() {
        let mut engine = SparseLife::new();
        assert_eq!(engine.bounds(), None);
        engine.add_cells([(0, 0), (1, 0), (0, 1), (1, 1)]);
        engine.tick();
        assert_eq!(engine.bounds(), Some((0, 0, 1, 1)));
    }

    #[test]
    fn scheduled_pruning_drops_dead_debris() {
        let config = SparseLifeConfig::default().prune_interval(2);
        let mut engine = SparseLife::with_config(config).unwrap();
        engine.add_cell(0, 0);

        let first = engine.tick();
        assert_eq!(first.pruned, 0);
        assert_eq!(engine.registry_len(), 9);

        // Second tick propagates the death; every record goes dormant.
        let second = engine.tick();
        assert_eq!(second.pruned, 9);
        assert_eq!(engine.registry_len(), 0);
        assert_eq!(engine.live_count(), 0);
    }
}
