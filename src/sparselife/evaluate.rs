//! Rule evaluation over the evaluation worklist.

use rand::Rng;

use super::registry::CellRegistry;
use super::rules::RuleTable;
use super::worklist::Worklists;

/// Outcome of an evaluation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvaluateStats {
    pub evaluated: usize,
    pub births: usize,
    pub deaths: usize,
    /// Cells whose rule-mandated flip was skipped by disobedience.
    pub disobeyed: usize,
}

/// Apply `rules` to every queued cell.
///
/// With probability `disobedience` a cell ignores a rule-mandated flip and
/// keeps its state. The RNG is only consulted when `disobedience > 0`, so a
/// disabled perturbation leaves the random stream untouched.
pub fn evaluate_queued<R: Rng>(
    registry: &mut CellRegistry,
    worklists: &mut Worklists,
    rules: &RuleTable,
    disobedience: f64,
    rng: &mut R,
    live: &mut u64,
) -> EvaluateStats {
    let mut queued = std::mem::take(&mut worklists.evaluation);
    let mut stats = EvaluateStats {
        evaluated: queued.len(),
        ..EvaluateStats::default()
    };

    for &idx in &queued {
        let cell = registry.cell_mut(idx);
        assert!(
            cell.queued_for_evaluation,
            "evaluation worklist entry {:?} is not flagged",
            cell.key.coords()
        );
        cell.queued_for_evaluation = false;

        let next = rules.next_state(cell.alive, cell.neighbor_count);
        if next == cell.alive {
            continue;
        }
        if disobedience > 0.0 && rng.random_bool(disobedience) {
            stats.disobeyed += 1;
            continue;
        }

        cell.alive = next;
        if next {
            *live += 1;
            stats.births += 1;
        } else {
            *live -= 1;
            stats.deaths += 1;
        }
        worklists.push_changed(registry, idx);
    }

    queued.clear();
    worklists.evaluation = queued;
    stats
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::evaluate_queued;
    use crate::sparselife::cell::CellKey;
    use crate::sparselife::registry::CellRegistry;
    use crate::sparselife::rules::RuleTable;
    use crate::sparselife::worklist::Worklists;

    fn queue(
        registry: &mut CellRegistry,
        worklists: &mut Worklists,
        x: i32,
        alive: bool,
        neighbor_count: u8,
    ) {
        let (idx, _) = registry.get_or_create(CellKey::new(x, 0));
        let cell = registry.cell_mut(idx);
        cell.alive = alive;
        cell.neighbor_count = neighbor_count;
        worklists.queue_evaluation(registry, idx);
    }

    #[test]
    fn applies_survival_and_birth_tables() {
        let mut registry = CellRegistry::new();
        let mut worklists = Worklists::new();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut live = 3;

        queue(&mut registry, &mut worklists, 0, true, 2);
        queue(&mut registry, &mut worklists, 1, true, 4);
        queue(&mut registry, &mut worklists, 2, true, 1);
        queue(&mut registry, &mut worklists, 3, false, 3);
        queue(&mut registry, &mut worklists, 4, false, 2);

        let stats = evaluate_queued(
            &mut registry,
            &mut worklists,
            &RuleTable::conway(),
            0.0,
            &mut rng,
            &mut live,
        );

        assert_eq!(stats.evaluated, 5);
        assert_eq!(stats.births, 1);
        assert_eq!(stats.deaths, 2);
        assert_eq!(live, 2);
        assert!(worklists.evaluation.is_empty());
        assert_eq!(worklists.changed.len(), 3);
        for cell in registry.iter() {
            assert!(!cell.queued_for_evaluation);
        }
        let alive: Vec<bool> = (0..5)
            .map(|x| registry.view(CellKey::new(x, 0)).unwrap().alive)
            .collect();
        assert_eq!(alive, [true, false, false, true, false]);
    }

    #[test]
    fn full_disobedience_freezes_every_flip() {
        let mut registry = CellRegistry::new();
        let mut worklists = Worklists::new();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut live = 1;

        queue(&mut registry, &mut worklists, 0, true, 0);
        queue(&mut registry, &mut worklists, 1, false, 3);

        let stats = evaluate_queued(
            &mut registry,
            &mut worklists,
            &RuleTable::conway(),
            1.0,
            &mut rng,
            &mut live,
        );

        assert_eq!(stats.disobeyed, 2);
        assert_eq!(stats.births + stats.deaths, 0);
        assert_eq!(live, 1);
        assert!(worklists.changed.is_empty());
    }
}
