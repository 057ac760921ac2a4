use std::collections::HashSet;

use sparse_life::{Pattern, RuleTable, SparseLife, SparseLifeConfig};

const F: bool = false;
const T: bool = true;

fn classic() -> SparseLife {
    let rule = RuleTable::new([F, F, T, T, F, F, F, F, F], [F, F, F, T, F, F, F, F, F]);
    SparseLife::with_config(SparseLifeConfig::default().rule(rule).disobedience(0.0))
        .expect("classic config is valid")
}

fn assert_alive(engine: &SparseLife, cells: &[(i32, i32)]) {
    for &(x, y) in cells {
        assert!(engine.is_alive(x, y), "expected alive at ({x},{y})");
    }
}

fn assert_dead(engine: &SparseLife, cells: &[(i32, i32)]) {
    for &(x, y) in cells {
        assert!(!engine.is_alive(x, y), "expected dead at ({x},{y})");
    }
}

fn collect_live(engine: &SparseLife) -> HashSet<(i32, i32)> {
    let mut out = HashSet::new();
    engine.for_each_live(|x, y| {
        out.insert((x, y));
    });
    out
}

fn registry_live(engine: &SparseLife) -> u64 {
    engine.cells().filter(|cell| cell.alive).count() as u64
}

#[test]
fn blinker_oscillates() {
    let mut engine = classic();
    engine.add_cells([(0, 1), (1, 1), (2, 1)]);

    engine.tick();

    assert_eq!(collect_live(&engine), HashSet::from([(1, 0), (1, 1), (1, 2)]));
    assert_eq!(engine.live_count(), 3);

    engine.tick();

    assert_eq!(collect_live(&engine), HashSet::from([(0, 1), (1, 1), (2, 1)]));
    assert_eq!(engine.live_count(), 3);
}

#[test]
fn blinker_reports_only_flipped_cells() {
    let mut engine = classic();
    engine.add_cells([(0, 1), (1, 1), (2, 1)]);
    engine.tick();

    let changed: HashSet<_> = engine
        .changed_cells()
        .map(|cell| (cell.x, cell.y, cell.alive))
        .collect();
    assert_eq!(
        changed,
        HashSet::from([(0, 1, false), (2, 1, false), (1, 0, true), (1, 2, true)])
    );
}

#[test]
fn block_is_stable() {
    let mut engine = classic();
    let block = Pattern::Block.cells(0, 0);
    engine.add_cells(block.iter().copied());

    engine.tick();
    assert_alive(&engine, &block);
    assert_dead(&engine, &[(2, 0), (2, 1), (-1, 0), (-1, 1)]);
    assert_eq!(engine.changed_cells().count(), 0);

    // Nothing flipped, so the next tick has nothing to propagate or evaluate.
    let stats = engine.tick();
    assert_eq!(stats.propagated, 0);
    assert_eq!(stats.evaluated, 0);
    assert_alive(&engine, &block);
}

#[test]
fn glider_moves_diagonally_every_four_steps() {
    let mut engine = classic();
    let glider = Pattern::Glider.cells(0, 0);
    engine.add_cells(glider.iter().copied());

    engine.step_n(4);

    let shifted: HashSet<_> = Pattern::Glider.cells(1, 1).into_iter().collect();
    assert_eq!(collect_live(&engine), shifted);
    assert_eq!(engine.live_count(), 5);
}

#[test]
fn single_cell_materializes_its_neighborhood() {
    let mut engine = classic();
    engine.add_cell(5, 5);
    assert_eq!(engine.registry_len(), 0, "edits stay buffered until the tick");

    engine.tick();

    assert_eq!(engine.registry_len(), 9);
    let center = engine.cell(5, 5).expect("center is tracked");
    assert_eq!(center.neighbor_count, 0);
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let neighbor = engine.cell(5 + dx, 5 + dy).expect("neighbor is tracked");
            assert_eq!(neighbor.neighbor_count, 1, "neighbor ({dx},{dy})");
            assert!(!neighbor.alive);
        }
    }
    // The lone cell starved in the same tick; its death is reported for redraw.
    assert!(!center.alive);
    assert_eq!(engine.live_count(), 0);
    let changed: Vec<_> = engine.changed_cells().collect();
    assert_eq!(changed.len(), 1);
    assert_eq!((changed[0].x, changed[0].y, changed[0].alive), (5, 5, false));
}

#[test]
fn empty_world_tick_is_a_no_op() {
    let mut engine = classic();
    let stats = engine.tick();

    assert_eq!(stats.reconciled + stats.cancelled, 0);
    assert_eq!(stats.propagated, 0);
    assert_eq!(stats.evaluated, 0);
    assert_eq!(engine.registry_len(), 0);
    assert_eq!(engine.changed_cells().count(), 0);
    assert_eq!(engine.queued_for_evaluation(), 0);
    assert_eq!(engine.live_count(), 0);
}

#[test]
fn empty_world_after_extinction_stays_unchanged() {
    let mut engine = classic();
    engine.add_cell(0, 0);
    engine.step_n(2);
    assert_eq!(engine.live_count(), 0);

    let before: Vec<_> = {
        let mut cells: Vec<_> = engine.cells().map(|c| (c.x, c.y, c.alive, c.neighbor_count)).collect();
        cells.sort_unstable();
        cells
    };
    let stats = engine.tick();
    let mut after: Vec<_> = engine.cells().map(|c| (c.x, c.y, c.alive, c.neighbor_count)).collect();
    after.sort_unstable();

    assert_eq!(stats.evaluated, 0);
    assert_eq!(before, after);
    assert_eq!(engine.changed_cells().count(), 0);
    assert_eq!(engine.queued_for_evaluation(), 0);
    assert_eq!(engine.live_count(), 0);
}

#[test]
fn shared_neighbor_is_evaluated_once() {
    let mut engine = classic();
    engine.add_cells([(0, 0), (2, 0)]);

    let stats = engine.tick();

    // Two committed cells plus the 13 distinct cells around them; the three
    // cells at x = 1 border both but are queued a single time.
    assert_eq!(stats.evaluated, 15);
    assert_eq!(engine.registry_len(), 15);
    assert_eq!(engine.cell(1, 0).map(|c| c.neighbor_count), Some(2));
}

#[test]
fn live_count_tracks_registry_through_edits_and_ticks() {
    let mut engine = classic();
    engine.add_cells(Pattern::RPentomino.cells(0, 0));
    for generation in 0..60 {
        engine.tick();
        assert_eq!(engine.live_count(), registry_live(&engine), "generation {generation}");
        if generation % 7 == 0 {
            engine.add_cell(generation, -generation);
            engine.remove_cell(1, 1);
        }
    }
}

#[test]
fn extreme_coordinates_are_ordinary_cells() {
    let mut engine = classic();
    let line = [(i32::MAX, 0), (i32::MIN, 0), (i32::MIN + 1, 0)];
    engine.add_cells(line);

    engine.tick();

    assert_eq!(
        collect_live(&engine),
        HashSet::from([(i32::MIN, -1), (i32::MIN, 0), (i32::MIN, 1)])
    );
}

#[test]
fn full_disobedience_freezes_the_world() {
    let config = SparseLifeConfig::default().disobedience(1.0);
    let mut engine = SparseLife::with_config(config).unwrap();
    engine.add_cells([(0, 1), (1, 1), (2, 1)]);

    for _ in 0..3 {
        engine.tick();
    }

    assert_eq!(collect_live(&engine), HashSet::from([(0, 1), (1, 1), (2, 1)]));
    assert_eq!(engine.live_count(), 3);
}

#[test]
fn same_seed_same_history() {
    let run = |seed: u64| {
        let config = SparseLifeConfig::default().disobedience(0.2).seed(seed);
        let mut engine = SparseLife::with_config(config).unwrap();
        engine.add_cells(Pattern::RPentomino.cells(0, 0));
        engine.step_n(40);
        let mut live: Vec<_> = collect_live(&engine).into_iter().collect();
        live.sort_unstable();
        (live, engine.live_count())
    };

    assert_eq!(run(11), run(11));
}

#[test]
fn independent_instances_do_not_interfere() {
    let mut a = classic();
    let mut b = classic();
    a.add_cells([(0, 1), (1, 1), (2, 1)]);
    b.add_cells(Pattern::Block.cells(10, 10));

    a.tick();
    b.tick();

    assert_eq!(a.live_count(), 3);
    assert_eq!(b.live_count(), 4);
    assert!(!a.is_alive(10, 10));
    assert!(!b.is_alive(1, 1));
}

#[test]
fn manual_prune_keeps_live_neighborhoods() {
    let mut engine = classic();
    engine.add_cells(Pattern::Glider.cells(0, 0));
    engine.step_n(40);
    let before = collect_live(&engine);
    let tracked = engine.registry_len();

    let removed = engine.prune();

    assert!(removed > 0, "a travelling glider leaves dormant records behind");
    assert_eq!(engine.registry_len(), tracked - removed);
    assert_eq!(collect_live(&engine), before);

    engine.step_n(4);
    let shifted: HashSet<_> = before.iter().map(|&(x, y)| (x + 1, y + 1)).collect();
    assert_eq!(collect_live(&engine), shifted);
}
