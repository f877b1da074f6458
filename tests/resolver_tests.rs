//! Merge, explosion and chain properties

use heatfall::core::resolver::{process_explosions, process_merges};
use heatfall::core::{merge_score, ActiveSet, Grid, ResolveStep, Resolver};
use heatfall::types::{Cell, GRID_COLS, GRID_ROWS, MAX_LEVEL};

fn grid_with(cells: &[(i8, i8, Cell)]) -> Grid {
    let mut grid = Grid::new();
    for &(r, c, cell) in cells {
        grid.set(r, c, cell);
    }
    grid
}

#[test]
fn test_merge_conservation() {
    for (k, level, chain) in [(2usize, 1u8, 0u32), (3, 2, 0), (3, 2, 2), (4, 1, 5), (5, 3, 1)] {
        let mut grid = Grid::new();
        for col in 0..k as i8 {
            grid.set(11, col, Cell::Tile(level));
        }
        // Unrelated neighbours of other levels stay put.
        grid.set(10, 0, Cell::Tile(level + 1));
        let before = grid.occupied_count();
        let mut active = ActiveSet::all_tiles(&grid);

        let outcome = process_merges(&mut grid, &mut active, chain);

        let expected = k as u32 * level as u32 * 15 * chain.max(1);
        assert_eq!(outcome.score, expected, "k={} level={} chain={}", k, level, chain);
        assert_eq!(merge_score(k, level, chain), expected);
        assert_eq!(grid.occupied_count(), before - (k - 1));

        let merged = (level as usize + k - 1).min(MAX_LEVEL as usize + 1) as u8;
        assert_eq!(grid.get(11, 0), Some(Cell::tile(merged)));
    }
}

#[test]
fn test_no_false_merges_on_checkerboard() {
    let mut grid = Grid::new();
    for row in 0..GRID_ROWS as i8 {
        for col in 0..GRID_COLS as i8 {
            let level = if (row + col) % 2 == 0 { 1 } else { 2 };
            grid.set(row, col, Cell::Tile(level));
        }
    }
    let snapshot = grid.clone();
    let mut resolver = Resolver::new();
    resolver.begin(ActiveSet::all_tiles(&grid));

    assert_eq!(resolver.step(&mut grid), ResolveStep::Stable);
    assert_eq!(grid, snapshot);
    assert_eq!(resolver.chain(), 0);
}

#[test]
fn test_explosion_propagation() {
    // Explosive in the middle, one of each neighbour kind around it.
    let mut grid = grid_with(&[
        (6, 2, Cell::Explosive),
        (5, 2, Cell::Tile(2)),
        (7, 2, Cell::Junk),
        (6, 1, Cell::Tile(MAX_LEVEL)),
        (6, 3, Cell::Tile(1)),
        (5, 1, Cell::Tile(4)),
    ]);
    let mut active = ActiveSet::new();

    let outcome = process_explosions(&mut grid, &mut active, 0);

    assert_eq!(outcome.exploded, 1);
    assert_eq!(outcome.junk_destroyed, 1);
    assert_eq!(grid.get(6, 2), Some(Cell::Empty));
    assert_eq!(grid.get(7, 2), Some(Cell::Empty));
    assert_eq!(grid.get(5, 2), Some(Cell::Tile(3)));
    assert_eq!(grid.get(6, 3), Some(Cell::Tile(2)));
    assert_eq!(grid.get(6, 1), Some(Cell::Explosive));
    // Diagonal cells are untouched.
    assert_eq!(grid.get(5, 1), Some(Cell::Tile(4)));
}

#[test]
fn test_new_explosives_wait_for_next_iteration() {
    let mut grid = grid_with(&[(11, 0, Cell::Explosive), (11, 1, Cell::Tile(MAX_LEVEL))]);
    let mut resolver = Resolver::new();
    resolver.begin(ActiveSet::new());

    let ResolveStep::Exploded(first) = resolver.step(&mut grid) else {
        panic!("expected an explosion");
    };
    assert_eq!(first.exploded, 1);
    assert_eq!(grid.get(11, 1), Some(Cell::Explosive));

    let ResolveStep::Exploded(second) = resolver.step(&mut grid) else {
        panic!("expected the chained explosion");
    };
    assert_eq!(second.exploded, 1);
    assert_eq!(second.score, 200 * 2);
    assert_eq!(grid.occupied_count(), 0);
    assert_eq!(resolver.step(&mut grid), ResolveStep::Stable);
}

#[test]
fn test_max_level_merge_explodes_next() {
    let mut grid = grid_with(&[
        (11, 0, Cell::Tile(MAX_LEVEL)),
        (11, 1, Cell::Tile(MAX_LEVEL)),
        (11, 2, Cell::Junk),
        (10, 0, Cell::Tile(2)),
    ]);
    let mut active = ActiveSet::new();
    active.insert(11, 1);
    let mut resolver = Resolver::new();
    resolver.begin(active);

    let ResolveStep::Merged(merged) = resolver.step(&mut grid) else {
        panic!("expected a merge");
    };
    assert_eq!(merged.score, 2 * 5 * 15);
    assert_eq!(grid.get(11, 0), Some(Cell::Explosive));

    let ResolveStep::Exploded(exploded) = resolver.step(&mut grid) else {
        panic!("expected an explosion");
    };
    assert_eq!(exploded.score, 200 * 2);
    // The tile above was raised, then fell into the crater.
    assert_eq!(grid.get(11, 0), Some(Cell::Tile(3)));
    assert_eq!(grid.get(11, 2), Some(Cell::Junk));
    assert_eq!(resolver.step(&mut grid), ResolveStep::Stable);
    assert_eq!(resolver.chain(), 2);
}
