//! Breadth-first pathfinding used to move every entity on the grid.

use std::collections::VecDeque;

use zombie_rescue_core::{CellCoord, Direction};

/// Computes the first step of a shortest path from `from` to `to`.
///
/// The search expands the four cardinal neighbours in [`Direction::ALL`]
/// order, so among equally short paths the one discovered first in that order
/// wins. Cells for which `is_blocked` returns `true` are never entered; the
/// start cell itself is not tested. The search runs from scratch on every
/// call because obstacles move between ticks.
///
/// Returns `None` when `to` is unreachable, lies outside the grid, or equals
/// `from`.
pub fn next_step<F>(
    columns: u32,
    rows: u32,
    from: CellCoord,
    to: CellCoord,
    mut is_blocked: F,
) -> Option<CellCoord>
where
    F: FnMut(CellCoord) -> bool,
{
    if from == to || !contains(columns, rows, from) || !contains(columns, rows, to) {
        return None;
    }

    let width = usize::try_from(columns).ok()?;
    let height = usize::try_from(rows).ok()?;
    let cell_count = width.checked_mul(height)?;

    let mut visited = vec![false; cell_count];
    let mut parents: Vec<Option<CellCoord>> = vec![None; cell_count];
    visited[index(width, from)?] = true;

    let mut queue = VecDeque::with_capacity(cell_count);
    queue.push_back(from);

    while let Some(cell) = queue.pop_front() {
        if cell == to {
            return first_step(&parents, width, from, to);
        }

        for neighbor in neighbors(cell, columns, rows) {
            let Some(neighbor_index) = index(width, neighbor) else {
                continue;
            };

            if visited[neighbor_index] {
                continue;
            }
            visited[neighbor_index] = true;

            if is_blocked(neighbor) {
                continue;
            }

            parents[neighbor_index] = Some(cell);
            queue.push_back(neighbor);
        }
    }

    None
}

fn first_step(
    parents: &[Option<CellCoord>],
    width: usize,
    from: CellCoord,
    to: CellCoord,
) -> Option<CellCoord> {
    let mut cell = to;
    loop {
        let parent = parents.get(index(width, cell)?).copied().flatten()?;
        if parent == from {
            return Some(cell);
        }
        cell = parent;
    }
}

fn neighbors(cell: CellCoord, columns: u32, rows: u32) -> impl Iterator<Item = CellCoord> {
    Direction::ALL
        .into_iter()
        .filter_map(move |direction| cell.neighbor(direction, columns, rows))
}

fn contains(columns: u32, rows: u32, cell: CellCoord) -> bool {
    cell.column() < columns && cell.row() < rows
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_step_moves_straight_toward_target() {
        let step = next_step(5, 5, CellCoord::new(2, 4), CellCoord::new(2, 0), |_| false);
        assert_eq!(step, Some(CellCoord::new(2, 3)));
    }

    #[test]
    fn next_step_prefers_vertical_moves_on_ties() {
        let step = next_step(5, 5, CellCoord::new(0, 0), CellCoord::new(3, 3), |_| false);
        assert_eq!(step, Some(CellCoord::new(0, 1)));

        let step = next_step(5, 5, CellCoord::new(3, 3), CellCoord::new(0, 0), |_| false);
        assert_eq!(step, Some(CellCoord::new(3, 2)));
    }

    #[test]
    fn next_step_detours_around_blocked_cells() {
        let wall = CellCoord::new(1, 1);
        let step = next_step(3, 3, CellCoord::new(1, 2), CellCoord::new(1, 0), |cell| {
            cell == wall
        });
        assert_eq!(step, Some(CellCoord::new(0, 2)));
    }

    #[test]
    fn next_step_returns_none_for_enclosed_target() {
        let target = CellCoord::new(2, 2);
        let walls = [
            CellCoord::new(2, 1),
            CellCoord::new(2, 3),
            CellCoord::new(1, 2),
            CellCoord::new(3, 2),
        ];
        let step = next_step(5, 5, CellCoord::new(0, 0), target, |cell| walls.contains(&cell));
        assert_eq!(step, None);
    }

    #[test]
    fn next_step_returns_none_when_already_there() {
        let cell = CellCoord::new(1, 1);
        assert_eq!(next_step(3, 3, cell, cell, |_| false), None);
    }

    #[test]
    fn next_step_never_tests_the_start_cell() {
        let start = CellCoord::new(0, 0);
        let step = next_step(2, 1, start, CellCoord::new(1, 0), |cell| cell == start);
        assert_eq!(step, Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn next_step_rejects_targets_outside_grid() {
        let step = next_step(3, 3, CellCoord::new(0, 0), CellCoord::new(3, 0), |_| false);
        assert_eq!(step, None);
    }
}
