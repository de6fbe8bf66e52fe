use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;
use zombie_rescue_core::{CellCoord, Command, Event, SessionConfig};
use zombie_rescue_world::{self as world, navigation, query, World};

/// Plain BFS distance used to check the steps `next_step` picks.
fn distance(
    columns: u32,
    rows: u32,
    from: CellCoord,
    to: CellCoord,
    blocked: &HashSet<CellCoord>,
) -> Option<u32> {
    let mut seen = HashSet::from([from]);
    let mut queue = VecDeque::from([(from, 0)]);
    while let Some((cell, depth)) = queue.pop_front() {
        if cell == to {
            return Some(depth);
        }
        let candidates = [
            cell.row().checked_sub(1).map(|row| CellCoord::new(cell.column(), row)),
            Some(CellCoord::new(cell.column(), cell.row() + 1)),
            cell.column().checked_sub(1).map(|column| CellCoord::new(column, cell.row())),
            Some(CellCoord::new(cell.column() + 1, cell.row())),
        ];
        for next in candidates.into_iter().flatten() {
            if next.column() >= columns || next.row() >= rows || blocked.contains(&next) {
                continue;
            }
            if seen.insert(next) {
                queue.push_back((next, depth + 1));
            }
        }
    }
    None
}

fn cell_strategy(columns: u32, rows: u32) -> impl Strategy<Value = CellCoord> {
    (0..columns, 0..rows).prop_map(|(column, row)| CellCoord::new(column, row))
}

fn grid_case() -> impl Strategy<Value = (u32, u32, CellCoord, CellCoord, Vec<CellCoord>)> {
    (2_u32..12, 2_u32..12).prop_flat_map(|(columns, rows)| {
        (
            Just(columns),
            Just(rows),
            cell_strategy(columns, rows),
            cell_strategy(columns, rows),
            prop::collection::vec(cell_strategy(columns, rows), 0..24),
        )
    })
}

proptest! {
    #[test]
    fn open_grid_steps_follow_manhattan_paths(case in grid_case()) {
        let (columns, rows, from, to, _) = case;
        let step = navigation::next_step(columns, rows, from, to, |_| false);

        if from == to {
            prop_assert_eq!(step, None);
        } else {
            let step = step.expect("open grid is always connected");
            prop_assert_eq!(step.manhattan_distance(from), 1);
            prop_assert_eq!(
                step.manhattan_distance(to) + 1,
                from.manhattan_distance(to)
            );
        }
    }

    #[test]
    fn blocked_grid_steps_lie_on_shortest_paths(case in grid_case()) {
        let (columns, rows, from, to, walls) = case;
        let blocked: HashSet<CellCoord> = walls
            .into_iter()
            .filter(|cell| *cell != from && *cell != to)
            .collect();
        let step = navigation::next_step(columns, rows, from, to, |cell| blocked.contains(&cell));

        match distance(columns, rows, from, to, &blocked) {
            None => prop_assert_eq!(step, None),
            Some(0) => prop_assert_eq!(step, None),
            Some(total) => {
                let step = step.expect("reachable target yields a step");
                prop_assert_eq!(step.manhattan_distance(from), 1);
                prop_assert!(!blocked.contains(&step));
                prop_assert_eq!(distance(columns, rows, step, to, &blocked), Some(total - 1));
            }
        }
    }

    #[test]
    fn grid_and_registry_stay_in_sync(
        seed in any::<u64>(),
        moves in prop::collection::vec((0_u32..30, 0_u32..20, 0_u8..4), 1..40),
    ) {
        let mut world = World::new();
        let mut events = Vec::new();
        let config = SessionConfig::default().with_seed(seed);
        world::apply(&mut world, Command::ConfigureSession { config }, &mut events);

        for (column, row, zombie_ticks) in moves {
            let mut commands = vec![
                Command::RequestPlayerMove { target: CellCoord::new(column, row) },
                Command::Tick { dt: std::time::Duration::from_millis(400) },
            ];
            commands.extend((0..zombie_ticks).map(|_| Command::TickZombies));

            for command in commands {
                events.clear();
                world::apply(&mut world, command, &mut events);
                let won_count = events.iter().filter(|event| matches!(event, Event::SessionWon { .. })).count();
                prop_assert!(won_count <= 1);

                let (width, _) = query::dimensions(&world);
                for (index, occupant) in query::occupancy_view(&world).iter().enumerate() {
                    if let Some(entity) = occupant {
                        let index = u32::try_from(index).expect("index fits");
                        let cell = CellCoord::new(index % width, index / width);
                        prop_assert_eq!(query::entity_cell(&world, entity), Some(cell));
                    }
                }
                for zombie in query::zombies(&world) {
                    let cell = query::entity_cell(&world, zombie).expect("zombie cell");
                    prop_assert!(!query::is_exit(&world, cell));
                    prop_assert_eq!(query::occupancy_view(&world).occupant(cell), Some(zombie));
                }
                for human in query::humans(&world).into_iter().chain(query::chain(&world)) {
                    let cell = query::entity_cell(&world, human).expect("human cell");
                    prop_assert_eq!(query::occupancy_view(&world).occupant(cell), Some(human));
                }
            }
        }
    }
}
