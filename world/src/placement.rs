//! Random scattering of humans and zombies at session start.

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use zombie_rescue_core::{
    CellCoord, DifficultyProfile, PLACEMENT_ATTEMPTS, ZOMBIE_COUNT, ZOMBIE_EXCLUSION_RADIUS,
};

use crate::{grid::Grid, registry::Registry};

/// Scatters the profile's humans and the fixed zombie count around the player.
///
/// Humans avoid the exit region and occupied cells. Zombies avoid occupied
/// cells, the exit region, and cells closer than [`ZOMBIE_EXCLUSION_RADIUS`]
/// to the player. After [`PLACEMENT_ATTEMPTS`] failed draws the distance rule
/// is dropped and any free non-exit cell is accepted.
pub(crate) fn populate(
    grid: &mut Grid,
    registry: &mut Registry,
    profile: &DifficultyProfile,
    seed: u64,
) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let player = registry.player_cell();

    for _ in 0..profile.initial_human_count {
        let free = |cell: CellCoord| grid.occupant(cell).is_none() && !grid.is_exit(cell);
        let Some(cell) = sample_cell(&mut rng, grid, free, free) else {
            tracing::warn!("no free cell left for a human; skipping placement");
            continue;
        };
        let id = registry.spawn_human(cell);
        grid.occupy(id, cell);
    }

    for _ in 0..ZOMBIE_COUNT {
        let free = |cell: CellCoord| grid.occupant(cell).is_none() && !grid.is_exit(cell);
        let distant = |cell: CellCoord| {
            free(cell) && cell.manhattan_distance(player) >= ZOMBIE_EXCLUSION_RADIUS
        };
        let Some(cell) = sample_cell(&mut rng, grid, distant, free) else {
            tracing::warn!("no free cell left for a zombie; skipping placement");
            continue;
        };
        let id = registry.spawn_zombie(cell);
        grid.occupy(id, cell);
    }
}

fn sample_cell<R, A, F>(rng: &mut R, grid: &Grid, accept: A, fallback: F) -> Option<CellCoord>
where
    R: Rng,
    A: Fn(CellCoord) -> bool,
    F: Fn(CellCoord) -> bool,
{
    let (columns, rows) = grid.dimensions();
    if columns == 0 || rows == 0 {
        return None;
    }

    for _ in 0..PLACEMENT_ATTEMPTS {
        let cell = CellCoord::new(rng.gen_range(0..columns), rng.gen_range(0..rows));
        if accept(cell) {
            return Some(cell);
        }
    }

    tracing::warn!(
        attempts = PLACEMENT_ATTEMPTS,
        "placement constraints unmet; relaxing to any free cell"
    );
    let candidates: Vec<CellCoord> = grid.coords().filter(|cell| fallback(*cell)).collect();
    candidates.choose(rng).copied()
}
