//! ASCII rendering of session snapshots.

use std::fmt::Write as _;

use zombie_rescue_core::{CellCoord, CellKind, SessionPhase, SessionSnapshot};

/// Draws the board followed by a status line.
///
/// The player is drawn over exit cells and followers are told apart from
/// free humans.
pub(crate) fn render(snapshot: &SessionSnapshot) -> String {
    let mut board = String::new();

    for row in 0..snapshot.rows {
        for column in 0..snapshot.columns {
            let cell = CellCoord::new(column, row);
            let glyph = if cell == snapshot.player {
                'P'
            } else if snapshot.followers.contains(&cell) {
                'f'
            } else {
                match snapshot.cell(cell).unwrap_or(CellKind::Empty) {
                    CellKind::Empty => '.',
                    CellKind::Player => 'P',
                    CellKind::Human => 'H',
                    CellKind::Zombie => 'Z',
                    CellKind::Exit => 'E',
                }
            };
            board.push(glyph);
        }
        board.push('\n');
    }

    let _ = write!(
        board,
        "{} | health {} | rescued {} | humans left {} | following {} | time {}s",
        snapshot.difficulty,
        snapshot.health,
        snapshot.score,
        snapshot.humans_remaining,
        snapshot.followers.len(),
        snapshot.elapsed.as_secs(),
    );

    match snapshot.phase {
        SessionPhase::Grace => {
            let _ = write!(
                board,
                " | zombies wake in {:.1}s",
                snapshot.grace_remaining.as_secs_f32()
            );
        }
        SessionPhase::Active => {}
        SessionPhase::Won => board.push_str(" | every survivor made it out"),
        SessionPhase::Lost => board.push_str(" | overwhelmed"),
    }

    board
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use zombie_rescue_core::{Difficulty, Health};

    #[test]
    fn renders_every_kind_of_cell() {
        let mut cells = vec![CellKind::Empty; 4 * 3];
        cells[3] = CellKind::Exit;
        cells[4] = CellKind::Human;
        cells[5] = CellKind::Human;
        cells[10] = CellKind::Zombie;
        cells[0] = CellKind::Player;
        let snapshot = SessionSnapshot {
            columns: 4,
            rows: 3,
            cells,
            player: CellCoord::new(0, 0),
            followers: vec![CellCoord::new(1, 1)],
            health: Health::from_halves(5),
            score: 2,
            humans_remaining: 1,
            elapsed: Duration::from_secs(12),
            grace_remaining: Duration::ZERO,
            phase: SessionPhase::Active,
            difficulty: Difficulty::Easy,
        };

        let rendered = render(&snapshot);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "P..E");
        assert_eq!(lines[1], "Hf..");
        assert_eq!(lines[2], "..Z.");
        assert_eq!(
            lines[3],
            "EASY | health 2.5 | rescued 2 | humans left 1 | following 1 | time 12s"
        );
    }
}
