#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure controls system translating pointer and keyboard input into move requests.

use zombie_rescue_core::{CellCoord, Command, Direction};

/// Pixel edge length of a board cell used by the reference layout.
pub const DEFAULT_CELL_SIZE: f32 = 20.0;

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer click in board-relative pixels, if one happened this frame.
    pub click: Option<(f32, f32)>,
    /// Arrow key pressed this frame.
    pub key: Option<Direction>,
}

impl FrameInput {
    /// Creates an input descriptor holding a single click.
    #[must_use]
    pub const fn click(x: f32, y: f32) -> Self {
        Self {
            click: Some((x, y)),
            key: None,
        }
    }

    /// Creates an input descriptor holding a single arrow key press.
    #[must_use]
    pub const fn key(direction: Direction) -> Self {
        Self {
            click: None,
            key: Some(direction),
        }
    }
}

/// Controls system that maps input onto board cells.
#[derive(Clone, Copy, Debug)]
pub struct Controls {
    cell_size: f32,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl Controls {
    /// Creates a controls system for cells `cell_size` pixels wide.
    #[must_use]
    pub const fn new(cell_size: f32) -> Self {
        Self { cell_size }
    }

    /// Emits a move request for every input that resolves to a board cell.
    ///
    /// A click targets the cell under the pointer and an arrow key targets
    /// the player's neighbour. Inputs that fall outside the board are dropped.
    pub fn handle(
        &self,
        input: FrameInput,
        player: CellCoord,
        dimensions: (u32, u32),
        out: &mut Vec<Command>,
    ) {
        let (columns, rows) = dimensions;

        if let Some((x, y)) = input.click {
            if let Some(target) = self.cell_at(x, y, columns, rows) {
                out.push(Command::RequestPlayerMove { target });
            }
        }

        if let Some(direction) = input.key {
            if let Some(target) = player.neighbor(direction, columns, rows) {
                out.push(Command::RequestPlayerMove { target });
            }
        }
    }

    fn cell_at(&self, x: f32, y: f32, columns: u32, rows: u32) -> Option<CellCoord> {
        if !self.cell_size.is_normal() || self.cell_size < 0.0 {
            return None;
        }
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }

        let column = (x / self.cell_size).floor();
        let row = (y / self.cell_size).floor();
        if column >= columns as f32 || row >= rows as f32 {
            return None;
        }

        Some(CellCoord::new(column as u32, row as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(controls: &Controls, input: FrameInput, player: CellCoord) -> Vec<CellCoord> {
        let mut commands = Vec::new();
        controls.handle(input, player, (30, 20), &mut commands);
        commands
            .into_iter()
            .map(|command| match command {
                Command::RequestPlayerMove { target } => target,
                other => panic!("unexpected command emitted: {other:?}"),
            })
            .collect()
    }

    #[test]
    fn click_targets_cell_under_pointer() {
        let controls = Controls::default();
        assert_eq!(
            targets(&controls, FrameInput::click(45.0, 19.9), CellCoord::new(5, 5)),
            vec![CellCoord::new(2, 0)]
        );
    }

    #[test]
    fn clicks_outside_board_are_dropped() {
        let controls = Controls::default();
        let player = CellCoord::new(5, 5);
        assert!(targets(&controls, FrameInput::click(-1.0, 10.0), player).is_empty());
        assert!(targets(&controls, FrameInput::click(600.0, 10.0), player).is_empty());
        assert!(targets(&controls, FrameInput::click(10.0, 400.0), player).is_empty());
        assert!(targets(&controls, FrameInput::click(f32::NAN, 10.0), player).is_empty());
    }

    #[test]
    fn arrow_keys_target_adjacent_cells() {
        let controls = Controls::default();
        let player = CellCoord::new(5, 5);
        assert_eq!(
            targets(&controls, FrameInput::key(Direction::North), player),
            vec![CellCoord::new(5, 4)]
        );
        assert_eq!(
            targets(&controls, FrameInput::key(Direction::East), player),
            vec![CellCoord::new(6, 5)]
        );
    }

    #[test]
    fn arrow_keys_stop_at_board_edges() {
        let controls = Controls::default();
        assert!(targets(&controls, FrameInput::key(Direction::West), CellCoord::new(0, 3)).is_empty());
        assert!(targets(&controls, FrameInput::key(Direction::South), CellCoord::new(3, 19)).is_empty());
    }

    #[test]
    fn custom_cell_size_scales_pointer_mapping() {
        let controls = Controls::new(10.0);
        assert_eq!(
            targets(&controls, FrameInput::click(45.0, 19.9), CellCoord::new(5, 5)),
            vec![CellCoord::new(4, 1)]
        );
    }
}
