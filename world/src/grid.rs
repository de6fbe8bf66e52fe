//! Dense occupancy grid mapping each cell to the entity standing on it.

use zombie_rescue_core::{
    is_exit_cell, CellCoord, EntityId, LayoutError, DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS,
    EXIT_SPAN, MAX_GRID_DIMENSION,
};

const STANDARD_CELLS: usize = (DEFAULT_GRID_COLUMNS * DEFAULT_GRID_ROWS) as usize;

/// Row-major grid of entity handles.
///
/// The grid is a view synchronised with the registry: every occupied slot
/// names the entity whose coordinate equals the slot's cell. Exit cells are
/// not stored; they are derived from coordinates.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<EntityId>>,
}

impl Grid {
    /// Creates an empty grid, rejecting sizes outside
    /// `EXIT_SPAN..=MAX_GRID_DIMENSION` on either axis.
    pub(crate) fn new(columns: u32, rows: u32) -> Result<Self, LayoutError> {
        if columns < EXIT_SPAN || rows < EXIT_SPAN {
            return Err(LayoutError::GridTooSmall { columns, rows });
        }
        if columns > MAX_GRID_DIMENSION || rows > MAX_GRID_DIMENSION {
            return Err(LayoutError::GridTooLarge { columns, rows });
        }

        let capacity = usize::try_from(u64::from(columns) * u64::from(rows))
            .map_err(|_| LayoutError::GridTooLarge { columns, rows })?;
        Ok(Self {
            columns,
            rows,
            cells: vec![None; capacity],
        })
    }

    /// Empty grid with the default dimensions.
    pub(crate) fn standard() -> Self {
        Self {
            columns: DEFAULT_GRID_COLUMNS,
            rows: DEFAULT_GRID_ROWS,
            cells: vec![None; STANDARD_CELLS],
        }
    }

    pub(crate) fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    pub(crate) fn is_exit(&self, cell: CellCoord) -> bool {
        is_exit_cell(cell, self.columns)
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<EntityId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    pub(crate) fn occupy(&mut self, entity: EntityId, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                debug_assert!(
                    slot.is_none() || *slot == Some(entity),
                    "cell {cell} already holds {slot:?}"
                );
                *slot = Some(entity);
            }
        }
    }

    pub(crate) fn vacate(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = None;
            }
        }
    }

    /// Iterates every cell coordinate in row-major order.
    pub(crate) fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }

    pub(crate) fn cells(&self) -> &[Option<EntityId>] {
        &self.cells
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.in_bounds(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
