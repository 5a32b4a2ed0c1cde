// grid.rs - Grid type for the two-tribe Game of Life
//
// One flat row-major buffer: cell (row, col) lives at `row * width + col`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::cell::Cell;
use crate::error::{GridError, GridResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

/// Number of cells in a `width` x `height` grid, rejecting empty dimensions.
pub(crate) fn cell_count(width: usize, height: usize) -> GridResult<usize> {
    if width == 0 || height == 0 {
        return Err(GridError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(GridError::Allocation { cells: usize::MAX })
}

/// Allocate a buffer of `len` dead cells without aborting on allocation failure.
pub(crate) fn allocate_cells(len: usize) -> GridResult<Vec<Cell>> {
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(len)
        .map_err(|_| GridError::Allocation { cells: len })?;
    cells.resize(len, Cell::Dead);
    Ok(cells)
}

impl Grid {
    /// An all-dead grid.
    pub fn new(width: usize, height: usize) -> GridResult<Self> {
        let cells = allocate_cells(cell_count(width, height)?)?;
        Ok(Self { width, height, cells })
    }

    /// Wrap an existing buffer; its length must be exactly `width * height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> GridResult<Self> {
        let expected = cell_count(width, height)?;
        if cells.len() != expected {
            return Err(GridError::CellCount {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { width, height, cells })
    }

    /// Build a grid from raw values, rejecting anything outside `{0, 1, 2}`.
    pub fn from_raw(width: usize, height: usize, values: &[u8]) -> GridResult<Self> {
        let expected = cell_count(width, height)?;
        if values.len() != expected {
            return Err(GridError::CellCount {
                expected,
                actual: values.len(),
            });
        }
        let mut cells = allocate_cells(expected)?;
        for (index, (slot, &value)) in cells.iter_mut().zip(values).enumerate() {
            *slot = Cell::try_from(value).map_err(|value| GridError::InvalidCell { index, value })?;
        }
        Ok(Self { width, height, cells })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed grid.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        (row < self.height && col < self.width).then(|| self.cells[self.index(row, col)])
    }

    /// Set a cell; coordinates outside the grid are ignored.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if row < self.height && col < self.width {
            let idx = self.index(row, col);
            self.cells[idx] = cell;
        }
    }

    /// Toroidal lookup: any signed coordinate wraps onto the grid.
    #[inline]
    pub fn get_wrapped(&self, row: isize, col: isize) -> Cell {
        let r = row.rem_euclid(self.height as isize) as usize;
        let c = col.rem_euclid(self.width as isize) as usize;
        self.cells[self.index(r, c)]
    }

    /// Raw flat lookup, `None` past the end of the buffer.
    #[inline]
    pub(crate) fn get_flat(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(self.width)
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Live cells per tribe as `(tribe_one, tribe_two)`.
    pub fn tribe_counts(&self) -> (usize, usize) {
        self.cells.iter().fold((0, 0), |(one, two), cell| match cell {
            Cell::TribeOne => (one + 1, two),
            Cell::TribeTwo => (one, two + 1),
            Cell::Dead => (one, two),
        })
    }

    /// Hash of dimensions and contents, used to spot repeating generations.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.width.hash(&mut hasher);
        self.height.hash(&mut hasher);
        self.cells.hash(&mut hasher);
        hasher.finish()
    }

    /// One byte per cell in row-major order.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.cells.iter().map(|cell| cell.value()).collect()
    }
}
