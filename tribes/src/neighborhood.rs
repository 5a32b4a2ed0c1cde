// neighborhood.rs - 3x3 Moore windows with wraparound

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::grid::Grid;

/// A 3x3 snapshot centered on the target cell; `window[1][1]` is the target.
pub type Window = [[Cell; 3]; 3];

/// How neighbor coordinates that fall off the grid are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrapPolicy {
    /// Both axes wrap: the grid is a torus.
    #[default]
    Toroidal,
    /// Bit-compatible with the old boards output. Rows wrap correctly, but
    /// column `width` is only folded back to 0 when the *row* index equals
    /// `width`; otherwise it reads one cell past the end of the row, which is
    /// the first cell of the next row. Reads past the end of the grid see a
    /// dead cell.
    Legacy,
}

/// Build the window around `(row, col)` from `grid`.
#[inline]
pub fn window(grid: &Grid, row: usize, col: usize, wrap: WrapPolicy) -> Window {
    match wrap {
        WrapPolicy::Toroidal => toroidal_window(grid, row, col),
        WrapPolicy::Legacy => legacy_window(grid, row, col),
    }
}

fn toroidal_window(grid: &Grid, row: usize, col: usize) -> Window {
    let mut window = [[Cell::Dead; 3]; 3];
    let (row, col) = (row as isize, col as isize);
    for (dr, line) in window.iter_mut().enumerate() {
        for (dc, slot) in line.iter_mut().enumerate() {
            *slot = grid.get_wrapped(row + dr as isize - 1, col + dc as isize - 1);
        }
    }
    window
}

fn legacy_window(grid: &Grid, row: usize, col: usize) -> Window {
    let (width, height) = (grid.width() as isize, grid.height() as isize);
    let mut window = [[Cell::Dead; 3]; 3];
    for (dr, line) in window.iter_mut().enumerate() {
        for (dc, slot) in line.iter_mut().enumerate() {
            let mut r = row as isize + dr as isize - 1;
            let mut c = col as isize + dc as isize - 1;
            if r < 0 {
                r = height - 1;
            } else if r == height {
                r = 0;
            }
            if c < 0 {
                c = width - 1;
            } else if r == width {
                c = 0;
            }
            let flat = r as usize * grid.width() + c as usize;
            *slot = grid.get_flat(flat).unwrap_or(Cell::Dead);
        }
    }
    window
}
