// patterns.rs - Named seed patterns and random soups

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::cell::Cell;
use crate::error::GridResult;
use crate::grid::Grid;

const A: Cell = Cell::TribeOne;
const B: Cell = Cell::TribeTwo;

/// A named seed, as `(row, col, tribe)` offsets from its origin.
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize, Cell)],
}

impl Pattern {
    /// Rows and columns spanned by the pattern.
    pub fn extent(&self) -> (usize, usize) {
        self.cells
            .iter()
            .fold((0, 0), |(h, w), &(r, c, _)| (h.max(r + 1), w.max(c + 1)))
    }
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Block",
        cells: &[(0, 0, A), (0, 1, A), (1, 0, A), (1, 1, A)],
    },
    Pattern {
        name: "Blinker",
        cells: &[(0, 0, A), (0, 1, A), (0, 2, A)],
    },
    Pattern {
        name: "Toad",
        cells: &[(0, 1, B), (0, 2, B), (0, 3, B), (1, 0, B), (1, 1, B), (1, 2, B)],
    },
    Pattern {
        name: "Beacon",
        cells: &[
            (0, 0, A), (0, 1, A), (1, 0, A), (1, 1, A),
            (2, 2, B), (2, 3, B), (3, 2, B), (3, 3, B),
        ],
    },
    Pattern {
        name: "Glider",
        cells: &[(0, 1, A), (1, 2, A), (2, 0, A), (2, 1, A), (2, 2, A)],
    },
    Pattern {
        name: "Pulsar",
        cells: &[
            // Top half
            (0, 2, A), (0, 3, A), (0, 4, A), (0, 8, A), (0, 9, A), (0, 10, A),
            (2, 0, A), (2, 5, A), (2, 7, A), (2, 12, A),
            (3, 0, A), (3, 5, A), (3, 7, A), (3, 12, A),
            (4, 0, A), (4, 5, A), (4, 7, A), (4, 12, A),
            (5, 2, A), (5, 3, A), (5, 4, A), (5, 8, A), (5, 9, A), (5, 10, A),
            // Bottom half (mirrored)
            (7, 2, B), (7, 3, B), (7, 4, B), (7, 8, B), (7, 9, B), (7, 10, B),
            (8, 0, B), (8, 5, B), (8, 7, B), (8, 12, B),
            (9, 0, B), (9, 5, B), (9, 7, B), (9, 12, B),
            (10, 0, B), (10, 5, B), (10, 7, B), (10, 12, B),
            (12, 2, B), (12, 3, B), (12, 4, B), (12, 8, B), (12, 9, B), (12, 10, B),
        ],
    },
    Pattern {
        name: "Skirmish",
        cells: &[
            (0, 0, A), (0, 1, A), (0, 2, A), (1, 0, A), (2, 1, A),
            (0, 4, B), (0, 5, B), (0, 6, B), (1, 6, B), (2, 5, B),
        ],
    },
];

/// Look a pattern up by name, ignoring case.
pub fn find(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Stamp `pattern` onto `grid` with its top-left corner at `origin`,
/// wrapping around the edges. Cells outside the pattern are left as they are.
pub fn apply_pattern(grid: &mut Grid, pattern: &Pattern, origin: (usize, usize)) {
    let (height, width) = (grid.height(), grid.width());
    for &(row, col, cell) in pattern.cells {
        grid.set((origin.0 + row) % height, (origin.1 + col) % width, cell);
    }
}

/// A fresh grid with `pattern` centered on it.
pub fn centered(pattern: &Pattern, width: usize, height: usize) -> GridResult<Grid> {
    let mut grid = Grid::new(width, height)?;
    let (rows, cols) = pattern.extent();
    let origin = (height.saturating_sub(rows) / 2, width.saturating_sub(cols) / 2);
    apply_pattern(&mut grid, pattern, origin);
    Ok(grid)
}

/// Deterministic soup: about a third of the cells alive, split evenly
/// between the tribes.
pub fn random_grid(width: usize, height: usize, seed: u64) -> GridResult<Grid> {
    let mut grid = Grid::new(width, height)?;

    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    let mut state = hasher.finish();

    for row in 0..height {
        for col in 0..width {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let cell = match (state >> 33) % 6 {
                0 => Cell::TribeOne,
                1 => Cell::TribeTwo,
                _ => Cell::Dead,
            };
            grid.set(row, col, cell);
        }
    }
    Ok(grid)
}
