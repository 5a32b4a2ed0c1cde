// rule.rs - Survival, birth and tribe vote for one cell

use crate::cell::Cell;
use crate::neighborhood::Window;

/// Maps a neighborhood to the next state of its center cell.
///
/// Implementations must be pure: updaters call them from many threads at once
/// and in no particular order.
pub trait Rule: Send + Sync {
    fn next_state(&self, window: &Window) -> Cell;

    /// Name of this rule (for logging)
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// The two-tribe rule. Liveness follows Conway (B3/S23); the new cell takes
/// the tribe most common among its live neighbors, ties going to tribe two.
#[derive(Clone, Copy, Debug, Default)]
pub struct TribalRule;

impl Rule for TribalRule {
    #[inline]
    fn next_state(&self, window: &Window) -> Cell {
        next_state(window)
    }

    fn name(&self) -> &'static str {
        "tribal"
    }
}

#[inline]
pub fn next_state(window: &Window) -> Cell {
    let mut tribe_one = 0u8;
    let mut tribe_two = 0u8;
    for (r, line) in window.iter().enumerate() {
        for (c, cell) in line.iter().enumerate() {
            if r == 1 && c == 1 {
                continue;
            }
            match cell {
                Cell::TribeOne => tribe_one += 1,
                Cell::TribeTwo => tribe_two += 1,
                Cell::Dead => {}
            }
        }
    }

    let dominant = if tribe_two >= tribe_one {
        Cell::TribeTwo
    } else {
        Cell::TribeOne
    };

    let alive = match tribe_one + tribe_two {
        3 => true,                    // Birth or survival
        2 => window[1][1].is_alive(), // Keeps its liveness
        _ => false,                   // Under- or overpopulation
    };

    if alive { dominant } else { Cell::Dead }
}
