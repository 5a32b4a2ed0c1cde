// cell.rs - Cell states: dead or alive in one of two tribes

use std::fmt;

use serde::{Deserialize, Serialize};

/// State of one grid cell. The discriminants are the on-disk values.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Dead = 0,
    TribeOne = 1,
    TribeTwo = 2,
}

impl Cell {
    pub const MAX_VALUE: u8 = 2;

    #[inline]
    pub fn is_alive(self) -> bool {
        self != Cell::Dead
    }

    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Cell {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Cell::Dead),
            1 => Ok(Cell::TribeOne),
            2 => Ok(Cell::TribeTwo),
            other => Err(other),
        }
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        cell.value()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
