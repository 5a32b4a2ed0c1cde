// board.rs - Text board loader
//
// A board is a `height width` header followed by `height * width` cell values
// separated by any whitespace, row by row.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tribes::{Grid, GridError};

use crate::error::CliError;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("missing {0} in header")]
    MissingHeader(&'static str),

    #[error("token {position} ('{token}') is not a cell value")]
    InvalidToken { position: usize, token: String },

    #[error("header {height}x{width} is too large")]
    TooLarge { width: usize, height: usize },

    #[error("expected {expected} cell values, found {found}")]
    MissingCells { expected: usize, found: usize },

    #[error(transparent)]
    Grid(#[from] GridError),
}

fn header_value<'a>(
    tokens: &mut impl Iterator<Item = (usize, &'a str)>,
    name: &'static str,
) -> Result<usize, BoardError> {
    let (position, token) = tokens.next().ok_or(BoardError::MissingHeader(name))?;
    token.parse().map_err(|_| BoardError::InvalidToken {
        position,
        token: token.to_string(),
    })
}

pub fn parse_board(text: &str) -> Result<Grid, BoardError> {
    let mut tokens = text.split_whitespace().enumerate();
    let height = header_value(&mut tokens, "height")?;
    let width = header_value(&mut tokens, "width")?;
    let expected = height
        .checked_mul(width)
        .ok_or(BoardError::TooLarge { width, height })?;

    let mut values = Vec::new();
    for (position, token) in tokens.by_ref().take(expected) {
        let value = token.parse::<u8>().map_err(|_| BoardError::InvalidToken {
            position,
            token: token.to_string(),
        })?;
        values.push(value);
    }
    if values.len() != expected {
        return Err(BoardError::MissingCells {
            expected,
            found: values.len(),
        });
    }

    let trailing = tokens.count();
    if trailing > 0 {
        tracing::warn!(trailing, "Ignoring values after the last row");
    }
    Ok(Grid::from_raw(width, height, &values)?)
}

pub fn load_board(path: &Path) -> Result<Grid, CliError> {
    let text = fs::read_to_string(path).map_err(|e| CliError::io("read board", path, e))?;
    let grid = parse_board(&text).map_err(|source| CliError::Board {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        width = grid.width(),
        height = grid.height(),
        population = grid.population(),
        "Board loaded"
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tribes::Cell;

    #[test]
    fn parses_header_then_rows() {
        let grid = parse_board("2 3\n0 1 2\n2 1 0\n").unwrap();
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid.get(0, 2), Some(Cell::TribeTwo));
        assert_eq!(grid.get(1, 0), Some(Cell::TribeTwo));
        assert_eq!(grid.get(1, 1), Some(Cell::TribeOne));
    }

    #[test]
    fn layout_is_only_whitespace() {
        let tidy = parse_board("2 2\n1 0\n0 2\n").unwrap();
        let messy = parse_board("  2\t2 1\n\n0 0\r\n2").unwrap();
        assert_eq!(tidy, messy);
    }

    #[test]
    fn short_board_is_rejected() {
        let err = parse_board("3 3\n0 0 0\n1 1").unwrap_err();
        assert!(matches!(err, BoardError::MissingCells { expected: 9, found: 5 }));
    }

    #[test]
    fn out_of_range_cell_is_rejected() {
        let err = parse_board("1 3\n0 3 0").unwrap_err();
        assert!(matches!(err, BoardError::Grid(GridError::InvalidCell { index: 1, value: 3 })));
    }

    #[test]
    fn garbage_reports_its_position() {
        let err = parse_board("1 2\n0 x").unwrap_err();
        assert!(matches!(err, BoardError::InvalidToken { position: 3, ref token } if token == "x"));
        assert!(matches!(parse_board("4"), Err(BoardError::MissingHeader("width"))));
    }

    #[test]
    fn zero_sized_header_is_rejected() {
        let err = parse_board("0 5").unwrap_err();
        assert!(matches!(err, BoardError::Grid(GridError::InvalidDimensions { .. })));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "2 2\n1 1\n1 1\n").unwrap();
        let grid = load_board(file.path()).unwrap();
        assert_eq!(grid.population(), 4);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        let err = load_board(&path).unwrap_err();
        assert!(err.to_string().contains("nope.txt"), "{err}");
    }
}
