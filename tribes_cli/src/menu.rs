// menu.rs - Interactive strategy prompt

use std::io::{BufRead, Write};

use tribes::{GridError, Strategy};

use crate::error::CliError;

const MENU: &str = "\
Choose how to compute each generation:
1.- Parallel loop
2.- Partitioned threads
0.- Sequential
\tR: ";

/// Ask for a strategy on `output` and read the answer from `input`.
/// Only the menu numbers are accepted.
pub fn prompt_strategy<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Strategy, CliError> {
    output
        .write_all(MENU.as_bytes())
        .and_then(|()| output.flush())
        .map_err(|e| CliError::io("write", "standard output", e))?;

    let mut answer = String::new();
    let read = input
        .read_line(&mut answer)
        .map_err(|e| CliError::io("read", "standard input", e))?;
    if read == 0 {
        return Err(CliError::NoStrategy);
    }

    let answer = answer.trim();
    match answer {
        "0" | "1" | "2" => Ok(answer.parse()?),
        _ => Err(GridError::UnknownStrategy(answer.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(text: &str) -> Result<Strategy, CliError> {
        let mut shown = Vec::new();
        prompt_strategy(&mut Cursor::new(text), &mut shown)
    }

    #[test]
    fn numbers_select_strategies() {
        assert_eq!(answer("1\n").unwrap(), Strategy::ParallelLoop);
        assert_eq!(answer("2\n").unwrap(), Strategy::PartitionedThread);
        assert_eq!(answer(" 0 \n").unwrap(), Strategy::Sequential);
    }

    #[test]
    fn anything_else_is_fatal() {
        for text in ["3\n", "parallel\n", "\n"] {
            let err = answer(text).unwrap_err();
            assert!(matches!(err, CliError::Grid(GridError::UnknownStrategy(_))), "{text:?}: {err}");
        }
        assert!(matches!(answer(""), Err(CliError::NoStrategy)));
    }

    #[test]
    fn menu_is_shown() {
        let mut shown = Vec::new();
        prompt_strategy(&mut Cursor::new("0\n"), &mut shown).unwrap();
        let shown = String::from_utf8(shown).unwrap();
        assert!(shown.contains("1.- Parallel loop"));
        assert!(shown.ends_with("R: "));
    }
}
