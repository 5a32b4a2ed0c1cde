// pgm.rs - Netpbm graymap output, one frame per generation

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tribes::{Cell, Grid};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PgmFormat {
    /// `P2`: tab-separated decimal values, one row per line
    Plain,
    /// `P5`: one byte per cell
    #[default]
    Binary,
}

impl PgmFormat {
    pub fn magic(self) -> &'static str {
        match self {
            PgmFormat::Plain => "P2",
            PgmFormat::Binary => "P5",
        }
    }
}

/// Write `grid` as a PGM image. `comment` goes on the second header line.
pub fn write_pgm<W: Write>(out: &mut W, grid: &Grid, format: PgmFormat, comment: &str) -> io::Result<()> {
    writeln!(out, "{}", format.magic())?;
    writeln!(out, "# {comment}")?;
    writeln!(out, "{} {}", grid.width(), grid.height())?;
    writeln!(out, "{}", Cell::MAX_VALUE)?;

    match format {
        PgmFormat::Plain => {
            for row in grid.rows() {
                let line: Vec<String> = row.iter().map(|cell| cell.value().to_string()).collect();
                writeln!(out, "{}", line.join("\t"))?;
            }
        }
        PgmFormat::Binary => out.write_all(&grid.to_bytes())?,
    }
    out.flush()
}

pub fn save_pgm(path: &Path, grid: &Grid, format: PgmFormat) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_pgm(&mut out, grid, format, &path.display().to_string())
}

/// `<dir>/<stem>_<generation>.pgm`
pub fn frame_path(dir: &Path, stem: &str, generation: u64) -> PathBuf {
    dir.join(format!("{stem}_{generation}.pgm"))
}
