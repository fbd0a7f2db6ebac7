use crate::error::ExportError;
use crate::results::Equity;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Column names written as the first line of every export
pub const HEADER: [&str; 3] = ["symbol", "name", "price"];

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer, terminated by CRLF
fn write_row<W: Write, S: AsRef<str>>(w: &mut W, row: &[S]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, ",")?;
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    write!(w, "\r\n")
}

/// Header plus one row per record, in the order given
pub fn write_records<W: Write>(mut w: W, equities: &[Equity]) -> io::Result<()> {
    write_row(&mut w, &HEADER)?;
    for equity in equities {
        write_row(&mut w, &equity.csv_fields())?;
    }
    w.flush()
}

/// Create or truncate `path` and write `equities` to it as CSV
///
/// Parent directories are created as needed. An empty record list is refused.
pub fn export_csv(equities: &[Equity], path: &Path) -> Result<(), ExportError> {
    if equities.is_empty() {
        return Err(ExportError::Empty);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    write_records(BufWriter::new(file), equities)?;
    ::log::debug!("Wrote {} rows to {}", equities.len(), path.display());
    Ok(())
}
