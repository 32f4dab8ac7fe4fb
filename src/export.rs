//! Occupancy export: one `index;count` record per live slot.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::Result;
use crate::table::SlotTable;

/// Header line of an occupancy export.
pub const HEADER: &str = "Index;Count";

/// Writes the header and one `index;count` line per live slot, ascending by
/// index. Returns the number of records written.
pub fn write_occupancy<W: Write>(table: &SlotTable, mut out: W) -> Result<usize> {
    writeln!(out, "{HEADER}")?;
    let mut records = 0;
    for (index, count) in table.occupancy() {
        writeln!(out, "{index};{count}")?;
        records += 1;
    }
    out.flush()?;
    Ok(records)
}

/// Creates (or truncates) `path` and writes the occupancy records into it.
///
/// The file is closed before returning, on success and on error alike.
pub fn export_occupancy(table: &SlotTable, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let records = write_occupancy(table, BufWriter::new(file))?;
    info!("exported {} occupancy records to {}", records, path.display());
    Ok(records)
}
