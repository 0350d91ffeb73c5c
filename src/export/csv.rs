use super::model::SessionExport;
use crate::errors::AppResult;
use csv::Writer;
use std::path::Path;

/// Writes the sessions as CSV, header first.
pub fn write_csv(path: &Path, rows: &[SessionExport]) -> AppResult<()> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record(SessionExport::HEADERS)?;
    for r in rows {
        wtr.write_record(r.to_record())?;
    }

    wtr.flush()?;
    Ok(())
}
