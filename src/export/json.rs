use super::model::SessionExport;
use crate::errors::{AppError, AppResult};
use std::path::Path;

/// Writes the sessions as pretty-printed JSON.
pub fn write_json(path: &Path, rows: &[SessionExport]) -> AppResult<()> {
    let json = serde_json::to_string_pretty(rows).map_err(|e| AppError::Export(e.to_string()))?;
    std::fs::write(path, json)?;
    Ok(())
}
