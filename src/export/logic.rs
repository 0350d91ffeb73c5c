use super::fs_utils::ensure_writable;
use super::model::SessionExport;
use super::{ExportFormat, csv, json, notify_export_success};
use crate::core::service::TimeTrackingService;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use chrono::NaiveDate;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Rows for the sessions clocked in between `from` and `to` (inclusive).
    pub fn collect(
        svc: &TimeTrackingService,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<SessionExport>> {
        let now = svc.now();
        let sessions = svc.work_sessions_between(employee_id, from, to)?;

        let mut rows = Vec::with_capacity(sessions.len());
        for ws in &sessions {
            let running = if ws.is_active() {
                svc.get_active_break_session(ws.id)?
                    .map_or(0, |b| b.elapsed_at(now))
            } else {
                0
            };
            rows.push(SessionExport::from_session(ws, ws.worked_seconds_at(now, running)));
        }
        Ok(rows)
    }

    /// Export an employee's sessions. Returns the number of rows written.
    pub fn export(
        svc: &TimeTrackingService,
        employee_id: &str,
        format: ExportFormat,
        file: &str,
        from: NaiveDate,
        to: NaiveDate,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);
        ensure_writable(path, force)?;

        let rows = Self::collect(svc, employee_id, from, to)?;
        if rows.is_empty() {
            warning("No sessions found for the selected range. Nothing to export.");
            return Ok(0);
        }

        match format {
            ExportFormat::Csv => csv::write_csv(path, &rows)?,
            ExportFormat::Json => json::write_json(path, &rows)?,
        }

        notify_export_success(&format.as_str().to_uppercase(), rows.len(), path);
        Ok(rows.len())
    }
}
