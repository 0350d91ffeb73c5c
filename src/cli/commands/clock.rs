use crate::cli::output::emit;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::service::TimeTrackingService;
use crate::errors::AppResult;
use crate::models::work_session::WorkSession;
use crate::ui::messages::{field, success};
use crate::utils::colors::colorize_optional;
use crate::utils::time::format_seconds;

fn print_session(ws: &WorkSession) {
    field("Session", ws.id);
    field("Employee", &ws.employee_id);
    field("Clock in", ws.clock_in_time.format("%F %T UTC"));
    if let Some(out) = ws.clock_out_time {
        field("Clock out", out.format("%F %T UTC"));
        field("Worked", format_seconds(ws.total_work_time));
        field("Breaks", format_seconds(ws.total_break_time));
    }
    field("Location", colorize_optional(ws.location.as_deref()));
    field("Notes", colorize_optional(ws.notes.as_deref()));
}

/// Handle `clock-in` and `clock-out`
pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    let mut svc = TimeTrackingService::open(cfg)?;

    match cmd {
        Commands::ClockIn {
            employee,
            notes,
            location,
        } => {
            let result = svc.clock_in(employee, notes.as_deref(), location.as_deref());
            emit(json, result, |ws| {
                success(format!("{} clocked in.", ws.employee_id));
                print_session(ws);
            })
        }
        Commands::ClockOut { employee, notes } => {
            let result = svc.clock_out(employee, notes.as_deref());
            emit(json, result, |ws| {
                success(format!("{} clocked out.", ws.employee_id));
                print_session(ws);
            })
        }
        _ => Ok(()),
    }
}
