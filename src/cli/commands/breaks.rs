use crate::cli::output::emit;
use crate::cli::parser::BreakAction;
use crate::config::Config;
use crate::core::service::TimeTrackingService;
use crate::errors::{AppError, AppResult};
use crate::models::break_session::BreakRef;
use crate::ui::messages::{field, success};
use crate::utils::colors::colorize_optional;
use crate::utils::time::format_seconds;

pub fn handle(action: &BreakAction, cfg: &Config, json: bool) -> AppResult<()> {
    let mut svc = TimeTrackingService::open(cfg)?;

    match action {
        BreakAction::Start {
            work_session_id,
            notes,
        } => {
            let result = svc.start_break(*work_session_id, notes.as_deref());
            emit(json, result, |b| {
                success(format!(
                    "Break {} started in work session {}.",
                    b.id, b.work_session_id
                ));
                field("Started", b.start_time.format("%F %T UTC"));
            })
        }
        BreakAction::End {
            break_id,
            session,
            notes,
        } => {
            // clap enforces exactly one of the two
            let target = match (break_id, session) {
                (Some(id), _) => BreakRef::Break(*id),
                (None, Some(ws)) => BreakRef::WorkSession(*ws),
                (None, None) => {
                    return Err(AppError::Validation(
                        "Either --break-id or --session is required".into(),
                    ));
                }
            };

            let result = svc.end_break(target, notes.as_deref());
            emit(json, result, |b| {
                success(format!("Break {} ended.", b.id));
                field("Duration", format_seconds(b.duration.unwrap_or(0)));
                field("Notes", colorize_optional(b.notes.as_deref()));
            })
        }
    }
}
