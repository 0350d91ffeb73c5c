use crate::cli::output::emit;
use crate::cli::parser::IdleAction;
use crate::config::Config;
use crate::core::service::TimeTrackingService;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::time::format_seconds;

pub fn handle(action: &IdleAction, cfg: &Config, json: bool) -> AppResult<()> {
    let mut svc = TimeTrackingService::open(cfg)?;

    match action {
        IdleAction::Start { work_session_id } => {
            let result = svc.start_idle(*work_session_id);
            emit(json, result, |i| {
                info(format!(
                    "Idle period {} opened in work session {}.",
                    i.id, i.work_session_id
                ));
            })
        }
        IdleAction::End { work_session_id } => {
            let result = svc.end_idle(*work_session_id);
            emit(json, result, |i| {
                success(format!(
                    "Idle period {} closed after {}.",
                    i.id,
                    format_seconds(i.duration.unwrap_or(0))
                ));
            })
        }
    }
}
