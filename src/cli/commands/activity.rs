use crate::cli::output::emit;
use crate::cli::parser::ActivityAction;
use crate::config::Config;
use crate::core::service::TimeTrackingService;
use crate::errors::AppResult;
use crate::models::activity::{NewApplicationActivity, NewWebsiteActivity};
use crate::ui::messages::success;

pub fn handle(action: &ActivityAction, cfg: &Config, json: bool) -> AppResult<()> {
    let mut svc = TimeTrackingService::open(cfg)?;

    match action {
        ActivityAction::App {
            work_session_id,
            name,
            title,
            duration,
        } => {
            let activity = NewApplicationActivity {
                application_name: name.clone(),
                window_title: title.clone(),
                duration: *duration,
            };
            let result = svc.log_application_activity(*work_session_id, &activity);
            emit(json, result, |a| {
                success(format!(
                    "Logged {}s of '{}' in work session {}.",
                    a.duration, a.application_name, a.work_session_id
                ));
            })
        }
        ActivityAction::Web {
            work_session_id,
            url,
            title,
            duration,
        } => {
            let activity = NewWebsiteActivity {
                url: url.clone(),
                title: title.clone(),
                duration: *duration,
            };
            let result = svc.log_website_activity(*work_session_id, &activity);
            emit(json, result, |w| {
                success(format!(
                    "Logged {}s on {} in work session {}.",
                    w.duration, w.domain, w.work_session_id
                ));
            })
        }
    }
}
