use crate::cli::output::emit;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::service::TimeTrackingService;
use crate::errors::AppResult;
use crate::ui::messages::{field, header};
use crate::utils::colors::{RESET, YELLOW, color_for_state};
use crate::utils::time::format_seconds;

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    if let Commands::Status { employee } = cmd {
        let svc = TimeTrackingService::open(cfg)?;
        let now = svc.now();
        let threshold = i64::from(cfg.idle_threshold_minutes) * 60;

        return emit(json, svc.status(employee), |st| {
            header(&st.employee_id);
            field(
                "State",
                format!("{}{}{}", color_for_state(st.state), st.state.label(), RESET),
            );

            if let Some(ws) = &st.work_session {
                field("Session", ws.id);
                field("Since", ws.clock_in_time.format("%F %T UTC"));
                field("Worked", format_seconds(st.worked_seconds));
            }
            if let Some(b) = &st.active_break {
                field("On break for", format_seconds(b.elapsed_at(now)));
            }
            if let Some(i) = &st.active_idle {
                let elapsed = i.elapsed_at(now);
                let color = if elapsed >= threshold { YELLOW } else { RESET };
                field(
                    "Idle for",
                    format!(
                        "{color}{}{RESET} (threshold {} min)",
                        format_seconds(elapsed),
                        cfg.idle_threshold_minutes
                    ),
                );
            }
        });
    }

    Ok(())
}
