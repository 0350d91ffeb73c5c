use crate::cli::output::emit;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::service::TimeTrackingService;
use crate::errors::AppResult;
use crate::models::activity::{ApplicationActivity, WebsiteActivity};
use crate::models::break_session::BreakSession;
use crate::models::idle_session::IdleSession;
use crate::models::work_session::WorkSession;
use crate::ui::messages::{header, info};
use crate::utils::colors::{GREEN, GREY, RESET, colorize_optional};
use crate::utils::time::format_seconds;
use serde::Serialize;

/// A work session with everything recorded inside it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionDetails {
    #[serde(flatten)]
    session: WorkSession,
    breaks: Vec<BreakSession>,
    idle_sessions: Vec<IdleSession>,
    applications: Vec<ApplicationActivity>,
    websites: Vec<WebsiteActivity>,
}

fn load_details(svc: &TimeTrackingService, ws: WorkSession) -> AppResult<SessionDetails> {
    Ok(SessionDetails {
        breaks: svc.list_break_sessions(ws.id)?,
        idle_sessions: svc.list_idle_sessions(ws.id)?,
        applications: svc.list_application_activity(ws.id)?,
        websites: svc.list_website_activity(ws.id)?,
        session: ws,
    })
}

fn print_row(ws: &WorkSession, worked: i64) {
    let out = match ws.clock_out_time {
        Some(t) => t.format("%F %T").to_string(),
        None => format!("{GREEN}active{RESET}             "),
    };

    println!(
        "{:>5}  {}  {:<19}  {:>8}  {:>8}  {}",
        ws.id,
        ws.clock_in_time.format("%F %T"),
        out,
        format_seconds(worked),
        format_seconds(ws.total_break_time),
        colorize_optional(ws.location.as_deref())
    );
}

fn print_details(d: &SessionDetails) {
    for b in &d.breaks {
        println!(
            "         {GREY}break{RESET} {} → {}  {}",
            b.start_time.format("%T"),
            b.end_time
                .map_or_else(|| "…".to_string(), |t| t.format("%T").to_string()),
            b.duration.map_or_else(|| "running".to_string(), format_seconds)
        );
    }
    for i in &d.idle_sessions {
        println!(
            "         {GREY}idle{RESET}  {} → {}  {}",
            i.start_time.format("%T"),
            i.end_time
                .map_or_else(|| "…".to_string(), |t| t.format("%T").to_string()),
            i.duration.map_or_else(|| "running".to_string(), format_seconds)
        );
    }
    for a in &d.applications {
        println!(
            "         {GREY}app{RESET}   {} {}  {}",
            a.application_name,
            colorize_optional(a.window_title.as_deref()),
            format_seconds(a.duration)
        );
    }
    for w in &d.websites {
        println!(
            "         {GREY}web{RESET}   {}  {}",
            w.domain,
            format_seconds(w.duration)
        );
    }
}

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    if let Commands::Sessions {
        employee,
        limit,
        details,
    } = cmd
    {
        let svc = TimeTrackingService::open(cfg)?;
        let now = svc.now();

        let result = svc.list_work_sessions(employee, *limit).and_then(|list| {
            list.into_iter()
                .map(|ws| load_details(&svc, ws))
                .collect::<AppResult<Vec<_>>>()
        });

        return emit(json, result, |rows| {
            if rows.is_empty() {
                info(format!("No sessions recorded for {}.", employee));
                return;
            }

            header(format!("Sessions for {}", employee));
            println!(
                "{:>5}  {:<19}  {:<19}  {:>8}  {:>8}  Location",
                "ID", "Clock in", "Clock out", "Worked", "Breaks"
            );

            for d in rows {
                let running = d
                    .breaks
                    .iter()
                    .find(|b| b.status.is_active())
                    .map_or(0, |b| b.elapsed_at(now));
                print_row(&d.session, d.session.worked_seconds_at(now, running));
                if *details {
                    print_details(d);
                }
            }
        });
    }

    Ok(())
}
