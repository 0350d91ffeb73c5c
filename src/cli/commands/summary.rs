use crate::cli::output::emit;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::service::TimeTrackingService;
use crate::errors::AppResult;
use crate::models::summary::DailySummary;
use crate::ui::messages::{field, header};
use crate::utils::colors::{GREY, RESET, YELLOW};
use crate::utils::date::require_date;
use crate::utils::time::{format_seconds, seconds_to_hours};

fn print_day(day: &DailySummary) {
    let marker = if day.in_progress {
        format!(" {YELLOW}(in progress){RESET}")
    } else {
        String::new()
    };

    if day.session_count == 0 {
        println!("  {}  {GREY}no sessions{RESET}", day.date);
        return;
    }

    println!(
        "  {}  work {}  break {}  idle {}  ({} session{}){}",
        day.date,
        format_seconds(day.total_work_time),
        format_seconds(day.total_break_time),
        format_seconds(day.total_idle_time),
        day.session_count,
        if day.session_count == 1 { "" } else { "s" },
        marker
    );
}

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    if let Commands::Summary {
        employee,
        date,
        from,
        to,
    } = cmd
    {
        let svc = TimeTrackingService::open(cfg)?;

        if let (Some(from), Some(to)) = (from, to) {
            let from = require_date(from)?;
            let to = require_date(to)?;

            return emit(json, svc.get_range_summary(employee, from, to), |r| {
                header(format!("{} · {} → {}", r.employee_id, r.from, r.to));
                for d in &r.days {
                    print_day(d);
                }
                println!();
                field("Work", format_seconds(r.total_work_time));
                field("Breaks", format_seconds(r.total_break_time));
                field("Idle", format_seconds(r.total_idle_time));
                field("Billable", format!("{:.2} h", r.billable_hours));
                field(
                    "Amount",
                    format!("{:.2} {} ({:.2}/h)", r.amount, r.currency, r.hourly_rate),
                );
            });
        }

        let day = match date {
            Some(d) => require_date(d)?,
            None => svc.today()?,
        };

        return emit(json, svc.get_daily_summary(employee, day), |d| {
            header(format!("{} · {}", d.employee_id, d.date));
            print_day(d);
            field("Hours", format!("{:.2}", seconds_to_hours(d.total_work_time)));
        });
    }

    Ok(())
}
