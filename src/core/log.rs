use crate::db::log::{LogEntry, load_entries};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

const MAX_OP_WIDTH: usize = 60;

static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static ansi regex"));

fn strip_ansi(s: &str) -> String {
    ANSI_RE.replace_all(s, "").into_owned()
}

/// Colour for an audit operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "clock_in" => Colour::Green,
        "clock_out" => Colour::Red,
        "break_start" | "break_end" => Colour::Yellow,
        "idle_start" | "idle_end" => Colour::Cyan,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// `operation (target)`, cut to [`MAX_OP_WIDTH`] visible characters with
/// only the operation word coloured.
fn render_op_target(entry: &LogEntry) -> String {
    let color = color_for_operation(&entry.operation);

    let plain = if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    };

    let visible = if plain.chars().count() > MAX_OP_WIDTH {
        let mut s: String = plain.chars().take(MAX_OP_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        plain
    };

    match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool, include_migrations: bool) -> AppResult<()> {
        let entries = load_entries(&pool.conn, include_migrations)?;

        if entries.is_empty() {
            info("Internal log is empty.");
            return Ok(());
        }

        let rendered: Vec<(String, String)> = entries
            .iter()
            .map(|e| {
                let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or_else(|_| e.date.clone());
                (date, render_op_target(e))
            })
            .collect();

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = rendered.iter().map(|(d, _)| d.len()).max().unwrap_or(10);
        let op_w = rendered
            .iter()
            .map(|(_, op)| strip_ansi(op).chars().count())
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);

        println!("📜 Internal log:\n");

        for (entry, (date, op_target)) in entries.iter().zip(rendered) {
            // padding is measured on the visible text, not the escape codes
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&op_target).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                entry.id,
                date,
                op_target,
                padding,
                entry.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
