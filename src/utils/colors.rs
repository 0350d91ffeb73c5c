/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

use crate::models::summary::EmployeeState;

/// Green while working, yellow on break, grey when clocked out.
pub fn color_for_state(state: EmployeeState) -> &'static str {
    match state {
        EmployeeState::ClockedIn => GREEN,
        EmployeeState::OnBreak => YELLOW,
        EmployeeState::ClockedOut => GREY,
    }
}

/// Wraps `value` in GREY when it is empty or missing, returns "--" for None.
pub fn colorize_optional(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => format!("{GREY}--{RESET}"),
    }
}
