//! Time utilities: the clock abstraction, duration formatting.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Source of "now" for the session engine.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// `HH:MM:SS`, negative values prefixed with `-`.
pub fn format_seconds(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let s = secs.abs();
    format!("{}{:02}:{:02}:{:02}", sign, s / 3600, (s % 3600) / 60, s % 60)
}

/// Seconds → hours, for billing.
pub fn seconds_to_hours(secs: i64) -> f64 {
    secs as f64 / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_seconds_pads_fields() {
        assert_eq!(format_seconds(0), "00:00:00");
        assert_eq!(format_seconds(3661), "01:01:01");
        assert_eq!(format_seconds(-90), "-00:01:30");
        assert_eq!(format_seconds(25 * 3600), "25:00:00");
    }

    #[test]
    fn manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.advance(Duration::minutes(30));
        assert_eq!(clock.now(), start + Duration::minutes(30));
    }
}
