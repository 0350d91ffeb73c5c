use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn require_date(s: &str) -> AppResult<NaiveDate> {
    parse_date(s).ok_or_else(|| {
        AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s))
    })
}

fn offset(utc_offset_minutes: i32) -> AppResult<FixedOffset> {
    FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
        AppError::Config(format!("utc_offset_minutes out of range: {}", utc_offset_minutes))
    })
}

/// Calendar day containing `at`, seen from the given UTC offset.
pub fn day_of(at: DateTime<Utc>, utc_offset_minutes: i32) -> AppResult<NaiveDate> {
    Ok(at.with_timezone(&offset(utc_offset_minutes)?).date_naive())
}

/// `[start, end)` in UTC of the calendar day `date` at the given offset.
pub fn day_bounds(date: NaiveDate, utc_offset_minutes: i32) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let off = offset(utc_offset_minutes)?;
    let start = date
        .and_hms_opt(0, 0, 0)
        .and_then(|n| n.and_local_timezone(off).single())
        .ok_or_else(|| AppError::Validation(format!("Invalid date {}", date)))?
        .with_timezone(&Utc);
    let end = start
        .checked_add_signed(Duration::days(1))
        .ok_or_else(|| AppError::Validation(format!("Date {} is out of range", date)))?;
    Ok((start, end))
}

/// Every date from `from` to `to`, both included.
pub fn generate_range(from: NaiveDate, to: NaiveDate) -> AppResult<Vec<NaiveDate>> {
    if to < from {
        return Err(AppError::Validation(format!(
            "Invalid range: {} is after {}",
            from, to
        )));
    }

    let mut days = Vec::new();
    let mut day = from;
    loop {
        days.push(day);
        if day == to {
            return Ok(days);
        }
        day = day.succ_opt().ok_or_else(|| {
            AppError::Validation(format!("Date after {} is out of range", day))
        })?;
    }
}
