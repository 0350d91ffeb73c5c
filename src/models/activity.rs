//! Append-only activity log entries recorded during a work session.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.\-]*://)?(?:[^@/]*@)?([^/:?#\s]+)")
        .expect("static host regex")
});

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationActivity {
    pub id: i64,
    pub work_session_id: i64,
    pub application_name: String,
    pub window_title: Option<String>,
    pub duration: i64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteActivity {
    pub id: i64,
    pub work_session_id: i64,
    pub url: String,
    pub domain: String,
    pub title: Option<String>,
    pub duration: i64,
    pub recorded_at: DateTime<Utc>,
}

/// Application usage sample as received from the tracker.
#[derive(Debug, Clone, Default)]
pub struct NewApplicationActivity {
    pub application_name: String,
    pub window_title: Option<String>,
    pub duration: i64,
}

impl NewApplicationActivity {
    pub fn validate(&self) -> AppResult<()> {
        if self.application_name.trim().is_empty() {
            return Err(AppError::Validation(
                "applicationName must not be empty".into(),
            ));
        }
        validate_duration(self.duration)
    }
}

/// Website visit sample as received from the tracker.
#[derive(Debug, Clone, Default)]
pub struct NewWebsiteActivity {
    pub url: String,
    pub title: Option<String>,
    pub duration: i64,
}

impl NewWebsiteActivity {
    pub fn validate(&self) -> AppResult<()> {
        if domain_of(&self.url).is_none() {
            return Err(AppError::Validation(format!("Invalid url '{}'", self.url)));
        }
        validate_duration(self.duration)
    }
}

fn validate_duration(duration: i64) -> AppResult<()> {
    if duration < 0 {
        return Err(AppError::Validation(
            "duration must be zero or positive".into(),
        ));
    }
    Ok(())
}

/// Host part of a url, lowercased, without a leading `www.`.
pub fn domain_of(url: &str) -> Option<String> {
    let host = HOST_RE.captures(url.trim())?.get(1)?.as_str().to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    if host.is_empty() { None } else { Some(host) }
}
