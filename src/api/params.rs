//! JSON bodies accepted by the write routes.

use crate::errors::{AppError, AppResult};
use crate::models::activity::{NewApplicationActivity, NewWebsiteActivity};
use crate::models::break_session::BreakRef;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockInBody {
    pub employee_id: String,
    pub notes: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockOutBody {
    pub employee_id: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBreakBody {
    pub work_session_id: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndBreakBody {
    pub break_session_id: Option<i64>,
    pub work_session_id: Option<i64>,
    pub notes: Option<String>,
}

impl EndBreakBody {
    /// The break id wins when both ids are given.
    pub fn target(&self) -> AppResult<BreakRef> {
        match (self.break_session_id, self.work_session_id) {
            (Some(id), _) => Ok(BreakRef::Break(id)),
            (None, Some(ws)) => Ok(BreakRef::WorkSession(ws)),
            (None, None) => Err(AppError::Validation(
                "breakSessionId or workSessionId is required".into(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdleBody {
    pub work_session_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationActivityBody {
    pub work_session_id: i64,
    pub application_name: String,
    pub window_title: Option<String>,
    pub duration: Option<i64>,
}

impl From<ApplicationActivityBody> for NewApplicationActivity {
    fn from(b: ApplicationActivityBody) -> Self {
        Self {
            application_name: b.application_name,
            window_title: b.window_title,
            duration: b.duration.unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteActivityBody {
    pub work_session_id: i64,
    pub url: String,
    pub title: Option<String>,
    pub duration: Option<i64>,
}

impl From<WebsiteActivityBody> for NewWebsiteActivity {
    fn from(b: WebsiteActivityBody) -> Self {
        Self {
            url: b.url,
            title: b.title,
            duration: b.duration.unwrap_or(0),
        }
    }
}
