use super::params::{
    ApplicationActivityBody, ClockInBody, ClockOutBody, EndBreakBody, IdleBody, StartBreakBody,
    WebsiteActivityBody,
};
use super::request::{Method, Request};
use super::response::Response;
use crate::core::service::TimeTrackingService;
use crate::errors::{AppError, AppResult};
use crate::utils::date::require_date;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

pub const ROUTE_PREFIX: &str = "/api/time-tracking";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    ClockIn,
    ClockOut,
    BreakStart,
    BreakEnd,
    IdleStart,
    IdleEnd,
    ApplicationActivity,
    WebsiteActivity,
    ActiveSession,
    ActiveBreak,
    ActiveIdle,
    Status,
    DailySummary,
    Summary,
}

/// Path (relative to [`ROUTE_PREFIX`]), accepted method, route.
const ROUTES: &[(&str, Method, Route)] = &[
    ("/clock-in", Method::Post, Route::ClockIn),
    ("/clock-out", Method::Post, Route::ClockOut),
    ("/break/start", Method::Post, Route::BreakStart),
    ("/break/end", Method::Post, Route::BreakEnd),
    ("/idle/start", Method::Post, Route::IdleStart),
    ("/idle/end", Method::Post, Route::IdleEnd),
    ("/activity/application", Method::Post, Route::ApplicationActivity),
    ("/activity/website", Method::Post, Route::WebsiteActivity),
    ("/active-session", Method::Get, Route::ActiveSession),
    ("/active-break", Method::Get, Route::ActiveBreak),
    ("/active-idle", Method::Get, Route::ActiveIdle),
    ("/status", Method::Get, Route::Status),
    ("/daily-summary", Method::Get, Route::DailySummary),
    ("/summary", Method::Get, Route::Summary),
];

/// Entry point of the request boundary. Never fails: every error becomes
/// an error envelope.
pub fn handle(svc: &mut TimeTrackingService, req: &Request) -> Response {
    let Some((_, allowed, route)) = req
        .path
        .strip_prefix(ROUTE_PREFIX)
        .and_then(|rel| ROUTES.iter().find(|(p, _, _)| *p == rel))
    else {
        return Response::failure(
            404,
            "Route not found",
            Some(json!({ "method": req.method.as_str(), "path": req.path })),
        );
    };

    if req.method != *allowed {
        return Response::failure(
            405,
            "Method not allowed",
            Some(json!({ "allowed": allowed.as_str() })),
        );
    }

    tracing::debug!(method = %req.method, path = %req.path, "handling request");

    match dispatch(svc, *route, req) {
        Ok(data) => Response::ok(data),
        Err(e) => Response::from_error(&e),
    }
}

fn body<T: DeserializeOwned>(req: &Request) -> AppResult<T> {
    let value = req
        .body
        .clone()
        .ok_or_else(|| AppError::Validation("Request body is required".into()))?;
    Ok(serde_json::from_value(value)?)
}

fn data<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|e| AppError::Other(e.to_string()))
}

fn dispatch(svc: &mut TimeTrackingService, route: Route, req: &Request) -> AppResult<Value> {
    match route {
        Route::ClockIn => {
            let b: ClockInBody = body(req)?;
            data(&svc.clock_in(&b.employee_id, b.notes.as_deref(), b.location.as_deref())?)
        }
        Route::ClockOut => {
            let b: ClockOutBody = body(req)?;
            data(&svc.clock_out(&b.employee_id, b.notes.as_deref())?)
        }
        Route::BreakStart => {
            let b: StartBreakBody = body(req)?;
            data(&svc.start_break(b.work_session_id, b.notes.as_deref())?)
        }
        Route::BreakEnd => {
            let b: EndBreakBody = body(req)?;
            data(&svc.end_break(b.target()?, b.notes.as_deref())?)
        }
        Route::IdleStart => {
            let b: IdleBody = body(req)?;
            data(&svc.start_idle(b.work_session_id)?)
        }
        Route::IdleEnd => {
            let b: IdleBody = body(req)?;
            data(&svc.end_idle(b.work_session_id)?)
        }
        Route::ApplicationActivity => {
            let b: ApplicationActivityBody = body(req)?;
            let ws = b.work_session_id;
            data(&svc.log_application_activity(ws, &b.into())?)
        }
        Route::WebsiteActivity => {
            let b: WebsiteActivityBody = body(req)?;
            let ws = b.work_session_id;
            data(&svc.log_website_activity(ws, &b.into())?)
        }
        Route::ActiveSession => {
            data(&svc.get_active_work_session(req.query_param("employeeId")?)?)
        }
        Route::ActiveBreak => data(&svc.get_active_break_session(req.query_id("workSessionId")?)?),
        Route::ActiveIdle => data(&svc.get_active_idle_session(req.query_id("workSessionId")?)?),
        Route::Status => data(&svc.status(req.query_param("employeeId")?)?),
        Route::DailySummary => {
            let employee = req.query_param("employeeId")?;
            let day = match req.optional_query_param("date") {
                Some(d) => require_date(d)?,
                None => svc.today()?,
            };
            data(&svc.get_daily_summary(employee, day)?)
        }
        Route::Summary => {
            let employee = req.query_param("employeeId")?;
            let from = require_date(req.query_param("from")?)?;
            let to = match req.optional_query_param("to") {
                Some(d) => require_date(d)?,
                None => from,
            };
            data(&svc.get_range_summary(employee, from, to)?)
        }
    }
}
