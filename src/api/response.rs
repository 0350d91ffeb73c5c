use crate::errors::AppError;
use serde_json::{Value, json};

/// Generic message returned for infrastructure failures; the real error is
/// only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    /// `{ "success": true, "data": ... }`
    pub fn ok(data: Value) -> Self {
        Self {
            status: 200,
            body: json!({ "success": true, "data": data }),
        }
    }

    /// `{ "error": ..., "details"?: ... }`
    pub fn failure(status: u16, error: &str, details: Option<Value>) -> Self {
        let body = match details {
            Some(d) => json!({ "error": error, "details": d }),
            None => json!({ "error": error }),
        };
        Self { status, body }
    }

    pub fn from_error(err: &AppError) -> Self {
        if err.is_internal() {
            tracing::error!(error = %err, "request failed");
            return Self::failure(err.status_code(), INTERNAL_ERROR_MESSAGE, None);
        }
        Self::failure(err.status_code(), &err.to_string(), None)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_wraps_data() {
        let r = Response::ok(json!({"id": 1}));
        assert_eq!(r.status, 200);
        assert_eq!(r.body["success"], true);
        assert_eq!(r.body["data"]["id"], 1);
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let r = Response::from_error(&AppError::Db(rusqlite::Error::InvalidQuery));
        assert_eq!(r.status, 500);
        assert_eq!(r.body["error"], INTERNAL_ERROR_MESSAGE);
        assert!(r.body.get("details").is_none());
    }

    #[test]
    fn business_errors_keep_their_message() {
        let r = Response::from_error(&AppError::NotFound("No active work session".into()));
        assert_eq!(r.status, 404);
        assert_eq!(r.body["error"], "No active work session");
        assert!(!r.is_success());
    }
}
