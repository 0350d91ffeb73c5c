use crate::errors::{AppError, AppResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            other => Err(AppError::Validation(format!(
                "Unsupported method '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl Request {
    /// `target` may carry a query string: `/path?employeeId=e1`.
    pub fn get(target: &str) -> Self {
        let (path, query) = split_target(target);
        Self {
            method: Method::Get,
            path,
            query,
            body: None,
        }
    }

    pub fn post(path: &str, body: Value) -> Self {
        let (path, query) = split_target(path);
        Self {
            method: Method::Post,
            path,
            query,
            body: Some(body),
        }
    }

    /// Build a request from raw parts; `body` is JSON text.
    pub fn parse(method: &str, target: &str, body: Option<&str>) -> AppResult<Self> {
        let method = method.parse::<Method>()?;
        let (path, query) = split_target(target);
        let body = match body.map(str::trim).filter(|b| !b.is_empty()) {
            Some(text) => Some(serde_json::from_str::<Value>(text)?),
            None => None,
        };
        Ok(Self {
            method,
            path,
            query,
            body,
        })
    }

    /// Required, non-blank query parameter.
    pub fn query_param(&self, name: &str) -> AppResult<&str> {
        self.query
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Validation(format!("{} is required", name)))
    }

    pub fn optional_query_param(&self, name: &str) -> Option<&str> {
        self.query
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Required numeric id from the query string.
    pub fn query_id(&self, name: &str) -> AppResult<i64> {
        let raw = self.query_param(name)?;
        raw.parse::<i64>()
            .map_err(|_| AppError::Validation(format!("{} must be a number, got '{}'", name, raw)))
    }
}

fn split_target(target: &str) -> (String, BTreeMap<String, String>) {
    match target.split_once('?') {
        Some((path, qs)) => (normalize_path(path), parse_query(qs)),
        None => (normalize_path(target), BTreeMap::new()),
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn parse_query(qs: &str) -> BTreeMap<String, String> {
    qs.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (percent_decode(k), percent_decode(v)),
            None => (percent_decode(pair), String::new()),
        })
        .collect()
}

/// `application/x-www-form-urlencoded` decoding; malformed escapes are kept
/// literally.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(b) => {
                        out.push(b);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_string_is_split_and_decoded() {
        let req = Request::get("/api/time-tracking/status/?employeeId=jane%20doe&x=a+b&flag");
        assert_eq!(req.path, "/api/time-tracking/status");
        assert_eq!(req.query["employeeId"], "jane doe");
        assert_eq!(req.query["x"], "a b");
        assert_eq!(req.query["flag"], "");
    }

    #[test]
    fn malformed_escape_is_kept() {
        assert_eq!(parse_query("a=100%")["a"], "100%");
        assert_eq!(parse_query("a=%zz")["a"], "%zz");
    }

    #[test]
    fn missing_or_blank_param_is_validation_error() {
        let req = Request::get("/x?employeeId=%20");
        assert!(matches!(
            req.query_param("employeeId"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            Request::get("/x?workSessionId=abc").query_id("workSessionId"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn parse_reads_json_body() {
        let req = Request::parse("post", "/a", Some(r#"{"employeeId":"e1"}"#)).unwrap();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.body, Some(json!({"employeeId": "e1"})));

        assert!(matches!(
            Request::parse("POST", "/a", Some("{not json")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            Request::parse("DELETE", "/a", None),
            Err(AppError::Validation(_))
        ));
    }
}
