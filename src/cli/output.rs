use crate::api::Response;
use crate::errors::{AppError, AppResult};
use serde::Serialize;

/// Prints `result` either as the API envelope (`--json`) or through
/// `human`. Errors are returned to the caller in both modes so the exit
/// code stays non-zero.
pub fn emit<T, F>(json: bool, result: AppResult<T>, human: F) -> AppResult<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    match result {
        Ok(value) => {
            if json {
                let data =
                    serde_json::to_value(&value).map_err(|e| AppError::Other(e.to_string()))?;
                println!("{}", Response::ok(data).to_json_string());
            } else {
                human(&value);
            }
            Ok(())
        }
        Err(e) => {
            if json {
                println!("{}", Response::from_error(&e).to_json_string());
            }
            Err(e)
        }
    }
}
