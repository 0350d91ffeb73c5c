use crate::api::{Request, Response, handle as route};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::service::TimeTrackingService;
use crate::errors::{AppError, AppResult};

/// Handle the `api` command: one request through the router, the JSON
/// envelope on stdout. Non-2xx responses make the process exit non-zero.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Api { method, path, body } = cmd {
        let mut svc = TimeTrackingService::open(cfg)?;

        let response = match Request::parse(method, path, body.as_deref()) {
            Ok(req) => route(&mut svc, &req),
            Err(e) => Response::from_error(&e),
        };

        println!("{}", response.to_json_string());

        if !response.is_success() {
            return Err(AppError::Other(format!(
                "request failed with status {}",
                response.status
            )));
        }
    }

    Ok(())
}
