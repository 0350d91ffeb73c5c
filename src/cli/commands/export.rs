use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::service::TimeTrackingService;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::utils::date::require_date;

/// Handle the `export` command
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        employee,
        format,
        file,
        from,
        to,
        force,
    } = cmd
    {
        let svc = TimeTrackingService::open(cfg)?;

        let from = match from {
            Some(d) => require_date(d)?,
            None => svc.today()?,
        };
        let to = match to {
            Some(d) => require_date(d)?,
            None => from,
        };

        ExportLogic::export(&svc, employee, *format, file, from, to, *force)?;
    }

    Ok(())
}
