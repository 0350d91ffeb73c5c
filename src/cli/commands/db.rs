use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success};
use rusqlite::Connection;

/// Indexes that keep one active session, break and idle period per owner.
const ACTIVE_INDEXES: &[&str] = &[
    "ux_work_sessions_active",
    "ux_break_sessions_active",
    "ux_idle_sessions_active",
];

/// Names from [`ACTIVE_INDEXES`] absent from the schema.
fn missing_active_indexes(conn: &Connection) -> rusqlite::Result<Vec<&'static str>> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = ?1")?;

    let mut missing = Vec::new();
    for name in ACTIVE_INDEXES {
        if !stmt.exists([name])? {
            missing.push(*name);
        }
    }
    Ok(missing)
}

/// Integrity, foreign keys and active-session indexes. Returns true when
/// every check passed.
fn check(conn: &Connection) -> rusqlite::Result<bool> {
    let mut healthy = true;

    let integrity: String = conn.query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
    if integrity == "ok" {
        success("Integrity check passed.");
    } else {
        error(format!("Integrity check failed: {}", integrity));
        healthy = false;
    }

    let orphans = conn
        .prepare("PRAGMA foreign_key_check;")?
        .query_map([], |_| Ok(()))?
        .count();
    if orphans == 0 {
        success("Foreign keys OK.");
    } else {
        error(format!("{} row(s) reference a missing work session", orphans));
        healthy = false;
    }

    let missing = missing_active_indexes(conn)?;
    if missing.is_empty() {
        success("Active-session indexes present.");
    } else {
        error(format!(
            "Missing active-session indexes: {} (run `db --migrate`)",
            missing.join(", ")
        ));
        healthy = false;
    }

    Ok(healthy)
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check: run_check,
        vacuum,
        info: show_info,
    } = cmd
    {
        let mut pool = DbPool::with_timeout(&cfg.database, cfg.busy_timeout_ms)?;

        if *migrate {
            info("Running migrations…");
            run_pending_migrations(&pool.conn)?;
            success("Migration completed.");
        }

        if *show_info {
            run_pending_migrations(&pool.conn)?;
            stats::print_db_info(&mut pool, &cfg.database)?;
        }

        if *run_check {
            info("Running database checks…");
            check(&pool.conn)?;
        }

        if *vacuum {
            info("Running VACUUM…");
            pool.conn.execute_batch("VACUUM;")?;
            success("Vacuum completed.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrated_schema_passes_every_check() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();

        assert!(missing_active_indexes(&conn).unwrap().is_empty());
        assert!(check(&conn).unwrap());
    }

    #[test]
    fn dropped_active_index_is_reported() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        conn.execute_batch("DROP INDEX ux_break_sessions_active;")
            .unwrap();

        assert_eq!(
            missing_active_indexes(&conn).unwrap(),
            vec!["ux_break_sessions_active"]
        );
        assert!(!check(&conn).unwrap());
    }
}
