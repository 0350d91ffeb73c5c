//! Schema migrations. Each migration runs once, inside its own transaction,
//! and is recorded in the `log` table as `migration_applied`.

use rusqlite::{Connection, OptionalExtension, Result, Transaction, TransactionBehavior};

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

/// Ordered list of schema migrations.
///
/// The partial unique indexes are what keeps "one active session" true when
/// several processes write to the same database.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_create_sessions",
        description: "Created work, break and idle session tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS work_sessions (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id      TEXT NOT NULL,
            clock_in_time    TEXT NOT NULL,
            clock_out_time   TEXT,
            total_break_time INTEGER NOT NULL DEFAULT 0,
            total_work_time  INTEGER NOT NULL DEFAULT 0,
            status           TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active','completed')),
            notes            TEXT,
            location         TEXT,
            created_at       TEXT NOT NULL,
            updated_at       TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_work_sessions_active
            ON work_sessions(employee_id) WHERE status = 'active';
        CREATE INDEX IF NOT EXISTS idx_work_sessions_employee_clock_in
            ON work_sessions(employee_id, clock_in_time);

        CREATE TABLE IF NOT EXISTS break_sessions (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            work_session_id INTEGER NOT NULL REFERENCES work_sessions(id),
            start_time      TEXT NOT NULL,
            end_time        TEXT,
            duration        INTEGER,
            notes           TEXT,
            status          TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active','completed'))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_break_sessions_active
            ON break_sessions(work_session_id) WHERE status = 'active';
        CREATE INDEX IF NOT EXISTS idx_break_sessions_work_session
            ON break_sessions(work_session_id, start_time);

        CREATE TABLE IF NOT EXISTS idle_sessions (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            work_session_id INTEGER NOT NULL REFERENCES work_sessions(id),
            start_time      TEXT NOT NULL,
            end_time        TEXT,
            duration        INTEGER,
            status          TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active','completed'))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_idle_sessions_active
            ON idle_sessions(work_session_id) WHERE status = 'active';
        CREATE INDEX IF NOT EXISTS idx_idle_sessions_work_session
            ON idle_sessions(work_session_id, start_time);
        "#,
    },
    Migration {
        version: "20250310_0002_create_activity",
        description: "Created application and website activity tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS application_activity (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            work_session_id  INTEGER NOT NULL REFERENCES work_sessions(id),
            application_name TEXT NOT NULL,
            window_title     TEXT,
            duration         INTEGER NOT NULL DEFAULT 0,
            recorded_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_application_activity_session
            ON application_activity(work_session_id, recorded_at);

        CREATE TABLE IF NOT EXISTS website_activity (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            work_session_id INTEGER NOT NULL REFERENCES work_sessions(id),
            url             TEXT NOT NULL,
            domain          TEXT NOT NULL,
            title           TEXT,
            duration        INTEGER NOT NULL DEFAULT 0,
            recorded_at     TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_website_activity_session
            ON website_activity(work_session_id, recorded_at);
        "#,
    },
    Migration {
        version: "20250312_0003_activity_append_only",
        description: "Activity tables made append-only",
        sql: r#"
        CREATE TRIGGER IF NOT EXISTS trg_application_activity_no_update
            BEFORE UPDATE ON application_activity
            BEGIN SELECT RAISE(ABORT, 'application_activity is append-only'); END;
        CREATE TRIGGER IF NOT EXISTS trg_application_activity_no_delete
            BEFORE DELETE ON application_activity
            BEGIN SELECT RAISE(ABORT, 'application_activity is append-only'); END;
        CREATE TRIGGER IF NOT EXISTS trg_website_activity_no_update
            BEFORE UPDATE ON website_activity
            BEGIN SELECT RAISE(ABORT, 'website_activity is append-only'); END;
        CREATE TRIGGER IF NOT EXISTS trg_website_activity_no_delete
            BEFORE DELETE ON website_activity
            BEGIN SELECT RAISE(ABORT, 'website_activity is append-only'); END;
        "#,
    },
    Migration {
        version: "20250320_0004_activity_requires_active_session",
        description: "Activity rows only accepted for active work sessions",
        sql: r#"
        CREATE TRIGGER IF NOT EXISTS trg_application_activity_active_session
            BEFORE INSERT ON application_activity
            WHEN (SELECT status FROM work_sessions WHERE id = NEW.work_session_id) IS NOT 'active'
            BEGIN SELECT RAISE(ABORT, 'work session is not active'); END;
        CREATE TRIGGER IF NOT EXISTS trg_website_activity_active_session
            BEFORE INSERT ON website_activity
            WHEN (SELECT status FROM work_sessions WHERE id = NEW.work_session_id) IS NOT 'active'
            BEGIN SELECT RAISE(ABORT, 'work session is not active'); END;
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    // re-check under the write lock: another process may have won the race
    if is_applied(&tx, m.version)? {
        return Ok(());
    }

    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;
    tx.commit()?;

    tracing::info!(version = m.version, "Migration applied: {}", m.description);
    Ok(())
}

/// Versions already applied to this database, oldest first.
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    ensure_log_table(conn)?;

    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            apply(conn, m)?;
        }
    }

    Ok(())
}
