//! SQLite connection and migrations.

use crate::error::AppError;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const MIGRATIONS: &[(i32, &str)] = &[(1, include_str!("../../migrations/0001_init.sql"))];

/// Where connections are opened from.
#[derive(Debug, Clone)]
enum DbTarget {
    File(PathBuf),
    /// Named shared-cache in-memory database (tests).
    Memory(String),
}

/// Connection factory handed to every use case. Holds no open connection for
/// file databases; each request opens its own via [`get_connection`].
pub struct DbPool {
    target: DbTarget,
    // Shared-cache memory databases vanish once the last connection closes.
    _anchor: Option<Mutex<Connection>>,
}

impl DbPool {
    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            DbTarget::File(p) => Some(p.as_path()),
            DbTarget::Memory(_) => None,
        }
    }

    fn open(&self) -> Result<Connection, rusqlite::Error> {
        let conn = match &self.target {
            DbTarget::File(path) => Connection::open(path)?,
            DbTarget::Memory(uri) => Connection::open_with_flags(
                uri,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?,
        };
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(conn)
    }
}

/// Initialize DB at path, run migrations, return managed pool.
pub fn init_db(db_path: &Path) -> Result<DbPool, AppError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::StorageUnavailable(format!("{}: {}", parent.display(), e)))?;
    }
    let pool = DbPool {
        target: DbTarget::File(db_path.to_path_buf()),
        _anchor: None,
    };
    let mut conn = get_connection(&pool)?;
    run_migrations(&mut conn)?;
    Ok(pool)
}

/// Fresh, migrated in-memory database private to the caller.
pub fn init_test_db() -> DbPool {
    let uri = format!("file:records-{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let mut pool = DbPool {
        target: DbTarget::Memory(uri),
        _anchor: None,
    };
    let mut anchor = pool.open().expect("open in-memory db");
    run_migrations(&mut anchor).expect("migrate in-memory db");
    pool._anchor = Some(Mutex::new(anchor));
    pool
}

fn run_migrations(conn: &mut Connection) -> Result<(), AppError> {
    let tx = conn.transaction()?;

    // Ensure schema_migrations exists (first run)
    tx.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (version INTEGER PRIMARY KEY, applied_at TEXT NOT NULL DEFAULT (datetime('now')))",
        [],
    )?;

    let applied: Vec<i32> = tx
        .prepare("SELECT version FROM schema_migrations ORDER BY version")?
        .query_map([], |r| r.get(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for (version, sql) in MIGRATIONS {
        if applied.contains(version) {
            continue;
        }
        // The script's own schema_migrations INSERT is skipped; the version is recorded below.
        let statements = sql
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.contains("INSERT INTO schema_migrations"));
        for stmt in statements {
            tx.execute(stmt, [])?;
        }
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, datetime('now'))",
            [version],
        )?;
        log::info!("applied migration {}", version);
    }

    tx.commit()?;
    Ok(())
}

/// Open a connection for one request. Dropping it releases it, whichever way
/// the caller exits.
pub fn get_connection(pool: &DbPool) -> Result<Connection, AppError> {
    pool.open().map_err(|e| {
        log::error!("database connection failed: {}", e);
        AppError::StorageUnavailable(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let pool = init_test_db();
        let mut conn = get_connection(&pool).unwrap();
        run_migrations(&mut conn).unwrap();
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, MIGRATIONS.len() as i64);
    }

    #[test]
    fn connections_share_memory_database() {
        let pool = init_test_db();
        {
            let conn = get_connection(&pool).unwrap();
            conn.execute(
                "INSERT INTO subjects (code, name, credits) VALUES ('X1', 'X', 1)",
                [],
            )
            .unwrap();
        }
        let conn = get_connection(&pool).unwrap();
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM subjects", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn foreign_keys_enforced() {
        let pool = init_test_db();
        let conn = get_connection(&pool).unwrap();
        let err = conn
            .execute(
                "INSERT INTO marks (student_id, subject_id, marks, max_marks, exam_date) VALUES (99, 99, 1, 100, '2024-01-01')",
                [],
            )
            .unwrap_err();
        assert_eq!(AppError::from(err).code(), "CONFLICT");
    }
}
