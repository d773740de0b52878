//! SQLite connection, configuration and schema setup.

use super::session::Session;
use crate::error::AppError;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

const DB_PATH_ENV: &str = "COMPANY_DB_PATH";

/// Schema scripts in version order. `PRAGMA user_version` holds how many have run.
const SCHEMA: &[&str] = &[include_str!("../../migrations/0001_init.sql")];

/// Where the company database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub db_path: PathBuf,
}

impl DbConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// `COMPANY_DB_PATH` if set, otherwise `<data dir>/company-loading/company.db`.
    pub fn from_env() -> Self {
        Self::from_env_or("company.db")
    }

    /// `COMPANY_DB_PATH` if set, otherwise `default_file` in the app data dir.
    pub fn from_env_or(default_file: &str) -> Self {
        match std::env::var_os(DB_PATH_ENV) {
            Some(path) if !path.is_empty() => Self::new(path),
            _ => Self::new(default_data_dir().join(default_file)),
        }
    }
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("company-loading")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaMode {
    /// Keep existing rows, create whatever tables are missing.
    CreateIfMissing,
    /// Drop every table, then create the schema from scratch.
    Recreate,
}

/// Prepare the schema at the configured path, in one transaction.
pub fn init_db(config: &DbConfig, mode: SchemaMode) -> Result<(), AppError> {
    let mut conn = open_connection(&config.db_path)?;
    let tx = conn.transaction()?;
    if mode == SchemaMode::Recreate {
        log::info!("Recreating schema at {:?}", config.db_path);
        drop_schema(&tx)?;
    }
    apply_schema(&tx)?;
    tx.commit()?;
    Ok(())
}

/// Open a session bound to a fresh connection.
pub fn open(config: &DbConfig) -> Result<Session, AppError> {
    let conn = open_connection(&config.db_path)?;
    log::debug!("Session opened on {:?}", config.db_path);
    Ok(Session::new(conn))
}

fn open_connection(db_path: &Path) -> Result<Connection, AppError> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Db(e.to_string()))?;
        }
    }
    let conn = Connection::open(db_path).map_err(|e| AppError::Db(e.to_string()))?;
    conn.execute_batch("PRAGMA foreign_keys = ON")?;
    Ok(conn)
}

fn drop_schema(conn: &Connection) -> Result<(), AppError> {
    // Children first so foreign keys never dangle mid-drop.
    conn.execute_batch(
        "DROP TABLE IF EXISTS employees;
         DROP TABLE IF EXISTS positions;
         DROP TABLE IF EXISTS departments;
         PRAGMA user_version = 0;",
    )?;
    Ok(())
}

fn schema_version(conn: &Connection) -> Result<u32, AppError> {
    Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?)
}

/// Run every script newer than the stored `user_version`.
fn apply_schema(conn: &Connection) -> Result<(), AppError> {
    let current = schema_version(conn)? as usize;
    for (applied, script) in SCHEMA.iter().enumerate().skip(current) {
        let version = applied as u32 + 1;
        conn.execute_batch(script)?;
        conn.pragma_update(None, "user_version", version)?;
        log::info!("Schema at version {}", version);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_new_keeps_path() {
        let cfg = DbConfig::new("/tmp/x/company.db");
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/x/company.db"));
    }

    #[test]
    fn schema_script_creates_three_tables() {
        let creates = SCHEMA[0].split(';').filter(|s| s.contains("CREATE TABLE")).count();
        assert_eq!(creates, 3);
    }

    #[test]
    fn init_db_records_version_and_recreate_empties_tables() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = DbConfig::new(dir.path().join("nested").join("company.db"));
        init_db(&config, SchemaMode::CreateIfMissing).unwrap();
        init_db(&config, SchemaMode::CreateIfMissing).unwrap();

        let conn = open_connection(&config.db_path).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA.len() as u32);
        conn.execute(
            "INSERT INTO departments (name, created_at) VALUES ('x', 'now')",
            [],
        )
        .unwrap();
        drop(conn);

        init_db(&config, SchemaMode::Recreate).unwrap();
        let conn = open_connection(&config.db_path).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(1) FROM departments", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 0);
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA.len() as u32);
    }
}
