//! Shared helpers: every test gets its own database file in a temp dir.

#![allow(dead_code)]

use app_lib::app::seed_company;
use app_lib::infra::{init_db, DbConfig, SchemaMode};
use tempfile::TempDir;

pub struct TestDb {
    pub config: DbConfig,
    _dir: TempDir,
}

pub fn test_db() -> TestDb {
    let dir = TempDir::new().unwrap();
    let config = DbConfig::new(dir.path().join("company.db"));
    init_db(&config, SchemaMode::CreateIfMissing).unwrap();
    TestDb { config, _dir: dir }
}

pub fn seeded_db() -> TestDb {
    let db = test_db();
    seed_company(&db.config).unwrap();
    db
}
