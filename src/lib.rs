pub mod app;
pub mod commands;
pub mod domain;
pub mod error;
pub mod infra;

use commands::Menu;
use error::AppError;
use infra::{init_db, DbConfig, SchemaMode};

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    // A second init (tests, repeated runs) keeps the first logger.
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Interactive menu over stdin/stdout, keeping whatever data is already stored.
pub fn run() -> Result<(), AppError> {
    init_logging();

    let config = DbConfig::from_env();
    log::info!("DB path: {:?}", config.db_path);
    init_db(&config, SchemaMode::CreateIfMissing).map_err(|e| {
        log::error!("DB init failed: {}", e);
        e
    })?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Menu::new(config, stdin.lock(), stdout.lock()).run()
}

/// Seed a fresh demo database and print the three loading strategies.
pub fn run_demo() -> Result<(), AppError> {
    init_logging();

    let config = DbConfig::from_env_or("loading-demo.db");
    log::info!("DB path: {:?}", config.db_path);

    let stdout = std::io::stdout();
    app::run_loading_demo(&config, &mut stdout.lock()).map_err(|e| {
        log::error!("Loading demo failed: {}", e);
        e
    })
}
