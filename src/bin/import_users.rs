//! One-off legacy user import.
//!
//! Usage: `import_users [CSV_PATH] [DATABASE_URL]`
//!
//! Both arguments fall back to `six-wraps.toml` (or the built-in defaults), and
//! `SIX_WRAPS_DEMO_PASSWORD` overrides the password given to imported users.

use anyhow::Context;
use six_wraps::config::DEFAULT_CONFIG_FILE;
use six_wraps::utils::error::AppError;
use six_wraps::utils::{logger, validation::Validate};
use six_wraps::core::importer::import_into_sqlite;
use six_wraps::AppConfig;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init_cli_logger(false);

    let mut config = AppConfig::load_or_default(DEFAULT_CONFIG_FILE)
        .with_context(|| format!("could not load {}", DEFAULT_CONFIG_FILE))?;

    let mut args = std::env::args().skip(1);
    if let Some(csv_path) = args.next() {
        config.import.csv_path = csv_path;
    }
    if let Some(database_url) = args.next() {
        config.import.database_url = database_url;
    }
    if let Ok(password) = std::env::var("SIX_WRAPS_DEMO_PASSWORD") {
        config.import.demo_password = password;
    }
    config.validate()?;

    tracing::info!("📁 Importing users from {}", config.import.csv_path);

    let import = &config.import;
    let result = import_into_sqlite(
        Path::new(&import.csv_path),
        &import.database_url,
        &import.demo_password,
    )
    .await;

    match result {
        Ok(report) => {
            println!("{} users imported successfully.", report.imported);
            Ok(())
        }
        Err(e @ AppError::FileNotFound { .. }) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_friendly_message());
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
