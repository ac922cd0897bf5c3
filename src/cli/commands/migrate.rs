use serde_json::json;

use crate::cli::{utils, OutputFormat};
use crate::config;
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config::config().database).await?;
    DatabaseManager::migrate(&pool).await?;
    pool.close().await;

    utils::output_success(output_format, "Migrations applied", Some(json!({ "migrated": true })))
}
