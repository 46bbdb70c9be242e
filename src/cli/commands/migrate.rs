use tracing::info;

use crate::config;
use crate::database::DatabaseManager;

pub async fn handle() -> anyhow::Result<()> {
    let database = &config::config().database;
    if database.url.is_none() {
        anyhow::bail!("DATABASE_URL must be set to run migrations");
    }

    let pool = DatabaseManager::connect(database).await?;
    DatabaseManager::migrate(&pool).await?;

    info!("Migrations applied");
    Ok(())
}
