use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::models::role_mapping;

pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Seed the default plan → role mappings when the table is empty.
pub async fn seed_role_mappings(pool: &PgPool) -> Result<(), sqlx::Error> {
    let count = role_mapping::count(pool).await?;
    if count > 0 {
        log::info!("Role mappings already seeded ({} rows), skipping", count);
        return Ok(());
    }

    let defaults = role_mapping::defaults();
    for mapping in &defaults {
        role_mapping::upsert(pool, mapping).await?;
    }
    log::info!("Seeded {} default role mappings", defaults.len());
    Ok(())
}
