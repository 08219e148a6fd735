use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, error, info, trace};

/// Apply all pending migrations and keep the connection open for the caller.
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection> {
    trace!("Attempting to connect to database");
    let db = Database::connect(database_url).await.map_err(|e| {
        error!("Failed to connect to database '{}': {}", database_url, e);
        e
    })?;
    debug!("Database connection established");

    let pending = Migrator::get_pending_migrations(&db).await?;
    info!("Applying {} pending migrations", pending.len());
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run database migrations: {}", e);
        return Err(e.into());
    }
    debug!("Schema is up to date");

    Ok(db)
}

pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing database at {}", database_url);
    let db = connect_and_migrate(database_url).await?;
    db.close().await?;
    info!("Database initialization completed successfully!");
    Ok(())
}
