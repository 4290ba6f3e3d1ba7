//! Database connection setup and schema bootstrap.

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use std::time::Duration;
use tracing::{debug, info};

pub mod entities;
pub mod services;

use entities::prelude::{AuthToken, Tag, User};

/// Opens a connection pool for `database_url`.
///
/// In-memory SQLite databases live inside a single connection, so the pool is
/// pinned to exactly one connection that is never recycled.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    if database_url.contains(":memory:") {
        opt.max_connections(1)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(u32::MAX as u64))
            .max_lifetime(Duration::from_secs(u32::MAX as u64));
    } else {
        opt.max_connections(10);
    }
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;
    debug!(backend = ?db.get_database_backend(), "Database connection established.");
    Ok(db)
}

/// Creates every table that does not exist yet, parents before children.
pub async fn bootstrap_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, User).await?;
    create_table(db, Tag).await?;
    create_table(db, AuthToken).await?;
    info!("Database schema is up to date.");
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

/// Connects to a fresh in-memory database with the schema in place.
#[cfg(test)]
pub(crate) async fn test_connection() -> DatabaseConnection {
    let db = connect("sqlite::memory:").await.expect("in-memory sqlite");
    bootstrap_schema(&db).await.expect("schema bootstrap");
    db
}
