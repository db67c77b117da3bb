use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::{bathroom_log, feeding};

/// Connect to the store, create missing tables and ensure secondary indexes.
pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    if is_in_memory(db_url) {
        // Every SQLite in-memory connection is its own database, so the pool
        // must hold exactly one connection for the lifetime of the process.
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
    } else {
        opt.max_connections(100)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(8))
            .max_lifetime(Duration::from_secs(8))
            .sqlx_logging(true);
    }

    let db = Database::connect(opt).await?;
    db.get_schema_registry("pawtrack_server::entity::*")
        .sync(&db)
        .await?;
    ensure_indexes(&db).await;

    Ok(db)
}

fn is_in_memory(db_url: &str) -> bool {
    db_url.starts_with("sqlite::memory:") || db_url.contains("mode=memory")
}

/// Ensure composite indexes used by the log listings exist.
///
/// Schema-sync only creates single-column indexes, so the `(dog_id, date)`
/// pairs are created here. Failures are logged and otherwise ignored.
pub async fn ensure_indexes(db: &DatabaseConnection) {
    let indexes = [
        (
            "idx_bathroom_log_dog_date",
            Index::create()
                .if_not_exists()
                .name("idx_bathroom_log_dog_date")
                .table(bathroom_log::Entity)
                .col(bathroom_log::Column::DogId)
                .col(bathroom_log::Column::Date)
                .to_owned(),
        ),
        (
            "idx_feeding_dog_date",
            Index::create()
                .if_not_exists()
                .name("idx_feeding_dog_date")
                .table(feeding::Entity)
                .col(feeding::Column::DogId)
                .col(feeding::Column::Date)
                .to_owned(),
        ),
    ];

    let backend = db.get_database_backend();
    for (name, index) in indexes {
        match db.execute_raw(backend.build(&index)).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => warn!("Failed to create index {}: {}", name, e),
        }
    }
}
