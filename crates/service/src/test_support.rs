#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use configs::DatabaseConfig;
use models::db::{connect_with_config, migrate};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_config() -> Option<DatabaseConfig> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return None; }
    let mut cfg = DatabaseConfig::default();
    cfg.normalize_from_env();
    cfg.validate().ok()?;
    cfg.min_connections = 1;
    cfg.acquire_timeout_secs = 10;
    cfg.connect_timeout_secs = 10;
    Some(cfg)
}

/// Fresh connection for the current test, or `None` when no database is reachable.
pub async fn get_db() -> Option<DatabaseConnection> {
    let cfg = test_config()?;
    let migrated = *MIGRATED
        .get_or_init(|| async {
            match connect_with_config(&cfg).await {
                Ok(db) => migrate(&db).await.map_err(|e| eprintln!("skip: migrate up failed: {}", e)).is_ok(),
                Err(e) => { eprintln!("skip: cannot connect to db: {}", e); false }
            }
        })
        .await;
    if !migrated { return None; }
    connect_with_config(&cfg).await.ok()
}
