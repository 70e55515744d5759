use std::{sync::Arc, time::Duration};

use migration::{Migrator, MigratorTrait};
use settings::Database;
use tokio::sync::RwLock;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "gruzzolo={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    if let Some(server_settings) = settings.server {
        let rates_settings = settings.rates;
        tasks.spawn(async move {
            tracing::info!("Found server settings...");
            let db = match parse_database(&server_settings.database).await {
                Ok(db) => db,
                Err(err) => {
                    tracing::error!("failed to initialize database: {err}");
                    return;
                }
            };

            let engine = match engine::Engine::builder().database(db.clone()).build().await {
                Ok(engine) => engine,
                Err(err) => {
                    tracing::error!("failed to build engine from database: {err}");
                    return;
                }
            };

            let state = server::ServerState {
                engine: Arc::new(engine),
                db,
                rates: Arc::new(RwLock::new(None)),
            };

            if let Some(rates) = rates_settings {
                match server::HttpRateSource::new(&rates.url) {
                    Ok(source) => {
                        let interval =
                            Duration::from_secs(rates.refresh_minutes.unwrap_or(60) * 60);
                        server::spawn_refresh(source, state.rates.clone(), interval);
                    }
                    Err(err) => tracing::error!("invalid rates source: {err}"),
                }
            } else {
                tracing::warn!("no rates settings; clients will see original currencies only");
            }

            let bind = server_settings
                .bind
                .unwrap_or_else(|| "127.0.0.1".to_string());
            let addr = format!("{}:{}", bind, server_settings.port);
            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(listener) => listener,
                Err(err) => {
                    tracing::error!("failed to bind server listener: {err}");
                    return;
                }
            };
            if let Err(err) = server::run_with_listener(state, listener).await {
                tracing::error!("server failed: {err}");
            }
        });
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
