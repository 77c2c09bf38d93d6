//! Bot wiring: storage, REST client, engine and gateway connection

use std::sync::Arc;

use starboard_common::{AppConfig, AppError};
use starboard_db::{PgSettingsRepository, PgTallyRepository};
use starboard_service::{EngineConfig, ReactionEngine, ServiceContextBuilder};

use crate::connection::{GatewayClient, GatewaySettings};
use crate::handlers::EventHandler;
use crate::rest::DiscordRestClient;

/// Connect storage and build the reaction engine on top of it
pub async fn create_engine(
    config: &AppConfig,
    rest: Arc<DiscordRestClient>,
) -> Result<ReactionEngine, AppError> {
    tracing::info!("Connecting to PostgreSQL...");
    let db_config = starboard_db::DatabaseConfig::from(&config.database);
    let pool = starboard_db::create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    starboard_db::run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    let context = ServiceContextBuilder::new()
        .tally_repo(Arc::new(PgTallyRepository::new(pool.clone())))
        .settings_repo(Arc::new(PgSettingsRepository::new(pool)))
        .platform(rest)
        .config(EngineConfig::from(&config.bot))
        .build()?;

    Ok(ReactionEngine::new(context))
}

/// Run the bot until the gateway refuses the session or Ctrl-C
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let rest = Arc::new(
        DiscordRestClient::new(&config.bot.api_base, &config.bot.token)
            .map_err(AppError::external)?,
    );
    let engine = create_engine(&config, Arc::clone(&rest)).await?;

    let handler = Arc::new(EventHandler::new(
        engine,
        rest,
        config.bot.application_id.clone(),
    ));
    let client = GatewayClient::new(GatewaySettings::from(&config.bot), handler);

    tracing::info!(emoji = %config.bot.emoji, "Connecting to gateway");

    tokio::select! {
        result = client.run() => result.map_err(AppError::external),
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(AppError::internal)?;
            tracing::info!("Shutdown signal received");
            Ok(())
        }
    }
}
