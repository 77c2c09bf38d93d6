//! Starboard bot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p starboard-gateway --bin starboard
//! ```
//!
//! Configuration is loaded from environment variables.

use starboard_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    // Initialize tracing
    let environment = config.as_ref().map(|c| c.app.env).unwrap_or_default();
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(environment)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(env = ?config.app.env, name = %config.app.name, "Starting starboard bot...");

    if let Err(e) = starboard_gateway::run(config).await {
        error!(error = %e, code = e.error_code(), "Bot stopped");
        std::process::exit(1);
    }
}
