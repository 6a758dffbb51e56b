use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dashboard_auth::emulator::{self, config::Configuration, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .init();

    let configuration = Configuration::new()?;
    tracing::info!(
        "Configuration loaded with {} seed accounts",
        configuration.accounts.len()
    );
    if configuration.accounts.is_empty() {
        tracing::warn!("No accounts configured, every sign in will be rejected");
    }

    let state = AppState::from_configuration(&configuration);

    let addr = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    tracing::info!("Starting identity emulator on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    emulator::serve(listener, state).await?;

    Ok(())
}
