use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tts_pcm_gateway::{ServerConfig, create_app, state::AppState};

#[derive(Parser, Debug)]
#[command(name = "tts-pcm-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    /// YAML configuration file; its values override the environment
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tts_pcm_gateway=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = if let Some(config_path) = cli.config {
        info!("Loading configuration from {}", config_path.display());
        ServerConfig::from_file(&config_path).map_err(|e| anyhow!(e.to_string()))?
    } else {
        ServerConfig::from_env().map_err(|e| anyhow!(e.to_string()))?
    };

    let address = config.address();
    if config.demo_mode {
        info!("Demo mode enabled: answering with a synthetic tone");
    } else if !config.has_provider_credentials() {
        tracing::warn!(
            provider = %config.tts_provider,
            "No API key configured for the selected provider; synthesis requests will fail"
        );
    }

    let app_state = AppState::new(config).map_err(|e| anyhow!(e.to_string()))?;
    let app = create_app(app_state);

    let socket_addr: SocketAddr = address
        .parse()
        .map_err(|e| anyhow!("Invalid server address {address}: {e}"))?;
    let listener = TcpListener::bind(&socket_addr).await?;
    info!("Server listening on http://{}", socket_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
