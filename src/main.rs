mod config;
mod error;
mod inference_service;
mod routes;
mod state;
mod translate;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("transla_backend=debug,tower_http=debug")),
        )
        .init();

    // Load configuration - first existing candidate wins
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
        exe_dir.join("conf.yaml").to_str().map(|s| s.to_string()),
        exe_dir.join("conf.json").to_str().map(|s| s.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut config = None;
    for path in &config_paths {
        if !std::path::Path::new(path).exists() {
            tracing::debug!("No config at {}", path);
            continue;
        }
        // A file that exists but does not parse is fatal
        config = Some(Config::load(path)?);
        info!("Loaded configuration from: {}", path);
        break;
    }

    let config = match config {
        Some(cfg) => cfg,
        None => {
            warn!("No config file found (tried {:?}), using built-in defaults", config_paths);
            Config::default()
        }
    };

    let app_state = AppState::new(config.clone())?;
    let app = routes::build_app(app_state);

    let system_config = &config.system_config;
    let listener =
        tokio::net::TcpListener::bind((system_config.host.as_str(), system_config.port)).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
