use std::sync::Arc;

use anyhow::Context;
use log::{info, LevelFilter};
use simplelog::{Config, SimpleLogger};

use ai_image_gallery::{app, AppConfig, AppState, GeminiGateway, UploadStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    SimpleLogger::init(LevelFilter::Info, Config::default())?;

    let config = AppConfig::from_env();
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("creating upload dir {}", config.upload_dir.display()))?;

    let gateway = GeminiGateway::from_config(&config);
    let state = AppState {
        store: UploadStore::new(&config.upload_dir, config.allowed_extensions.clone()),
        gateway: Arc::new(gateway),
    };

    let router = app(state, config.max_content_length);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;

    info!("serving gallery on http://{}", config.bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
