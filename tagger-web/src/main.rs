//! Servidor web Axum que expõe o etiquetador de entidades nomeadas

mod config;
mod routes;

use std::sync::Arc;

use tagger_core::TaggerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::routes::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let server_config = ServerConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let tagger_config = match &server_config.tagger_config {
        Some(path) => {
            info!(path = %path.display(), "carregando configuração do etiquetador");
            TaggerConfig::from_json_file(path)?
        }
        None => TaggerConfig::default(),
    };
    let tagger = tagger_config.build()?;
    let state = Arc::new(AppState { tagger });

    let listener = tokio::net::TcpListener::bind(&server_config.bind).await?;
    info!("🚀 Servidor do etiquetador iniciado em http://{}", server_config.bind);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
