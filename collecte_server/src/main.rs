//! This crate implements an HTTP server answering which bin is collected when in
//! Pont-sur-Yonne, with the public holidays alongside.

use std::{io::IsTerminal, sync::Arc};

use anyhow::{anyhow, Context, Result};
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use chrono_tz::Tz;
use clap::Parser;
use collecte_core::{
    chrono::Utc,
    schedule::{seed, Schedule},
    service::CollecteService,
    store::MemoryStore,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, route::AppState};

mod config;
mod error;
mod route;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let config = Config::parse();

    let timezone: Tz = config
        .timezone
        .parse()
        .map_err(|err| anyhow!("invalid time zone `{}`: {err}", config.timezone))?;
    let store = load_store(&config).await?;
    let state = AppState {
        service: CollecteService::new(Arc::new(store)),
        timezone,
        environment: config.environment,
        default_year: config.default_year,
        supported_years: config.supported_years.clone(),
        clock: Arc::new(Utc::now),
    };

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .frontend_url
                .parse::<HeaderValue>()
                .context("invalid frontend url")?,
        )
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);
    let app = route::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    info!(
        addr = %config.addr,
        environment = %config.environment,
        cors_origin = %config.frontend_url,
        "backend server running"
    );
    axum::Server::bind(&config.addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}

async fn load_store(config: &Config) -> Result<MemoryStore> {
    let store = MemoryStore::new();
    if config.schedule.is_empty() {
        seed(&store, &Schedule::builtin()?).await?;
        return Ok(store);
    }
    for path in &config.schedule {
        let schedule = Schedule::load(path)
            .with_context(|| format!("cannot load schedule {}", path.display()))?;
        seed(&store, &schedule).await?;
    }
    Ok(store)
}
