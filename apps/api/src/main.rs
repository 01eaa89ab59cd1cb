// [apps/api/src/main.rs]
//! Entry point for the Query & Command API.

use attention_api::prelude::*;
use attention_domain_auth::TokenService;
use attention_infra_bus::FanOutBus;
use attention_infra_db::{ClusterRepository, DbClient, EventRepository, JobRepository, UserRepository};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    attention_shared_observability::init_tracing("attention_api");

    let config = Config::from_env();
    let db = DbClient::connect(&config.database_url, config.turso_auth_token.clone()).await?;

    let events = EventRepository::new(db.connection()?);
    let clusters = ClusterRepository::new(db.connection()?);
    let users = UserRepository::new(db.connection()?);
    let jobs = JobRepository::new(db.connection()?);

    let tokens = Arc::new(TokenService::new(
        &config.jwt_signing_secret,
        config.jwt_access_token_ttl_minutes,
        config.jwt_refresh_token_ttl_days));
    let bus = Arc::new(FanOutBus::connect(&config.bus_redis_url).await?);

    let port = config.port;
    let state = AppState { events, clusters, users, jobs, bus, tokens, config: Arc::new(config) };
    let app = build_router(state);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "attention-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
