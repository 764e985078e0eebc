use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, middleware, routing::post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use scanrelay_api::config::Config;
use scanrelay_api::ledger;
use scanrelay_api::middleware::require_webhook_auth;
use scanrelay_api::sheets;
use scanrelay_api::state::{AppState, AppStateInner};
use scanrelay_api::webhook;
use scanrelay_db::Workbook;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scanrelay=debug,tower_http=debug".into()),
        )
        .init();

    // Config is read once here; nothing downstream touches the environment.
    let config = Config::from_env()?;

    let workbook = Workbook::open(&PathBuf::from(&config.db_path))?;

    let state: AppState = Arc::new(AppStateInner {
        workbook,
        http: reqwest::Client::new(),
        config: config.clone(),
    });

    // The normalizer endpoint sits behind the configured auth policy; the
    // ledger endpoints are plain (the forward call originates in-process or
    // from the deployment's private network).
    let webhook_routes = Router::new()
        .route("/webhook", post(webhook::receive_update))
        .layer(middleware::from_fn_with_state(state.clone(), require_webhook_auth))
        .with_state(state.clone());

    let ledger_routes = Router::new()
        .route("/update", post(ledger::update_ledger))
        .route("/sheets/seed", post(sheets::seed_sheet))
        .with_state(state);

    let app = Router::new()
        .merge(webhook_routes)
        .merge(ledger_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("scanrelay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
