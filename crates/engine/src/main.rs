//! Lampioni Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lampioni_engine::api::{
    self,
    surfaces::{WsMapSurface, WsUiSink},
    ConnectionManager,
};
use lampioni_engine::infrastructure::store::FileLampStore;
use lampioni_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lampioni_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Lampioni Engine");

    // Load configuration
    let data_dir = std::env::var("LAMPIONI_DATA_DIR").unwrap_or_else(|_| "data".into());
    let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let server_port: u16 = std::env::var("SERVER_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .unwrap_or(3000);
    let playback_interval_ms: u64 = std::env::var("PLAYBACK_INTERVAL_MS")
        .unwrap_or_else(|_| "500".into())
        .parse()
        .unwrap_or(500);

    // Presentation adapters: the connected viewers ARE the map surface.
    let connections = Arc::new(ConnectionManager::new());
    let map = Arc::new(WsMapSurface::new(connections.clone()));
    let ui = Arc::new(WsUiSink::new(connections.clone()));

    let app = Arc::new(App::new(
        map,
        ui,
        Duration::from_millis(playback_interval_ms),
    ));

    // Fetch-once startup. A failure leaves the map in its pre-load empty
    // state; the error has already been pushed to the UI sink.
    let store = FileLampStore::new(&data_dir);
    if let Err(e) = app.timeline.initialize(&store).await {
        tracing::warn!(error = %e, "Serving without lamp data");
    }

    // WebSocket state
    let ws_state = Arc::new(api::websocket::WsState {
        app: app.clone(),
        connections,
    });

    // Build router with separate states for HTTP and WebSocket
    let mut router = api::http::routes()
        .with_state(app)
        .route("/ws", get(api::websocket::ws_handler).with_state(ws_state))
        .nest_service("/data", ServeDir::new(store.data_dir()))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{server_host}:{server_port}").parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
