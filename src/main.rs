use matchjobs_backend::{
    config::Config,
    database::pool::{create_pool, run_migrations},
    middleware::cors::permissive_cors,
    routes, AppState,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    run_migrations(&pool).await?;

    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; behavioral insights will use placeholders");
    }
    if config.allow_storage_reset {
        tracing::warn!("ALLOW_STORAGE_RESET is enabled; DELETE /api/admin/storage wipes all data");
    }

    let server_address = config.server_address.clone();
    let app_state = AppState::new(pool, config)?;

    let app = routes::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(permissive_cors());

    let listener = TcpListener::bind(&server_address).await?;
    info!("MatchJobs backend listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
