use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use confidant_api::{build_router, config::Config, state::AppState};
use confidant_assistants::AssistantsClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Confidant API server");
    tracing::info!("Config loaded: {}", config.listen_addr());
    if config.assistant_id.is_none() {
        tracing::warn!("OPENAI_ASSISTANT_ID is not set; chat requests will fail when starting a run");
    }

    let poll = config.poll_config();
    tracing::info!(
        interval_ms = poll.interval.as_millis() as u64,
        max_attempts = poll.max_attempts,
        max_wait_secs = poll.max_wait().as_secs(),
        "Run polling budget"
    );

    // Initialize Assistants API client
    tracing::info!("Initializing Assistants client ({})", config.assistants.base_url);
    let assistants: Arc<dyn AssistantsClient> = Arc::new(config.openai().build_client()?);

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), assistants));

    // Build router
    let app = build_router(state);

    // Start server
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("API docs: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
