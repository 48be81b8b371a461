use std::sync::Arc;

use anyhow::{Context, Result};

use easy_todo::{
    ai_client::AiClient,
    app::{self, AppState},
    config::Settings,
    kv::FileKvStore,
    logging,
    store::Persistence,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        data_dir = %settings.data_dir.display(),
        "Starting easy_todo"
    );

    let persistence = Persistence::new(Arc::new(FileKvStore::new(&settings.data_dir)));

    let ai_client = match &settings.ai_service_url {
        Some(url) => Some(AiClient::new(url, settings.ai_service_timeout_seconds)?),
        None => {
            tracing::warn!("AI_SERVICE_URL not set, natural-language task creation disabled");
            None
        }
    };

    let state = AppState::new(persistence, ai_client);
    if settings.seed_sample_tasks {
        state.todos.lock().initialize();
    }

    let app = app::create_app(state, &settings.static_dir);

    let listener = tokio::net::TcpListener::bind(&settings.server_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.server_addr))?;

    // Print the link to the server
    tracing::info!("Server running at http://{}", settings.server_addr);
    tracing::info!("API base:     http://{}/api", settings.server_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
