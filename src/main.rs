use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_calendar::api::router;
use todo_calendar::config::Config;
use todo_calendar::remote::ReqwestTodoBackend;
use todo_calendar::services::PageState;
use todo_calendar::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "todo_calendar=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!("using todo backend at {}", config.api_base_url);

    let backend = Arc::new(ReqwestTodoBackend::new(&config)?);
    let state = AppState::new(backend);

    match state.page.load().await {
        PageState::Ready { todo_count, .. } => info!("initial load: {} todos", todo_count),
        other => info!("initial load finished as {:?}", other),
    }

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
