mod find;

use axum::{routing::get, Router};
use maud::Markup;
use tokio::io::{AsyncBufReadExt, BufReader};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{backend::Backend, components, error::AppError};

#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
}

async fn home() -> Markup {
    components::search_page()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/find", get(find::find))
        .with_state(state)
        .nest_service("/assets", ServeDir::new("static"))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

pub async fn start(addr: &str, state: AppState) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Server is listening, enter 'q' to stop");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server is stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(%err, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    let quit = async {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim() == "q" {
                return;
            }
        }
        std::future::pending::<()>().await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = quit => {},
    }
    tracing::info!("Shutting down server");
}
