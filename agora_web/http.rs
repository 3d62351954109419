use axum::{
    Router,
    routing::{get, post},
};
use std::{io::Error, net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;

use agora_app::{app_bus::AppBus, moderation::ModerationService};
use agora_types::{Result, errors::ApplicationError};

use crate::handlers::{
    decide_report, get_report, health, list_reports, review_report, submit_report,
};

#[derive(Clone)]
pub struct AppState {
    pub app_bus: Arc<AppBus>,
    pub moderation: Arc<ModerationService>,
}

impl AppState {
    pub fn new(app_bus: Arc<AppBus>, moderation: Arc<ModerationService>) -> AppState {
        AppState {
            app_bus,
            moderation,
        }
    }
}

pub struct WebRouter {}

impl WebRouter {
    pub async fn serve(state: AppState, port: u16) -> Result<(), ApplicationError> {
        let router = Router::new()
            .route("/health", get(health))
            .route("/reports", post(submit_report).get(list_reports))
            .route("/reports/{id}", get(get_report))
            .route("/reports/{id}/review", post(review_report))
            .route("/reports/{id}/decision", post(decide_report))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            let err = format!("{:#?}", e);
            ApplicationError::Infrastructure(err)
        })?;

        tracing::info!(
            "HTTP Server started, listening on http://{}",
            addr.to_string()
        );
        axum::serve(listener, router).await.map_err(infra_error)?;

        Ok(())
    }
}

fn infra_error(e: Error) -> ApplicationError {
    let err = format!("{:#?}", e);
    ApplicationError::Infrastructure(err)
}
