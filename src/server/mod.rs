// HTTP 接口

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::app::MangaApp;

pub fn create_router(app: Arc<MangaApp>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/set_token", post(handlers::set_token))
        .route("/api/search", get(handlers::search_manga))
        .route("/api/manga/{slug}", get(handlers::get_manga_details))
        .route(
            "/api/manga/{slug}/chapters_info",
            get(handlers::get_chapters_info),
        )
        .route("/api/download_chapter", post(handlers::start_download))
        .route(
            "/api/download_status/{task_id}",
            get(handlers::get_download_status),
        )
        .layer(cors)
        .with_state(app)
}

pub async fn serve(app: Arc<MangaApp>, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP 服务已启动: http://{}", listener.local_addr()?);
    axum::serve(listener, create_router(app)).await?;
    Ok(())
}
