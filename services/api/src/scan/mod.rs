pub mod handlers;
pub mod requests;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::AppState;

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/scan/news", post(handlers::scan_news))
        .route("/scan/ecommerce", post(handlers::scan_ecommerce))
        .route("/scan/job", post(handlers::scan_job))
        .route(
            "/scan/image",
            post(handlers::scan_image).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}
