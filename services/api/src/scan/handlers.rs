use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use sniff_ingest::{CompanyInfo, DetectionRequest, ImageUpload};
use sniff_normalize::CanonicalResult;

use crate::error::ApiError;
use crate::AppState;

use super::requests::{EcommerceScanRequest, NewsScanRequest};

const FILE_NAME_HEADER: &str = "x-file-name";
const DEFAULT_FILE_NAME: &str = "upload";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

async fn run(
    state: &AppState,
    request: DetectionRequest,
) -> Result<Json<CanonicalResult>, ApiError> {
    let outcome = state.scanner.scan(&request).await?;
    Ok(Json(outcome.result))
}

pub async fn scan_news(
    State(state): State<AppState>,
    Json(body): Json<NewsScanRequest>,
) -> Result<Json<CanonicalResult>, ApiError> {
    run(&state, DetectionRequest::try_from(body)?).await
}

pub async fn scan_ecommerce(
    State(state): State<AppState>,
    Json(body): Json<EcommerceScanRequest>,
) -> Result<Json<CanonicalResult>, ApiError> {
    run(&state, body.into()).await
}

pub async fn scan_job(
    State(state): State<AppState>,
    Json(body): Json<CompanyInfo>,
) -> Result<Json<CanonicalResult>, ApiError> {
    run(&state, DetectionRequest::JobPosting(body)).await
}

pub async fn scan_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CanonicalResult>, ApiError> {
    let header_str = |name: &str, default: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
            .to_string()
    };

    let upload = ImageUpload {
        file_name: header_str(FILE_NAME_HEADER, DEFAULT_FILE_NAME),
        content_type: header_str(header::CONTENT_TYPE.as_str(), DEFAULT_CONTENT_TYPE),
        bytes: body.to_vec(),
    };
    run(&state, DetectionRequest::Image(upload)).await
}
