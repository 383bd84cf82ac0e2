//! API request handlers

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;
use sca_core::AttributeReport;
use sca_extractor::PieChart;

/// Analyze request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Raw conversation transcript
    pub text: String,
}

/// Analyze response body
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    /// The three-map attribute report
    #[schema(value_type = Object)]
    pub extracted: AttributeReport,
    /// Chart data for the requirements that matched
    #[schema(value_type = Object)]
    pub requirement_chart: PieChart,
    /// Chart data for the policies discussed
    #[schema(value_type = Object)]
    pub policy_chart: PieChart,
    /// Chart data for the objections raised
    #[schema(value_type = Object)]
    pub objection_chart: PieChart,
    /// Wall-clock extraction time
    pub processing_time_ms: u64,
}

/// Health response body
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Metrics response body
#[derive(Debug, Serialize, ToSchema)]
pub struct MetricsResponse {
    pub uptime_seconds: u64,
    pub total_requests: u64,
    pub tagger: String,
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Basic process metrics
#[utoipa::path(
    get,
    path = "/metrics",
    responses((status = 200, description = "Process metrics", body = MetricsResponse))
)]
pub async fn metrics(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        uptime_seconds: state.uptime_secs(),
        total_requests: state.get_request_count(),
        tagger: state.extractor.tagger_name().to_string(),
    })
}

/// Analyze a transcript passed as JSON
#[utoipa::path(
    post,
    path = "/api/v1/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Extraction result", body = AnalyzeResponse),
        (status = 500, description = "Tagger failure", body = ApiError),
    )
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    run_analysis(&state, &req.text).await.map(Json)
}

/// Analyze an uploaded transcript file
#[utoipa::path(
    post,
    path = "/api/v1/analyze/upload",
    responses(
        (status = 200, description = "Extraction result", body = AnalyzeResponse),
        (status = 400, description = "Not a .txt file or not UTF-8", body = ApiError),
    )
)]
pub async fn analyze_upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let text = read_transcript(multipart).await?;
    run_analysis(&state, &text).await.map(Json)
}

/// Analyze an uploaded transcript and return the report as a download
#[utoipa::path(
    post,
    path = "/api/v1/analyze/download",
    responses(
        (status = 200, description = "extracted_information.json attachment"),
        (status = 400, description = "Not a .txt file or not UTF-8", body = ApiError),
    )
)]
pub async fn analyze_download(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let text = read_transcript(multipart).await?;
    let response = run_analysis(&state, &text).await?;

    let json = serde_json::to_string_pretty(&response.extracted)
        .map_err(|e| AppError::Internal(format!("Serialization failed: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"extracted_information.json\"".to_string(),
            ),
        ],
        json,
    ))
}

/// Run one extraction pass and assemble the response
async fn run_analysis(state: &AppState, text: &str) -> Result<AnalyzeResponse, AppError> {
    state.increment_requests();

    let started = Instant::now();
    let extracted = state.extractor.extract(text).await?;
    let processing_time_ms = started.elapsed().as_millis() as u64;

    tracing::debug!(
        tagger = state.extractor.tagger_name(),
        processing_time_ms,
        "analysis complete"
    );

    Ok(AnalyzeResponse {
        requirement_chart: PieChart::requirements(&extracted.customer_requirements),
        policy_chart: PieChart::policies(&extracted.company_policies),
        objection_chart: PieChart::objections(&extracted.customer_objections),
        extracted,
        processing_time_ms,
    })
}

/// Pull the transcript out of a multipart upload.
///
/// Only `.txt` files are accepted and the content must be UTF-8; any
/// other input is rejected at the boundary, no fallback encoding.
async fn read_transcript(mut multipart: Multipart) -> Result<String, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        if !file_name.to_lowercase().ends_with(".txt") {
            return Err(AppError::BadRequest(format!(
                "Unsupported file type: {file_name}, only .txt transcripts are accepted"
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

        return String::from_utf8(bytes.to_vec())
            .map_err(|e| AppError::BadRequest(format!("File is not valid UTF-8: {e}")));
    }

    Err(AppError::BadRequest("No file provided".to_string()))
}

// Re-export for utoipa path registration
pub use crate::error::ApiError;
