//! OpenAPI document

use utoipa::OpenApi;

use crate::error::ApiError;
use crate::handlers::{AnalyzeRequest, AnalyzeResponse, HealthResponse, MetricsResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health,
        crate::handlers::metrics,
        crate::handlers::analyze,
        crate::handlers::analyze_upload,
        crate::handlers::analyze_download,
    ),
    components(schemas(
        AnalyzeRequest,
        AnalyzeResponse,
        HealthResponse,
        MetricsResponse,
        ApiError,
    )),
    tags((name = "sca", description = "Sales conversation analyzer API"))
)]
pub struct ApiDoc;
