//! HTTP handler functions for the pop-map API.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use pop_map_analysis::AnalysisError;
use pop_map_analysis_models::AnalysisRequest;
use pop_map_households::SUPPORTED_COUNTRIES;
use pop_map_server_models::{ApiError, ApiHealth, ApiStats};

use crate::AppState;

/// `GET /`
///
/// Service description and endpoint listing.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "name": "pop-map API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /api/analyze": "Analyze a catchment (address + travel time)",
            "GET /api/health": "Health check",
            "GET /api/stats": "Dataset statistics",
        },
    }))
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        // The grid is loaded before the server binds, so a responding
        // server is a ready server.
        ready: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/stats`
///
/// Figures about the loaded datasets.
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiStats {
        total_cells: state.analyzer.grid().len(),
        supported_countries: SUPPORTED_COUNTRIES.len(),
    })
}

/// `POST /api/analyze`
///
/// Runs one catchment analysis. Validation failures are `400` with a
/// reason code; an unresolvable address is `404`; upstream failures are
/// `502` and retryable.
pub async fn analyze(state: web::Data<AppState>, body: web::Json<AnalysisRequest>) -> HttpResponse {
    match state.analyzer.analyze(&body).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => error_response(&e),
    }
}

/// Maps an [`AnalysisError`] to a status code and stable reason code.
fn error_response(error: &AnalysisError) -> HttpResponse {
    let (status, code) = match error {
        AnalysisError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
        AnalysisError::AddressNotFound => (StatusCode::NOT_FOUND, "address_not_found"),
        AnalysisError::GeocodeFailed(_) => (StatusCode::BAD_GATEWAY, "geocoder_unavailable"),
        AnalysisError::CatchmentUnavailable | AnalysisError::IsochroneFailed(_) => {
            (StatusCode::BAD_GATEWAY, "catchment_unavailable")
        }
    };

    if status.is_server_error() {
        log::error!("Analysis failed: {error}");
    } else {
        log::warn!("Analysis rejected: {error}");
    }

    HttpResponse::build(status).json(ApiError {
        code: code.to_string(),
        error: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pop_map_analysis::ValidationError;

    #[test]
    fn validation_errors_are_bad_requests() {
        let response = error_response(&AnalysisError::Validation(ValidationError::TimeOutOfRange));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_address_is_not_found() {
        let response = error_response(&AnalysisError::AddressNotFound);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_failures_are_bad_gateway() {
        let response = error_response(&AnalysisError::CatchmentUnavailable);
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
