//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::PayrollPayload;
use crate::validation::validate_payload;

use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a payroll payload and returns the calculated result.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollPayload>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    // Handle JSON parsing errors
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    // Check if it's a missing field error
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    // Field-level validation before any derivation runs
    let engine = state.engine();
    if let Err(err) = validate_payload(&payload, engine.config()) {
        warn!(
            correlation_id = %correlation_id,
            error = %err,
            "Payload validation failed"
        );
        let api_error: ApiErrorResponse = err.into();
        return (
            api_error.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(api_error.error),
        )
            .into_response();
    }

    // Perform the calculation
    let start_time = Instant::now();
    match engine.calculate(&payload) {
        Ok(result) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                calculation_id = %result.calculation_id,
                contract_type = %payload.employee.contract_type.as_str(),
                gross = %result.gross,
                warnings = result.warnings.len(),
                duration_us = duration.as_micros(),
                "Calculation completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            if err.is_internal() {
                error!(
                    correlation_id = %correlation_id,
                    error = %err,
                    "Internal consistency error"
                );
            } else {
                warn!(
                    correlation_id = %correlation_id,
                    error = %err,
                    "Calculation failed"
                );
            }
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::engine::Engine;
    use crate::models::PayrollResult;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/pl").expect("Failed to load config");
        let engine = Engine::new(config).expect("Failed to build engine");
        AppState::new(engine)
    }

    fn valid_body() -> String {
        r#"{
            "employee": {
                "firstName": "Jan",
                "lastName": "Kowalski",
                "contractType": "EMPLOYMENT"
            },
            "position": { "baseRate": "6000" },
            "period": {
                "payPeriodStart": "2025-06-01",
                "payPeriodEnd": "2025-06-30",
                "normHoursInPeriod": "160"
            },
            "tax": {
                "taxYear": 2025,
                "taxFreeAllowanceMonthly": "0",
                "costsOfIncomeMonthly": "0",
                "taxThresholds": []
            },
            "timesheet": { "hoursWorked": "160" }
        }"#
        .to_string()
    }

    async fn post_calculate(router: Router, body: String) -> axum::response::Response {
        router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/calculate")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_request_returns_200() {
        let router = create_router(create_test_state());

        let response = post_calculate(router, valid_body()).await;
        assert_eq!(response.status(), StatusCode::OK);

        // Verify Content-Type header
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        // Verify response body is a valid PayrollResult
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let result: PayrollResult = serde_json::from_slice(&body).unwrap();

        assert_eq!(result.gross, Decimal::from_str("6000.00").unwrap());
        assert!(result.details.contains_key("net"));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = post_calculate(router, "{invalid json".to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();

        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_required_field_returns_400() {
        let router = create_router(create_test_state());

        // Employee is missing lastName
        let body = r#"{
            "employee": {
                "firstName": "Jan",
                "contractType": "EMPLOYMENT"
            },
            "position": { "baseRate": "6000" },
            "period": {
                "payPeriodStart": "2025-06-01",
                "payPeriodEnd": "2025-06-30"
            },
            "tax": {
                "taxYear": 2025,
                "taxFreeAllowanceMonthly": "0",
                "costsOfIncomeMonthly": "0"
            },
            "timesheet": { "hoursWorked": "160" }
        }"#;

        let response = post_calculate(router, body.to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();

        assert!(
            error.message.contains("missing field")
                || error.message.to_lowercase().contains("lastname"),
            "Expected error message to mention the missing field, got: {}",
            error.message
        );
    }

    #[tokio::test]
    async fn test_constraint_violation_returns_validation_error() {
        let router = create_router(create_test_state());

        let body = valid_body().replace("\"baseRate\": \"6000\"", "\"baseRate\": \"-6000\"");

        let response = post_calculate(router, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response_body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&response_body).unwrap();

        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.details.unwrap().contains("position.baseRate"));
    }

    #[tokio::test]
    async fn test_unknown_contract_type_returns_400() {
        let router = create_router(create_test_state());

        let body = valid_body().replace("EMPLOYMENT", "INTERNSHIP");

        let response = post_calculate(router, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_warnings_travel_in_response_body() {
        let router = create_router(create_test_state());

        let body = valid_body()
            .replace("\"baseRate\": \"6000\"", "\"baseRate\": \"150\"")
            .replace(
                "\"timesheet\"",
                "\"deductions\": { \"bailDeduction\": \"500\" },\n            \"timesheet\"",
            );

        let response = post_calculate(router, body).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response_body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let result: PayrollResult = serde_json::from_slice(&response_body).unwrap();

        assert_eq!(result.details["net"], Decimal::ZERO);
        assert_eq!(result.warnings.len(), 1);
    }
}
