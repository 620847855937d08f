//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use super::AppState;
use super::types::{CalculateRequest, ErrorResponse, StateResponse, TrendQuery};
use crate::runner::run_scenario;
use crate::tariff::usage::TrendPoint;

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

/// Returns the loaded scenario and its report.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Response {
    Json(StateResponse {
        scenario: &state.scenario,
        report: state.report.as_ref(),
    })
    .into_response()
}

/// Computes a report for the posted bill on top of the loaded scenario.
///
/// `POST /calculate` → 200 + `SavingsReport` JSON
/// malformed body or invalid input → 400 + `ErrorResponse`
pub async fn post_calculate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CalculateRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    debug!(total_bill = request.total_bill, "calculate request");
    let scenario = match request.apply_to(&state.scenario) {
        Ok(s) => s,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };
    match run_scenario(&scenario) {
        Ok(report) => Json(report).into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

/// Returns trend rows for the loaded scenario, optionally filtered by day.
///
/// `GET /trend` → 200 + `Vec<TrendPoint>` JSON
/// `GET /trend?from=N&to=M` → filtered range (inclusive)
/// `GET /trend?from=10&to=5` → 400 + `ErrorResponse`
/// no bill in the scenario → 404 + `ErrorResponse`
pub async fn get_trend(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrendQuery>,
) -> Response {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("`from` ({from}) must be <= `to` ({to})"),
        );
    }

    let Some(report) = &state.report else {
        return error_response(
            StatusCode::NOT_FOUND,
            "scenario has no bill amount; use POST /calculate".to_string(),
        );
    };

    let rows: Vec<TrendPoint> = report
        .trend
        .iter()
        .filter(|p| p.day >= from && p.day <= to)
        .copied()
        .collect();

    Json(rows).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::config::ScenarioConfig;

    fn make_test_state(with_bill: bool) -> Arc<AppState> {
        let mut scenario = ScenarioConfig::smartthings();
        let report = if with_bill {
            scenario.billing.total_bill = Some(1250.0);
            Some(run_scenario(&scenario).unwrap())
        } else {
            None
        };
        Arc::new(AppState { scenario, report })
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn state_returns_200() {
        let app = router(make_test_state(true));
        let req = Request::builder().uri("/state").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert!(json.get("scenario").is_some());
        assert!(json["report"]["billing"]["consumption_kwh"].is_number());
    }

    #[tokio::test]
    async fn state_without_bill_has_null_report() {
        let app = router(make_test_state(false));
        let req = Request::builder().uri("/state").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert!(json["report"].is_null());
    }

    #[tokio::test]
    async fn trend_range_query() {
        let app = router(make_test_state(true));
        let req = Request::builder()
            .uri("/trend?from=5&to=10")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 6); // days 5..=10
        assert_eq!(rows[0]["day"], 5);
        assert_eq!(rows[5]["day"], 10);
    }

    #[tokio::test]
    async fn trend_invalid_range_returns_400() {
        let app = router(make_test_state(true));
        let req = Request::builder()
            .uri("/trend?from=10&to=5")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await.get("error").is_some());
    }

    #[tokio::test]
    async fn trend_without_bill_returns_404() {
        let app = router(make_test_state(false));
        let req = Request::builder().uri("/trend").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn calculate_bill_below_fixed_charge_returns_400() {
        let app = router(make_test_state(false));
        let req = Request::builder()
            .method("POST")
            .uri("/calculate")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"total_bill": 50}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("fixed charge"));
    }

    async fn post_calculate_body(body: &'static str) -> Response {
        let app = router(make_test_state(false));
        let req = Request::builder()
            .method("POST")
            .uri("/calculate")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        app.oneshot(req).await.unwrap()
    }

    #[tokio::test]
    async fn calculate_malformed_json_returns_400_with_error_body() {
        let resp = post_calculate_body("{not json").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await["error"].is_string());
    }

    #[tokio::test]
    async fn calculate_missing_or_mistyped_bill_returns_400() {
        for body in [r#"{}"#, r#"{"total_bill":"abc"}"#, r#"{"total_bill":2000,"bogus":1}"#] {
            let resp = post_calculate_body(body).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
            let json = body_json(resp).await;
            assert!(json["error"].is_string(), "body: {body}");
        }
    }

    #[tokio::test]
    async fn calculate_valid_bill_returns_report() {
        let resp = post_calculate_body(r#"{"total_bill": 1250, "enable": ["ac"]}"#).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let savings = json["billing"]["smart"]["total_savings"].as_f64().unwrap();
        assert!((savings - 202.5).abs() < 1e-9);
    }
}
