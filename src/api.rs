//! HTTP API for the Housing Advisor.
//!
//! This module exposes a small REST API using the
//! [`axum`](https://crates.io/crates/axum) framework.  Clients submit
//! payroll scenarios and receive the estimated bankable income, look
//! up how lenders view each contract type, read the reference guide
//! and forward questions to the advisor.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::info;

use crate::advisor::{consult, Advisor, ReplyStatus, NOT_CONFIGURED_MESSAGE};
use crate::contracts::{all_contracts, risk_analysis, ContractInfo, ContractType, RiskAnalysis, APPLICATION_CHECKLIST};
use crate::engine::{estimate, estimate_batch, variable_income};
use crate::guide::{sections, GuideSection, GUIDE_CONTENT};
use crate::input::RawCalculationInput;
use crate::models::{CalculationInput, EstimatorConfig, IncomeBreakdown};

/// Largest number of scenarios accepted by one batch request.
pub const MAX_BATCH: usize = 500;

/// Application state shared across requests.
pub struct AppState {
    pub estimator: EstimatorConfig,
    pub advisor: Arc<dyn Advisor>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}

/// A sanitised scenario together with its estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub input: CalculationInput,
    pub breakdown: IncomeBreakdown,
    pub variable_income: f64,
}

impl EstimateResponse {
    fn new(input: CalculationInput, breakdown: IncomeBreakdown) -> Self {
        let variable_income = variable_income(&breakdown);
        Self {
            input,
            breakdown,
            variable_income,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub scenarios: Vec<RawCalculationInput>,
}

#[derive(Debug, Serialize)]
pub struct GuideResponse {
    pub content: &'static str,
    pub sections: Vec<GuideSection>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub status: ReplyStatus,
    pub answer: String,
}

/// Build the API router around `state`.  Returns the router and a
/// handle to the state.
pub fn build_router(state: AppState) -> (Router, Arc<AppState>) {
    let state = Arc::new(state);
    let router = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/estimate", post(estimate_handler))
        .route("/api/estimate/defaults", get(defaults_handler))
        .route("/api/estimate/batch", post(batch_handler))
        .route("/api/contracts", get(contracts_handler))
        .route("/api/contracts/:contract", get(contract_handler))
        .route("/api/checklist", get(checklist_handler))
        .route("/api/guide", get(guide_handler))
        .route("/api/advisor/status", get(advisor_status_handler))
        .route("/api/advisor/ask", post(ask_handler))
        .with_state(state.clone());
    (router, state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

/// Handler for GET /api/estimate/defaults
async fn defaults_handler(State(state): State<Arc<AppState>>) -> Json<EstimateResponse> {
    let input = state.estimator.initial_input();
    Json(EstimateResponse::new(input, estimate(&input, &state.estimator)))
}

/// Handler for POST /api/estimate
async fn estimate_handler(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<RawCalculationInput>,
) -> Json<EstimateResponse> {
    let input = raw.into_input_with(state.estimator.initial_input());
    Json(EstimateResponse::new(input, estimate(&input, &state.estimator)))
}

/// Handler for POST /api/estimate/batch
async fn batch_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<Vec<EstimateResponse>>, ApiError> {
    if request.scenarios.len() > MAX_BATCH {
        return Err(ApiError::BadRequest(format!(
            "at most {MAX_BATCH} scenarios per batch, got {}",
            request.scenarios.len()
        )));
    }
    let defaults = state.estimator.initial_input();
    let inputs: Vec<CalculationInput> = request
        .scenarios
        .into_iter()
        .map(|raw| raw.into_input_with(defaults))
        .collect();
    let results = estimate_batch(&inputs, &state.estimator)
        .into_iter()
        .zip(inputs)
        .map(|(breakdown, input)| EstimateResponse::new(input, breakdown))
        .collect();
    Ok(Json(results))
}

async fn contracts_handler() -> Json<Vec<ContractInfo>> {
    Json(all_contracts())
}

/// Handler for GET /api/contracts/:contract
async fn contract_handler(Path(contract): Path<String>) -> Result<Json<RiskAnalysis>, ApiError> {
    let contract_type: ContractType = contract
        .parse()
        .map_err(|err: crate::contracts::UnknownContractType| ApiError::NotFound(err.to_string()))?;
    Ok(Json(risk_analysis(contract_type)))
}

async fn checklist_handler() -> Json<Vec<&'static str>> {
    Json(APPLICATION_CHECKLIST.to_vec())
}

async fn guide_handler() -> Json<GuideResponse> {
    Json(GuideResponse {
        content: GUIDE_CONTENT,
        sections: sections(),
    })
}

async fn advisor_status_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "configured": state.advisor.is_configured(),
        "model": state.advisor.model(),
    }))
}

/// Handler for POST /api/advisor/ask
async fn ask_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let reply = consult(state.advisor.as_ref(), &request.question)
        .await
        .ok_or_else(|| ApiError::BadRequest("question must not be empty".to_string()))?;
    if reply.status == ReplyStatus::NotConfigured {
        return Err(ApiError::Unavailable(NOT_CONFIGURED_MESSAGE.to_string()));
    }
    Ok(Json(AskResponse {
        status: reply.status,
        answer: reply.text,
    }))
}

/// Launch the API server on `addr`.  Runs until interrupted.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let (router, state) = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        advisor_configured = state.advisor.is_configured(),
        "server listening"
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::tests::StubAdvisor;
    use crate::advisor::FALLBACK_MESSAGE;
    use pretty_assertions::assert_eq;

    fn state_with(advisor: StubAdvisor) -> Arc<AppState> {
        let (_router, state) = build_router(AppState {
            estimator: EstimatorConfig::default(),
            advisor: Arc::new(advisor),
        });
        state
    }

    fn state() -> Arc<AppState> {
        state_with(StubAdvisor {
            configured: true,
            answer: Some("Respuesta"),
        })
    }

    fn raw(json: &str) -> RawCalculationInput {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn defaults_estimate_the_preset_salary() {
        let Json(response) = defaults_handler(State(state())).await;
        assert_eq!(response.input, CalculationInput::default());
        assert_eq!(response.breakdown.total, 1_300_000.0);
        assert_eq!(response.variable_income, 0.0);
    }

    #[tokio::test]
    async fn estimate_sanitises_text_input() {
        let Json(response) = estimate_handler(
            State(state()),
            Json(raw(r#"{"baseSalary": "2400000", "nightHours": "10", "dayOvertime": "abc", "sundayHours": -4}"#)),
        )
        .await;
        assert_eq!(response.input.day_overtime, 0.0);
        assert_eq!(response.input.sunday_hours, 0.0);
        assert_eq!(response.breakdown.total, 2_435_000.0);
        assert_eq!(response.variable_income, 35_000.0);
    }

    #[tokio::test]
    async fn estimate_accepts_any_json_quantity() {
        let Json(response) = estimate_handler(
            State(state()),
            Json(raw(r#"{"baseSalary": 2400000, "nightHours": 1e400, "dayOvertime": true, "sundayHours": [8]}"#)),
        )
        .await;
        assert_eq!(response.breakdown.total, 2_400_000.0);
        assert_eq!(response.variable_income, 0.0);
    }

    #[tokio::test]
    async fn batch_keeps_order_and_limits_size() {
        let request = BatchRequest {
            scenarios: vec![
                raw(r#"{"baseSalary": 2400000, "dayOvertime": 5}"#),
                raw(r#"{"baseSalary": 2400000, "sundayHours": 8, "nightOvertime": 2}"#),
            ],
        };
        let Json(results) = batch_handler(State(state()), Json(request)).await.unwrap();
        let totals: Vec<f64> = results.iter().map(|r| r.breakdown.total).collect();
        assert_eq!(totals, vec![2_462_500.0, 2_575_000.0]);

        let too_many = BatchRequest {
            scenarios: vec![RawCalculationInput::default(); MAX_BATCH + 1],
        };
        let err = batch_handler(State(state()), Json(too_many)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn contract_lookup() {
        let Json(analysis) = contract_handler(Path("fixed".to_string())).await.unwrap();
        assert_eq!(analysis.info.contract_type, ContractType::Fixed);

        let err = contract_handler(Path("freelance".to_string())).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let Json(all) = contracts_handler().await;
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn ask_returns_answer() {
        let Json(response) = ask_handler(
            State(state()),
            Json(AskRequest {
                question: "¿Qué es la prima?".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status, ReplyStatus::Answered);
        assert_eq!(response.answer, "Respuesta");
    }

    #[tokio::test]
    async fn ask_rejects_blank_question() {
        let err = ask_handler(
            State(state()),
            Json(AskRequest {
                question: "   ".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn ask_without_key_is_unavailable() {
        let state = state_with(StubAdvisor {
            configured: false,
            answer: None,
        });
        let Json(status) = advisor_status_handler(State(state.clone())).await;
        assert_eq!(status["configured"], false);

        let err = ask_handler(
            State(state),
            Json(AskRequest {
                question: "hola".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn ask_failure_is_a_visible_fallback() {
        let state = state_with(StubAdvisor {
            configured: true,
            answer: None,
        });
        let Json(response) = ask_handler(
            State(state),
            Json(AskRequest {
                question: "hola".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status, ReplyStatus::Fallback);
        assert_eq!(response.answer, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn guide_serves_reference_text() {
        let Json(guide) = guide_handler().await;
        assert_eq!(guide.content, GUIDE_CONTENT);
        assert_eq!(guide.sections.len(), 3);
        let Json(checklist) = checklist_handler().await;
        assert_eq!(checklist.len(), 4);
    }
}
