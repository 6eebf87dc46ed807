//! Request handlers

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use council_application::{
    AgentInvoker, CouncilContext, DeliberateInput, ExpertEvaluator, NoProgress, RunDebateInput,
};
use council_domain::{ConstitutionScope, DecisionBrief, ExpertSeat, ExpertVote, StrictnessLevel};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct RunDebateRequest {
    pub strategy_ref: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    pub constitutions: Vec<String>,
    #[serde(default)]
    pub strictness: Option<StrictnessLevel>,
    #[serde(default)]
    pub max_rounds: Option<u32>,
    #[serde(default)]
    pub council_config_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    #[serde(default)]
    pub council_config_id: Option<String>,
    pub context_ref: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ConstitutionSummary {
    pub id: String,
    pub title: String,
    pub version: String,
    pub scope: ConstitutionScope,
    pub principles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CouncilSummary {
    pub id: String,
    pub quorum: f64,
    pub tie_breaker: String,
    pub experts: Vec<ExpertSeat>,
}

pub async fn health<A: AgentInvoker + 'static, E: ExpertEvaluator + 'static>(
    State(state): State<AppState<A, E>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: state.version.clone(),
    })
}

pub async fn list_constitutions<A: AgentInvoker + 'static, E: ExpertEvaluator + 'static>(
    State(state): State<AppState<A, E>>,
) -> Json<Vec<ConstitutionSummary>> {
    Json(
        state
            .catalog
            .constitutions()
            .iter()
            .map(|c| ConstitutionSummary {
                id: c.id.clone(),
                title: c.title.clone(),
                version: c.version.clone(),
                scope: c.scope(),
                principles: c.principles.iter().map(|p| p.id.clone()).collect(),
            })
            .collect(),
    )
}

pub async fn list_councils<A: AgentInvoker + 'static, E: ExpertEvaluator + 'static>(
    State(state): State<AppState<A, E>>,
) -> Json<Vec<CouncilSummary>> {
    Json(
        state
            .catalog
            .councils()
            .map(|c| CouncilSummary {
                id: c.id().to_string(),
                quorum: c.quorum(),
                tie_breaker: c.tie_breaker().to_string(),
                experts: c.experts().to_vec(),
            })
            .collect(),
    )
}

/// `POST /debate/run`: full deliberation, answered with the decision brief
pub async fn run_debate<A: AgentInvoker + 'static, E: ExpertEvaluator + 'static>(
    State(state): State<AppState<A, E>>,
    payload: Result<Json<RunDebateRequest>, JsonRejection>,
) -> ApiResult<Json<DecisionBrief>> {
    let Json(request) = payload?;
    if request.strategy_ref.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "strategy_ref must not be empty".to_string(),
        ));
    }

    let constitutions = request
        .constitutions
        .iter()
        .map(|id| {
            state
                .catalog
                .constitution(id)
                .ok_or_else(|| ApiError::UnknownConstitution(id.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let council_id = request
        .council_config_id
        .unwrap_or_else(|| state.defaults.council_id.clone());
    let council = state
        .catalog
        .council(&council_id)
        .ok_or(ApiError::UnknownCouncil(council_id))?;

    let mut debate = RunDebateInput::new(
        request
            .tenant_id
            .unwrap_or_else(|| state.defaults.tenant_id.clone()),
        request.strategy_ref,
        constitutions,
    )
    .with_strictness(request.strictness.unwrap_or(state.defaults.strictness));
    if let Some(max_rounds) = request.max_rounds {
        debate = debate.with_max_rounds(max_rounds);
    }

    info!(
        "Debate requested for {} (tenant {}, council {})",
        debate.strategy_ref,
        debate.tenant_id,
        council.id()
    );

    let cancel = state.shutdown.child_token();
    let brief = state
        .deliberate
        .execute_with_progress(DeliberateInput::new(debate, council), &NoProgress, &cancel)
        .await?;
    Ok(Json(brief))
}

/// `POST /experts/vote`: one council round on an existing context
pub async fn vote<A: AgentInvoker + 'static, E: ExpertEvaluator + 'static>(
    State(state): State<AppState<A, E>>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<ExpertVote>>> {
    let Json(request) = payload?;
    if request.context_ref.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "context_ref must not be empty".to_string(),
        ));
    }

    let council_id = request
        .council_config_id
        .unwrap_or_else(|| state.defaults.council_id.clone());
    let council = state
        .catalog
        .council(&council_id)
        .ok_or(ApiError::UnknownCouncil(council_id))?;

    let cancel = state.shutdown.child_token();
    let ballot = state
        .votes
        .execute_with_progress(
            &council,
            CouncilContext::new(request.context_ref),
            &NoProgress,
            &cancel,
        )
        .await;
    Ok(Json(ballot.votes))
}
