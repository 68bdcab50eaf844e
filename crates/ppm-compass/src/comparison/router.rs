use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::defaults::default_criteria;
use super::domain::{Criterion, FilterCondition, FilterMode, Tool, ToolId};
use super::ranking::{ComparisonEngine, RankedTool};
use super::score::{ScoreBreakdown, ScoreTier};

/// Router builder exposing the matching core over HTTP.
pub fn comparison_router(engine: Arc<ComparisonEngine>) -> Router {
    Router::new()
        .route("/api/v1/comparison/score", post(score_handler))
        .route("/api/v1/comparison/filter", post(filter_handler))
        .route("/api/v1/comparison/rank", post(rank_handler))
        .route(
            "/api/v1/comparison/criteria/defaults",
            get(default_criteria_handler),
        )
        .with_state(engine)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub tool: Tool,
    pub criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub tool_id: ToolId,
    pub score: f64,
    pub tier: ScoreTier,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
    #[serde(default)]
    pub mode: FilterMode,
    #[serde(default)]
    pub include_removed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterResponse {
    pub count: usize,
    pub tools: Vec<Tool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    pub tools: Vec<Tool>,
    /// Falls back to the default criteria list when omitted.
    #[serde(default)]
    pub criteria: Option<Vec<Criterion>>,
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
    #[serde(default)]
    pub mode: FilterMode,
    #[serde(default)]
    pub include_removed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankResponse {
    pub generated_at: DateTime<Utc>,
    pub evaluated: usize,
    pub results: Vec<RankedTool>,
}

fn normalized(mut tools: Vec<Tool>) -> Vec<Tool> {
    for tool in &mut tools {
        tool.derive_tag_lists();
    }
    tools
}

pub(crate) async fn score_handler(
    State(engine): State<Arc<ComparisonEngine>>,
    Json(request): Json<ScoreRequest>,
) -> Response {
    let breakdown = engine.scorer().breakdown(&request.tool, &request.criteria);
    let response = ScoreResponse {
        tool_id: request.tool.id,
        score: breakdown.score,
        tier: ScoreTier::from_score(breakdown.score),
        breakdown,
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub(crate) async fn filter_handler(
    State(engine): State<Arc<ComparisonEngine>>,
    Json(request): Json<FilterRequest>,
) -> Response {
    let tools = normalized(request.tools);
    let kept = engine.filter_tools(
        &tools,
        &request.conditions,
        request.mode,
        request.include_removed,
    );
    let response = FilterResponse {
        count: kept.len(),
        tools: kept,
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub(crate) async fn rank_handler(
    State(engine): State<Arc<ComparisonEngine>>,
    Json(request): Json<RankRequest>,
) -> Response {
    let tools = normalized(request.tools);
    let criteria = request.criteria.unwrap_or_else(default_criteria);
    let results = engine.rank(
        &tools,
        &criteria,
        &request.conditions,
        request.mode,
        request.include_removed,
    );
    let response = RankResponse {
        generated_at: Utc::now(),
        evaluated: tools.len(),
        results,
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub(crate) async fn default_criteria_handler() -> Json<Vec<Criterion>> {
    Json(default_criteria())
}
