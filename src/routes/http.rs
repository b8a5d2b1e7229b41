//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs include parameters and basic result info.

use std::sync::Arc;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument};

use crate::logic::{
    mistakes_for_range, heatmap_for_range, recommendations_for_latest, run_analysis,
    AnalyzeError, DEFAULT_RECOMMENDATIONS, DEFAULT_USER_ID,
};
use crate::protocol::*;
use crate::state::AppState;

fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorOut { error: message.into() })).into_response()
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state), fields(mode = ?q.mode))]
pub async fn http_get_questions(
    State(state): State<Arc<AppState>>,
    Query(q): Query<QuestionsQuery>,
) -> impl IntoResponse {
    let mode = q.mode.unwrap_or_default();
    Json(state.question_bank(mode).to_vec())
}

#[instrument(level = "info", skip(state, body), fields(question_id = %body.question_id, mode = ?body.mode))]
pub async fn http_post_analyze(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalyzeIn>,
) -> Response {
    match run_analysis(&state, body).await {
        Ok(out) => {
            info!(target: "analysis", attempt_id = %out.attempt_id, mistakes = out.mistakes.len(), "HTTP analyze completed");
            Json(out).into_response()
        }
        Err(AnalyzeError::BadRequest(msg)) => api_error(StatusCode::BAD_REQUEST, msg),
        Err(AnalyzeError::Upstream(msg)) => api_error(StatusCode::BAD_GATEWAY, msg),
        Err(AnalyzeError::Storage(msg)) => api_error(StatusCode::INTERNAL_SERVER_ERROR, msg),
    }
}

#[instrument(level = "info", skip(state), fields(range = %q.range.clone().unwrap_or_else(|| "current".into())))]
pub async fn http_get_mistakes(
    State(state): State<Arc<AppState>>,
    Query(q): Query<MistakesQuery>,
) -> impl IntoResponse {
    let user_id = q.user_id.unwrap_or_else(|| DEFAULT_USER_ID.into());
    let range = q.range.unwrap_or_else(|| "current".into());
    let mistakes = mistakes_for_range(&state, &user_id, &range, q.mode);
    info!(target: "analysis", %user_id, %range, count = mistakes.len(), "HTTP mistakes served");
    Json(mistakes)
}

#[instrument(level = "info", skip(state), fields(range = %q.range.clone().unwrap_or_else(|| "current".into())))]
pub async fn http_get_heatmap(
    State(state): State<Arc<AppState>>,
    Query(q): Query<MistakesQuery>,
) -> impl IntoResponse {
    let user_id = q.user_id.unwrap_or_else(|| DEFAULT_USER_ID.into());
    let range = q.range.unwrap_or_else(|| "current".into());
    Json(heatmap_for_range(&state, &user_id, &range, q.mode))
}

#[instrument(level = "info", skip(state), fields(n = q.n.unwrap_or(DEFAULT_RECOMMENDATIONS)))]
pub async fn http_get_recommendations(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RecommendQuery>,
) -> impl IntoResponse {
    let user_id = q.user_id.unwrap_or_else(|| DEFAULT_USER_ID.into());
    let n = q.n.unwrap_or(DEFAULT_RECOMMENDATIONS);
    let picks = recommendations_for_latest(&state, &user_id, q.mode, n);
    info!(target: "analysis", %user_id, count = picks.len(), "HTTP recommendations served");
    Json(picks)
}
