//! REST API handlers.
//!
//! Each handler reads/writes via `Store` and returns JSON responses.
//! Write bodies arrive as loose JSON and are validated here, so every
//! malformed request becomes a 400 with a `{"error": ...}` body rather
//! than a framework rejection. The wire format accepts numbers or
//! numeric strings for `contestant` and `score`; both are coerced
//! here.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tracing::error;

use tally_core::{Ack, ApiErrorBody, Category, ScoreSubmission};
use tally_store::StoreError;

use crate::ApiState;

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiErrorBody {
            error: msg.to_string(),
        }),
    )
}

/// Maps store failures onto the wire: validation and duplicate errors
/// are the caller's fault and carry their message; database detail
/// stays in the server log.
fn store_error(err: &StoreError) -> Response {
    match err {
        StoreError::Validation(msg) | StoreError::Duplicate(msg) => {
            error_response(msg, StatusCode::BAD_REQUEST).into_response()
        }
        StoreError::Storage(_) => {
            error!(error = %err, "store operation failed");
            error_response("DB error", StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
    }
}

// ── Field extraction ───────────────────────────────────────────────

fn integer_field(body: &Value, key: &str) -> Option<i64> {
    let value = body.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn number_field(body: &Value, key: &str) -> Option<f64> {
    let value = body.get(key)?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn text_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_submission(body: &Value) -> Result<ScoreSubmission, String> {
    let contestant = integer_field(body, "contestant");
    let category = integer_field(body, "category");
    let judge_name = text_field(body, "judgeName");
    let criteria = text_field(body, "criteria");
    let score = number_field(body, "score");

    match (contestant, category, judge_name, criteria, score) {
        (Some(contestant), Some(code), Some(judge_name), Some(criteria), Some(score)) => {
            let category = Category::try_from(code).map_err(|e| e.to_string())?;
            Ok(ScoreSubmission {
                contestant,
                category,
                judge_name: judge_name.to_string(),
                criteria: criteria.to_string(),
                score,
            })
        }
        _ => Err("Missing fields".to_string()),
    }
}

// ── Judges ─────────────────────────────────────────────────────────

/// GET /api/judges
pub async fn list_judges(State(state): State<ApiState>) -> impl IntoResponse {
    match state.store.list_judges().await {
        Ok(judges) => Json(judges).into_response(),
        Err(e) => store_error(&e),
    }
}

/// POST /api/judges
pub async fn create_judge(
    State(state): State<ApiState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let Some(name) = text_field(&body, "name") else {
        return error_response("Name required", StatusCode::BAD_REQUEST).into_response();
    };
    match state.store.create_judge(name).await {
        Ok(judge) => (StatusCode::CREATED, Json(judge)).into_response(),
        Err(e) => store_error(&e),
    }
}

// ── Scores ─────────────────────────────────────────────────────────

/// Query parameters for GET /api/scores.
#[derive(serde::Deserialize)]
pub struct ScoresQuery {
    pub category: Option<i64>,
}

/// GET /api/scores?category=N (category defaults to 0, festival)
pub async fn scores_by_category(
    State(state): State<ApiState>,
    Query(query): Query<ScoresQuery>,
) -> impl IntoResponse {
    let category = match Category::try_from(query.category.unwrap_or(0)) {
        Ok(category) => category,
        Err(e) => return error_response(&e.to_string(), StatusCode::BAD_REQUEST).into_response(),
    };
    match state.store.scores_by_category(category).await {
        Ok(grouped) => Json(grouped).into_response(),
        Err(e) => store_error(&e),
    }
}

/// POST /api/scores
pub async fn submit_score(
    State(state): State<ApiState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let submission = match parse_submission(&body) {
        Ok(submission) => submission,
        Err(msg) => return error_response(&msg, StatusCode::BAD_REQUEST).into_response(),
    };
    match state.store.upsert_score(&submission).await {
        Ok(()) => Json(Ack { ok: true }).into_response(),
        Err(e) => store_error(&e),
    }
}

// ── Totals ─────────────────────────────────────────────────────────

/// GET /api/raw-scores
pub async fn raw_totals(State(state): State<ApiState>) -> impl IntoResponse {
    match state.store.raw_totals().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => store_error(&e),
    }
}

/// GET /api/contestant-totals
pub async fn contestant_totals(State(state): State<ApiState>) -> impl IntoResponse {
    match state.store.contestant_totals().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => store_error(&e),
    }
}
