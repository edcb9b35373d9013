//! REST API request handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::advisory::ApiCompletionProvider;
use crate::config::parse_hhmm;
use crate::error::{AdvisoryError, ScheduleError, TempoError};
use crate::schedule::{ConflictReport, Event, EventInput, EventPatch, ScheduleOutcome, WorkingHours};
use crate::scheduler::Scheduler;

/// Application state shared across handlers.
pub struct ApiState {
    /// Scheduler performing all operations.
    pub scheduler: Arc<Scheduler<ApiCompletionProvider>>,
}

impl ApiState {
    /// Create new API state.
    pub fn new(scheduler: Arc<Scheduler<ApiCompletionProvider>>) -> Self {
        Self { scheduler }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Events list response.
#[derive(Debug, Clone, Serialize)]
pub struct EventsListResponse {
    pub events: Vec<Event>,
    pub total: usize,
}

/// List query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    /// Filter by tag.
    #[serde(default)]
    pub tag: Option<String>,
}

/// Reschedule suggestion response.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionResponse {
    pub start_time: DateTime<Utc>,
}

/// Free-text assistance request.
#[derive(Debug, Clone, Deserialize)]
pub struct DescribeRequest {
    pub text: String,
}

/// Schedule question request.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Free-text assistance response.
#[derive(Debug, Clone, Serialize)]
pub struct AssistResponse {
    pub text: String,
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// ============================================================================
// Error mapping
// ============================================================================

fn error_response(err: TempoError) -> Response {
    let (status, code) = match &err {
        TempoError::Schedule(ScheduleError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
        TempoError::Schedule(ScheduleError::InvalidTimestamp(_))
        | TempoError::Schedule(ScheduleError::InvalidTimeRange { .. }) => {
            (StatusCode::BAD_REQUEST, "invalid_time")
        }
        TempoError::Advisory(AdvisoryError::Unavailable(_)) => {
            (StatusCode::SERVICE_UNAVAILABLE, "advisory_unavailable")
        }
        TempoError::Advisory(_) => (StatusCode::BAD_GATEWAY, "advisory_failed"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: code.to_string(),
        }),
    )
        .into_response()
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
            code: "invalid_payload".to_string(),
        }),
    )
        .into_response()
}

fn outcome_response(outcome: ScheduleOutcome, committed_status: StatusCode) -> Response {
    match outcome {
        ScheduleOutcome::Committed(event) => (committed_status, Json(event)).into_response(),
        ScheduleOutcome::Conflict(report) => conflict_response(report),
    }
}

fn conflict_response(report: ConflictReport) -> Response {
    (StatusCode::CONFLICT, Json(report)).into_response()
}

// ============================================================================
// Edge validation
// ============================================================================

fn validate_working_hours(hours: &WorkingHours) -> Result<(), String> {
    let start = parse_hhmm(&hours.start).map_err(|e| format!("working_hours.start: {e}"))?;
    let end = parse_hhmm(&hours.end).map_err(|e| format!("working_hours.end: {e}"))?;
    if start >= end {
        return Err("working_hours start must precede end".to_string());
    }
    Ok(())
}

fn validate_input(input: &EventInput) -> Result<(), String> {
    if input.title.trim().is_empty() {
        return Err("title must not be empty".to_string());
    }
    if input.description.trim().is_empty() {
        return Err("description must not be empty".to_string());
    }
    if input.venue.trim().is_empty() {
        return Err("venue must not be empty".to_string());
    }
    if input.tags.iter().any(|t| t.trim().is_empty()) {
        return Err("tags must not contain empty strings".to_string());
    }
    if let Some(ref hours) = input.working_hours {
        validate_working_hours(hours)?;
    }
    Ok(())
}

fn validate_patch(patch: &EventPatch) -> Result<(), String> {
    if matches!(patch.title.as_deref(), Some(t) if t.trim().is_empty()) {
        return Err("title must not be empty".to_string());
    }
    if matches!(patch.description.as_deref(), Some(d) if d.trim().is_empty()) {
        return Err("description must not be empty".to_string());
    }
    if matches!(patch.venue.as_deref(), Some(v) if v.trim().is_empty()) {
        return Err("venue must not be empty".to_string());
    }
    if let Some(ref tags) = patch.tags {
        if tags.iter().any(|t| t.trim().is_empty()) {
            return Err("tags must not contain empty strings".to_string());
        }
    }
    if let Some(ref hours) = patch.working_hours {
        validate_working_hours(hours)?;
    }
    Ok(())
}

// ============================================================================
// Handler Functions
// ============================================================================

/// POST /api/v1/events - Create an event.
pub async fn create_event_handler(
    State(state): State<Arc<ApiState>>,
    Json(input): Json<EventInput>,
) -> Response {
    if let Err(message) = validate_input(&input) {
        return bad_request(message);
    }

    match state.scheduler.create(input).await {
        Ok(outcome) => outcome_response(outcome, StatusCode::CREATED),
        Err(e) => error_response(e),
    }
}

/// GET /api/v1/events - List events, optionally filtered by tag.
pub async fn list_events_handler(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<ListQuery>,
) -> Response {
    let events = match params.tag {
        Some(tag) => state.scheduler.filter_by_tag(&tag).await,
        None => state.scheduler.list().await,
    };
    let total = events.len();

    (StatusCode::OK, Json(EventsListResponse { events, total })).into_response()
}

/// GET /api/v1/events/:id - Get an event.
pub async fn get_event_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Response {
    match state.scheduler.get(&id).await {
        Ok(event) => (StatusCode::OK, Json(event)).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT /api/v1/events/:id - Update an event.
pub async fn update_event_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(patch): Json<EventPatch>,
) -> Response {
    if let Err(message) = validate_patch(&patch) {
        return bad_request(message);
    }

    match state.scheduler.update(&id, patch).await {
        Ok(outcome) => outcome_response(outcome, StatusCode::OK),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/v1/events/:id - Delete an event.
pub async fn delete_event_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Response {
    match state.scheduler.delete(&id).await {
        Ok(event) => (StatusCode::OK, Json(event)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/v1/events/:id/reschedule - Suggest a new start time.
pub async fn reschedule_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Response {
    match state.scheduler.reschedule(&id).await {
        Ok(start_time) => (StatusCode::OK, Json(SuggestionResponse { start_time })).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/v1/assist/describe - Improve a description.
pub async fn improve_description_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<DescribeRequest>,
) -> Response {
    if request.text.trim().is_empty() {
        return bad_request("text must not be empty");
    }

    match state.scheduler.improve_description(&request.text).await {
        Ok(text) => (StatusCode::OK, Json(AssistResponse { text })).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/v1/assist/summary - Summarize the schedule.
pub async fn summarize_handler(State(state): State<Arc<ApiState>>) -> Response {
    match state.scheduler.summarize().await {
        Ok(text) => (StatusCode::OK, Json(AssistResponse { text })).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/v1/assist/query - Answer a schedule question.
pub async fn answer_query_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<QueryRequest>,
) -> Response {
    if request.query.trim().is_empty() {
        return bad_request("query must not be empty");
    }

    match state.scheduler.answer_query(&request.query).await {
        Ok(text) => (StatusCode::OK, Json(AssistResponse { text })).into_response(),
        Err(e) => error_response(e),
    }
}
