//! REST API router and configuration.

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::advisory::ApiCompletionProvider;
use crate::api::handlers::{
    answer_query_handler, create_event_handler, delete_event_handler, get_event_handler,
    improve_description_handler, list_events_handler, reschedule_handler, summarize_handler,
    update_event_handler, ApiState,
};
use crate::scheduler::Scheduler;

/// REST API configuration.
#[derive(Debug, Clone)]
pub struct RestApiConfig {
    /// Enable CORS.
    pub enable_cors: bool,
    /// API prefix (e.g., "/api/v1").
    pub prefix: String,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            prefix: "/api/v1".to_string(),
        }
    }
}

/// Create the REST API router.
///
/// Endpoints:
/// - POST   /api/v1/events                - Create an event (409 on conflict)
/// - GET    /api/v1/events[?tag=]         - List events, optionally by tag
/// - GET    /api/v1/events/:id            - Get an event
/// - PUT    /api/v1/events/:id            - Update an event (409 on conflict)
/// - DELETE /api/v1/events/:id            - Delete an event
/// - POST   /api/v1/events/:id/reschedule - Suggest a new start time
/// - POST   /api/v1/assist/describe       - Improve a description
/// - POST   /api/v1/assist/summary        - Summarize the schedule
/// - POST   /api/v1/assist/query          - Answer a schedule question
pub fn create_router(
    scheduler: Arc<Scheduler<ApiCompletionProvider>>,
    config: &RestApiConfig,
) -> Router {
    let state = Arc::new(ApiState::new(scheduler));

    let api_routes = Router::new()
        .route("/events", post(create_event_handler).get(list_events_handler))
        .route(
            "/events/:id",
            get(get_event_handler)
                .put(update_event_handler)
                .delete(delete_event_handler),
        )
        .route("/events/:id/reschedule", post(reschedule_handler))
        .route("/assist/describe", post(improve_description_handler))
        .route("/assist/summary", post(summarize_handler))
        .route("/assist/query", post(answer_query_handler))
        .with_state(state);

    let router = Router::new().nest(&config.prefix, api_routes);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .allow_origin(Any);

        router.layer(cors)
    } else {
        router
    }
}
