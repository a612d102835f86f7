//! HTTP surface of the SaveFromScam backend: scam-risk analysis of
//! suspicious messages, daily usage quotas, the scam simulator, the
//! community feed with AI moderation, check history, and lead capture.
//!
//! Handlers live one module per route group; [`router`] assembles the
//! full API with auth middleware applied per group.

pub mod analyze;
pub mod comments;
pub mod error;
pub mod history;
pub mod leads;
pub mod middleware;
pub mod posts;
pub mod quota;
pub mod scenarios;
pub mod simulator;
pub mod state;
pub mod states;
pub mod sweep;
pub mod trending;
pub mod usage;
pub mod votes;

pub use error::ApiError;
pub use state::{AppState, AppStateInner, DailyLimits, SweepSettings};

use axum::{
    Json, Router,
    routing::{get, post},
};

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// The complete route table. Public routes take an optional bearer token,
/// protected routes require a valid user JWT, and the sweep trigger
/// authenticates with the scheduler's pre-shared secret instead.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/simulator/scenarios", get(simulator::get_scenarios))
        .route("/api/community/posts", get(posts::list_posts))
        .route(
            "/api/community/posts/{id}/comments",
            get(comments::list_comments),
        )
        .route("/api/community/trending", get(trending::get_trending))
        .route("/api/lead", post(leads::capture_lead))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/analyze", post(analyze::analyze_text))
        .route("/api/usage", get(usage::get_usage))
        .route(
            "/api/check-history",
            get(history::get_history).post(history::save_check),
        )
        .route("/api/simulator/use", post(simulator::use_scenario))
        .route("/api/community/posts", post(posts::submit_post))
        .route(
            "/api/community/posts/{id}/comments",
            post(comments::submit_comment),
        )
        .route("/api/community/posts/{id}/vote", post(votes::cast_vote))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state.clone());

    let sweep_route = Router::new()
        .route("/api/moderation/sweep", post(sweep::trigger_sweep))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_sweep_secret,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(sweep_route)
}
