use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use scamguard_types::api::{Claims, ScenariosResponse, SimulatorUseResponse};
use scamguard_types::models::ActionKind;
use serde_json::json;
use tracing::error;

use crate::error::ApiError;
use crate::quota::{self, QuotaDecision};
use crate::scenarios;
use crate::state::AppState;

/// `POST /api/simulator/use`: spend one practice-scenario slot. The denial
/// body carries `allowed: false` alongside the usual quota fields because
/// the simulator page keys off it.
pub async fn use_scenario(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    let db = state.db.clone();
    let limits = state.limits;
    let uid = claims.sub.to_string();
    let decision =
        tokio::task::spawn_blocking(move || quota::admit(&db, limits, &uid, ActionKind::Scenario))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                ApiError::Internal(e.into())
            })??;

    match decision {
        QuotaDecision::Denied { limit } => {
            let body = json!({
                "allowed": false,
                "limit_reached": true,
                "error": quota::denial_message(ActionKind::Scenario, limit),
            });
            Ok((StatusCode::FORBIDDEN, Json(body)).into_response())
        }
        QuotaDecision::Admitted { .. } => {
            Ok(Json(SimulatorUseResponse { allowed: true }).into_response())
        }
    }
}

/// `GET /api/simulator/scenarios`: the static practice catalog.
pub async fn get_scenarios() -> Json<ScenariosResponse> {
    Json(ScenariosResponse {
        scenarios: scenarios::catalog(),
        sample_scam_text: scenarios::SAMPLE_SCAM_TEXT.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{claims_for, test_state};

    #[tokio::test]
    async fn second_scenario_of_the_day_is_refused() {
        let (state, _dir) = test_state();
        let claims = claims_for("33333333-3333-3333-3333-333333333331");

        let first = use_scenario(State(state.clone()), Extension(claims.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = use_scenario(State(state.clone()), Extension(claims))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn catalog_endpoint_serves_scenarios_and_sample() {
        let body = get_scenarios().await;
        assert_eq!(body.scenarios.len(), 3);
        assert!(!body.sample_scam_text.is_empty());
    }
}
