use axum::{Extension, Json, extract::State};
use scamguard_db::quota::window_today;
use scamguard_types::api::{Claims, UsageResponse};
use scamguard_types::models::ActionKind;
use tracing::error;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/usage`: today's consumption for the account menu. Reads go
/// through the windowed ledger lookup, so a counter left over from a
/// previous day reads as zero without being rewritten.
pub async fn get_usage(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UsageResponse>, ApiError> {
    let db = state.db.clone();
    let limits = state.limits;
    let uid = claims.sub.to_string();

    let usage = tokio::task::spawn_blocking(move || {
        let window = window_today();
        let is_pro = db.is_pro(&uid)?;
        let checks_used = db.get_quota_used(&uid, ActionKind::Check, &window)?;
        let scenarios_used = db.get_quota_used(&uid, ActionKind::Scenario, &window)?;

        Ok::<_, anyhow::Error>(UsageResponse {
            checks_used,
            checks_limit: if is_pro { None } else { Some(limits.checks) },
            scenarios_used,
            scenarios_limit: if is_pro { None } else { Some(limits.scenarios) },
            is_pro,
        })
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(e.into())
    })??;

    Ok(Json(usage))
}
