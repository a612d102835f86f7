use axum::{Json, extract::State};
use scamguard_types::api::{LeadRequest, LeadResponse};
use tracing::error;

use crate::error::ApiError;
use crate::state::AppState;

const LEAD_SOURCE: &str = "scam_checklist";

/// Syntax check only: one `@`, a dot in the domain, no whitespace. Real
/// validation happens when the guide email bounces or not.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    let clean = |part: &str| {
        !part.is_empty() && !part.chars().any(|c| c.is_whitespace() || c == '@')
    };
    clean(local) && clean(host) && clean(tld)
}

/// `POST /api/lead`: sign an email up for the checklist guide. Repeat
/// signups are absorbed silently.
pub async fn capture_lead(
    State(state): State<AppState>,
    Json(req): Json<LeadRequest>,
) -> Result<Json<LeadResponse>, ApiError> {
    let email = req.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ApiError::validation("Please enter a valid email address."));
    }

    let db = state.db.clone();
    tokio::task::spawn_blocking(move || db.upsert_lead(&email, LEAD_SOURCE))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.into())
        })??;

    Ok(Json(LeadResponse {
        ok: true,
        message: "Thanks! We'll send the guide soon.".to_string(),
    }))
}
