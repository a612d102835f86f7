use anyhow::Context;
use axum::{Extension, Json, extract::State};
use scamguard_db::models::{HistoryRow, parse_timestamp};
use scamguard_types::api::{CheckHistoryEntry, Claims, SaveCheckRequest, SaveCheckResponse};
use scamguard_types::models::RiskVerdict;
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// How many saved checks the history page shows.
const HISTORY_LIMIT: u32 = 50;

/// `GET /api/check-history`: the caller's saved analyses, newest first, as
/// a bare array.
pub async fn get_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<CheckHistoryEntry>>, ApiError> {
    let db = state.db.clone();
    let uid = claims.sub.to_string();

    let rows = tokio::task::spawn_blocking(move || db.list_checks(&uid, HISTORY_LIMIT))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.into())
        })??;

    let entries = rows.into_iter().filter_map(entry_from_row).collect();
    Ok(Json(entries))
}

fn entry_from_row(row: HistoryRow) -> Option<CheckHistoryEntry> {
    // A row with an unreadable verdict is dropped rather than invented;
    // everything else degrades field by field.
    let verdict: RiskVerdict = match row.verdict.parse() {
        Ok(verdict) => verdict,
        Err(e) => {
            warn!("Corrupt verdict on check '{}': {}", row.id, e);
            return None;
        }
    };

    Some(CheckHistoryEntry {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt check id '{}': {}", row.id, e);
            Uuid::default()
        }),
        verdict,
        confidence: row.confidence.clamp(0, 100) as u8,
        summary: row.summary,
        tactics: row.tactics.as_deref().and_then(|raw| {
            serde_json::from_str(raw)
                .map_err(|e| warn!("Corrupt tactics on check '{}': {}", row.id, e))
                .ok()
        }),
        actions: row.actions.as_deref().and_then(|raw| {
            serde_json::from_str(raw)
                .map_err(|e| warn!("Corrupt actions on check '{}': {}", row.id, e))
                .ok()
        }),
        created_at: parse_timestamp(&row.created_at),
    })
}

/// `POST /api/check-history`: persist one finished analysis. Verdict and
/// confidence are required; summary, tactics, and actions are stored as
/// given or not at all.
pub async fn save_check(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<SaveCheckResponse>, ApiError> {
    let has_verdict = body.get("verdict").is_some_and(|v| !v.is_null());
    let has_confidence = body.get("confidence").is_some_and(|v| !v.is_null());
    if !has_verdict || !has_confidence {
        return Err(ApiError::validation("Missing verdict or confidence."));
    }

    let req: SaveCheckRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::validation(format!("Invalid check payload: {}", e)))?;

    let tactics_json = req
        .tactics
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .context("serialize tactics")?;
    let actions_json = req
        .actions
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .context("serialize actions")?;

    let check_id = Uuid::new_v4();
    let db = state.db.clone();
    let uid = claims.sub.to_string();
    let id = check_id.to_string();

    let created_at = tokio::task::spawn_blocking(move || {
        db.insert_check(
            &id,
            &uid,
            req.verdict.as_str(),
            req.confidence,
            req.summary.as_deref(),
            tactics_json.as_deref(),
            actions_json.as_deref(),
        )
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(e.into())
    })??;

    Ok(Json(SaveCheckResponse {
        ok: true,
        id: check_id,
        created_at: parse_timestamp(&created_at),
    }))
}
