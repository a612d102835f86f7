use axum::{
    Json,
    extract::{Query, State},
};
use scamguard_types::api::{TrendingResponse, TrendingSummary};
use scamguard_types::models::ScamChannel;
use serde::Deserialize;
use tracing::{error, warn};

use crate::error::ApiError;
use crate::state::AppState;
use crate::states;

/// Posts this recent count toward the trending banner.
const TRENDING_WINDOW_HOURS: u32 = 48;

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub state: Option<String>,
}

/// `GET /api/community/trending?state=XX`: the most-reported channel among
/// approved posts from the caller's state in the last 48 hours, falling
/// back to a nationwide tally when the state has no recent reports.
pub async fn get_trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<TrendingResponse>, ApiError> {
    let code = query
        .state
        .filter(|value| states::is_valid_code(value))
        .ok_or_else(|| ApiError::validation("Valid state parameter required"))?;

    let db = state.db.clone();
    let trending = tokio::task::spawn_blocking(move || {
        if let Some((channel, count)) = db.trending_channel(Some(&code), TRENDING_WINDOW_HOURS)? {
            return Ok::<_, anyhow::Error>(Some(summary(channel, count, Some(code))));
        }

        if let Some((channel, count)) = db.trending_channel(None, TRENDING_WINDOW_HOURS)? {
            return Ok(Some(summary(channel, count, None)));
        }

        Ok(None)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(e.into())
    })??;

    Ok(Json(TrendingResponse { trending }))
}

fn summary(channel: String, count: i64, state: Option<String>) -> TrendingSummary {
    let scam_type = channel.parse().unwrap_or_else(|e| {
        warn!("Corrupt scam_type in trending tally: {}", e);
        ScamChannel::Online
    });

    let state_name = match &state {
        Some(code) => states::state_name(code)
            .map(str::to_string)
            .unwrap_or_else(|| code.clone()),
        None => "Nationwide".to_string(),
    };

    TrendingSummary {
        scam_type,
        count,
        is_fallback: state.is_none(),
        state,
        state_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{approve_post, seed_post_in_state, test_state};

    #[tokio::test]
    async fn missing_or_bogus_state_is_rejected() {
        let (state, _dir) = test_state();

        let err = get_trending(State(state.clone()), Query(TrendingQuery { state: None }))
            .await
            .err()
            .unwrap();
        assert!(matches!(&err, ApiError::Validation(msg) if msg.contains("state parameter")));

        let err = get_trending(
            State(state),
            Query(TrendingQuery {
                state: Some("Florida".to_string()),
            }),
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn state_tally_beats_nationwide_fallback() {
        let (state, _dir) = test_state();

        for _ in 0..2 {
            let id = seed_post_in_state(&state, "phone scam reported in florida today", "FL");
            approve_post(&state, id);
        }
        let id = seed_post_in_state(&state, "phone scam reported from georgia", "GA");
        approve_post(&state, id);

        let body = get_trending(
            State(state.clone()),
            Query(TrendingQuery {
                state: Some("FL".to_string()),
            }),
        )
        .await
        .unwrap();
        let trending = body.0.trending.unwrap();
        assert_eq!(trending.count, 2);
        assert_eq!(trending.state.as_deref(), Some("FL"));
        assert_eq!(trending.state_name, "Florida");
        assert!(!trending.is_fallback);

        // A state with no reports inherits the nationwide tally.
        let body = get_trending(
            State(state.clone()),
            Query(TrendingQuery {
                state: Some("WY".to_string()),
            }),
        )
        .await
        .unwrap();
        let trending = body.0.trending.unwrap();
        assert_eq!(trending.count, 3);
        assert!(trending.state.is_none());
        assert_eq!(trending.state_name, "Nationwide");
        assert!(trending.is_fallback);
    }

    #[tokio::test]
    async fn empty_feed_yields_null_trending() {
        let (state, _dir) = test_state();

        let body = get_trending(
            State(state),
            Query(TrendingQuery {
                state: Some("FL".to_string()),
            }),
        )
        .await
        .unwrap();
        assert!(body.0.trending.is_none());
    }
}
