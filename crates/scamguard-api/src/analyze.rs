use axum::{Extension, Json, extract::State};
use scamguard_types::api::{AnalyzeRequest, Claims};
use scamguard_types::models::{ActionKind, ScamAnalysis};
use tracing::error;

use crate::error::ApiError;
use crate::quota::{self, QuotaDecision};
use crate::state::AppState;

pub const MAX_TEXT_CHARS: usize = 5000;

/// `POST /api/analyze`: risk-analyze one suspicious message.
///
/// Validation runs before anything is spent, and the quota check runs
/// before the classifier is reached: a rejected or over-limit request
/// costs neither a quota slot nor an upstream call.
pub async fn analyze_text(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<ScamAnalysis>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::validation("No text provided"));
    }
    if req.text.chars().count() > MAX_TEXT_CHARS {
        return Err(ApiError::validation(
            "Text too long. Maximum 5000 characters.",
        ));
    }

    let db = state.db.clone();
    let limits = state.limits;
    let uid = claims.sub.to_string();
    let decision =
        tokio::task::spawn_blocking(move || quota::admit(&db, limits, &uid, ActionKind::Check))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                ApiError::Internal(e.into())
            })??;

    if let QuotaDecision::Denied { limit } = decision {
        return Err(ApiError::QuotaExceeded(quota::denial_message(
            ActionKind::Check,
            limit,
        )));
    }

    let analysis = state.classifier.analyze_message(&req.text).await?;
    Ok(Json(analysis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{claims_for, test_state_with_classifier};
    use scamguard_types::models::RiskVerdict;

    #[tokio::test]
    async fn rejects_blank_and_oversized_text_before_quota() {
        let (state, classifier, _dir) = test_state_with_classifier();
        let claims = claims_for("11111111-1111-1111-1111-111111111111");

        for text in ["".to_string(), "   \n\t".to_string()] {
            let blank = analyze_text(
                State(state.clone()),
                Extension(claims.clone()),
                Json(AnalyzeRequest { text }),
            )
            .await;
            assert!(matches!(blank, Err(ApiError::Validation(msg)) if msg == "No text provided"));
        }

        let oversized = analyze_text(
            State(state.clone()),
            Extension(claims.clone()),
            Json(AnalyzeRequest {
                text: "x".repeat(MAX_TEXT_CHARS + 1),
            }),
        )
        .await;
        assert!(matches!(oversized, Err(ApiError::Validation(_))));

        // None of the requests touched the ledger or the classifier.
        let window = scamguard_db::quota::window_today();
        assert_eq!(
            state
                .db
                .get_quota_used(&claims.sub.to_string(), ActionKind::Check, &window)
                .unwrap(),
            0
        );
        assert_eq!(classifier.call_count(), 0);
    }

    #[tokio::test]
    async fn analysis_spends_quota_then_denies() {
        let (state, classifier, _dir) = test_state_with_classifier();
        let claims = claims_for("11111111-1111-1111-1111-111111111112");

        for _ in 0..state.limits.checks {
            let analysis = analyze_text(
                State(state.clone()),
                Extension(claims.clone()),
                Json(AnalyzeRequest {
                    text: "Your account is suspended, click here".to_string(),
                }),
            )
            .await
            .unwrap();
            assert_eq!(analysis.verdict, RiskVerdict::HighRisk);
        }

        let denied = analyze_text(
            State(state.clone()),
            Extension(claims),
            Json(AnalyzeRequest {
                text: "one more".to_string(),
            }),
        )
        .await;
        assert!(matches!(denied, Err(ApiError::QuotaExceeded(_))));

        // The denied request added no classifier call.
        assert_eq!(classifier.call_count(), state.limits.checks as usize);
    }

    #[tokio::test]
    async fn exhausted_quota_never_reaches_the_classifier() {
        let (state, classifier, _dir) = test_state_with_classifier();
        let claims = claims_for("11111111-1111-1111-1111-111111111113");
        let uid = claims.sub.to_string();

        // Spend the whole day's allowance straight in the ledger.
        let window = scamguard_db::quota::window_today();
        for _ in 0..state.limits.checks {
            assert!(
                state
                    .db
                    .consume_quota(&uid, ActionKind::Check, &window, state.limits.checks)
                    .unwrap()
                    .is_some()
            );
        }

        let denied = analyze_text(
            State(state.clone()),
            Extension(claims),
            Json(AnalyzeRequest {
                text: "Is this shipping notice real?".to_string(),
            }),
        )
        .await;
        assert!(matches!(denied, Err(ApiError::QuotaExceeded(_))));
        assert_eq!(classifier.call_count(), 0);
    }
}
