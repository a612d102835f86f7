use axum::{
    Extension, Json,
    extract::{Path, State},
};
use scamguard_types::api::{Claims, VoteResponse};
use tracing::error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /api/community/posts/{id}/vote`: toggle the caller's vote. The
/// membership row and the denormalized counter move in one transaction, so
/// the returned count is what the feed will show.
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<VoteResponse>, ApiError> {
    let db = state.db.clone();
    let pid = post_id.to_string();
    let uid = claims.sub.to_string();

    let (voted, vote_count) = tokio::task::spawn_blocking(move || {
        let brief = db
            .get_post_brief(&pid)?
            .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;
        if brief.status != "approved" {
            return Err(ApiError::Forbidden(
                "Cannot vote on pending or rejected posts".to_string(),
            ));
        }

        let outcome = db.toggle_vote(&pid, &uid)?;
        Ok::<_, ApiError>(outcome)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(e.into())
    })??;

    Ok(Json(VoteResponse { voted, vote_count }))
}
