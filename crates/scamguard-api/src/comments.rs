use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use scamguard_db::models::{ProfileRow, parse_timestamp};
use scamguard_types::api::{
    Claims, CommentListResponse, CommentResponse, SubmitCommentRequest, SubmittedResponse,
};
use serde::Deserialize;
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::posts::display_author;
use crate::state::AppState;

pub const COMMENT_MAX_CHARS: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct CommentQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    50
}

/// `GET /api/community/posts/{id}/comments`: approved comments under a
/// post, oldest first.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Query(query): Query<CommentQuery>,
) -> Result<Json<CommentListResponse>, ApiError> {
    let limit = query.limit.min(100);
    let offset = query.offset;

    let db = state.db.clone();
    let pid = post_id.to_string();
    let (rows, total, authors) = tokio::task::spawn_blocking(move || {
        db.get_post_brief(&pid)?
            .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

        let rows = db.list_comments(&pid, limit, offset)?;
        let total = db.count_comments(&pid)?;

        let mut author_ids: Vec<String> = rows.iter().map(|r| r.user_id.clone()).collect();
        author_ids.sort();
        author_ids.dedup();
        let authors = db.profiles_by_ids(&author_ids)?;

        Ok::<_, ApiError>((rows, total, authors))
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(e.into())
    })??;

    let authors: HashMap<String, ProfileRow> = authors
        .into_iter()
        .map(|profile| (profile.user_id.clone(), profile))
        .collect();

    let comments: Vec<CommentResponse> = rows
        .into_iter()
        .map(|row| {
            let user = display_author(&row.user_id, authors.get(&row.user_id));
            CommentResponse {
                id: row.id.parse().unwrap_or_else(|e| {
                    warn!("Corrupt comment id '{}': {}", row.id, e);
                    Uuid::default()
                }),
                user,
                content: row.content,
                created_at: parse_timestamp(&row.created_at),
            }
        })
        .collect();

    Ok(Json(CommentListResponse {
        comments,
        total,
        has_more: total > offset as i64 + limit as i64,
    }))
}

/// `POST /api/community/posts/{id}/comments`: comment on an approved post.
/// The comment enters the moderation queue; the parent's comment counter
/// only moves once the sweep approves it.
pub async fn submit_comment(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment_id = Uuid::new_v4();
    let db = state.db.clone();
    let pid = post_id.to_string();
    let cid = comment_id.to_string();
    let uid = claims.sub.to_string();
    let email = claims.email.clone();
    let content = req.content.trim().to_string();

    tokio::task::spawn_blocking(move || {
        let brief = db
            .get_post_brief(&pid)?
            .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;
        if brief.status != "approved" {
            return Err(ApiError::Forbidden(
                "Cannot comment on pending or rejected posts".to_string(),
            ));
        }

        if content.is_empty() || content.chars().count() > COMMENT_MAX_CHARS {
            return Err(ApiError::validation(
                "Comment must be between 1 and 1000 characters",
            ));
        }

        db.ensure_profile(&uid, email.as_deref())?;
        db.create_comment(&cid, &pid, &uid, &content)?;
        Ok::<_, ApiError>(())
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(e.into())
    })??;

    Ok((
        StatusCode::CREATED,
        Json(SubmittedResponse {
            id: comment_id,
            status: "pending".to_string(),
            message: "Comment submitted for review.".to_string(),
        }),
    ))
}
