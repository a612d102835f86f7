use std::collections::{HashMap, HashSet};

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use scamguard_db::models::{PostRow, ProfileRow, parse_timestamp};
use scamguard_types::api::{
    Claims, PostAuthor, PostListResponse, PostResponse, SubmitPostRequest, SubmittedResponse,
};
use scamguard_types::models::{ActionKind, ScamChannel};
use serde::Deserialize;
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::claims_from_headers;
use crate::quota::{self, QuotaDecision};
use crate::state::AppState;
use crate::states;

pub const CONTENT_MIN_CHARS: usize = 20;
pub const CONTENT_MAX_CHARS: usize = 2000;
pub const LOCATION_MAX_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
pub struct PostQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    pub scam_type: Option<String>,
    pub state: Option<String>,
}

fn default_limit() -> u32 {
    20
}

/// Display identity for a post or comment author. Falls back from the
/// profile's full name to the email local part to "Anonymous"; initials
/// are the first letter of up to two words.
pub(crate) fn display_author(user_id: &str, profile: Option<&ProfileRow>) -> PostAuthor {
    let name = profile
        .and_then(|p| p.full_name.clone())
        .filter(|n| !n.trim().is_empty())
        .or_else(|| {
            profile
                .and_then(|p| p.email.as_deref())
                .and_then(|email| email.split('@').next())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Anonymous".to_string());

    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect::<String>()
        .to_uppercase()
        .chars()
        .take(2)
        .collect();

    PostAuthor {
        id: user_id.parse().unwrap_or_else(|e| {
            warn!("Corrupt user id '{}': {}", user_id, e);
            Uuid::default()
        }),
        name,
        initials,
    }
}

fn post_response(row: PostRow, authors: &HashMap<String, ProfileRow>, voted: &HashSet<String>) -> PostResponse {
    let user = display_author(&row.user_id, authors.get(&row.user_id));
    let user_voted = voted.contains(&row.id);

    PostResponse {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt post id '{}': {}", row.id, e);
            Uuid::default()
        }),
        user,
        scam_type: row.scam_type.parse().unwrap_or_else(|e| {
            warn!("Corrupt scam_type on post '{}': {}", row.id, e);
            ScamChannel::Online
        }),
        content: row.content,
        location: row.location,
        state: row.state,
        vote_count: row.vote_count,
        comment_count: row.comment_count,
        verified: row.verified,
        created_at: parse_timestamp(&row.created_at),
        user_voted,
    }
}

/// `GET /api/community/posts`: the approved feed, newest first. Anyone can
/// read it; a valid bearer token additionally marks the posts the caller
/// has voted on. Unknown filter values fall back to the unfiltered feed.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostQuery>,
    headers: HeaderMap,
) -> Result<Json<PostListResponse>, ApiError> {
    let viewer =
        claims_from_headers(&headers, &state.jwt_secret).map(|claims| claims.sub.to_string());

    let limit = query.limit.min(50);
    let offset = query.offset;
    let scam_type = query
        .scam_type
        .filter(|value| value.parse::<ScamChannel>().is_ok());
    let state_filter = query.state.filter(|value| states::is_valid_code(value));

    let db = state.db.clone();
    let (rows, total, voted, authors) = tokio::task::spawn_blocking(move || {
        let rows = db.list_posts(scam_type.as_deref(), state_filter.as_deref(), limit, offset)?;
        let total = db.count_posts(scam_type.as_deref(), state_filter.as_deref())?;

        let voted = match &viewer {
            Some(uid) => {
                let post_ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
                db.votes_by_user(uid, &post_ids)?
            }
            None => vec![],
        };

        let mut author_ids: Vec<String> = rows.iter().map(|r| r.user_id.clone()).collect();
        author_ids.sort();
        author_ids.dedup();
        let authors = db.profiles_by_ids(&author_ids)?;

        Ok::<_, anyhow::Error>((rows, total, voted, authors))
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(e.into())
    })??;

    let voted: HashSet<String> = voted.into_iter().collect();
    let authors: HashMap<String, ProfileRow> = authors
        .into_iter()
        .map(|profile| (profile.user_id.clone(), profile))
        .collect();

    let posts: Vec<PostResponse> = rows
        .into_iter()
        .map(|row| post_response(row, &authors, &voted))
        .collect();

    Ok(Json(PostListResponse {
        posts,
        total,
        has_more: total > offset as i64 + limit as i64,
    }))
}

/// `POST /api/community/posts`: submit a scam report. The post enters the
/// moderation queue as pending; the daily post quota is only spent once
/// the payload has passed validation.
pub async fn submit_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitPostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let channel: ScamChannel = req.scam_type.parse().map_err(|_| {
        ApiError::validation("Invalid scam type. Must be Phone, Text, Email, or Online")
    })?;

    if !states::is_valid_code(&req.state) {
        return Err(ApiError::validation("Please select a valid US state"));
    }

    let content = req.content.trim().to_string();
    let content_chars = content.chars().count();
    if content_chars < CONTENT_MIN_CHARS || content_chars > CONTENT_MAX_CHARS {
        return Err(ApiError::validation(
            "Content must be between 20 and 2000 characters",
        ));
    }

    if let Some(location) = &req.location {
        if location.chars().count() > LOCATION_MAX_CHARS {
            return Err(ApiError::validation(
                "Location must be 100 characters or less",
            ));
        }
    }
    let location = req
        .location
        .as_deref()
        .map(str::trim)
        .filter(|loc| !loc.is_empty())
        .map(str::to_string);

    let post_id = Uuid::new_v4();
    let db = state.db.clone();
    let limits = state.limits;
    let uid = claims.sub.to_string();
    let email = claims.email.clone();
    let state_code = req.state;
    let id = post_id.to_string();

    tokio::task::spawn_blocking(move || {
        db.ensure_profile(&uid, email.as_deref())?;

        let decision = quota::admit(&db, limits, &uid, ActionKind::Post)?;
        if let QuotaDecision::Denied { limit } = decision {
            return Err(ApiError::QuotaExceeded(quota::denial_message(
                ActionKind::Post,
                limit,
            )));
        }

        db.create_post(&id, &uid, channel, &content, &state_code, location.as_deref())?;
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
            id: post_id,
            status: "pending".to_string(),
            message: "Post submitted for review. You'll be notified when it's approved."
                .to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{claims_for, test_state};

    fn valid_request() -> SubmitPostRequest {
        SubmitPostRequest {
            scam_type: "Phone".to_string(),
            content: "Caller claimed to be the electric company and demanded gift cards."
                .to_string(),
            state: "FL".to_string(),
            location: None,
        }
    }

    #[tokio::test]
    async fn validation_runs_in_order_and_spends_nothing() {
        let (state, _dir) = test_state();
        let claims = claims_for("44444444-4444-4444-4444-444444444441");

        let mut bad_type = valid_request();
        bad_type.scam_type = "Fax".to_string();
        let err = submit_post(
            State(state.clone()),
            Extension(claims.clone()),
            Json(bad_type),
        )
        .await
        .err()
        .unwrap();
        assert!(
            matches!(&err, ApiError::Validation(msg) if msg.starts_with("Invalid scam type"))
        );

        let mut bad_state = valid_request();
        bad_state.state = "ZZ".to_string();
        let err = submit_post(
            State(state.clone()),
            Extension(claims.clone()),
            Json(bad_state),
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(&err, ApiError::Validation(msg) if msg.contains("valid US state")));

        let mut short = valid_request();
        short.content = "too short".to_string();
        let err = submit_post(State(state.clone()), Extension(claims.clone()), Json(short))
            .await
            .err()
            .unwrap();
        assert!(matches!(&err, ApiError::Validation(msg) if msg.contains("between 20 and 2000")));

        let mut long_location = valid_request();
        long_location.location = Some("x".repeat(LOCATION_MAX_CHARS + 1));
        let err = submit_post(
            State(state.clone()),
            Extension(claims.clone()),
            Json(long_location),
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(&err, ApiError::Validation(msg) if msg.contains("100 characters")));

        let window = scamguard_db::quota::window_today();
        assert_eq!(
            state
                .db
                .get_quota_used(&claims.sub.to_string(), ActionKind::Post, &window)
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn boundary_content_lengths() {
        let (state, _dir) = test_state();
        let claims = claims_for("44444444-4444-4444-4444-444444444442");

        let mut nineteen = valid_request();
        nineteen.content = "a".repeat(CONTENT_MIN_CHARS - 1);
        assert!(
            submit_post(
                State(state.clone()),
                Extension(claims.clone()),
                Json(nineteen)
            )
            .await
            .is_err()
        );

        let mut twenty = valid_request();
        twenty.content = "a".repeat(CONTENT_MIN_CHARS);
        assert!(
            submit_post(State(state.clone()), Extension(claims), Json(twenty))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn submission_lands_pending_and_feed_stays_empty() {
        let (state, _dir) = test_state();
        let claims = claims_for("44444444-4444-4444-4444-444444444443");

        submit_post(
            State(state.clone()),
            Extension(claims.clone()),
            Json(valid_request()),
        )
        .await
        .unwrap();

        let feed = list_posts(
            State(state.clone()),
            Query(PostQuery {
                limit: 20,
                offset: 0,
                scam_type: None,
                state: None,
            }),
            HeaderMap::new(),
        )
        .await
        .unwrap();
        assert_eq!(feed.total, 0);
        assert!(feed.posts.is_empty());
        assert!(!feed.has_more);
    }

    #[tokio::test]
    async fn fourth_post_of_the_day_is_refused() {
        let (state, _dir) = test_state();
        let claims = claims_for("44444444-4444-4444-4444-444444444444");

        for _ in 0..state.limits.posts {
            submit_post(
                State(state.clone()),
                Extension(claims.clone()),
                Json(valid_request()),
            )
            .await
            .unwrap();
        }

        let denied = submit_post(State(state.clone()), Extension(claims), Json(valid_request()))
            .await
            .err()
            .unwrap();
        assert!(
            matches!(&denied, ApiError::QuotaExceeded(msg) if msg.contains("daily post limit (3)"))
        );
    }

    #[test]
    fn author_display_falls_back_sensibly() {
        let full = ProfileRow {
            user_id: "u1".to_string(),
            email: Some("margaret.t@example.com".to_string()),
            full_name: Some("Margaret Thompson".to_string()),
            is_pro: false,
        };
        let author = display_author("u1", Some(&full));
        assert_eq!(author.name, "Margaret Thompson");
        assert_eq!(author.initials, "MT");

        let email_only = ProfileRow {
            user_id: "u2".to_string(),
            email: Some("robert@example.com".to_string()),
            full_name: None,
            is_pro: false,
        };
        let author = display_author("u2", Some(&email_only));
        assert_eq!(author.name, "robert");
        assert_eq!(author.initials, "R");

        let author = display_author("u3", None);
        assert_eq!(author.name, "Anonymous");
        assert_eq!(author.initials, "A");
    }
}
