use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{RiskVerdict, ScamChannel, TacticFinding};

// -- JWT claims --

/// Bearer-token claims issued by the identity provider. Shared between the
/// auth middleware and the handlers that only need an optional identity;
/// canonical definition lives here to eliminate duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
}

// -- Scam check --

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

// The analyze response body is `ScamAnalysis` itself, returned unchanged.

// -- Usage --

/// Current-day consumption per rate-limited action. A `None` limit means
/// unlimited (pro tier).
#[derive(Debug, Serialize, Deserialize)]
pub struct UsageResponse {
    pub checks_used: u32,
    pub checks_limit: Option<u32>,
    pub scenarios_used: u32,
    pub scenarios_limit: Option<u32>,
    pub is_pro: bool,
}

// -- Simulator --

#[derive(Debug, Serialize)]
pub struct SimulatorUseResponse {
    pub allowed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedFlag {
    pub text: String,
    pub label: String,
}

/// One canned practice scenario for the scam simulator.
#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub icon: String,
    pub difficulty: String,
    pub from: String,
    pub message: String,
    pub red_flags: Vec<RedFlag>,
    pub is_scam: bool,
    pub explanation: String,
    pub tip: String,
}

#[derive(Debug, Serialize)]
pub struct ScenariosResponse {
    pub scenarios: Vec<Scenario>,
    pub sample_scam_text: String,
}

// -- Community --

#[derive(Debug, Deserialize)]
pub struct SubmitPostRequest {
    pub scam_type: String,
    pub content: String,
    pub state: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostAuthor {
    pub id: Uuid,
    pub name: String,
    pub initials: String,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub user: PostAuthor,
    pub scam_type: ScamChannel,
    pub content: String,
    pub location: Option<String>,
    pub state: String,
    pub vote_count: i64,
    pub comment_count: i64,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub user_voted: bool,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub total: i64,
    pub has_more: bool,
}

/// Returned on submission of a post or comment: the item enters the
/// moderation queue rather than appearing immediately.
#[derive(Debug, Serialize)]
pub struct SubmittedResponse {
    pub id: Uuid,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub user: PostAuthor,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<CommentResponse>,
    pub total: i64,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub voted: bool,
    pub vote_count: i64,
}

#[derive(Debug, Serialize)]
pub struct TrendingSummary {
    pub scam_type: ScamChannel,
    pub count: i64,
    /// `None` when the nationwide fallback kicked in.
    pub state: Option<String>,
    pub state_name: String,
    pub is_fallback: bool,
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub trending: Option<TrendingSummary>,
}

// -- Check history --

#[derive(Debug, Deserialize)]
pub struct SaveCheckRequest {
    pub verdict: RiskVerdict,
    pub confidence: u8,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tactics: Option<Vec<TacticFinding>>,
    #[serde(default)]
    pub actions: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct SaveCheckResponse {
    pub ok: bool,
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CheckHistoryEntry {
    pub id: Uuid,
    pub verdict: RiskVerdict,
    pub confidence: u8,
    pub summary: Option<String>,
    pub tactics: Option<Vec<TacticFinding>>,
    pub actions: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

// -- Lead capture --

#[derive(Debug, Deserialize)]
pub struct LeadRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub ok: bool,
    pub message: String,
}

// -- Moderation sweep --

/// Outcome of one sweep invocation. Counts cover items this invocation
/// finalized; items another concurrent sweep already finalized are skipped
/// and appear nowhere.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SweepReport {
    pub ok: bool,
    pub timestamp: Option<DateTime<Utc>>,
    pub posts_processed: u32,
    pub posts_approved: u32,
    pub posts_rejected: u32,
    pub posts_flagged: u32,
    pub comments_processed: u32,
    pub comments_approved: u32,
    pub comments_rejected: u32,
    pub comments_flagged: u32,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_response_null_limit_means_unlimited() {
        let body = serde_json::to_value(UsageResponse {
            checks_used: 2,
            checks_limit: None,
            scenarios_used: 0,
            scenarios_limit: None,
            is_pro: true,
        })
        .unwrap();
        assert!(body["checks_limit"].is_null());
        assert!(body["is_pro"].as_bool().unwrap());
    }

    #[test]
    fn claims_tolerate_missing_email() {
        let claims: Claims = serde_json::from_str(
            r#"{"sub": "00000000-0000-0000-0000-000000000001", "exp": 4102444800}"#,
        )
        .unwrap();
        assert!(claims.email.is_none());
    }

    #[test]
    fn sweep_report_counts_serialize_flat() {
        let mut report = SweepReport::default();
        report.ok = true;
        report.posts_processed = 3;
        report.posts_approved = 2;
        report.posts_rejected = 1;
        let body = serde_json::to_value(&report).unwrap();
        assert_eq!(body["posts_processed"], 3);
        assert_eq!(body["errors"].as_array().unwrap().len(), 0);
    }
}
