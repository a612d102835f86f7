//! Database row types, mapping directly to SQLite rows. Kept distinct from
//! the scamguard-types API models so the storage layer stays independent.

use chrono::{DateTime, Utc};

pub struct ProfileRow {
    pub user_id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub is_pro: bool,
}

pub struct PostRow {
    pub id: String,
    pub user_id: String,
    pub scam_type: String,
    pub content: String,
    pub state: String,
    pub location: Option<String>,
    pub vote_count: i64,
    pub comment_count: i64,
    pub verified: bool,
    pub created_at: String,
}

pub struct CommentRow {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
}

/// Minimal view of a post used for existence/status checks before
/// commenting or voting.
pub struct PostBriefRow {
    pub id: String,
    pub status: String,
    pub vote_count: i64,
}

pub struct PendingPostRow {
    pub id: String,
    pub user_id: String,
    pub scam_type: String,
    pub content: String,
}

pub struct PendingCommentRow {
    pub id: String,
    pub post_id: String,
    pub content: String,
}

pub struct HistoryRow {
    pub id: String,
    pub verdict: String,
    pub confidence: i64,
    pub summary: Option<String>,
    pub tactics: Option<String>,
    pub actions: Option<String>,
    pub created_at: String,
}

/// SQLite stores `datetime('now')` as "YYYY-MM-DD HH:MM:SS" without a
/// timezone marker; rows written by tests may carry RFC 3339 instead.
/// Accept both, falling back to the Unix epoch on garbage.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|_| {
            tracing::warn!("Corrupt timestamp '{}' in database row", raw);
            DateTime::<Utc>::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sqlite_and_rfc3339_timestamps() {
        let sqlite_form = parse_timestamp("2026-08-23 14:00:00");
        assert_eq!(sqlite_form.to_rfc3339(), "2026-08-23T14:00:00+00:00");

        let rfc_form = parse_timestamp("2026-08-23T14:00:00Z");
        assert_eq!(sqlite_form, rfc_form);
    }

    #[test]
    fn garbage_timestamp_falls_back_to_epoch() {
        assert_eq!(parse_timestamp("not a date"), DateTime::<Utc>::default());
    }
}
