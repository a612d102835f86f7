//! Status transitions driven by the moderation sweep. Every mutation here
//! is conditional on `status = 'pending'` so a submission moves out of the
//! queue exactly once, no matter how many sweeps race over it.

use crate::Database;
use crate::models::{PendingCommentRow, PendingPostRow};
use anyhow::Result;
use rusqlite::Connection;
use scamguard_types::models::ModerationStatus;

impl Database {
    // -- Review queue --

    /// Oldest pending posts, up to `limit`.
    pub fn pending_posts(&self, limit: u32) -> Result<Vec<PendingPostRow>> {
        self.with_conn(|conn| query_pending_posts(conn, limit))
    }

    /// Oldest pending comments, up to `limit`.
    pub fn pending_comments(&self, limit: u32) -> Result<Vec<PendingCommentRow>> {
        self.with_conn(|conn| query_pending_comments(conn, limit))
    }

    // -- Verdict application --

    /// Move a pending post to its reviewed status. Returns false if the
    /// post was no longer pending (already handled elsewhere), in which
    /// case nothing is written.
    pub fn finalize_post(
        &self,
        id: &str,
        status: ModerationStatus,
        score: u8,
        reason: &str,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE community_posts
                 SET status = ?2, moderation_score = ?3, moderation_reason = ?4,
                     moderated_at = datetime('now')
                 WHERE id = ?1 AND status = 'pending'",
                rusqlite::params![id, status.as_str(), score, reason],
            )?;
            Ok(changed == 1)
        })
    }

    /// Move a pending comment to its reviewed status. An approval also
    /// bumps the parent post's comment counter, in the same transaction.
    pub fn finalize_comment(
        &self,
        id: &str,
        status: ModerationStatus,
        score: u8,
        reason: &str,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;

            let changed = tx.execute(
                "UPDATE post_comments
                 SET status = ?2, moderation_score = ?3, moderation_reason = ?4,
                     moderated_at = datetime('now')
                 WHERE id = ?1 AND status = 'pending'",
                rusqlite::params![id, status.as_str(), score, reason],
            )?;

            if changed == 1 && status == ModerationStatus::Approved {
                tx.execute(
                    "UPDATE community_posts SET comment_count = comment_count + 1
                     WHERE id = (SELECT post_id FROM post_comments WHERE id = ?1)",
                    [id],
                )?;
            }

            tx.commit()?;
            Ok(changed == 1)
        })
    }

    // -- Failure accounting --

    /// Count a failed review attempt against a pending post. Once attempts
    /// reach `max_attempts` the post is parked as flagged and leaves the
    /// queue for good. Returns true if this call flagged it.
    pub fn record_post_failure(&self, id: &str, max_attempts: u32, reason: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            record_failure(conn, "community_posts", id, max_attempts, reason)
        })
    }

    /// Comment counterpart of [`Database::record_post_failure`].
    pub fn record_comment_failure(&self, id: &str, max_attempts: u32, reason: &str) -> Result<bool> {
        self.with_conn_mut(|conn| record_failure(conn, "post_comments", id, max_attempts, reason))
    }
}

fn record_failure(
    conn: &Connection,
    table: &str,
    id: &str,
    max_attempts: u32,
    reason: &str,
) -> Result<bool> {
    let tx = conn.unchecked_transaction()?;

    let counted = tx.execute(
        &format!(
            "UPDATE {table} SET review_attempts = review_attempts + 1
             WHERE id = ?1 AND status = 'pending'"
        ),
        [id],
    )?;
    if counted == 0 {
        return Ok(false);
    }

    let flagged = tx.execute(
        &format!(
            "UPDATE {table}
             SET status = ?2, moderation_reason = ?3, moderated_at = datetime('now')
             WHERE id = ?1 AND status = 'pending' AND review_attempts >= ?4"
        ),
        rusqlite::params![id, ModerationStatus::Flagged.as_str(), reason, max_attempts],
    )?;

    tx.commit()?;
    Ok(flagged == 1)
}

fn query_pending_posts(conn: &Connection, limit: u32) -> Result<Vec<PendingPostRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, scam_type, content FROM community_posts
         WHERE status = 'pending'
         ORDER BY created_at ASC, id ASC
         LIMIT ?1",
    )?;

    let rows = stmt
        .query_map([limit], |row| {
            Ok(PendingPostRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                scam_type: row.get(2)?,
                content: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_pending_comments(conn: &Connection, limit: u32) -> Result<Vec<PendingCommentRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, post_id, content FROM post_comments
         WHERE status = 'pending'
         ORDER BY created_at ASC, id ASC
         LIMIT ?1",
    )?;

    let rows = stmt
        .query_map([limit], |row| {
            Ok(PendingCommentRow {
                id: row.get(0)?,
                post_id: row.get(1)?,
                content: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
