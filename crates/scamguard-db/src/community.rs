use crate::Database;
use crate::models::{CommentRow, PostBriefRow, PostRow};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use scamguard_types::models::ScamChannel;

impl Database {
    // -- Posts --

    /// Insert a new report. It enters the review queue as `pending` and is
    /// invisible to list queries until the sweep approves it.
    pub fn create_post(
        &self,
        id: &str,
        user_id: &str,
        scam_type: ScamChannel,
        content: &str,
        state: &str,
        location: Option<&str>,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO community_posts (id, user_id, scam_type, content, state, location)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![id, user_id, scam_type.as_str(), content, state, location],
            )?;
            Ok(())
        })
    }

    /// Approved posts, newest first, optionally filtered by channel and
    /// state.
    pub fn list_posts(
        &self,
        scam_type: Option<&str>,
        state: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| query_posts(conn, scam_type, state, limit, offset))
    }

    pub fn count_posts(&self, scam_type: Option<&str>, state: Option<&str>) -> Result<i64> {
        self.with_conn(|conn| {
            let (filters, params) = post_filters(&scam_type, &state);
            let sql = format!(
                "SELECT COUNT(*) FROM community_posts WHERE status = 'approved'{}",
                filters
            );
            let total = conn.query_row(&sql, params.as_slice(), |row| row.get(0))?;
            Ok(total)
        })
    }

    /// Status and vote count only, for existence checks before commenting
    /// or voting.
    pub fn get_post_brief(&self, id: &str) -> Result<Option<PostBriefRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, status, vote_count FROM community_posts WHERE id = ?1",
                    [id],
                    |row| {
                        Ok(PostBriefRow {
                            id: row.get(0)?,
                            status: row.get(1)?,
                            vote_count: row.get(2)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Comments --

    pub fn create_comment(
        &self,
        id: &str,
        post_id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO post_comments (id, post_id, user_id, content) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, post_id, user_id, content],
            )?;
            Ok(())
        })
    }

    /// Approved comments under a post, oldest first.
    pub fn list_comments(&self, post_id: &str, limit: u32, offset: u32) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| query_comments(conn, post_id, limit, offset))
    }

    pub fn count_comments(&self, post_id: &str) -> Result<i64> {
        self.with_conn(|conn| {
            let total = conn.query_row(
                "SELECT COUNT(*) FROM post_comments WHERE post_id = ?1 AND status = 'approved'",
                [post_id],
                |row| row.get(0),
            )?;
            Ok(total)
        })
    }

    // -- Votes --

    /// Toggle the caller's vote on a post and adjust the denormalized
    /// counter. Returns (now_voted, vote_count_after).
    pub fn toggle_vote(&self, post_id: &str, user_id: &str) -> Result<(bool, i64)> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;

            let removed = tx.execute(
                "DELETE FROM post_votes WHERE post_id = ?1 AND user_id = ?2",
                rusqlite::params![post_id, user_id],
            )?;

            let voted = if removed == 0 {
                tx.execute(
                    "INSERT INTO post_votes (post_id, user_id) VALUES (?1, ?2)",
                    rusqlite::params![post_id, user_id],
                )?;
                tx.execute(
                    "UPDATE community_posts SET vote_count = vote_count + 1 WHERE id = ?1",
                    [post_id],
                )?;
                true
            } else {
                // MAX guards against a counter that drifted below reality.
                tx.execute(
                    "UPDATE community_posts SET vote_count = MAX(vote_count - 1, 0) WHERE id = ?1",
                    [post_id],
                )?;
                false
            };

            let count: i64 = tx.query_row(
                "SELECT vote_count FROM community_posts WHERE id = ?1",
                [post_id],
                |row| row.get(0),
            )?;

            tx.commit()?;
            Ok((voted, count))
        })
    }

    /// Which of `post_ids` the user has voted on, for list rendering.
    pub fn votes_by_user(&self, user_id: &str, post_ids: &[String]) -> Result<Vec<String>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let placeholders: Vec<String> =
                (0..post_ids.len()).map(|i| format!("?{}", i + 2)).collect();
            let sql = format!(
                "SELECT post_id FROM post_votes WHERE user_id = ?1 AND post_id IN ({})",
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql)?;
            let mut params: Vec<&dyn rusqlite::types::ToSql> = vec![&user_id];
            for id in post_ids {
                params.push(id);
            }

            let rows = stmt
                .query_map(params.as_slice(), |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;

            Ok(rows)
        })
    }

    // -- Trending --

    /// Most reported channel among approved posts of the last `hours`,
    /// optionally narrowed to one state. Ties break alphabetically so the
    /// answer is stable.
    pub fn trending_channel(&self, state: Option<&str>, hours: u32) -> Result<Option<(String, i64)>> {
        self.with_conn(|conn| {
            let cutoff = format!("-{} hours", hours);
            let row = conn
                .query_row(
                    "SELECT scam_type, COUNT(*) AS n FROM community_posts
                     WHERE status = 'approved'
                       AND created_at >= datetime('now', ?2)
                       AND (?1 IS NULL OR state = ?1)
                     GROUP BY scam_type
                     ORDER BY n DESC, scam_type ASC
                     LIMIT 1",
                    rusqlite::params![state, cutoff],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            Ok(row)
        })
    }
}

fn post_filters<'a>(
    scam_type: &'a Option<&'a str>,
    state: &'a Option<&'a str>,
) -> (String, Vec<&'a dyn rusqlite::types::ToSql>) {
    let mut filters = String::new();
    let mut params: Vec<&dyn rusqlite::types::ToSql> = Vec::new();

    if let Some(st) = scam_type {
        params.push(st);
        filters.push_str(&format!(" AND scam_type = ?{}", params.len()));
    }
    if let Some(s) = state {
        params.push(s);
        filters.push_str(&format!(" AND state = ?{}", params.len()));
    }

    (filters, params)
}

fn query_posts(
    conn: &Connection,
    scam_type: Option<&str>,
    state: Option<&str>,
    limit: u32,
    offset: u32,
) -> Result<Vec<PostRow>> {
    let (filters, mut params) = post_filters(&scam_type, &state);
    params.push(&limit);
    let limit_idx = params.len();
    params.push(&offset);
    let offset_idx = params.len();

    let sql = format!(
        "SELECT id, user_id, scam_type, content, state, location,
                vote_count, comment_count, verified, created_at
         FROM community_posts
         WHERE status = 'approved'{filters}
         ORDER BY created_at DESC, id DESC
         LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params.as_slice(), |row| {
            Ok(PostRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                scam_type: row.get(2)?,
                content: row.get(3)?,
                state: row.get(4)?,
                location: row.get(5)?,
                vote_count: row.get(6)?,
                comment_count: row.get(7)?,
                verified: row.get(8)?,
                created_at: row.get(9)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_comments(
    conn: &Connection,
    post_id: &str,
    limit: u32,
    offset: u32,
) -> Result<Vec<CommentRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, post_id, user_id, content, created_at FROM post_comments
         WHERE post_id = ?1 AND status = 'approved'
         ORDER BY created_at ASC, id ASC
         LIMIT ?2 OFFSET ?3",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![post_id, limit, offset], |row| {
            Ok(CommentRow {
                id: row.get(0)?,
                post_id: row.get(1)?,
                user_id: row.get(2)?,
                content: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::open_temp;
    use scamguard_types::models::ModerationStatus;

    fn approved_post(db: &Database, id: &str, channel: ScamChannel, state: &str) {
        db.create_post(id, "user-1", channel, "They asked for gift cards over the phone", state, None)
            .unwrap();
        db.finalize_post(id, ModerationStatus::Approved, 80, "ok").unwrap();
    }

    #[test]
    fn lists_only_approved_posts() {
        let (db, _dir) = open_temp();
        approved_post(&db, "post-1", ScamChannel::Phone, "CA");
        db.create_post("post-2", "user-1", ScamChannel::Text, "Smishing link", "CA", None)
            .unwrap();

        let posts = db.list_posts(None, None, 10, 0).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "post-1");
        assert_eq!(db.count_posts(None, None).unwrap(), 1);
    }

    #[test]
    fn filters_compose_and_paging_offsets() {
        let (db, _dir) = open_temp();
        approved_post(&db, "post-1", ScamChannel::Phone, "CA");
        approved_post(&db, "post-2", ScamChannel::Phone, "NY");
        approved_post(&db, "post-3", ScamChannel::Email, "CA");

        assert_eq!(db.count_posts(Some("Phone"), None).unwrap(), 2);
        assert_eq!(db.count_posts(Some("Phone"), Some("CA")).unwrap(), 1);
        assert_eq!(db.count_posts(None, Some("CA")).unwrap(), 2);

        let page = db.list_posts(None, None, 2, 0).unwrap();
        assert_eq!(page.len(), 2);
        let rest = db.list_posts(None, None, 2, 2).unwrap();
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn vote_toggles_and_counter_follows() {
        let (db, _dir) = open_temp();
        approved_post(&db, "post-1", ScamChannel::Online, "TX");

        assert_eq!(db.toggle_vote("post-1", "user-2").unwrap(), (true, 1));
        assert_eq!(db.toggle_vote("post-1", "user-3").unwrap(), (true, 2));
        assert_eq!(db.toggle_vote("post-1", "user-2").unwrap(), (false, 1));

        let voted = db
            .votes_by_user("user-3", &["post-1".to_string(), "post-9".to_string()])
            .unwrap();
        assert_eq!(voted, vec!["post-1".to_string()]);
        assert!(db.votes_by_user("user-3", &[]).unwrap().is_empty());
    }

    #[test]
    fn vote_counter_never_goes_negative() {
        let (db, _dir) = open_temp();
        approved_post(&db, "post-1", ScamChannel::Online, "TX");

        // Drift the counter below reality, then remove a vote.
        db.toggle_vote("post-1", "user-2").unwrap();
        db.with_conn_mut(|conn| {
            conn.execute("UPDATE community_posts SET vote_count = 0 WHERE id = 'post-1'", [])?;
            Ok(())
        })
        .unwrap();

        assert_eq!(db.toggle_vote("post-1", "user-2").unwrap(), (false, 0));
    }

    #[test]
    fn trending_picks_most_reported_channel() {
        let (db, _dir) = open_temp();
        approved_post(&db, "post-1", ScamChannel::Phone, "CA");
        approved_post(&db, "post-2", ScamChannel::Phone, "NY");
        approved_post(&db, "post-3", ScamChannel::Email, "CA");

        assert_eq!(
            db.trending_channel(None, 48).unwrap(),
            Some(("Phone".to_string(), 2))
        );
        assert_eq!(
            db.trending_channel(Some("CA"), 48).unwrap(),
            Some(("Email".to_string(), 1))
        );
        assert_eq!(db.trending_channel(Some("WY"), 48).unwrap(), None);
    }

    #[test]
    fn trending_ties_break_alphabetically() {
        let (db, _dir) = open_temp();
        approved_post(&db, "post-1", ScamChannel::Text, "CA");
        approved_post(&db, "post-2", ScamChannel::Email, "CA");

        assert_eq!(
            db.trending_channel(None, 48).unwrap(),
            Some(("Email".to_string(), 1))
        );
    }

    #[test]
    fn comments_list_approved_oldest_first() {
        let (db, _dir) = open_temp();
        approved_post(&db, "post-1", ScamChannel::Phone, "CA");
        db.create_comment("comment-1", "post-1", "user-2", "Got the same call").unwrap();
        db.create_comment("comment-2", "post-1", "user-3", "Report it to the FTC").unwrap();
        db.finalize_comment("comment-1", ModerationStatus::Approved, 90, "ok").unwrap();
        db.finalize_comment("comment-2", ModerationStatus::Approved, 90, "ok").unwrap();
        db.create_comment("comment-3", "post-1", "user-4", "spam spam spam").unwrap();

        let comments = db.list_comments("post-1", 10, 0).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id, "comment-1");
        assert_eq!(db.count_comments("post-1").unwrap(), 2);
    }
}
