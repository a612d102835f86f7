use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            -- Premium flag and display identity, written by the billing and
            -- identity collaborators. A missing row means free tier.
            CREATE TABLE profiles (
                user_id     TEXT PRIMARY KEY,
                email       TEXT,
                full_name   TEXT,
                is_pro      INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            -- Quota ledger. window_start is the UTC calendar date the count
            -- applies to; rows reset lazily on first access of a new day.
            CREATE TABLE usage_counters (
                user_id      TEXT NOT NULL,
                action_kind  TEXT NOT NULL,
                count_used   INTEGER NOT NULL DEFAULT 0,
                window_start TEXT NOT NULL,
                PRIMARY KEY (user_id, action_kind)
            );

            CREATE TABLE community_posts (
                id                TEXT PRIMARY KEY,
                user_id           TEXT NOT NULL,
                scam_type         TEXT NOT NULL,
                content           TEXT NOT NULL,
                state             TEXT NOT NULL,
                location          TEXT,
                status            TEXT NOT NULL DEFAULT 'pending',
                moderation_score  INTEGER,
                moderation_reason TEXT,
                review_attempts   INTEGER NOT NULL DEFAULT 0,
                moderated_at      TEXT,
                vote_count        INTEGER NOT NULL DEFAULT 0,
                comment_count     INTEGER NOT NULL DEFAULT 0,
                verified          INTEGER NOT NULL DEFAULT 0,
                created_at        TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_posts_status_created
                ON community_posts(status, created_at);
            CREATE INDEX idx_posts_state
                ON community_posts(state, status, created_at);

            CREATE TABLE post_comments (
                id                TEXT PRIMARY KEY,
                post_id           TEXT NOT NULL REFERENCES community_posts(id) ON DELETE CASCADE,
                user_id           TEXT NOT NULL,
                content           TEXT NOT NULL,
                status            TEXT NOT NULL DEFAULT 'pending',
                moderation_score  INTEGER,
                moderation_reason TEXT,
                review_attempts   INTEGER NOT NULL DEFAULT 0,
                moderated_at      TEXT,
                created_at        TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_comments_post
                ON post_comments(post_id, status, created_at);
            CREATE INDEX idx_comments_status
                ON post_comments(status, created_at);

            CREATE TABLE post_votes (
                post_id    TEXT NOT NULL REFERENCES community_posts(id) ON DELETE CASCADE,
                user_id    TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (post_id, user_id)
            );

            CREATE TABLE check_history (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL,
                verdict     TEXT NOT NULL,
                confidence  INTEGER NOT NULL DEFAULT 0,
                summary     TEXT,
                tactics     TEXT,
                actions     TEXT,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_history_user
                ON check_history(user_id, created_at);

            CREATE TABLE lead_emails (
                email      TEXT PRIMARY KEY,
                source     TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    Ok(())
}
