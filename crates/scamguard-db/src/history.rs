use crate::Database;
use crate::models::HistoryRow;
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Check history --

    /// Persist a completed analysis for the user's history page, returning
    /// the stored creation timestamp. Tactics and actions arrive
    /// pre-serialized as JSON text; the storage layer does not interpret
    /// them.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_check(
        &self,
        id: &str,
        user_id: &str,
        verdict: &str,
        confidence: u8,
        summary: Option<&str>,
        tactics_json: Option<&str>,
        actions_json: Option<&str>,
    ) -> Result<String> {
        self.with_conn_mut(|conn| {
            let created_at = conn.query_row(
                "INSERT INTO check_history (id, user_id, verdict, confidence, summary, tactics, actions)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING created_at",
                rusqlite::params![id, user_id, verdict, confidence, summary, tactics_json, actions_json],
                |row| row.get(0),
            )?;
            Ok(created_at)
        })
    }

    /// Most recent checks for a user, newest first.
    pub fn list_checks(&self, user_id: &str, limit: u32) -> Result<Vec<HistoryRow>> {
        self.with_conn(|conn| query_checks(conn, user_id, limit))
    }

    // -- Lead capture --

    /// Record an email for the checklist mailing, once. Returns false if
    /// the address was already on file.
    pub fn upsert_lead(&self, email: &str, source: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO lead_emails (email, source) VALUES (?1, ?2)",
                rusqlite::params![email, source],
            )?;
            Ok(inserted == 1)
        })
    }
}

fn query_checks(conn: &Connection, user_id: &str, limit: u32) -> Result<Vec<HistoryRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, verdict, confidence, summary, tactics, actions, created_at
         FROM check_history
         WHERE user_id = ?1
         ORDER BY created_at DESC, id DESC
         LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![user_id, limit], |row| {
            Ok(HistoryRow {
                id: row.get(0)?,
                verdict: row.get(1)?,
                confidence: row.get(2)?,
                summary: row.get(3)?,
                tactics: row.get(4)?,
                actions: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
