use crate::Database;
use crate::models::ProfileRow;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

impl Database {
    // -- Profiles --

    /// Insert a profile row for a newly-seen user, leaving any existing row
    /// untouched. Called on authenticated writes so author lookups have
    /// something to join against.
    pub fn ensure_profile(&self, user_id: &str, email: Option<&str>) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO profiles (user_id, email) VALUES (?1, ?2)",
                rusqlite::params![user_id, email],
            )?;
            Ok(())
        })
    }

    pub fn get_profile(&self, user_id: &str) -> Result<Option<ProfileRow>> {
        self.with_conn(|conn| query_profile(conn, user_id))
    }

    /// Whether the user is on the paid tier. Users without a profile row
    /// count as free tier.
    pub fn is_pro(&self, user_id: &str) -> Result<bool> {
        Ok(self.get_profile(user_id)?.map(|p| p.is_pro).unwrap_or(false))
    }

    /// Batch-fetch profiles for a set of user IDs, for author display on
    /// post and comment lists.
    pub fn profiles_by_ids(&self, user_ids: &[String]) -> Result<Vec<ProfileRow>> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let placeholders: Vec<String> =
                (1..=user_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "SELECT user_id, email, full_name, is_pro FROM profiles WHERE user_id IN ({})",
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn rusqlite::types::ToSql> = user_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();

            let rows = stmt
                .query_map(params.as_slice(), |row| {
                    Ok(ProfileRow {
                        user_id: row.get(0)?,
                        email: row.get(1)?,
                        full_name: row.get(2)?,
                        is_pro: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn query_profile(conn: &Connection, user_id: &str) -> Result<Option<ProfileRow>> {
    let mut stmt = conn
        .prepare("SELECT user_id, email, full_name, is_pro FROM profiles WHERE user_id = ?1")?;

    let row = stmt
        .query_row([user_id], |row| {
            Ok(ProfileRow {
                user_id: row.get(0)?,
                email: row.get(1)?,
                full_name: row.get(2)?,
                is_pro: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use crate::testutil::open_temp;

    #[test]
    fn ensure_profile_is_idempotent() {
        let (db, _dir) = open_temp();

        db.ensure_profile("user-1", Some("ann@example.com")).unwrap();
        db.ensure_profile("user-1", Some("changed@example.com")).unwrap();

        let profile = db.get_profile("user-1").unwrap().unwrap();
        assert_eq!(profile.email.as_deref(), Some("ann@example.com"));
        assert!(!profile.is_pro);
    }

    #[test]
    fn missing_profile_is_free_tier() {
        let (db, _dir) = open_temp();
        assert!(!db.is_pro("nobody").unwrap());
    }

    #[test]
    fn batch_lookup_skips_unknown_ids() {
        let (db, _dir) = open_temp();
        db.ensure_profile("user-1", Some("a@example.com")).unwrap();
        db.ensure_profile("user-2", None).unwrap();

        let rows = db
            .profiles_by_ids(&[
                "user-1".to_string(),
                "user-2".to_string(),
                "ghost".to_string(),
            ])
            .unwrap();
        assert_eq!(rows.len(), 2);

        assert!(db.profiles_by_ids(&[]).unwrap().is_empty());
    }
}
