//! Daily usage quotas. One row per (user, action kind) holds the count for
//! the current UTC-day window; stale windows are reset lazily by the next
//! consume or read, never by a background job.

use crate::Database;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use scamguard_types::models::ActionKind;

/// Window key for a given instant: the UTC calendar date. Windows compare
/// lexicographically, which for this format matches chronological order.
pub fn window_for(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

pub fn window_today() -> String {
    window_for(Utc::now())
}

impl Database {
    // -- Usage quotas --

    /// Spend one unit of quota for `(user_id, kind)` in `window`.
    ///
    /// Returns `Some(count_after)` if the action was admitted, `None` if
    /// the limit is exhausted. Check and increment happen in a single
    /// upsert so two racing requests can never both be admitted for the
    /// last remaining unit: a row whose stored window is older than
    /// `window` counts as zero and is overwritten, a fresh row is only
    /// incremented while still under `limit`.
    pub fn consume_quota(
        &self,
        user_id: &str,
        kind: ActionKind,
        window: &str,
        limit: u32,
    ) -> Result<Option<u32>> {
        if limit == 0 {
            // The insert arm of the upsert would admit the first action of
            // a window unconditionally, so a zero limit is refused here.
            return Ok(None);
        }

        self.with_conn_mut(|conn| {
            let count_after: Option<u32> = conn
                .query_row(
                    "INSERT INTO usage_counters (user_id, action_kind, count_used, window_start)
                     VALUES (?1, ?2, 1, ?3)
                     ON CONFLICT(user_id, action_kind) DO UPDATE SET
                         count_used = CASE
                             WHEN usage_counters.window_start < excluded.window_start THEN 1
                             ELSE usage_counters.count_used + 1
                         END,
                         window_start = excluded.window_start
                     WHERE usage_counters.window_start < excluded.window_start
                        OR usage_counters.count_used < ?4
                     RETURNING count_used",
                    rusqlite::params![user_id, kind.as_str(), window, limit],
                    |row| row.get(0),
                )
                .optional()?;

            Ok(count_after)
        })
    }

    /// Roll `(user_id, kind)` forward to `window` with a zero count,
    /// without spending anything. Used for unlimited-tier users so their
    /// counter still tracks the current window; a later downgrade then
    /// starts the day from zero. Within a fresh window this is a no-op.
    pub fn refresh_quota_window(&self, user_id: &str, kind: ActionKind, window: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO usage_counters (user_id, action_kind, count_used, window_start)
                 VALUES (?1, ?2, 0, ?3)
                 ON CONFLICT(user_id, action_kind) DO UPDATE SET
                     count_used = 0,
                     window_start = excluded.window_start
                 WHERE usage_counters.window_start < excluded.window_start",
                rusqlite::params![user_id, kind.as_str(), window],
            )?;
            Ok(())
        })
    }

    /// Units already spent in `window`. Rows from older windows read as
    /// zero without being rewritten.
    pub fn get_quota_used(&self, user_id: &str, kind: ActionKind, window: &str) -> Result<u32> {
        self.with_conn(|conn| {
            let used: Option<u32> = conn
                .query_row(
                    "SELECT count_used FROM usage_counters
                     WHERE user_id = ?1 AND action_kind = ?2 AND window_start >= ?3",
                    rusqlite::params![user_id, kind.as_str(), window],
                    |row| row.get(0),
                )
                .optional()?;

            Ok(used.unwrap_or(0))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::open_temp;

    const TODAY: &str = "2026-08-23";
    const YESTERDAY: &str = "2026-08-22";

    #[test]
    fn admits_exactly_limit_actions_per_window() {
        let (db, _dir) = open_temp();

        for expected in 1..=3u32 {
            let got = db
                .consume_quota("user-1", ActionKind::Check, TODAY, 3)
                .unwrap();
            assert_eq!(got, Some(expected));
        }

        // Fourth and fifth attempts are refused and do not grow the count.
        for _ in 0..2 {
            let got = db
                .consume_quota("user-1", ActionKind::Check, TODAY, 3)
                .unwrap();
            assert_eq!(got, None);
        }
        assert_eq!(db.get_quota_used("user-1", ActionKind::Check, TODAY).unwrap(), 3);
    }

    #[test]
    fn kinds_and_users_have_independent_counters() {
        let (db, _dir) = open_temp();

        assert!(db.consume_quota("user-1", ActionKind::Check, TODAY, 1).unwrap().is_some());
        assert!(db.consume_quota("user-1", ActionKind::Check, TODAY, 1).unwrap().is_none());

        // Same user, different kind; different user, same kind.
        assert!(db.consume_quota("user-1", ActionKind::Scenario, TODAY, 1).unwrap().is_some());
        assert!(db.consume_quota("user-2", ActionKind::Check, TODAY, 1).unwrap().is_some());
    }

    #[test]
    fn stale_window_resets_on_next_consume() {
        let (db, _dir) = open_temp();

        for _ in 0..3 {
            db.consume_quota("user-1", ActionKind::Check, YESTERDAY, 3)
                .unwrap();
        }
        assert!(db.consume_quota("user-1", ActionKind::Check, YESTERDAY, 3).unwrap().is_none());

        // The exhausted counter belongs to an old window, so today's first
        // consume starts over at 1.
        let got = db
            .consume_quota("user-1", ActionKind::Check, TODAY, 3)
            .unwrap();
        assert_eq!(got, Some(1));
    }

    #[test]
    fn stale_window_reads_as_zero_without_writing() {
        let (db, _dir) = open_temp();

        db.consume_quota("user-1", ActionKind::Check, YESTERDAY, 5)
            .unwrap();
        assert_eq!(db.get_quota_used("user-1", ActionKind::Check, YESTERDAY).unwrap(), 1);
        assert_eq!(db.get_quota_used("user-1", ActionKind::Check, TODAY).unwrap(), 0);

        // Peeking at today must not have rewritten the stored row.
        assert_eq!(db.get_quota_used("user-1", ActionKind::Check, YESTERDAY).unwrap(), 1);
    }

    #[test]
    fn zero_limit_is_always_refused() {
        let (db, _dir) = open_temp();

        assert_eq!(db.consume_quota("user-1", ActionKind::Post, TODAY, 0).unwrap(), None);
        assert_eq!(db.get_quota_used("user-1", ActionKind::Post, TODAY).unwrap(), 0);
    }

    #[test]
    fn refresh_rolls_stale_window_forward_to_zero() {
        let (db, _dir) = open_temp();

        for _ in 0..2 {
            db.consume_quota("user-1", ActionKind::Check, YESTERDAY, 5)
                .unwrap();
        }

        db.refresh_quota_window("user-1", ActionKind::Check, TODAY).unwrap();
        assert_eq!(db.get_quota_used("user-1", ActionKind::Check, TODAY).unwrap(), 0);

        // A second refresh in the same window must not clobber real usage.
        db.consume_quota("user-1", ActionKind::Check, TODAY, 5).unwrap();
        db.refresh_quota_window("user-1", ActionKind::Check, TODAY).unwrap();
        assert_eq!(db.get_quota_used("user-1", ActionKind::Check, TODAY).unwrap(), 1);
    }

    #[test]
    fn concurrent_consumes_admit_exactly_one_for_limit_one() {
        let (db, _dir) = open_temp();

        let admitted = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let db = db.clone();
                    s.spawn(move || {
                        db.consume_quota("user-1", ActionKind::Scenario, TODAY, 1)
                            .unwrap()
                            .is_some()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|admitted| *admitted)
                .count()
        });

        assert_eq!(admitted, 1);
        assert_eq!(db.get_quota_used("user-1", ActionKind::Scenario, TODAY).unwrap(), 1);
    }

    #[test]
    fn window_keys_order_chronologically() {
        let (earlier, later) = (
            window_for("2026-08-22T23:59:59Z".parse().unwrap()),
            window_for("2026-08-23T00:00:00Z".parse().unwrap()),
        );
        assert_eq!(earlier, "2026-08-22");
        assert_eq!(later, "2026-08-23");
        assert!(earlier < later);
    }
}
