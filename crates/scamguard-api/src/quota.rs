//! The one admission gate every rate-limited action goes through. Handlers
//! never touch usage counters directly.

use anyhow::{Context, Result};
use scamguard_db::Database;
use scamguard_db::quota::window_today;
use scamguard_types::models::ActionKind;

use crate::state::DailyLimits;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// Action admitted. `used` includes this action; `limit` is `None` for
    /// unlimited users.
    Admitted { used: u32, limit: Option<u32> },
    /// Over the daily allowance; nothing was consumed.
    Denied { limit: u32 },
}

impl QuotaDecision {
    pub fn admitted(&self) -> bool {
        matches!(self, QuotaDecision::Admitted { .. })
    }
}

/// [`check_and_consume`] with the caller's tier resolved from their
/// profile: pro users get an unlimited pass, everyone else the configured
/// free allowance. Blocking; call from `spawn_blocking`.
pub fn admit(
    db: &Database,
    limits: DailyLimits,
    user_id: &str,
    kind: ActionKind,
) -> Result<QuotaDecision> {
    let limit = if db.is_pro(user_id)? {
        None
    } else {
        Some(limits.for_kind(kind))
    };
    check_and_consume(db, user_id, kind, limit)
}

/// Upgrade copy shown verbatim by the client on a quota denial.
pub fn denial_message(kind: ActionKind, limit: u32) -> String {
    match kind {
        ActionKind::Check => format!(
            "You've used your {} free checks for today. Upgrade to Premium for unlimited.",
            limit
        ),
        ActionKind::Scenario => format!(
            "You've used your {} free scenario for today. Upgrade to Premium for unlimited.",
            limit
        ),
        ActionKind::Post => format!(
            "You've reached your daily post limit ({}). Upgrade to Premium for unlimited posts.",
            limit
        ),
    }
}

/// Admit or refuse one unit of `kind` for `user_id` in today's UTC window.
///
/// `limit` of `None` means unlimited (pro tier): nothing is spent, but the
/// user's window row still rolls forward so a later downgrade starts the
/// day at zero. A storage failure propagates as an error, and the caller
/// refuses the action: when usage cannot be verified, nothing is admitted.
pub fn check_and_consume(
    db: &Database,
    user_id: &str,
    kind: ActionKind,
    limit: Option<u32>,
) -> Result<QuotaDecision> {
    let window = window_today();

    match limit {
        None => {
            db.refresh_quota_window(user_id, kind, &window)
                .context("could not verify usage")?;
            Ok(QuotaDecision::Admitted {
                used: 0,
                limit: None,
            })
        }
        Some(limit) => {
            let outcome = db
                .consume_quota(user_id, kind, &window, limit)
                .context("could not verify usage")?;

            Ok(match outcome {
                Some(used) => QuotaDecision::Admitted {
                    used,
                    limit: Some(limit),
                },
                None => QuotaDecision::Denied { limit },
            })
        }
    }
}
