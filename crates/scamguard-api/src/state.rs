use std::sync::Arc;

use scamguard_ai::Classifier;
use scamguard_db::Database;
use scamguard_types::models::ActionKind;

pub type AppState = Arc<AppStateInner>;

/// Free-tier daily allowances. Pro users bypass them entirely.
#[derive(Debug, Clone, Copy)]
pub struct DailyLimits {
    pub checks: u32,
    pub scenarios: u32,
    pub posts: u32,
}

impl DailyLimits {
    pub fn for_kind(&self, kind: ActionKind) -> u32 {
        match kind {
            ActionKind::Check => self.checks,
            ActionKind::Scenario => self.scenarios,
            ActionKind::Post => self.posts,
        }
    }
}

impl Default for DailyLimits {
    fn default() -> Self {
        Self {
            checks: 5,
            scenarios: 1,
            posts: 3,
        }
    }
}

/// Batch shape of one moderation sweep invocation.
#[derive(Debug, Clone, Copy)]
pub struct SweepSettings {
    pub post_batch: u32,
    pub comment_batch: u32,
    /// Failed classifications tolerated before an item is parked as
    /// flagged for manual review.
    pub max_attempts: u32,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            post_batch: 10,
            comment_batch: 20,
            max_attempts: 3,
        }
    }
}

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub classifier: Arc<dyn Classifier>,
    pub jwt_secret: String,
    /// Pre-shared secret the external scheduler presents to trigger the
    /// moderation sweep.
    pub sweep_secret: String,
    pub limits: DailyLimits,
    pub sweep: SweepSettings,
}
