//! Startup configuration, read once from the environment. A `.env` file is
//! honored in development; production sets real variables.

use std::path::PathBuf;

use scamguard_api::{DailyLimits, SweepSettings};

/// Placeholder secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub sweep_secret: String,
    pub ai_api_key: String,
    pub ai_api_base: String,
    pub analysis_model: String,
    pub moderation_model: String,
    pub limits: DailyLimits,
    pub sweep: SweepSettings,
}

impl Config {
    /// Read the full configuration. Missing or placeholder secrets abort
    /// startup; everything else falls back to a development default.
    pub fn load() -> anyhow::Result<Self> {
        let jwt_secret = require_secret(
            "SCAMGUARD_JWT_SECRET",
            "This must match the identity provider's signing secret.",
        );
        let sweep_secret = require_secret(
            "SCAMGUARD_SWEEP_SECRET",
            "The external sweep scheduler authenticates with it.",
        );
        let ai_api_key = require_secret(
            "ANTHROPIC_API_KEY",
            "Scam analysis and moderation cannot run without it.",
        );

        let defaults = DailyLimits::default();
        let sweep_defaults = SweepSettings::default();

        Ok(Self {
            host: std::env::var("SCAMGUARD_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("SCAMGUARD_PORT")
                .unwrap_or_else(|_| "3400".into())
                .parse()?,
            db_path: std::env::var("SCAMGUARD_DB_PATH")
                .unwrap_or_else(|_| "scamguard.db".into())
                .into(),
            jwt_secret,
            sweep_secret,
            ai_api_key,
            ai_api_base: std::env::var("SCAMGUARD_AI_API_BASE")
                .unwrap_or_else(|_| "https://api.anthropic.com/v1".into()),
            analysis_model: std::env::var("SCAMGUARD_ANALYSIS_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-5-20250929".into()),
            moderation_model: std::env::var("SCAMGUARD_MODERATION_MODEL")
                .unwrap_or_else(|_| "claude-3-5-haiku-20241022".into()),
            limits: DailyLimits {
                checks: env_u32("SCAMGUARD_CHECK_LIMIT", defaults.checks),
                scenarios: env_u32("SCAMGUARD_SCENARIO_LIMIT", defaults.scenarios),
                posts: env_u32("SCAMGUARD_POST_LIMIT", defaults.posts),
            },
            sweep: SweepSettings {
                post_batch: env_u32("SCAMGUARD_SWEEP_POST_BATCH", sweep_defaults.post_batch),
                comment_batch: env_u32(
                    "SCAMGUARD_SWEEP_COMMENT_BATCH",
                    sweep_defaults.comment_batch,
                ),
                max_attempts: env_u32("SCAMGUARD_SWEEP_MAX_ATTEMPTS", sweep_defaults.max_attempts),
            },
        })
    }
}

fn require_secret(name: &str, hint: &str) -> String {
    let value = std::env::var(name).unwrap_or_default();
    if value.is_empty() || PLACEHOLDER_SECRETS.contains(&value.as_str()) {
        eprintln!("FATAL: {} is unset or still a placeholder.", name);
        eprintln!("       {}", hint);
        eprintln!("       Set it in your .env file and restart.");
        std::process::exit(1);
    }
    value
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
