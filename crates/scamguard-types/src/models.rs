use serde::{Deserialize, Serialize};

/// Three-level risk verdict of a scam analysis. The wire strings are part of
/// the product contract (the UI keys its styling off them), so variants
/// rename to the exact phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskVerdict {
    #[serde(rename = "HIGH RISK — LIKELY SCAM")]
    HighRisk,
    #[serde(rename = "MEDIUM RISK — SUSPICIOUS")]
    MediumRisk,
    #[serde(rename = "LOW RISK — LIKELY SAFE")]
    LowRisk,
}

impl RiskVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskVerdict::HighRisk => "HIGH RISK — LIKELY SCAM",
            RiskVerdict::MediumRisk => "MEDIUM RISK — SUSPICIOUS",
            RiskVerdict::LowRisk => "LOW RISK — LIKELY SAFE",
        }
    }
}

impl std::str::FromStr for RiskVerdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HIGH RISK — LIKELY SCAM" => Ok(RiskVerdict::HighRisk),
            "MEDIUM RISK — SUSPICIOUS" => Ok(RiskVerdict::MediumRisk),
            "LOW RISK — LIKELY SAFE" => Ok(RiskVerdict::LowRisk),
            other => Err(format!("unknown verdict: {}", other)),
        }
    }
}

/// One manipulation tactic spotted in an analyzed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacticFinding {
    pub name: String,
    pub score: u8,
    pub desc: String,
}

/// Structured output of one scam-risk analysis. Immutable once created;
/// optionally persisted to a user's check history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScamAnalysis {
    pub verdict: RiskVerdict,
    pub confidence: u8,
    pub tactics: Vec<TacticFinding>,
    pub summary: String,
    pub actions: Vec<String>,
}

impl ScamAnalysis {
    /// Confidence and tactic scores are bounded integers in 0..=100.
    /// `u8` already rules out negatives and >255; this closes the gap.
    pub fn check_bounds(&self) -> Result<(), String> {
        if self.confidence > 100 {
            return Err(format!("confidence {} out of range 0-100", self.confidence));
        }
        for tactic in &self.tactics {
            if tactic.score > 100 {
                return Err(format!(
                    "tactic '{}' score {} out of range 0-100",
                    tactic.name, tactic.score
                ));
            }
        }
        Ok(())
    }
}

/// Channel a reported scam arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScamChannel {
    Phone,
    Text,
    Email,
    Online,
}

impl ScamChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScamChannel::Phone => "Phone",
            ScamChannel::Text => "Text",
            ScamChannel::Email => "Email",
            ScamChannel::Online => "Online",
        }
    }
}

impl std::str::FromStr for ScamChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Phone" => Ok(ScamChannel::Phone),
            "Text" => Ok(ScamChannel::Text),
            "Email" => Ok(ScamChannel::Email),
            "Online" => Ok(ScamChannel::Online),
            other => Err(format!("unknown scam channel: {}", other)),
        }
    }
}

/// Lifecycle of a community submission. `Pending` items are picked up by the
/// moderation sweep and move exactly once to a terminal state. `Flagged` is
/// the dead-letter state for items whose classification kept failing; the
/// sweep never selects them again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
    Flagged,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
            ModerationStatus::Flagged => "flagged",
        }
    }
}

impl std::str::FromStr for ModerationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ModerationStatus::Pending),
            "approved" => Ok(ModerationStatus::Approved),
            "rejected" => Ok(ModerationStatus::Rejected),
            "flagged" => Ok(ModerationStatus::Flagged),
            other => Err(format!("unknown moderation status: {}", other)),
        }
    }
}

/// Raw verdict returned by the content classifier for one submission.
/// The sweep combines `approved` with its own score threshold; this struct
/// is what the model said, not the final decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationVerdict {
    pub approved: bool,
    pub score: u8,
    pub reason: String,
    #[serde(default)]
    pub pii_detected: Vec<String>,
}

/// Rate-limited action kinds tracked by the quota ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Check,
    Scenario,
    Post,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Check => "check",
            ActionKind::Scenario => "scenario",
            ActionKind::Post => "post",
        }
    }
}
