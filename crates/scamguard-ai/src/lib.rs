//! Claude-backed content classification: scam-risk analysis of suspicious
//! messages and approve/reject review of community submissions.

pub mod client;
pub mod error;
pub mod extract;
pub mod prompts;

pub use client::{AnthropicClient, ClassifierConfig};
pub use error::AiError;

use async_trait::async_trait;
use scamguard_types::models::{ModerationVerdict, ScamAnalysis, ScamChannel};

/// Interface to the content classifier. Implemented by [`AnthropicClient`]
/// in production and by stubs in handler tests.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Risk-analyze one suspicious message.
    async fn analyze_message(&self, text: &str) -> Result<ScamAnalysis, AiError>;

    /// Review one community post for publication.
    async fn moderate_post(
        &self,
        content: &str,
        channel: ScamChannel,
    ) -> Result<ModerationVerdict, AiError>;

    /// Review one comment for publication.
    async fn moderate_comment(&self, content: &str) -> Result<ModerationVerdict, AiError>;
}
