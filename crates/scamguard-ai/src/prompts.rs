//! Prompt builders. The JSON shapes and verdict phrases embedded here are
//! part of the product contract; edit them together with the response types
//! in scamguard-types.

use scamguard_types::models::ScamChannel;

/// Risk analysis of one suspicious message.
pub fn analysis(text: &str) -> String {
    format!(
        r#"You are a scam detection expert. Analyze the following message and determine if it is likely a scam or legitimate.

Respond ONLY with valid JSON in this exact format (no markdown, no code blocks):
{{
  "verdict": "HIGH RISK — LIKELY SCAM" or "MEDIUM RISK — SUSPICIOUS" or "LOW RISK — LIKELY SAFE",
  "confidence": <number 0-100>,
  "tactics": [
    {{
      "name": "<tactic name like 'Urgency Pressure' or 'Emotional Manipulation'>",
      "score": <severity 0-100>,
      "desc": "<one sentence explaining how this tactic is used in the message>"
    }}
  ],
  "summary": "<2-3 sentence explanation of why this is or isn't a scam>",
  "actions": ["<recommended action 1>", "<recommended action 2>", "<recommended action 3>"]
}}

Include 2-5 tactics. If the message appears legitimate, still analyze it but give low scores.

Message to analyze:
"""
{text}
""""#
    )
}

/// Publication review of one community scam report.
pub fn post_review(content: &str, channel: ScamChannel) -> String {
    format!(
        r#"You are a content moderator for a scam reporting community platform. Analyze this user-submitted scam report and determine if it should be approved or rejected.

APPROVE if:
- It describes a legitimate scam attempt (phone, text, email, or online)
- Contains helpful details that would warn others
- Does not contain personal information (PII) like SSN, credit card numbers, full street addresses
- Is not spam, advertising, or off-topic
- Uses respectful language
- Provides enough context to be useful (more than just "got a scam call")

REJECT if:
- Not about a scam (general complaint, question, unrelated content)
- Contains PII that should be redacted:
  * Social Security Numbers (XXX-XX-XXXX pattern)
  * Credit card numbers (16-digit sequences)
  * Full street addresses with house numbers
  * Excessive phone numbers without context
- Spam, advertising, or promotional content
- Profanity, hate speech, or harassment
- Too vague to be helpful (e.g., "got a scam call" with no details)
- Gibberish or nonsensical text

Scam Type: {scam_type}
Content: """
{content}
"""

Respond ONLY with valid JSON (no markdown, no code blocks):
{{
  "approved": true or false,
  "score": <0-100, quality score where 100 is excellent, 0 is terrible>,
  "reason": "<one sentence explaining decision>",
  "pii_detected": ["<list any PII found>"] or []
}}

If PII is detected, set approved=false and explain in reason."#,
        scam_type = channel.as_str(),
    )
}

/// Publication review of one comment. Lighter criteria than posts.
pub fn comment_review(content: &str) -> String {
    format!(
        r#"You are a content moderator for a scam reporting community platform. Analyze this comment and determine if it should be approved or rejected.

APPROVE if:
- Provides helpful context or advice
- Shares a similar experience
- Asks a relevant question
- Offers support or empathy
- Uses respectful language

REJECT if:
- Spam or promotional content
- Profanity, hate speech, or harassment
- Off-topic or irrelevant
- Contains PII (SSN, credit cards, addresses)
- Gibberish or nonsensical

Comment: """
{content}
"""

Respond ONLY with valid JSON (no markdown, no code blocks):
{{
  "approved": true or false,
  "score": <0-100, quality score>,
  "reason": "<one sentence explaining decision>"
}}"#
    )
}
