//! The prompts demand bare JSON, but models still wrap replies in markdown
//! fences or lead-in prose often enough that we tolerate it.

/// Slice out the JSON object embedded in a model reply: everything from the
/// first `{` to the last `}`. Returns `None` when no object is present.
pub fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_object_passes_through() {
        assert_eq!(extract_json(r#"{"approved": true}"#), Some(r#"{"approved": true}"#));
    }

    #[test]
    fn strips_markdown_fences() {
        let raw = "```json\n{\"approved\": true, \"score\": 80}\n```";
        assert_eq!(extract_json(raw), Some("{\"approved\": true, \"score\": 80}"));
    }

    #[test]
    fn strips_surrounding_prose() {
        let raw = "Sure, here is the analysis you asked for:\n{\"score\": 12}\nLet me know!";
        assert_eq!(extract_json(raw), Some("{\"score\": 12}"));
    }

    #[test]
    fn keeps_nested_objects_whole() {
        let raw = r#"{"tactics": [{"name": "Urgency", "score": 90}], "confidence": 88}"#;
        assert_eq!(extract_json(raw), Some(raw));
    }

    #[test]
    fn rejects_text_without_an_object() {
        assert_eq!(extract_json("I cannot help with that."), None);
        assert_eq!(extract_json(""), None);
        assert_eq!(extract_json("} backwards {"), None);
    }
}
