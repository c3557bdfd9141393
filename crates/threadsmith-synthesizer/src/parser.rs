//! Parse LLM output into questions and dimension categories

use crate::error::SynthesizerError;
use serde_json::Value;
use threadsmith_domain::DimensionCategory;
use threadsmith_store::parse_dimension_categories;

/// JSON schema sent with structured question requests
pub const QUESTION_SCHEMA: &str = r#"{"type":"object","properties":{"question":{"type":"string"}},"required":["question"],"additionalProperties":false}"#;

/// Extract the JSON object from a response
///
/// Looks for a fenced code block first (a `json` fence wins over a bare
/// one), then falls back to the span from the first `{` to the last `}`.
pub fn extract_json(response: &str) -> Result<&str, SynthesizerError> {
    if let Some(block) = fenced_block(response, "```json").or_else(|| fenced_block(response, "```")) {
        return Ok(block);
    }

    match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&response[start..=end]),
        _ => Err(SynthesizerError::InvalidFormat("No JSON object found in response".to_string())),
    }
}

fn fenced_block<'a>(response: &'a str, fence: &str) -> Option<&'a str> {
    let start = response.find(fence)? + fence.len();
    // The opening fence line may carry a language tag
    let body_start = start + response[start..].find('\n')? + 1;
    let end = body_start + response[body_start..].find("```")?;
    let block = response[body_start..end].trim();
    (!block.is_empty()).then_some(block)
}

/// Parse a structured question response: `{"question": "<non-empty string>"}`
pub fn parse_question_response(response: &str) -> Result<String, SynthesizerError> {
    let json: Value = serde_json::from_str(extract_json(response)?)?;

    let question = json
        .as_object()
        .ok_or_else(|| SynthesizerError::InvalidFormat("Expected JSON object".to_string()))?
        .get("question")
        .and_then(Value::as_str)
        .ok_or_else(|| SynthesizerError::InvalidFormat("Missing or invalid 'question'".to_string()))?
        .trim();

    if question.is_empty() {
        return Err(SynthesizerError::InvalidFormat("Empty 'question'".to_string()));
    }
    Ok(question.to_string())
}

/// Parse the dimension document out of a discovery response
pub fn parse_dimension_response(response: &str) -> Result<Vec<DimensionCategory>, SynthesizerError> {
    parse_dimension_categories(extract_json(response)?)
        .map_err(|e| SynthesizerError::InvalidFormat(e.to_string()))
}

/// Text between `<summary>` and `</summary>`, if present and non-empty
pub fn extract_summary(response: &str) -> Option<String> {
    const OPEN: &str = "<summary>";
    const CLOSE: &str = "</summary>";

    let start = response.rfind(OPEN)? + OPEN.len();
    let end = start + response[start..].find(CLOSE)?;
    let summary = response[start..end].trim();
    (!summary.is_empty()).then(|| summary.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_question() {
        let q = parse_question_response(r#"{"question": "  How do I reset it?  "}"#).unwrap();
        assert_eq!(q, "How do I reset it?");
    }

    #[test]
    fn test_parse_fenced_question() {
        let response = "Sure!\n```json\n{\"question\": \"Why?\"}\n```\nHope that helps.";
        assert_eq!(parse_question_response(response).unwrap(), "Why?");
    }

    #[test]
    fn test_parse_bare_fence() {
        let response = "```\n{\"question\": \"Why?\"}\n```";
        assert_eq!(parse_question_response(response).unwrap(), "Why?");
    }

    #[test]
    fn test_question_shape_failures() {
        assert!(matches!(parse_question_response("no json here"), Err(SynthesizerError::InvalidFormat(_))));
        assert!(matches!(parse_question_response("{not json}"), Err(SynthesizerError::JsonParse(_))));
        assert!(matches!(parse_question_response(r#"{"text": "x"}"#), Err(SynthesizerError::InvalidFormat(_))));
        assert!(matches!(parse_question_response(r#"{"question": 5}"#), Err(SynthesizerError::InvalidFormat(_))));
        assert!(matches!(parse_question_response(r#"{"question": "   "}"#), Err(SynthesizerError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_dimension_response() {
        let response = r#"Here is the analysis.

```json
{
  "Intent": [{"dimension": "Troubleshooting", "description": "d", "examples": ["full quote"]}],
  "Persona": [{"dimension": "Novice", "description": "d", "examples": []}]
}
```

<summary>
Two clear axes.
</summary>"#;
        let categories = parse_dimension_response(response).unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Intent");
        assert_eq!(categories[1].dimensions[0].name, "Novice");
        assert_eq!(extract_summary(response).as_deref(), Some("Two clear axes."));
    }

    #[test]
    fn test_dimension_response_without_fence() {
        let response = r#"Analysis: {"Intent": [{"dimension": "A"}]} done"#;
        assert_eq!(parse_dimension_response(response).unwrap()[0].dimensions[0].name, "A");
    }

    #[test]
    fn test_unparseable_dimension_response() {
        assert!(parse_dimension_response("I could not find any dimensions.").is_err());
        assert!(parse_dimension_response("```json\n[1, 2]\n```").is_err());
    }

    #[test]
    fn test_missing_summary() {
        assert_eq!(extract_summary("no summary"), None);
        assert_eq!(extract_summary("<summary>  </summary>"), None);
    }

    #[test]
    fn test_schema_is_valid_json() {
        let schema: Value = serde_json::from_str(QUESTION_SCHEMA).unwrap();
        assert_eq!(schema["required"][0], "question");
    }
}
