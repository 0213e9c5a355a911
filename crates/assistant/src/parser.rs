//! Model output parser.
//!
//! Turns raw model text into a [`ModelResponse`]. Malformed output is
//! never an error: the deterministic fallback writes the user's own
//! message into A1, so every turn produces at least one spreadsheet
//! effect and one explanation. Elements with an unrecognized kind
//! degrade individually to [`Operation::Unknown`] without discarding
//! their siblings.

use serde::Deserialize;
use serde_json::Value;

use crate::catalog::{ModelResponse, Operation};

#[derive(Deserialize)]
struct RawEnvelope {
    explanation: String,
    #[serde(default)]
    operations: Vec<Value>,
}

/// Strip optional surrounding markdown code fences.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Decode one operations-array element. Unrecognized or malformed
/// kinds become `Unknown` rather than failing the batch.
fn decode_operation(element: &Value) -> Operation {
    match serde_json::from_value::<Operation>(element.clone()) {
        Ok(op) => op,
        Err(_) => {
            let kind = element
                .get("type")
                .and_then(|v| v.as_str())
                .unwrap_or("undefined")
                .to_string();
            Operation::Unknown { kind }
        }
    }
}

/// The deterministic fallback: write the whole user message into A1.
fn fallback(user_message: &str) -> ModelResponse {
    ModelResponse {
        explanation: format!("Parsed fallback for: {}", user_message),
        operations: vec![Operation::SetCellValue {
            cell: Some("A1".to_string()),
            value: Some(Value::String(user_message.to_string())),
        }],
    }
}

/// Parse raw model text into a structured response.
///
/// `user_message` is the original request; it feeds the fallback when
/// the model returned something unusable.
pub fn parse_model_response(raw: &str, user_message: &str) -> ModelResponse {
    let cleaned = strip_code_fences(raw);

    match serde_json::from_str::<RawEnvelope>(cleaned) {
        Ok(envelope) => ModelResponse {
            explanation: envelope.explanation,
            operations: envelope.operations.iter().map(decode_operation).collect(),
        },
        Err(e) => {
            log::debug!("model output unparsable ({}), using fallback", e);
            fallback(user_message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VALID: &str = r#"{"explanation":"Summing column B","operations":[{"type":"sum_column","column":"B"}]}"#;

    #[test]
    fn test_parse_plain_json() {
        let response = parse_model_response(VALID, "sum column B");
        assert_eq!(response.explanation, "Summing column B");
        assert_eq!(
            response.operations,
            vec![Operation::SumColumn { column: Some("B".into()) }]
        );
    }

    #[test]
    fn test_fenced_output_parses_identically() {
        let fenced = format!("```json\n{}\n```", VALID);
        assert_eq!(
            parse_model_response(&fenced, "sum column B"),
            parse_model_response(VALID, "sum column B")
        );

        let bare_fence = format!("```\n{}\n```", VALID);
        assert_eq!(
            parse_model_response(&bare_fence, "sum column B"),
            parse_model_response(VALID, "sum column B")
        );
    }

    #[test]
    fn test_prose_falls_back_to_a1_write() {
        let response = parse_model_response(
            "Sure! I'll sum that column for you.",
            "sum column B please",
        );
        assert_eq!(response.explanation, "Parsed fallback for: sum column B please");
        assert_eq!(
            response.operations,
            vec![Operation::SetCellValue {
                cell: Some("A1".into()),
                value: Some(json!("sum column B please")),
            }]
        );
    }

    #[test]
    fn test_empty_output_falls_back() {
        let response = parse_model_response("", "hello");
        assert_eq!(response.operations.len(), 1);
        assert!(matches!(
            response.operations[0],
            Operation::SetCellValue { .. }
        ));
    }

    #[test]
    fn test_wrong_shape_falls_back() {
        // explanation must be a string
        let response = parse_model_response(r#"{"explanation": 7, "operations": []}"#, "hi");
        assert_eq!(response.explanation, "Parsed fallback for: hi");
    }

    #[test]
    fn test_unknown_kind_degrades_not_fails() {
        let raw = r#"{"explanation":"mix","operations":[
            {"type":"pivot_table"},
            {"type":"clear_selection"}
        ]}"#;
        let response = parse_model_response(raw, "msg");
        assert_eq!(
            response.operations,
            vec![
                Operation::Unknown { kind: "pivot_table".into() },
                Operation::ClearSelection,
            ]
        );
    }

    #[test]
    fn test_element_without_type_reports_undefined() {
        let raw = r#"{"explanation":"x","operations":[{"column":"B"}]}"#;
        let response = parse_model_response(raw, "msg");
        assert_eq!(
            response.operations,
            vec![Operation::Unknown { kind: "undefined".into() }]
        );
    }

    #[test]
    fn test_missing_operations_array_defaults_empty() {
        let response = parse_model_response(r#"{"explanation":"nothing to do"}"#, "msg");
        assert_eq!(response.explanation, "nothing to do");
        assert!(response.operations.is_empty());
    }
}
