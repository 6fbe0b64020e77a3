//! Status classification
//!
//! Status bodies are not under our control: Celery-style jobs report a
//! top-level `status` ("SUCCESS", "FAILURE", "PENDING"), while jobs that
//! return their own envelope put it under `result.status`. Everything that
//! interprets those shapes lives here so the poll loop only ever sees
//! [`Classification`].

use jenga_core::domain::outcome::PollOutcome;
use serde_json::Value;

const SUCCESS_MARKERS: &[&str] = &["success", "succeeded"];
const FAILURE_MARKERS: &[&str] = &["failure", "failed", "error"];

/// Fallback reason when a failed job carries no message
pub const GENERIC_FAILURE: &str = "Background job failed";

/// Semantic reading of one status response
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Succeeded { result: Value },
    Failed { reason: String },
    /// Queued, running, unknown or malformed: keep polling
    NotTerminalYet,
}

impl Classification {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Classification::NotTerminalYet)
    }

    /// Converts a terminal classification into the outcome handed to callers
    pub fn into_outcome(self) -> Option<PollOutcome> {
        match self {
            Classification::Succeeded { result } => Some(PollOutcome::Succeeded { result }),
            Classification::Failed { reason } => Some(PollOutcome::Failed { reason }),
            Classification::NotTerminalYet => None,
        }
    }
}

/// Classifies a raw status response
///
/// Success is checked before failure. Unrecognized shapes are never an
/// error; they read as [`Classification::NotTerminalYet`].
pub fn classify(raw: &Value) -> Classification {
    let top = status_of(raw);
    let nested = raw.get("result").and_then(status_of);

    if has_marker(top, SUCCESS_MARKERS) || has_marker(nested, SUCCESS_MARKERS) {
        return Classification::Succeeded {
            result: success_payload(raw),
        };
    }

    if has_marker(top, FAILURE_MARKERS) || has_marker(nested, FAILURE_MARKERS) {
        return Classification::Failed {
            reason: failure_reason(raw),
        };
    }

    Classification::NotTerminalYet
}

fn status_of(value: &Value) -> Option<&str> {
    value.get("status").and_then(Value::as_str)
}

fn has_marker(status: Option<&str>, markers: &[&str]) -> bool {
    status
        .map(str::trim)
        .is_some_and(|s| markers.iter().any(|m| s.eq_ignore_ascii_case(m)))
}

fn success_payload(raw: &Value) -> Value {
    let result = raw.get("result").filter(|r| !r.is_null());

    result
        .and_then(|r| r.get("data"))
        .or(result)
        .or_else(|| raw.get("data"))
        .cloned()
        .unwrap_or(Value::Null)
}

fn failure_reason(raw: &Value) -> String {
    let nested = raw.get("result");
    let candidates = [
        nested.and_then(|r| r.get("error")),
        raw.get("error"),
        nested.and_then(|r| r.get("message")),
        raw.get("message"),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(message_text)
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

fn message_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn succeeded(result: Value) -> Classification {
        Classification::Succeeded { result }
    }

    fn failed(reason: &str) -> Classification {
        Classification::Failed {
            reason: reason.to_string(),
        }
    }

    #[test]
    fn test_success_markers() {
        let cases = [
            (
                json!({"status": "SUCCESS", "result": {"estimate_id": 9}}),
                succeeded(json!({"estimate_id": 9})),
            ),
            (
                json!({"status": "completed", "result": {"status": "success", "estimate_id": 9}}),
                succeeded(json!({"status": "success", "estimate_id": 9})),
            ),
            (
                json!({"result": {"status": "success", "data": {"total": 42}}}),
                succeeded(json!({"total": 42})),
            ),
            (
                json!({"status": " Succeeded ", "data": [1, 2]}),
                succeeded(json!([1, 2])),
            ),
            (json!({"status": "success"}), succeeded(Value::Null)),
            (
                json!({"status": "SUCCESS", "result": null, "progress": 100}),
                succeeded(Value::Null),
            ),
        ];

        for (raw, expected) in cases {
            assert_eq!(classify(&raw), expected, "response: {}", raw);
        }
    }

    #[test]
    fn test_success_ignores_noise_fields() {
        let raw = json!({
            "status": "SUCCESS",
            "error": "stale message",
            "progress": 100,
            "traceback": null,
            "result": {"data": {"total": 1}}
        });
        assert_eq!(classify(&raw), succeeded(json!({"total": 1})));
    }

    #[test]
    fn test_success_wins_over_failure() {
        let raw = json!({"status": "SUCCESS", "result": {"status": "failed"}});
        assert!(matches!(classify(&raw), Classification::Succeeded { .. }));
    }

    #[test]
    fn test_failure_markers() {
        let cases = [
            (json!({"status": "FAILURE"}), failed(GENERIC_FAILURE)),
            (
                json!({"status": "failed", "error": "Gemini quota exceeded", "result": null}),
                failed("Gemini quota exceeded"),
            ),
            (
                json!({
                    "status": "completed",
                    "result": {"status": "failed", "error": "Location not found for id: 99"}
                }),
                failed("Location not found for id: 99"),
            ),
            (
                json!({"status": "error", "error": "outer", "result": {"error": "inner"}}),
                failed("inner"),
            ),
            (
                json!({"result": {"status": "failed", "error": "  ", "message": "no estimate"}}),
                failed("no estimate"),
            ),
            (
                json!({"status": "FAILURE", "error": {"code": 7}}),
                failed(r#"{"code":7}"#),
            ),
        ];

        for (raw, expected) in cases {
            assert_eq!(classify(&raw), expected, "response: {}", raw);
        }
    }

    #[test]
    fn test_failure_reason_never_empty() {
        for raw in [
            json!({"status": "failed", "error": ""}),
            json!({"status": "failed", "error": null, "message": null}),
            json!({"result": {"status": "FAILED"}}),
        ] {
            match classify(&raw) {
                Classification::Failed { reason } => assert!(!reason.is_empty()),
                other => panic!("expected failure for {}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_not_terminal() {
        for raw in [
            json!({"status": "pending", "progress": 0}),
            json!({"status": "PENDING"}),
            json!({"status": "STARTED"}),
            json!({"status": "queued"}),
            json!({"status": "running", "result": {"status": "running"}}),
            json!({"status": "completed", "result": null}),
            json!({"status": 200}),
            json!({"result": "success"}),
            json!({}),
            json!([]),
            json!("SUCCESS"),
            Value::Null,
        ] {
            assert_eq!(
                classify(&raw),
                Classification::NotTerminalYet,
                "response: {}",
                raw
            );
        }
    }

    #[test]
    fn test_into_outcome() {
        assert_eq!(
            failed("x").into_outcome(),
            Some(PollOutcome::Failed {
                reason: "x".to_string()
            })
        );
        assert!(succeeded(Value::Null).is_terminal());
        assert_eq!(Classification::NotTerminalYet.into_outcome(), None);
    }
}
