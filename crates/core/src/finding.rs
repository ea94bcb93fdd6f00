//! Individual issues reported by the model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category of a reported issue.
///
/// The model is asked for `bug`, `spelling` or `warning`, but any other
/// string it produces is kept verbatim in [`FindingKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FindingKind {
    Bug,
    Spelling,
    Warning,
    Other(String),
}

impl FindingKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bug => "bug",
            Self::Spelling => "spelling",
            Self::Warning => "warning",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for FindingKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "bug" => Self::Bug,
            "spelling" => Self::Spelling,
            "warning" => Self::Warning,
            _ => Self::Other(value),
        }
    }
}

impl From<FindingKind> for String {
    fn from(kind: FindingKind) -> Self {
        match kind {
            FindingKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// A single issue at (optionally) a specific 1-based line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FindingKind>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Finding {
    /// Leniently convert one element of a model-produced `errors` array.
    ///
    /// Returns `None` only when the element is not a JSON object. Fields of
    /// the wrong type are treated as absent; `line` also accepts numeric
    /// strings, and zero or negative lines are dropped.
    pub fn from_model_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let line = obj.get("line").and_then(|v| match v {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        });
        let line = line
            .filter(|l| *l > 0)
            .and_then(|l| u32::try_from(l).ok());

        let kind = obj
            .get("type")
            .and_then(Value::as_str)
            .map(|s| FindingKind::from(s.to_string()));

        let message = obj
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let suggestion = obj
            .get("suggestion")
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Self {
            line,
            kind,
            message,
            suggestion,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn known_kinds_round_trip_through_strings() {
        for (s, kind) in [
            ("bug", FindingKind::Bug),
            ("spelling", FindingKind::Spelling),
            ("warning", FindingKind::Warning),
        ] {
            assert_eq!(FindingKind::from(s.to_string()), kind);
            assert_eq!(String::from(kind), s);
        }
    }

    #[test]
    fn unknown_kind_is_preserved() {
        let kind = FindingKind::from("style".to_string());
        assert_eq!(kind, FindingKind::Other("style".into()));
        assert_eq!(kind.as_str(), "style");
    }

    #[test]
    fn full_element_converts() {
        let finding = Finding::from_model_value(&json!({
            "line": 3,
            "type": "bug",
            "message": "off by one",
            "suggestion": "use <"
        }))
        .unwrap();

        assert_eq!(finding.line, Some(3));
        assert_eq!(finding.kind, Some(FindingKind::Bug));
        assert_eq!(finding.message, "off by one");
        assert_eq!(finding.suggestion.as_deref(), Some("use <"));
    }

    #[test]
    fn missing_fields_stay_absent() {
        let finding = Finding::from_model_value(&json!({ "message": "hm" })).unwrap();
        assert_eq!(finding.line, None);
        assert_eq!(finding.kind, None);
        assert_eq!(finding.suggestion, None);
    }

    #[test]
    fn string_line_is_accepted_and_zero_is_dropped() {
        let f = Finding::from_model_value(&json!({ "line": " 12 ", "message": "x" })).unwrap();
        assert_eq!(f.line, Some(12));

        let f = Finding::from_model_value(&json!({ "line": 0, "message": "x" })).unwrap();
        assert_eq!(f.line, None);
    }

    #[test]
    fn non_object_element_is_rejected() {
        assert!(Finding::from_model_value(&json!("just a string")).is_none());
        assert!(Finding::from_model_value(&json!(42)).is_none());
    }

    #[test]
    fn serializes_with_type_key_and_skips_absent_fields() {
        let finding = Finding {
            line: None,
            kind: Some(FindingKind::Warning),
            message: "unused variable".into(),
            suggestion: None,
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json, json!({ "type": "warning", "message": "unused variable" }));
    }
}
