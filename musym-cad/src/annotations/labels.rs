//! Remote label documents
//!
//! Label files are YAML (in practice JSON, which YAML parsers accept) with a
//! top-level `labels` list. Cadence labels carry `type: Cadence`, a `start`
//! offset in beats and an optional `tag` with the cadence type.

use crate::error::{LoadError, LoadResult};
use crate::types::Cadence;
use serde::Deserialize;
use serde_yaml::Value;

const CADENCE_TYPE: &str = "Cadence";

/// Labels stay untyped until they are known to be cadences; other label
/// kinds may use any shape for their fields.
#[derive(Debug, Deserialize)]
struct LabelDocument {
    labels: Option<Vec<Value>>,
}

/// Extract cadences from a label document
pub fn parse_label_document(text: &str, source_name: &str, include_type: bool) -> LoadResult<Vec<Cadence>> {
    let document: LabelDocument = serde_yaml::from_str(text)
        .map_err(|e| LoadError::format(source_name, format!("malformed label document: {}", e)))?;

    let labels = document
        .labels
        .ok_or_else(|| LoadError::format(source_name, "label document has no 'labels' list"))?;

    let mut cadences = Vec::new();
    for (index, label) in labels.iter().enumerate() {
        if label.get("type").and_then(Value::as_str) != Some(CADENCE_TYPE) {
            continue;
        }
        let start = match label.get("start") {
            Some(value) => value.as_f64().ok_or_else(|| {
                LoadError::format(source_name, format!("cadence label {} has a non-numeric 'start'", index))
            })?,
            None => return Err(LoadError::format(source_name, format!("cadence label {} has no 'start'", index))),
        };

        let mut cadence = Cadence::at(start);
        if include_type {
            if let Some(tag) = label.get("tag").and_then(Value::as_str).filter(|t| !t.trim().is_empty()) {
                cadence = cadence.with_kind(tag);
            }
        }
        cadences.push(cadence);
    }

    Ok(cadences)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "labels": [
            { "type": "Cadence", "start": 15, "tag": "PAC" },
            { "type": "Pedal", "start": 20 },
            { "type": "Cadence", "start": 31.5, "tag": "HC", "line": "top.1" },
            { "start": 40 }
        ],
        "meta": { "title": "Fugue" }
    }"#;

    #[test]
    fn test_keeps_only_cadence_labels() {
        let cadences = parse_label_document(DOCUMENT, "fixture", false).unwrap();
        assert_eq!(cadences, vec![Cadence::at(15.0), Cadence::at(31.5)]);
    }

    #[test]
    fn test_tags_become_kinds_when_requested() {
        let cadences = parse_label_document(DOCUMENT, "fixture", true).unwrap();
        assert_eq!(cadences[0].kind.as_deref(), Some("PAC"));
        assert_eq!(cadences[1].kind.as_deref(), Some("HC"));
    }

    #[test]
    fn test_block_yaml_is_accepted() {
        let document = "labels:\n  - type: Cadence\n    start: 8\n";
        let cadences = parse_label_document(document, "fixture", false).unwrap();
        assert_eq!(cadences, vec![Cadence::at(8.0)]);
    }

    #[test]
    fn test_missing_labels_is_format_error() {
        let err = parse_label_document("{\"meta\": {}}", "k80.1-ref.dez", false).unwrap_err();
        match err {
            LoadError::AnnotationFormat { source_name, reason } => {
                assert_eq!(source_name, "k80.1-ref.dez");
                assert!(reason.contains("labels"));
            }
            other => panic!("Expected AnnotationFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_cadence_without_start_is_format_error() {
        let document = "labels:\n  - type: Cadence\n";
        assert!(parse_label_document(document, "fixture", false).is_err());
    }

    #[test]
    fn test_other_labels_may_have_any_shape() {
        let document = r#"{
            "labels": [
                { "type": "Cadence", "start": 4 },
                { "type": "Structure", "start": "A", "tag": ["x", "y"] },
                { "type": 7 },
                "comment",
                { "type": "Cadence", "start": 12.5, "tag": "PAC" }
            ]
        }"#;
        let cadences = parse_label_document(document, "fixture", true).unwrap();
        assert_eq!(cadences, vec![Cadence::at(4.0), Cadence::at(12.5).with_kind("PAC")]);
    }

    #[test]
    fn test_non_numeric_cadence_start_is_format_error() {
        let document = "labels:\n  - type: Cadence\n    start: soon\n";
        let err = parse_label_document(document, "fixture", false).unwrap_err();
        assert!(err.to_string().contains("non-numeric"));
    }

    #[test]
    fn test_html_error_page_is_format_error() {
        let err = parse_label_document("<html><body>404</body></html>", "fixture", false).unwrap_err();
        assert!(matches!(err, LoadError::AnnotationFormat { .. }));
    }
}
