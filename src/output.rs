use anyhow::Result;
use serde_json::{Map, Value};

use crate::page::PageSignals;

/// Serialize signals, optionally keeping only the named top-level keys.
/// Kept keys stay in output order; unknown names are ignored.
pub fn project(signals: &PageSignals, fields: Option<&[String]>) -> Result<Value> {
    let value = serde_json::to_value(signals)?;
    let (Some(fields), Value::Object(map)) = (fields, &value) else {
        return Ok(value);
    };

    let kept: Map<String, Value> = map
        .iter()
        .filter(|(key, _)| fields.iter().any(|f| f == *key))
        .map(|(key, val)| (key.clone(), val.clone()))
        .collect();
    Ok(Value::Object(kept))
}

pub fn render(signals: &PageSignals, fields: Option<&[String]>, compact: bool) -> Result<String> {
    let value = project(signals, fields)?;
    let text = if compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::extract_signals;

    fn sample() -> PageSignals {
        extract_signals(
            "<head><title>T</title></head><body><h2>Q?</h2><p>Yes.</p></body>",
            "https://example.com/",
        )
    }

    #[test]
    fn full_output_key_order() {
        let value = project(&sample(), None).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.first(), Some(&"url"));
        assert_eq!(keys.last(), Some(&"internal_link_anchors"));
        assert_eq!(keys.len(), 30);
        assert!(!keys.contains(&"total_images"));
    }

    #[test]
    fn field_projection_preserves_order() {
        let fields = vec!["word_count".to_string(), "title".to_string(), "nope".to_string()];
        let value = project(&sample(), Some(&fields)).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "word_count"]);
        assert_eq!(value["title"], "T");
    }

    #[test]
    fn bluf_wire_names() {
        let value = project(&sample(), None).unwrap();
        let section = &value["bluf_analysis"][0];
        assert_eq!(section["heading"], "Q?");
        assert_eq!(section["bluf_pattern_type"], "yesno");
        assert_eq!(section["starts_with_answer"], false);
        assert_eq!(value["entity_properties"]["author_details"], Value::Null);
    }

    #[test]
    fn compact_vs_pretty() {
        let s = sample();
        let compact = render(&s, None, true).unwrap();
        let pretty = render(&s, None, false).unwrap();
        assert!(!compact.contains('\n'));
        assert!(pretty.contains("\n  \"title\": \"T\""));
    }
}
