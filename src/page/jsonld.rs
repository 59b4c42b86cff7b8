//! JSON-LD blocks: decoding, schema types and entity properties.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use super::signals::{AuthorDetails, EntityProperties};

/// Nesting levels visited before a traversal gives up on a branch.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Default)]
pub struct JsonLdHarvester {
    documents: Vec<Value>,
}

impl JsonLdHarvester {
    /// Decode one script body. Malformed JSON is dropped without trace in
    /// the output.
    pub fn accept(&mut self, source: &str) {
        match serde_json::from_str::<Value>(source) {
            Ok(value) => self.documents.push(value),
            Err(e) => debug!("dropping malformed JSON-LD block: {}", e),
        }
    }

    pub fn into_documents(self) -> Vec<Value> {
        self.documents
    }
}

/// Top-level `@type` of a document, or `"Unknown"`.
pub fn document_type(doc: &Value) -> Value {
    doc.as_object()
        .and_then(|obj| obj.get("@type"))
        .cloned()
        .unwrap_or_else(|| Value::String("Unknown".to_string()))
}

/// Every `@type` string in every document, deduplicated in first-seen order.
pub fn schema_types(documents: &[Value]) -> Vec<String> {
    let mut walk = TypeWalk::default();
    for doc in documents {
        walk.visit(doc, 0);
    }
    if walk.truncated {
        debug!("JSON-LD nesting deeper than {} levels skipped while collecting types", MAX_DEPTH);
    }

    let mut seen = HashSet::new();
    walk.types.retain(|t| seen.insert(t.clone()));
    walk.types
}

/// sameAs / about / mainEntity / author, aggregated across all documents.
pub fn entity_properties(documents: &[Value]) -> EntityProperties {
    let mut walk = EntityWalk::default();
    for doc in documents {
        walk.visit(doc, 0);
    }
    if walk.truncated {
        debug!("JSON-LD nesting deeper than {} levels skipped while walking entities", MAX_DEPTH);
    }
    walk.props
}

#[derive(Default)]
struct TypeWalk {
    types: Vec<String>,
    truncated: bool,
}

impl TypeWalk {
    fn visit(&mut self, value: &Value, depth: usize) {
        if depth > MAX_DEPTH {
            self.truncated = true;
            return;
        }
        match value {
            Value::Object(obj) => self.visit_object(obj, depth),
            Value::Array(items) => {
                for item in items {
                    self.visit(item, depth + 1);
                }
            }
            _ => {}
        }
    }

    fn visit_object(&mut self, obj: &Map<String, Value>, depth: usize) {
        match obj.get("@type") {
            Some(Value::String(t)) => self.types.push(t.clone()),
            Some(Value::Array(ts)) => {
                self.types
                    .extend(ts.iter().filter_map(Value::as_str).map(str::to_string));
            }
            _ => {}
        }

        if let Some(Value::Array(graph)) = obj.get("@graph") {
            for item in graph {
                self.visit(item, depth + 1);
            }
        }

        for (key, val) in obj {
            if key != "@type" && key != "@graph" && is_container(val) {
                self.visit(val, depth + 1);
            }
        }
    }
}

#[derive(Default)]
struct EntityWalk {
    props: EntityProperties,
    truncated: bool,
}

impl EntityWalk {
    fn visit(&mut self, value: &Value, depth: usize) {
        if depth > MAX_DEPTH {
            self.truncated = true;
            return;
        }
        match value {
            Value::Object(obj) => self.visit_object(obj, depth),
            Value::Array(items) => {
                for item in items {
                    self.visit(item, depth + 1);
                }
            }
            _ => {}
        }
    }

    fn visit_object(&mut self, obj: &Map<String, Value>, depth: usize) {
        if let Some(same_as) = obj.get("sameAs") {
            self.props.has_same_as = true;
            match same_as {
                Value::String(url) => self.props.same_as_urls.push(url.clone()),
                Value::Array(urls) => self.props.same_as_urls.extend(urls.iter().map(stringify)),
                _ => {}
            }
        }
        if obj.contains_key("about") {
            self.props.has_about = true;
        }
        if obj.contains_key("mainEntity") || obj.contains_key("mainEntityOfPage") {
            self.props.has_main_entity = true;
        }
        if self.props.author_details.is_none() {
            self.props.author_details = obj.get("author").and_then(author_details);
        }

        if let Some(Value::Array(graph)) = obj.get("@graph") {
            for item in graph {
                self.visit(item, depth + 1);
            }
        }

        for (key, val) in obj {
            if key != "@graph" && key != "sameAs" && is_container(val) {
                self.visit(val, depth + 1);
            }
        }
    }
}

/// Object authors keep type/name/url, string authors become name-only.
/// Anything else (e.g. a list of authors) records nothing.
fn author_details(author: &Value) -> Option<AuthorDetails> {
    match author {
        Value::Object(obj) => {
            let field = |key: &str| obj.get(key).cloned().unwrap_or_else(|| Value::String(String::new()));
            Some(AuthorDetails::Entity {
                kind: field("@type"),
                name: field("name"),
                url: field("url"),
            })
        }
        Value::String(name) => Some(AuthorDetails::NameOnly { name: name.clone() }),
        _ => None,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn harvest(blocks: &[&str]) -> Vec<Value> {
        let mut h = JsonLdHarvester::default();
        for b in blocks {
            h.accept(b);
        }
        h.into_documents()
    }

    #[test]
    fn malformed_blocks_dropped() {
        let docs = harvest(&[r#"{"@type": "Article""#, r#"{"@type": "FAQPage"}"#, "not json"]);
        assert_eq!(docs, vec![json!({"@type": "FAQPage"})]);
    }

    #[test]
    fn graph_types_in_order() {
        let docs = harvest(&[r#"{"@graph": [{"@type": "Article"}, {"@type": "FAQPage"}]}"#]);
        assert_eq!(schema_types(&docs), vec!["Article", "FAQPage"]);
    }

    #[test]
    fn types_deduplicated_across_documents() {
        let docs = vec![
            json!({"@type": ["Organization", "LocalBusiness"], "founder": {"@type": "Person"}}),
            json!([{"@type": "Organization"}, {"@type": "WebSite", "publisher": [{"@type": "Person"}]}]),
        ];
        assert_eq!(
            schema_types(&docs),
            vec!["Organization", "LocalBusiness", "Person", "WebSite"]
        );
    }

    #[test]
    fn non_string_types_skipped() {
        let docs = vec![json!({"@type": 5, "item": {"@type": ["Thing", null]}})];
        assert_eq!(schema_types(&docs), vec!["Thing"]);
    }

    #[test]
    fn document_type_fallback() {
        assert_eq!(document_type(&json!({"@type": "Article"})), json!("Article"));
        assert_eq!(document_type(&json!({"@type": ["A", "B"]})), json!(["A", "B"]));
        assert_eq!(document_type(&json!({"name": "x"})), json!("Unknown"));
        assert_eq!(document_type(&json!([{"@type": "A"}])), json!("Unknown"));
    }

    #[test]
    fn entity_properties_aggregate() {
        let docs = vec![
            json!({
                "@type": "Article",
                "about": {"@type": "Thing"},
                "author": {"@type": "Person", "name": "Ada", "url": "https://ada.dev",
                           "sameAs": ["https://x.com/ada", "https://github.com/ada"]}
            }),
            json!({"@graph": [
                {"@type": "WebPage", "mainEntityOfPage": "https://example.com"},
                {"@type": "Organization", "sameAs": "https://x.com/ada", "author": "Someone Else"}
            ]}),
        ];
        let props = entity_properties(&docs);
        assert!(props.has_same_as);
        assert!(props.has_about);
        assert!(props.has_main_entity);
        assert_eq!(
            props.same_as_urls,
            vec!["https://x.com/ada", "https://github.com/ada", "https://x.com/ada"]
        );
        assert_eq!(
            props.author_details,
            Some(AuthorDetails::Entity {
                kind: json!("Person"),
                name: json!("Ada"),
                url: json!("https://ada.dev"),
            })
        );
    }

    #[test]
    fn string_author_and_missing_fields() {
        let props = entity_properties(&[json!({"author": "Jane Doe"})]);
        assert_eq!(
            props.author_details,
            Some(AuthorDetails::NameOnly { name: "Jane Doe".into() })
        );

        let props = entity_properties(&[json!({"author": {"name": "Only Name"}})]);
        assert_eq!(
            props.author_details,
            Some(AuthorDetails::Entity {
                kind: json!(""),
                name: json!("Only Name"),
                url: json!(""),
            })
        );
    }

    #[test]
    fn author_list_defers_to_later_author() {
        let docs = vec![json!({
            "author": [{"name": "A"}, {"name": "B"}],
            "review": {"author": "Reviewer"}
        })];
        let props = entity_properties(&docs);
        assert_eq!(
            props.author_details,
            Some(AuthorDetails::NameOnly { name: "Reviewer".into() })
        );
    }

    #[test]
    fn empty_documents() {
        let props = entity_properties(&[]);
        assert_eq!(props, EntityProperties::default());
        assert!(schema_types(&[]).is_empty());
    }

    #[test]
    fn deep_nesting_is_bounded() {
        let mut value = json!({"@type": "Leaf"});
        for _ in 0..200 {
            value = json!({"@type": "Node", "child": value});
        }
        let types = schema_types(&[value]);
        assert_eq!(types, vec!["Node"]);
    }
}
