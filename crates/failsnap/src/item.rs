//! Collected test items

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameter values of a parametrized item, keyed by parameter name
pub type Params = BTreeMap<String, serde_json::Value>;

/// One collected test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestItem {
    /// Display identifier, rewritten at collection time
    #[serde(default)]
    pub node_id: String,
    /// Test function name
    pub name: String,
    /// Docstring, if the test has one
    #[serde(default, alias = "docstring")]
    pub doc: Option<String>,
    /// Parameters, if the item came from a parametrized definition
    #[serde(default)]
    pub params: Option<Params>,
}

impl TestItem {
    /// Create an item whose id is its function name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            node_id: name.clone(),
            name,
            doc: None,
            params: None,
        }
    }

    /// Set node id
    #[must_use]
    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = node_id.into();
        self
    }

    /// Set docstring
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Add a parameter, making the item parametrized
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        let _ = self
            .params
            .get_or_insert_with(Params::new)
            .insert(name.into(), value.into());
        self
    }

    /// Docstring, treating an empty one as absent
    #[must_use]
    pub fn docstring(&self) -> Option<&str> {
        self.doc.as_deref().filter(|d| !d.is_empty())
    }

    /// Fill an empty node id from the name
    pub(crate) fn ensure_node_id(&mut self) {
        if self.node_id.is_empty() {
            self.node_id.clone_from(&self.name);
        }
    }
}

/// Render a parameter value the way it reads in a test id.
///
/// Top-level strings appear bare; inside lists and mappings they are quoted,
/// and containers are spaced like Python's `str()` output.
#[must_use]
pub fn render_param(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => repr(other),
    }
}

fn repr(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "None".to_string(),
        serde_json::Value::Bool(true) => "True".to_string(),
        serde_json::Value::Bool(false) => "False".to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => quote(s),
        serde_json::Value::Array(items) => {
            let items: Vec<String> = items.iter().map(repr).collect();
            format!("[{}]", items.join(", "))
        }
        serde_json::Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), repr(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

// Single quotes unless the text holds a single quote and no double quote.
fn quote(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        return format!("\"{}\"", s.replace('\\', "\\\\"));
    }
    let escaped = s.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_uses_name_as_id() {
        let item = TestItem::new("test_login");
        assert_eq!(item.node_id, "test_login");
        assert!(item.params.is_none());
    }

    #[test]
    fn test_empty_doc_is_absent() {
        let item = TestItem::new("t").with_doc("");
        assert_eq!(item.docstring(), None);
    }

    #[test]
    fn test_with_param_marks_parametrized() {
        let item = TestItem::new("t").with_param("b", 2).with_param("a", "x");
        let params = item.params.unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params["a"], json!("x"));
    }

    #[test]
    fn test_render_param() {
        assert_eq!(render_param(&json!("chrome")), "chrome");
        assert_eq!(render_param(&json!(42)), "42");
        assert_eq!(render_param(&json!(1.5)), "1.5");
        assert_eq!(render_param(&json!(true)), "True");
        assert_eq!(render_param(&json!(null)), "None");
        assert_eq!(render_param(&json!([1, 2])), "[1, 2]");
    }

    #[test]
    fn test_render_param_containers() {
        assert_eq!(render_param(&json!(["a", "b"])), "['a', 'b']");
        assert_eq!(render_param(&json!({"k": true})), "{'k': True}");
        assert_eq!(
            render_param(&json!({"name": "x", "sizes": [1, null]})),
            "{'name': 'x', 'sizes': [1, None]}"
        );
        assert_eq!(render_param(&json!([])), "[]");
    }

    #[test]
    fn test_render_param_quotes() {
        assert_eq!(render_param(&json!(["it's"])), "[\"it's\"]");
        assert_eq!(render_param(&json!(["a'b\"c"])), "['a\\'b\"c']");
    }
}
