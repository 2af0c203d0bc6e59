//! Opaque resource declarations
//!
//! A [`Declaration`] is one unit of infrastructure configuration contributed
//! by a node. The engine carries declarations through synthesis without
//! interpreting their properties.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One resource declaration owned by a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    /// Resource kind (e.g. `Queue`, `Topic`, `Subscription`)
    pub kind: String,

    /// Opaque, insertion-ordered properties
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl Declaration {
    /// Create declaration without properties
    #[inline]
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            properties: Map::new(),
        }
    }

    /// Add a property
    #[inline]
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Merge keyed properties, later keys overwriting earlier ones
    #[must_use]
    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Look up a property
    #[inline]
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn declaration_builder() {
        let decl = Declaration::new("Queue")
            .with_property("VisibilityTimeout", 500)
            .with_property("FifoQueue", false);

        assert_eq!(decl.kind, "Queue");
        assert_eq!(decl.property("VisibilityTimeout"), Some(&json!(500)));
        assert_eq!(decl.properties.len(), 2);
    }

    #[test]
    fn with_properties_merges_in_order() {
        let mut first = Map::new();
        first.insert("A".to_string(), json!(1));
        first.insert("B".to_string(), json!("two"));
        let mut second = Map::new();
        second.insert("A".to_string(), json!(3));

        let decl = Declaration::new("Queue")
            .with_properties(first)
            .with_properties(second);

        let keys: Vec<_> = decl.properties.keys().cloned().collect();
        assert_eq!(keys, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(decl.property("A"), Some(&json!(3)));
    }

    #[test]
    fn empty_properties_are_omitted() {
        let json = serde_json::to_value(Declaration::new("Topic")).unwrap();
        assert_eq!(json, json!({"kind": "Topic"}));
    }
}
