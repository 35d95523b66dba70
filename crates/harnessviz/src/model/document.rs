//! Whole-harness configuration document

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::core::{OneOrMany, Pin};
use crate::model::component::AdditionalComponent;
use crate::model::options::{Metadata, Options, Tweak};

/// One item of a connection set
///
/// Either a bare string (an arrow like `-->` or `==>`, or a connector
/// designator) or a single-key mapping `{designator: pins-or-wires}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConnectionItem {
    Name(String),
    Entry(IndexMap<String, OneOrMany<Pin>>),
}

impl ConnectionItem {
    pub fn entry(designator: impl Into<String>, values: impl Into<OneOrMany<Pin>>) -> Self {
        let mut map = IndexMap::new();
        map.insert(designator.into(), values.into());
        ConnectionItem::Entry(map)
    }
}

/// A harness as written in a YAML or JSON file
///
/// Connector and cable bodies stay raw until the harness is built, so that
/// configuration errors can name the entity they belong to.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessDocument {
    pub metadata: Metadata,
    pub options: Options,
    pub tweak: Tweak,
    pub connectors: IndexMap<String, Value>,
    pub cables: IndexMap<String, Value>,
    pub connections: Vec<Vec<ConnectionItem>>,
    pub additional_bom_items: Vec<AdditionalComponent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_items() {
        let set: Vec<ConnectionItem> =
            serde_json::from_str(r#"[{"X1": "1-2"}, {"W1": [1, 2]}, "-->", "X2"]"#).unwrap();
        assert_eq!(set[0], ConnectionItem::entry("X1", Pin::from("1-2")));
        assert_eq!(
            set[1],
            ConnectionItem::entry("W1", vec![Pin::Int(1), Pin::Int(2)])
        );
        assert_eq!(set[2], ConnectionItem::Name("-->".to_string()));
    }

    #[test]
    fn test_empty_document() {
        let document: HarnessDocument = serde_json::from_str("{}").unwrap();
        assert!(document.connectors.is_empty());
        assert_eq!(document.options, Options::default());
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(serde_json::from_str::<HarnessDocument>(r#"{"wires": {}}"#).is_err());
    }
}
