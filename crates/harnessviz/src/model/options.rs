//! Harness-wide rendering options, tweaks and metadata

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::ColorMode;

/// Options as written in configuration, before the background cascade
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsConfig {
    pub fontname: String,
    pub bgcolor: String,
    pub bgcolor_node: Option<String>,
    pub bgcolor_connector: Option<String>,
    pub bgcolor_cable: Option<String>,
    pub bgcolor_bundle: Option<String>,
    pub color_mode: ColorMode,
    pub mini_bom_mode: bool,
    pub template_separator: String,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            fontname: "arial".to_string(),
            bgcolor: "WH".to_string(),
            bgcolor_node: Some("WH".to_string()),
            bgcolor_connector: None,
            bgcolor_cable: None,
            bgcolor_bundle: None,
            color_mode: ColorMode::default(),
            mini_bom_mode: true,
            template_separator: ".".to_string(),
        }
    }
}

/// Rendering options with every background color resolved
///
/// Unset colors inherit along `bgcolor → bgcolor_node →
/// bgcolor_connector / bgcolor_cable → bgcolor_bundle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OptionsConfig")]
pub struct Options {
    pub fontname: String,
    pub bgcolor: String,
    pub bgcolor_node: String,
    pub bgcolor_connector: String,
    pub bgcolor_cable: String,
    pub bgcolor_bundle: String,
    pub color_mode: ColorMode,
    pub mini_bom_mode: bool,
    pub template_separator: String,
}

fn inherit(color: Option<String>, parent: &str) -> String {
    color
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| parent.to_string())
}

impl From<OptionsConfig> for Options {
    fn from(config: OptionsConfig) -> Self {
        let bgcolor_node = inherit(config.bgcolor_node, &config.bgcolor);
        let bgcolor_connector = inherit(config.bgcolor_connector, &bgcolor_node);
        let bgcolor_cable = inherit(config.bgcolor_cable, &bgcolor_node);
        let bgcolor_bundle = inherit(config.bgcolor_bundle, &bgcolor_cable);
        Self {
            fontname: config.fontname,
            bgcolor: config.bgcolor,
            bgcolor_node,
            bgcolor_connector,
            bgcolor_cable,
            bgcolor_bundle,
            color_mode: config.color_mode,
            mini_bom_mode: config.mini_bom_mode,
            template_separator: config.template_separator,
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        OptionsConfig::default().into()
    }
}

/// Free-form harness metadata (title, description, notes, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(pub IndexMap<String, Value>);

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Adjustments applied to generated graph output
///
/// Conventional keys: `override` maps a designator to attribute overrides
/// (a `null` value removes the attribute), `append` holds extra statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tweak(pub IndexMap<String, Value>);

impl Tweak {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Attribute overrides for one designator, in configuration order
    pub fn overrides(&self, designator: &str) -> Vec<(String, Option<String>)> {
        let Some(attrs) = self
            .get("override")
            .and_then(|o| o.get(designator))
            .and_then(Value::as_object)
        else {
            return Vec::new();
        };
        attrs
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                };
                (k.clone(), value)
            })
            .collect()
    }

    /// Extra statements to append, whether given as one string or a list
    pub fn append(&self) -> Vec<String> {
        match self.get("append") {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ColorNotation;

    #[test]
    fn test_default_cascade() {
        let options = Options::default();
        assert_eq!(options.fontname, "arial");
        assert_eq!(options.bgcolor_node, "WH");
        assert_eq!(options.bgcolor_connector, "WH");
        assert_eq!(options.bgcolor_bundle, "WH");
        assert!(options.mini_bom_mode);
    }

    #[test]
    fn test_cascade_from_partial_config() {
        let options: Options = serde_json::from_str(
            r#"{"bgcolor": "GY", "bgcolor_node": null, "bgcolor_cable": "BU", "color_mode": "full"}"#,
        )
        .unwrap();
        assert_eq!(options.bgcolor_node, "GY");
        assert_eq!(options.bgcolor_connector, "GY");
        assert_eq!(options.bgcolor_cable, "BU");
        assert_eq!(options.bgcolor_bundle, "BU");
        assert_eq!(options.color_mode.notation, ColorNotation::Full);
        assert!(!options.color_mode.uppercase);
    }

    #[test]
    fn test_options_reject_unknown_keys() {
        assert!(serde_json::from_str::<Options>(r#"{"fontsize": 12}"#).is_err());
    }

    #[test]
    fn test_tweak_helpers() {
        let tweak: Tweak = serde_json::from_str(
            r#"{"override": {"X1": {"shape": "record", "style": null}}, "append": "X1 -> X2"}"#,
        )
        .unwrap();
        assert_eq!(
            tweak.overrides("X1"),
            vec![
                ("shape".to_string(), Some("record".to_string())),
                ("style".to_string(), None)
            ]
        );
        assert!(tweak.overrides("X2").is_empty());
        assert_eq!(tweak.append(), vec!["X1 -> X2"]);
    }

    #[test]
    fn test_metadata_preserves_order() {
        let metadata: Metadata =
            serde_json::from_str(r#"{"title": "Demo", "b": 1, "a": [1, 2]}"#).unwrap();
        let keys: Vec<&String> = metadata.0.keys().collect();
        assert_eq!(keys, ["title", "b", "a"]);
        assert_eq!(metadata.title(), Some("Demo"));
    }
}
