//! BOM line items attached to connectors, cables, or the harness itself

use serde::{Deserialize, Serialize};

use crate::core::de;

/// Identification fields shared by connectors, cables and BOM items
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PartNumbers {
    pub pn: Option<String>,
    pub manufacturer: Option<String>,
    pub mpn: Option<String>,
    pub supplier: Option<String>,
    pub spn: Option<String>,
}

impl PartNumbers {
    pub fn is_empty(&self) -> bool {
        self.pn.is_none()
            && self.manufacturer.is_none()
            && self.mpn.is_none()
            && self.supplier.is_none()
            && self.spn.is_none()
    }

    /// Apply `f` to every present field
    pub fn map(&self, f: impl Fn(&str) -> String) -> Self {
        let apply = |v: &Option<String>| v.as_deref().map(&f);
        Self {
            pn: apply(&self.pn),
            manufacturer: apply(&self.manufacturer),
            mpn: apply(&self.mpn),
            supplier: apply(&self.supplier),
            spn: apply(&self.spn),
        }
    }
}

fn default_qty() -> f64 {
    1.0
}

/// Extra BOM item belonging to a connector, cable or the harness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdditionalComponent {
    #[serde(rename = "type", deserialize_with = "de::text")]
    pub type_: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub subtype: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub manufacturer: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub mpn: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub supplier: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub spn: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub pn: Option<String>,
    #[serde(default = "default_qty")]
    pub qty: f64,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub unit: Option<String>,
    #[serde(default)]
    pub qty_multiplier: Option<String>,
    #[serde(default)]
    pub bgcolor: Option<String>,
}

impl AdditionalComponent {
    pub fn new(type_: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            subtype: None,
            manufacturer: None,
            mpn: None,
            supplier: None,
            spn: None,
            pn: None,
            qty: 1.0,
            unit: None,
            qty_multiplier: None,
            bgcolor: None,
        }
    }

    /// `type`, followed by `, subtype` when a subtype is set
    pub fn description(&self) -> String {
        let mut description = self.type_.trim_end().to_string();
        if let Some(subtype) = self.subtype.as_deref().filter(|s| !s.is_empty()) {
            description.push_str(", ");
            description.push_str(subtype.trim_end());
        }
        description
    }

    /// Multiplier key, with an empty key treated as absent
    pub fn multiplier_key(&self) -> Option<&str> {
        self.qty_multiplier.as_deref().filter(|k| !k.is_empty())
    }

    pub fn part_numbers(&self) -> PartNumbers {
        PartNumbers {
            pn: self.pn.clone(),
            manufacturer: self.manufacturer.clone(),
            mpn: self.mpn.clone(),
            supplier: self.supplier.clone(),
            spn: self.spn.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_with_subtype() {
        let mut part = AdditionalComponent::new("Crimp  ");
        part.subtype = Some("0.5 mm2 ".to_string());
        assert_eq!(part.description(), "Crimp, 0.5 mm2");
    }

    #[test]
    fn test_description_without_subtype() {
        let part = AdditionalComponent::new("Heat shrink");
        assert_eq!(part.description(), "Heat shrink");
    }

    #[test]
    fn test_deserialize_defaults() {
        let part: AdditionalComponent =
            serde_json::from_str(r#"{"type": "Sleeve", "qty_multiplier": ""}"#).unwrap();
        assert_eq!(part.qty, 1.0);
        assert_eq!(part.multiplier_key(), None);
        assert!(part.part_numbers().is_empty());
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let result = serde_json::from_str::<AdditionalComponent>(r#"{"type": "X", "qtty": 2}"#);
        assert!(result.is_err());
    }
}
