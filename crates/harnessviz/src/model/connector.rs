//! Connectors: validation, derived pin state and pin activation

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::core::{de, expand, HarnessError, Pin, Result, Side};
use crate::model::component::{AdditionalComponent, PartNumbers};
use crate::model::image::{Image, ImageConfig};
use crate::model::multiplier::{parse_key, ConnectorMultiplier, QuantitySource};

/// Connector drawing style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorStyle {
    /// Single-pin connector drawn without a pin table (ferrules, splices)
    Simple,
}

/// Connector as written in configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectorConfig {
    pub bgcolor: Option<String>,
    pub bgcolor_title: Option<String>,
    #[serde(deserialize_with = "de::opt_text")]
    pub manufacturer: Option<String>,
    #[serde(deserialize_with = "de::opt_text")]
    pub mpn: Option<String>,
    #[serde(deserialize_with = "de::opt_text")]
    pub supplier: Option<String>,
    #[serde(deserialize_with = "de::opt_text")]
    pub spn: Option<String>,
    #[serde(deserialize_with = "de::opt_text")]
    pub pn: Option<String>,
    pub style: Option<ConnectorStyle>,
    pub category: Option<String>,
    #[serde(rename = "type", deserialize_with = "de::opt_text")]
    pub type_: Option<String>,
    #[serde(deserialize_with = "de::opt_text")]
    pub subtype: Option<String>,
    pub pincount: Option<usize>,
    pub image: Option<ImageConfig>,
    #[serde(deserialize_with = "de::opt_text")]
    pub notes: Option<String>,
    pub pins: Vec<Pin>,
    #[serde(deserialize_with = "de::text_list")]
    pub pinlabels: Vec<String>,
    #[serde(deserialize_with = "de::text_list")]
    pub pincolors: Vec<String>,
    pub color: Option<String>,
    pub show_name: Option<bool>,
    pub show_pincount: Option<bool>,
    pub hide_disconnected_pins: bool,
    pub loops: Vec<Vec<Pin>>,
    pub ignore_in_bom: bool,
    pub additional_components: Vec<AdditionalComponent>,
}

/// A validated connector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub designator: String,
    pub bgcolor: Option<String>,
    pub bgcolor_title: Option<String>,
    pub manufacturer: Option<String>,
    pub mpn: Option<String>,
    pub supplier: Option<String>,
    pub spn: Option<String>,
    pub pn: Option<String>,
    pub style: Option<ConnectorStyle>,
    pub category: Option<String>,
    pub type_: Option<String>,
    pub subtype: Option<String>,
    pub pincount: usize,
    pub image: Option<Image>,
    pub notes: Option<String>,
    pub pins: Vec<Pin>,
    pub pinlabels: Vec<String>,
    pub pincolors: Vec<String>,
    pub color: Option<String>,
    pub show_name: bool,
    pub show_pincount: bool,
    pub hide_disconnected_pins: bool,
    pub loops: Vec<(Pin, Pin)>,
    pub ignore_in_bom: bool,
    pub additional_components: Vec<AdditionalComponent>,
    visible_pins: IndexMap<Pin, bool>,
    ports_left: bool,
    ports_right: bool,
}

impl Connector {
    /// Validate a configuration and derive pins, pincount and display flags
    pub fn from_config(designator: impl Into<String>, config: ConnectorConfig) -> Result<Self> {
        let designator = designator.into();
        let simple = config.style == Some(ConnectorStyle::Simple);

        let mut pincount = config.pincount.filter(|n| *n > 0);
        if simple {
            if pincount.is_some_and(|n| n > 1) {
                return Err(HarnessError::config(
                    &designator,
                    "Connectors with style set to simple may only have one pin",
                ));
            }
            pincount = Some(1);
        }

        let pins = expand(config.pins)
            .map_err(|e| HarnessError::config(&designator, e.to_string()))?;
        let pincount = match pincount {
            Some(n) => n,
            None => {
                let derived = pins
                    .len()
                    .max(config.pinlabels.len())
                    .max(config.pincolors.len());
                if derived == 0 {
                    return Err(HarnessError::config(
                        &designator,
                        "You need to specify at least one of pincount, pins, pinlabels, or pincolors",
                    ));
                }
                derived
            }
        };

        let pins = if pins.is_empty() {
            (1..=pincount).map(Pin::from).collect()
        } else {
            pins
        };

        let mut seen = HashSet::new();
        if !pins.iter().all(|pin| seen.insert(pin)) {
            return Err(HarnessError::config(&designator, "Pins are not unique"));
        }

        let show_name = config
            .show_name
            .unwrap_or(!simple && !designator.starts_with("__"));
        let show_pincount = config.show_pincount.unwrap_or(!simple);

        for part in &config.additional_components {
            parse_key::<ConnectorMultiplier>(&designator, part.multiplier_key())?;
        }

        let mut loops = Vec::with_capacity(config.loops.len());
        for pair in config.loops {
            let [a, b]: [Pin; 2] = pair.try_into().map_err(|_| {
                HarnessError::config(&designator, "Loops must be between exactly two pins")
            })?;
            for pin in [&a, &b] {
                if !pins.contains(pin) {
                    return Err(HarnessError::config(
                        &designator,
                        format!("Unknown loop pin \"{}\"", pin),
                    ));
                }
            }
            loops.push((a, b));
        }

        let mut connector = Self {
            designator,
            bgcolor: config.bgcolor,
            bgcolor_title: config.bgcolor_title,
            manufacturer: config.manufacturer,
            mpn: config.mpn,
            supplier: config.supplier,
            spn: config.spn,
            pn: config.pn,
            style: config.style,
            category: config.category,
            type_: config.type_,
            subtype: config.subtype,
            pincount,
            image: config.image.map(Image::from_config),
            notes: config.notes,
            pins,
            pinlabels: config.pinlabels,
            pincolors: config.pincolors,
            color: config.color,
            show_name,
            show_pincount,
            hide_disconnected_pins: config.hide_disconnected_pins,
            loops,
            ignore_in_bom: config.ignore_in_bom,
            additional_components: config.additional_components,
            visible_pins: IndexMap::new(),
            ports_left: false,
            ports_right: false,
        };

        // loop pins are never hidden
        let loop_pins: Vec<Pin> = connector
            .loops
            .iter()
            .flat_map(|(a, b)| [a.clone(), b.clone()])
            .collect();
        for pin in &loop_pins {
            connector.activate_pin(pin, None);
        }

        debug!(
            designator = %connector.designator,
            pincount = connector.pincount,
            loops = connector.loops.len(),
            "Built connector"
        );
        Ok(connector)
    }

    /// Build from a raw configuration mapping
    pub fn from_value(designator: impl Into<String>, value: serde_json::Value) -> Result<Self> {
        let designator = designator.into();
        let config = serde_json::from_value(value).map_err(|source| HarnessError::InvalidConfig {
            designator: designator.clone(),
            source,
        })?;
        Self::from_config(designator, config)
    }

    /// Mark a pin visible and record which side a connection lands on
    pub fn activate_pin(&mut self, pin: &Pin, side: Option<Side>) {
        trace!(designator = %self.designator, %pin, ?side, "Activating pin");
        self.visible_pins.insert(pin.clone(), true);
        match side {
            Some(Side::Left) => self.ports_left = true,
            Some(Side::Right) => self.ports_right = true,
            None => {}
        }
    }

    pub fn is_simple(&self) -> bool {
        self.style == Some(ConnectorStyle::Simple)
    }

    pub fn visible_pins(&self) -> &IndexMap<Pin, bool> {
        &self.visible_pins
    }

    pub fn is_visible(&self, pin: &Pin) -> bool {
        self.visible_pins.get(pin).copied().unwrap_or(false)
    }

    /// Number of pins activated so far
    pub fn populated_count(&self) -> usize {
        self.visible_pins.values().filter(|v| **v).count()
    }

    /// True once any connection lands on the left side
    pub fn ports_left(&self) -> bool {
        self.ports_left
    }

    /// True once any connection leaves from the right side
    pub fn ports_right(&self) -> bool {
        self.ports_right
    }

    /// Zero-based position of a pin
    pub fn pin_index(&self, pin: &Pin) -> Option<usize> {
        self.pins.iter().position(|p| p == pin)
    }

    /// Label of a pin, if one was given for its position
    pub fn pinlabel(&self, pin: &Pin) -> Option<&str> {
        self.pin_index(pin)
            .and_then(|i| self.pinlabels.get(i))
            .map(String::as_str)
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

impl QuantitySource for Connector {
    fn designator(&self) -> &str {
        &self.designator
    }

    fn qty_multiplier(&self, key: Option<&str>) -> Result<f64> {
        let populated = self.populated_count();
        let value = match parse_key::<ConnectorMultiplier>(&self.designator, key)? {
            None => 1,
            Some(ConnectorMultiplier::Pincount) => self.pincount,
            Some(ConnectorMultiplier::Populated) => populated,
            Some(ConnectorMultiplier::Unpopulated) => self.pincount.saturating_sub(populated),
        };
        Ok(value as f64)
    }
}
