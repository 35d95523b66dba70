//! Cables and bundles: gauge, length, wire colors and connections

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::colors::color_code;
use crate::core::units::{parse_gauge, parse_length, Quantity};
use crate::core::{de, HarnessError, OneOrMany, Pin, Result, Wire, SHIELD};
use crate::model::component::{AdditionalComponent, PartNumbers};
use crate::model::connection::Connection;
use crate::model::image::{Image, ImageConfig};
use crate::model::multiplier::{parse_key, CableMultiplier, QuantitySource};

/// Category value that turns a cable into a bundle of loose wires
pub const BUNDLE: &str = "bundle";

/// Cable shield
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ShieldValue")]
pub enum Shield {
    #[default]
    None,
    /// Drawn as a thin black wire
    Plain,
    /// Drawn in the given color
    Colored(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ShieldValue {
    Flag(bool),
    Color(String),
}

impl From<ShieldValue> for Shield {
    fn from(value: ShieldValue) -> Self {
        match value {
            ShieldValue::Flag(true) => Shield::Plain,
            ShieldValue::Flag(false) => Shield::None,
            ShieldValue::Color(c) if c.is_empty() => Shield::None,
            ShieldValue::Color(c) => Shield::Colored(c),
        }
    }
}

impl Shield {
    pub fn is_present(&self) -> bool {
        !matches!(self, Shield::None)
    }
}

/// Cable or bundle as written in configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CableConfig {
    pub bgcolor: Option<String>,
    pub bgcolor_title: Option<String>,
    #[serde(deserialize_with = "de::opt_text_or_list")]
    pub manufacturer: Option<OneOrMany<String>>,
    #[serde(deserialize_with = "de::opt_text_or_list")]
    pub mpn: Option<OneOrMany<String>>,
    #[serde(deserialize_with = "de::opt_text_or_list")]
    pub supplier: Option<OneOrMany<String>>,
    #[serde(deserialize_with = "de::opt_text_or_list")]
    pub spn: Option<OneOrMany<String>>,
    #[serde(deserialize_with = "de::opt_text_or_list")]
    pub pn: Option<OneOrMany<String>>,
    pub category: Option<String>,
    #[serde(rename = "type", deserialize_with = "de::opt_text")]
    pub type_: Option<String>,
    pub gauge: Option<Quantity>,
    pub gauge_unit: Option<String>,
    pub show_equiv: bool,
    pub length: Option<Quantity>,
    pub length_unit: Option<String>,
    pub color: Option<String>,
    pub wirecount: Option<usize>,
    pub shield: Shield,
    pub image: Option<ImageConfig>,
    #[serde(deserialize_with = "de::opt_text")]
    pub notes: Option<String>,
    #[serde(deserialize_with = "de::text_list")]
    pub colors: Vec<String>,
    #[serde(deserialize_with = "de::text_list")]
    pub wirelabels: Vec<String>,
    pub color_code: Option<String>,
    pub show_name: Option<bool>,
    pub show_wirecount: Option<bool>,
    pub show_wirenumbers: Option<bool>,
    pub ignore_in_bom: bool,
    pub additional_components: Vec<AdditionalComponent>,
}

/// A validated cable or bundle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cable {
    pub designator: String,
    pub bgcolor: Option<String>,
    pub bgcolor_title: Option<String>,
    pub manufacturer: Option<OneOrMany<String>>,
    pub mpn: Option<OneOrMany<String>>,
    pub supplier: Option<OneOrMany<String>>,
    pub spn: Option<OneOrMany<String>>,
    pub pn: Option<OneOrMany<String>>,
    pub category: Option<String>,
    pub type_: Option<String>,
    pub gauge: Option<f64>,
    pub gauge_unit: Option<String>,
    pub show_equiv: bool,
    pub length: f64,
    pub length_unit: String,
    pub color: Option<String>,
    pub wirecount: usize,
    pub shield: Shield,
    pub image: Option<Image>,
    pub notes: Option<String>,
    pub colors: Vec<String>,
    pub wirelabels: Vec<String>,
    pub color_code: Option<String>,
    pub show_name: bool,
    pub show_wirecount: bool,
    pub show_wirenumbers: bool,
    pub ignore_in_bom: bool,
    pub additional_components: Vec<AdditionalComponent>,
    connections: Vec<Connection>,
}

fn cycle_to(palette: &[String], count: usize) -> Vec<String> {
    palette.iter().cycle().take(count).cloned().collect()
}

impl Cable {
    /// Validate a configuration and derive gauge, length and wire colors
    pub fn from_config(designator: impl Into<String>, config: CableConfig) -> Result<Self> {
        let designator = designator.into();
        let is_bundle = config.category.as_deref() == Some(BUNDLE);

        let (gauge, gauge_unit) = match &config.gauge {
            None => (None, None),
            Some(raw) => {
                let (value, unit) = parse_gauge(raw, config.gauge_unit.as_deref()).ok_or_else(|| {
                    HarnessError::config(
                        &designator,
                        format!(
                            "gauge={} - Gauge must be a number, or number and unit separated by a space",
                            quantity_text(raw)
                        ),
                    )
                })?;
                (Some(value), Some(unit))
            }
        };

        let length = config.length.clone().unwrap_or(Quantity::Number(0.0));
        let (length, length_unit) =
            parse_length(&length, config.length_unit.as_deref()).ok_or_else(|| {
                HarnessError::config(
                    &designator,
                    format!(
                        "length={} - Length must be a number, or number and unit separated by a space",
                        quantity_text(&length)
                    ),
                )
            })?;

        let palette = match config.color_code.as_deref() {
            Some(name) => Some(
                color_code(name)
                    .ok_or_else(|| HarnessError::unknown_color_code(&designator, name))?,
            ),
            None => None,
        };

        let (wirecount, colors) = match config.wirecount.filter(|n| *n > 0) {
            Some(count) => {
                let colors = if !config.colors.is_empty() {
                    cycle_to(&config.colors, count)
                } else if let Some(palette) = palette {
                    let palette: Vec<String> = palette.iter().map(|c| c.to_string()).collect();
                    cycle_to(&palette, count)
                } else {
                    vec![String::new(); count]
                };
                (count, colors)
            }
            None if config.colors.is_empty() => {
                return Err(HarnessError::config(
                    &designator,
                    "Unknown number of wires. Must specify wirecount or colors (implicit length)",
                ));
            }
            None => (config.colors.len(), config.colors),
        };

        if config.shield.is_present() && config.wirelabels.iter().any(|l| l == SHIELD) {
            return Err(HarnessError::config(
                &designator,
                "\"s\" may not be used as a wire label for a shielded cable",
            ));
        }

        for field in [
            &config.manufacturer,
            &config.mpn,
            &config.supplier,
            &config.spn,
            &config.pn,
        ]
        .into_iter()
        .flatten()
        {
            if !field.is_many() {
                continue;
            }
            if !is_bundle {
                return Err(HarnessError::config(
                    &designator,
                    "Lists of part data are only supported for bundles",
                ));
            }
            if field.len() != wirecount {
                return Err(HarnessError::config(
                    &designator,
                    "Lists of part data must match wirecount",
                ));
            }
        }

        for part in &config.additional_components {
            parse_key::<CableMultiplier>(&designator, part.multiplier_key())?;
        }

        let show_name = config
            .show_name
            .unwrap_or_else(|| !designator.starts_with("__"));

        let cable = Self {
            bgcolor: config.bgcolor,
            bgcolor_title: config.bgcolor_title,
            manufacturer: config.manufacturer,
            mpn: config.mpn,
            supplier: config.supplier,
            spn: config.spn,
            pn: config.pn,
            category: config.category,
            type_: config.type_,
            gauge,
            gauge_unit,
            show_equiv: config.show_equiv,
            length,
            length_unit,
            color: config.color,
            wirecount,
            shield: config.shield,
            image: config.image.map(Image::from_config),
            notes: config.notes,
            colors,
            wirelabels: config.wirelabels,
            color_code: config.color_code,
            show_name,
            show_wirecount: config.show_wirecount.unwrap_or(true),
            show_wirenumbers: config.show_wirenumbers.unwrap_or(!is_bundle),
            ignore_in_bom: config.ignore_in_bom,
            additional_components: config.additional_components,
            connections: Vec::new(),
            designator,
        };

        debug!(
            designator = %cable.designator,
            wirecount = cable.wirecount,
            bundle = is_bundle,
            "Built cable"
        );
        Ok(cable)
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

    pub fn is_bundle(&self) -> bool {
        self.category.as_deref() == Some(BUNDLE)
    }

    /// Record one connection per element of the pin lists
    ///
    /// Single values count as one-element lists. The from, via and to lists
    /// must all have the same length.
    pub fn connect(
        &mut self,
        from_name: Option<&str>,
        from_pin: OneOrMany<Option<Pin>>,
        via_wire: OneOrMany<Wire>,
        to_name: Option<&str>,
        to_pin: OneOrMany<Option<Pin>>,
    ) -> Result<()> {
        let from_pins = from_pin.into_vec();
        let wires = via_wire.into_vec();
        let to_pins = to_pin.into_vec();

        if from_pins.len() != to_pins.len() {
            return Err(HarnessError::config(
                &self.designator,
                "from_pin must have the same number of elements as to_pin",
            ));
        }
        if wires.len() != from_pins.len() {
            return Err(HarnessError::config(
                &self.designator,
                "via_wire must have the same number of elements as from_pin",
            ));
        }

        for ((from, via), to) in from_pins.into_iter().zip(wires).zip(to_pins) {
            trace!(cable = %self.designator, ?from_name, ?from, %via, ?to_name, ?to, "Connecting");
            self.connections.push(Connection {
                from_name: from_name.map(str::to_string),
                from_pin: from,
                via,
                to_name: to_name.map(str::to_string),
                to_pin: to,
            });
        }
        Ok(())
    }

    /// Connections in the order they were made
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Single-valued identification fields; per-wire lists are left out
    pub fn part_numbers(&self) -> PartNumbers {
        fn single(field: &Option<OneOrMany<String>>) -> Option<String> {
            match field {
                Some(OneOrMany::One(value)) => Some(value.clone()),
                _ => None,
            }
        }
        PartNumbers {
            pn: single(&self.pn),
            manufacturer: single(&self.manufacturer),
            mpn: single(&self.mpn),
            supplier: single(&self.supplier),
            spn: single(&self.spn),
        }
    }

    /// Identification fields of one bundle wire (zero-based index)
    ///
    /// List fields yield their entry for the wire; single values apply to
    /// every wire.
    pub fn wire_part_numbers(&self, index: usize) -> PartNumbers {
        let pick = |field: &Option<OneOrMany<String>>| match field {
            Some(OneOrMany::One(value)) => Some(value.clone()),
            Some(OneOrMany::Many(values)) => values.get(index).cloned(),
            None => None,
        };
        PartNumbers {
            pn: pick(&self.pn),
            manufacturer: pick(&self.manufacturer),
            mpn: pick(&self.mpn),
            supplier: pick(&self.supplier),
            spn: pick(&self.spn),
        }
    }

    /// Identification fields given per wire; empty for non-list fields
    pub fn wire_only_part_numbers(&self, index: usize) -> PartNumbers {
        let pick = |field: &Option<OneOrMany<String>>| match field {
            Some(OneOrMany::Many(values)) => values.get(index).cloned(),
            _ => None,
        };
        PartNumbers {
            pn: pick(&self.pn),
            manufacturer: pick(&self.manufacturer),
            mpn: pick(&self.mpn),
            supplier: pick(&self.supplier),
            spn: pick(&self.spn),
        }
    }
}

fn quantity_text(quantity: &Quantity) -> String {
    match quantity {
        Quantity::Number(n) => crate::core::format_number(*n),
        Quantity::Text(s) => s.clone(),
    }
}

impl QuantitySource for Cable {
    fn designator(&self) -> &str {
        &self.designator
    }

    fn qty_multiplier(&self, key: Option<&str>) -> Result<f64> {
        let value = match parse_key::<CableMultiplier>(&self.designator, key)? {
            None => 1.0,
            Some(CableMultiplier::Wirecount) => self.wirecount as f64,
            Some(CableMultiplier::Terminations) => self.connections.len() as f64,
            Some(CableMultiplier::Length) => self.length,
            Some(CableMultiplier::TotalLength) => self.length * self.wirecount as f64,
        };
        Ok(value)
    }
}
