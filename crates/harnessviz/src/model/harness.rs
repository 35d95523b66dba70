//! Harness container
//!
//! Owns every connector and cable under a shared designator namespace and
//! routes connections and mates to them, resolving pin labels and wire
//! colors along the way.

use indexmap::IndexMap;
use tracing::{debug, info, info_span, warn};

use crate::core::{arrow_kind, expand, ArrowKind, HarnessError, OneOrMany, Pin, Result, Side, Wire};
use crate::model::cable::Cable;
use crate::model::component::AdditionalComponent;
use crate::model::connection::{Mate, MateComponent, MatePin};
use crate::model::connector::Connector;
use crate::model::document::{ConnectionItem, HarnessDocument};
use crate::model::options::{Metadata, Options, Tweak};

/// Designator used in errors about harness-level BOM items
const BOM_ITEMS: &str = "additional_bom_items";

/// A complete harness: entities, connections and mates
#[derive(Debug, Clone, Default)]
pub struct Harness {
    pub metadata: Metadata,
    pub options: Options,
    pub tweak: Tweak,
    connectors: IndexMap<String, Connector>,
    cables: IndexMap<String, Cable>,
    mates: Vec<Mate>,
    additional_bom_items: Vec<AdditionalComponent>,
}

impl Harness {
    pub fn new(metadata: Metadata, options: Options, tweak: Tweak) -> Self {
        Self {
            metadata,
            options,
            tweak,
            ..Default::default()
        }
    }

    /// Build every entity of a document, then apply its connection sets
    pub fn from_document(document: HarnessDocument) -> Result<Self> {
        let span = info_span!(
            "build_harness",
            connectors = document.connectors.len(),
            cables = document.cables.len(),
            connection_sets = document.connections.len()
        );
        let _enter = span.enter();

        let mut harness = Self::new(document.metadata, document.options, document.tweak);

        for (designator, value) in document.connectors {
            let connector = Connector::from_value(designator, value)?;
            harness.add_connector(connector)?;
        }
        for (designator, value) in document.cables {
            let cable = Cable::from_value(designator, value)?;
            harness.add_cable(cable)?;
        }

        for (index, set) in document.connections.iter().enumerate() {
            debug!(set = index + 1, items = set.len(), "Applying connection set");
            harness.apply_connection_set(index, set)?;
        }

        for item in document.additional_bom_items {
            harness.add_bom_item(item)?;
        }

        info!(
            connectors = harness.connectors.len(),
            cables = harness.cables.len(),
            mates = harness.mates.len(),
            "Harness built"
        );
        Ok(harness)
    }

    fn ensure_free(&self, designator: &str) -> Result<()> {
        if self.connectors.contains_key(designator) || self.cables.contains_key(designator) {
            return Err(HarnessError::DuplicateDesignator {
                designator: designator.to_string(),
            });
        }
        Ok(())
    }

    pub fn add_connector(&mut self, connector: Connector) -> Result<()> {
        self.ensure_free(&connector.designator)?;
        self.connectors
            .insert(connector.designator.clone(), connector);
        Ok(())
    }

    pub fn add_cable(&mut self, cable: Cable) -> Result<()> {
        self.ensure_free(&cable.designator)?;
        self.cables.insert(cable.designator.clone(), cable);
        Ok(())
    }

    /// Add a harness-level BOM item; these have no owner to scale by
    pub fn add_bom_item(&mut self, item: AdditionalComponent) -> Result<()> {
        if let Some(key) = item.multiplier_key() {
            return Err(HarnessError::invalid_multiplier(BOM_ITEMS, key));
        }
        self.additional_bom_items.push(item);
        Ok(())
    }

    pub fn connector(&self, designator: &str) -> Option<&Connector> {
        self.connectors.get(designator)
    }

    pub fn cable(&self, designator: &str) -> Option<&Cable> {
        self.cables.get(designator)
    }

    pub fn connectors(&self) -> &IndexMap<String, Connector> {
        &self.connectors
    }

    pub fn cables(&self) -> &IndexMap<String, Cable> {
        &self.cables
    }

    pub fn mates(&self) -> &[Mate] {
        &self.mates
    }

    pub fn additional_bom_items(&self) -> &[AdditionalComponent] {
        &self.additional_bom_items
    }

    fn connector_mut(&mut self, designator: &str) -> Result<&mut Connector> {
        self.connectors
            .get_mut(designator)
            .ok_or_else(|| HarnessError::unknown_entity(designator))
    }

    /// Connect a wire of `via_name` between two optional connector pins
    ///
    /// Pins may be given by label and wires by color or label. The from pin
    /// is activated on the right side of its connector, the to pin on the
    /// left.
    pub fn connect(
        &mut self,
        from_name: Option<&str>,
        from_pin: Option<Pin>,
        via_name: &str,
        via_wire: Wire,
        to_name: Option<&str>,
        to_pin: Option<Pin>,
    ) -> Result<()> {
        let from_pin = self.resolve_end(from_name, from_pin)?;
        let to_pin = self.resolve_end(to_name, to_pin)?;

        let cable = self
            .cables
            .get_mut(via_name)
            .ok_or_else(|| HarnessError::unknown_entity(via_name))?;
        let via_wire = resolve_wire(cable, via_wire)?;
        cable.connect(
            from_name,
            OneOrMany::One(from_pin.clone()),
            OneOrMany::One(via_wire),
            to_name,
            OneOrMany::One(to_pin.clone()),
        )?;

        if let (Some(name), Some(pin)) = (from_name, &from_pin) {
            self.connector_mut(name)?.activate_pin(pin, Some(Side::Right));
        }
        if let (Some(name), Some(pin)) = (to_name, &to_pin) {
            self.connector_mut(name)?.activate_pin(pin, Some(Side::Left));
        }
        Ok(())
    }

    fn resolve_end(&self, name: Option<&str>, pin: Option<Pin>) -> Result<Option<Pin>> {
        match (name, pin) {
            (None, None) => Ok(None),
            (Some(name), Some(pin)) => {
                let connector = self
                    .connectors
                    .get(name)
                    .ok_or_else(|| HarnessError::unknown_entity(name))?;
                resolve_pin(connector, pin).map(Some)
            }
            (Some(name), None) => Err(HarnessError::config(name, "Connection end has no pin")),
            (None, Some(pin)) => Err(HarnessError::config(
                pin.to_string(),
                "Connection pin has no connector",
            )),
        }
    }

    /// Mate two connector pins directly
    pub fn add_mate_pin(
        &mut self,
        from_name: &str,
        from_pin: Pin,
        to_name: &str,
        to_pin: Pin,
        shape: impl Into<String>,
    ) -> Result<()> {
        let from_pin = self.resolve_end(Some(from_name), Some(from_pin))?;
        let to_pin = self.resolve_end(Some(to_name), Some(to_pin))?;
        let (Some(from_pin), Some(to_pin)) = (from_pin, to_pin) else {
            return Err(HarnessError::config(from_name, "Mate is missing a pin"));
        };

        self.connector_mut(from_name)?
            .activate_pin(&from_pin, Some(Side::Right));
        self.connector_mut(to_name)?
            .activate_pin(&to_pin, Some(Side::Left));
        self.mates.push(Mate::Pin(MatePin {
            from_name: from_name.to_string(),
            from_pin,
            to_name: to_name.to_string(),
            to_pin,
            shape: shape.into(),
        }));
        Ok(())
    }

    /// Mate two connectors as whole components
    pub fn add_mate_component(
        &mut self,
        from_name: &str,
        to_name: &str,
        shape: impl Into<String>,
    ) -> Result<()> {
        for name in [from_name, to_name] {
            if !self.connectors.contains_key(name) {
                return Err(HarnessError::unknown_entity(name));
            }
        }
        self.mates.push(Mate::Component(MateComponent {
            from_name: from_name.to_string(),
            to_name: to_name.to_string(),
            shape: shape.into(),
        }));
        Ok(())
    }

    fn apply_connection_set(&mut self, index: usize, set: &[ConnectionItem]) -> Result<()> {
        let label = format!("connection set {}", index + 1);
        let steps = set
            .iter()
            .map(|item| self.classify(&label, item))
            .collect::<Result<Vec<_>>>()?;

        check_alternation(&label, &steps)?;

        let count = steps
            .iter()
            .filter_map(Step::values)
            .map(Vec::len)
            .max()
            .unwrap_or(1)
            .max(1);
        for values in steps.iter().filter_map(Step::values) {
            if values.len() != 1 && values.len() != count {
                return Err(HarnessError::config(
                    &label,
                    "All items in a connection set must reference the same number of connections",
                ));
            }
        }

        for i in 0..count {
            for (k, step) in steps.iter().enumerate() {
                let prev = k.checked_sub(1).and_then(|p| steps.get(p));
                let next = steps.get(k + 1);
                match step {
                    Step::Cable { name, wires } => {
                        let (from_name, from_pin) = self.endpoint(&label, prev, i)?;
                        let (to_name, to_pin) = self.endpoint(&label, next, i)?;
                        self.connect(
                            from_name.as_deref(),
                            from_pin,
                            name,
                            pick(wires, i),
                            to_name.as_deref(),
                            to_pin,
                        )?;
                    }
                    Step::Arrow { shape, kind } => {
                        let (Some(Step::Connector { name: from, .. }), Some(Step::Connector { name: to, .. })) =
                            (prev, next)
                        else {
                            continue;
                        };
                        match kind {
                            ArrowKind::Pin => {
                                let from_pin = self.step_pin(&label, prev, i)?;
                                let to_pin = self.step_pin(&label, next, i)?;
                                self.add_mate_pin(from, from_pin, to, to_pin, shape.as_str())?;
                            }
                            ArrowKind::Component if i == 0 => {
                                self.add_mate_component(from, to, shape.as_str())?;
                            }
                            ArrowKind::Component => {}
                        }
                    }
                    Step::Connector { .. } => {}
                }
            }
        }
        Ok(())
    }

    fn classify(&self, label: &str, item: &ConnectionItem) -> Result<Step> {
        match item {
            ConnectionItem::Name(name) => {
                if let Some(kind) = arrow_kind(name) {
                    return Ok(Step::Arrow {
                        shape: name.trim().to_string(),
                        kind,
                    });
                }
                if self.connectors.contains_key(name) {
                    Ok(Step::Connector {
                        name: name.clone(),
                        pins: None,
                    })
                } else if self.cables.contains_key(name) {
                    Err(HarnessError::config(
                        name,
                        "Cables in a connection set must list their wires",
                    ))
                } else {
                    Err(HarnessError::unknown_entity(name))
                }
            }
            ConnectionItem::Entry(map) => {
                let mut entries = map.iter();
                let (Some((name, values)), None) = (entries.next(), entries.next()) else {
                    return Err(HarnessError::config(
                        label,
                        "Each connection set entry must have exactly one designator",
                    ));
                };
                let values = expand(values.clone().into_vec())
                    .map_err(|e| HarnessError::config(name, e.to_string()))?;
                if values.is_empty() {
                    return Err(HarnessError::config(name, "Empty pin or wire list"));
                }
                if self.connectors.contains_key(name) {
                    Ok(Step::Connector {
                        name: name.clone(),
                        pins: Some(values),
                    })
                } else if self.cables.contains_key(name) {
                    Ok(Step::Cable {
                        name: name.clone(),
                        wires: values,
                    })
                } else {
                    Err(HarnessError::unknown_entity(name))
                }
            }
        }
    }

    /// Connector name and pin next to a cable, if that neighbour is a connector
    fn endpoint(
        &self,
        label: &str,
        step: Option<&Step>,
        i: usize,
    ) -> Result<(Option<String>, Option<Pin>)> {
        match step {
            Some(Step::Connector { name, .. }) => {
                Ok((Some(name.clone()), Some(self.step_pin(label, step, i)?)))
            }
            _ => Ok((None, None)),
        }
    }

    /// Pin of a connector step for the `i`-th connection
    ///
    /// A connector listed without pins stands for its only pin.
    fn step_pin(&self, label: &str, step: Option<&Step>, i: usize) -> Result<Pin> {
        match step {
            Some(Step::Connector {
                pins: Some(pins), ..
            }) => Ok(pick(pins, i)),
            Some(Step::Connector { name, pins: None }) => {
                let connector = self
                    .connectors
                    .get(name)
                    .ok_or_else(|| HarnessError::unknown_entity(name))?;
                match connector.pins.as_slice() {
                    [only] => Ok(only.clone()),
                    _ => Err(HarnessError::config(
                        name,
                        "Connectors with more than one pin must list their pins in a connection set",
                    )),
                }
            }
            _ => Err(HarnessError::config(label, "Expected a connector")),
        }
    }
}

/// Item of a connection set after designators are looked up
#[derive(Debug)]
enum Step {
    Connector { name: String, pins: Option<Vec<Pin>> },
    Cable { name: String, wires: Vec<Wire> },
    Arrow { shape: String, kind: ArrowKind },
}

impl Step {
    fn values(&self) -> Option<&Vec<Pin>> {
        match self {
            Step::Connector { pins, .. } => pins.as_ref(),
            Step::Cable { wires, .. } => Some(wires),
            Step::Arrow { .. } => None,
        }
    }
}

/// Value `i` of a list, with one-element lists applying to every index
fn pick(values: &[Pin], i: usize) -> Pin {
    if values.len() == 1 {
        values[0].clone()
    } else {
        values[i].clone()
    }
}

/// Connectors must be separated by a cable or an arrow; arrows sit between connectors
fn check_alternation(label: &str, steps: &[Step]) -> Result<()> {
    for (k, step) in steps.iter().enumerate() {
        let prev = k.checked_sub(1).and_then(|p| steps.get(p));
        let next = steps.get(k + 1);
        match step {
            Step::Arrow { shape, .. } => {
                let between_connectors = matches!(prev, Some(Step::Connector { .. }))
                    && matches!(next, Some(Step::Connector { .. }));
                if !between_connectors {
                    return Err(HarnessError::config(
                        label,
                        format!("Arrow \"{}\" must sit between two connectors", shape),
                    ));
                }
            }
            Step::Connector { name, .. } => {
                if let Some(Step::Connector { name: other, .. }) = next {
                    return Err(HarnessError::config(
                        label,
                        format!("{} and {} must be separated by a cable or arrow", name, other),
                    ));
                }
            }
            Step::Cable { name, .. } => {
                if let Some(Step::Cable { name: other, .. }) = next {
                    return Err(HarnessError::config(
                        label,
                        format!("{} and {} must be separated by a connector", name, other),
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Map a pin label to its pin, rejecting ambiguous or unknown pins
fn resolve_pin(connector: &Connector, pin: Pin) -> Result<Pin> {
    let name = &connector.designator;
    let text = pin.to_string();
    let labelled: Vec<usize> = connector
        .pinlabels
        .iter()
        .enumerate()
        .filter(|(_, label)| **label == text)
        .map(|(i, _)| i)
        .collect();
    let position = connector.pin_index(&pin);

    if let (Some(position), Some(first)) = (position, labelled.first()) {
        if position != *first {
            return Err(HarnessError::config(
                name,
                format!("{}:{} is defined both in pinlabels and pins, for different pins", name, pin),
            ));
        }
    }
    match labelled.as_slice() {
        [] => {}
        [index] => return Ok(connector.pins[*index].clone()),
        _ => {
            return Err(HarnessError::config(
                name,
                format!("{}:{} is defined more than once", name, pin),
            ))
        }
    }
    if position.is_none() {
        return Err(HarnessError::config(
            name,
            format!("{}:{} not found", name, pin),
        ));
    }
    Ok(pin)
}

/// Map a wire color or label to its 1-based wire number
fn resolve_wire(cable: &Cable, wire: Wire) -> Result<Wire> {
    let name = &cable.designator;
    let text = match wire {
        Pin::Int(n) => {
            if n < 1 || n as usize > cable.wirecount {
                return Err(HarnessError::config(
                    name,
                    format!("{}:{} is not a valid wire number", name, n),
                ));
            }
            return Ok(Pin::Int(n));
        }
        Pin::Text(text) => text,
    };

    let by_color: Vec<usize> = positions(&cable.colors, &text);
    let by_label: Vec<usize> = positions(&cable.wirelabels, &text);
    if let (Some(c), Some(l)) = (by_color.first(), by_label.first()) {
        if c != l {
            return Err(HarnessError::config(
                name,
                format!(
                    "{}:{} is defined both in colors and wirelabels, for different wires",
                    name, text
                ),
            ));
        }
    }
    let matches = if by_color.is_empty() { by_label } else { by_color };
    match matches.as_slice() {
        [index] => Ok(Pin::from(index + 1)),
        [] if text == crate::core::SHIELD => {
            if cable.shield.is_present() {
                Ok(Pin::Text(text))
            } else {
                Err(HarnessError::config(name, format!("{} has no shield", name)))
            }
        }
        [] => Err(HarnessError::config(
            name,
            format!("{}:{} not found", name, text),
        )),
        _ => {
            warn!(cable = %name, wire = %text, "Wire reference matches several wires");
            Err(HarnessError::config(
                name,
                format!("{}:{} is used for more than one wire", name, text),
            ))
        }
    }
}

fn positions(list: &[String], text: &str) -> Vec<usize> {
    list.iter()
        .enumerate()
        .filter(|(_, item)| *item == text)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::cable::CableConfig;
    use crate::model::connector::ConnectorConfig;

    fn harness() -> Harness {
        let mut harness = Harness::default();
        harness
            .add_connector(
                Connector::from_config(
                    "X1",
                    ConnectorConfig {
                        pinlabels: vec!["GND".into(), "VCC".into(), "TX".into()],
                        ..Default::default()
                    },
                )
                .unwrap(),
            )
            .unwrap();
        harness
            .add_connector(
                Connector::from_config(
                    "X2",
                    ConnectorConfig {
                        pincount: Some(3),
                        ..Default::default()
                    },
                )
                .unwrap(),
            )
            .unwrap();
        harness
            .add_cable(
                Cable::from_config(
                    "W1",
                    CableConfig {
                        colors: vec!["BK".into(), "RD".into(), "BK".into()],
                        wirelabels: vec!["ground".into(), "power".into(), "data".into()],
                        ..Default::default()
                    },
                )
                .unwrap(),
            )
            .unwrap();
        harness
    }

    #[test]
    fn test_duplicate_designator_rejected() {
        let mut harness = harness();
        let cable = Cable::from_config(
            "X1",
            CableConfig {
                wirecount: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        let err = harness.add_cable(cable).unwrap_err();
        assert!(matches!(err, HarnessError::DuplicateDesignator { .. }));
    }

    #[test]
    fn test_connect_resolves_labels_and_colors() {
        let mut harness = harness();
        harness
            .connect(
                Some("X1"),
                Some(Pin::from("VCC")),
                "W1",
                Pin::from("RD"),
                Some("X2"),
                Some(Pin::Int(2)),
            )
            .unwrap();
        let connection = &harness.cable("W1").unwrap().connections()[0];
        assert_eq!(connection.from_pin, Some(Pin::Int(2)));
        assert_eq!(connection.via, Pin::Int(2));

        let x1 = harness.connector("X1").unwrap();
        assert!(x1.ports_right());
        assert!(!x1.ports_left());
        assert!(x1.is_visible(&Pin::Int(2)));
        assert!(harness.connector("X2").unwrap().ports_left());
    }

    #[test]
    fn test_ambiguous_color_needs_label() {
        let mut harness = harness();
        let err = harness
            .connect(Some("X1"), Some(Pin::Int(1)), "W1", Pin::from("BK"), None, None)
            .unwrap_err();
        assert!(err.to_string().contains("more than one wire"));

        harness
            .connect(Some("X1"), Some(Pin::Int(1)), "W1", Pin::from("data"), None, None)
            .unwrap();
        assert_eq!(harness.cable("W1").unwrap().connections()[0].via, Pin::Int(3));
    }

    #[test]
    fn test_unknown_pin_and_wire() {
        let mut harness = harness();
        assert!(harness
            .connect(Some("X1"), Some(Pin::Int(9)), "W1", Pin::Int(1), None, None)
            .is_err());
        assert!(harness
            .connect(Some("X1"), Some(Pin::Int(1)), "W1", Pin::Int(4), None, None)
            .is_err());
        assert!(harness
            .connect(Some("X1"), Some(Pin::Int(1)), "W1", Pin::from("s"), None, None)
            .is_err());
        assert!(harness
            .connect(Some("X9"), Some(Pin::Int(1)), "W1", Pin::Int(1), None, None)
            .is_err());
    }

    #[test]
    fn test_mates() {
        let mut harness = harness();
        harness
            .add_mate_pin("X1", Pin::from("TX"), "X2", Pin::Int(1), "-->")
            .unwrap();
        harness.add_mate_component("X1", "X2", "==>").unwrap();
        assert_eq!(harness.mates().len(), 2);
        assert_eq!(harness.mates()[0].kind(), ArrowKind::Pin);
        assert!(harness.connector("X1").unwrap().is_visible(&Pin::Int(3)));
        assert!(harness.add_mate_component("X1", "W1", "==").is_err());
    }

    #[test]
    fn test_bom_item_multiplier_rejected() {
        let mut harness = harness();
        let mut item = AdditionalComponent::new("Label");
        item.qty_multiplier = Some("pincount".to_string());
        assert!(harness.add_bom_item(item).is_err());
    }

    #[test]
    fn test_connection_set_broadcast() {
        let mut harness = harness();
        let set = vec![
            ConnectionItem::entry("X1", Pin::from("1-3")),
            ConnectionItem::entry("W1", Pin::from("1-3")),
            ConnectionItem::entry("X2", Pin::from("3-1")),
        ];
        harness.apply_connection_set(0, &set).unwrap();
        let connections = harness.cable("W1").unwrap().connections();
        assert_eq!(connections.len(), 3);
        assert_eq!(connections[0].to_pin, Some(Pin::Int(3)));
        assert_eq!(connections[2].to_pin, Some(Pin::Int(1)));
    }

    #[test]
    fn test_connection_set_alternation() {
        let mut harness = harness();
        let set = vec![
            ConnectionItem::entry("X1", Pin::Int(1)),
            ConnectionItem::entry("X2", Pin::Int(1)),
        ];
        assert!(harness.apply_connection_set(0, &set).is_err());

        let set = vec![
            ConnectionItem::Name("-->".to_string()),
            ConnectionItem::entry("X2", Pin::Int(1)),
        ];
        assert!(harness.apply_connection_set(0, &set).is_err());
    }
}
