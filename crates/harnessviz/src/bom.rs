//! Bill of materials
//!
//! Every connector, cable (or bundle wire) and additional component becomes
//! a row. Rows that describe the same part are merged: quantities add up and
//! designators are collected.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::core::{clean_whitespace, format_number, remove_links, translate_color, Result};
use crate::model::{AdditionalComponent, Harness, PartNumbers, QuantitySource};

/// Identity of a BOM row: rows with equal keys are merged
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BomKey {
    pub description: String,
    pub unit: Option<String>,
    pub part_numbers: PartNumbers,
}

impl BomKey {
    fn new(description: &str, unit: Option<&str>, part_numbers: &PartNumbers) -> Self {
        Self {
            description: clean_whitespace(description),
            unit: unit.map(clean_whitespace).filter(|u| !u.is_empty()),
            part_numbers: part_numbers.map(clean_whitespace),
        }
    }

    /// Key under which an additional component appears in the BOM
    pub fn for_component(part: &AdditionalComponent) -> Self {
        Self::new(&part.description(), part.unit.as_deref(), &part.part_numbers())
    }
}

/// One merged BOM row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BomEntry {
    /// 1-based, in order of first occurrence
    pub id: usize,
    pub description: String,
    pub qty: f64,
    pub unit: Option<String>,
    pub designators: Vec<String>,
    #[serde(flatten)]
    pub part_numbers: PartNumbers,
}

/// Column headers for the identification fields, in output order
const PART_COLUMNS: [&str; 5] = ["P/N", "Manufacturer", "MPN", "Supplier", "SPN"];

fn part_column(part_numbers: &PartNumbers, column: usize) -> Option<&str> {
    match column {
        0 => part_numbers.pn.as_deref(),
        1 => part_numbers.manufacturer.as_deref(),
        2 => part_numbers.mpn.as_deref(),
        3 => part_numbers.supplier.as_deref(),
        _ => part_numbers.spn.as_deref(),
    }
}

struct RawRow {
    key: BomKey,
    qty: f64,
    designator: Option<String>,
}

/// Collects rows before merging
#[derive(Default)]
struct RowCollector {
    rows: Vec<RawRow>,
}

impl RowCollector {
    fn push(
        &mut self,
        description: &str,
        qty: f64,
        unit: Option<&str>,
        designator: Option<&str>,
        part_numbers: &PartNumbers,
    ) {
        self.rows.push(RawRow {
            key: BomKey::new(description, unit, part_numbers),
            qty,
            designator: designator.map(str::to_string),
        });
    }

    fn push_components<S: QuantitySource>(
        &mut self,
        owner: &S,
        parts: &[AdditionalComponent],
        designator: Option<&str>,
    ) -> Result<()> {
        for part in parts {
            let qty = part.qty * owner.qty_multiplier(part.multiplier_key())?;
            self.push(
                &part.description(),
                qty,
                part.unit.as_deref(),
                designator,
                &part.part_numbers(),
            );
        }
        Ok(())
    }
}

/// Appends `, text` when `text` is present and not empty
fn push_field(description: &mut String, text: Option<&str>) {
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        description.push_str(", ");
        description.push_str(text);
    }
}

fn round_qty(qty: f64) -> f64 {
    (qty * 1000.0).round() / 1000.0
}

/// A merged bill of materials
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bom {
    entries: Vec<BomEntry>,
}

impl Bom {
    /// Collect and merge the BOM rows of a harness
    pub fn from_harness(harness: &Harness) -> Result<Self> {
        let mode = harness.options.color_mode;
        let color = |c: Option<&str>| c.filter(|c| !c.is_empty()).map(|c| translate_color(c, mode));
        let mut rows = RowCollector::default();

        for connector in harness.connectors().values() {
            let designator = connector
                .show_name
                .then_some(connector.designator.as_str());
            if !connector.ignore_in_bom {
                let mut description = "Connector".to_string();
                push_field(&mut description, connector.type_.as_deref());
                push_field(&mut description, connector.subtype.as_deref());
                if connector.show_pincount {
                    push_field(&mut description, Some(&format!("{} pins", connector.pincount)));
                }
                push_field(&mut description, color(connector.color.as_deref()).as_deref());
                rows.push(&description, 1.0, None, designator, &connector.part_numbers());
            }
            rows.push_components(connector, &connector.additional_components, designator)?;
        }

        for cable in harness.cables().values() {
            let designator = cable.show_name.then_some(cable.designator.as_str());
            let gauge = cable.gauge.map(|g| {
                format!(
                    "{} {}",
                    format_number(g),
                    cable.gauge_unit.as_deref().unwrap_or_default()
                )
            });
            if !cable.ignore_in_bom && !cable.is_bundle() {
                let mut description = "Cable".to_string();
                push_field(&mut description, cable.type_.as_deref());
                description.push_str(&format!(", {}", cable.wirecount));
                match &gauge {
                    Some(gauge) => description.push_str(&format!(" x {}", gauge)),
                    None => description.push_str(" wires"),
                }
                if cable.shield.is_present() {
                    description.push_str(" shielded");
                }
                push_field(&mut description, color(cable.color.as_deref()).as_deref());
                rows.push(
                    &description,
                    cable.length,
                    Some(&cable.length_unit),
                    designator,
                    &cable.part_numbers(),
                );
            } else if !cable.ignore_in_bom {
                for (index, wire_color) in cable.colors.iter().enumerate() {
                    let mut description = "Wire".to_string();
                    push_field(&mut description, cable.type_.as_deref());
                    push_field(&mut description, gauge.as_deref());
                    push_field(&mut description, color(Some(wire_color)).as_deref());
                    rows.push(
                        &description,
                        cable.length,
                        Some(&cable.length_unit),
                        designator,
                        &cable.wire_part_numbers(index),
                    );
                }
            }
            rows.push_components(cable, &cable.additional_components, designator)?;
        }

        for item in harness.additional_bom_items() {
            rows.push(
                &item.description(),
                item.qty,
                item.unit.as_deref(),
                None,
                &item.part_numbers(),
            );
        }

        let collected = rows.rows.len();
        let bom = Self::merge(rows.rows);
        debug!(rows = collected, entries = bom.entries.len(), "Built BOM");
        Ok(bom)
    }

    fn merge(rows: Vec<RawRow>) -> Self {
        let mut merged: IndexMap<BomKey, (f64, BTreeSet<String>)> = IndexMap::new();
        for row in rows {
            let (qty, designators) = merged.entry(row.key).or_default();
            *qty += row.qty;
            designators.extend(row.designator);
        }
        let entries = merged
            .into_iter()
            .enumerate()
            .map(|(index, (key, (qty, designators)))| BomEntry {
                id: index + 1,
                description: key.description,
                qty: round_qty(qty),
                unit: key.unit,
                designators: designators.into_iter().collect(),
                part_numbers: key.part_numbers,
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[BomEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry a key was merged into
    pub fn find(&self, key: &BomKey) -> Option<&BomEntry> {
        self.entries.iter().find(|entry| {
            entry.description == key.description
                && entry.unit == key.unit
                && entry.part_numbers == key.part_numbers
        })
    }

    /// BOM id of an additional component
    pub fn component_id(&self, part: &AdditionalComponent) -> Option<usize> {
        self.find(&BomKey::for_component(part)).map(|entry| entry.id)
    }

    /// Tab-separated table with a header row
    ///
    /// Identification columns appear only when some row uses them.
    /// Hyperlinks are reduced to their text.
    pub fn to_tsv(&self) -> String {
        let columns: Vec<usize> = (0..PART_COLUMNS.len())
            .filter(|&c| {
                self.entries
                    .iter()
                    .any(|e| part_column(&e.part_numbers, c).is_some())
            })
            .collect();

        let mut header = vec!["Id", "Description", "Qty", "Unit", "Designators"];
        header.extend(columns.iter().map(|&c| PART_COLUMNS[c]));

        let mut out = header.join("\t");
        out.push('\n');
        for entry in &self.entries {
            let mut fields = vec![
                entry.id.to_string(),
                entry.description.clone(),
                format_number(entry.qty),
                entry.unit.clone().unwrap_or_default(),
                entry.designators.join(", "),
            ];
            fields.extend(
                columns
                    .iter()
                    .map(|&c| part_column(&entry.part_numbers, c).unwrap_or_default().to_string()),
            );
            let line: Vec<String> = fields.iter().map(|f| remove_links(f)).collect();
            out.push_str(&line.join("\t"));
            out.push('\n');
        }
        out
    }
}
