//! Node labels for connectors and cables
//!
//! Each entity becomes a column of rows (title, part numbers, properties,
//! pin or wire table, image, additional components, notes) rendered through
//! [`nested_table`].

use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::trace;

use super::fragments::{bgcolor_attr, caption_cell, colorbar_cell, image_cell, title_cell};
use super::table::{nested_table, render_attrs, Cell, Row};
use crate::bom::Bom;
use crate::core::colors::{color_hex, is_known_color, OUTLINE_COLOR};
use crate::core::units::{awg_equiv, mm2_equiv, AWG, MM2};
use crate::core::{
    format_number, line_breaks, remove_links, translate_color, ColorMode, Pin, Result,
};
use crate::model::{
    AdditionalComponent, Cable, Connector, Harness, Options, PartNumbers, QuantitySource, Shield,
    Tweak,
};

const HEADER_PN: &str = "P/N";
const HEADER_MPN: &str = "MPN";
const HEADER_SPN: &str = "SPN";

/// What a label needs besides the entity itself
#[derive(Debug, Clone, Copy)]
pub struct NodeContext<'a> {
    pub options: &'a Options,
    pub tweak: Option<&'a Tweak>,
    /// Needed for `#id` references in mini-BOM mode
    pub bom: Option<&'a Bom>,
    /// Needed to show pin labels and hide unnamed connectors in wire rows
    pub connectors: Option<&'a IndexMap<String, Connector>>,
}

impl<'a> NodeContext<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self {
            options,
            tweak: None,
            bom: None,
            connectors: None,
        }
    }

    /// Context drawing options, tweaks and connectors from a harness
    pub fn for_harness(harness: &'a Harness, bom: Option<&'a Bom>) -> Self {
        Self {
            options: &harness.options,
            tweak: Some(&harness.tweak),
            bom,
            connectors: Some(harness.connectors()),
        }
    }

    pub fn with_bom(mut self, bom: &'a Bom) -> Self {
        self.bom = Some(bom);
        self
    }

    fn color_mode(&self) -> ColorMode {
        self.options.color_mode
    }
}

/// `name: number`, `header: number` or just `name`; `None` if both are absent
fn pn_info(header: &str, name: Option<&str>, number: Option<&str>) -> Option<String> {
    let name = name.filter(|s| !s.is_empty());
    let number = number.filter(|s| !s.is_empty());
    match (name, number) {
        (None, None) => None,
        (name, Some(number)) => Some(format!("{}: {}", name.unwrap_or(header), number)),
        (Some(name), None) => Some(name.to_string()),
    }
}

fn part_number_cells(parts: &PartNumbers) -> Row {
    Row::cells([
        pn_info(HEADER_PN, None, parts.pn.as_deref().map(remove_links).as_deref()),
        pn_info(HEADER_MPN, parts.manufacturer.as_deref(), parts.mpn.as_deref())
            .map(|s| line_breaks(&s)),
        pn_info(HEADER_SPN, parts.supplier.as_deref(), parts.spn.as_deref())
            .map(|s| line_breaks(&s)),
    ])
}

fn text_cell(text: Option<&str>) -> Option<Cell> {
    text.filter(|t| !t.is_empty()).map(|t| Cell::new(line_breaks(t)))
}

fn color_name(color: Option<&str>, mode: ColorMode) -> Option<Cell> {
    color
        .filter(|c| !c.is_empty())
        .map(|c| Cell::new(translate_color(c, mode)))
}

/// Single-cell table line for an additional component
fn component_entry(
    text: &str,
    qty: f64,
    unit: Option<&str>,
    bgcolor: Option<&str>,
    parts: Option<&PartNumbers>,
) -> String {
    let mut output = format_number(qty);
    if let Some(unit) = unit.filter(|u| !u.is_empty()) {
        output.push(' ');
        output.push_str(unit);
    }
    output.push_str(" x ");
    output.push_str(text);

    if let Some(parts) = parts {
        let details: Vec<String> = [
            parts.pn.as_deref().map(|pn| format!("{}: {}", HEADER_PN, pn)),
            pn_info(HEADER_MPN, parts.manufacturer.as_deref(), parts.mpn.as_deref()),
            pn_info(HEADER_SPN, parts.supplier.as_deref(), parts.spn.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !details.is_empty() {
            output.push_str("<br/>");
            output.push_str(&details.join(", "));
        }
    }

    let attrs = render_attrs(
        bgcolor_attr(bgcolor)
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str())),
    );
    format!(
        "<table border=\"0\" cellspacing=\"0\" cellpadding=\"3\" cellborder=\"1\"><tr>\n   <td align=\"left\" balign=\"left\"{}>{}</td>\n</tr></table>",
        attrs,
        line_breaks(&output)
    )
}

fn component_rows<S: QuantitySource>(
    owner: &S,
    parts: &[AdditionalComponent],
    ctx: &NodeContext<'_>,
) -> Result<Vec<Option<Row>>> {
    if parts.is_empty() {
        return Ok(Vec::new());
    }
    let mut rows = vec![Some(Row::cells([Some("Additional components")]))];
    for part in parts {
        let qty = part.qty * owner.qty_multiplier(part.multiplier_key())?;
        let mini_id = ctx
            .options
            .mini_bom_mode
            .then_some(ctx.bom)
            .flatten()
            .and_then(|bom| bom.component_id(part));
        let entry = match mini_id {
            Some(id) => component_entry(
                &format!("#{} ({})", id, part.type_.trim_end()),
                qty,
                part.unit.as_deref(),
                part.bgcolor.as_deref(),
                None,
            ),
            None => component_entry(
                &part.description(),
                qty,
                part.unit.as_deref(),
                part.bgcolor.as_deref(),
                Some(&part.part_numbers()),
            ),
        };
        rows.push(Some(Row::Single(Cell::new(entry))));
    }
    Ok(rows)
}

fn pin_table(connector: &Connector, mode: ColorMode) -> String {
    let mut lines =
        vec!["<table border=\"0\" cellspacing=\"0\" cellpadding=\"3\" cellborder=\"1\">".to_string()];
    for (index, pin) in connector.pins.iter().enumerate() {
        if connector.hide_disconnected_pins && !connector.is_visible(pin) {
            continue;
        }
        let port = index + 1;
        lines.push("   <tr>".to_string());
        let row_start = lines.len();
        if connector.ports_left() {
            lines.push(format!("    <td port=\"p{}l\">{}</td>", port, pin));
        }
        if let Some(label) = connector.pinlabels.get(index).filter(|l| !l.is_empty()) {
            lines.push(format!("    <td>{}</td>", label));
        }
        if !connector.pincolors.is_empty() {
            match connector.pincolors.get(index).filter(|c| is_known_color(c)) {
                Some(color) => {
                    lines.push(format!(
                        "    <td sides=\"tbl\">{}</td>",
                        translate_color(color, mode)
                    ));
                    lines.push("    <td sides=\"tbr\">".to_string());
                    lines.push("     <table border=\"0\" cellborder=\"1\"><tr>".to_string());
                    lines.push(format!(
                        "      <td bgcolor=\"{}\" width=\"8\" height=\"8\" fixedsize=\"true\"></td>",
                        translate_color(color, ColorMode::hex())
                    ));
                    lines.push("     </tr></table>".to_string());
                    lines.push("    </td>".to_string());
                }
                None => lines.push("    <td colspan=\"2\"></td>".to_string()),
            }
        }
        if connector.ports_right() {
            lines.push(format!("    <td port=\"p{}r\">{}</td>", port, pin));
        }
        // unconnected pins without labels or colors still need a cell
        if lines.len() == row_start {
            lines.push(format!("    <td>{}</td>", pin));
        }
        lines.push("   </tr>".to_string());
    }
    lines.push("  </table>".to_string());
    lines.join("\n")
}

/// Label body for a connector node
pub fn connector_label(connector: &Connector, ctx: &NodeContext<'_>) -> Result<String> {
    let mode = ctx.color_mode();
    let mut rows = vec![
        Some(Row::Cells(vec![connector.show_name.then(|| {
            title_cell(
                remove_links(&connector.designator),
                connector.bgcolor_title.as_deref(),
            )
        })])),
        Some(part_number_cells(&connector.part_numbers())),
        Some(Row::Cells(vec![
            text_cell(connector.type_.as_deref()),
            text_cell(connector.subtype.as_deref()),
            connector
                .show_pincount
                .then(|| Cell::new(format!("{}-pin", connector.pincount))),
            color_name(connector.color.as_deref(), mode),
            colorbar_cell(connector.color.as_deref()),
        ])),
        (!connector.is_simple()).then(|| Row::Single(Cell::new(pin_table(connector, mode)))),
        Some(Row::Cells(vec![image_cell(connector.image.as_ref())])),
        Some(Row::Cells(vec![caption_cell(connector.image.as_ref())])),
    ];
    rows.extend(component_rows(
        connector,
        &connector.additional_components,
        ctx,
    )?);
    rows.push(Some(Row::Cells(vec![text_cell(connector.notes.as_deref())])));

    let bgcolor = connector
        .bgcolor
        .as_deref()
        .unwrap_or(&ctx.options.bgcolor_connector);
    trace!(designator = %connector.designator, rows = rows.len(), "Assembled connector label");
    Ok(render(&rows, Some(bgcolor)))
}

fn render(rows: &[Option<Row>], bgcolor: Option<&str>) -> String {
    let table_attrs = bgcolor_attr(bgcolor);
    let attrs: Vec<(&str, &str)> = table_attrs
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    nested_table(rows, &attrs)
}

/// Text shown next to a wire for the connector pin it lands on
fn endpoint_text(ctx: &NodeContext<'_>, name: &str, pin: &Pin) -> String {
    let Some(connector) = ctx.connectors.and_then(|c| c.get(name)) else {
        return format!("{}:{}", name, pin);
    };
    if !connector.show_name {
        return String::new();
    }
    let mut parts = vec![name.to_string(), pin.to_string()];
    if let Some(label) = connector.pinlabel(pin).filter(|l| !l.is_empty()) {
        parts.push(label.to_string());
    }
    parts.join(":")
}

fn wire_table(cable: &Cable, ctx: &NodeContext<'_>) -> String {
    let mode = ctx.color_mode();

    // first connection per wire end wins
    let mut ends: HashMap<(String, bool), String> = HashMap::new();
    for connection in cable.connections() {
        let wire = connection.via.to_string();
        if let (Some(name), Some(pin)) = (&connection.from_name, &connection.from_pin) {
            ends.entry((wire.clone(), true))
                .or_insert_with(|| endpoint_text(ctx, name, pin));
        }
        if let (Some(name), Some(pin)) = (&connection.to_name, &connection.to_pin) {
            ends.entry((wire, false))
                .or_insert_with(|| endpoint_text(ctx, name, pin));
        }
    }
    let end = |wire: &str, left: bool| {
        ends.get(&(wire.to_string(), left))
            .cloned()
            .unwrap_or_default()
    };

    let pad = cable.colors.iter().any(|c| c.len() > 2);
    let mut lines = vec![
        "<table border=\"0\" cellspacing=\"0\" cellborder=\"0\">".to_string(),
        "   <tr><td>&nbsp;</td></tr>".to_string(),
    ];

    for (index, wire_color) in cable.colors.iter().enumerate() {
        let number = index + 1;
        let key = number.to_string();

        let mut info = Vec::new();
        if cable.show_wirenumbers {
            info.push(key.clone());
        }
        let color_text = translate_color(wire_color, mode);
        if !color_text.is_empty() {
            info.push(color_text);
        }
        if !cable.wirelabels.is_empty() {
            info.push(cable.wirelabels.get(index).cloned().unwrap_or_default());
        }

        lines.push("   <tr>".to_string());
        lines.push(format!("    <td>{}</td>", end(&key, true)));
        lines.push("    <td>".to_string());
        lines.push(format!("     {}", info.join(":")));
        lines.push("    </td>".to_string());
        lines.push(format!("    <td>{}</td>", end(&key, false)));
        lines.push("   </tr>".to_string());

        let mut stripes = vec![OUTLINE_COLOR.to_string()];
        stripes.extend(color_hex(wire_color, pad));
        stripes.push(OUTLINE_COLOR.to_string());
        lines.push("   <tr>".to_string());
        lines.push(format!(
            "    <td colspan=\"3\" border=\"0\" cellspacing=\"0\" cellpadding=\"0\" port=\"w{}\" height=\"{}\">",
            number,
            2 * stripes.len()
        ));
        lines.push("     <table cellspacing=\"0\" cellborder=\"0\" border=\"0\">".to_string());
        for stripe in stripes.iter().rev() {
            lines.push(format!(
                "      <tr><td colspan=\"3\" cellpadding=\"0\" height=\"2\" bgcolor=\"{}\" border=\"0\"></td></tr>",
                stripe
            ));
        }
        lines.push("     </table>".to_string());
        lines.push("    </td>".to_string());
        lines.push("   </tr>".to_string());

        if cable.is_bundle() {
            let parts = cable.wire_only_part_numbers(index);
            let details: Vec<String> = [
                pn_info(HEADER_PN, None, parts.pn.as_deref().map(remove_links).as_deref()),
                pn_info(HEADER_MPN, parts.manufacturer.as_deref(), parts.mpn.as_deref())
                    .map(|s| line_breaks(&s)),
                pn_info(HEADER_SPN, parts.supplier.as_deref(), parts.spn.as_deref())
                    .map(|s| line_breaks(&s)),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !details.is_empty() {
                lines.push("   <tr><td colspan=\"3\">".to_string());
                lines.push(
                    "    <table border=\"0\" cellspacing=\"0\" cellborder=\"0\"><tr>".to_string(),
                );
                for detail in details {
                    lines.push(format!("     <td>{}</td>", detail));
                }
                lines.push("    </tr></table>".to_string());
                lines.push("   </td></tr>".to_string());
            }
        }
    }

    if cable.shield.is_present() {
        lines.push("   <tr><td>&nbsp;</td></tr>".to_string());
        lines.push("   <tr>".to_string());
        lines.push(format!("    <td>{}</td>", end(crate::core::SHIELD, true)));
        lines.push("    <td>Shield</td>".to_string());
        lines.push(format!("    <td>{}</td>", end(crate::core::SHIELD, false)));
        lines.push("   </tr>".to_string());
        let attrs = match &cable.shield {
            Shield::Colored(color) => {
                let hex = color_hex(color, false).into_iter().next().unwrap_or_default();
                format!("height=\"6\" bgcolor=\"{}\" border=\"2\" sides=\"tb\"", hex)
            }
            _ => format!("height=\"2\" bgcolor=\"{}\" border=\"0\"", OUTLINE_COLOR),
        };
        lines.push(format!(
            "   <tr><td colspan=\"3\" cellpadding=\"0\" {} port=\"ws\"></td></tr>",
            attrs
        ));
    }

    lines.push("   <tr><td>&nbsp;</td></tr>".to_string());
    lines.push("  </table>".to_string());
    lines.join("\n")
}

fn gauge_text(cable: &Cable) -> Option<String> {
    let gauge = cable.gauge?;
    let unit = cable.gauge_unit.as_deref().unwrap_or(MM2);
    let equiv = if !cable.show_equiv {
        String::new()
    } else if unit == MM2 {
        format!(" ({} {})", awg_equiv(gauge), AWG)
    } else if unit == AWG {
        format!(" ({} {})", mm2_equiv(gauge), MM2)
    } else {
        String::new()
    };
    Some(format!("{} {}{}", format_number(gauge), unit, equiv))
}

/// Label body for a cable or bundle node
pub fn cable_label(cable: &Cable, ctx: &NodeContext<'_>) -> Result<String> {
    let mode = ctx.color_mode();
    let mut rows = vec![
        Some(Row::Cells(vec![cable.show_name.then(|| {
            title_cell(remove_links(&cable.designator), cable.bgcolor_title.as_deref())
        })])),
        Some(part_number_cells(&cable.part_numbers())),
        Some(Row::Cells(vec![
            text_cell(cable.type_.as_deref()),
            cable
                .show_wirecount
                .then(|| Cell::new(format!("{}x", cable.wirecount))),
            gauge_text(cable).map(Cell::new),
            cable.shield.is_present().then(|| Cell::new("+ S")),
            (cable.length > 0.0)
                .then(|| Cell::new(format!("{} {}", format_number(cable.length), cable.length_unit))),
            color_name(cable.color.as_deref(), mode),
            colorbar_cell(cable.color.as_deref()),
        ])),
        Some(Row::Single(Cell::new(wire_table(cable, ctx)))),
        Some(Row::Cells(vec![image_cell(cable.image.as_ref())])),
        Some(Row::Cells(vec![caption_cell(cable.image.as_ref())])),
    ];
    rows.extend(component_rows(cable, &cable.additional_components, ctx)?);
    rows.push(Some(Row::Cells(vec![text_cell(cable.notes.as_deref())])));

    let default_bgcolor = if cable.is_bundle() {
        &ctx.options.bgcolor_bundle
    } else {
        &ctx.options.bgcolor_cable
    };
    let bgcolor = cable.bgcolor.as_deref().unwrap_or(default_bgcolor);
    trace!(designator = %cable.designator, rows = rows.len(), "Assembled cable label");
    Ok(render(&rows, Some(bgcolor)))
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\\\""))
}

/// Graph node declaration wrapping a label
///
/// Overrides from `tweak` replace or add attributes; an override without a
/// value removes the attribute.
pub fn node_statement(designator: &str, label: &str, fillcolor: &str, tweak: Option<&Tweak>) -> String {
    let mut attrs: Vec<(String, String)> = vec![
        ("label".to_string(), format!("<\n{}\n>", label)),
        ("shape".to_string(), quote("box")),
        ("style".to_string(), quote("filled")),
        ("fillcolor".to_string(), quote(fillcolor)),
    ];
    for (name, value) in tweak.map(|t| t.overrides(designator)).unwrap_or_default() {
        let position = attrs.iter().position(|(n, _)| *n == name);
        match (position, value) {
            (Some(i), Some(value)) => attrs[i].1 = quote(&value),
            (None, Some(value)) => attrs.push((name, quote(&value))),
            (Some(i), None) => {
                attrs.remove(i);
            }
            (None, None) => {}
        }
    }
    let body: Vec<String> = attrs
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    format!("{} [{}]", quote(designator), body.join(", "))
}

fn node_fill(ctx: &NodeContext<'_>) -> String {
    translate_color(&ctx.options.bgcolor_node, ColorMode::hex())
}

/// Complete node declaration for a connector
pub fn connector_node(connector: &Connector, ctx: &NodeContext<'_>) -> Result<String> {
    let label = connector_label(connector, ctx)?;
    Ok(node_statement(
        &connector.designator,
        &label,
        &node_fill(ctx),
        ctx.tweak,
    ))
}

/// Complete node declaration for a cable or bundle
pub fn cable_node(cable: &Cable, ctx: &NodeContext<'_>) -> Result<String> {
    let label = cable_label(cable, ctx)?;
    Ok(node_statement(&cable.designator, &label, &node_fill(ctx), ctx.tweak))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pn_info() {
        assert_eq!(pn_info("MPN", None, None), None);
        assert_eq!(pn_info("MPN", None, Some("123")).as_deref(), Some("MPN: 123"));
        assert_eq!(
            pn_info("MPN", Some("Molex"), Some("123")).as_deref(),
            Some("Molex: 123")
        );
        assert_eq!(pn_info("MPN", Some("Molex"), None).as_deref(), Some("Molex"));
    }

    #[test]
    fn test_component_entry() {
        let parts = PartNumbers {
            pn: Some("A1".to_string()),
            ..Default::default()
        };
        let html = component_entry("Crimp", 4.0, None, None, Some(&parts));
        assert!(html.contains(">4 x Crimp<br/>P/N: A1</td>"));
        let html = component_entry("Sleeve", 0.5, Some("m"), Some("YE"), None);
        assert!(html.contains(" bgcolor=\"#ffff00\">0.5 m x Sleeve</td>"));
    }

    #[test]
    fn test_node_statement_overrides() {
        let tweak: Tweak = serde_json::from_str(
            r#"{"override": {"X1": {"shape": "record", "style": null, "penwidth": "2"}}}"#,
        )
        .unwrap();
        let statement = node_statement("X1", "<table></table>", "#ffffff", Some(&tweak));
        assert!(statement.starts_with("\"X1\" [label=<\n<table></table>\n>"));
        assert!(statement.contains("shape=\"record\""));
        assert!(!statement.contains("style="));
        assert!(statement.ends_with("penwidth=\"2\"]"));
    }
}
