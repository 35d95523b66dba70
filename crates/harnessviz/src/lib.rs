//! Harnessviz - describe wiring harnesses and derive their documentation
//!
//! A harness is a set of connectors and cables joined by connection sets.
//! This crate validates such a description, derives the implied data
//! (pin lists, wire colors, gauges, image sizes), merges a bill of materials
//! and produces the HTML-like node labels Graphviz renders.
//!
//! # Quick Start
//!
//! ```rust
//! use harnessviz::prelude::*;
//!
//! let document: HarnessDocument = serde_json::from_str(r#"{
//!     "connectors": {"X1": {"pincount": 2}, "X2": {"pincount": 2}},
//!     "cables": {"W1": {"wirecount": 2, "colors": ["RD", "BK"]}},
//!     "connections": [[{"X1": [1, 2]}, {"W1": [1, 2]}, {"X2": [1, 2]}]]
//! }"#).unwrap();
//!
//! let harness = Harness::from_document(document).unwrap();
//! let bom = Bom::from_harness(&harness).unwrap();
//! assert_eq!(bom.len(), 2);
//!
//! let nodes = harnessviz::render_nodes(&harness).unwrap();
//! assert!(nodes.contains("port=\"w1\""));
//! ```

pub mod bom;
pub mod core;
pub mod markup;
pub mod model;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bom::{Bom, BomEntry, BomKey};
    pub use crate::core::{ColorMode, HarnessError, OneOrMany, Pin, Result, Side};
    pub use crate::markup::{cable_node, connector_node, nested_table, Cell, NodeContext, Row};
    pub use crate::model::{
        AdditionalComponent, Cable, CableConfig, Connector, ConnectorConfig, Harness,
        HarnessDocument, Options, Shield,
    };
}

use crate::bom::Bom;
use crate::markup::{cable_node, connector_node, NodeContext};
use crate::model::Harness;

/// Node declarations for every connector and cable, one per line
///
/// The BOM is built first so that mini-BOM references resolve. Tweak
/// `append` statements follow the nodes.
pub fn render_nodes(harness: &Harness) -> Result<String> {
    let bom = Bom::from_harness(harness)?;
    let ctx = NodeContext::for_harness(harness, Some(&bom));

    let mut statements = Vec::new();
    for connector in harness.connectors().values() {
        statements.push(connector_node(connector, &ctx)?);
    }
    for cable in harness.cables().values() {
        statements.push(cable_node(cable, &ctx)?);
    }
    statements.extend(harness.tweak.append());

    tracing::debug!(statements = statements.len(), "Rendered node statements");
    Ok(statements.join("\n"))
}
