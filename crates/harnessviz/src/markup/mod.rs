//! Graphviz HTML-like label markup
//!
//! [`table`] knows the generic nested layout, [`fragments`] builds the
//! recurring cells and [`node`] assembles full connector and cable labels.

pub mod fragments;
pub mod node;
pub mod table;

pub use fragments::{bgcolor_attr, caption_cell, colorbar_cell, image_cell, title_cell};
pub use node::{
    cable_label, cable_node, connector_label, connector_node, node_statement, NodeContext,
};
pub use table::{nested_table, Cell, Row};
