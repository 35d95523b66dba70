//! Harness domain model
//!
//! Entities are validated and fully derived when built from their
//! configuration; afterwards they only change through pin activation and
//! connections.

pub mod cable;
pub mod component;
pub mod connection;
pub mod connector;
pub mod document;
pub mod harness;
pub mod image;
pub mod multiplier;
pub mod options;

pub use cable::{Cable, CableConfig, Shield, BUNDLE};
pub use component::{AdditionalComponent, PartNumbers};
pub use connection::{Connection, Mate, MateComponent, MatePin};
pub use connector::{Connector, ConnectorConfig, ConnectorStyle};
pub use document::{ConnectionItem, HarnessDocument};
pub use harness::Harness;
pub use image::{aspect_ratio, Image, ImageConfig, ImageScale};
pub use multiplier::{CableMultiplier, ConnectorMultiplier, QuantitySource};
pub use options::{Metadata, Options, OptionsConfig, Tweak};
