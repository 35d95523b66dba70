//! Connection and mate records

use serde::Serialize;

use crate::core::{ArrowKind, Pin, Wire};

/// One wire of a cable and what each of its ends lands on
///
/// Either end may be open, in which case both its name and pin are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub from_name: Option<String>,
    pub from_pin: Option<Pin>,
    pub via: Wire,
    pub to_name: Option<String>,
    pub to_pin: Option<Pin>,
}

/// Direct pin-to-pin mate between two connectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatePin {
    pub from_name: String,
    pub from_pin: Pin,
    pub to_name: String,
    pub to_pin: Pin,
    pub shape: String,
}

/// Direct mate between two whole connectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MateComponent {
    pub from_name: String,
    pub to_name: String,
    pub shape: String,
}

/// A mate of either kind, in the order it was declared
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Mate {
    Pin(MatePin),
    Component(MateComponent),
}

impl Mate {
    pub fn kind(&self) -> ArrowKind {
        match self {
            Mate::Pin(_) => ArrowKind::Pin,
            Mate::Component(_) => ArrowKind::Component,
        }
    }

    pub fn shape(&self) -> &str {
        match self {
            Mate::Pin(m) => &m.shape,
            Mate::Component(m) => &m.shape,
        }
    }
}
