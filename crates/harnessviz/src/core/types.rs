//! Core type definitions for harness processing
//!
//! Pin and wire identifiers, connection sides, and the one-or-many wrapper
//! used wherever configuration accepts a single value or a list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pin identifier: either a number or a free-form name
///
/// Wires use the same representation, with the text `"s"` reserved for the
/// cable shield.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pin {
    Int(i64),
    Text(String),
}

/// Wire identifier: a 1-based wire number, a color or label, or `"s"`
pub type Wire = Pin;

/// Zero-based position of a pin or wire once resolved
pub type PinIndex = usize;

/// Reserved wire identifier for the shield
pub const SHIELD: &str = "s";

impl Pin {
    /// Returns true if this identifier is the reserved shield token
    pub fn is_shield(&self) -> bool {
        matches!(self, Pin::Text(s) if s == SHIELD)
    }

    /// Numeric value, if this identifier is a number
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Pin::Int(n) => Some(*n),
            Pin::Text(_) => None,
        }
    }

    /// Text value, if this identifier is a name
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Pin::Int(_) => None,
            Pin::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pin::Int(n) => write!(f, "{}", n),
            Pin::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Pin {
    fn from(value: i64) -> Self {
        Pin::Int(value)
    }
}

impl From<i32> for Pin {
    fn from(value: i32) -> Self {
        Pin::Int(i64::from(value))
    }
}

impl From<usize> for Pin {
    fn from(value: usize) -> Self {
        Pin::Int(value as i64)
    }
}

impl From<&str> for Pin {
    fn from(value: &str) -> Self {
        Pin::Text(value.to_string())
    }
}

impl From<String> for Pin {
    fn from(value: String) -> Self {
        Pin::Text(value)
    }
}

/// Side of a connector a connection terminates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// A single value or a list of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Number of contained values
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if this was given as a list
    pub fn is_many(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(value: T) -> Self {
        OneOrMany::One(value)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(value: Vec<T>) -> Self {
        OneOrMany::Many(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_display() {
        assert_eq!(Pin::Int(3).to_string(), "3");
        assert_eq!(Pin::from("GND").to_string(), "GND");
    }

    #[test]
    fn test_shield_token() {
        assert!(Pin::from("s").is_shield());
        assert!(!Pin::from("S").is_shield());
        assert!(!Pin::Int(1).is_shield());
    }

    #[test]
    fn test_pin_deserialize_untagged() {
        let pins: Vec<Pin> = serde_json::from_str(r#"[1, "A", 20]"#).unwrap();
        assert_eq!(pins, vec![Pin::Int(1), Pin::from("A"), Pin::Int(20)]);
    }

    #[test]
    fn test_one_or_many() {
        let one: OneOrMany<Pin> = Pin::Int(1).into();
        assert_eq!(one.len(), 1);
        assert!(!one.is_many());
        let many: OneOrMany<Pin> = vec![Pin::Int(1), Pin::Int(2)].into();
        assert!(many.is_many());
        assert_eq!(many.into_vec(), vec![Pin::Int(1), Pin::Int(2)]);
    }

    #[test]
    fn test_one_or_many_deserialize() {
        let one: OneOrMany<String> = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(one, OneOrMany::One("abc".to_string()));
        let many: OneOrMany<String> = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Left.to_string(), "left");
        assert_eq!(Side::Right.to_string(), "right");
    }
}
