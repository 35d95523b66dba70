//! Quantity multipliers for additional BOM items
//!
//! An additional component may scale its quantity by a property of its
//! owner, e.g. one crimp per populated pin or sleeving per metre of cable.

use std::fmt;
use std::str::FromStr;

use crate::core::{HarnessError, Result};

/// Multiplier keys valid on a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorMultiplier {
    /// Total pin count
    Pincount,
    /// Pins that carry a connection or loop
    Populated,
    /// Pins left empty
    Unpopulated,
}

impl ConnectorMultiplier {
    pub fn variants() -> &'static [&'static str] {
        &["pincount", "populated", "unpopulated"]
    }
}

impl FromStr for ConnectorMultiplier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pincount" => Ok(Self::Pincount),
            "populated" => Ok(Self::Populated),
            "unpopulated" => Ok(Self::Unpopulated),
            _ => Err(format!("invalid qty multiplier parameter for connector {}", s)),
        }
    }
}

impl fmt::Display for ConnectorMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pincount => "pincount",
            Self::Populated => "populated",
            Self::Unpopulated => "unpopulated",
        };
        write!(f, "{}", name)
    }
}

/// Multiplier keys valid on a cable or bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CableMultiplier {
    /// Number of wires
    Wirecount,
    /// Number of recorded connections
    Terminations,
    /// Cable length
    Length,
    /// Length times wire count
    TotalLength,
}

impl CableMultiplier {
    pub fn variants() -> &'static [&'static str] {
        &["wirecount", "terminations", "length", "total_length"]
    }
}

impl FromStr for CableMultiplier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "wirecount" => Ok(Self::Wirecount),
            "terminations" => Ok(Self::Terminations),
            "length" => Ok(Self::Length),
            "total_length" => Ok(Self::TotalLength),
            _ => Err(format!("invalid qty multiplier parameter for cable {}", s)),
        }
    }
}

impl fmt::Display for CableMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Wirecount => "wirecount",
            Self::Terminations => "terminations",
            Self::Length => "length",
            Self::TotalLength => "total_length",
        };
        write!(f, "{}", name)
    }
}

/// Parse an optional multiplier key, mapping failures to a designator-bearing error
pub(crate) fn parse_key<K: FromStr>(designator: &str, key: Option<&str>) -> Result<Option<K>> {
    match key.filter(|k| !k.is_empty()) {
        None => Ok(None),
        Some(k) => k
            .parse()
            .map(Some)
            .map_err(|_| HarnessError::invalid_multiplier(designator, k)),
    }
}

/// An entity whose state can scale BOM quantities
pub trait QuantitySource {
    fn designator(&self) -> &str;

    /// Resolve a multiplier key; absent or empty keys yield 1
    fn qty_multiplier(&self, key: Option<&str>) -> Result<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_keys() {
        for key in ConnectorMultiplier::variants() {
            let parsed: ConnectorMultiplier = key.parse().unwrap();
            assert_eq!(parsed.to_string(), *key);
        }
        assert!("wirecount".parse::<ConnectorMultiplier>().is_err());
    }

    #[test]
    fn test_cable_keys() {
        for key in CableMultiplier::variants() {
            let parsed: CableMultiplier = key.parse().unwrap();
            assert_eq!(parsed.to_string(), *key);
        }
        assert!("pincount".parse::<CableMultiplier>().is_err());
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key::<CableMultiplier>("W1", None).unwrap(), None);
        assert_eq!(parse_key::<CableMultiplier>("W1", Some("")).unwrap(), None);
        assert_eq!(
            parse_key::<CableMultiplier>("W1", Some("length")).unwrap(),
            Some(CableMultiplier::Length)
        );
        let err = parse_key::<CableMultiplier>("W1", Some("bogus")).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidMultiplier { .. }));
        assert_eq!(err.designator(), Some("W1"));
    }
}
