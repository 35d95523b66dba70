//! Wire gauge and length units
//!
//! Conversion tables between mm² and AWG, and parsing of the
//! `"<number> <unit>"` notation accepted for gauge and length.

use serde::{Deserialize, Serialize};

use super::format_number;

/// Square millimetre unit glyph
pub const MM2: &str = "mm\u{00b2}";

/// American Wire Gauge unit
pub const AWG: &str = "AWG";

/// Default length unit
pub const METER: &str = "m";

/// Returned by the gauge tables for values outside the table
pub const UNKNOWN: &str = "Unknown";

const AWG_EQUIV_TABLE: &[(&str, &str)] = &[
    ("0.09", "28"),
    ("0.14", "26"),
    ("0.25", "24"),
    ("0.34", "22"),
    ("0.5", "21"),
    ("0.75", "20"),
    ("1", "18"),
    ("1.5", "16"),
    ("2.5", "14"),
    ("4", "12"),
    ("6", "10"),
    ("10", "8"),
    ("16", "6"),
    ("25", "4"),
    ("35", "2"),
    ("50", "1"),
];

/// AWG equivalent of a mm² gauge, or [`UNKNOWN`]
pub fn awg_equiv(mm2: f64) -> &'static str {
    let key = format_number(mm2);
    AWG_EQUIV_TABLE
        .iter()
        .find(|(m, _)| *m == key)
        .map(|(_, awg)| *awg)
        .unwrap_or(UNKNOWN)
}

/// mm² equivalent of an AWG gauge, or [`UNKNOWN`]
pub fn mm2_equiv(awg: f64) -> &'static str {
    let key = format_number(awg);
    AWG_EQUIV_TABLE
        .iter()
        .find(|(_, a)| *a == key)
        .map(|(mm2, _)| *mm2)
        .unwrap_or(UNKNOWN)
}

/// A measurement as written in configuration: bare number or text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Quantity::Number(value)
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Quantity::Text(value.to_string())
    }
}

/// Normalize a gauge unit: any case of `awg` becomes `AWG`, `mm2` becomes `mm²`
pub fn normalize_gauge_unit(unit: &str) -> String {
    if unit.eq_ignore_ascii_case(AWG) {
        AWG.to_string()
    } else {
        unit.replace("mm2", MM2)
    }
}

/// Split `"<number> <unit>"` (or a bare number) into its parts
///
/// Returns `None` when the text has more than one space-separated unit
/// token or the number part is not numeric.
pub fn split_value_unit(text: &str) -> Option<(f64, Option<String>)> {
    let mut parts = text.split(' ');
    let number = parts
        .next()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())?;
    let unit = parts.next().map(str::to_string);
    if parts.next().is_some() || unit.as_deref() == Some("") {
        return None;
    }
    Some((number, unit))
}

/// Resolve a gauge and its unit
///
/// A unit given inside the text overrides `explicit_unit`; a bare number
/// takes `explicit_unit` or defaults to mm².
pub fn parse_gauge(gauge: &Quantity, explicit_unit: Option<&str>) -> Option<(f64, String)> {
    let (value, unit) = match gauge {
        Quantity::Number(n) => (*n, None),
        Quantity::Text(text) => split_value_unit(text)?,
    };
    let unit = unit
        .as_deref()
        .or(explicit_unit)
        .map(normalize_gauge_unit)
        .unwrap_or_else(|| MM2.to_string());
    Some((value, unit))
}

/// Resolve a length and its unit, defaulting to metres
pub fn parse_length(length: &Quantity, explicit_unit: Option<&str>) -> Option<(f64, String)> {
    let (value, unit) = match length {
        Quantity::Number(n) => (*n, None),
        Quantity::Text(text) => split_value_unit(text)?,
    };
    let unit = unit
        .or_else(|| explicit_unit.map(str::to_string))
        .unwrap_or_else(|| METER.to_string());
    Some((value, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_awg_equiv() {
        assert_eq!(awg_equiv(0.5), "21");
        assert_eq!(awg_equiv(1.0), "18");
        assert_eq!(awg_equiv(2.5), "14");
        assert_eq!(awg_equiv(0.3), UNKNOWN);
    }

    #[test]
    fn test_mm2_equiv() {
        assert_eq!(mm2_equiv(20.0), "0.75");
        assert_eq!(mm2_equiv(18.0), "1");
        assert_eq!(mm2_equiv(19.0), UNKNOWN);
    }

    #[test]
    fn test_tables_are_inverse() {
        for (mm2, awg) in AWG_EQUIV_TABLE {
            let mm2_value: f64 = mm2.parse().unwrap();
            let awg_value: f64 = awg.parse().unwrap();
            assert_eq!(awg_equiv(mm2_value), *awg);
            assert_eq!(mm2_equiv(awg_value), *mm2);
        }
    }

    #[test]
    fn test_parse_gauge_bare_number() {
        assert_eq!(
            parse_gauge(&Quantity::Number(0.5), None),
            Some((0.5, MM2.to_string()))
        );
        assert_eq!(
            parse_gauge(&Quantity::from("0.5"), None),
            Some((0.5, MM2.to_string()))
        );
    }

    #[test]
    fn test_parse_gauge_units() {
        assert_eq!(
            parse_gauge(&Quantity::from("20 awg"), None),
            Some((20.0, AWG.to_string()))
        );
        assert_eq!(
            parse_gauge(&Quantity::from("0.25 mm2"), None),
            Some((0.25, MM2.to_string()))
        );
    }

    #[test]
    fn test_parse_gauge_text_unit_overrides_explicit() {
        assert_eq!(
            parse_gauge(&Quantity::from("22 AWG"), Some("mm2")),
            Some((22.0, AWG.to_string()))
        );
        assert_eq!(
            parse_gauge(&Quantity::Number(22.0), Some("awg")),
            Some((22.0, AWG.to_string()))
        );
    }

    #[test]
    fn test_parse_gauge_malformed() {
        assert_eq!(parse_gauge(&Quantity::from("abc"), None), None);
        assert_eq!(parse_gauge(&Quantity::from("0.5  mm2"), None), None);
        assert_eq!(parse_gauge(&Quantity::from("0.5 mm2 x"), None), None);
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(
            parse_length(&Quantity::Number(2.0), None),
            Some((2.0, METER.to_string()))
        );
        assert_eq!(
            parse_length(&Quantity::from("30 cm"), Some("m")),
            Some((30.0, "cm".to_string()))
        );
        assert_eq!(
            parse_length(&Quantity::Number(3.0), Some("ft")),
            Some((3.0, "ft".to_string()))
        );
        assert_eq!(parse_length(&Quantity::from("long"), None), None);
    }
}
