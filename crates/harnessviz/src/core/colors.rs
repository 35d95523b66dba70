//! Wire and component colors
//!
//! Colors are written as two-letter codes (`RD`, `BK`), concatenated for
//! multi-colored wires (`GNYE`), or as a `#rrggbb` literal. This module
//! holds the name and hex tables, the standard wire color codes, and
//! translation between color notations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::HarnessError;

/// Hex value used for empty or unknown colors
pub const DEFAULT_COLOR: &str = "#ffffff";

/// Hex value used for wire outlines
pub const OUTLINE_COLOR: &str = "#000000";

// code, hex, english, german
const COLOR_TABLE: &[(&str, &str, &str, &str)] = &[
    ("BK", "#000000", "black", "schwarz"),
    ("WH", "#ffffff", "white", "weiss"),
    ("GY", "#999999", "grey", "grau"),
    ("PK", "#ff66cc", "pink", "rosa"),
    ("RD", "#ff0000", "red", "rot"),
    ("OG", "#ff8000", "orange", "orange"),
    ("YE", "#ffff00", "yellow", "gelb"),
    ("OL", "#708000", "olive green", "olivgruen"),
    ("GN", "#00ff00", "green", "gruen"),
    ("TQ", "#00ffff", "turquoise", "tuerkis"),
    ("LB", "#a0dfff", "light blue", "hellblau"),
    ("BU", "#0066ff", "blue", "blau"),
    ("VT", "#8000ff", "violet", "violett"),
    ("BN", "#895956", "brown", "braun"),
    ("BG", "#ceb673", "beige", "beige"),
    ("IV", "#f5f0d0", "ivory", "elfenbein"),
    ("SL", "#708090", "slate", "schiefer"),
    ("CU", "#d6775e", "copper", "kupfer"),
    ("SN", "#aaaaaa", "tin", "zinn"),
    ("SR", "#84878c", "silver", "silber"),
    ("GD", "#ffcf80", "gold", "gold"),
];

const DIN: &[&str] = &[
    "WH", "BN", "GN", "YE", "GY", "PK", "BU", "RD", "BK", "VT", "GYPK", "RDBU", "WHGN", "BNGN",
    "WHYE", "YEBN", "WHGY", "GYBN", "WHPK", "PKBN", "WHBU", "BNBU", "WHRD", "BNRD", "WHBK", "BNBK",
    "GYGN", "YEGY", "PKGN", "YEPK", "GNBU", "YEBU", "GNRD", "YERD", "GNBK", "YEBK", "GYBU", "PKBU",
    "GYRD", "PKRD", "GYBK", "PKBK", "BUBK", "RDBK", "WHBNBK", "YEGNBK", "GYPKBK", "RDBUBK",
    "WHGNBK", "BNGNBK", "WHYEBK", "YEBNBK", "WHGYBK", "GYBNBK", "WHPKBK", "PKBNBK", "WHBUBK",
    "BNBUBK", "WHRDBK", "BNRDBK",
];

const IEC: &[&str] = &["BN", "RD", "OG", "YE", "GN", "BU", "VT", "GY", "WH", "BK"];

const BW: &[&str] = &["BK", "WH"];

// 25-pair telephone code, ring then tip of each pair
const TEL: &[&str] = &[
    "BUWH", "WHBU", "OGWH", "WHOG", "GNWH", "WHGN", "BNWH", "WHBN", "SLWH", "WHSL", "BURD", "RDBU",
    "OGRD", "RDOG", "GNRD", "RDGN", "BNRD", "RDBN", "SLRD", "RDSL", "BUBK", "BKBU", "OGBK", "BKOG",
    "GNBK", "BKGN", "BNBK", "BKBN", "SLBK", "BKSL", "BUYE", "YEBU", "OGYE", "YEOG", "GNYE", "YEGN",
    "BNYE", "YEBN", "SLYE", "YESL", "BUVT", "VTBU", "OGVT", "VTOG", "GNVT", "VTGN", "BNVT", "VTBN",
    "SLVT", "VTSL",
];

// 25-pair telephone code, tip then ring of each pair
const TELALT: &[&str] = &[
    "WHBU", "BU", "WHOG", "OG", "WHGN", "GN", "WHBN", "BN", "WHSL", "SL", "RDBU", "BURD", "RDOG",
    "OGRD", "RDGN", "GNRD", "RDBN", "BNRD", "RDSL", "SLRD", "BKBU", "BUBK", "BKOG", "OGBK", "BKGN",
    "GNBK", "BKBN", "BNBK", "BKSL", "SLBK", "YEBU", "BUYE", "YEOG", "OGYE", "YEGN", "GNYE", "YEBN",
    "BNYE", "YESL", "SLYE", "VTBU", "BUVT", "VTOG", "OGVT", "VTGN", "GNVT", "VTBN", "BNVT", "VTSL",
    "SLVT",
];

const T568A: &[&str] = &["WHGN", "GN", "WHOG", "BU", "WHBU", "OG", "WHBN", "BN"];

const T568B: &[&str] = &["WHOG", "OG", "WHGN", "BU", "WHBU", "GN", "WHBN", "BN"];

/// Names of the standard wire color codes
pub const COLOR_CODE_NAMES: &[&str] = &["DIN", "IEC", "BW", "TEL", "TELALT", "T568A", "T568B"];

/// Look up a standard wire color code by name
pub fn color_code(name: &str) -> Option<&'static [&'static str]> {
    match name {
        "DIN" => Some(DIN),
        "IEC" => Some(IEC),
        "BW" => Some(BW),
        "TEL" => Some(TEL),
        "TELALT" => Some(TELALT),
        "T568A" => Some(T568A),
        "T568B" => Some(T568B),
        _ => None,
    }
}

/// Returns true if `code` is a single known two-letter color
pub fn is_known_color(code: &str) -> bool {
    COLOR_TABLE.iter().any(|(c, ..)| *c == code)
}

fn lookup(code: &str) -> Option<&'static (&'static str, &'static str, &'static str, &'static str)> {
    COLOR_TABLE.iter().find(|(c, ..)| *c == code)
}

/// Split a color string into its two-letter components
fn components(color: &str) -> Vec<String> {
    let chars: Vec<char> = color.chars().collect();
    chars.chunks(2).map(|c| c.iter().collect()).collect()
}

/// Notation a color is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorNotation {
    /// Two-letter codes, e.g. `RD`
    #[default]
    Short,
    /// English names, e.g. `red`
    Full,
    /// Hex values, e.g. `#ff0000`
    Hex,
    /// German names, e.g. `rot`
    German,
}

/// Color rendering mode: a notation plus letter case
///
/// Parsed from `SHORT`, `short`, `FULL`, `full`, `HEX`, `hex`, `GER`,
/// `ger`. Mixed case is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorMode {
    pub notation: ColorNotation,
    pub uppercase: bool,
}

impl Default for ColorMode {
    fn default() -> Self {
        Self {
            notation: ColorNotation::Short,
            uppercase: true,
        }
    }
}

impl ColorMode {
    pub fn new(notation: ColorNotation, uppercase: bool) -> Self {
        Self {
            notation,
            uppercase,
        }
    }

    /// Hex notation in lowercase, as used for markup attributes
    pub fn hex() -> Self {
        Self::new(ColorNotation::Hex, false)
    }
}

impl FromStr for ColorMode {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uppercase = if s == s.to_uppercase() {
            true
        } else if s == s.to_lowercase() {
            false
        } else {
            return Err(HarnessError::UnknownColorMode {
                mode: s.to_string(),
            });
        };
        let notation = match s.to_lowercase().as_str() {
            "short" => ColorNotation::Short,
            "full" => ColorNotation::Full,
            "hex" => ColorNotation::Hex,
            "ger" => ColorNotation::German,
            _ => {
                return Err(HarnessError::UnknownColorMode {
                    mode: s.to_string(),
                })
            }
        };
        Ok(Self::new(notation, uppercase))
    }
}

impl TryFrom<String> for ColorMode {
    type Error = HarnessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColorMode> for String {
    fn from(value: ColorMode) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.notation {
            ColorNotation::Short => "short",
            ColorNotation::Full => "full",
            ColorNotation::Hex => "hex",
            ColorNotation::German => "ger",
        };
        if self.uppercase {
            write!(f, "{}", name.to_uppercase())
        } else {
            write!(f, "{}", name)
        }
    }
}

/// Translate a color string into the given notation
///
/// Empty input yields empty output. Multi-colors join with `/` for names and
/// `:` for hex values. Unknown codes keep their code in name notations and
/// fall back to [`DEFAULT_COLOR`] in hex.
pub fn translate_color(color: &str, mode: ColorMode) -> String {
    if color.is_empty() {
        return String::new();
    }
    let output = if color.starts_with('#') {
        color.to_string()
    } else {
        let parts = components(color);
        match mode.notation {
            ColorNotation::Short => color.to_string(),
            ColorNotation::Full => parts
                .iter()
                .map(|c| lookup(c).map_or(c.as_str(), |entry| entry.2))
                .collect::<Vec<_>>()
                .join("/"),
            ColorNotation::German => parts
                .iter()
                .map(|c| lookup(c).map_or(c.as_str(), |entry| entry.3))
                .collect::<Vec<_>>()
                .join("/"),
            ColorNotation::Hex => parts
                .iter()
                .map(|c| lookup(c).map_or(DEFAULT_COLOR, |entry| entry.1))
                .collect::<Vec<_>>()
                .join(":"),
        }
    };
    if mode.uppercase {
        output.to_uppercase()
    } else {
        output.to_lowercase()
    }
}

/// Hex values for the stripes of a wire
///
/// A two-color wire is padded to three stripes (`ab` → `aba`); with `pad`
/// set, a single color is tripled so that all wires in a cable have the
/// same height. Unknown codes turn the whole wire into [`DEFAULT_COLOR`].
pub fn color_hex(color: &str, pad: bool) -> Vec<String> {
    if color.is_empty() {
        return vec![DEFAULT_COLOR.to_string()];
    }
    if color.starts_with('#') {
        return vec![color.to_string()];
    }
    let mut parts = components(color);
    if parts.len() == 2 {
        parts.push(parts[0].clone());
    } else if pad && parts.len() == 1 {
        parts = vec![parts[0].clone(), parts[0].clone(), parts[0].clone()];
    }
    let hex: Option<Vec<String>> = parts
        .iter()
        .map(|c| lookup(c).map(|entry| entry.1.to_string()))
        .collect();
    match hex {
        Some(values) => values,
        None => {
            tracing::warn!(color, "Unknown color specified");
            vec![DEFAULT_COLOR.to_string()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_code_lookup() {
        assert_eq!(color_code("IEC").map(|c| c.len()), Some(10));
        assert_eq!(color_code("T568B").map(|c| c[0]), Some("WHOG"));
        assert_eq!(color_code("TEL").map(|c| c.len()), Some(50));
        assert!(color_code("XYZ").is_none());
        for name in COLOR_CODE_NAMES {
            assert!(color_code(name).is_some());
        }
    }

    #[test]
    fn test_color_mode_parsing() {
        assert_eq!(
            "SHORT".parse::<ColorMode>().unwrap(),
            ColorMode::new(ColorNotation::Short, true)
        );
        assert_eq!(
            "hex".parse::<ColorMode>().unwrap(),
            ColorMode::new(ColorNotation::Hex, false)
        );
        assert!("Hex".parse::<ColorMode>().is_err());
        assert!("rainbow".parse::<ColorMode>().is_err());
    }

    #[test]
    fn test_color_mode_display_round_trip() {
        for mode in ["SHORT", "full", "HEX", "ger"] {
            assert_eq!(mode.parse::<ColorMode>().unwrap().to_string(), mode);
        }
    }

    #[test]
    fn test_translate_short() {
        let mode = ColorMode::default();
        assert_eq!(translate_color("rd", mode), "RD");
        assert_eq!(translate_color("", mode), "");
    }

    #[test]
    fn test_translate_full() {
        assert_eq!(
            translate_color("GNYE", "FULL".parse().unwrap()),
            "GREEN/YELLOW"
        );
        assert_eq!(translate_color("BU", "full".parse().unwrap()), "blue");
    }

    #[test]
    fn test_translate_german() {
        assert_eq!(translate_color("RDBK", "ger".parse().unwrap()), "rot/schwarz");
    }

    #[test]
    fn test_translate_hex() {
        assert_eq!(translate_color("RD", ColorMode::hex()), "#ff0000");
        assert_eq!(translate_color("GNYE", ColorMode::hex()), "#00ff00:#ffff00");
        assert_eq!(translate_color("ZZ", ColorMode::hex()), DEFAULT_COLOR);
        assert_eq!(translate_color("#AbCdEf", ColorMode::hex()), "#abcdef");
    }

    #[test]
    fn test_color_hex_padding() {
        assert_eq!(color_hex("", false), vec![DEFAULT_COLOR]);
        assert_eq!(color_hex("RD", false), vec!["#ff0000"]);
        assert_eq!(color_hex("RD", true), vec!["#ff0000"; 3]);
        assert_eq!(
            color_hex("GNYE", false),
            vec!["#00ff00", "#ffff00", "#00ff00"]
        );
        assert_eq!(color_hex("QQ", true), vec![DEFAULT_COLOR]);
    }

    #[test]
    fn test_known_colors() {
        assert!(is_known_color("VT"));
        assert!(!is_known_color("GNYE"));
        assert!(!is_known_color("XX"));
    }
}
