//! Shared text utilities for harness processing
//!
//! Range expansion for pin and wire lists, whitespace and hyperlink cleanup,
//! arrow detection for mate definitions, and number formatting.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{HarnessError, Pin, Result};

/// Widest `"<int>-<int>"` range [`expand`] will unroll
pub const MAX_RANGE_SPAN: u64 = 10_000;

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[aA] [^>]*>([^<]*)</[aA]>").expect("valid link regex"));

static ARROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<left><?)(?P<body>-+|=+)(?P<right>>?)\s*$").expect("valid arrow regex")
});

/// Expand a list of pin or wire tokens, unrolling `"<int>-<int>"` ranges
///
/// Ranges are inclusive and may run in either direction. Tokens that are
/// not ranges pass through; text that reads as an integer becomes
/// [`Pin::Int`]. A range wider than [`MAX_RANGE_SPAN`] is an error.
///
/// # Example
/// ```
/// use harnessviz::core::{expand, Pin};
///
/// assert_eq!(expand(["1-3"])?, vec![Pin::Int(1), Pin::Int(2), Pin::Int(3)]);
/// assert_eq!(
///     expand(["A", "5-6"])?,
///     vec![Pin::from("A"), Pin::Int(5), Pin::Int(6)]
/// );
/// assert!(expand(["1-9999999999"]).is_err());
/// # Ok::<(), harnessviz::core::HarnessError>(())
/// ```
pub fn expand<I, T>(tokens: I) -> Result<Vec<Pin>>
where
    I: IntoIterator<Item = T>,
    T: Into<Pin>,
{
    let mut pins = Vec::new();
    for token in tokens {
        pins.extend(expand_token(token.into())?);
    }
    Ok(pins)
}

/// Expand a single token into one or more pins
pub fn expand_token(token: Pin) -> Result<Vec<Pin>> {
    let text = match token {
        Pin::Int(_) => return Ok(vec![token]),
        Pin::Text(text) => text,
    };

    if let Some((a, b)) = text.split_once('-') {
        let (Some(a), Some(b)) = (parse_int(a), parse_int(b)) else {
            // '-' is not a delimiter between two integers
            return Ok(vec![Pin::Text(text)]);
        };
        if a.abs_diff(b) >= MAX_RANGE_SPAN {
            return Err(HarnessError::RangeTooLong {
                token: text,
                max: MAX_RANGE_SPAN,
            });
        }
        return Ok(if a <= b {
            (a..=b).map(Pin::Int).collect()
        } else {
            (b..=a).rev().map(Pin::Int).collect()
        });
    }

    Ok(match parse_int(&text) {
        Some(n) => vec![Pin::Int(n)],
        None => vec![Pin::Text(text)],
    })
}

fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

/// Collapse runs of whitespace into single spaces and drop spaces before commas
pub fn clean_whitespace(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" ,", ",")
}

/// Strip hyperlink wrappers, keeping the link text
pub fn remove_links(input: &str) -> String {
    LINK_RE.replace_all(input, "$1").into_owned()
}

/// Strip hyperlinks and turn newlines into markup line breaks
pub fn line_breaks(input: &str) -> String {
    remove_links(input).replace('\n', "<br />")
}

/// Kind of mate an arrow string describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKind {
    /// `-` body: pin-to-pin mate
    Pin,
    /// `=` body: component-to-component mate
    Component,
}

/// Returns true for strings of `-` or `=` (not mixed) with optional heads
///
/// Accepted forms include `<-`, `--`, `->`, `<->`, `<==`, `==`, `==>`, `<=>`.
pub fn is_arrow(input: &str) -> bool {
    ARROW_RE.is_match(input)
}

/// Classify an arrow string, or `None` if it is not an arrow
pub fn arrow_kind(input: &str) -> Option<ArrowKind> {
    let captures = ARROW_RE.captures(input)?;
    let body = captures.name("body")?.as_str();
    if body.starts_with('-') {
        Some(ArrowKind::Pin)
    } else {
        Some(ArrowKind::Component)
    }
}

/// Format a number without a trailing `.0` for whole values
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
