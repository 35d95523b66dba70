//! Property tests for text, color and table helpers and entity construction

use harnessviz::core::colors::color_hex;
use harnessviz::core::{clean_whitespace, expand, translate_color, ColorMode, Pin};
use harnessviz::markup::{nested_table, Cell, Row};
use harnessviz::model::{Cable, Connector};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn prop_range_expansion_is_inclusive(a in 0i64..50, b in 0i64..50) {
        let pins = expand([format!("{}-{}", a, b)]).unwrap();
        prop_assert_eq!(pins.len() as i64, (a - b).abs() + 1);
        prop_assert_eq!(pins.first(), Some(&Pin::Int(a)));
        prop_assert_eq!(pins.last(), Some(&Pin::Int(b)));
    }

    #[test]
    fn prop_clean_whitespace_is_idempotent(text in "[ a-z,\t]{0,40}") {
        let once = clean_whitespace(&text);
        prop_assert_eq!(clean_whitespace(&once), once.clone());
        prop_assert!(!once.contains("  "));
    }

    #[test]
    fn prop_hex_translation_has_one_value_per_color(
        colors in prop::collection::vec(prop::sample::select(vec!["BK", "WH", "RD", "GN", "BU"]), 1..4)
    ) {
        let joined = colors.concat();
        let hex = translate_color(&joined, ColorMode::hex());
        prop_assert_eq!(hex.split(':').count(), colors.len());
        prop_assert!(hex.split(':').all(|h| h.starts_with('#') && h.len() == 7));
    }

    #[test]
    fn prop_padded_wires_have_odd_stripes(
        colors in prop::collection::vec(prop::sample::select(vec!["BK", "WH", "RD", "GN"]), 1..3)
    ) {
        let stripes = color_hex(&colors.concat(), true);
        prop_assert_eq!(stripes.len(), 3);
    }

    #[test]
    fn prop_nested_table_keeps_every_cell(contents in prop::collection::vec("[a-z]{1,8}", 0..6)) {
        let rows: Vec<Option<Row>> = contents
            .iter()
            .map(|c| Some(Row::Cells(vec![Some(Cell::new(c.clone()))])))
            .collect();
        let html = nested_table(&rows, &[]);
        prop_assert!(html.starts_with("<table"));
        prop_assert!(html.ends_with("</table>"));
        for content in &contents {
            let needle = format!(">{}</td>", content);
            prop_assert!(html.contains(&needle));
        }
        prop_assert_eq!(html.contains("<tr><td></td></tr>"), contents.is_empty());
    }

    #[test]
    fn prop_connector_construction_is_deterministic(
        labels in prop::collection::vec("[A-Z]{1,4}", 1..8),
        colors in prop::collection::vec(prop::sample::select(vec!["BK", "RD", "GN", "XX"]), 0..8)
    ) {
        let config = json!({"pinlabels": labels, "pincolors": colors});
        let first = Connector::from_value("X1", config.clone()).unwrap();
        let second = Connector::from_value("X1", config).unwrap();
        prop_assert_eq!(first.pincount, labels.len().max(colors.len()));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_cable_construction_is_deterministic(
        colors in prop::collection::vec(prop::sample::select(vec!["BK", "RD", "GNYE", "BU"]), 1..4),
        wirecount in 1usize..10
    ) {
        let config = json!({"wirecount": wirecount, "colors": colors, "length": 2});
        let first = Cable::from_value("W1", config.clone()).unwrap();
        let second = Cable::from_value("W1", config).unwrap();
        prop_assert_eq!(first.colors.len(), wirecount);
        prop_assert_eq!(first, second);
    }
}
