//! End-to-end use of the public API: document in, BOM and nodes out

use harnessviz::prelude::*;
use harnessviz::model::Mate;
use harnessviz::render_nodes;
use serde_json::json;

fn document(value: serde_json::Value) -> HarnessDocument {
    serde_json::from_value(value).unwrap()
}

fn demo() -> serde_json::Value {
    json!({
        "metadata": {"title": "Demo harness"},
        "options": {"color_mode": "full"},
        "connectors": {
            "X1": {"type": "D-Sub", "subtype": "female", "pinlabels": ["DCD", "RX", "TX", "DTR", "GND"]},
            "X2": {"type": "Molex KK 254", "subtype": "female", "pinlabels": ["GND", "RX", "TX"]},
            "F1": {"style": "simple", "type": "Crimp ferrule"}
        },
        "cables": {
            "W1": {"gauge": 0.25, "length": 0.2, "color_code": "DIN", "wirecount": 3, "shield": true},
            "W2": {"category": "bundle", "colors": ["BK"], "gauge": 0.5, "length": 0.1}
        },
        "connections": [
            [{"X1": [5, 2, 3]}, {"W1": [1, 2, 3]}, {"X2": [1, 3, 2]}],
            [{"X1": 5}, {"W1": "s"}],
            ["F1", {"W2": 1}, {"X2": ["GND"]}]
        ],
        "additional_bom_items": [{"type": "Label", "qty": 2}]
    })
}

#[test]
fn test_document_builds_harness() {
    let harness = Harness::from_document(document(demo())).unwrap();
    assert_eq!(harness.metadata.title(), Some("Demo harness"));
    assert_eq!(harness.connectors().len(), 3);
    assert_eq!(harness.cables().len(), 2);

    let w1 = harness.cable("W1").unwrap();
    assert_eq!(w1.connections().len(), 4);
    assert_eq!(w1.connections()[3].via, Pin::from("s"));
    assert_eq!(w1.connections()[3].to_name, None);

    let x2 = harness.connector("X2").unwrap();
    assert!(x2.ports_left());
    assert!(!x2.ports_right());
    assert_eq!(x2.populated_count(), 3);

    let w2 = harness.cable("W2").unwrap();
    assert_eq!(w2.connections()[0].from_name.as_deref(), Some("F1"));
    assert_eq!(w2.connections()[0].to_pin, Some(Pin::Int(1)));
}

#[test]
fn test_document_rejects_unknown_sections() {
    let result = serde_json::from_value::<HarnessDocument>(json!({"wires": {}}));
    assert!(result.is_err());
}

#[test]
fn test_unknown_designator_in_connection_set() {
    let mut value = demo();
    value["connections"] = json!([[{"X1": 1}, {"W9": 1}, {"X2": 1}]]);
    let error = Harness::from_document(document(value)).unwrap_err();
    assert!(matches!(error, HarnessError::UnknownEntity { .. }));
    assert_eq!(error.designator(), Some("W9"));
}

#[test]
fn test_mismatched_list_lengths() {
    let mut value = demo();
    value["connections"] = json!([[{"X1": [1, 2]}, {"W1": [1, 2, 3]}, {"X2": [1, 2, 3]}]]);
    let error = Harness::from_document(document(value)).unwrap_err();
    assert!(error.to_string().contains("same number of connections"));
}

#[test]
fn test_mates_from_connection_sets() {
    let mut value = demo();
    value["connections"] = json!([
        [{"X1": [1, 2]}, "-->", {"X2": [1, 2]}],
        ["X1", "==>", "X2"]
    ]);
    let harness = Harness::from_document(document(value)).unwrap();
    assert_eq!(harness.mates().len(), 3);
    assert!(matches!(harness.mates()[2], Mate::Component(_)));
}

#[test]
fn test_bom_for_demo() {
    let harness = Harness::from_document(document(demo())).unwrap();
    let bom = Bom::from_harness(&harness).unwrap();
    let descriptions: Vec<&str> = bom.entries().iter().map(|e| e.description.as_str()).collect();
    assert_eq!(
        descriptions,
        vec![
            "Connector, D-Sub, female, 5 pins",
            "Connector, Molex KK 254, female, 3 pins",
            "Connector, Crimp ferrule",
            "Cable, 3 x 0.25 mm\u{b2} shielded",
            "Wire, 0.5 mm\u{b2}, black",
            "Label",
        ]
    );
    let label = &bom.entries()[5];
    assert_eq!(label.qty, 2.0);
    assert!(label.designators.is_empty());
    assert_eq!(bom.entries()[2].designators, Vec::<String>::new());
}

#[test]
fn test_render_nodes_covers_every_entity() {
    let harness = Harness::from_document(document(demo())).unwrap();
    let nodes = render_nodes(&harness).unwrap();
    for designator in ["\"X1\" [", "\"X2\" [", "\"F1\" [", "\"W1\" [", "\"W2\" ["] {
        assert!(nodes.contains(designator), "missing {}", designator);
    }
    assert!(nodes.contains("port=\"ws\""));
    assert!(nodes.contains("X1:5:GND"));
    assert!(nodes.contains("fillcolor=\"#ffffff\""));
}

#[test]
fn test_tweak_append_follows_nodes() {
    let mut value = demo();
    value["tweak"] = json!({"append": ["X1 -> X2 [style=invis]"]});
    let harness = Harness::from_document(document(value)).unwrap();
    let nodes = render_nodes(&harness).unwrap();
    assert!(nodes.ends_with("X1 -> X2 [style=invis]"));
}
