//! Integration tests for building documents from descriptions

mod common;

use common::parse_document;
use jsondraw::drawio::{RECTANGLE_STYLE, ELLIPSE_STYLE, FALLBACK_STYLE};
use jsondraw::prelude::*;

fn build(json: &str) -> (BuildReport, String) {
    let spec = DiagramSpec::from_json_str(json).unwrap();
    let mut builder = DiagramBuilder::new();
    let report = builder.build(&spec);
    (report, builder.finish().unwrap())
}

#[test]
fn test_connector_between_two_shapes() {
    let (report, xml) = build(
        r#"{"shapes": [{"value": "A"}, {"value": "B"}],
            "connectors": [{"source": "A", "target": "B"}]}"#,
    );
    assert!(report.is_clean());

    let doc = parse_document(&xml);
    let a = doc.cell_by_value("A").unwrap().get("id").unwrap().to_string();
    let b = doc.cell_by_value("B").unwrap().get("id").unwrap().to_string();
    let edges = doc.edges();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].get("source"), Some(a.as_str()));
    assert_eq!(edges[0].get("target"), Some(b.as_str()));
    assert_eq!(edges[0].get("parent"), Some("1"));
    assert_eq!(edges[0].get("value"), Some(""));
}

#[test]
fn test_connector_to_unknown_shape_is_dropped() {
    let (report, xml) = build(
        r#"{"shapes": [{"value": "A"}, {"value": "B"}],
            "connectors": [{"source": "A", "target": "X"}]}"#,
    );
    assert_eq!(report.connectors.len(), 0);
    assert_eq!(
        report.skipped,
        vec![SkipReason::UnresolvedConnector {
            source: "A".to_string(),
            target: "X".to_string(),
            source_found: true,
            target_found: false,
        }]
    );
    assert!(parse_document(&xml).edges().is_empty());
}

#[test]
fn test_both_endpoints_missing() {
    let (report, _) = build(r#"{"connectors": [{"source": "P", "target": "Q"}]}"#);
    match &report.skipped[0] {
        SkipReason::UnresolvedConnector {
            source_found,
            target_found,
            ..
        } => assert!(!source_found && !target_found),
        other => panic!("unexpected skip reason: {:?}", other),
    }
}

#[test]
fn test_ids_follow_insertion_order_across_kinds() {
    let (report, xml) = build(
        r#"{"shapes": [{"value": "A"}, {"value": "B"}, {"value": "C"}],
            "connectors": [{"source": "A", "target": "B"}, {"source": "B", "target": "Z"},
                           {"source": "B", "target": "C"}],
            "annotations": [{"value": "first"}, {"value": "second"}]}"#,
    );
    let ids: Vec<u32> = report
        .shapes
        .iter()
        .chain(&report.connectors)
        .chain(&report.annotations)
        .map(|id| id.value())
        .collect();
    assert_eq!(ids, vec![2, 3, 4, 5, 6, 7, 8]);

    let doc = parse_document(&xml);
    let emitted: Vec<&str> = doc
        .elements_cells()
        .iter()
        .filter_map(|c| c.get("id"))
        .collect();
    assert_eq!(emitted, vec!["2", "3", "4", "5", "6", "7", "8"]);
}

#[test]
fn test_default_shape_geometry() {
    let (_, xml) = build(r#"{"shapes": [{"value": "A"}]}"#);
    let doc = parse_document(&xml);
    let cell = doc.cell_by_value("A").unwrap();
    assert_eq!(cell.geometry("x"), Some("0"));
    assert_eq!(cell.geometry("y"), Some("0"));
    assert_eq!(cell.geometry("width"), Some("80"));
    assert_eq!(cell.geometry("height"), Some("40"));
    assert_eq!(cell.geometry("relative"), Some("0"));
}

#[test]
fn test_default_annotation_geometry_and_style() {
    let (_, xml) = build(r#"{"annotations": [{"value": "Legend", "x": 400, "y": 20}]}"#);
    let doc = parse_document(&xml);
    let cell = doc.cell_by_value("Legend").unwrap();
    assert!(cell.is_vertex());
    assert_eq!(cell.get("style"), Some("textColor=#000000;align=center;"));
    assert_eq!(cell.geometry("x"), Some("400"));
    assert_eq!(cell.geometry("width"), Some("200"));
    assert_eq!(cell.geometry("height"), Some("40"));
}

#[test]
fn test_explicit_geometry() {
    let (_, xml) = build(
        r#"{"shapes": [{"value": "A", "x": 12.5, "y": -4, "width": 160, "height": 90.25}]}"#,
    );
    let doc = parse_document(&xml);
    let cell = doc.cell_by_value("A").unwrap();
    assert_eq!(cell.geometry("x"), Some("12.5"));
    assert_eq!(cell.geometry("y"), Some("-4"));
    assert_eq!(cell.geometry("width"), Some("160"));
    assert_eq!(cell.geometry("height"), Some("90.25"));
}

#[test]
fn test_style_resolution() {
    let (_, xml) = build(
        r#"{"shapes": [
            {"value": "R", "styles": ";fillColor=red;"},
            {"value": "E", "type": "ellipse"},
            {"value": "H", "type": "hexagon", "styles": "fillColor=#fff;"}
        ]}"#,
    );
    let doc = parse_document(&xml);
    assert_eq!(
        doc.cell_by_value("R").unwrap().get("style").unwrap(),
        format!("{};fillColor=red;", RECTANGLE_STYLE)
    );
    assert_eq!(doc.cell_by_value("E").unwrap().get("style"), Some(ELLIPSE_STYLE));
    assert_eq!(
        doc.cell_by_value("H").unwrap().get("style").unwrap(),
        format!("{}fillColor=#fff;", FALLBACK_STYLE)
    );
}

#[test]
fn test_connector_styles() {
    let (_, xml) = build(
        r#"{"shapes": [{"value": "A"}, {"value": "B"}],
            "connectors": [{"source": "A", "target": "B"},
                           {"source": "B", "target": "A", "style": "dashed=1;endArrow=none;"},
                           {"source": "A", "target": "A", "style": ""}]}"#,
    );
    let doc = parse_document(&xml);
    let styles: Vec<&str> = doc.edges().iter().filter_map(|c| c.get("style")).collect();
    assert_eq!(
        styles,
        vec![
            jsondraw::drawio::DEFAULT_EDGE_STYLE,
            "dashed=1;endArrow=none;",
            jsondraw::drawio::DEFAULT_EDGE_STYLE,
        ]
    );
}

#[test]
fn test_shape_without_value_is_not_addressable() {
    let (report, xml) = build(
        r#"{"shapes": [{"x": 10}, {"value": "B"}],
            "connectors": [{"source": "", "target": "B"}]}"#,
    );
    assert_eq!(report.shapes.len(), 2);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(parse_document(&xml).vertices().len(), 2);
}

#[test]
fn test_repeated_value_uses_last_shape() {
    let (report, xml) = build(
        r#"{"shapes": [{"value": "A"}, {"value": "A"}, {"value": "B"}],
            "connectors": [{"source": "A", "target": "B"}]}"#,
    );
    assert_eq!(report.shapes, vec![CellId::new(2), CellId::new(3), CellId::new(4)]);
    let doc = parse_document(&xml);
    assert_eq!(doc.edges()[0].get("source"), Some("3"));
}

#[test]
fn test_values_are_escaped() {
    let (_, xml) = build(r#"{"shapes": [{"value": "<b>Bold</b> & \"quoted\""}]}"#);
    assert!(!xml.contains("<b>"));
    let doc = parse_document(&xml);
    assert!(doc.cell_by_value("<b>Bold</b> & \"quoted\"").is_some());
}

#[test]
fn test_multi_line_values_keep_line_breaks() {
    let (_, xml) = build(
        r#"{"shapes": [{"value": "Line1\nLine2"}],
            "annotations": [{"value": "col1\tcol2\r\nnext"}]}"#,
    );
    assert!(xml.contains(r#"value="Line1&#10;Line2""#));
    assert!(xml.contains(r#"value="col1&#9;col2&#13;&#10;next""#));

    let doc = parse_document(&xml);
    assert!(doc.cell_by_value("Line1\nLine2").is_some());
    assert!(doc.cell_by_value("col1\tcol2\r\nnext").is_some());
}

#[test]
fn test_custom_styles_from_description() {
    let (_, xml) = build(
        r#"{"styles": {"cylinder": "shape=cylinder3;whiteSpace=wrap;html=1;"},
            "shapes": [{"value": "DB", "type": "cylinder", "styles": "fillColor=#dae8fc;"}]}"#,
    );
    let doc = parse_document(&xml);
    assert_eq!(
        doc.cell_by_value("DB").unwrap().get("style"),
        Some("shape=cylinder3;whiteSpace=wrap;html=1;fillColor=#dae8fc;")
    );
}

#[test]
fn test_builder_with_custom_registry() {
    let mut styles = StyleRegistry::empty();
    styles.add_style("rectangle", "rounded=1;");
    let mut builder = DiagramBuilder::new().with_styles(styles);
    builder.add_shape(&ShapeSpec::new("A"));
    let doc = parse_document(&builder.finish().unwrap());
    assert_eq!(doc.cell_by_value("A").unwrap().get("style"), Some("rounded=1;"));
}
