//! Integration tests for layouts built from scripts

use formlayout_viz::layout::{Container, FormLayout, LayoutConfig, Rect, Size};
use formlayout_viz::{parse, run_script, LayoutError, ScriptError};
use pretty_assertions::assert_eq;

fn lay_out(source: &str, width: i32, height: i32) -> Vec<Rect> {
    let config = LayoutConfig::default();
    let mut container = Container::new(FormLayout::new(&config));
    run_script(source, &mut container, &config).expect("Should run");
    container.lay_out(width, height).expect("Should lay out").to_vec()
}

#[test]
fn test_login_dialog() {
    let source = r#"
        -- labels on the left, fields stretch, buttons bottom right
        stub "User" (40, 20) at cell(0, 0)
        stub "Password" (70, 20) at cell(0, 1)
        stub "user field" (100, 20) at cells(1, 0, -1, 0)
        stub "password field" (100, 20) at cells(1, 1, -1, 1)
        stub "Cancel" (60, 24) at cell(-1, -1)
        stub "OK" (50, 24) at cell(-2, -1)
    "#;
    let bounds = lay_out(source, 300, 150);
    assert_eq!(
        bounds,
        vec![
            Rect::new(10, 10, 70, 20),
            Rect::new(10, 35, 70, 20),
            Rect::new(85, 10, 205, 20),
            Rect::new(85, 35, 205, 20),
            Rect::new(230, 116, 60, 24),
            Rect::new(175, 116, 50, 24),
        ]
    );
}

#[test]
fn test_negative_columns_grow_from_right_margin() {
    let source = r#"
        gap 4 4
        stub (30, 10) at cell(-1, 0)
        stub (20, 10) at cell(-2, 0)
    "#;
    let bounds = lay_out(source, 200, 100);
    assert_eq!(
        bounds,
        vec![Rect::new(160, 10, 30, 10), Rect::new(136, 10, 20, 10)]
    );
}

#[test]
fn test_spanning_child_only_claims_what_is_left() {
    let source = r#"
        stub (100, 10) at cells(0, 0, 1, 0)
        stub (20, 10) at cell(0, 1)
    "#;
    let bounds = lay_out(source, 300, 100);
    // column 0 is sized by the single cell child first, column 1 takes the rest
    assert_eq!(
        bounds,
        vec![Rect::new(10, 10, 100, 10), Rect::new(10, 25, 20, 10)]
    );
}

#[test]
fn test_sized_columns_bound_a_spanning_child() {
    let source = r#"
        stub (40, 10) at cell(0, 0)
        stub (30, 10) at cell(1, 0)
        stub (100, 10) at cells(0, 1, 1, 1)
    "#;
    let bounds = lay_out(source, 300, 100);
    assert_eq!(bounds[1], Rect::new(55, 10, 30, 10));
    assert_eq!(bounds[2], Rect::new(10, 25, 75, 10));
}

#[test]
fn test_named_anchors_and_relations() {
    let source = r#"
        let split = anchor(vertical, 50)
        let inset = anchor(left_margin, 15)
        stub "top" at (top_margin, inset, split, right_margin)
        stub "bottom" at (split, left_margin, bottom_margin, right_margin)
        relate split to top_margin + 30
    "#;
    let bounds = lay_out(source, 200, 100);
    assert_eq!(
        bounds,
        vec![Rect::new(25, 10, 165, 30), Rect::new(10, 40, 180, 50)]
    );
}

#[test]
fn test_autosize_off_turns_anchor_fixed() {
    let source = r#"
        let edge = anchor(left_margin)
        stub (40, 10) at (top_margin, left_margin, null, edge)
        relate edge to left_margin + 12
        autosize edge off
    "#;
    let bounds = lay_out(source, 200, 100);
    assert_eq!(bounds, vec![Rect::new(10, 10, 12, 10)]);
}

#[test]
fn test_custom_default_stub_size() {
    let config = LayoutConfig::default().with_default_stub_size(Size::new(33, 11));
    let mut container = Container::new(FormLayout::new(&config));
    run_script("stub at cell(0, 0)", &mut container, &config).unwrap();
    assert_eq!(
        container.lay_out(100, 100).unwrap(),
        &[Rect::new(10, 10, 33, 11)]
    );
}

#[test]
fn test_script_stops_at_first_error() {
    let config = LayoutConfig::default();
    let mut container = Container::new(FormLayout::new(&config));
    let err = run_script(
        "stub at cell(0, 0)\nstub at (top, missing, null, null)\nstub at cell(1, 0)",
        &mut container,
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, ScriptError::UnknownAnchor { .. }));
    assert_eq!(container.len(), 1);
}

#[test]
fn test_error_report_points_at_source() {
    let source = "stub at cell(0, 0)\nrelate col_left(1) to top";
    let config = LayoutConfig::default();
    let mut container = Container::new(FormLayout::new(&config));
    let err = run_script(source, &mut container, &config).unwrap_err();
    match &err {
        ScriptError::Layout { span, .. } => assert_eq!(span.clone(), 19..44),
        other => panic!("Expected layout error, got {:?}", other),
    }
    let report = err.format(source, "dialog.fl");
    assert!(report.contains("dialog.fl"));
    assert!(report.contains("orientations differ"));
}

#[test]
fn test_parse_errors_collected() {
    let errors = parse("stub at cell(0 0)").unwrap_err();
    assert!(!errors.is_empty());
    let err = ScriptError::from(errors);
    assert!(err.to_string().starts_with("parse errors: "));
}

#[test]
fn test_oversized_stubs_report_overflow() {
    let source = "stub (2000000000, 10) at cell(0, 0)\nstub (2000000000, 10) at cell(1, 0)";
    let config = LayoutConfig::default();
    let mut container = Container::new(FormLayout::new(&config));
    run_script(source, &mut container, &config).expect("Should run");
    let err = container.lay_out(300, 100).unwrap_err();
    let (_, right) = container.layout().existing_column(1).expect("Column 1 exists");
    assert_eq!(err, LayoutError::Overflow { anchor: right });
    assert!(err.to_string().contains("overflows"));
    assert!(container.bounds().is_err());
}
