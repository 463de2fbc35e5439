//! Integration tests for anchor resolution and container layout

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use formlayout_viz::diagram::{hit_test, AnchorCategory, Diagram};
use formlayout_viz::layout::{
    split_evenly, AnchorId, Component, Constraints, Container, LayoutError, Orientation, Point,
    Rect, Size,
};
use pretty_assertions::assert_eq;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .with_target(false)
            .init();
    });
}

fn stub(width: i32, height: i32) -> Component {
    Component::stub(Size::new(width, height))
}

/// Two columns with a label and a field per row, three rows
fn form() -> Container {
    let mut container = Container::default();
    for row in 0..3 {
        let label = container.layout_mut().cell(0, row).unwrap();
        container.add(stub(50, 20), label).unwrap();
        let field = container.layout_mut().cells(1, row, -1, row).unwrap();
        container.add(stub(120, 24), field).unwrap();
    }
    container
}

fn all_positions(container: &Container) -> Vec<Option<i32>> {
    container
        .layout()
        .graph()
        .iter()
        .map(|(id, _)| container.anchor_position(id))
        .collect()
}

#[test]
fn test_resolution_is_deterministic() {
    init_tracing();
    let mut first = form();
    let bounds = first.lay_out(300, 120).unwrap().to_vec();
    let positions = all_positions(&first);

    first.lay_out(300, 120).unwrap();
    assert_eq!(first.bounds().unwrap(), bounds.as_slice());
    assert_eq!(all_positions(&first), positions);

    let mut second = form();
    assert_eq!(second.lay_out(300, 120).unwrap(), bounds.as_slice());
}

#[test]
fn test_form_geometry() {
    init_tracing();
    // rows take the tallest child, the field column stretches to the right margin
    let mut container = form();
    let bounds = container.lay_out(300, 120).unwrap();
    assert_eq!(
        bounds,
        &[
            Rect::new(10, 10, 50, 24),
            Rect::new(65, 10, 225, 24),
            Rect::new(10, 39, 50, 24),
            Rect::new(65, 39, 225, 24),
            Rect::new(10, 68, 50, 24),
            Rect::new(65, 68, 225, 24),
        ]
    );
}

#[test]
fn test_relative_anchor_is_related_plus_offset() {
    let mut container = Container::default();
    let left = container.layout().left_margin_anchor();
    let top = container.layout().top_anchor();
    let a = container.layout_mut().create_anchor(left, 17).unwrap();
    let b = container.layout_mut().create_anchor(a, -4).unwrap();
    container
        .add(stub(5, 5), Constraints::new(Some(top), Some(b), None, Some(a)))
        .unwrap();
    container.lay_out(200, 100).unwrap();

    let p_left = container.anchor_position(left).unwrap();
    let p_a = container.anchor_position(a).unwrap();
    assert_eq!(p_a, p_left + 17);
    assert_eq!(container.anchor_position(b), Some(p_a - 4));
}

#[test]
fn test_self_relation_rejected_immediately() {
    let mut container = Container::default();
    let left = container.layout().left_anchor();
    let a = container.layout_mut().create_anchor(left, 3).unwrap();

    let graph = container.layout_mut().graph_mut();
    assert_eq!(
        graph.set_relation(a, a, 1),
        Err(LayoutError::SelfReference { anchor: a })
    );
    assert_eq!(graph.related(a), Some(left));
    assert_eq!(graph.get(a).unwrap().relative_position(), 3);
}

#[test]
fn test_three_anchor_cycle_names_chain_and_caches_nothing() {
    init_tracing();
    let mut container = Container::default();
    let left = container.layout().left_anchor();
    let top = container.layout().top_anchor();
    let a = container.layout_mut().create_anchor(left, 1).unwrap();
    let b = container.layout_mut().create_anchor(a, 1).unwrap();
    let c = container.layout_mut().create_anchor(b, 1).unwrap();
    container
        .add(stub(5, 5), Constraints::new(Some(top), Some(a), None, Some(c)))
        .unwrap();
    container.lay_out(100, 100).unwrap();

    container.layout_mut().graph_mut().set_relation(a, c, 1).unwrap();
    let err = container.lay_out(100, 100).unwrap_err();
    match &err {
        LayoutError::Cycle { chain } => {
            assert_eq!(chain.len(), 4);
            assert_eq!(chain.first(), chain.last());
            for anchor in [a, b, c] {
                assert!(chain.contains(&anchor));
            }
        }
        other => panic!("Expected cycle, got {:?}", other),
    }
    assert!(err.to_string().starts_with("cyclic anchor relation: "));

    let graph = container.layout().graph();
    for anchor in [a, b, c] {
        assert_eq!(graph.position(anchor), None);
    }
}

#[test]
fn test_equal_split_policy() {
    assert_eq!(split_evenly(10, 2), vec![5, 5]);
    assert_eq!(split_evenly(11, 2), vec![5, 6]);
    assert_eq!(split_evenly(11, 2).iter().sum::<i32>(), 11);
}

#[test]
fn test_two_auto_size_anchors_share_a_span() {
    init_tracing();
    let mut container = Container::default();
    let left = container.layout().left_margin_anchor();
    let top = container.layout().top_margin_anchor();
    let a = container.layout_mut().create_auto_size_anchor(left).unwrap();
    let b = container.layout_mut().create_auto_size_anchor(a).unwrap();
    container
        .add(stub(11, 5), Constraints::new(Some(top), Some(left), None, Some(b)))
        .unwrap();
    let bounds = container.lay_out(200, 100).unwrap().to_vec();

    assert_eq!(bounds, vec![Rect::new(10, 10, 11, 5)]);
    assert_eq!(container.anchor_position(a), Some(15));
    assert_eq!(container.anchor_position(b), Some(21));
}

#[test]
fn test_border_anchors_at_container_extent() {
    let mut container = form();
    container.lay_out(200, 100).unwrap();
    let layout = container.layout();
    assert_eq!(container.anchor_position(layout.right_anchor()), Some(200));
    assert_eq!(container.anchor_position(layout.bottom_anchor()), Some(100));
}

#[test]
fn test_hit_range_and_highlight_transitions() {
    init_tracing();
    let mut container = Container::default();
    let top = container.layout().top_margin_anchor();
    let fixed = container
        .layout_mut()
        .create_absolute_anchor(Orientation::Horizontal, 50);
    container
        .add(stub(30, 20), Constraints::new(Some(top), Some(fixed), None, None))
        .unwrap();
    container.lay_out(200, 100).unwrap();

    let mut diagram = Diagram::default();
    diagram.rebuild(&container).unwrap();
    let marker = diagram
        .markers()
        .iter()
        .find(|m| m.anchor == fixed)
        .copied()
        .unwrap();
    assert_eq!(marker.category, AnchorCategory::Fixed);
    assert_eq!(marker.strip.x, 50);

    for x in 40..=60 {
        let hit = hit_test(diagram.markers(), Point::new(x, 60), 3).map(|m| m.anchor);
        assert_eq!(hit == Some(fixed), (47..=53).contains(&x), "x = {x}");
    }

    let events: Rc<RefCell<Vec<Option<AnchorId>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    diagram.on_highlight_changed(move |anchor| sink.borrow_mut().push(anchor));

    assert_eq!(diagram.pointer_moved(Point::new(50, 60)), Some(fixed));
    assert_eq!(diagram.pointer_moved(Point::new(52, 60)), Some(fixed));
    // the implicit right edge of the stub sits at 50 + 30
    let right = diagram.pointer_moved(Point::new(80, 60));
    assert!(right.is_some() && right != Some(fixed));
    assert_eq!(diagram.pointer_moved(Point::new(150, 60)), None);
    assert_eq!(diagram.pointer_moved(Point::new(140, 60)), None);

    assert_eq!(events.borrow().as_slice(), &[Some(fixed), right, None]);
}

#[test]
fn test_remove_all_and_re_add_reproduces_geometry() {
    let mut container = form();
    let before = container.lay_out(320, 140).unwrap().to_vec();
    let children: Vec<(Component, Constraints)> = (0..container.len())
        .map(|i| {
            (
                container.component(i).unwrap().clone(),
                container.constraints(i).unwrap(),
            )
        })
        .collect();

    container.remove_all();
    assert!(container.bounds().is_err());
    for (component, constraints) in children {
        container.add(component, constraints).unwrap();
    }
    assert_eq!(container.lay_out(320, 140).unwrap(), before.as_slice());
}
