use figkit_core::{AppEvent, Bbox, ElementId, EventFilter, Point};
use figkit_designer::selection::HandleKind;
use figkit_designer::{
    ArgValue, DragState, EditError, FigureBackend, MemoryFigure, Modifiers, PropertyPath, Session,
};

use proptest::prelude::*;

use crate::common::{assert_bbox, click, drag, px, recipe, session};

fn two_axes() -> (Session<MemoryFigure>, ElementId, ElementId) {
    let mut recipe = recipe();
    let a = recipe.add_axes(Bbox::new(0.1, 0.1, 0.2, 0.2));
    let b = recipe.add_axes(Bbox::new(0.5, 0.5, 0.2, 0.2));
    (session(recipe), a, b)
}

#[test]
fn test_move_two_selected_axes() {
    let (mut s, a, b) = two_axes();
    s.select([a.clone(), b.clone()]);

    let recorded = drag(&mut s, Point::new(0.2, 0.2), Point::new(0.3, 0.2), Modifiers::NONE).unwrap();

    assert_eq!(recorded, 2);
    assert_bbox(s.bbox_of(&a), Bbox::new(0.2, 0.1, 0.2, 0.2));
    assert_bbox(s.bbox_of(&b), Bbox::new(0.6, 0.5, 0.2, 0.2));
    assert_eq!(s.tracker().cursor(), 2);
    assert!(s.tracker().entries().iter().all(|e| e.property == PropertyPath::Position));
    assert!(s.drag_state().is_idle());
}

#[test]
fn test_click_selects_and_moves_only_hit_element() {
    let (mut s, a, b) = two_axes();

    let recorded = drag(&mut s, Point::new(0.6, 0.6), Point::new(0.6, 0.7), Modifiers::NONE).unwrap();

    assert_eq!(recorded, 1);
    assert_eq!(s.selection().to_vec(), vec![b.clone()]);
    assert_bbox(s.bbox_of(&a), Bbox::new(0.1, 0.1, 0.2, 0.2));
    assert_bbox(s.bbox_of(&b), Bbox::new(0.5, 0.6, 0.2, 0.2));
}

#[test]
fn test_resize_from_top_right_corner() {
    let mut recipe = recipe();
    let a = recipe.add_axes(Bbox::new(0.1, 0.1, 0.2, 0.2));
    let mut s = session(recipe);
    s.select([a.clone()]);

    let recorded = drag(&mut s, Point::new(0.3, 0.3), Point::new(0.4, 0.4), Modifiers::NONE).unwrap();

    assert_eq!(recorded, 1);
    assert_bbox(s.bbox_of(&a), Bbox::new(0.1, 0.1, 0.3, 0.3));
}

#[test]
fn test_resize_from_left_edge_keeps_right_edge() {
    let mut recipe = recipe();
    let a = recipe.add_axes(Bbox::new(0.2, 0.2, 0.4, 0.2));
    let mut s = session(recipe);
    s.select([a.clone()]);

    drag(&mut s, Point::new(0.2, 0.3), Point::new(0.1, 0.3), Modifiers::NONE).unwrap();

    assert_bbox(s.bbox_of(&a), Bbox::new(0.1, 0.2, 0.5, 0.2));
}

#[test]
fn test_resize_is_clamped_to_minimum_extent() {
    let mut recipe = recipe();
    let a = recipe.add_axes(Bbox::new(0.2, 0.2, 0.2, 0.2));
    let mut s = session(recipe);
    s.select([a.clone()]);
    let min = s.interaction().min_extent;

    // drag the right edge far past the left one
    drag(&mut s, Point::new(0.4, 0.3), Point::new(0.0, 0.3), Modifiers::NONE).unwrap();

    let bbox = s.bbox_of(&a).unwrap();
    assert!((bbox.width - min).abs() < 1e-9);
    assert!((bbox.x0 - 0.2).abs() < 1e-9);
    assert!(bbox.width > 0.0);
}

#[test]
fn test_resize_aspect_locked_image() {
    let mut recipe = recipe();
    let ax = recipe.add_axes(Bbox::new(0.0, 0.0, 1.0, 1.0));
    let img = recipe.add_image(&ax, [0.2, 0.4, 0.2, 0.4]);
    let mut s = session(recipe);
    s.select([img.clone()]);

    drag(&mut s, Point::new(0.4, 0.4), Point::new(0.5, 0.45), Modifiers::NONE).unwrap();

    let bbox = s.bbox_of(&img).unwrap();
    assert!((bbox.width - bbox.height).abs() < 1e-9);
    assert_bbox(Some(bbox), Bbox::new(0.2, 0.2, 0.3, 0.3));
    let entry = &s.tracker().entries()[0];
    assert_eq!(entry.property, PropertyPath::Extent);
}

#[test]
fn test_rotate_text_with_rotate_handle() {
    let mut recipe = recipe();
    let fig = ElementId::figure(1);
    let text = recipe.add_text(&fig, Point::new(0.4, 0.4), "title", (100.0, 40.0));
    let mut s = session(recipe);
    s.select([text.clone()]);

    let handle = s
        .handles()
        .into_iter()
        .find(|h| h.kind == HandleKind::Rotate)
        .unwrap();
    let center = s.bbox_of(&text).unwrap().center();
    let distance = handle.position.y - center.y;
    // quarter turn counter-clockwise
    let to = Point::new(center.x - distance, center.y);

    let (x0, y0) = s.viewport().figure_to_pixel(handle.position);
    s.pointer_down(x0, y0, Modifiers::NONE).unwrap();
    let (x1, y1) = px(to);
    s.pointer_move(x1, y1);
    let recorded = s.pointer_up(x1, y1).unwrap();

    assert_eq!(recorded, 1);
    let entry = &s.tracker().entries()[0];
    assert_eq!(entry.property, PropertyPath::Rotation);
    match entry.args.as_slice() {
        [ArgValue::Number(deg)] => assert!((deg - 90.0).abs() < 1e-6),
        other => panic!("unexpected rotation {:?}", other),
    }
}

#[test]
fn test_click_without_motion_records_nothing() {
    let (mut s, a, _) = two_axes();

    assert_eq!(click(&mut s, Point::new(0.2, 0.2), Modifiers::NONE).unwrap(), 0);

    assert!(s.tracker().entries().is_empty());
    assert!(s.selection().contains(&a));
    assert!(!s.is_dirty());
}

#[test]
fn test_drag_back_to_start_restores_exact_value() {
    let (mut s, a, _) = two_axes();
    let (x0, y0) = px(Point::new(0.2, 0.2));

    s.pointer_down(x0, y0, Modifiers::NONE).unwrap();
    s.pointer_move(x0 + 37.0, y0 - 11.0);
    assert_eq!(s.pointer_up(x0, y0).unwrap(), 0);

    assert_eq!(s.bbox_of(&a), Some(Bbox::new(0.1, 0.1, 0.2, 0.2)));
    assert!(s.tracker().entries().is_empty());
}

#[test]
fn test_shift_click_toggles_membership() {
    let (mut s, a, b) = two_axes();
    click(&mut s, Point::new(0.2, 0.2), Modifiers::NONE).unwrap();

    click(&mut s, Point::new(0.6, 0.6), Modifiers::SHIFT).unwrap();
    assert_eq!(s.selection().len(), 2);
    assert_eq!(s.selection().primary(), Some(&b));

    click(&mut s, Point::new(0.2, 0.2), Modifiers::SHIFT).unwrap();
    assert_eq!(s.selection().to_vec(), vec![b]);
    assert!(!s.selection().contains(&a));
    assert!(s.tracker().entries().is_empty());
}

#[test]
fn test_rubber_band_selects_overlapping_elements() {
    let mut recipe = recipe();
    let a = recipe.add_axes(Bbox::new(0.1, 0.1, 0.2, 0.2));
    let b = recipe.add_axes(Bbox::new(0.5, 0.5, 0.2, 0.2));
    let c = recipe.add_axes(Bbox::new(0.8, 0.1, 0.1, 0.1));
    let mut s = session(recipe);

    let (x0, y0) = px(Point::new(0.05, 0.05));
    let (x1, y1) = px(Point::new(0.6, 0.6));
    s.pointer_down(x0, y0, Modifiers::NONE).unwrap();
    s.pointer_move(x1, y1);
    assert_bbox(s.rubber_band(), Bbox::new(0.05, 0.05, 0.55, 0.55));
    assert_eq!(s.pointer_up(x1, y1).unwrap(), 0);

    let selected = s.selection().to_vec();
    assert!(selected.contains(&a));
    assert!(selected.contains(&b));
    assert!(!selected.contains(&c));
    assert!(s.rubber_band().is_none());
}

#[test]
fn test_rubber_band_with_shift_extends_selection() {
    let mut recipe = recipe();
    let a = recipe.add_axes(Bbox::new(0.1, 0.1, 0.2, 0.2));
    let c = recipe.add_axes(Bbox::new(0.8, 0.1, 0.1, 0.1));
    let mut s = session(recipe);
    s.select([a.clone()]);

    drag(&mut s, Point::new(0.75, 0.05), Point::new(0.95, 0.3), Modifiers::SHIFT).unwrap();

    assert_eq!(s.selection().len(), 2);
    assert!(s.selection().contains(&a));
    assert!(s.selection().contains(&c));
}

#[test]
fn test_cancel_restores_pre_gesture_state() {
    let (mut s, a, _) = two_axes();
    let (x0, y0) = px(Point::new(0.2, 0.2));

    s.pointer_down(x0, y0, Modifiers::NONE).unwrap();
    s.pointer_move(x0 + 150.0, y0 - 80.0);
    assert!(matches!(s.drag_state(), DragState::Dragging(_)));
    s.cancel_gesture();

    assert!(s.drag_state().is_idle());
    assert_eq!(s.bbox_of(&a), Some(Bbox::new(0.1, 0.1, 0.2, 0.2)));
    assert!(s.tracker().entries().is_empty());
}

#[test]
fn test_actions_refused_during_gesture() {
    let (mut s, _, _) = two_axes();
    let (x0, y0) = px(Point::new(0.2, 0.2));
    s.pointer_down(x0, y0, Modifiers::NONE).unwrap();

    assert!(matches!(s.undo(), Err(EditError::GestureInProgress)));
    assert!(matches!(
        s.move_selection(Point::new(0.1, 0.0)),
        Err(EditError::GestureInProgress)
    ));
    assert!(matches!(
        s.pointer_down(x0, y0, Modifiers::NONE),
        Err(EditError::GestureInProgress)
    ));

    s.pointer_up(x0, y0).unwrap();
    assert!(s.move_selection(Point::new(0.1, 0.0)).is_ok());
}

#[test]
fn test_move_text_inside_axes() {
    let mut recipe = recipe();
    let ax = recipe.add_axes(Bbox::new(0.0, 0.0, 0.5, 0.5));
    let text = recipe.add_text(&ax, Point::new(0.2, 0.2), "label", (50.0, 20.0));
    let mut s = session(recipe);
    s.select([text.clone()]);

    s.move_selection(Point::new(0.1, 0.05)).unwrap();

    // axes fraction moves twice as far as figure fraction
    let args = s.backend().read(&text, PropertyPath::Position).unwrap();
    match args.as_slice() {
        [ArgValue::Tuple(v)] => {
            assert!((v[0] - 0.4).abs() < 1e-9);
            assert!((v[1] - 0.3).abs() < 1e-9);
        }
        other => panic!("unexpected position {:?}", other),
    }
}

#[test]
fn test_selected_child_of_selected_axes_moves_once() {
    let mut recipe = recipe();
    let ax = recipe.add_axes(Bbox::new(0.0, 0.0, 0.5, 0.5));
    let text = recipe.add_text(&ax, Point::new(0.2, 0.2), "label", (50.0, 20.0));
    let mut s = session(recipe);
    s.select([ax.clone(), text.clone()]);

    assert_eq!(s.move_selection(Point::new(0.1, 0.0)).unwrap(), 1);

    assert_bbox(s.bbox_of(&ax), Bbox::new(0.1, 0.0, 0.5, 0.5));
    assert_bbox(s.bbox_of(&text), Bbox::new(0.2, 0.1, 0.05, 0.02));
}

#[test]
fn test_drag_publishes_selection_and_canvas_events() {
    let (mut s, _, _) = two_axes();
    let events = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = events.clone();
    s.bus().subscribe(EventFilter::All, move |event: &AppEvent| {
        sink.lock().push(event.clone());
    });

    drag(&mut s, Point::new(0.2, 0.2), Point::new(0.25, 0.2), Modifiers::NONE).unwrap();

    let events = events.lock();
    assert!(events.iter().any(|e| matches!(e, AppEvent::SelectionChanged { .. })));
    assert!(events.iter().any(|e| matches!(e, AppEvent::CanvasChanged)));
    assert!(events.iter().any(|e| matches!(e, AppEvent::HistoryChanged(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_aspect_locked_image_keeps_ratio(
        handle in prop::sample::select(HandleKind::RESIZE.to_vec()),
        dx in -1.0f64..1.0,
        dy in -1.0f64..1.0,
    ) {
        let mut recipe = recipe();
        let ax = recipe.add_axes(Bbox::new(0.0, 0.0, 1.0, 1.0));
        let img = recipe.add_image(&ax, [0.3, 0.7, 0.45, 0.55]);
        let mut s = session(recipe);
        s.select([img.clone()]);
        let start = s.bbox_of(&img).unwrap();
        let ratio = start.width / start.height;

        let from = handle.position(&start, 0.0);
        drag(&mut s, from, Point::new(from.x + dx, from.y + dy), Modifiers::NONE).unwrap();

        let bbox = s.bbox_of(&img).unwrap();
        prop_assert!(bbox.width > 0.0 && bbox.height > 0.0);
        prop_assert!(((bbox.width / bbox.height) - ratio).abs() <= 1e-9 * ratio, "{:?}", bbox);
    }
}
