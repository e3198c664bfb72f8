use figkit_core::{Bbox, ElementId, Point};
use figkit_designer::{ArgValue, EditError, MemoryFigure, Modifiers, PropertyPath, Session};

use crate::common::{assert_bbox, px, recipe, session};

fn two_axes() -> (Session<MemoryFigure>, ElementId, ElementId) {
    let mut recipe = recipe();
    let a = recipe.add_axes(Bbox::new(0.1, 0.1, 0.2, 0.2));
    let b = recipe.add_axes(Bbox::new(0.5, 0.5, 0.2, 0.2));
    (session(recipe), a, b)
}

#[test]
fn test_element_removed_mid_drag_is_dropped() {
    let (mut s, a, b) = two_axes();
    s.select([a.clone(), b.clone()]);
    let (x0, y0) = px(Point::new(0.2, 0.2));

    s.pointer_down(x0, y0, Modifiers::NONE).unwrap();
    s.pointer_move(x0 + 50.0, y0);
    s.backend_mut().remove_element(&b);
    s.pointer_move(x0 + 80.0, y0);
    let recorded = s.pointer_up(x0 + 100.0, y0).unwrap();

    assert_eq!(recorded, 1);
    assert_eq!(s.tracker().entries()[0].target, a);
    assert_bbox(s.bbox_of(&a), Bbox::new(0.2, 0.1, 0.2, 0.2));
    assert_eq!(s.selection().to_vec(), vec![a]);
}

#[test]
fn test_drag_aborts_when_every_target_vanishes() {
    let (mut s, a, _) = two_axes();
    let (x0, y0) = px(Point::new(0.2, 0.2));

    s.pointer_down(x0, y0, Modifiers::NONE).unwrap();
    s.pointer_move(x0 + 50.0, y0);
    s.backend_mut().remove_element(&a);

    assert_eq!(s.pointer_up(x0 + 100.0, y0).unwrap(), 0);
    assert!(s.drag_state().is_idle());
    assert!(s.tracker().entries().is_empty());
    assert!(s.selection().is_empty());
}

#[test]
fn test_setter_on_removed_element() {
    let (mut s, a, _) = two_axes();
    s.backend_mut().remove_element(&a);

    let result = s.set_property(
        &a,
        PropertyPath::Position,
        vec![ArgValue::List(vec![0.0, 0.0, 0.5, 0.5])],
    );
    assert!(matches!(result, Err(EditError::StaleElementReference(id)) if id == a));
}

#[test]
fn test_setter_the_element_does_not_have() {
    let (mut s, a, _) = two_axes();
    let result = s.set_property(&a, PropertyPath::Text, vec![ArgValue::Str("x".into())]);
    assert!(matches!(
        result,
        Err(EditError::UnsupportedCapability { capability: "set_text", .. })
    ));
}

#[test]
fn test_select_ignores_missing_elements() {
    let (mut s, a, _) = two_axes();
    let ghost = ElementId::figure(1).child(figkit_core::Collection::Axes, 7);
    s.select([ghost, a.clone()]);
    assert_eq!(s.selection().to_vec(), vec![a]);
}

#[test]
fn test_history_survives_removed_element() {
    let (mut s, a, b) = two_axes();
    s.select([a.clone()]);
    s.move_selection(Point::new(0.1, 0.0)).unwrap();
    s.select([b.clone()]);
    s.move_selection(Point::new(0.0, 0.1)).unwrap();

    s.backend_mut().remove_element(&a);
    s.undo().unwrap();
    s.undo().unwrap();
    s.redo().unwrap();
    s.redo().unwrap();

    assert_bbox(s.bbox_of(&b), Bbox::new(0.5, 0.6, 0.2, 0.2));
    assert!(s.bbox_of(&a).is_none());
}
