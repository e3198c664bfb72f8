use figkit_core::{Bbox, Point};
use figkit_designer::{EditError, Modifiers};
use proptest::prelude::*;

use crate::common::{assert_bbox, drag, recipe, session};

#[test]
fn test_undo_redo_single_gesture() {
    let mut recipe = recipe();
    let a = recipe.add_axes(Bbox::new(0.1, 0.1, 0.2, 0.2));
    let b = recipe.add_axes(Bbox::new(0.5, 0.5, 0.2, 0.2));
    let mut s = session(recipe);
    s.select([a.clone(), b.clone()]);
    drag(&mut s, Point::new(0.2, 0.2), Point::new(0.3, 0.2), Modifiers::NONE).unwrap();

    s.undo().unwrap();
    assert_eq!(s.tracker().cursor(), 0);
    assert_eq!(s.bbox_of(&a), Some(Bbox::new(0.1, 0.1, 0.2, 0.2)));
    assert_eq!(s.bbox_of(&b), Some(Bbox::new(0.5, 0.5, 0.2, 0.2)));
    assert!(s.tracker().can_redo());

    s.redo().unwrap();
    assert_eq!(s.tracker().cursor(), 2);
    assert_bbox(s.bbox_of(&a), Bbox::new(0.2, 0.1, 0.2, 0.2));
    assert_bbox(s.bbox_of(&b), Bbox::new(0.6, 0.5, 0.2, 0.2));
}

#[test]
fn test_new_gesture_discards_redo_tail() {
    let mut recipe = recipe();
    let a = recipe.add_axes(Bbox::new(0.1, 0.1, 0.2, 0.2));
    let mut s = session(recipe);
    s.select([a.clone()]);

    s.move_selection(Point::new(0.1, 0.0)).unwrap();
    s.move_selection(Point::new(0.0, 0.1)).unwrap();
    s.undo().unwrap();
    assert_eq!(s.tracker().entries().len(), 2);

    s.move_selection(Point::new(0.0, -0.05)).unwrap();
    assert_eq!(s.tracker().entries().len(), 2);
    assert!(!s.tracker().can_redo());
    assert!(matches!(s.redo(), Err(EditError::NothingToRedo)));
    assert_bbox(s.bbox_of(&a), Bbox::new(0.2, 0.05, 0.2, 0.2));
}

#[test]
fn test_undo_on_empty_history() {
    let mut s = session(recipe());
    assert!(matches!(s.undo(), Err(EditError::NothingToUndo)));
    assert!(matches!(s.redo(), Err(EditError::NothingToRedo)));
}

#[test]
fn test_undo_replays_from_scratch() {
    let mut recipe = recipe();
    let a = recipe.add_axes(Bbox::new(0.1, 0.1, 0.2, 0.2));
    let mut s = session(recipe);
    s.select([a]);
    s.move_selection(Point::new(0.1, 0.0)).unwrap();

    let rebuilds = s.backend().rebuild_count();
    s.undo().unwrap();
    assert_eq!(s.backend().rebuild_count(), rebuilds + 1);
}

#[test]
fn test_undo_of_property_setter() {
    let mut recipe = recipe();
    let fig = figkit_core::ElementId::figure(1);
    let text = recipe.add_text(&fig, Point::new(0.4, 0.4), "old", (40.0, 12.0));
    let mut s = session(recipe);
    s.select([text]);

    assert_eq!(s.set_text("new").unwrap(), 1);
    assert_eq!(s.set_color("#ff0000").unwrap(), 1);
    assert_eq!(
        s.generated_code(),
        vec![
            "plt.figure(1).texts[0].set_text(\"new\")".to_string(),
            "plt.figure(1).texts[0].set_color(\"#ff0000\")".to_string(),
        ]
    );

    s.undo().unwrap();
    assert_eq!(s.generated_code().len(), 1);
    s.undo().unwrap();
    assert!(s.generated_code().is_empty());
    // undoing back to the opened state still needs a save
    assert!(s.is_dirty());
}

#[test]
fn test_invalid_font_size_is_rejected() {
    let mut recipe = recipe();
    let fig = figkit_core::ElementId::figure(1);
    let text = recipe.add_text(&fig, Point::new(0.4, 0.4), "t", (40.0, 12.0));
    let mut s = session(recipe);
    s.select([text]);

    assert!(matches!(s.set_font_size(0.0), Err(EditError::DegenerateGeometry(_))));
    assert!(matches!(s.set_font_size(f64::NAN), Err(EditError::DegenerateGeometry(_))));
    assert!(s.tracker().entries().is_empty());
}

fn step() -> impl Strategy<Value = (f64, f64)> {
    let magnitude = 0.001f64..0.05;
    (magnitude.clone(), magnitude, any::<bool>(), any::<bool>()).prop_map(|(dx, dy, fx, fy)| {
        (if fx { dx } else { -dx }, if fy { dy } else { -dy })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_undo_all_then_redo_all(steps in prop::collection::vec(step(), 1..8)) {
        let mut recipe = recipe();
        let a = recipe.add_axes(Bbox::new(0.3, 0.3, 0.2, 0.2));
        let start = Bbox::new(0.3, 0.3, 0.2, 0.2);
        let mut s = session(recipe);
        s.select([a.clone()]);

        for (dx, dy) in &steps {
            prop_assert_eq!(s.move_selection(Point::new(*dx, *dy)).unwrap(), 1);
        }
        let end = s.bbox_of(&a).unwrap();

        for _ in &steps {
            s.undo().unwrap();
        }
        prop_assert_eq!(s.bbox_of(&a), Some(start));
        prop_assert!(matches!(s.undo(), Err(EditError::NothingToUndo)));

        for _ in &steps {
            s.redo().unwrap();
        }
        prop_assert_eq!(s.bbox_of(&a), Some(end));
        prop_assert!(!s.tracker().can_redo());
    }

    #[test]
    fn prop_translation_is_uniform(
        count in 1usize..5,
        dx in -0.1f64..0.1,
        dy in -0.1f64..0.1,
    ) {
        let mut recipe = recipe();
        let ids: Vec<_> = (0..count)
            .map(|i| recipe.add_axes(Bbox::new(0.1 + 0.15 * i as f64, 0.2, 0.1, 0.1)))
            .collect();
        let mut s = session(recipe);
        s.select(ids.clone());
        let before: Vec<Bbox> = ids.iter().map(|id| s.bbox_of(id).unwrap()).collect();

        s.move_selection(Point::new(dx, dy)).unwrap();

        for (id, old) in ids.iter().zip(before) {
            let new = s.bbox_of(id).unwrap();
            prop_assert!((new.x0 - old.x0 - dx).abs() < 1e-9);
            prop_assert!((new.y0 - old.y0 - dy).abs() < 1e-9);
            prop_assert!((new.width - old.width).abs() < 1e-12);
            prop_assert!((new.height - old.height).abs() < 1e-12);
        }
    }
}
