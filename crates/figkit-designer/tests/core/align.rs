use figkit_core::{Bbox, ElementId, Point};
use figkit_designer::{Alignment, MemoryFigure, Session};

use crate::common::{assert_bbox, recipe, session};

fn three_axes() -> (Session<MemoryFigure>, Vec<ElementId>) {
    let mut recipe = recipe();
    let ids = vec![
        recipe.add_axes(Bbox::new(0.1, 0.1, 0.2, 0.1)),
        recipe.add_axes(Bbox::new(0.3, 0.5, 0.1, 0.2)),
        recipe.add_axes(Bbox::new(0.7, 0.3, 0.2, 0.2)),
    ];
    let mut s = session(recipe);
    s.select(ids.clone());
    (s, ids)
}

#[test]
fn test_align_left_is_one_undoable_gesture() {
    let (mut s, ids) = three_axes();

    assert_eq!(s.align(Alignment::LeftX).unwrap(), 2);
    for id in &ids {
        assert!((s.bbox_of(id).unwrap().x0 - 0.1).abs() < 1e-12);
    }
    assert_eq!(s.tracker().status().undo_label.as_deref(), Some(Alignment::LeftX.label()));

    s.undo().unwrap();
    assert_eq!(s.bbox_of(&ids[1]), Some(Bbox::new(0.3, 0.5, 0.1, 0.2)));
    assert_eq!(s.bbox_of(&ids[2]), Some(Bbox::new(0.7, 0.3, 0.2, 0.2)));
}

#[test]
fn test_align_top_uses_highest_edge() {
    let (mut s, ids) = three_axes();
    s.align(Alignment::TopY).unwrap();
    for id in &ids {
        assert!((s.bbox_of(id).unwrap().y1() - 0.7).abs() < 1e-12);
    }
}

#[test]
fn test_distribute_x_spaces_centers_evenly() {
    let (mut s, ids) = three_axes();
    s.align(Alignment::DistributeX).unwrap();

    let centers: Vec<f64> = ids.iter().map(|id| s.bbox_of(id).unwrap().center().x).collect();
    assert!((centers[0] - 0.2).abs() < 1e-12);
    assert!((centers[2] - 0.8).abs() < 1e-12);
    assert!((centers[1] - 0.5).abs() < 1e-12);
}

#[test]
fn test_group_arranges_a_grid() {
    let mut recipe = recipe();
    let ids = vec![
        recipe.add_axes(Bbox::new(0.1, 0.6, 0.3, 0.3)),
        recipe.add_axes(Bbox::new(0.55, 0.62, 0.25, 0.3)),
        recipe.add_axes(Bbox::new(0.12, 0.1, 0.3, 0.35)),
        recipe.add_axes(Bbox::new(0.6, 0.1, 0.3, 0.3)),
    ];
    let mut s = session(recipe);
    s.select(ids.clone());

    assert!(s.align(Alignment::Group).unwrap() > 0);

    let boxes: Vec<Bbox> = ids.iter().map(|id| s.bbox_of(id).unwrap()).collect();
    // equal sizes, rows and columns lined up
    for b in &boxes {
        assert!((b.width - boxes[0].width).abs() < 1e-9);
        assert!((b.height - boxes[0].height).abs() < 1e-9);
    }
    assert!((boxes[0].x0 - boxes[2].x0).abs() < 1e-9);
    assert!((boxes[1].x0 - boxes[3].x0).abs() < 1e-9);
    assert!((boxes[0].y0 - boxes[1].y0).abs() < 1e-9);
    assert!((boxes[2].y0 - boxes[3].y0).abs() < 1e-9);
    assert!(boxes[0].x1() < boxes[1].x0);
}

#[test]
fn test_single_element_is_not_aligned() {
    let mut recipe = recipe();
    let a = recipe.add_axes(Bbox::new(0.1, 0.1, 0.2, 0.2));
    let mut s = session(recipe);
    s.select([a.clone()]);

    assert_eq!(s.align(Alignment::RightX).unwrap(), 0);
    assert!(s.tracker().entries().is_empty());
}

#[test]
fn test_align_mixes_texts_and_axes() {
    let mut recipe = recipe();
    let fig = ElementId::figure(1);
    let ax = recipe.add_axes(Bbox::new(0.2, 0.2, 0.4, 0.4));
    let title = recipe.add_text(&fig, Point::new(0.5, 0.8), "title", (100.0, 20.0));
    let mut s = session(recipe);
    s.select([ax.clone(), title.clone()]);

    s.align(Alignment::LeftX).unwrap();

    assert_bbox(s.bbox_of(&title), Bbox::new(0.2, 0.8, 0.1, 0.02));
    assert_bbox(s.bbox_of(&ax), Bbox::new(0.2, 0.2, 0.4, 0.4));
}
