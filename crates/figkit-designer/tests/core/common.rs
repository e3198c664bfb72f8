//! Shared fixtures: a 10 x 10 in figure at 100 dpi, so one pixel is 0.001
//! of the figure in both directions.

use figkit_core::{Bbox, Point};
use figkit_designer::{EditResult, FigureRecipe, MemoryFigure, Modifiers, Session};

pub const SIDE_PX: f64 = 1000.0;

pub fn recipe() -> FigureRecipe {
    FigureRecipe::new(1, 10.0, 10.0, 100.0)
}

pub fn session(recipe: FigureRecipe) -> Session<MemoryFigure> {
    Session::new(MemoryFigure::new(recipe))
}

/// Canvas pixel of a figure fraction point.
pub fn px(p: Point) -> (f64, f64) {
    (p.x * SIDE_PX, SIDE_PX - p.y * SIDE_PX)
}

/// Full press, move, release gesture between two figure points.
pub fn drag(
    session: &mut Session<MemoryFigure>,
    from: Point,
    to: Point,
    modifiers: Modifiers,
) -> EditResult<usize> {
    let (x0, y0) = px(from);
    let (x1, y1) = px(to);
    session.pointer_down(x0, y0, modifiers)?;
    session.pointer_move((x0 + x1) / 2.0, (y0 + y1) / 2.0);
    session.pointer_up(x1, y1)
}

pub fn click(session: &mut Session<MemoryFigure>, at: Point, modifiers: Modifiers) -> EditResult<usize> {
    drag(session, at, at, modifiers)
}

pub fn assert_bbox(actual: Option<Bbox>, expected: Bbox) {
    let actual = actual.expect("element has a bounding box");
    assert!(
        actual.approx_eq(&expected, 1e-9),
        "bbox {:?} expected {:?}",
        actual,
        expected
    );
}
