//! Selection state and selection geometry.
//!
//! `SelectionModel` tracks:
//! - the set of selected elements, kept in reference order so iteration is
//!   deterministic
//! - the "primary" element, the one the property panel shows
//!
//! Every change is published as [`AppEvent::SelectionChanged`].
//!
//! Geometry helpers compute the union box, the nine handles around it and
//! the hit tests used by the gesture engine.

use std::collections::BTreeSet;
use std::sync::Arc;

use figkit_core::{AppEvent, Bbox, ElementId, EventBus, Point};

use crate::viewport::Viewport;

/// Side of a box along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// One of the nine selection handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Corner at the given sides, e.g. `{ x: Max, y: Max }` is top-right
    Corner { x: Side, y: Side },
    /// Midpoint of an edge, moving only along `axis`
    Edge { axis: Axis, side: Side },
    /// Rotation grip above the top edge
    Rotate,
}

impl HandleKind {
    /// The eight resize handles, corners first.
    pub const RESIZE: [HandleKind; 8] = [
        HandleKind::Corner { x: Side::Min, y: Side::Min },
        HandleKind::Corner { x: Side::Max, y: Side::Min },
        HandleKind::Corner { x: Side::Min, y: Side::Max },
        HandleKind::Corner { x: Side::Max, y: Side::Max },
        HandleKind::Edge { axis: Axis::X, side: Side::Min },
        HandleKind::Edge { axis: Axis::X, side: Side::Max },
        HandleKind::Edge { axis: Axis::Y, side: Side::Min },
        HandleKind::Edge { axis: Axis::Y, side: Side::Max },
    ];

    /// Side moved along x, `None` if the handle does not move x.
    pub fn x_side(self) -> Option<Side> {
        match self {
            HandleKind::Corner { x, .. } => Some(x),
            HandleKind::Edge { axis: Axis::X, side } => Some(side),
            _ => None,
        }
    }

    /// Side moved along y, `None` if the handle does not move y.
    pub fn y_side(self) -> Option<Side> {
        match self {
            HandleKind::Corner { y, .. } => Some(y),
            HandleKind::Edge { axis: Axis::Y, side } => Some(side),
            _ => None,
        }
    }

    /// Fixed point of a resize: the opposite corner or edge.
    pub fn anchor(self, bbox: &Bbox) -> Point {
        let pick = |side: Option<Side>, min: f64, max: f64, mid: f64| match side {
            Some(Side::Min) => max,
            Some(Side::Max) => min,
            None => mid,
        };
        let c = bbox.center();
        Point::new(
            pick(self.x_side(), bbox.x0, bbox.x1(), c.x),
            pick(self.y_side(), bbox.y0, bbox.y1(), c.y),
        )
    }

    /// Where the handle sits on `bbox`. The rotate handle is placed
    /// `rotate_offset` above the top edge.
    pub fn position(self, bbox: &Bbox, rotate_offset: f64) -> Point {
        if self == HandleKind::Rotate {
            return Point::new(bbox.center().x, bbox.y1() + rotate_offset);
        }
        let c = bbox.center();
        let pick = |side: Option<Side>, min: f64, max: f64, mid: f64| match side {
            Some(Side::Min) => min,
            Some(Side::Max) => max,
            None => mid,
        };
        Point::new(
            pick(self.x_side(), bbox.x0, bbox.x1(), c.x),
            pick(self.y_side(), bbox.y0, bbox.y1(), c.y),
        )
    }
}

/// A handle with its position in figure fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub position: Point,
}

/// All nine handles of `bbox`.
pub fn handles(bbox: &Bbox, viewport: &Viewport, rotate_offset_px: f64) -> Vec<Handle> {
    let offset = viewport.tolerance(rotate_offset_px).y;
    HandleKind::RESIZE
        .iter()
        .copied()
        .chain(std::iter::once(HandleKind::Rotate))
        .map(|kind| Handle {
            kind,
            position: kind.position(bbox, offset),
        })
        .collect()
}

/// Handle within `tolerance_px` screen pixels of `point`.
pub fn handle_at(
    point: Point,
    bbox: &Bbox,
    viewport: &Viewport,
    tolerance_px: f64,
    rotate_offset_px: f64,
) -> Option<HandleKind> {
    let tol = viewport.tolerance(tolerance_px);
    handles(bbox, viewport, rotate_offset_px)
        .into_iter()
        .find(|h| (h.position.x - point.x).abs() <= tol.x && (h.position.y - point.y).abs() <= tol.y)
        .map(|h| h.kind)
}

/// Topmost candidate containing `point`.
///
/// Candidates come in draw order; later ones are drawn above earlier ones.
pub fn hit_test<'a, I>(point: Point, candidates: I) -> Option<ElementId>
where
    I: IntoIterator<Item = (&'a ElementId, Bbox)>,
{
    candidates
        .into_iter()
        .filter(|(_, bbox)| bbox.contains(point, 0.0))
        .last()
        .map(|(id, _)| id.clone())
}

/// Candidates whose box overlaps the rectangle spanned by `a` and `b`.
pub fn elements_in_rect<'a, I>(a: Point, b: Point, candidates: I) -> Vec<ElementId>
where
    I: IntoIterator<Item = (&'a ElementId, Bbox)>,
{
    let rect = Bbox::from_corners(a, b);
    candidates
        .into_iter()
        .filter(|(_, bbox)| bbox.intersects(&rect))
        .map(|(id, _)| id.clone())
        .collect()
}

/// The current selection.
#[derive(Debug)]
pub struct SelectionModel {
    selected: BTreeSet<ElementId>,
    primary: Option<ElementId>,
    bus: Arc<EventBus>,
}

impl SelectionModel {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            selected: BTreeSet::new(),
            primary: None,
            bus,
        }
    }

    pub fn primary(&self) -> Option<&ElementId> {
        self.primary.as_ref()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.selected.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementId> {
        self.selected.iter()
    }

    pub fn to_vec(&self) -> Vec<ElementId> {
        self.selected.iter().cloned().collect()
    }

    /// Replaces the selection. The first element becomes primary.
    pub fn select<I: IntoIterator<Item = ElementId>>(&mut self, ids: I) {
        let ids: Vec<ElementId> = ids.into_iter().collect();
        let primary = ids.first().cloned();
        let selected: BTreeSet<ElementId> = ids.into_iter().collect();
        if selected == self.selected && primary == self.primary {
            return;
        }
        self.selected = selected;
        self.primary = primary;
        self.notify();
    }

    /// Adds an element and makes it primary.
    pub fn add(&mut self, id: ElementId) {
        let inserted = self.selected.insert(id.clone());
        if inserted || self.primary.as_ref() != Some(&id) {
            self.primary = Some(id);
            self.notify();
        }
    }

    /// Removes an element; if it was primary another selected element
    /// takes over.
    pub fn remove(&mut self, id: &ElementId) {
        if !self.selected.remove(id) {
            return;
        }
        if self.primary.as_ref() == Some(id) {
            self.primary = self.selected.iter().next().cloned();
        }
        self.notify();
    }

    pub fn toggle(&mut self, id: ElementId) {
        if self.selected.contains(&id) {
            self.remove(&id);
        } else {
            self.add(id);
        }
    }

    pub fn clear(&mut self) {
        if self.selected.is_empty() && self.primary.is_none() {
            return;
        }
        self.selected.clear();
        self.primary = None;
        self.notify();
    }

    /// Keeps only elements for which `keep` returns `true`.
    ///
    /// Returns the dropped elements.
    pub fn retain<F: FnMut(&ElementId) -> bool>(&mut self, mut keep: F) -> Vec<ElementId> {
        let dropped: Vec<ElementId> = self.selected.iter().filter(|id| !keep(id)).cloned().collect();
        if dropped.is_empty() {
            return dropped;
        }
        for id in &dropped {
            self.selected.remove(id);
        }
        if self.primary.as_ref().is_some_and(|p| !self.selected.contains(p)) {
            self.primary = self.selected.iter().next().cloned();
        }
        self.notify();
        dropped
    }

    /// Union box of the selection, given a box lookup.
    pub fn bounding_box<F>(&self, mut bbox_of: F) -> Option<Bbox>
    where
        F: FnMut(&ElementId) -> Option<Bbox>,
    {
        let boxes: Vec<Bbox> = self.selected.iter().filter_map(|id| bbox_of(id)).collect();
        Bbox::union_all(boxes.iter())
    }

    fn notify(&self) {
        self.bus.publish(AppEvent::SelectionChanged {
            primary: self.primary.clone(),
            selected: self.to_vec(),
        });
    }
}
