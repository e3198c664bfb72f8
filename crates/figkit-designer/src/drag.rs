//! Gesture state and the geometry of move, resize and rotate.
//!
//! Everything here is pure: the session feeds pointer positions in figure
//! fraction and applies the resulting boxes through the element adapters.
//! Each computation starts from the pre-gesture state, so intermediate
//! frames never accumulate rounding error.

use figkit_core::{angle_between, Bbox, ElementId, Point};

use crate::element::{ElementAdapter, PropertyWrite};
use crate::selection::{Axis, HandleKind, Side};

/// What an active drag does to its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Move,
    Resize(HandleKind),
    Rotate,
}

impl GestureKind {
    pub fn label(&self) -> &'static str {
        match self {
            GestureKind::Move => "Move",
            GestureKind::Resize(_) => "Resize",
            GestureKind::Rotate => "Rotate",
        }
    }
}

/// An element taking part in a drag, with its pre-gesture state.
#[derive(Debug, Clone, PartialEq)]
pub struct DragTarget {
    pub id: ElementId,
    pub adapter: ElementAdapter,
    pub start_bbox: Bbox,
    pub start_rotation: Option<f64>,
    /// Native values of the geometry properties before the gesture.
    pub snapshot: Vec<PropertyWrite>,
}

impl DragTarget {
    fn sizable(&self) -> bool {
        self.adapter.capabilities().size
    }

    fn aspect_locked(&self) -> bool {
        self.adapter.capabilities().aspect_locked
    }
}

/// New state of one target for the current pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetUpdate {
    Bbox(Bbox),
    Rotation(f64),
    /// The gesture does not apply to this element
    Unchanged,
}

/// A drag in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDrag {
    pub kind: GestureKind,
    /// Pointer position at pointer-down, figure fraction.
    pub start: Point,
    /// Union of the targets' pre-gesture boxes.
    pub start_union: Bbox,
    pub targets: Vec<DragTarget>,
}

impl ActiveDrag {
    /// Creates a drag; `None` when there is nothing to drag.
    pub fn new(kind: GestureKind, start: Point, targets: Vec<DragTarget>) -> Option<Self> {
        let boxes: Vec<Bbox> = targets.iter().map(|t| t.start_bbox).collect();
        let start_union = Bbox::union_all(boxes.iter())?;
        Some(Self {
            kind,
            start,
            start_union,
            targets,
        })
    }

    /// Pointer displacement since pointer-down.
    pub fn delta(&self, current: Point) -> Point {
        current - self.start
    }

    /// Target states for a pointer displacement of `delta`.
    ///
    /// `current` is only used by rotations. Updates line up with
    /// [`ActiveDrag::targets`].
    pub fn updates(&self, delta: Point, current: Point, min_extent: f64) -> Vec<TargetUpdate> {
        match self.kind {
            GestureKind::Move => self
                .targets
                .iter()
                .map(|t| TargetUpdate::Bbox(t.start_bbox.translated(delta)))
                .collect(),
            GestureKind::Resize(handle) => {
                let scale = ResizeScale::compute(&self.start_union, handle, delta, min_extent);
                self.targets
                    .iter()
                    .map(|t| {
                        TargetUpdate::Bbox(scale.apply(
                            &t.start_bbox,
                            t.sizable(),
                            t.aspect_locked(),
                            min_extent,
                        ))
                    })
                    .collect()
            }
            GestureKind::Rotate => {
                let angle = angle_between(self.start_union.center(), self.start, current);
                self.targets
                    .iter()
                    .map(|t| match t.start_rotation {
                        Some(start) => TargetUpdate::Rotation(start + angle),
                        None => TargetUpdate::Unchanged,
                    })
                    .collect()
            }
        }
    }

    /// Drops targets whose element no longer exists. Returns the dropped ids.
    pub fn retain_targets<F: FnMut(&ElementId) -> bool>(&mut self, mut alive: F) -> Vec<ElementId> {
        let mut dropped = Vec::new();
        self.targets.retain(|t| {
            let keep = alive(&t.id);
            if !keep {
                dropped.push(t.id.clone());
            }
            keep
        });
        dropped
    }
}

/// Gesture engine state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
    RubberBand {
        start: Point,
        current: Point,
        /// Shift was held: add to the selection instead of replacing it
        additive: bool,
    },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DragState::Idle => "idle",
            DragState::Dragging(_) => "dragging",
            DragState::RubberBand { .. } => "rubber band",
        }
    }
}

/// Scale factors of a resize about a fixed anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeScale {
    pub anchor: Point,
    pub sx: f64,
    pub sy: f64,
    handle: HandleKind,
}

impl ResizeScale {
    /// Scale that moves `handle` of `union` by `delta`.
    ///
    /// The resized union never gets narrower or lower than `min_extent`.
    pub fn compute(union: &Bbox, handle: HandleKind, delta: Point, min_extent: f64) -> Self {
        let anchor = handle.anchor(union);
        let scale = |side: Option<Side>, extent: f64, d: f64| {
            if extent <= 0.0 {
                return 1.0;
            }
            let new_extent = match side {
                Some(Side::Max) => extent + d,
                Some(Side::Min) => extent - d,
                None => return 1.0,
            };
            new_extent.max(min_extent) / extent
        };
        Self {
            anchor,
            sx: scale(handle.x_side(), union.width, delta.x),
            sy: scale(handle.y_side(), union.height, delta.y),
            handle,
        }
    }

    /// Single factor used for elements that keep their aspect ratio.
    pub fn uniform(&self) -> f64 {
        match self.handle {
            HandleKind::Edge { axis: Axis::Y, .. } => self.sy,
            _ => self.sx,
        }
    }

    /// Resized box of one element.
    ///
    /// Elements that cannot change size keep their extent and only follow
    /// the scaled position of their origin.
    ///
    /// Aspect-locked elements scale by one factor, raised until neither
    /// side is below `min_extent`, so their ratio survives the clamp.
    pub fn apply(&self, start: &Bbox, sizable: bool, aspect_locked: bool, min_extent: f64) -> Bbox {
        if sizable && aspect_locked {
            let mut s = self.uniform();
            if start.width > 0.0 {
                s = s.max(min_extent / start.width);
            }
            if start.height > 0.0 {
                s = s.max(min_extent / start.height);
            }
            return Bbox::new(
                self.anchor.x + (start.x0 - self.anchor.x) * s,
                self.anchor.y + (start.y0 - self.anchor.y) * s,
                start.width * s,
                start.height * s,
            );
        }
        let (sx, sy) = if aspect_locked {
            (self.uniform(), self.uniform())
        } else {
            (self.sx, self.sy)
        };
        let x0 = self.anchor.x + (start.x0 - self.anchor.x) * sx;
        let y0 = self.anchor.y + (start.y0 - self.anchor.y) * sy;
        if !sizable {
            return Bbox::new(x0, y0, start.width, start.height);
        }
        Bbox::new(
            x0,
            y0,
            (start.width * sx).max(min_extent),
            (start.height * sy).max(min_extent),
        )
    }
}

/// Adjusts a move so the moved box's edges or center line up with another
/// box's edges or center.
///
/// Each axis snaps independently to the closest candidate within
/// `threshold` (figure fraction per axis).
pub fn snap_delta(moving: &Bbox, others: &[Bbox], delta: Point, threshold: Point) -> Point {
    let moved = moving.translated(delta);
    let lines_x = |b: &Bbox| [b.x0, b.center().x, b.x1()];
    let lines_y = |b: &Bbox| [b.y0, b.center().y, b.y1()];

    let best = |own: [f64; 3], theirs: Vec<[f64; 3]>, limit: f64| {
        let mut best: Option<f64> = None;
        for other in theirs {
            for target in other {
                for value in own {
                    let diff = target - value;
                    if diff.abs() <= limit && best.is_none_or(|b| diff.abs() < b.abs()) {
                        best = Some(diff);
                    }
                }
            }
        }
        best.unwrap_or(0.0)
    };

    Point::new(
        delta.x + best(lines_x(&moved), others.iter().map(lines_x).collect(), threshold.x),
        delta.y + best(lines_y(&moved), others.iter().map(lines_y).collect(), threshold.y),
    )
}
