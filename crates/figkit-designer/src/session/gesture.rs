//! Pointer input: the gesture state machine.
//!
//! `Idle -> Dragging | RubberBand -> Idle`. Pointer coordinates are canvas
//! pixels and go through the session viewport on every event, so zooming or
//! panning mid-gesture is safe.

use figkit_core::{AppEvent, Bbox, Point};

use super::{Session, CHANGE_EPSILON};
use crate::backend::FigureBackend;
use crate::drag::{snap_delta, ActiveDrag, DragState, DragTarget, GestureKind, TargetUpdate};
use crate::error::EditResult;
use crate::property::{args_approx_eq, ArgValue, PropertyPath};
use crate::selection::{self, HandleKind};

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true };
}

impl<B: FigureBackend> Session<B> {
    /// Starts a gesture at a canvas pixel position.
    ///
    /// - on a handle of the selection: resize or rotate it
    /// - on an element: select it (shift adds or removes) and move the selection
    /// - on empty canvas: rubber band selection
    pub fn pointer_down(&mut self, x_px: f64, y_px: f64, modifiers: Modifiers) -> EditResult<()> {
        self.ensure_idle()?;
        self.prune_stale();
        let point = self.viewport.pixel_to_figure(x_px, y_px);

        if let Some(bbox) = self.selection_bbox() {
            let handle = selection::handle_at(
                point,
                &bbox,
                &self.viewport,
                self.interaction.handle_tolerance_px,
                self.interaction.rotate_handle_offset_px,
            );
            if let Some(handle) = handle {
                let kind = match handle {
                    HandleKind::Rotate => GestureKind::Rotate,
                    other => GestureKind::Resize(other),
                };
                self.start_drag(kind, point);
                return Ok(());
            }
        }

        let candidates = self.positionable_elements();
        let hit = selection::hit_test(point, candidates.iter().map(|(id, b)| (id, *b)));
        match hit {
            Some(id) if modifiers.shift => {
                if self.selection.contains(&id) {
                    self.selection.remove(&id);
                } else {
                    self.selection.add(id);
                    self.start_drag(GestureKind::Move, point);
                }
            }
            Some(id) => {
                if !self.selection.contains(&id) {
                    self.selection.select([id]);
                }
                self.start_drag(GestureKind::Move, point);
            }
            None => {
                tracing::debug!("Rubber band from {}", point);
                self.drag = DragState::RubberBand {
                    start: point,
                    current: point,
                    additive: modifiers.shift,
                };
            }
        }
        Ok(())
    }

    /// Updates the active gesture. Intermediate positions are written to the
    /// figure but never recorded.
    pub fn pointer_move(&mut self, x_px: f64, y_px: f64) {
        let point = self.viewport.pixel_to_figure(x_px, y_px);
        if let DragState::RubberBand { current, .. } = &mut self.drag {
            *current = point;
        } else if matches!(self.drag, DragState::Dragging(_)) {
            self.update_drag(point);
        }
    }

    /// Ends the active gesture. Returns the number of recorded entries.
    pub fn pointer_up(&mut self, x_px: f64, y_px: f64) -> EditResult<usize> {
        let point = self.viewport.pixel_to_figure(x_px, y_px);
        match std::mem::take(&mut self.drag) {
            DragState::Idle => Ok(0),
            DragState::RubberBand { start, additive, .. } => {
                let candidates = self.positionable_elements();
                let hits = selection::elements_in_rect(
                    start,
                    point,
                    candidates.iter().map(|(id, b)| (id, *b)),
                );
                tracing::debug!("Rubber band selected {} elements", hits.len());
                if additive {
                    for id in hits {
                        self.selection.add(id);
                    }
                } else {
                    self.selection.select(hits);
                }
                Ok(0)
            }
            DragState::Dragging(drag) => {
                self.drag = DragState::Dragging(drag);
                if !self.update_drag(point) {
                    return Ok(0);
                }
                let DragState::Dragging(drag) = std::mem::take(&mut self.drag) else {
                    return Ok(0);
                };
                self.finish_drag(drag)
            }
        }
    }

    /// Aborts the active gesture, restoring every pre-gesture value.
    pub fn cancel_gesture(&mut self) {
        match std::mem::take(&mut self.drag) {
            DragState::Idle => {}
            DragState::RubberBand { .. } => tracing::debug!("Rubber band cancelled"),
            DragState::Dragging(drag) => {
                for target in &drag.targets {
                    for (property, args) in &target.snapshot {
                        if let Err(err) = self.backend.write(&target.id, *property, args) {
                            tracing::debug!("Could not restore {}.{}: {}", target.id, property, err);
                        }
                    }
                }
                self.backend.request_redraw();
                self.bus.publish(AppEvent::CanvasChanged);
                tracing::debug!("{} cancelled", drag.kind.label());
            }
        }
    }

    /// Current rubber band rectangle, if one is being drawn.
    pub fn rubber_band(&self) -> Option<Bbox> {
        match &self.drag {
            DragState::RubberBand { start, current, .. } => Some(Bbox::from_corners(*start, *current)),
            _ => None,
        }
    }

    fn start_drag(&mut self, kind: GestureKind, point: Point) {
        let mut targets = Vec::new();
        for id in self.independent_selection() {
            let Some(meta) = self.tree.resolve(&id, &self.backend) else {
                continue;
            };
            let Some(start_bbox) = meta.adapter.bbox(&id, &self.backend) else {
                continue;
            };
            let snapshot = meta
                .adapter
                .geometry_properties()
                .iter()
                .filter_map(|p| self.backend.read(&id, *p).map(|args| (*p, args)))
                .collect();
            targets.push(DragTarget {
                start_rotation: meta.adapter.rotation(&id, &self.backend),
                adapter: meta.adapter,
                id,
                start_bbox,
                snapshot,
            });
        }

        match ActiveDrag::new(kind, point, targets) {
            Some(drag) => {
                tracing::debug!("{} started with {} elements", kind.label(), drag.targets.len());
                self.drag = DragState::Dragging(drag);
            }
            None => tracing::debug!("Nothing to {}", kind.label().to_lowercase()),
        }
    }

    /// Writes the drag state for `point`. Returns `false` when every target
    /// vanished and the gesture was aborted.
    fn update_drag(&mut self, point: Point) -> bool {
        let DragState::Dragging(mut drag) = std::mem::take(&mut self.drag) else {
            return false;
        };

        let backend = &self.backend;
        let dropped = drag.retain_targets(|id| backend.kind_of(id).is_some());
        if !dropped.is_empty() {
            for id in &dropped {
                tracing::warn!("Dropped stale element {} from {}", id, drag.kind.label());
            }
            self.prune_stale();
        }
        if drag.targets.is_empty() {
            tracing::warn!("{} aborted, every element vanished", drag.kind.label());
            return false;
        }

        let mut delta = drag.delta(point);
        if drag.kind == GestureKind::Move && self.interaction.snapping_enabled() {
            let others = self.snap_candidates(&drag);
            let threshold = self.viewport.tolerance(self.interaction.snap_threshold_px);
            delta = snap_delta(&drag.start_union, &others, delta, threshold);
        }

        let updates = drag.updates(delta, point, self.interaction.min_extent);
        for (target, update) in drag.targets.iter().zip(updates) {
            let writes = match update {
                TargetUpdate::Bbox(bbox) => target
                    .adapter
                    .bbox_writes(&target.id, &self.backend, &bbox)
                    .unwrap_or_default(),
                TargetUpdate::Rotation(deg) => {
                    vec![(PropertyPath::Rotation, vec![ArgValue::Number(deg)])]
                }
                TargetUpdate::Unchanged => continue,
            };
            for (property, args) in writes {
                if let Err(err) = self.backend.write(&target.id, property, &args) {
                    tracing::debug!("Skipped {}.{}: {}", target.id, property, err);
                }
            }
        }

        self.backend.request_redraw();
        self.bus.publish(AppEvent::CanvasChanged);
        self.drag = DragState::Dragging(drag);
        true
    }

    /// Records one entry per property that differs from its pre-gesture
    /// value. Unchanged properties get their exact old value back.
    fn finish_drag(&mut self, drag: ActiveDrag) -> EditResult<usize> {
        let mut changes = Vec::new();
        for target in &drag.targets {
            for (property, before) in &target.snapshot {
                let Some(after) = self.backend.read(&target.id, *property) else {
                    continue;
                };
                if args_approx_eq(before, &after, CHANGE_EPSILON) {
                    if let Err(err) = self.backend.write(&target.id, *property, before) {
                        tracing::debug!("Could not restore {}.{}: {}", target.id, property, err);
                    }
                } else {
                    changes.push((target.id.clone(), *property, after));
                }
            }
        }

        if changes.is_empty() {
            tracing::debug!("{} ended without net change", drag.kind.label());
            self.backend.request_redraw();
            return Ok(0);
        }
        self.commit(drag.kind.label(), changes)
    }

    /// Boxes a moving selection may snap to.
    fn snap_candidates(&mut self, drag: &ActiveDrag) -> Vec<Bbox> {
        self.positionable_elements()
            .into_iter()
            .filter(|(id, _)| {
                !drag
                    .targets
                    .iter()
                    .any(|t| t.id == *id || id.is_descendant_of(&t.id))
            })
            .map(|(_, bbox)| bbox)
            .collect()
    }
}
