//! One-shot edits outside the pointer state machine.
//!
//! Every action records its writes as a single gesture group and is refused
//! while a gesture is active.

use figkit_core::units::{format_length, parse_length};
use figkit_core::{AppEvent, Bbox, ElementId, Point};

use super::Session;
use crate::align::{self, Alignment};
use crate::backend::FigureBackend;
use crate::element::{Capabilities, ElementAdapter, ElementKind, PropertyWrite};
use crate::error::{EditError, EditResult};
use crate::property::{ArgValue, PropertyPath};

/// Arrow-key direction for [`Session::nudge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl<B: FigureBackend> Session<B> {
    /// Aligns or distributes the selection.
    ///
    /// `Group` only arranges elements that can be resized.
    pub fn align(&mut self, alignment: Alignment) -> EditResult<usize> {
        self.ensure_idle()?;
        let targets = self.positioned_targets(|caps| !alignment.resizes() || caps.size);
        let boxes: Vec<Bbox> = targets.iter().map(|(_, _, b)| *b).collect();
        let aligned = align::align(alignment, &boxes);
        let plan = self.bbox_plan(&targets, &aligned);
        self.apply_and_commit(alignment.label(), plan)
    }

    /// Translates the selection by `delta` (figure fraction).
    pub fn move_selection(&mut self, delta: Point) -> EditResult<usize> {
        self.translate_selection(delta, "Move")
    }

    /// Translates the selection by the configured pixel step.
    pub fn nudge(&mut self, direction: Direction) -> EditResult<usize> {
        let step = self.viewport.tolerance(self.interaction.nudge_step_px);
        let delta = match direction {
            Direction::Left => Point::new(-step.x, 0.0),
            Direction::Right => Point::new(step.x, 0.0),
            Direction::Up => Point::new(0.0, step.y),
            Direction::Down => Point::new(0.0, -step.y),
        };
        self.translate_selection(delta, "Nudge")
    }

    pub fn set_text(&mut self, text: &str) -> EditResult<usize> {
        self.set_on_selection(
            PropertyPath::Text,
            vec![ArgValue::Str(text.to_string())],
            |caps| caps.text,
        )
    }

    /// Sets the color of every selected element that has one. Colors are
    /// passed through to the plotting library as given.
    pub fn set_color(&mut self, color: &str) -> EditResult<usize> {
        self.set_on_selection(
            PropertyPath::Color,
            vec![ArgValue::Str(color.to_string())],
            |caps| caps.color,
        )
    }

    pub fn set_font_size(&mut self, size: f64) -> EditResult<usize> {
        if !size.is_finite() || size <= 0.0 {
            return Err(EditError::DegenerateGeometry(format!("font size {}", size)));
        }
        self.set_on_selection(PropertyPath::FontSize, vec![ArgValue::Number(size)], |caps| {
            caps.font_size
        })
    }

    /// Sets the rotation in degrees.
    pub fn set_rotation(&mut self, degrees: f64) -> EditResult<usize> {
        if !degrees.is_finite() {
            return Err(EditError::DegenerateGeometry(format!("rotation {}", degrees)));
        }
        self.set_on_selection(PropertyPath::Rotation, vec![ArgValue::Number(degrees)], |caps| {
            caps.rotation
        })
    }

    /// Resizes the figure while every figure-level element keeps its
    /// physical size and its distance to the anchored edges.
    ///
    /// By default the top and left edges stay put; `cut_from_top` anchors
    /// the bottom edge instead and `cut_from_left` the right edge.
    pub fn set_figure_size(
        &mut self,
        width_in: f64,
        height_in: f64,
        cut_from_top: bool,
        cut_from_left: bool,
    ) -> EditResult<usize> {
        self.ensure_idle()?;
        if !(width_in.is_finite() && height_in.is_finite() && width_in > 0.0 && height_in > 0.0) {
            return Err(EditError::DegenerateGeometry(format!(
                "figure size {} x {} in",
                width_in, height_in
            )));
        }

        let (old_w, old_h) = self.backend.size_inches();
        let fx = old_w / width_in;
        let fy = old_h / height_in;
        let map_x = |x: f64| if cut_from_left { 1.0 - (1.0 - x) * fx } else { x * fx };
        let map_y = |y: f64| if cut_from_top { y * fy } else { 1.0 - (1.0 - y) * fy };

        let figure = ElementId::figure(self.figure_number());
        let mut plan: Vec<(ElementId, Vec<PropertyWrite>)> = vec![(
            figure.clone(),
            vec![(
                PropertyPath::SizeInches,
                vec![ArgValue::Number(width_in), ArgValue::Number(height_in)],
            )],
        )];
        for child in self.tree.children(&figure, &self.backend) {
            let kind = self.backend.kind_of(&child);
            let Some(current) = self.backend.read(&child, PropertyPath::Position) else {
                continue;
            };
            let scaled = match (kind, current.as_slice()) {
                (Some(ElementKind::Axes), [ArgValue::List(v)]) if v.len() == 4 => {
                    ArgValue::List(vec![map_x(v[0]), map_y(v[1]), v[2] * fx, v[3] * fy])
                }
                (Some(ElementKind::Text), [ArgValue::Tuple(v)]) if v.len() == 2 => {
                    ArgValue::Tuple(vec![map_x(v[0]), map_y(v[1])])
                }
                _ => continue,
            };
            plan.push((child, vec![(PropertyPath::Position, vec![scaled])]));
        }

        let count = self.apply_and_commit("Resize figure", plan)?;
        let (w, h) = self.backend.size_inches();
        self.viewport.set_figure_size(w, h, self.backend.dpi());
        self.bus.publish(AppEvent::FigureSizeChanged {
            width_in: w,
            height_in: h,
        });
        tracing::info!("Figure {} resized to {} x {} in", self.figure_number(), w, h);
        Ok(count)
    }

    /// Figure size as typed in the property panel (`"12cm"`, `"4 in"`);
    /// numbers without a unit are read in the configured display unit.
    pub fn set_figure_size_text(
        &mut self,
        width: &str,
        height: &str,
        cut_from_top: bool,
        cut_from_left: bool,
    ) -> EditResult<usize> {
        let unit = self.output.display_unit;
        let parse = |text: &str| {
            parse_length(text, unit).map_err(|e| EditError::DegenerateGeometry(e.to_string()))
        };
        let (width_in, height_in) = (parse(width)?, parse(height)?);
        self.set_figure_size(width_in, height_in, cut_from_top, cut_from_left)
    }

    /// Physical size of an element in the display unit, e.g. `"5.08 cm x 2.54 cm"`.
    pub fn size_label(&mut self, id: &ElementId) -> Option<String> {
        let bbox = self.bbox_of(id)?;
        let (w_in, h_in) = self.backend.size_inches();
        let unit = self.output.display_unit;
        Some(format!(
            "{} x {}",
            format_length(bbox.width * w_in, unit),
            format_length(bbox.height * h_in, unit)
        ))
    }

    fn translate_selection(&mut self, delta: Point, label: &str) -> EditResult<usize> {
        self.ensure_idle()?;
        let targets = self.positioned_targets(|_| true);
        let moved: Vec<Bbox> = targets.iter().map(|(_, _, b)| b.translated(delta)).collect();
        let plan = self.bbox_plan(&targets, &moved);
        self.apply_and_commit(label, plan)
    }

    fn set_on_selection(
        &mut self,
        property: PropertyPath,
        args: Vec<ArgValue>,
        capable: fn(&Capabilities) -> bool,
    ) -> EditResult<usize> {
        self.ensure_idle()?;
        self.prune_stale();
        let mut plan = Vec::new();
        for id in self.selection.to_vec() {
            match self.tree.resolve(&id, &self.backend) {
                Some(meta) if capable(&meta.capabilities()) => {
                    plan.push((id, vec![(property, args.clone())]));
                }
                Some(meta) => tracing::debug!("{} ({}) has no {}", id, meta.kind, property),
                None => {}
            }
        }
        self.apply_and_commit(property.label(), plan)
    }

    /// Independently positioned selected elements passing `filter`, with
    /// their adapters and boxes.
    fn positioned_targets(
        &mut self,
        filter: impl Fn(&Capabilities) -> bool,
    ) -> Vec<(ElementId, ElementAdapter, Bbox)> {
        self.prune_stale();
        let mut targets = Vec::new();
        for id in self.independent_selection() {
            let Some(meta) = self.tree.resolve(&id, &self.backend) else {
                continue;
            };
            let caps = meta.capabilities();
            if !caps.is_positionable() || !filter(&caps) {
                continue;
            }
            if let Some(bbox) = meta.adapter.bbox(&id, &self.backend) {
                targets.push((id, meta.adapter, bbox));
            }
        }
        targets
    }

    fn bbox_plan(
        &self,
        targets: &[(ElementId, ElementAdapter, Bbox)],
        boxes: &[Bbox],
    ) -> Vec<(ElementId, Vec<PropertyWrite>)> {
        targets
            .iter()
            .zip(boxes)
            .filter_map(|((id, adapter, _), bbox)| {
                let writes = adapter.bbox_writes(id, &self.backend, bbox)?;
                Some((id.clone(), writes))
            })
            .collect()
    }
}
