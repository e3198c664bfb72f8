//! Native geometry of each element kind.
//!
//! Every adapter reports its bounding box in figure fraction and turns a
//! target box back into the setter calls that produce it:
//!
//! | Kind   | Native form                                 | Setter          |
//! |--------|---------------------------------------------|-----------------|
//! | Axes   | `[x, y, w, h]` figure fraction              | `set_position`  |
//! | Text   | anchor in parent fraction, pixel extent     | `set_position`  |
//! | Legend | anchor in parent axes fraction, pixel extent| `set_loc`       |
//! | Image  | `[left, right, bottom, top]` data units     | `set_extent`    |

use figkit_core::{Bbox, ElementId, Point};

use super::{Capabilities, ElementKind};
use crate::backend::FigureBackend;
use crate::property::{ArgValue, PropertyPath};

/// A setter call with its native arguments.
pub type PropertyWrite = (PropertyPath, Vec<ArgValue>);

const UNIT: Bbox = Bbox::new(0.0, 0.0, 1.0, 1.0);

/// Geometry adapter, resolved once per element from its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementAdapter {
    Figure,
    Axes { aspect_locked: bool },
    Text,
    Legend,
    Image,
    /// Lines and patches: color only
    Artist,
}

fn axes_bbox(id: &ElementId, backend: &dyn FigureBackend) -> Option<Bbox> {
    match backend.read(id, PropertyPath::Position)?.as_slice() {
        [ArgValue::List(v)] if v.len() == 4 => Some(Bbox::new(v[0], v[1], v[2], v[3])),
        _ => None,
    }
}

/// Box an element's native coordinates are relative to.
fn parent_frame(id: &ElementId, backend: &dyn FigureBackend) -> Option<Bbox> {
    let parent = id.parent()?;
    if parent.is_figure() {
        Some(UNIT)
    } else {
        axes_bbox(&parent, backend)
    }
}

fn read_pair(id: &ElementId, property: PropertyPath, backend: &dyn FigureBackend) -> Option<Point> {
    match backend.read(id, property)?.as_slice() {
        [ArgValue::Tuple(v)] if v.len() == 2 => Some(Point::new(v[0], v[1])),
        _ => None,
    }
}

/// Pixel extent converted to figure fraction.
fn extent_fraction(id: &ElementId, backend: &dyn FigureBackend) -> Option<(f64, f64)> {
    let (w_px, h_px) = backend.extent_px(id)?;
    let (w_in, h_in) = backend.size_inches();
    let dpi = backend.dpi();
    if w_in <= 0.0 || h_in <= 0.0 || dpi <= 0.0 {
        return None;
    }
    Some((w_px / (w_in * dpi), h_px / (h_in * dpi)))
}

/// Linear map between an axes' data limits and figure fraction.
struct DataFrame {
    axes: Bbox,
    x: (f64, f64),
    y: (f64, f64),
}

impl DataFrame {
    fn of_parent(id: &ElementId, backend: &dyn FigureBackend) -> Option<Self> {
        let parent = id.parent()?;
        let axes = axes_bbox(&parent, backend)?;
        let limits = backend.data_limits(&parent)?;
        if (limits.x.1 - limits.x.0).abs() <= f64::EPSILON
            || (limits.y.1 - limits.y.0).abs() <= f64::EPSILON
        {
            return None;
        }
        Some(Self {
            axes,
            x: limits.x,
            y: limits.y,
        })
    }

    fn to_fraction(&self, data: Point) -> Point {
        Point::new(
            self.axes.x0 + (data.x - self.x.0) / (self.x.1 - self.x.0) * self.axes.width,
            self.axes.y0 + (data.y - self.y.0) / (self.y.1 - self.y.0) * self.axes.height,
        )
    }

    fn to_data(&self, fraction: Point) -> Point {
        Point::new(
            self.x.0 + (fraction.x - self.axes.x0) / self.axes.width * (self.x.1 - self.x.0),
            self.y.0 + (fraction.y - self.axes.y0) / self.axes.height * (self.y.1 - self.y.0),
        )
    }
}

fn ordered(ascending: bool, a: f64, b: f64) -> (f64, f64) {
    let (lo, hi) = (a.min(b), a.max(b));
    if ascending {
        (lo, hi)
    } else {
        (hi, lo)
    }
}

fn read_extent(id: &ElementId, backend: &dyn FigureBackend) -> Option<[f64; 4]> {
    match backend.read(id, PropertyPath::Extent)?.as_slice() {
        [ArgValue::List(v)] if v.len() == 4 => Some([v[0], v[1], v[2], v[3]]),
        _ => None,
    }
}

impl ElementAdapter {
    /// Picks the adapter for an element of `kind`.
    pub fn resolve(kind: ElementKind, id: &ElementId, backend: &dyn FigureBackend) -> Self {
        match kind {
            ElementKind::Figure => ElementAdapter::Figure,
            ElementKind::Axes => ElementAdapter::Axes {
                aspect_locked: backend.aspect_locked(id),
            },
            ElementKind::Text => ElementAdapter::Text,
            ElementKind::Legend => ElementAdapter::Legend,
            ElementKind::Image => ElementAdapter::Image,
            ElementKind::Line | ElementKind::Patch => ElementAdapter::Artist,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            ElementAdapter::Figure => Capabilities::default(),
            ElementAdapter::Axes { aspect_locked } => Capabilities {
                position: true,
                size: true,
                aspect_locked: *aspect_locked,
                ..Default::default()
            },
            ElementAdapter::Text => Capabilities {
                position: true,
                rotation: true,
                text: true,
                color: true,
                font_size: true,
                ..Default::default()
            },
            ElementAdapter::Legend => Capabilities {
                position: true,
                ..Default::default()
            },
            ElementAdapter::Image => Capabilities {
                position: true,
                size: true,
                aspect_locked: true,
                ..Default::default()
            },
            ElementAdapter::Artist => Capabilities {
                color: true,
                ..Default::default()
            },
        }
    }

    /// Properties that hold the element's geometry.
    pub fn geometry_properties(&self) -> &'static [PropertyPath] {
        match self {
            ElementAdapter::Figure | ElementAdapter::Artist => &[],
            ElementAdapter::Axes { .. } => &[PropertyPath::Position],
            ElementAdapter::Text => &[PropertyPath::Position, PropertyPath::Rotation],
            ElementAdapter::Legend => &[PropertyPath::Loc],
            ElementAdapter::Image => &[PropertyPath::Extent],
        }
    }

    /// Bounding box in figure fraction.
    pub fn bbox(&self, id: &ElementId, backend: &dyn FigureBackend) -> Option<Bbox> {
        match self {
            ElementAdapter::Figure => Some(UNIT),
            ElementAdapter::Axes { .. } => axes_bbox(id, backend),
            ElementAdapter::Text | ElementAdapter::Legend => {
                let property = if *self == ElementAdapter::Text {
                    PropertyPath::Position
                } else {
                    PropertyPath::Loc
                };
                let anchor = read_pair(id, property, backend)?;
                let frame = parent_frame(id, backend)?;
                let (w, h) = extent_fraction(id, backend)?;
                let origin = anchor.absolute_in(&frame);
                Some(Bbox::new(origin.x, origin.y, w, h))
            }
            ElementAdapter::Image => {
                let [l, r, b, t] = read_extent(id, backend)?;
                let frame = DataFrame::of_parent(id, backend)?;
                Some(Bbox::from_corners(
                    frame.to_fraction(Point::new(l, b)),
                    frame.to_fraction(Point::new(r, t)),
                ))
            }
            ElementAdapter::Artist => None,
        }
    }

    /// Bounding box relative to the parent (axes or figure).
    pub fn bbox_in_parent(&self, id: &ElementId, backend: &dyn FigureBackend) -> Option<Bbox> {
        let bbox = self.bbox(id, backend)?;
        let frame = parent_frame(id, backend).unwrap_or(UNIT);
        Some(bbox.relative_to(&frame))
    }

    /// Setter calls that move (and, where supported, resize) the element to
    /// `target`. `None` when the element has no position.
    pub fn bbox_writes(
        &self,
        id: &ElementId,
        backend: &dyn FigureBackend,
        target: &Bbox,
    ) -> Option<Vec<PropertyWrite>> {
        match self {
            ElementAdapter::Figure | ElementAdapter::Artist => None,
            ElementAdapter::Axes { .. } => Some(vec![(
                PropertyPath::Position,
                vec![ArgValue::List(target.to_array().to_vec())],
            )]),
            ElementAdapter::Text | ElementAdapter::Legend => {
                let frame = parent_frame(id, backend)?;
                let anchor = target.origin().relative_to(&frame);
                let property = if *self == ElementAdapter::Text {
                    PropertyPath::Position
                } else {
                    PropertyPath::Loc
                };
                Some(vec![(property, vec![ArgValue::Tuple(vec![anchor.x, anchor.y])])])
            }
            ElementAdapter::Image => {
                let [l, r, b, t] = read_extent(id, backend)?;
                let frame = DataFrame::of_parent(id, backend)?;
                let lo = frame.to_data(target.origin());
                let hi = frame.to_data(Point::new(target.x1(), target.y1()));
                // keep the orientation the image was drawn with
                let (nl, nr) = ordered(l <= r, lo.x, hi.x);
                let (nb, nt) = ordered(b <= t, lo.y, hi.y);
                Some(vec![(PropertyPath::Extent, vec![ArgValue::List(vec![nl, nr, nb, nt])])])
            }
        }
    }

    /// Rotation in degrees, `None` for elements that cannot rotate.
    pub fn rotation(&self, id: &ElementId, backend: &dyn FigureBackend) -> Option<f64> {
        if !self.capabilities().rotation {
            return None;
        }
        match backend.read(id, PropertyPath::Rotation)?.as_slice() {
            [ArgValue::Number(deg)] => Some(*deg),
            _ => Some(0.0),
        }
    }
}
