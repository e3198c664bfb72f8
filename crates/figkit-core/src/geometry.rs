//! Figure-fraction geometry.
//!
//! All boxes handled by the editor live in figure-fraction space: (0, 0) is
//! the bottom-left corner of the figure and (1, 1) the top-right corner, with
//! +Y going up. Boxes are stored the way the plotting library stores axes
//! positions, as origin plus extent (`[x0, y0, width, height]`).
//!
//! Frames: an element whose native coordinates are relative to its parent
//! (axes texts, legends) is converted through the parent's bbox with
//! [`Point::absolute_in`] / [`Point::relative_to`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::GeometryError;

/// Tolerance used for "did anything change" comparisons.
pub const EPSILON: f64 = 1e-12;

/// Compares two floats with an absolute tolerance.
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// A point or displacement in figure-fraction space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when used as a displacement.
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Returns `true` when both components are (nearly) zero.
    pub fn is_zero(&self) -> bool {
        self.x.abs() <= EPSILON && self.y.abs() <= EPSILON
    }

    /// Maps a point given in `frame`-fraction coordinates to the frame's
    /// enclosing space.
    pub fn absolute_in(&self, frame: &Bbox) -> Point {
        Point::new(
            frame.x0 + self.x * frame.width,
            frame.y0 + self.y * frame.height,
        )
    }

    /// Maps a point to coordinates relative to `frame` (0..1 inside it).
    pub fn relative_to(&self, frame: &Bbox) -> Point {
        Point::new(
            (self.x - frame.x0) / frame.width,
            (self.y - frame.y0) / frame.height,
        )
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

/// Axis-aligned bounding box stored as origin plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bbox {
    pub x0: f64,
    pub y0: f64,
    pub width: f64,
    pub height: f64,
}

impl Bbox {
    /// Creates a box from origin and extent.
    pub const fn new(x0: f64, y0: f64, width: f64, height: f64) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
        }
    }

    /// Creates a box from origin and extent, rejecting non-finite values and
    /// collapsed extents.
    pub fn checked(x0: f64, y0: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        if ![x0, y0, width, height].iter().all(|v| v.is_finite()) {
            return Err(GeometryError::NonFinite {
                context: format!("bbox [{x0}, {y0}, {width}, {height}]"),
            });
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(GeometryError::DegenerateExtent { width, height });
        }
        Ok(Self::new(x0, y0, width, height))
    }

    /// Creates a box spanning two arbitrary corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x0 = a.x.min(b.x);
        let y0 = a.y.min(b.y);
        Self::new(x0, y0, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    /// Right edge.
    pub fn x1(&self) -> f64 {
        self.x0 + self.width
    }

    /// Top edge.
    pub fn y1(&self) -> f64 {
        self.y0 + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x0 + self.width / 2.0, self.y0 + self.height / 2.0)
    }

    /// Width over height, `None` for a flat box.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height.abs() <= EPSILON {
            None
        } else {
            Some(self.width / self.height)
        }
    }

    /// Returns the box translated by `delta`.
    pub fn translated(&self, delta: Point) -> Bbox {
        Bbox::new(self.x0 + delta.x, self.y0 + delta.y, self.width, self.height)
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Bbox) -> Bbox {
        let x0 = self.x0.min(other.x0);
        let y0 = self.y0.min(other.y0);
        let x1 = self.x1().max(other.x1());
        let y1 = self.y1().max(other.y1());
        Bbox::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Union of every box in the iterator, `None` if it is empty.
    pub fn union_all<'a, I>(boxes: I) -> Option<Bbox>
    where
        I: IntoIterator<Item = &'a Bbox>,
    {
        boxes
            .into_iter()
            .fold(None, |acc: Option<Bbox>, b| match acc {
                Some(u) => Some(u.union(b)),
                None => Some(*b),
            })
    }

    /// Point containment with an inclusive tolerance on every edge.
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        point.x >= self.x0 - tolerance
            && point.x <= self.x1() + tolerance
            && point.y >= self.y0 - tolerance
            && point.y <= self.y1() + tolerance
    }

    /// Strict overlap test, touching edges do not count.
    pub fn intersects(&self, other: &Bbox) -> bool {
        self.x0 < other.x1() && self.x1() > other.x0 && self.y0 < other.y1() && self.y1() > other.y0
    }

    /// Returns `true` when either extent is zero or negative.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &Bbox, eps: f64) -> bool {
        approx_eq(self.x0, other.x0, eps)
            && approx_eq(self.y0, other.y0, eps)
            && approx_eq(self.width, other.width, eps)
            && approx_eq(self.height, other.height, eps)
    }

    /// Maps a box given relative to `frame` into the frame's enclosing space.
    pub fn absolute_in(&self, frame: &Bbox) -> Bbox {
        let origin = self.origin().absolute_in(frame);
        Bbox::new(
            origin.x,
            origin.y,
            self.width * frame.width,
            self.height * frame.height,
        )
    }

    /// Maps a box to coordinates relative to `frame`.
    pub fn relative_to(&self, frame: &Bbox) -> Bbox {
        let origin = self.origin().relative_to(frame);
        Bbox::new(
            origin.x,
            origin.y,
            self.width / frame.width,
            self.height / frame.height,
        )
    }

    /// The `[x0, y0, width, height]` form used by `set_position`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.x0, self.y0, self.width, self.height]
    }
}

impl fmt::Display for Bbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.4}, {:.4}, {:.4}, {:.4}]",
            self.x0, self.y0, self.width, self.height
        )
    }
}

/// Signed angle in degrees from `start - center` to `current - center`,
/// counter-clockwise positive, normalized to (-180, 180].
///
/// Returns 0 when either vector has no length.
pub fn angle_between(center: Point, start: Point, current: Point) -> f64 {
    let a = start - center;
    let b = current - center;
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    let mut deg = (b.y.atan2(b.x) - a.y.atan2(a.x)).to_degrees();
    while deg > 180.0 {
        deg -= 360.0;
    }
    while deg <= -180.0 {
        deg += 360.0;
    }
    deg
}
