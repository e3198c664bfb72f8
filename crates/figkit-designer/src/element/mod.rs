//! Figure elements as the editor sees them.
//!
//! - [`ElementKind`]: what an element is
//! - [`Capabilities`]: what the editor may change on it
//! - [`ElementAdapter`]: how its geometry maps to native setter calls
//! - [`ElementTree`]: lazily populated side-table of known elements

mod adapter;
mod tree;

pub use adapter::{ElementAdapter, PropertyWrite};
pub use tree::{ElementMeta, ElementTree};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a figure element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Figure,
    Axes,
    Text,
    Line,
    Patch,
    Image,
    Legend,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Figure => "figure",
            ElementKind::Axes => "axes",
            ElementKind::Text => "text",
            ElementKind::Line => "line",
            ElementKind::Patch => "patch",
            ElementKind::Image => "image",
            ElementKind::Legend => "legend",
        };
        f.write_str(name)
    }
}

/// What the editor can change on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub position: bool,
    pub size: bool,
    pub rotation: bool,
    pub text: bool,
    pub color: bool,
    pub font_size: bool,
    /// Resizing keeps the width/height ratio.
    pub aspect_locked: bool,
}

impl Capabilities {
    /// Returns `true` for elements that take part in hit tests and moves.
    pub fn is_positionable(&self) -> bool {
        self.position
    }
}
