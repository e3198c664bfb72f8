//! Access to the plotting library.
//!
//! The editor never touches the plotting library directly. Everything it
//! needs (tree traversal, typed setter calls, rendered extents, rebuilds) goes
//! through [`FigureBackend`]. [`MemoryFigure`] is a complete in-memory
//! implementation.

mod memory;

pub use memory::{FigureRecipe, MemoryFigure};

use thiserror::Error;

use figkit_core::ElementId;

use crate::element::ElementKind;
use crate::property::{ArgValue, PropertyPath};

/// Errors reported by a figure backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Unknown element {0}")]
    UnknownElement(ElementId),

    #[error("{element} has no setter {property}")]
    UnsupportedProperty {
        element: ElementId,
        property: PropertyPath,
    },

    #[error("Invalid arguments for {property}: {reason}")]
    InvalidArguments {
        property: PropertyPath,
        reason: String,
    },

    #[error("Figure rebuild failed: {0}")]
    Rebuild(String),
}

/// Axis limits of an axes, in data units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataLimits {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

/// Native interface to one figure of the plotting library.
pub trait FigureBackend {
    /// Number the figure was created with.
    fn figure_number(&self) -> u32;

    /// Figure size in inches.
    fn size_inches(&self) -> (f64, f64);

    /// Render resolution in pixels per inch.
    fn dpi(&self) -> f64;

    /// Direct children of `parent`, in draw order.
    fn children(&self, parent: &ElementId) -> Vec<ElementId>;

    /// Kind of the element, `None` if it does not exist.
    fn kind_of(&self, id: &ElementId) -> Option<ElementKind>;

    /// Current value of a property in native units.
    fn read(&self, id: &ElementId, property: PropertyPath) -> Option<Vec<ArgValue>>;

    /// Calls a setter with native arguments.
    fn write(
        &mut self,
        id: &ElementId,
        property: PropertyPath,
        args: &[ArgValue],
    ) -> Result<(), BackendError>;

    /// Rendered size in pixels of elements whose extent is not a property
    /// (text, legends).
    fn extent_px(&self, id: &ElementId) -> Option<(f64, f64)>;

    /// Whether resizing must keep the element's aspect ratio.
    fn aspect_locked(&self, id: &ElementId) -> bool;

    /// Data limits of an axes.
    fn data_limits(&self, axes: &ElementId) -> Option<DataLimits>;

    /// Recreates the figure from its construction code, discarding every
    /// setter call made since.
    fn rebuild(&mut self) -> Result<(), BackendError>;

    /// Schedules a redraw.
    fn request_redraw(&mut self);
}
