//! # FigKit Designer
//!
//! Interactive editing of plotting-library figures: select elements, drag
//! them around, resize and rotate them, and keep every change as a
//! replayable edit that is saved back into the figure script as generated
//! code.
//!
//! ## Core Components
//!
//! ### Figure Access
//! - **Backend**: the [`FigureBackend`] trait the plotting library is reached through
//! - **Elements**: kinds, capability sets and per-kind geometry adapters
//! - **Viewport**: canvas pixels to figure fraction, zoom and pan
//!
//! ### Interaction
//! - **Selection**: selected set, handles, hit tests and rubber band
//! - **Drag**: move, resize and rotate math, optional snapping
//! - **Align**: alignment, distribution and grid arrangement
//!
//! ### Persistence
//! - **History**: change log with gesture grouping, undo/redo by replay
//! - **Codegen**: generated statements and the block they live in
//!
//! ## Architecture
//!
//! ```text
//! Session (one per figure, held by SessionRegistry)
//!   ├── Viewport          pointer pixels -> figure fraction
//!   ├── SelectionModel    selected elements, handles
//!   ├── DragState         Idle | Dragging | RubberBand
//!   ├── ElementTree       lazily resolved adapters
//!   └── ChangeTracker     entries + cursor + baseline
//!         └── script      generated block in the figure script
//!
//! FigureBackend (plotting library, or MemoryFigure)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use figkit_core::Bbox;
//! use figkit_designer::backend::{FigureRecipe, MemoryFigure};
//! use figkit_designer::session::{Modifiers, Session};
//!
//! let mut recipe = FigureRecipe::new(1, 8.0, 6.0, 100.0);
//! recipe.add_axes(Bbox::new(0.1, 0.1, 0.4, 0.4));
//! let mut session = Session::new(MemoryFigure::new(recipe));
//!
//! // drag the axes 80 px to the right (800 px wide figure)
//! session.pointer_down(200.0, 400.0, Modifiers::NONE)?;
//! session.pointer_move(240.0, 400.0);
//! let recorded = session.pointer_up(280.0, 400.0)?;
//! assert_eq!(recorded, 1);
//! assert_eq!(session.generated_code().len(), 1);
//! # Ok::<(), figkit_designer::EditError>(())
//! ```

pub mod align;
pub mod backend;
pub mod drag;
pub mod element;
pub mod error;
pub mod history;
pub mod property;
pub mod selection;
pub mod session;
pub mod viewport;

pub use align::Alignment;
pub use backend::{BackendError, FigureBackend, FigureRecipe, MemoryFigure};
pub use drag::{DragState, GestureKind};
pub use element::{Capabilities, ElementKind};
pub use error::{EditError, EditResult};
pub use history::{ChangeEntry, ChangeTracker, GestureId, Statement};
pub use property::{ArgValue, PropertyPath};
pub use selection::{HandleKind, SelectionModel};
pub use session::{Direction, Modifiers, Session, SessionRegistry};
pub use viewport::Viewport;
