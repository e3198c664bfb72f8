//! Event type definitions for the event bus.
//!
//! Events are cloneable and serializable so a host can log or forward them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::reference::ElementId;

/// Undo/redo availability, published after every history change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStatus {
    pub undo_available: bool,
    pub redo_available: bool,
    /// Label of the gesture that undo would revert.
    pub undo_label: Option<String>,
    /// Label of the gesture that redo would re-apply.
    pub redo_label: Option<String>,
}

/// Root event enum for all editor notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// The selection set or its primary element changed.
    SelectionChanged {
        /// Element whose properties an inspector should show.
        primary: Option<ElementId>,
        /// Every selected element, in reference order.
        selected: Vec<ElementId>,
    },
    /// An element became known to the element tree.
    ElementChildCreated {
        element: ElementId,
        parent: Option<ElementId>,
    },
    /// The figure needs a redraw.
    CanvasChanged,
    /// The figure was resized.
    FigureSizeChanged { width_in: f64, height_in: f64 },
    /// Undo/redo availability changed.
    HistoryChanged(HistoryStatus),
    /// The generated block was written to disk.
    Saved {
        path: PathBuf,
        /// Number of statements in the written block.
        statements: usize,
    },
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::SelectionChanged { .. } => EventCategory::Selection,
            AppEvent::ElementChildCreated { .. } => EventCategory::Tree,
            AppEvent::CanvasChanged | AppEvent::FigureSizeChanged { .. } => EventCategory::Canvas,
            AppEvent::HistoryChanged(_) => EventCategory::History,
            AppEvent::Saved { .. } => EventCategory::File,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::SelectionChanged { primary, selected } => match primary {
                Some(primary) => format!("Selected {} ({} total)", primary, selected.len()),
                None => "Selection cleared".to_string(),
            },
            AppEvent::ElementChildCreated { element, .. } => format!("Element added: {}", element),
            AppEvent::CanvasChanged => "Canvas changed".to_string(),
            AppEvent::FigureSizeChanged {
                width_in,
                height_in,
            } => format!("Figure resized to {:.2}x{:.2} in", width_in, height_in),
            AppEvent::HistoryChanged(status) => format!(
                "History: undo={} redo={}",
                status.undo_available, status.redo_available
            ),
            AppEvent::Saved { path, statements } => {
                format!("Saved {} statements to {}", statements, path.display())
            }
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Selection changes.
    Selection,
    /// Element tree changes.
    Tree,
    /// Redraw and figure size.
    Canvas,
    /// Undo/redo state.
    History,
    /// Script file writes.
    File,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Tree => write!(f, "Tree"),
            EventCategory::Canvas => write!(f, "Canvas"),
            EventCategory::History => write!(f, "History"),
            EventCategory::File => write!(f, "File"),
        }
    }
}
