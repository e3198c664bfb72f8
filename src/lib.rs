//! # FigKit
//!
//! Interactive arrangement of plotting-library figures with replayable,
//! undoable edits. Select elements, drag, resize and rotate them; every
//! change is kept as a setter call and saved back into the figure script as
//! a generated block.
//!
//! ## Architecture
//!
//! FigKit is organized as a workspace with multiple crates:
//!
//! 1. **figkit-core** - Geometry, units, element references, event bus
//! 2. **figkit-settings** - Interaction and output configuration
//! 3. **figkit-designer** - Backend trait, selection, gestures, change tracking
//! 4. **figkit** - Logging bootstrap and the command line tool
//!
//! ## Features
//!
//! - **Direct Manipulation**: Move, resize and rotate with handles and rubber band selection
//! - **Alignment**: Align, distribute and arrange axes on a grid
//! - **History**: Gesture-grouped undo/redo by replaying the edit log
//! - **Code Generation**: Deterministic, round-trip checked setter statements

pub use figkit_core;
pub use figkit_designer as designer;
pub use figkit_settings as settings;

pub use figkit_core::{AppEvent, Bbox, ElementId, EventBus, Point};
pub use figkit_designer::{
    Alignment, ChangeEntry, ChangeTracker, EditError, EditResult, FigureBackend, FigureRecipe,
    MemoryFigure, Modifiers, Session, SessionRegistry,
};
pub use figkit_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so command output on stdout stays clean
/// - RUST_LOG environment variable support
/// - Pretty formatting with thread ids and line numbers
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Initialize logging as one JSON object per line on stderr.
pub fn init_json_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .json();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
