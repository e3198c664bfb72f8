//! # FigKit Core
//!
//! Core types and utilities shared by the FigKit crates.
//! Provides figure-fraction geometry, physical length units, stable element
//! references and the synchronous notification bus.

pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod reference;
pub mod units;

pub use error::{Error, GeometryError, ReferenceError, Result, UnitError};

pub use event_bus::{AppEvent, EventBus, EventCategory, EventFilter, HistoryStatus, SubscriptionId};

pub use geometry::{angle_between, approx_eq, Bbox, Point, EPSILON};

pub use reference::{Collection, ElementId, Segment};

pub use units::LengthUnit;
