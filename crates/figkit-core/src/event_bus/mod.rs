//! # Event Bus Module
//!
//! Synchronous publish/subscribe notifications between the editing session
//! and whatever hosts it (a property panel, an element tree view, the
//! canvas).
//!
//! ## Overview
//!
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter by [`EventCategory`]
//! - Handlers run on the publishing thread, after the handler table lock
//!   has been released, so a handler may subscribe or unsubscribe
//!
//! ## Usage
//!
//! ```rust,ignore
//! use figkit_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Selection]),
//!     |event| {
//!         if let AppEvent::SelectionChanged { primary, .. } = event {
//!             println!("now editing {:?}", primary);
//!         }
//!     },
//! );
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
