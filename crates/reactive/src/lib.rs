//! Observable state for boxcache clients
//!
//! - `ListenerSet` / `Subscription`: synchronous observer registry
//! - `ReactiveVar`: shared value cell with a default and subscribers
//! - `Preferences`: UI state container injected into consumers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod listeners;
pub mod preferences;
pub mod var;

pub use listeners::{Listener, ListenerSet, Subscription};
pub use preferences::{BoxReconciliationOverlay, Preferences, QrReaderOverlay};
pub use var::ReactiveVar;
