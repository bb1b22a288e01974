//! Scroll-event adapter for the `datawindow` crate.
//!
//! The `datawindow` crate keeps a bounded window of items in sync with a data source. This crate
//! turns raw scroll input into window moves for fixed-height rows:
//!
//! - A translate offset that rests at one row above the viewport and triggers a single-item
//!   shift when it crosses a threshold
//! - A ring of render slots, so a shift rewrites one slot instead of re-rendering the window
//! - Wheel and touch helpers that reduce host events to pixel deltas
//!
//! This crate is framework-agnostic; hosts render [`ScrollController::for_each_slot`] however
//! they like.
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod controller;
mod options;
mod ring;
mod state;

#[cfg(test)]
mod tests;

pub use controller::{RenderedSlot, ScrollController, WheelDelta};
pub use options::ViewportOptions;
pub use state::{BoundaryState, ScrollEffect, ScrollState};
