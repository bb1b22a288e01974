//! A skip-list backed data window for virtual-scrolling lists.
//!
//! For the scroll-event side (translate offset, recycled slot ring), see the
//! `datawindow-adapter` crate.
//!
//! The crate is layered, leaves first:
//! - [`SkipList`]: an ordered map keyed by [`ItemId`] with `O(log n)` positioning and `O(count)`
//!   bidirectional range scans along its bottom level.
//! - [`DataSource`]: the async capability set a window needs from a store; [`SkipListSource`]
//!   implements it in memory, optionally with artificial latency.
//! - [`DataWindowProvider`]: a bounded window over a source that slides one item per call and
//!   jumps with a full re-fetch, guarding against stale asynchronous results.
//!
//! It is UI-agnostic. A UI layer is expected to provide the window size (visible rows plus
//! buffer) and to drive moves from its scroll events.
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod error;
mod level;
mod options;
mod provider;
mod skip_list;
mod source;
mod state;
mod types;


pub use async_trait::async_trait;
pub use error::{Error, Result, StoreError};
pub use level::RandomBits;
pub use options::{IndexOptions, MAX_LEVEL_CAP, OnChangeCallback, SourceOptions, WindowOptions};
pub use provider::DataWindowProvider;
pub use skip_list::{Iter, SkipList};
pub use source::{DataSource, SkipListSource};
pub use state::WindowState;
pub use types::{Direction, FetchOutcome, ItemId, MoveOutcome, Record};
