use alloc::sync::Arc;
use core::time::Duration;

use crate::error::{Error, Result};
use crate::state::WindowState;

/// Hard cap on skip list height.
pub const MAX_LEVEL_CAP: usize = 32;

/// A callback fired after the window provider applied a change.
///
/// It receives a snapshot taken right after the change, and runs outside the provider's
/// internal lock, so it may call back into the provider.
pub type OnChangeCallback = Arc<dyn Fn(WindowState) + Send + Sync>;

/// Configuration for [`crate::SkipList`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexOptions {
    /// Maximum number of levels a node may occupy (`1..=MAX_LEVEL_CAP`).
    pub max_level: usize,
    /// Seed for the level generator. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl IndexOptions {
    pub fn new(max_level: usize) -> Self {
        Self {
            max_level,
            seed: None,
        }
    }

    /// Derives `max_level` from the expected number of entries: `ceil(log2(n))`, so that with
    /// p = 0.5 the top level holds O(1) nodes on average.
    pub fn for_expected_len(expected_len: usize) -> Self {
        let bits = match expected_len {
            0 | 1 => 1,
            n => (usize::BITS - (n - 1).leading_zeros()) as usize,
        };
        Self::new(bits.clamp(1, MAX_LEVEL_CAP))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_level == 0 || self.max_level > MAX_LEVEL_CAP {
            return Err(Error::invalid_argument(
                "max_level",
                format!("must be in 1..={MAX_LEVEL_CAP}, got {}", self.max_level),
            ));
        }
        Ok(())
    }
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self::new(16)
    }
}

/// Configuration for [`crate::SkipListSource`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceOptions {
    pub index: IndexOptions,
    /// Artificial delay applied before every asynchronous operation resolves. Emulates a
    /// remote store.
    pub latency: Duration,
}

impl SourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, index: IndexOptions) -> Self {
        self.index = index;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_latency_ms(self, ms: u64) -> Self {
        self.with_latency(Duration::from_millis(ms))
    }
}

/// Configuration for [`crate::DataWindowProvider`].
#[derive(Clone)]
pub struct WindowOptions {
    /// Number of items materialized at once (visible rows plus lookahead/lookbehind buffer).
    pub window_size: usize,
    /// Optional change notification, in addition to polling `version()`.
    pub on_change: Option<OnChangeCallback>,
}

impl WindowOptions {
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            on_change: None,
        }
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(WindowState) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::invalid_argument("window_size", "must be at least 1"));
        }
        Ok(())
    }
}

impl core::fmt::Debug for WindowOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowOptions")
            .field("window_size", &self.window_size)
            .field("on_change", &self.on_change.as_ref().map(|_| ".."))
            .finish()
    }
}
