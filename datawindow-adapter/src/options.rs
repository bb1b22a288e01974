use datawindow::{Error, Result, WindowOptions};

/// Geometry of a fixed-height list viewport.
///
/// The window provider materializes `visible_count + buffer_count` items. The translate offset
/// rests at `-item_height` after each shift and triggers the next one once it crosses
/// `-boundary_multiple * item_height` (forward) or `0` (backward).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportOptions {
    /// Height of one row, in pixels.
    pub item_height: f32,
    /// Rows that fit in the viewport.
    pub visible_count: usize,
    /// Extra rows kept materialized beyond the viewport.
    pub buffer_count: usize,
    /// Forward shift threshold, in rows. Must be at least 2.
    pub boundary_multiple: f32,
}

impl ViewportOptions {
    pub fn new(item_height: f32, visible_count: usize, buffer_count: usize) -> Self {
        Self {
            item_height,
            visible_count,
            buffer_count,
            boundary_multiple: 2.0,
        }
    }

    pub fn with_item_height(mut self, item_height: f32) -> Self {
        self.item_height = item_height;
        self
    }

    pub fn with_buffer_count(mut self, buffer_count: usize) -> Self {
        self.buffer_count = buffer_count;
        self
    }

    pub fn with_boundary_multiple(mut self, boundary_multiple: f32) -> Self {
        self.boundary_multiple = boundary_multiple;
        self
    }

    /// Number of items the window provider should hold.
    pub fn window_size(&self) -> usize {
        self.visible_count.saturating_add(self.buffer_count)
    }

    /// Provider options matching this viewport.
    pub fn window_options(&self) -> WindowOptions {
        WindowOptions::new(self.window_size())
    }

    /// Offset past which a forward scroll shifts the window.
    pub fn forward_limit(&self) -> f32 {
        -self.boundary_multiple * self.item_height
    }

    /// Offset the list settles at right after a shift.
    pub fn rest_offset(&self) -> f32 {
        -self.item_height
    }

    /// Total height of the materialized rows.
    pub fn content_height(&self) -> f32 {
        self.window_size() as f32 * self.item_height
    }

    pub fn validate(&self) -> Result<()> {
        if !self.item_height.is_finite() || self.item_height <= 0.0 {
            return Err(Error::invalid_argument(
                "item_height",
                format!("must be finite and > 0, got {}", self.item_height),
            ));
        }
        if self.visible_count == 0 {
            return Err(Error::invalid_argument("visible_count", "must be at least 1"));
        }
        if !self.boundary_multiple.is_finite() || self.boundary_multiple < 2.0 {
            return Err(Error::invalid_argument(
                "boundary_multiple",
                format!("must be finite and >= 2, got {}", self.boundary_multiple),
            ));
        }
        Ok(())
    }
}
