use alloc::sync::Arc;
use alloc::vec::Vec;

use datawindow::{
    DataSource, DataWindowProvider, Direction, Error, FetchOutcome, ItemId, MoveOutcome, Result,
};

use crate::ring::SlotRing;
use crate::{BoundaryState, ScrollEffect, ScrollState, ViewportOptions};

/// A wheel delta as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WheelDelta {
    Pixels(f32),
    /// Line-based deltas are scaled by the item height.
    Lines(f32),
}

/// One materialized row, as handed to [`ScrollController::for_each_slot`].
#[derive(Clone, Copy, Debug)]
pub struct RenderedSlot<'a, T> {
    /// Physical slot (render node) the row is bound to.
    pub slot: usize,
    /// Position within the window, 0 being the first item.
    pub index: usize,
    pub item: &'a T,
    /// Top edge of the row relative to the viewport.
    pub y: f32,
}

/// A framework-neutral scroll controller that drives a [`DataWindowProvider`] from scroll input.
///
/// The controller keeps a fixed ring of render slots, one per window item, and a vertical
/// translate offset. Scrolling moves the offset; once it crosses a threshold the provider is
/// shifted by one item and only the slot that item lands in is rewritten.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_scroll` / `on_wheel` / `on_touch_*` when UI events occur
/// - `for_each_slot` when rendering, to place each slot at its `y` offset
/// - `sync` after mutating the provider or its source elsewhere
pub struct ScrollController<S: DataSource> {
    provider: Arc<DataWindowProvider<S>>,
    options: ViewportOptions,
    translate_y: f32,
    boundary: BoundaryState,
    ring: SlotRing<S::Item>,
    synced_version: u64,
    touch_y: Option<f32>,
}

impl<S: DataSource> ScrollController<S> {
    /// Wraps an existing provider. Its window size must match `options.window_size()`.
    pub fn new(provider: Arc<DataWindowProvider<S>>, options: ViewportOptions) -> Result<Self> {
        options.validate()?;
        if provider.window_size() != options.window_size() {
            return Err(Error::invalid_argument(
                "window_size",
                format!(
                    "provider holds {} items but the viewport needs {}",
                    provider.window_size(),
                    options.window_size()
                ),
            ));
        }
        let mut controller = Self {
            provider,
            options,
            translate_y: 0.0,
            boundary: BoundaryState::WithinBounds,
            ring: SlotRing::new(),
            synced_version: 0,
            touch_y: None,
        };
        controller.resync();
        Ok(controller)
    }

    /// Builds a provider over `source` sized for `options`, then wraps it.
    pub async fn connect(source: Arc<S>, options: ViewportOptions) -> Result<Self> {
        options.validate()?;
        let provider = DataWindowProvider::new(source, options.window_options()).await?;
        Self::new(Arc::new(provider), options)
    }

    pub fn provider(&self) -> &Arc<DataWindowProvider<S>> {
        &self.provider
    }

    pub fn options(&self) -> &ViewportOptions {
        &self.options
    }

    pub fn translate_y(&self) -> f32 {
        self.translate_y
    }

    pub fn ring_head(&self) -> usize {
        self.ring.head()
    }

    pub fn boundary_state(&self) -> BoundaryState {
        self.boundary
    }

    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            translate_y: self.translate_y,
            ring_head: self.ring.head(),
            boundary: self.boundary,
            version: self.synced_version,
        }
    }

    /// Applies a scroll delta in pixels (positive scrolls toward later items).
    pub async fn on_scroll(&mut self, delta: f32) -> Result<ScrollEffect> {
        if !delta.is_finite() {
            return Err(Error::invalid_argument(
                "delta",
                format!("must be finite, got {delta}"),
            ));
        }
        let next = self.translate_y - delta;
        if delta > 0.0 && next <= self.options.forward_limit() {
            return self.shift(Direction::Forward).await;
        }
        if delta < 0.0 && next >= 0.0 {
            return self.shift(Direction::Backward).await;
        }
        self.translate_y = next;
        self.boundary = BoundaryState::WithinBounds;
        Ok(ScrollEffect::Offset)
    }

    pub async fn on_wheel(&mut self, delta: WheelDelta) -> Result<ScrollEffect> {
        let pixels = match delta {
            WheelDelta::Pixels(px) => px,
            WheelDelta::Lines(lines) => lines * self.options.item_height,
        };
        self.on_scroll(pixels).await
    }

    pub fn on_touch_start(&mut self, y: f32) {
        self.touch_y = Some(y);
    }

    /// Scrolls by the distance moved since the previous touch point. Dragging up scrolls
    /// forward. A move with no touch in progress only starts tracking.
    pub async fn on_touch_move(&mut self, y: f32) -> Result<ScrollEffect> {
        let Some(last) = self.touch_y.replace(y) else {
            return Ok(ScrollEffect::Offset);
        };
        self.on_scroll(last - y).await
    }

    pub fn on_touch_end(&mut self) {
        self.touch_y = None;
    }

    /// Repositions the provider and, when the jump was applied, resets the offset and the ring.
    pub async fn jump_to(&mut self, position: ItemId) -> Result<FetchOutcome> {
        let outcome = self.provider.set_data_window_position(position).await?;
        if outcome.is_applied() {
            self.reset();
        }
        Ok(outcome)
    }

    /// Puts the offset back at 0 and reloads every slot from the provider.
    pub fn reset(&mut self) {
        self.translate_y = 0.0;
        self.boundary = BoundaryState::WithinBounds;
        self.touch_y = None;
        self.resync();
    }

    /// Reloads the ring when the provider changed since the last sync. Returns whether it did.
    pub fn sync(&mut self) -> bool {
        if self.provider.version() == self.synced_version {
            return false;
        }
        self.resync();
        true
    }

    /// Window items in logical order.
    pub fn visible_items(&self) -> Vec<&S::Item> {
        self.ring.iter().map(|(_, item)| item).collect()
    }

    pub fn item(&self, index: usize) -> Option<&S::Item> {
        self.ring.get(index)
    }

    /// Items by physical slot, for hosts that keep one render node per slot.
    pub fn slots(&self) -> &[S::Item] {
        self.ring.slots()
    }

    pub fn for_each_slot(&self, mut f: impl FnMut(RenderedSlot<'_, S::Item>)) {
        let h = self.options.item_height;
        for (index, (slot, item)) in self.ring.iter().enumerate() {
            f(RenderedSlot {
                slot,
                index,
                item,
                y: self.translate_y + index as f32 * h,
            });
        }
    }

    async fn shift(&mut self, direction: Direction) -> Result<ScrollEffect> {
        let full = self.ring.len() == self.provider.window_size();
        let before = self.provider.version();
        match self.provider.try_move(direction).await? {
            MoveOutcome::Moved(item) => {
                // Rotate only when this move is the sole change since the ring was loaded.
                let in_step = before == self.synced_version
                    && self.provider.version() == before.wrapping_add(1);
                let slot = if full && in_step {
                    match direction {
                        Direction::Forward => self.ring.push_back(item),
                        Direction::Backward => self.ring.push_front(item),
                    }
                } else {
                    None
                };
                self.translate_y = self.options.rest_offset();
                self.boundary = BoundaryState::WithinBounds;
                match slot {
                    Some(slot) => {
                        self.synced_version = self.provider.version();
                        adtrace!(?direction, slot, ring_head = self.ring.head(), "shifted");
                        Ok(ScrollEffect::Shifted { direction, slot })
                    }
                    None => {
                        // A partial window grows instead of shifting, or the ring was stale.
                        self.resync();
                        Ok(ScrollEffect::Resynced)
                    }
                }
            }
            MoveOutcome::Boundary => {
                self.clamp(direction);
                self.boundary = match direction {
                    Direction::Forward => BoundaryState::AtForwardBoundary,
                    Direction::Backward => BoundaryState::AtBackwardBoundary,
                };
                Ok(ScrollEffect::Clamped(direction))
            }
            MoveOutcome::Busy => {
                self.clamp(direction);
                Ok(ScrollEffect::Pending(direction))
            }
            MoveOutcome::Superseded => {
                addebug!(?direction, "shift superseded by a jump, resyncing");
                self.translate_y = 0.0;
                self.boundary = BoundaryState::WithinBounds;
                self.resync();
                Ok(ScrollEffect::Resynced)
            }
        }
    }

    fn clamp(&mut self, direction: Direction) {
        self.translate_y = match direction {
            Direction::Forward => self.options.forward_limit(),
            Direction::Backward => 0.0,
        };
    }

    fn resync(&mut self) {
        // Version first: a change racing with the copy leaves the ring marked stale.
        self.synced_version = self.provider.version();
        self.ring.reset(self.provider.get_data_window_items(None));
        addebug!(
            version = self.synced_version,
            len = self.ring.len(),
            "ring resynced"
        );
    }
}

impl<S: DataSource> core::fmt::Debug for ScrollController<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollController")
            .field("options", &self.options)
            .field("state", &self.scroll_state())
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}
