use alloc::collections::VecDeque;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::{Result, check_id};
use crate::options::{OnChangeCallback, WindowOptions};
use crate::source::DataSource;
use crate::state::WindowState;
use crate::{Direction, FetchOutcome, ItemId, MoveOutcome, Record};

struct Window<T> {
    items: VecDeque<T>,
    head_id: ItemId,
    version: u64,
}

impl<T: Record> Window<T> {
    fn snapshot(&self, window_size: usize) -> WindowState {
        WindowState {
            head_id: self.head_id,
            len: self.items.len(),
            window_size,
            version: self.version,
        }
    }

    /// Id of the first (`Backward`) or last (`Forward`) materialized item.
    fn edge(&self, direction: Direction) -> Option<ItemId> {
        match direction {
            Direction::Forward => self.items.back().map(Record::id),
            Direction::Backward => self.items.front().map(Record::id),
        }
    }
}

/// Releases the single-step move flag when dropped, including on error or cancellation.
struct MoveGuard<'a>(&'a AtomicBool);

impl<'a> MoveGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Maintains a bounded window of items loaded from a [`DataSource`].
///
/// The window is shifted one item at a time with [`move_forward`](Self::move_forward) /
/// [`move_backward`](Self::move_backward), which fetch exactly one entry per call, and
/// repositioned wholesale with [`set_data_window_position`](Self::set_data_window_position).
///
/// All methods take `&self`, so a provider can be shared (`Arc`) between a scroll handler and
/// jump navigation:
/// - Every full-window fetch takes a new generation token. When a fetch resolves after a newer
///   one was issued, its result is discarded ([`FetchOutcome::Discarded`]).
/// - At most one single-step move is in flight; a second concurrent move returns
///   [`MoveOutcome::Busy`] without touching the source. A move whose fetch resolves after a
///   jump was issued returns [`MoveOutcome::Superseded`].
///
/// Positions are interpreted as ids: with dense ids `0..n`, position `p` shows ids
/// `[p, p + window_size)`.
pub struct DataWindowProvider<S: DataSource> {
    source: Arc<S>,
    window_size: usize,
    on_change: Option<OnChangeCallback>,
    state: Mutex<Window<S::Item>>,
    generation: AtomicU64,
    moving: AtomicBool,
}

impl<S: DataSource> DataWindowProvider<S> {
    /// Creates a provider and loads the initial window starting at id 0.
    ///
    /// The initial window has `version() == 0`.
    pub async fn new(source: Arc<S>, options: WindowOptions) -> Result<Self> {
        options.validate()?;
        let window_size = options.window_size;
        let items = source
            .range_from_id(0, Direction::Forward, window_size)
            .await?;
        dwdebug!(window_size, loaded = items.len(), "DataWindowProvider::new");
        let head_id = items.first().map_or(0, Record::id);
        Ok(Self {
            source,
            window_size,
            on_change: options.on_change,
            state: Mutex::new(Window {
                items: items.into(),
                head_id,
                version: 0,
            }),
            generation: AtomicU64::new(0),
            moving: AtomicBool::new(false),
        })
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Change counter; increments on every change to the items or the head.
    pub fn version(&self) -> u64 {
        self.state.lock().version
    }

    pub fn head_id(&self) -> ItemId {
        self.state.lock().head_id
    }

    /// Number of materialized items (`<= window_size`).
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    pub fn snapshot(&self) -> WindowState {
        self.state.lock().snapshot(self.window_size)
    }

    /// Whether a single-step move is waiting on the source.
    pub fn is_moving(&self) -> bool {
        self.moving.load(Ordering::Acquire)
    }

    pub async fn total_count(&self) -> Result<usize> {
        self.source.total_count().await
    }

    /// Returns the current items, optionally truncated to the first `count`. Never touches the
    /// source.
    pub fn get_data_window_items(&self, count: Option<usize>) -> Vec<S::Item> {
        let w = self.state.lock();
        let take = count.unwrap_or(w.items.len());
        w.items.iter().take(take).cloned().collect()
    }

    /// Visits the current items in order without cloning them.
    ///
    /// The provider is locked while `f` runs; `f` must not call back into it.
    pub fn for_each_item(&self, mut f: impl FnMut(usize, &S::Item)) {
        let w = self.state.lock();
        for (i, item) in w.items.iter().enumerate() {
            f(i, item);
        }
    }

    /// Jumps the window to `position`, re-fetching it in full.
    ///
    /// `position` is clamped into `[0, total - window_size]`, or into `[0, total)` when the
    /// source holds fewer than `window_size` entries. Negative positions are rejected.
    pub async fn set_data_window_position(&self, position: ItemId) -> Result<FetchOutcome> {
        check_id("position", position)?;
        let token = self.begin_fetch();

        let total = self.source.total_count().await?;
        if self.is_stale(token) {
            dwdebug!(position, token, "jump superseded before range fetch");
            return Ok(FetchOutcome::Discarded);
        }

        let clamped = clamp_position(position, total, self.window_size);
        dwtrace!(position, clamped, total, token, "set_data_window_position");
        let items = self
            .source
            .range_from_id(clamped, Direction::Forward, self.window_size)
            .await?;
        Ok(self.apply_window(token, clamped, items))
    }

    /// Re-fetches the window at the current head, e.g. after inserts or deletes.
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        let head = self.head_id();
        self.set_data_window_position(head).await
    }

    /// Shifts the window forward by one item.
    ///
    /// Returns the item that entered the window, or `None` when the window already ends at the
    /// last entry (or the move could not be applied, see [`Self::try_move`]). State is
    /// unchanged whenever `None` is returned.
    pub async fn move_forward(&self) -> Result<Option<S::Item>> {
        Ok(self.try_move(Direction::Forward).await?.into_item())
    }

    /// Shifts the window backward by one item. Mirror of [`Self::move_forward`].
    pub async fn move_backward(&self) -> Result<Option<S::Item>> {
        Ok(self.try_move(Direction::Backward).await?.into_item())
    }

    /// Shifts the window by one item in `direction`, reporting why nothing happened when it
    /// could not move.
    ///
    /// A full window drops the item at the opposite end; a window that is not full yet grows.
    pub async fn try_move(&self, direction: Direction) -> Result<MoveOutcome<S::Item>> {
        let Some(_guard) = MoveGuard::acquire(&self.moving) else {
            dwtrace!(?direction, "move rejected: another move is in flight");
            return Ok(MoveOutcome::Busy);
        };
        // The token misses a jump that is already in flight; the version pins the edge's window.
        let (token, version, start) = {
            let w = self.state.lock();
            let token = self.generation.load(Ordering::Acquire);
            let start = match (direction, w.edge(direction)) {
                (Direction::Forward, Some(last)) => last.checked_add(1),
                (Direction::Backward, Some(first)) => first.checked_sub(1).filter(|id| *id >= 0),
                (_, None) => Some(w.head_id),
            };
            (token, w.version, start)
        };
        let Some(start) = start else {
            return Ok(MoveOutcome::Boundary);
        };

        let mut fetched = self.source.range_from_id(start, direction, 1).await?;
        let Some(item) = fetched.pop() else {
            if self.window_changed(token, version) {
                dwdebug!(?direction, "empty move fetch outlived its window");
                return Ok(MoveOutcome::Superseded);
            }
            dwtrace!(?direction, start, "window at boundary");
            return Ok(MoveOutcome::Boundary);
        };

        let snapshot = {
            let mut w = self.state.lock();
            if self.is_stale(token) || w.version != version {
                dwdebug!(?direction, "move superseded by a jump");
                return Ok(MoveOutcome::Superseded);
            }
            let full = w.items.len() >= self.window_size;
            match direction {
                Direction::Forward => {
                    if full {
                        w.items.pop_front();
                    }
                    w.items.push_back(item.clone());
                }
                Direction::Backward => {
                    if full {
                        w.items.pop_back();
                    }
                    w.items.push_front(item.clone());
                }
            }
            if let Some(first) = w.items.front().map(Record::id) {
                w.head_id = first;
            }
            w.version += 1;
            w.snapshot(self.window_size)
        };
        self.notify(snapshot);
        Ok(MoveOutcome::Moved(item))
    }

    fn begin_fetch(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn is_stale(&self, token: u64) -> bool {
        self.generation.load(Ordering::Acquire) != token
    }

    fn window_changed(&self, token: u64, version: u64) -> bool {
        let w = self.state.lock();
        self.is_stale(token) || w.version != version
    }

    fn apply_window(&self, token: u64, position: ItemId, items: Vec<S::Item>) -> FetchOutcome {
        let snapshot = {
            let mut w = self.state.lock();
            if self.is_stale(token) {
                dwdebug!(position, token, "discarding stale window");
                return FetchOutcome::Discarded;
            }
            w.head_id = items.first().map_or(position, Record::id);
            w.items = items.into();
            w.version += 1;
            w.snapshot(self.window_size)
        };
        self.notify(snapshot);
        FetchOutcome::Applied
    }

    fn notify(&self, snapshot: WindowState) {
        if let Some(cb) = &self.on_change {
            cb(snapshot);
        }
    }
}

impl<S: DataSource> core::fmt::Debug for DataWindowProvider<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DataWindowProvider")
            .field("state", &self.snapshot())
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .field("moving", &self.is_moving())
            .finish_non_exhaustive()
    }
}

/// Clamps a jump target into `[0, total - window_size]`, or `[0, total)` when the source is
/// smaller than one window.
pub(crate) fn clamp_position(position: ItemId, total: usize, window_size: usize) -> ItemId {
    let total = ItemId::try_from(total).unwrap_or(ItemId::MAX);
    let window = ItemId::try_from(window_size).unwrap_or(ItemId::MAX);
    let max = if total >= window {
        total - window
    } else {
        (total - 1).max(0)
    };
    position.clamp(0, max)
}
