use alloc::vec::Vec;
use core::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::Result;
use crate::options::{IndexOptions, SourceOptions};
use crate::skip_list::SkipList;
use crate::{Direction, ItemId, Record};

/// The capability set the window provider needs from a backing store.
///
/// `insert` is a synchronous write-through; the reads and `delete` are asynchronous so a store
/// may live behind a network hop. Failures from the store are returned as
/// [`crate::Error::Store`] and propagate unchanged through the provider.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Item: Record + Clone + Send + Sync + 'static;

    /// Inserts or replaces an item. Returns `true` when a new entry was created.
    fn insert(&self, item: Self::Item) -> Result<bool>;

    /// Deletes the entry with `id`. Returns `false` when no such entry existed.
    async fn delete(&self, id: ItemId) -> Result<bool>;

    /// Returns up to `count` items starting at the first id `>= start` (`Forward`) or the last
    /// id `<= start` (`Backward`), in walk order. An empty range is not an error.
    async fn range_from_id(
        &self,
        start: ItemId,
        direction: Direction,
        count: usize,
    ) -> Result<Vec<Self::Item>>;

    async fn total_count(&self) -> Result<usize>;
}

/// An in-memory [`DataSource`] over a [`SkipList`], with optional artificial latency.
///
/// Every asynchronous operation reads or writes the index when it is called and then waits out
/// the configured latency before resolving. Writes racing with reads are last-write-wins.
pub struct SkipListSource<T> {
    index: RwLock<SkipList<T>>,
    latency: RwLock<Duration>,
}

impl<T> SkipListSource<T> {
    pub fn new() -> Self {
        Self {
            index: RwLock::new(SkipList::new()),
            latency: RwLock::new(Duration::ZERO),
        }
    }

    pub fn with_options(options: SourceOptions) -> Result<Self> {
        Ok(Self {
            index: RwLock::new(SkipList::with_options(options.index)?),
            latency: RwLock::new(options.latency),
        })
    }

    /// Wraps an existing index.
    pub fn from_index(index: SkipList<T>, latency: Duration) -> Self {
        Self {
            index: RwLock::new(index),
            latency: RwLock::new(latency),
        }
    }

    pub fn latency(&self) -> Duration {
        *self.latency.read()
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write() = latency;
    }

    /// Synchronous entry count, for seeding code that must not await.
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    /// Runs `f` against the underlying index under the read lock.
    pub fn with_index<R>(&self, f: impl FnOnce(&SkipList<T>) -> R) -> R {
        f(&self.index.read())
    }

    async fn settle(&self) {
        let latency = self.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

impl<T: Record> SkipListSource<T> {
    /// Builds a source seeded with `items`.
    pub fn from_items(
        items: impl IntoIterator<Item = T>,
        options: SourceOptions,
    ) -> Result<Self> {
        let source = Self::with_options(options)?;
        {
            let mut index = source.index.write();
            index.extend_from(items.into_iter().map(|item| (item.id(), item)))?;
        }
        dwdebug!(len = source.len(), "SkipListSource::from_items");
        Ok(source)
    }

    /// Like [`SkipListSource::from_items`], sizing the index height for the seeded length.
    pub fn from_vec(items: Vec<T>, latency: Duration) -> Result<Self> {
        let options = SourceOptions::new()
            .with_index(IndexOptions::for_expected_len(items.len()))
            .with_latency(latency);
        Self::from_items(items, options)
    }
}

impl<T> Default for SkipListSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for SkipListSource<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SkipListSource")
            .field("len", &self.len())
            .field("latency", &self.latency())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T> DataSource for SkipListSource<T>
where
    T: Record + Clone + Send + Sync + 'static,
{
    type Item = T;

    fn insert(&self, item: T) -> Result<bool> {
        let id = item.id();
        let replaced = self.index.write().insert(id, item)?;
        Ok(replaced.is_none())
    }

    async fn delete(&self, id: ItemId) -> Result<bool> {
        let removed = self.index.write().remove(id)?;
        self.settle().await;
        Ok(removed.is_some())
    }

    async fn range_from_id(
        &self,
        start: ItemId,
        direction: Direction,
        count: usize,
    ) -> Result<Vec<T>> {
        let items: Vec<T> = self
            .index
            .read()
            .range_from_id(start, direction, count)?
            .map(|(_, item)| item.clone())
            .collect();
        self.settle().await;
        Ok(items)
    }

    async fn total_count(&self) -> Result<usize> {
        let count = self.len();
        self.settle().await;
        Ok(count)
    }
}
