use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use crate::error::{Result, check_id};
use crate::level::{LevelGenerator, RandomBits};
use crate::options::{IndexOptions, MAX_LEVEL_CAP};
use crate::{Direction, ItemId};

/// Arena index of a node. `None` stands for the head sentinel (as a predecessor) or for the
/// end of a chain (as a successor).
type Link = Option<usize>;

/// Predecessor of a search key at every level, recorded on the way down.
type Update = [Link; MAX_LEVEL_CAP];

struct Node<V> {
    id: ItemId,
    value: V,
    /// Successor per level; `next.len()` is the node's height.
    next: Vec<Link>,
    /// Level-0 predecessor, for backward scans.
    prev: Link,
}

/// An ordered map from [`ItemId`] to `V`, implemented as a probabilistic skip list.
///
/// - `insert`, `remove`, `get`: expected `O(log n)`.
/// - `range_from_id`: one `O(log n)` positioning search, then `O(count)` along level 0 in either
///   direction.
/// - `len`: `O(1)`.
///
/// Nodes live in a `Vec` owned by the list and link to each other by index. Removal moves the
/// last node into the freed slot and re-points the links into it, so the arena never has holes.
pub struct SkipList<V> {
    nodes: Vec<Node<V>>,
    head: Update,
    tail: Link,
    /// Number of populated levels.
    level: usize,
    levels: LevelGenerator,
}

impl<V> SkipList<V> {
    /// Creates an empty list with default options and an entropy-seeded level generator.
    pub fn new() -> Self {
        Self::from_generator(LevelGenerator::new(&IndexOptions::default()))
    }

    pub fn with_options(options: IndexOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::from_generator(LevelGenerator::new(&options)))
    }

    /// Creates an empty list whose node heights are drawn from `bits`.
    ///
    /// Use this for deterministic level structures in tests.
    pub fn with_random_bits(
        max_level: usize,
        bits: impl RandomBits + Send + Sync + 'static,
    ) -> Result<Self> {
        IndexOptions::new(max_level).validate()?;
        Ok(Self::from_generator(LevelGenerator::with_bits(max_level, bits)))
    }

    fn from_generator(levels: LevelGenerator) -> Self {
        Self {
            nodes: Vec::new(),
            head: [None; MAX_LEVEL_CAP],
            tail: None,
            level: 0,
            levels,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Highest populated level (0 when empty).
    pub fn levels(&self) -> usize {
        self.level
    }

    pub fn max_level(&self) -> usize {
        self.levels.max_level()
    }

    pub fn first_id(&self) -> Option<ItemId> {
        self.head[0].map(|i| self.nodes[i].id)
    }

    pub fn last_id(&self) -> Option<ItemId> {
        self.tail.map(|i| self.nodes[i].id)
    }

    pub fn get(&self, id: ItemId) -> Option<&V> {
        self.find(id).map(|i| &self.nodes[i].value)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut V> {
        self.find(id).map(|i| &mut self.nodes[i].value)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.find(id).is_some()
    }

    /// Inserts `value` under `id`.
    ///
    /// If `id` is already present its payload is replaced and the previous payload returned;
    /// the entry keeps its position and the count does not change.
    pub fn insert(&mut self, id: ItemId, value: V) -> Result<Option<V>> {
        check_id("id", id)?;
        let update = self.predecessors(id);
        if let Some(i) = self.next_at(update[0], 0) {
            if self.nodes[i].id == id {
                return Ok(Some(core::mem::replace(&mut self.nodes[i].value, value)));
            }
        }

        let height = self.levels.next_level();
        if height > self.level {
            // Predecessors above the old top level are the head, which `update` already says.
            dwtrace!(from = self.level, to = height, "skip list grew");
            self.level = height;
        }

        let idx = self.nodes.len();
        let next: Vec<Link> = (0..height).map(|l| self.next_at(update[l], l)).collect();
        let successor = next[0];
        self.nodes.push(Node {
            id,
            value,
            next,
            prev: update[0],
        });
        for (l, &pred) in update.iter().enumerate().take(height) {
            self.set_next(pred, l, Some(idx));
        }
        match successor {
            Some(s) => self.nodes[s].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        Ok(None)
    }

    /// Inserts every `(id, value)` pair, returning how many new entries were created.
    ///
    /// Stops at the first invalid id; pairs before it stay inserted.
    pub fn extend_from(&mut self, entries: impl IntoIterator<Item = (ItemId, V)>) -> Result<usize> {
        let mut created = 0;
        for (id, value) in entries {
            if self.insert(id, value)?.is_none() {
                created += 1;
            }
        }
        Ok(created)
    }

    /// Removes `id`, returning its payload, or `None` if it was not present.
    pub fn remove(&mut self, id: ItemId) -> Result<Option<V>> {
        check_id("id", id)?;
        let update = self.predecessors(id);
        let Some(target) = self
            .next_at(update[0], 0)
            .filter(|&i| self.nodes[i].id == id)
        else {
            return Ok(None);
        };

        self.unlink(target, &update);

        let last = self.nodes.len() - 1;
        if target != last {
            let preds = self.predecessors(self.nodes[last].id);
            self.relocate(last, target, &preds);
        }
        let node = self.nodes.swap_remove(target);

        while self.level > 0 && self.head[self.level - 1].is_none() {
            self.level -= 1;
        }
        Ok(Some(node.value))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = [None; MAX_LEVEL_CAP];
        self.tail = None;
        self.level = 0;
    }

    /// Returns up to `count` entries starting at the first id `>= start` (`Forward`) or the
    /// last id `<= start` (`Backward`), in walk order.
    ///
    /// The result is empty when `count == 0` or when no id lies on the requested side of
    /// `start`.
    pub fn range_from_id(
        &self,
        start: ItemId,
        direction: Direction,
        count: usize,
    ) -> Result<Iter<'_, V>> {
        check_id("start", start)?;
        let cursor = if count == 0 {
            None
        } else {
            self.seek(start, direction)
        };
        Ok(Iter {
            list: self,
            cursor,
            direction,
            remaining: count,
        })
    }

    /// Iterates all entries in ascending id order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            list: self,
            cursor: self.head[0],
            direction: Direction::Forward,
            remaining: self.nodes.len(),
        }
    }

    fn next_at(&self, from: Link, level: usize) -> Link {
        match from {
            Some(i) => self.nodes[i].next[level],
            None => self.head[level],
        }
    }

    fn set_next(&mut self, from: Link, level: usize, to: Link) {
        match from {
            Some(i) => self.nodes[i].next[level] = to,
            None => self.head[level] = to,
        }
    }

    /// Walks down from the top level and records, per level, the last node with an id below
    /// `id`.
    fn predecessors(&self, id: ItemId) -> Update {
        let mut update = [None; MAX_LEVEL_CAP];
        let mut cur: Link = None;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next_at(cur, level) {
                if self.nodes[next].id >= id {
                    break;
                }
                cur = Some(next);
            }
            update[level] = cur;
        }
        update
    }

    fn find(&self, id: ItemId) -> Link {
        if id < 0 {
            return None;
        }
        let update = self.predecessors(id);
        self.next_at(update[0], 0)
            .filter(|&i| self.nodes[i].id == id)
    }

    fn seek(&self, start: ItemId, direction: Direction) -> Link {
        let update = self.predecessors(start);
        let at_or_after = self.next_at(update[0], 0);
        match direction {
            Direction::Forward => at_or_after,
            Direction::Backward => match at_or_after {
                Some(i) if self.nodes[i].id == start => Some(i),
                _ => update[0],
            },
        }
    }

    fn unlink(&mut self, target: usize, update: &Update) {
        let height = self.nodes[target].next.len();
        for (l, &pred) in update.iter().enumerate().take(height) {
            debug_assert_eq!(self.next_at(pred, l), Some(target));
            let next = self.nodes[target].next[l];
            self.set_next(pred, l, next);
        }
        let prev = self.nodes[target].prev;
        match self.nodes[target].next[0] {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
    }

    /// Re-points every link into node `from` at slot `to`, ahead of a `swap_remove`.
    fn relocate(&mut self, from: usize, to: usize, preds: &Update) {
        let height = self.nodes[from].next.len();
        for (l, &pred) in preds.iter().enumerate().take(height) {
            debug_assert_eq!(self.next_at(pred, l), Some(from));
            self.set_next(pred, l, Some(to));
        }
        match self.nodes[from].next[0] {
            Some(n) => self.nodes[n].prev = Some(to),
            None => self.tail = Some(to),
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut seen = 0usize;
        let mut prev: Link = None;
        let mut cur = self.head[0];
        while let Some(i) = cur {
            let node = &self.nodes[i];
            assert_eq!(node.prev, prev, "stale prev link at id {}", node.id);
            if let Some(p) = prev {
                assert!(self.nodes[p].id < node.id, "level 0 out of order");
            }
            assert!(!node.next.is_empty() && node.next.len() <= self.level);
            seen += 1;
            prev = cur;
            cur = node.next[0];
        }
        assert_eq!(self.tail, prev, "tail does not point at the last node");
        assert_eq!(seen, self.nodes.len(), "level 0 does not reach every node");

        for level in 1..self.level {
            let expected = self.nodes.iter().filter(|n| n.next.len() > level).count();
            let mut walked = 0usize;
            let mut last: Option<ItemId> = None;
            let mut cur = self.head[level];
            while let Some(i) = cur {
                let node = &self.nodes[i];
                assert!(node.next.len() > level, "node {} linked above its height", node.id);
                if let Some(last) = last {
                    assert!(last < node.id, "level {level} out of order");
                }
                last = Some(node.id);
                walked += 1;
                cur = node.next[level];
            }
            assert_eq!(walked, expected, "level {level} skips a node");
        }
        if self.level > 0 {
            assert!(self.head[self.level - 1].is_some(), "empty top level");
        }
        assert!(self.head[self.level..].iter().all(Option::is_none));
    }
}

impl<V> Default for SkipList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for SkipList<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V> IntoIterator for &'a SkipList<V> {
    type Item = (ItemId, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Level-0 walk over a [`SkipList`], produced by [`SkipList::range_from_id`] and
/// [`SkipList::iter`].
pub struct Iter<'a, V> {
    list: &'a SkipList<V>,
    cursor: Link,
    direction: Direction,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (ItemId, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.list.nodes[self.cursor?];
        self.remaining -= 1;
        self.cursor = match self.direction {
            Direction::Forward => node.next[0],
            Direction::Backward => node.prev,
        };
        Some((node.id, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.cursor.is_none() {
            return (0, Some(0));
        }
        (1.min(self.remaining), Some(self.remaining.min(self.list.len())))
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            cursor: self.cursor,
            direction: self.direction,
            remaining: self.remaining,
        }
    }
}

impl<V> fmt::Debug for Iter<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("cursor", &self.cursor)
            .field("direction", &self.direction)
            .field("remaining", &self.remaining)
            .finish()
    }
}
