//! Ordered set on a skip list.
//!
//! ```text
//! Level 2:  HEAD ───────────────────► 30 ───────────────────► None
//! Level 1:  HEAD ────────► 20 ──────► 30 ──────────► 50 ────► None
//! Level 0:  HEAD ──► 10 ──► 20 ──► 30 ──► 40 ──► 50 ────► None
//! ```
//!
//! Nodes live in a [`NodeStorage`] and link to each other by [`NodeId`].
//! The head is an element-less row of `MAX_HEIGHT` links kept inline in the
//! set. Every lookup and mutation runs the same descent: from the highest
//! populated level down to level 0, moving right while the next element
//! orders before the target.

use core::fmt;
use core::marker::PhantomData;

use log::{debug, trace};

use crate::error::SkipListError;
use crate::skiplist::compare::{Compare, Natural};
use crate::skiplist::iter::{Cursor, IntoIter, Iter, Position};
use crate::skiplist::level::{Geometric, LevelGenerator};
use crate::skiplist::node::{Link, Node, NodeId};
use crate::skiplist::storage::{Arena, Full, NodeStorage, UnboundedStorage};
use crate::skiplist::OrderedSet;

/// A place a search can stop at: the head or a live node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pred {
    Head,
    Node(NodeId),
}

/// A set of unique elements kept sorted by `C`.
///
/// # Type Parameters
///
/// - `C`: ordering, [`Natural`] by default
/// - `G`: level generator, [`Geometric`] with p = 0.5 by default
/// - `S`: node storage, growable [`Arena`] by default
/// - `MAX_HEIGHT`: number of levels, 6 by default
pub struct SkipSet<T, C = Natural, G = Geometric, S = Arena<T>, const MAX_HEIGHT: usize = 6> {
    head: [Link; MAX_HEIGHT],
    /// Highest populated level plus one, never below 1.
    height: usize,
    len: usize,
    compare: C,
    levels: G,
    storage: S,
    _marker: PhantomData<T>,
}

impl<T: Ord> SkipSet<T> {
    pub fn new() -> Self {
        Self::with_parts(Natural, Geometric::new(), Arena::new())
    }
}

impl<T, C: Compare<T>> SkipSet<T, C> {
    pub fn with_compare(compare: C) -> Self {
        Self::with_parts(compare, Geometric::new(), Arena::new())
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> SkipSet<T, C, G, S, MAX_HEIGHT>
where
    S: NodeStorage<T>,
{
    /// # Panics
    ///
    /// Panics if `MAX_HEIGHT` is 0.
    pub fn with_parts(compare: C, levels: G, storage: S) -> Self {
        assert!(MAX_HEIGHT >= 1, "MAX_HEIGHT must be at least 1");
        Self {
            head: [None; MAX_HEIGHT],
            height: 1,
            len: 0,
            compare,
            levels,
            storage,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels currently in use.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_height(&self) -> usize {
        MAX_HEIGHT
    }

    pub fn compare(&self) -> &C {
        &self.compare
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn first(&self) -> Option<&T> {
        self.head[0].map(|id| self.node(id).value())
    }

    pub fn front(&self) -> Result<&T, SkipListError> {
        self.first().ok_or(SkipListError::Empty("front"))
    }

    /// Walks the express lanes to the rightmost node.
    pub fn last(&self) -> Option<&T> {
        let mut current = Pred::Head;
        for level in (0..self.height).rev() {
            while let Some(next) = self.next_of(current, level) {
                current = Pred::Node(next);
            }
        }
        match current {
            Pred::Head => None,
            Pred::Node(id) => Some(self.node(id).value()),
        }
    }

    pub fn back(&self) -> Result<&T, SkipListError> {
        self.last().ok_or(SkipListError::Empty("back"))
    }

    pub fn iter(&self) -> Iter<'_, T, S> {
        Iter::new(&self.storage, self.head[0], self.len)
    }

    pub fn cursor_front(&self) -> Cursor<'_, T, C, G, S, MAX_HEIGHT> {
        Cursor::new(self, self.head[0])
    }

    pub fn end(&self) -> Cursor<'_, T, C, G, S, MAX_HEIGHT> {
        Cursor::new(self, None)
    }

    /// Element at a position taken from a cursor, if that node is still live.
    pub fn get_at(&self, position: Position) -> Option<&T> {
        position
            .node()
            .and_then(|id| self.storage.get(id))
            .map(Node::value)
    }

    pub fn pop_first(&mut self) -> Option<T> {
        let first = self.head[0]?;
        // The first node is preceded by the head on every level it spans.
        Some(self.unlink(&[Pred::Head; MAX_HEIGHT], first))
    }

    /// Drops every element. The set stays usable.
    pub fn clear(&mut self) {
        let mut current = self.head[0];
        while let Some(id) = current {
            current = self.storage.free(id).and_then(|node| node.next(0));
        }
        self.storage.clear();
        self.head = [None; MAX_HEIGHT];
        self.height = 1;
        self.len = 0;
        trace!("skip list cleared");
    }

    /// Exchanges the contents, ordering, generator and storage of two sets.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Renders every level top-down, one line per level.
    pub fn levels(&self) -> Levels<'_, T, C, G, S, MAX_HEIGHT> {
        Levels { set: self }
    }

    #[inline(always)]
    fn node(&self, id: NodeId) -> &Node<T> {
        self.storage
            .get(id)
            .expect("skip list link points at a freed node")
    }

    #[inline(always)]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.storage
            .get_mut(id)
            .expect("skip list link points at a freed node")
    }

    #[inline(always)]
    fn next_of(&self, at: Pred, level: usize) -> Link {
        match at {
            Pred::Head => self.head[level],
            Pred::Node(id) => self.node(id).next(level),
        }
    }

    #[inline(always)]
    fn set_next_of(&mut self, at: Pred, level: usize, link: Link) {
        match at {
            Pred::Head => self.head[level] = link,
            Pred::Node(id) => self.node_mut(id).set_next(level, link),
        }
    }

    /// Unsplices `target` on every level it spans and frees it.
    ///
    /// `previous[level]` must be the node right before `target` on each of
    /// those levels.
    fn unlink(&mut self, previous: &[Pred; MAX_HEIGHT], target: NodeId) -> T {
        let height = self.node(target).height();
        for (level, &at) in previous.iter().enumerate().take(height) {
            debug_assert_eq!(self.next_of(at, level), Some(target));
            let next = self.node(target).next(level);
            self.set_next_of(at, level, next);
        }
        let node = self
            .storage
            .free(target)
            .expect("unlinked node missing from storage");
        self.len -= 1;

        let before = self.height;
        while self.height > 1 && self.head[self.height - 1].is_none() {
            self.height -= 1;
        }
        if self.height != before {
            trace!("skip list height {} -> {}", before, self.height);
        }
        node.into_value()
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> SkipSet<T, C, G, S, MAX_HEIGHT>
where
    C: Compare<T>,
    S: NodeStorage<T>,
{
    /// Moves right on `level` while the next element orders before `value`.
    #[inline(always)]
    fn advance_level(&self, mut current: Pred, level: usize, value: &T) -> Pred {
        while let Some(next) = self.next_of(current, level) {
            if !self.compare.less(self.node(next).value(), value) {
                break;
            }
            current = Pred::Node(next);
        }
        current
    }

    /// Descends from the top level and records, per level, the last
    /// position before `value`. Levels at or above `height` stay at the head.
    fn search(&self, value: &T) -> [Pred; MAX_HEIGHT] {
        let mut previous = [Pred::Head; MAX_HEIGHT];
        let mut current = Pred::Head;
        for level in (0..self.height).rev() {
            current = self.advance_level(current, level, value);
            previous[level] = current;
        }
        previous
    }

    /// First node not ordered before `value`.
    pub(crate) fn lower_bound_link(&self, value: &T) -> Link {
        let mut current = Pred::Head;
        for level in (0..self.height).rev() {
            current = self.advance_level(current, level, value);
        }
        self.next_of(current, 0)
    }

    fn find_node(&self, value: &T) -> Link {
        let candidate = self.lower_bound_link(value)?;
        self.compare
            .equivalent(self.node(candidate).value(), value)
            .then_some(candidate)
    }

    /// Cursor at the element equivalent to `value`, or the end cursor.
    pub fn find(&self, value: &T) -> Cursor<'_, T, C, G, S, MAX_HEIGHT> {
        Cursor::new(self, self.find_node(value))
    }

    /// Cursor at the first element not ordered before `value`.
    pub fn lower_bound(&self, value: &T) -> Cursor<'_, T, C, G, S, MAX_HEIGHT> {
        Cursor::new(self, self.lower_bound_link(value))
    }

    pub fn get(&self, value: &T) -> Option<&T> {
        self.find_node(value).map(|id| self.node(id).value())
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find_node(value).is_some()
    }

    /// Removes the element equivalent to `value` and returns it.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let previous = self.search(value);
        let target = self.next_of(previous[0], 0)?;
        if !self.compare.equivalent(self.node(target).value(), value) {
            return None;
        }
        Some(self.unlink(&previous, target))
    }

    /// Returns the number of elements removed, 0 or 1.
    pub fn erase(&mut self, value: &T) -> usize {
        usize::from(self.take(value).is_some())
    }

    /// Erases the element at `position`. The end position, one whose node is
    /// already gone, or one taken from another set removes nothing.
    pub fn erase_at(&mut self, position: Position) -> usize {
        let Some(target) = position.node() else {
            return 0;
        };
        let previous = match self.storage.get(target) {
            Some(node) => self.search(node.value()),
            None => return 0,
        };
        if self.next_of(previous[0], 0) != Some(target) {
            return 0;
        }
        self.unlink(&previous, target);
        1
    }

    /// Compares elements with this set's ordering instead of `PartialEq`.
    pub fn equivalent<C2, G2, S2, const M2: usize>(&self, other: &SkipSet<T, C2, G2, S2, M2>) -> bool
    where
        S2: NodeStorage<T>,
    {
        self.len == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| self.compare.equivalent(a, b))
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> SkipSet<T, C, G, S, MAX_HEIGHT>
where
    C: Compare<T>,
    G: LevelGenerator,
    S: NodeStorage<T>,
{
    /// Links a new node for `value` unless an equivalent element exists.
    ///
    /// The node is fully built and stored before any link changes, so a
    /// failed `alloc` leaves the set untouched.
    fn insert_with<E, F>(&mut self, value: T, alloc: F) -> Result<(NodeId, bool), E>
    where
        F: FnOnce(&mut S, Node<T>) -> Result<NodeId, E>,
    {
        let previous = self.search(&value);
        if let Some(existing) = self.next_of(previous[0], 0) {
            if self.compare.equivalent(self.node(existing).value(), &value) {
                return Ok((existing, false));
            }
        }

        let height = self.levels.random_height(MAX_HEIGHT);
        let mut node = Node::new(value, height);
        for (level, &at) in previous.iter().enumerate().take(height) {
            node.set_next(level, self.next_of(at, level));
        }
        let id = alloc(&mut self.storage, node)?;

        for (level, &at) in previous.iter().enumerate().take(height) {
            self.set_next_of(at, level, Some(id));
        }
        if height > self.height {
            trace!("skip list height {} -> {}", self.height, height);
            self.height = height;
        }
        self.len += 1;
        Ok((id, true))
    }

    /// Inserts `value`, handing it back if the storage is full.
    ///
    /// On success returns a cursor at the stored element and whether the
    /// set grew; an equivalent element already present is returned as is.
    #[allow(clippy::type_complexity)]
    pub fn try_insert(
        &mut self,
        value: T,
    ) -> Result<(Cursor<'_, T, C, G, S, MAX_HEIGHT>, bool), Full<T>> {
        let len = self.len;
        let (id, inserted) = self.insert_with(value, |storage, node| {
            storage.try_alloc(node).map_err(|Full(node)| {
                debug!("node storage full at {} elements, insert rejected", len);
                Full(node.into_value())
            })
        })?;
        Ok((Cursor::new(self, Some(id)), inserted))
    }

    fn empty_copy(&self) -> Self
    where
        C: Clone,
    {
        Self::with_parts(
            self.compare.clone(),
            self.levels.reseeded(),
            self.storage.empty_like(),
        )
    }

    /// Re-inserts every element into a new set with its own generator.
    pub fn try_clone(&self) -> Result<Self, SkipListError>
    where
        T: Clone,
        C: Clone,
    {
        let mut copy = self.empty_copy();
        for value in self.iter() {
            copy.try_insert(value.clone())?;
        }
        Ok(copy)
    }

    /// Moves the contents out, leaving this set empty and reusable.
    pub fn take_all(&mut self) -> Self
    where
        C: Clone,
    {
        let empty = self.empty_copy();
        core::mem::replace(self, empty)
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> SkipSet<T, C, G, S, MAX_HEIGHT>
where
    C: Compare<T>,
    G: LevelGenerator,
    S: UnboundedStorage<T>,
{
    /// Inserts `value`. Returns a cursor at the stored element and whether
    /// the set grew.
    pub fn insert(&mut self, value: T) -> (Cursor<'_, T, C, G, S, MAX_HEIGHT>, bool) {
        let (id, inserted) = match self.insert_with(value, |storage, node| {
            Ok::<_, core::convert::Infallible>(storage.alloc(node))
        }) {
            Ok(found) => found,
            Err(never) => match never {},
        };
        (Cursor::new(self, Some(id)), inserted)
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> OrderedSet<T> for SkipSet<T, C, G, S, MAX_HEIGHT>
where
    C: Compare<T>,
    G: LevelGenerator,
    S: UnboundedStorage<T>,
{
    fn insert(&mut self, key: T) -> bool {
        SkipSet::insert(self, key).1
    }

    fn contains(&self, key: &T) -> bool {
        SkipSet::contains(self, key)
    }

    fn remove(&mut self, key: &T) -> bool {
        self.erase(key) == 1
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> Default for SkipSet<T, C, G, S, MAX_HEIGHT>
where
    C: Default,
    G: Default,
    S: NodeStorage<T> + Default,
{
    fn default() -> Self {
        Self::with_parts(C::default(), G::default(), S::default())
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> Clone for SkipSet<T, C, G, S, MAX_HEIGHT>
where
    T: Clone,
    C: Compare<T> + Clone,
    G: LevelGenerator,
    S: UnboundedStorage<T>,
{
    fn clone(&self) -> Self {
        let mut copy = self.empty_copy();
        copy.extend(self.iter().cloned());
        copy
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> Extend<T> for SkipSet<T, C, G, S, MAX_HEIGHT>
where
    C: Compare<T>,
    G: LevelGenerator,
    S: UnboundedStorage<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> FromIterator<T> for SkipSet<T, C, G, S, MAX_HEIGHT>
where
    C: Compare<T> + Default,
    G: LevelGenerator + Default,
    S: UnboundedStorage<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for SkipSet<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T, C, G, S, C2, G2, S2, const M1: usize, const M2: usize> PartialEq<SkipSet<T, C2, G2, S2, M2>>
    for SkipSet<T, C, G, S, M1>
where
    T: PartialEq,
    S: NodeStorage<T>,
    S2: NodeStorage<T>,
{
    fn eq(&self, other: &SkipSet<T, C2, G2, S2, M2>) -> bool {
        self.len == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> Eq for SkipSet<T, C, G, S, MAX_HEIGHT>
where
    T: Eq,
    S: NodeStorage<T>,
{
}

impl<T, C, G, S, const MAX_HEIGHT: usize> fmt::Debug for SkipSet<T, C, G, S, MAX_HEIGHT>
where
    T: fmt::Debug,
    S: NodeStorage<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, C, G, S, const MAX_HEIGHT: usize> IntoIterator for &'a SkipSet<T, C, G, S, MAX_HEIGHT>
where
    S: NodeStorage<T>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> IntoIterator for SkipSet<T, C, G, S, MAX_HEIGHT>
where
    S: NodeStorage<T>,
{
    type Item = T;
    type IntoIter = IntoIter<T, C, G, S, MAX_HEIGHT>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

/// Level-by-level rendering of a set, highest level first.
///
/// ```text
/// -> [ 30 ]-> None
/// -> [ 10 ]-> [ 20 ]-> [ 30 ]-> None
/// ```
pub struct Levels<'a, T, C, G, S, const MAX_HEIGHT: usize> {
    set: &'a SkipSet<T, C, G, S, MAX_HEIGHT>,
}

impl<T, C, G, S, const MAX_HEIGHT: usize> fmt::Display for Levels<'_, T, C, G, S, MAX_HEIGHT>
where
    T: fmt::Display,
    S: NodeStorage<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = self.set;
        for level in (0..set.height).rev() {
            let mut next = set.head[level];
            while let Some(id) = next {
                let node = set.node(id);
                write!(f, "-> [ {} ]", node.value())?;
                next = node.next(level);
            }
            writeln!(f, "-> None")?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl<T, C, G, S, const MAX_HEIGHT: usize> SkipSet<T, C, G, S, MAX_HEIGHT>
where
    C: Compare<T>,
    S: NodeStorage<T>,
{
    /// Elements on one level, left to right.
    pub(crate) fn level_values(&self, level: usize) -> Vec<&T> {
        let mut values = Vec::new();
        let mut next = self.head[level];
        while let Some(id) = next {
            let node = self.node(id);
            values.push(node.value());
            next = node.next(level);
        }
        values
    }

    /// Panics if any structural invariant is broken.
    pub(crate) fn check_invariants(&self) {
        let base = self.level_values(0);
        assert_eq!(base.len(), self.len, "level 0 length");
        assert_eq!(self.storage.len(), self.len, "storage holds unlinked nodes");
        assert!(self.height >= 1 && self.height <= MAX_HEIGHT);

        for level in 0..MAX_HEIGHT {
            let lane = self.level_values(level);
            if level >= self.height {
                assert!(lane.is_empty(), "level {level} populated above height");
                continue;
            }
            assert!(
                lane.windows(2).all(|w| self.compare.less(w[0], w[1])),
                "level {level} is not strictly sorted"
            );
            // Every express lane is a subsequence of the base chain.
            let mut base_iter = base.iter();
            for value in &lane {
                assert!(
                    base_iter.any(|b| core::ptr::eq(*b, *value)),
                    "level {level} skips outside level 0"
                );
            }
        }
        if self.height > 1 {
            assert!(self.head[self.height - 1].is_some(), "top level is empty");
        }
    }
}
