use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::error::SkipListError;
use crate::skiplist::compare::Compare;
use crate::skiplist::node::{Link, Node};
use crate::skiplist::skip_set::SkipSet;
use crate::skiplist::storage::NodeStorage;
use crate::skiplist::OrderedCursor;

/// Copyable handle to a cursor's position that outlives the borrow.
///
/// Erasing or clearing the node it refers to invalidates it for good: the
/// handle stays dead even after a later insert reuses the node's slot, and a
/// handle from another set never resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position(Link);

impl Position {
    /// The past-the-end position.
    pub const END: Position = Position(None);

    pub fn is_end(self) -> bool {
        self.0.is_none()
    }

    pub(crate) fn node(self) -> Link {
        self.0
    }
}

/// Borrowing iterator over a set in order.
pub struct Iter<'a, T, S> {
    storage: &'a S,
    next: Link,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T, S: NodeStorage<T>> Iter<'a, T, S> {
    pub(crate) fn new(storage: &'a S, first: Link, len: usize) -> Self {
        Self {
            storage,
            next: first,
            remaining: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T, S: NodeStorage<T>> Iterator for Iter<'a, T, S> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let storage = self.storage;
        let node = storage.get(self.next?)?;
        self.next = node.next(0);
        self.remaining -= 1;
        Some(node.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, S: NodeStorage<T>> ExactSizeIterator for Iter<'_, T, S> {}

impl<T, S: NodeStorage<T>> FusedIterator for Iter<'_, T, S> {}

impl<T, S> Clone for Iter<'_, T, S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage,
            next: self.next,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

/// Owning iterator, yields elements smallest first.
pub struct IntoIter<T, C, G, S, const MAX_HEIGHT: usize> {
    set: SkipSet<T, C, G, S, MAX_HEIGHT>,
}

impl<T, C, G, S: NodeStorage<T>, const MAX_HEIGHT: usize> IntoIter<T, C, G, S, MAX_HEIGHT> {
    pub(crate) fn new(set: SkipSet<T, C, G, S, MAX_HEIGHT>) -> Self {
        Self { set }
    }
}

impl<T, C, G, S: NodeStorage<T>, const MAX_HEIGHT: usize> Iterator for IntoIter<T, C, G, S, MAX_HEIGHT> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.set.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.set.len(), Some(self.set.len()))
    }
}

impl<T, C, G, S: NodeStorage<T>, const MAX_HEIGHT: usize> ExactSizeIterator
    for IntoIter<T, C, G, S, MAX_HEIGHT>
{
}

impl<T, C, G, S: NodeStorage<T>, const MAX_HEIGHT: usize> FusedIterator
    for IntoIter<T, C, G, S, MAX_HEIGHT>
{
}

/// Forward-only position in a set: an element, or past the end.
///
/// Two cursors are equal when they point into the same set at the same
/// position.
pub struct Cursor<'a, T, C, G, S, const MAX_HEIGHT: usize> {
    set: &'a SkipSet<T, C, G, S, MAX_HEIGHT>,
    at: Link,
}

impl<'a, T, C, G, S, const MAX_HEIGHT: usize> Cursor<'a, T, C, G, S, MAX_HEIGHT>
where
    S: NodeStorage<T>,
{
    pub(crate) fn new(set: &'a SkipSet<T, C, G, S, MAX_HEIGHT>, at: Link) -> Self {
        Self { set, at }
    }

    /// Element under the cursor, `None` at the end.
    pub fn get(&self) -> Option<&'a T> {
        let set = self.set;
        self.at
            .and_then(|id| set.storage().get(id))
            .map(Node::value)
    }

    pub fn is_end(&self) -> bool {
        self.at.is_none()
    }

    pub fn position(&self) -> Position {
        Position(self.at)
    }

    /// Steps to the next element on level 0. Stays put at the end.
    pub fn advance(&mut self) {
        self.at = self
            .at
            .and_then(|id| self.set.storage().get(id))
            .and_then(|node| node.next(0));
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> OrderedCursor<T> for Cursor<'_, T, C, G, S, MAX_HEIGHT>
where
    C: Compare<T>,
    S: NodeStorage<T>,
{
    fn valid(&self) -> bool {
        !self.is_end()
    }

    fn key(&self) -> Result<&T, SkipListError> {
        self.get().ok_or(SkipListError::PastTheEnd)
    }

    fn next(&mut self) {
        self.advance();
    }

    fn seek(&mut self, target: &T) {
        self.at = self.set.lower_bound_link(target);
    }

    fn seek_to_first(&mut self) {
        self.at = self.set.cursor_front().at;
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> Clone for Cursor<'_, T, C, G, S, MAX_HEIGHT> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> Copy for Cursor<'_, T, C, G, S, MAX_HEIGHT> {}

impl<T, C, G, S, const MAX_HEIGHT: usize> PartialEq for Cursor<'_, T, C, G, S, MAX_HEIGHT> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.set, other.set) && self.at == other.at
    }
}

impl<T, C, G, S, const MAX_HEIGHT: usize> Eq for Cursor<'_, T, C, G, S, MAX_HEIGHT> {}

impl<T, C, G, S, const MAX_HEIGHT: usize> fmt::Debug for Cursor<'_, T, C, G, S, MAX_HEIGHT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").field("at", &self.at).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_in_order() {
        let list = SkipSet::from([50, 30, 70, 20, 40, 60, 80]);
        let mut iter = list.iter();
        assert_eq!(iter.len(), 7);
        assert_eq!(iter.next(), Some(&20));
        assert_eq!(iter.len(), 6);
        let rest: Vec<_> = iter.clone().copied().collect();
        assert_eq!(rest, vec![30, 40, 50, 60, 70, 80]);
        assert_eq!(iter.count(), 6);
    }

    #[test]
    fn test_iter_empty() {
        let list: SkipSet<i32> = SkipSet::new();
        let mut iter = list.iter();
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_for_loop_by_reference() {
        let list = SkipSet::from([3, 1, 2]);
        let mut sum = 0;
        for value in &list {
            sum += value;
        }
        assert_eq!(sum, 6);
    }

    #[test]
    fn test_into_iter_len() {
        let list = SkipSet::from([1, 2, 3]);
        let mut iter = list.into_iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.len(), 2);
    }

    #[test]
    fn test_cursor_walk() {
        let list = SkipSet::from([10, 20, 30]);
        let mut cursor = list.cursor_front();
        let mut seen = Vec::new();
        while let Some(value) = cursor.get() {
            seen.push(*value);
            cursor.advance();
        }
        assert_eq!(seen, vec![10, 20, 30]);
        assert_eq!(cursor, list.end());

        cursor.advance();
        assert!(cursor.is_end());
        assert_eq!(cursor.position(), Position::END);
    }

    #[test]
    fn test_ordered_cursor() {
        let list = SkipSet::from([10, 20, 30, 40]);
        let mut cursor = list.end();
        assert!(!cursor.valid());
        assert_eq!(cursor.key(), Err(SkipListError::PastTheEnd));

        cursor.seek(&25);
        assert_eq!(cursor.key(), Ok(&30));
        OrderedCursor::next(&mut cursor);
        assert_eq!(cursor.key(), Ok(&40));

        cursor.seek(&41);
        assert!(!cursor.valid());

        cursor.seek_to_first();
        assert_eq!(cursor.key(), Ok(&10));
        cursor.seek(&10);
        assert_eq!(cursor.key(), Ok(&10));
    }

    #[test]
    fn test_cursor_equality_is_per_set() {
        let a = SkipSet::from([1]);
        let b = SkipSet::from([1]);
        assert_eq!(a.find(&1), a.cursor_front());
        assert_ne!(a.find(&1), b.find(&1));
        assert_eq!(a.end(), a.find(&2));
    }

    #[test]
    fn test_position_round_trip() {
        let mut list = SkipSet::from([5, 6]);
        let position = list.find(&6).position();
        list.insert(7);
        assert_eq!(list.get_at(position), Some(&6));
        list.erase(&6);
        assert_eq!(list.get_at(position), None);
        assert_eq!(list.get_at(Position::END), None);
    }
}
