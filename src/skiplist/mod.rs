pub mod compare;
pub mod iter;
pub mod level;
pub mod node;
pub mod skip_set;
pub mod storage;


use crate::error::SkipListError;

pub trait OrderedSet<Key> {
    /// Inserts `key` unless an equivalent key is present.
    /// Returns true if the set grew.
    fn insert(&mut self, key: Key) -> bool;

    /// Returns true if a key equivalent to `key` is in the set.
    fn contains(&self, key: &Key) -> bool;

    /// Removes the key equivalent to `key`. Returns true if one was present.
    fn remove(&mut self, key: &Key) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait OrderedCursor<Key> {
    /// Returns true if the cursor is positioned at an element.
    fn valid(&self) -> bool;

    /// Returns the element at the current position.
    /// Fails with [`SkipListError::PastTheEnd`] when not valid.
    fn key(&self) -> Result<&Key, SkipListError>;

    /// Advances to the next position. No-op when not valid.
    fn next(&mut self);

    /// Positions at the first element not ordered before `target`.
    fn seek(&mut self, target: &Key);

    /// Positions at the first element.
    /// Final state of the cursor is valid iff the set is not empty.
    fn seek_to_first(&mut self);
}
