use thiserror::Error;

use crate::skiplist::storage::Full;

/// Failures surfaced by the skip list.
///
/// Misses (`find`, `erase` on an absent value) are not errors; they come
/// back as an end cursor, `None` or a zero count.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipListError {
    #[error("{0} called on an empty skip list")]
    Empty(&'static str),
    #[error("cursor is past the end of the skip list")]
    PastTheEnd,
    #[error("node storage is full")]
    StorageFull,
}

impl<T> From<Full<T>> for SkipListError {
    fn from(_: Full<T>) -> Self {
        SkipListError::StorageFull
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            SkipListError::Empty("front").to_string(),
            "front called on an empty skip list"
        );
        assert_eq!(
            SkipListError::PastTheEnd.to_string(),
            "cursor is past the end of the skip list"
        );
    }

    #[test]
    fn test_from_full() {
        let err: SkipListError = Full(7).into();
        assert_eq!(err, SkipListError::StorageFull);
    }
}
