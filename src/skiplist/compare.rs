//! Ordering used to place elements.
//!
//! Two elements are the same element when neither orders before the other.

use core::cmp::Ordering;

/// A strict weak ordering over `T`.
pub trait Compare<T: ?Sized> {
    /// Returns true if `a` orders strictly before `b`.
    fn less(&self, a: &T, b: &T) -> bool;

    #[inline]
    fn equivalent(&self, a: &T, b: &T) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }

    fn order(&self, a: &T, b: &T) -> Ordering {
        if self.less(a, b) {
            Ordering::Less
        } else if self.less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// Ascending by `Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    #[inline(always)]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Descending by `Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reverse;

impl<T: Ord + ?Sized> Compare<T> for Reverse {
    #[inline(always)]
    fn less(&self, a: &T, b: &T) -> bool {
        b < a
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline(always)]
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_and_reverse() {
        assert!(Natural.less(&1, &2));
        assert!(!Natural.less(&2, &2));
        assert!(Reverse.less(&2, &1));
        assert_eq!(Reverse.order(&1, &2), Ordering::Greater);
    }

    #[test]
    fn test_closure_equivalence() {
        // Case-insensitive: "a" and "A" are one element.
        let by_lower = |a: &String, b: &String| a.to_lowercase() < b.to_lowercase();
        assert!(by_lower.equivalent(&"a".to_string(), &"A".to_string()));
        assert!(by_lower.less(&"a".to_string(), &"B".to_string()));
    }
}
