//! A sorted set of unique elements on a probabilistic skip list.
//!
//! Insert, lookup and removal run in expected O(log n) without any
//! rebalancing: each node is promoted to higher "express lanes" with
//! probability 0.5 per level, up to a fixed number of levels.
//!
//! Nodes live in an arena and link to each other by index, so the set is
//! plain safe Rust. The ordering, the level generator and the node storage
//! are all type parameters:
//!
//! ```
//! use skipset::{Reverse, SkipSet};
//!
//! let mut set = SkipSet::new();
//! for v in [30, 10, 50, 20, 40] {
//!     set.insert(v);
//! }
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [10, 20, 30, 40, 50]);
//! assert_eq!(set.erase(&30), 1);
//! assert!(set.contains(&20));
//! assert!(!set.contains(&25));
//!
//! let mut desc: SkipSet<i32, Reverse> = SkipSet::with_compare(Reverse);
//! desc.extend([30, 10, 50]);
//! assert_eq!(desc.front(), Ok(&50));
//! ```
//!
//! A set is single-owner: mutation needs `&mut`, so concurrent access has
//! to be serialized by the caller.

pub mod error;
pub mod skiplist;

pub use error::SkipListError;
pub use skiplist::compare::{Compare, Natural, Reverse};
pub use skiplist::iter::{Cursor, IntoIter, Iter, Position};
pub use skiplist::level::{Constant, Geometric, LevelGenerator, Sequence};
pub use skiplist::node::{Link, Node, NodeId};
pub use skiplist::skip_set::{Levels, SkipSet};
pub use skiplist::storage::{Arena, BoundedArena, Full, NodeStorage, UnboundedStorage};
pub use skiplist::{OrderedCursor, OrderedSet};
