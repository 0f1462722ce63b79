//! Node storage with stable indices.
//!
//! The skip list never holds pointers into its nodes; it links them by
//! [`NodeId`] and lets a storage own the memory. Swapping the storage type
//! changes where nodes live and whether allocation can fail, nothing else.
//!
//! - [`Arena`] is a [`Slab`] that grows on demand, allocation cannot fail.
//! - [`BoundedArena`] holds at most a fixed number of nodes and rejects
//!   further allocations with [`Full`].

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use slab::Slab;

use crate::skiplist::node::{Node, NodeId};

/// Slab-like storage of skip list nodes.
///
/// An index stays valid until it is freed. Freed slots may be reused by
/// later allocations.
pub trait NodeStorage<T> {
    /// Stores `node`, or hands it back if there is no room.
    fn try_alloc(&mut self, node: Node<T>) -> Result<NodeId, Full<Node<T>>>;

    /// Removes and returns the node at `id`, if the slot is occupied.
    fn free(&mut self, id: NodeId) -> Option<Node<T>>;

    fn get(&self, id: NodeId) -> Option<&Node<T>>;

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>>;

    /// Drops every stored node.
    fn clear(&mut self);

    /// Number of occupied slots.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upper bound on occupied slots, `None` when unbounded.
    fn capacity(&self) -> Option<usize>;

    /// A new, empty storage of the same kind and capacity.
    fn empty_like(&self) -> Self
    where
        Self: Sized;
}

/// Storage whose allocations cannot fail.
pub trait UnboundedStorage<T>: NodeStorage<T> {
    fn alloc(&mut self, node: Node<T>) -> NodeId;
}

/// Returned when bounded storage has no free slot; carries the rejected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node storage is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// An occupied slab slot: the node and the generation it was allocated under.
#[derive(Debug, Clone)]
struct Entry<T> {
    generation: u64,
    node: Node<T>,
}

// =============================================================================
// Arena - growable, slab slot reuse
// =============================================================================

/// Growable node storage backed by a [`Slab`].
///
/// Every allocation draws a fresh generation, so a [`NodeId`] for a freed
/// node stays dead even after its slot is handed to another node, and a
/// [`NodeId`] from one arena never resolves in another.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slab: Slab<Entry<T>>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self { slab: Slab::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slab: Slab::with_capacity(capacity),
        }
    }

    /// Number of slots that can be occupied without reallocating.
    pub fn reserved(&self) -> usize {
        self.slab.capacity()
    }

    fn place(&mut self, node: Node<T>) -> NodeId {
        let slot = self.slab.vacant_entry();
        let index = u32::try_from(slot.key())
            .unwrap_or_else(|_| panic!("arena cannot address more than {} nodes", u32::MAX));
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        slot.insert(Entry { generation, node });
        NodeId::new(index, generation)
    }

    fn entry(&self, id: NodeId) -> Option<&Entry<T>> {
        self.slab
            .get(id.index())
            .filter(|entry| entry.generation == id.generation())
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeStorage<T> for Arena<T> {
    fn try_alloc(&mut self, node: Node<T>) -> Result<NodeId, Full<Node<T>>> {
        Ok(self.place(node))
    }

    fn free(&mut self, id: NodeId) -> Option<Node<T>> {
        self.entry(id)?;
        self.slab.try_remove(id.index()).map(|entry| entry.node)
    }

    fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.entry(id).map(|entry| &entry.node)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slab
            .get_mut(id.index())
            .filter(|entry| entry.generation == id.generation())
            .map(|entry| &mut entry.node)
    }

    fn clear(&mut self) {
        self.slab.clear();
    }

    fn len(&self) -> usize {
        self.slab.len()
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn empty_like(&self) -> Self {
        Self::new()
    }
}

impl<T> UnboundedStorage<T> for Arena<T> {
    fn alloc(&mut self, node: Node<T>) -> NodeId {
        self.place(node)
    }
}

// =============================================================================
// BoundedArena - fixed capacity, allocated up front
// =============================================================================

/// Fixed-capacity node storage: the same slab as [`Arena`], with every slot
/// reserved at construction and a capacity check in front of allocation.
/// Once `capacity` nodes are live further allocations fail with [`Full`].
#[derive(Debug, Clone)]
pub struct BoundedArena<T> {
    arena: Arena<T>,
    capacity: usize,
}

impl<T> BoundedArena<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            capacity,
        }
    }
}

impl<T> NodeStorage<T> for BoundedArena<T> {
    fn try_alloc(&mut self, node: Node<T>) -> Result<NodeId, Full<Node<T>>> {
        if self.arena.len() >= self.capacity {
            return Err(Full(node));
        }
        Ok(self.arena.place(node))
    }

    fn free(&mut self, id: NodeId) -> Option<Node<T>> {
        self.arena.free(id)
    }

    fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.arena.get(id)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.arena.get_mut(id)
    }

    fn clear(&mut self) {
        self.arena.clear();
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn empty_like(&self) -> Self {
        Self::with_capacity(self.capacity)
    }
}
