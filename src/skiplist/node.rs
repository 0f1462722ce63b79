/// Stable handle of a node inside its storage.
///
/// The slot index can be reused after the node is freed; the generation
/// is unique per allocation, so a handle to a freed node never resolves to
/// a node allocated later in its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u64,
}

impl NodeId {
    pub(crate) fn new(index: u32, generation: u64) -> Self {
        Self { index, generation }
    }

    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        self.index as usize
    }

    #[inline(always)]
    pub(crate) fn generation(self) -> u64 {
        self.generation
    }
}

/// Forward link at one level; `None` terminates the chain.
pub type Link = Option<NodeId>;

/// One element plus a forward link for every level it participates in.
#[derive(Debug, Clone)]
pub struct Node<T> {
    value: T,
    links: Vec<Link>,
}

impl<T> Node<T> {
    pub(crate) fn new(value: T, height: usize) -> Self {
        debug_assert!(height >= 1);
        Self {
            value,
            links: vec![None; height],
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Number of levels this node spans.
    #[inline(always)]
    pub fn height(&self) -> usize {
        self.links.len()
    }

    #[inline(always)]
    pub(crate) fn set_next(&mut self, n: usize, x: Link) {
        self.links[n] = x;
    }

    #[inline(always)]
    pub(crate) fn next(&self, n: usize) -> Link {
        debug_assert!(n < self.links.len());
        self.links[n]
    }
}
