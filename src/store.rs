use crate::config::Config;
use crate::error::TreeSetError;
use crate::node::{Node, NodeId};
use crate::utils::fillvector::FillVector;

/// Where a set's nodes live. The tree only ever allocates, releases and follows node ids; how the
/// slots are laid out is up to the store.
pub trait NodeStore {
    /// Take ownership of `node` and return its id. On failure the node is dropped and nothing
    /// else changes.
    fn allocate(&mut self, node: Node) -> Result<NodeId, TreeSetError>;

    /// Give back the node at `id`, or `None` if `id` is not live.
    fn release(&mut self, id: NodeId) -> Option<Node>;

    /// Checked access, for ids that come from outside the tree.
    fn get(&self, id: NodeId) -> Option<&Node>;

    /// Access for ids reached through the tree's own links. Panics if `id` is not live.
    fn node(&self, id: NodeId) -> &Node;

    /// Mutable access for ids reached through the tree's own links. Panics if `id` is not live.
    fn node_mut(&mut self, id: NodeId) -> &mut Node;

    /// Number of live nodes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node store that uses our "fill vector" to keep nodes in a slab, recycling freed slots.
pub struct SlabNodeStore {
    nodes: FillVector<Node>,
}

impl SlabNodeStore {
    pub fn new() -> Self {
        Self::with_capacity(Config::DEFAULT_INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: FillVector::with_capacity(capacity),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let nodes = FillVector::with_capacity(config.initial_capacity);
        let nodes = match config.max_nodes {
            Some(limit) => nodes.with_limit(limit),
            None => nodes,
        };
        Self { nodes }
    }

    /// Slots held by the slab, live or free.
    pub fn slots(&self) -> usize {
        self.nodes.slots()
    }
}

impl Default for SlabNodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore for SlabNodeStore {
    fn allocate(&mut self, node: Node) -> Result<NodeId, TreeSetError> {
        self.nodes.add(|_i| node).map(NodeId::from)
    }

    fn release(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.free(id.into())
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id.into())
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.into()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.into()]
    }

    fn len(&self) -> usize {
        self.nodes.size()
    }
}
