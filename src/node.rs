use crate::error::TreeSetError;
use crate::store::NodeStore;
use crate::utils::fillvector::FVIndex;

/// Handle to a node in a set's store. Stays valid until the next mutation of the set.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl From<FVIndex> for NodeId {
    fn from(index: FVIndex) -> Self {
        NodeId(index.0)
    }
}

impl From<NodeId> for FVIndex {
    fn from(id: NodeId) -> Self {
        FVIndex(id.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// One element plus its links. A child link is exclusive: no node is reachable from two parents.
pub struct Node {
    pub(crate) data: Box<[u8]>,
    pub(crate) color: Color,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl Node {
    /// Copies `data` into a freshly allocated buffer. Allocation failure is reported, not fatal.
    pub fn create(color: Color, data: &[u8]) -> Result<Node, TreeSetError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(data.len())
            .map_err(|_| TreeSetError::OutOfMemory {
                requested: data.len(),
            })?;
        buf.extend_from_slice(data);
        Ok(Node {
            data: buf.into_boxed_slice(),
            color,
            left: None,
            right: None,
        })
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    pub fn into_data(self) -> Box<[u8]> {
        self.data
    }
}

/// Absent children are the implicit black leaves.
#[inline]
pub(crate) fn is_black<S: NodeStore>(store: &S, node: Option<NodeId>) -> bool {
    match node {
        None => true,
        Some(id) => store.node(id).color == Color::Black,
    }
}

#[inline]
pub(crate) fn set_color<S: NodeStore>(store: &mut S, node: Option<NodeId>, color: Color) {
    if let Some(id) = node {
        store.node_mut(id).color = color;
    }
}

/// Releases `id` and everything below it, handing each element to `release`. Children go first;
/// a node's slot is only given back once nothing needs to read its links.
pub(crate) fn recursive_destroy<S: NodeStore>(
    store: &mut S,
    id: NodeId,
    release: &mut dyn FnMut(Box<[u8]>),
) {
    let (left, right) = {
        let node = store.node(id);
        (node.left, node.right)
    };
    if let Some(left) = left {
        recursive_destroy(store, left, release);
    }
    if let Some(right) = right {
        recursive_destroy(store, right, release);
    }
    if let Some(node) = store.release(id) {
        release(node.into_data());
    }
}
