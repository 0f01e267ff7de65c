//! Storage-tree (SNode) queries.
//!
//! The hierarchical tensor storage is built elsewhere; the type checker only
//! needs each node's declared element type, its parent, and for parent
//! nodes the number of indices used to address their children.

use std::fmt;

use crate::types::DataType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SNodeId(pub u32);

impl fmt::Display for SNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Read-only view of a storage tree.
///
/// Implementations are shared between kernels checked in parallel.
pub trait StorageTree: Send + Sync {
    /// Declared element type (`Unknown` for non-leaf nodes).
    fn data_type(&self, node: SNodeId) -> DataType;

    fn parent(&self, node: SNodeId) -> Option<SNodeId>;

    /// Number of indices that address this node's children; 0 if unset.
    fn index_arity(&self, node: SNodeId) -> usize;

    /// Kind name used in diagnostics (`dense`, `pointer`, ...).
    fn kind_name(&self, node: SNodeId) -> &'static str;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SNodeKind {
    Root,
    Dense,
    Dynamic,
    Pointer,
    Bitmasked,
    Hash,
    /// Leaf holding values of one element type.
    Place,
}

impl SNodeKind {
    pub fn name(self) -> &'static str {
        match self {
            SNodeKind::Root => "root",
            SNodeKind::Dense => "dense",
            SNodeKind::Dynamic => "dynamic",
            SNodeKind::Pointer => "pointer",
            SNodeKind::Bitmasked => "bitmasked",
            SNodeKind::Hash => "hash",
            SNodeKind::Place => "place",
        }
    }
}

#[derive(Clone, Debug)]
pub struct SNode {
    pub kind: SNodeKind,
    pub data_type: DataType,
    pub parent: Option<SNodeId>,
    pub num_active_indices: usize,
    pub children: Vec<SNodeId>,
}

/// Arena-backed storage tree with a single root.
#[derive(Clone, Debug)]
pub struct SNodeTree {
    nodes: Vec<SNode>,
}

impl Default for SNodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SNodeTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![SNode {
                kind: SNodeKind::Root,
                data_type: DataType::Unknown,
                parent: None,
                num_active_indices: 0,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> SNodeId {
        SNodeId(0)
    }

    pub fn node(&self, id: SNodeId) -> &SNode {
        &self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add an inner node addressed with `num_indices` indices.
    pub fn child(&mut self, parent: SNodeId, kind: SNodeKind, num_indices: usize) -> SNodeId {
        self.insert(SNode {
            kind,
            data_type: DataType::Unknown,
            parent: Some(parent),
            num_active_indices: num_indices,
            children: Vec::new(),
        })
    }

    pub fn dense(&mut self, parent: SNodeId, num_indices: usize) -> SNodeId {
        self.child(parent, SNodeKind::Dense, num_indices)
    }

    /// Add a leaf holding `data_type` values.
    pub fn place(&mut self, parent: SNodeId, data_type: DataType) -> SNodeId {
        self.insert(SNode {
            kind: SNodeKind::Place,
            data_type,
            parent: Some(parent),
            num_active_indices: 0,
            children: Vec::new(),
        })
    }

    fn insert(&mut self, node: SNode) -> SNodeId {
        let id = SNodeId(self.nodes.len() as u32);
        if let Some(parent) = node.parent {
            self.nodes[parent.0 as usize].children.push(id);
        }
        self.nodes.push(node);
        id
    }
}

impl StorageTree for SNodeTree {
    fn data_type(&self, node: SNodeId) -> DataType {
        self.node(node).data_type
    }

    fn parent(&self, node: SNodeId) -> Option<SNodeId> {
        self.node(node).parent
    }

    fn index_arity(&self, node: SNodeId) -> usize {
        self.node(node).num_active_indices
    }

    fn kind_name(&self, node: SNodeId) -> &'static str {
        self.node(node).kind.name()
    }
}
