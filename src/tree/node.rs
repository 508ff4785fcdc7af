//! Tree node types
//!
//! A [`Node`] owns its children; insertion order is display order. Node kinds are fixed at
//! construction: a structural change is expressed by replacing the node, never by mutating
//! it in place.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node identity.
///
/// Reconciliation keeps nodes it does not need to replace, so an id surviving a refresh
/// means the displayed branch (and any expand state bound to it) survived too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Build product of a project, read from its descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Executable,
    Library,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectType::Executable => write!(f, "executable"),
            ProjectType::Library => write!(f, "library"),
        }
    }
}

/// Closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Workspace,
    LibraryGroup,
    LibraryRef,
    Project(ProjectType),
    UnloadedProject(ProjectType),
    Dependencies,
    Tests { enabled: bool },
    Folder,
    NonCodeFolder,
    ClassEntity,
    Header,
    Source,
    License,
    PlainFile,
    BinariesGroup,
}

impl NodeKind {
    /// Folder/non-folder discriminant used when matching siblings by label.
    pub fn is_folder(&self) -> bool {
        matches!(self, NodeKind::Folder | NodeKind::NonCodeFolder)
    }

    /// Whether siblings of these kinds with the same label are the same entry.
    ///
    /// The Libraries group only ever matches itself; everything else is told apart by
    /// the folder flag.
    pub fn shares_slot(&self, other: &NodeKind) -> bool {
        match (
            *self == NodeKind::LibraryGroup,
            *other == NodeKind::LibraryGroup,
        ) {
            (true, true) => true,
            (false, false) => self.is_folder() == other.is_folder(),
            _ => false,
        }
    }
}

/// Where a node lives, relative to the workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeLocation {
    /// Grouping nodes with no file behind them
    Virtual,
    Path(PathBuf),
    /// A class entity: header under `include/`, source under `src/`
    Pair { header: PathBuf, source: PathBuf },
}

impl NodeLocation {
    /// Absolute paths backing this node (none, one, or header then source).
    pub fn full_paths(&self, root: &Path) -> Vec<PathBuf> {
        match self {
            NodeLocation::Virtual => Vec::new(),
            NodeLocation::Path(path) => vec![root.join(path)],
            NodeLocation::Pair { header, source } => vec![root.join(header), root.join(source)],
        }
    }

    /// Primary absolute path: the file itself, or the header of a pair.
    pub fn full_path(&self, root: &Path) -> Option<PathBuf> {
        self.full_paths(root).into_iter().next()
    }
}

/// One entry of the workspace tree.
#[derive(Debug, Serialize)]
pub struct Node {
    id: NodeId,
    label: String,
    kind: NodeKind,
    location: NodeLocation,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Node {
    pub fn new(label: impl Into<String>, kind: NodeKind, location: NodeLocation) -> Self {
        Self {
            id: NodeId::next(),
            label: label.into(),
            kind,
            location,
            children: Vec::new(),
        }
    }

    /// Leaf or folder at a workspace-relative path.
    pub fn at_path(label: impl Into<String>, kind: NodeKind, path: impl Into<PathBuf>) -> Self {
        Self::new(label, kind, NodeLocation::Path(path.into()))
    }

    pub fn virtual_node(label: impl Into<String>, kind: NodeKind) -> Self {
        Self::new(label, kind, NodeLocation::Virtual)
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn location(&self) -> &NodeLocation {
        &self.location
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, label: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.label == label)
    }

    /// Index of the direct child with `label`; `kind` narrows the match to the same slot.
    pub fn child_position(&self, label: &str, kind: Option<&NodeKind>) -> Option<usize> {
        self.children
            .iter()
            .position(|c| c.label == label && kind.map_or(true, |k| c.kind.shares_slot(k)))
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.children.get_mut(index)
    }

    /// Insert at `index`, clamped to the current child count.
    pub fn insert_child(&mut self, index: usize, child: Node) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
    }

    /// Swap in `child` at `index`, returning the node it displaced.
    pub fn replace_child(&mut self, index: usize, child: Node) -> Option<Node> {
        self.children
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, child))
    }

    pub fn remove_child(&mut self, index: usize) -> Option<Node> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn truncate_children(&mut self, len: usize) {
        self.children.truncate(len);
    }

    /// Keep only children matching `keep`; returns how many were dropped.
    pub fn retain_children<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Node) -> bool,
    {
        let before = self.children.len();
        self.children.retain(|c| keep(c));
        before - self.children.len()
    }

    pub fn into_children(self) -> Vec<Node> {
        self.children
    }

    /// Same label, same kind, same child count, and children pairwise equal.
    ///
    /// Ids and locations are not compared: a fresh node equal to a displayed one is
    /// interchangeable with it.
    pub fn structurally_eq(&self, other: &Node) -> bool {
        self.label == other.label
            && self.kind == other.kind
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(other.children.iter())
                .all(|(a, b)| a.structurally_eq(b))
    }

    /// Depth-first search for a node by id.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Ids of this node and every descendant, depth-first.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<NodeId>) {
        ids.push(self.id);
        for child in &self.children {
            child.collect_ids(ids);
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }
}
