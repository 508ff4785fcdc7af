//! Workspace Tree
//!
//! The in-memory model of the workspace: node types, the scanner and walker that read the
//! disk, header/source pairing, the snapshot builder, and the reconciler that merges each
//! snapshot into the displayed tree.

pub mod builder;
pub mod node;
pub mod pairing;
pub mod reconcile;
pub mod scanner;
pub mod walker;

pub use builder::{TreeBuilder, WorkspaceSnapshot};
pub use node::{Node, NodeId, NodeKind, NodeLocation, ProjectType};
pub use reconcile::{LiveTree, NodeChange, RenderDelta, TreeReconciler};
