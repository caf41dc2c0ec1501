//=========================================================================
// Display System
//=========================================================================
//
// Retained scene graph shared by scenes, overlays and the animator.
//
// Architecture:
//   DisplayTree
//     ├─ nodes: HashMap<NodeId, Node>
//     └─ root:  Vec<NodeId>  (scene container, overlays)
//
//=========================================================================

//=== Module Declarations =================================================

mod display_tree;
mod node;

//=== Public API ==========================================================

pub use display_tree::DisplayTree;
pub use node::{Bounds, Node, NodeId, NodeKind, TextAlign, TextStyle, Texture};
