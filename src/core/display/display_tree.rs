//=========================================================================
// Display Tree
//=========================================================================
//
// Retained node tree standing in for the renderer's scene graph.
//
// Architecture:
//   nodes: HashMap<NodeId, Node>     (ownership)
//   root:  Vec<NodeId>               (draw order, last = topmost)
//
// Drawing is left to a renderer walking `root_children()`; everything
// the tour logic needs (transforms, bounds, cursor) lives here.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::node::{Bounds, Node, NodeId, NodeKind, TextStyle, Texture};
use crate::core::layout::Viewport;

//=== DisplayTree =========================================================

/// Owns every visual node and the root display list.
pub struct DisplayTree {
    nodes: HashMap<NodeId, Node>,
    root: Vec<NodeId>,
    next_id: u32,
    viewport: Viewport,
    cursor: String,
}

impl DisplayTree {
    //--- Construction -----------------------------------------------------

    pub fn new(viewport: Viewport) -> Self {
        Self {
            nodes: HashMap::new(),
            root: Vec::new(),
            next_id: 0,
            viewport,
            cursor: "default".to_string(),
        }
    }

    //--- Node Creation ----------------------------------------------------

    pub fn create_container(&mut self) -> NodeId {
        self.insert(Node::new(NodeKind::Container { children: Vec::new() }))
    }

    pub fn create_sprite(&mut self, texture: &Texture) -> NodeId {
        self.insert(Node::new(NodeKind::Sprite {
            texture: texture.clone(),
        }))
    }

    /// Flat-colour rectangle of the given size.
    pub fn create_fill(&mut self, width: f32, height: f32, color: u32) -> NodeId {
        self.insert(Node::new(NodeKind::Fill { width, height, color }))
    }

    pub fn create_text(&mut self, content: impl Into<String>, style: TextStyle) -> NodeId {
        self.insert(Node::new(NodeKind::Text {
            content: content.into(),
            style,
        }))
    }

    /// Renders a flat-colour drawing into a texture.
    pub fn generate_texture(&self, width: f32, height: f32, color: u32) -> Texture {
        Texture::placeholder(width, height, color)
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    //--- Hierarchy --------------------------------------------------------

    /// Appends `child` to a container, moving it from any previous parent.
    ///
    /// Returns `false` if either node is missing or `parent` is not a
    /// container.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.nodes.contains_key(&child) {
            return false;
        }
        if !matches!(
            self.nodes.get(&parent).map(|n| &n.kind),
            Some(NodeKind::Container { .. })
        ) {
            warn!("add_child: {:?} is not a container", parent);
            return false;
        }

        self.unlink(child);

        if let Some(NodeKind::Container { children }) = self.nodes.get_mut(&parent).map(|n| &mut n.kind) {
            children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        true
    }

    /// Puts a node on top of the root display list.
    pub fn attach_to_root(&mut self, id: NodeId) {
        if !self.nodes.contains_key(&id) {
            return;
        }
        self.unlink(id);
        self.root.push(id);
        trace!("Attached {:?} to root ({} root children)", id, self.root.len());
    }

    /// Removes a node from the root display list without releasing it.
    pub fn detach_from_root(&mut self, id: NodeId) {
        self.root.retain(|&n| n != id);
    }

    /// Moves a root child (or a node within its parent) to the top.
    pub fn bring_to_front(&mut self, id: NodeId) {
        let parent = self.nodes.get(&id).and_then(|n| n.parent);
        match parent {
            Some(parent) => {
                if let Some(NodeKind::Container { children }) =
                    self.nodes.get_mut(&parent).map(|n| &mut n.kind)
                {
                    children.retain(|&n| n != id);
                    children.push(id);
                }
            }
            None => {
                if self.root.contains(&id) {
                    self.root.retain(|&n| n != id);
                    self.root.push(id);
                }
            }
        }
    }

    /// Releases a node and all its descendants.
    pub fn release(&mut self, id: NodeId) {
        self.unlink(id);
        self.release_subtree(id);
    }

    /// Releases every child of a container, keeping the container.
    pub fn release_children(&mut self, id: NodeId) {
        let children = match self.nodes.get_mut(&id).map(|n| &mut n.kind) {
            Some(NodeKind::Container { children }) => std::mem::take(children),
            _ => return,
        };
        for child in children {
            self.release_subtree(child);
        }
    }

    fn release_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            if let NodeKind::Container { children } = node.kind {
                for child in children {
                    self.release_subtree(child);
                }
            }
        }
    }

    // Detaches a node from its parent container or the root list.
    fn unlink(&mut self, id: NodeId) {
        let parent = self.nodes.get_mut(&id).and_then(|n| n.parent.take());
        match parent {
            Some(parent) => {
                if let Some(NodeKind::Container { children }) =
                    self.nodes.get_mut(&parent).map(|n| &mut n.kind)
                {
                    children.retain(|&n| n != id);
                }
            }
            None => self.detach_from_root(id),
        }
    }

    //--- Node Access ------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root display list, bottom to top.
    pub fn root_children(&self) -> &[NodeId] {
        &self.root
    }

    pub fn is_on_root(&self, id: NodeId) -> bool {
        self.root.contains(&id)
    }

    //--- Geometry ---------------------------------------------------------

    /// Position and uniform-per-axis scale of a node's origin in screen
    /// space, composed through its ancestors.
    pub fn world_transform(&self, id: NodeId) -> Option<(f32, f32, f32, f32)> {
        let node = self.nodes.get(&id)?;
        let (mut x, mut y) = (node.x, node.y);
        let (mut sx, mut sy) = (node.scale_x, node.scale_y);

        let mut parent = node.parent;
        while let Some(pid) = parent {
            let p = self.nodes.get(&pid)?;
            x = p.x + p.scale_x * x;
            y = p.y + p.scale_y * y;
            sx *= p.scale_x;
            sy *= p.scale_y;
            parent = p.parent;
        }
        Some((x, y, sx, sy))
    }

    /// Screen-space rectangle covered by a node, honouring its anchor.
    pub fn world_bounds(&self, id: NodeId) -> Option<Bounds> {
        let node = self.nodes.get(&id)?;
        let (x, y, sx, sy) = self.world_transform(id)?;
        let (w, h) = node.intrinsic_size();
        let (width, height) = (w * sx.abs(), h * sy.abs());

        Some(Bounds {
            x: x - node.anchor.0 * width,
            y: y - node.anchor.1 * height,
            width,
            height,
        })
    }

    /// Returns `true` when the node and all its ancestors are visible and
    /// the chain ends on the root display list.
    pub fn is_displayed(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            let Some(node) = self.nodes.get(&current) else {
                return false;
            };
            if !node.visible {
                return false;
            }
            match node.parent {
                Some(parent) => current = parent,
                None => return self.root.contains(&current),
            }
        }
    }

    //--- Viewport & Cursor ------------------------------------------------

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Cursor currently requested for the window.
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    pub fn set_cursor(&mut self, cursor: &str) {
        if self.cursor != cursor {
            trace!("Cursor → {}", cursor);
            self.cursor.clear();
            self.cursor.push_str(cursor);
        }
    }
}

impl Default for DisplayTree {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tree() -> DisplayTree {
        DisplayTree::new(Viewport::new(800.0, 600.0))
    }

    #[test]
    fn release_removes_descendants() {
        let mut tree = tree();
        let root = tree.create_container();
        let inner = tree.create_container();
        let leaf = tree.create_fill(10.0, 10.0, 0x222222);
        tree.add_child(root, inner);
        tree.add_child(inner, leaf);
        tree.attach_to_root(root);

        tree.release(root);

        assert!(tree.is_empty());
        assert!(tree.root_children().is_empty());
    }

    #[test]
    fn release_children_keeps_container() {
        let mut tree = tree();
        let container = tree.create_container();
        let a = tree.create_fill(1.0, 1.0, 0);
        let b = tree.create_fill(1.0, 1.0, 0);
        tree.add_child(container, a);
        tree.add_child(container, b);

        tree.release_children(container);

        assert!(tree.contains(container));
        assert!(!tree.contains(a));
        assert!(!tree.contains(b));
        assert!(tree.node(container).map(|n| n.children().is_empty()).unwrap_or(false));
    }

    #[test]
    fn add_child_reparents() {
        let mut tree = tree();
        let first = tree.create_container();
        let second = tree.create_container();
        let leaf = tree.create_fill(1.0, 1.0, 0);
        tree.add_child(first, leaf);
        tree.add_child(second, leaf);

        assert!(tree.node(first).unwrap().children().is_empty());
        assert_eq!(tree.node(second).unwrap().children(), &[leaf]);
        assert_eq!(tree.node(leaf).unwrap().parent(), Some(second));
    }

    #[test]
    fn add_child_rejects_leaf_parent() {
        let mut tree = tree();
        let leaf = tree.create_fill(1.0, 1.0, 0);
        let other = tree.create_fill(1.0, 1.0, 0);
        assert!(!tree.add_child(leaf, other));
    }

    #[test]
    fn bring_to_front_reorders_root() {
        let mut tree = tree();
        let a = tree.create_container();
        let b = tree.create_container();
        tree.attach_to_root(a);
        tree.attach_to_root(b);

        tree.bring_to_front(a);
        assert_eq!(tree.root_children(), &[b, a]);
    }

    #[test]
    fn world_bounds_honour_anchor_scale_and_parent() {
        let mut tree = tree();
        let container = tree.create_container();
        tree.node_mut(container).unwrap().x = 100.0;

        let sprite = tree.create_sprite(&Texture::new("door.png", 200.0, 100.0));
        {
            let node = tree.node_mut(sprite).unwrap();
            node.x = 50.0;
            node.y = 50.0;
            node.set_anchor(0.5);
            node.set_scale(0.5);
        }
        tree.add_child(container, sprite);

        let bounds = tree.world_bounds(sprite).unwrap();
        assert_relative_eq!(bounds.x, 100.0);
        assert_relative_eq!(bounds.y, 25.0);
        assert_relative_eq!(bounds.width, 100.0);
        assert_relative_eq!(bounds.height, 50.0);
        assert!(bounds.contains(150.0, 50.0));
        assert!(!bounds.contains(99.0, 50.0));
    }

    #[test]
    fn displayed_requires_root_and_visibility() {
        let mut tree = tree();
        let container = tree.create_container();
        let leaf = tree.create_fill(1.0, 1.0, 0);
        tree.add_child(container, leaf);
        assert!(!tree.is_displayed(leaf));

        tree.attach_to_root(container);
        assert!(tree.is_displayed(leaf));

        tree.node_mut(container).unwrap().visible = false;
        assert!(!tree.is_displayed(leaf));
    }

    #[test]
    fn generated_texture_has_requested_size() {
        let tree = tree();
        let texture = tree.generate_texture(800.0, 600.0, 0x222222);
        assert!(texture.is_placeholder());
        assert_eq!((texture.width(), texture.height()), (800.0, 600.0));
    }

    #[test]
    fn cursor_defaults_and_updates() {
        let mut tree = tree();
        assert_eq!(tree.cursor(), "default");
        tree.set_cursor("pointer");
        assert_eq!(tree.cursor(), "pointer");
    }
}
