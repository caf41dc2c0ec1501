//=========================================================================
// Display Nodes
//=========================================================================
//
// Value types stored in the DisplayTree: node ids, textures, text style,
// node kinds and the per-node transform.
//
//=========================================================================

//=== NodeId ==============================================================

/// Handle to a node in a [`DisplayTree`](super::DisplayTree).
///
/// Ids are never reused within one tree, so a stale id simply stops
/// resolving once its node is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

//=== Texture =============================================================

const PLACEHOLDER_PREFIX: &str = "placeholder:";

/// A decoded image, identified by the reference it was loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    key: String,
    width: f32,
    height: f32,
}

impl Texture {
    pub fn new(key: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            key: key.into(),
            width,
            height,
        }
    }

    /// Texture generated from a flat-colour drawing.
    pub(super) fn placeholder(width: f32, height: f32, color: u32) -> Self {
        Self::new(format!("{PLACEHOLDER_PREFIX}{width}x{height}:{color:06x}"), width, height)
    }

    /// Reference the texture was loaded from.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Returns `true` for textures produced by `generate_texture`.
    pub fn is_placeholder(&self) -> bool {
        self.key.starts_with(PLACEHOLDER_PREFIX)
    }
}

//=== TextStyle ===========================================================

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Font and colour for text nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub fill: u32,
    pub align: TextAlign,
    pub letter_spacing: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial, sans-serif".to_string(),
            font_size: 24.0,
            fill: 0xFFFFFF,
            align: TextAlign::Center,
            letter_spacing: 0.0,
        }
    }
}

//=== NodeKind ============================================================

/// What a node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Groups children; draws nothing itself.
    Container { children: Vec<NodeId> },

    /// Draws a texture.
    Sprite { texture: Texture },

    /// Flat-colour rectangle.
    Fill { width: f32, height: f32, color: u32 },

    /// A line of text.
    Text { content: String, style: TextStyle },
}

//=== Node ================================================================

/// A node and its local transform.
///
/// `anchor` is the normalized point of the node's own size placed at
/// `(x, y)`: `(0, 0)` is top-left, `(0.5, 0.5)` is centre.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub anchor: (f32, f32),
    pub alpha: f32,
    pub visible: bool,
    pub cursor: Option<String>,
    pub(super) parent: Option<NodeId>,
}

impl Node {
    pub(super) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            anchor: (0.0, 0.0),
            alpha: 1.0,
            visible: true,
            cursor: None,
            parent: None,
        }
    }

    /// Sets both scale axes.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale_x = scale;
        self.scale_y = scale;
    }

    /// Sets both anchor axes.
    pub fn set_anchor(&mut self, anchor: f32) {
        self.anchor = (anchor, anchor);
    }

    /// Size before scaling. Containers and text report zero.
    pub fn intrinsic_size(&self) -> (f32, f32) {
        match &self.kind {
            NodeKind::Sprite { texture } => (texture.width(), texture.height()),
            NodeKind::Fill { width, height, .. } => (*width, *height),
            NodeKind::Container { .. } | NodeKind::Text { .. } => (0.0, 0.0),
        }
    }

    /// Size after scaling.
    pub fn scaled_size(&self) -> (f32, f32) {
        let (w, h) = self.intrinsic_size();
        (w * self.scale_x.abs(), h * self.scale_y.abs())
    }

    /// Texture drawn by a sprite node.
    pub fn texture(&self) -> Option<&Texture> {
        match &self.kind {
            NodeKind::Sprite { texture } => Some(texture),
            _ => None,
        }
    }

    /// Replaces a sprite's texture. Returns `false` for non-sprites.
    pub fn set_texture(&mut self, new_texture: Texture) -> bool {
        match &mut self.kind {
            NodeKind::Sprite { texture } => {
                *texture = new_texture;
                true
            }
            _ => false,
        }
    }

    /// Text content of a text node.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Replaces a text node's content. Returns `false` for non-text nodes.
    pub fn set_text(&mut self, new_content: &str) -> bool {
        match &mut self.kind {
            NodeKind::Text { content, .. } => {
                new_content.clone_into(content);
                true
            }
            _ => false,
        }
    }

    pub fn text_style_mut(&mut self) -> Option<&mut TextStyle> {
        match &mut self.kind {
            NodeKind::Text { style, .. } => Some(style),
            _ => None,
        }
    }

    /// Children of a container node (empty for leaves).
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Container { children } => children,
            _ => &[],
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

//=== Bounds ==============================================================

/// Axis-aligned rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Edge-inclusive point test.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}
