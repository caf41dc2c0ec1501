//=========================================================================
// Interactive Object
//=========================================================================
//
// A hotspot's visual plus the descriptor it was built from.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::catalog::ObjectDescriptor;
use crate::core::display::{NodeId, Texture};

//=== InteractiveObject ===================================================

/// Sprite-backed hotspot owned by a scene.
#[derive(Debug, Clone)]
pub struct InteractiveObject {
    pub descriptor: ObjectDescriptor,
    pub node: NodeId,

    /// Texture shown when not hovered. Replaced by state-change images.
    pub normal_texture: Texture,

    /// Falls back to `normal_texture` when no hover image loads.
    pub hover_texture: Texture,

    /// Authored scale after the mobile adjustment.
    pub base_scale: f32,
}

impl InteractiveObject {
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn hover_scale(&self) -> f32 {
        self.base_scale * self.descriptor.hover_scale_or_default()
    }
}

//=== Interaction =========================================================

/// Delivered to the scene after a click or tap on an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub descriptor: ObjectDescriptor,

    /// Object state before the click was applied.
    pub previous_state: String,
}

impl Interaction {
    pub fn object_id(&self) -> &str {
        &self.descriptor.id
    }
}
