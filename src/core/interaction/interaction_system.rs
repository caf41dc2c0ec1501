//=========================================================================
// Interaction System
//=========================================================================
//
// Hover and click handling for a scene's interactive objects.
//
// Architecture:
//   PointerEvent → hit_test (topmost first)
//       ├─ Moved   → leave(old) / enter(new)
//       └─ Pressed / Touched → click → GameState → Option<Interaction>
//
// State-change images are queued and swapped on the next scene update.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Interaction, InteractiveObject};
use crate::core::animation::{Easing, Repeat, Tween, TweenProperty};
use crate::core::globals::GameContext;
use crate::core::input::PointerEvent;

//=== Constants ===========================================================

const HOVER_SOUND_VOLUME: f32 = 0.3;
const HOVER_DURATION: f32 = 0.3;
const PRESS_FACTOR: f32 = 0.95;
const PRESS_DURATION: f32 = 0.1;
const DEFAULT_CURSOR: &str = "default";

//=== PendingSwap =========================================================

#[derive(Debug, Clone, PartialEq)]
struct PendingSwap {
    object: usize,
    reference: String,
}

//=== InteractionSystem ===================================================

/// Per-scene hover tracking and click handling.
#[derive(Debug, Default)]
pub struct InteractionSystem {
    hovered: Option<usize>,
    pending_swaps: Vec<PendingSwap>,
}

impl InteractionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Pointer Handling -------------------------------------------------

    /// Applies one pointer event to `objects`.
    ///
    /// Returns the interaction when the event clicked an object.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        objects: &[InteractiveObject],
        ctx: &mut GameContext,
    ) -> Option<Interaction> {
        let (x, y) = event.position();
        let hit = Self::hit_test(objects, ctx, x, y);

        match event {
            PointerEvent::Moved { .. } => {
                if hit != self.hovered {
                    if let Some(old) = self.hovered.take() {
                        if let Some(object) = objects.get(old) {
                            Self::hover_leave(object, ctx);
                        }
                    }
                    if let Some(new) = hit {
                        Self::hover_enter(&objects[new], ctx);
                        self.hovered = Some(new);
                    }
                }
                None
            }
            PointerEvent::Pressed { .. } | PointerEvent::Touched { .. } => {
                hit.map(|index| self.click(index, &objects[index], ctx))
            }
        }
    }

    /// Index of the topmost displayed object under `(x, y)`.
    fn hit_test(objects: &[InteractiveObject], ctx: &GameContext, x: f32, y: f32) -> Option<usize> {
        objects.iter().rposition(|object| {
            ctx.display.is_displayed(object.node)
                && ctx
                    .display
                    .world_bounds(object.node)
                    .is_some_and(|bounds| bounds.contains(x, y))
        })
    }

    //--- Hover ------------------------------------------------------------

    fn hover_enter(object: &InteractiveObject, ctx: &mut GameContext) {
        let descriptor = &object.descriptor;

        ctx.display.set_cursor(descriptor.cursor_or_default());

        if descriptor.hover_animation {
            ctx.animator.animate(
                Tween::to(object.node, TweenProperty::Scale, object.hover_scale(), HOVER_DURATION)
                    .ease(Easing::Power2Out),
            );
        }

        if descriptor.hover_image.is_some() {
            if let Some(node) = ctx.display.node_mut(object.node) {
                node.set_texture(object.hover_texture.clone());
            }
        }

        if let Some(sound) = &descriptor.hover_sound {
            ctx.audio.play_sound(sound, Some(HOVER_SOUND_VOLUME));
        }
    }

    fn hover_leave(object: &InteractiveObject, ctx: &mut GameContext) {
        let descriptor = &object.descriptor;

        ctx.display.set_cursor(DEFAULT_CURSOR);

        if descriptor.hover_animation {
            ctx.animator.animate(
                Tween::to(object.node, TweenProperty::Scale, object.base_scale, HOVER_DURATION)
                    .ease(Easing::Power2Out),
            );
        }

        if descriptor.hover_image.is_some() {
            if let Some(node) = ctx.display.node_mut(object.node) {
                node.set_texture(object.normal_texture.clone());
            }
        }
    }

    //--- Click ------------------------------------------------------------

    fn click(&mut self, index: usize, object: &InteractiveObject, ctx: &mut GameContext) -> Interaction {
        let descriptor = &object.descriptor;
        let previous_state = ctx.state.object_state(&descriptor.id).to_string();

        ctx.animator.animate(
            Tween::to(object.node, TweenProperty::Scale, object.base_scale * PRESS_FACTOR, PRESS_DURATION)
                .yoyo(true)
                .repeat(Repeat::Times(1))
                .ease(Easing::Power2InOut),
        );

        if let Some(sound) = &descriptor.click_sound {
            ctx.audio.play_sound(sound, None);
        }

        if let Some(target) = descriptor.resolve_state_change(&previous_state) {
            debug!("Object `{}`: {} → {}", descriptor.id, previous_state, target.state());
            ctx.state.set_object_state(&descriptor.id, target.state());

            if let Some(image) = target.image() {
                self.pending_swaps.push(PendingSwap {
                    object: index,
                    reference: image.to_string(),
                });
            }
        }

        Interaction {
            descriptor: descriptor.clone(),
            previous_state,
        }
    }

    //--- Texture Swaps ----------------------------------------------------

    /// Loads queued state images and makes them the objects' normal
    /// textures. Failures are logged and dropped.
    pub fn apply_pending_swaps(&mut self, objects: &mut [InteractiveObject], ctx: &mut GameContext) {
        for swap in self.pending_swaps.drain(..) {
            let Some(object) = objects.get_mut(swap.object) else {
                continue;
            };

            match ctx.assets.try_load(&swap.reference) {
                Ok(texture) => {
                    if let Some(node) = ctx.display.node_mut(object.node) {
                        node.set_texture(texture.clone());
                    }
                    object.normal_texture = texture;
                }
                Err(e) => warn!("Failed to load state image `{}`: {}", swap.reference, e),
            }
        }
    }

    pub fn has_pending_swaps(&self) -> bool {
        !self.pending_swaps.is_empty()
    }

    //--- Queries ----------------------------------------------------------

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Forgets hover and queued swaps, restoring the default cursor.
    pub fn reset(&mut self, ctx: &mut GameContext) {
        if self.hovered.take().is_some() {
            ctx.display.set_cursor(DEFAULT_CURSOR);
        }
        self.pending_swaps.clear();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
