//=========================================================================
// Sound Toggle
//=========================================================================
//
// Speaker icon in the bottom-left corner that mutes background music.
// Persists across scenes and is kept above them.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::animation::{Tween, TweenProperty};
use crate::core::display::{NodeId, Texture};
use crate::core::globals::GameContext;
use crate::core::input::PointerEvent;

//=== Constants ===========================================================

const ICON_SIZE: f32 = 40.0;
const ICON_COLOR: u32 = 0x888888;
const MUTED_ICON_COLOR: u32 = 0x666666;
const PADDING: f32 = 20.0;
const BOTTOM_OFFSET: f32 = 60.0;
const HOVER_ALPHA: f32 = 0.7;
const HOVER_DURATION: f32 = 0.2;

//=== SoundToggle =========================================================

pub struct SoundToggle {
    container: NodeId,
    icon: NodeId,
    normal_icon: Texture,
    muted_icon: Texture,
    hovered: bool,
}

impl SoundToggle {
    /// Creates the toggle on top of the display root.
    pub fn new(ctx: &mut GameContext) -> Self {
        // Hit area is 1.2 icons wide to cover the sound waves
        let normal_icon = ctx.display.generate_texture(ICON_SIZE * 1.2, ICON_SIZE, ICON_COLOR);
        let muted_icon = ctx.display.generate_texture(ICON_SIZE * 1.2, ICON_SIZE, MUTED_ICON_COLOR);

        let container = ctx.display.create_container();
        let icon = ctx.display.create_sprite(&normal_icon);
        if let Some(node) = ctx.display.node_mut(icon) {
            node.cursor = Some("pointer".to_string());
        }
        ctx.display.add_child(container, icon);
        ctx.display.attach_to_root(container);

        let mut toggle = Self {
            container,
            icon,
            normal_icon,
            muted_icon,
            hovered: false,
        };
        toggle.sync_icon(ctx);
        toggle.update_position(ctx);
        toggle
    }

    //--- Input ------------------------------------------------------------

    /// Handles a pointer event. Returns `true` if a click was consumed.
    pub fn handle_pointer(&mut self, event: PointerEvent, ctx: &mut GameContext) -> bool {
        let (x, y) = event.position();
        let over = ctx.display.is_displayed(self.icon)
            && ctx
                .display
                .world_bounds(self.icon)
                .is_some_and(|bounds| bounds.contains(x, y));

        match event {
            PointerEvent::Moved { .. } => {
                if over != self.hovered {
                    self.hovered = over;
                    let (cursor, alpha) = if over { ("pointer", HOVER_ALPHA) } else { ("default", 1.0) };
                    ctx.display.set_cursor(cursor);
                    ctx.animator
                        .animate(Tween::to(self.container, TweenProperty::Alpha, alpha, HOVER_DURATION));
                }
                false
            }
            PointerEvent::Pressed { .. } | PointerEvent::Touched { .. } => {
                if over {
                    self.toggle(ctx);
                }
                over
            }
        }
    }

    /// Flips background-music mute and swaps the icon.
    pub fn toggle(&mut self, ctx: &mut GameContext) {
        ctx.audio.toggle_music_mute();
        self.sync_icon(ctx);
    }

    //--- Layout -----------------------------------------------------------

    pub fn update_position(&mut self, ctx: &mut GameContext) {
        let viewport = ctx.viewport();
        let scale_factor = viewport.reference_scale();
        if let Some(node) = ctx.display.node_mut(self.container) {
            node.x = PADDING * scale_factor;
            node.y = viewport.height - BOTTOM_OFFSET * scale_factor;
        }
    }

    /// Moves the toggle above every other root node.
    pub fn bring_to_front(&self, ctx: &mut GameContext) {
        ctx.display.bring_to_front(self.container);
    }

    //--- Queries ----------------------------------------------------------

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn is_muted(&self, ctx: &GameContext) -> bool {
        ctx.audio.is_music_muted()
    }

    fn sync_icon(&self, ctx: &mut GameContext) {
        let texture = if ctx.audio.is_music_muted() {
            self.muted_icon.clone()
        } else {
            self.normal_icon.clone()
        };
        if let Some(node) = ctx.display.node_mut(self.icon) {
            node.set_texture(texture);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::assets::StaticAssetSource;
    use crate::core::globals::test_support::context;
    use approx::assert_relative_eq;

    #[test]
    fn sits_bottom_left() {
        let mut ctx = context(StaticAssetSource::new());
        let toggle = SoundToggle::new(&mut ctx);

        let node = ctx.display.node(toggle.container()).unwrap();
        assert_relative_eq!(node.x, 20.0);
        assert_relative_eq!(node.y, 1080.0 - 60.0);
    }

    #[test]
    fn click_mutes_and_swaps_icon() {
        let mut ctx = context(StaticAssetSource::new());
        ctx.audio.play_background_music("/assets/theme.m4a", None).unwrap();
        let mut toggle = SoundToggle::new(&mut ctx);

        assert!(toggle.handle_pointer(PointerEvent::Pressed { x: 30.0, y: 1030.0 }, &mut ctx));
        assert!(toggle.is_muted(&ctx));
        assert_relative_eq!(ctx.audio.music_channel_volume().unwrap(), 0.0);
        let icon = ctx.display.node(toggle.icon).unwrap().texture().unwrap().key().to_string();
        assert!(icon.ends_with("666666"));

        toggle.handle_pointer(PointerEvent::Touched { x: 30.0, y: 1030.0 }, &mut ctx);
        assert!(!toggle.is_muted(&ctx));
        assert_relative_eq!(ctx.audio.music_channel_volume().unwrap(), 0.6);
    }

    #[test]
    fn clicks_elsewhere_pass_through() {
        let mut ctx = context(StaticAssetSource::new());
        let mut toggle = SoundToggle::new(&mut ctx);
        assert!(!toggle.handle_pointer(PointerEvent::Pressed { x: 900.0, y: 500.0 }, &mut ctx));
        assert!(!toggle.is_muted(&ctx));
    }

    #[test]
    fn hover_dims_icon() {
        let mut ctx = context(StaticAssetSource::new());
        let mut toggle = SoundToggle::new(&mut ctx);

        toggle.handle_pointer(PointerEvent::Moved { x: 30.0, y: 1030.0 }, &mut ctx);
        assert_eq!(ctx.display.cursor(), "pointer");
        ctx.animator.update(Duration::from_millis(300), &mut ctx.display);
        assert_relative_eq!(ctx.display.node(toggle.container()).unwrap().alpha, 0.7);

        toggle.handle_pointer(PointerEvent::Moved { x: 500.0, y: 500.0 }, &mut ctx);
        ctx.animator.update(Duration::from_millis(300), &mut ctx.display);
        assert_relative_eq!(ctx.display.node(toggle.container()).unwrap().alpha, 1.0);
    }

    #[test]
    fn stays_in_front_of_scenes() {
        let mut ctx = context(StaticAssetSource::new());
        let toggle = SoundToggle::new(&mut ctx);
        let scene = ctx.display.create_container();
        ctx.display.attach_to_root(scene);

        toggle.bring_to_front(&mut ctx);
        assert_eq!(ctx.display.root_children().last(), Some(&toggle.container()));
    }
}
