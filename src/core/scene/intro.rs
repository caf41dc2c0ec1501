//=========================================================================
// Intro Behaviour
//=========================================================================
//
// Opening scene: the first object is the hero, which floats in place
// while the title fades in underneath it.
//
// Layout (sf = viewport reference scale):
//   font    = clamp(base × sf, 24, max)   base/max: 48/56, mobile 32/40
//   title.x = hero.x − 20·sf
//   title.y = hero.y + hero_height/2 + 50·sf − 120·sf
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::behavior::{SceneBehavior, SceneView};
use crate::core::animation::{Easing, Repeat, Tween, TweenId, TweenProperty};
use crate::core::display::{NodeId, TextAlign, TextStyle};
use crate::core::globals::GameContext;

//=== Constants ===========================================================

pub const TITLE_TEXT: &str = "the Cocoon";
pub const TITLE_FONT: &str = "\"Dokdo\", \"Arial\", sans-serif";
pub const TITLE_COLOR: u32 = 0xF5F0E6;

const TITLE_LETTER_SPACING: f32 = 2.0;
const MIN_FONT_SIZE: f32 = 24.0;

const TITLE_SPACING: f32 = 50.0;
const TITLE_OFFSET_X: f32 = -20.0;
const TITLE_OFFSET_Y: f32 = -120.0;

const TITLE_FADE_DURATION: f32 = 1.5;
const TITLE_FADE_DELAY: f32 = 0.5;

const FLOAT_DISTANCE: f32 = -10.0;
const FLOAT_DURATION: f32 = 3.0;

//=== IntroBehavior =======================================================

#[derive(Debug, Default)]
pub struct IntroBehavior {
    hero: Option<NodeId>,
    title: Option<NodeId>,
    float: Option<TweenId>,
}

impl IntroBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<NodeId> {
        self.title
    }

    pub fn hero(&self) -> Option<NodeId> {
        self.hero
    }

    /// Title font size for a reference scale.
    pub fn font_size(scale_factor: f32, mobile: bool) -> f32 {
        let (base, max) = if mobile { (32.0, 40.0) } else { (48.0, 56.0) };
        (base * scale_factor).clamp(MIN_FONT_SIZE, max)
    }

    /// Title position for a hero centred at `(hero_x, hero_y)`.
    pub fn title_position(hero_x: f32, hero_y: f32, hero_height: f32, scale_factor: f32) -> (f32, f32) {
        let base_y = hero_y + hero_height / 2.0 + TITLE_SPACING * scale_factor;
        (
            hero_x + TITLE_OFFSET_X * scale_factor,
            base_y + TITLE_OFFSET_Y * scale_factor,
        )
    }

    fn start_float(&mut self, hero: NodeId, ctx: &mut GameContext) {
        if let Some(previous) = self.float.take() {
            ctx.animator.cancel(previous);
        }
        self.float = Some(
            ctx.animator.animate(
                Tween::by(hero, TweenProperty::Y, FLOAT_DISTANCE, FLOAT_DURATION)
                    .ease(Easing::SineInOut)
                    .yoyo(true)
                    .repeat(Repeat::Forever),
            ),
        );
    }

    fn layout_title(&self, ctx: &mut GameContext) {
        let (Some(hero), Some(title)) = (self.hero, self.title) else {
            return;
        };
        let Some((hero_x, hero_y, hero_height)) = ctx
            .display
            .node(hero)
            .map(|node| (node.x, node.y, node.scaled_size().1))
        else {
            return;
        };

        let scale_factor = ctx.viewport().reference_scale();
        let font_size = Self::font_size(scale_factor, ctx.is_mobile());
        let (x, y) = Self::title_position(hero_x, hero_y, hero_height, scale_factor);

        if let Some(node) = ctx.display.node_mut(title) {
            node.x = x;
            node.y = y;
            if let Some(style) = node.text_style_mut() {
                style.font_size = font_size;
            }
        }
    }
}

impl SceneBehavior for IntroBehavior {
    fn on_loaded(&mut self, scene: SceneView<'_>, ctx: &mut GameContext) {
        let Some(hero) = scene.objects.first().map(|object| object.node) else {
            debug!("Intro scene `{}` has no hero object", scene.id());
            return;
        };
        self.hero = Some(hero);

        let style = TextStyle {
            font_family: TITLE_FONT.to_string(),
            font_size: MIN_FONT_SIZE,
            fill: TITLE_COLOR,
            align: TextAlign::Center,
            letter_spacing: TITLE_LETTER_SPACING,
        };
        let title = ctx.display.create_text(TITLE_TEXT, style);
        if let Some(node) = ctx.display.node_mut(title) {
            node.set_anchor(0.5);
            node.alpha = 0.0;
        }
        ctx.display.add_child(scene.container, title);
        self.title = Some(title);
        self.layout_title(ctx);

        ctx.animator.animate(
            Tween::to(title, TweenProperty::Alpha, 1.0, TITLE_FADE_DURATION)
                .delay(TITLE_FADE_DELAY)
                .ease(Easing::Power2Out),
        );
        self.start_float(hero, ctx);
    }

    fn on_resize(&mut self, _scene: SceneView<'_>, ctx: &mut GameContext) {
        let Some(hero) = self.hero else {
            return;
        };
        // Hero was just re-placed; the float restarts from there.
        if let Some(float) = self.float.take() {
            ctx.animator.cancel(float);
        }
        self.layout_title(ctx);
        self.start_float(hero, ctx);
    }

    fn on_destroy(&mut self, _scene: SceneView<'_>, ctx: &mut GameContext) {
        if let Some(float) = self.float.take() {
            ctx.animator.cancel(float);
        }
        self.hero = None;
        self.title = None;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn font_size_is_clamped() {
        assert_relative_eq!(IntroBehavior::font_size(1.0, false), 48.0);
        assert_relative_eq!(IntroBehavior::font_size(2.0, false), 56.0);
        assert_relative_eq!(IntroBehavior::font_size(0.25, false), 24.0);
        assert_relative_eq!(IntroBehavior::font_size(1.0, true), 32.0);
        assert_relative_eq!(IntroBehavior::font_size(1.5, true), 40.0);
    }

    #[test]
    fn title_sits_under_hero() {
        // Hero 200px tall centred at (960, 540) on the reference frame
        let (x, y) = IntroBehavior::title_position(960.0, 540.0, 200.0, 1.0);
        assert_relative_eq!(x, 940.0);
        assert_relative_eq!(y, 540.0 + 100.0 + 50.0 - 120.0);
    }

    #[test]
    fn title_offsets_scale_with_viewport() {
        let (x, y) = IntroBehavior::title_position(480.0, 270.0, 100.0, 0.5);
        assert_relative_eq!(x, 470.0);
        assert_relative_eq!(y, 270.0 + 50.0 + 25.0 - 60.0);
    }
}
