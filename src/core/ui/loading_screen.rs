//=========================================================================
// Loading Screen
//=========================================================================
//
// Full-screen backdrop shown while assets preload. Reports progress as a
// percentage and, on a fatal startup failure, the error instead.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::animation::{Tween, TweenId, TweenProperty};
use crate::core::display::{DisplayTree, NodeId, NodeKind, TextStyle};
use crate::core::globals::GameContext;

//=== Constants ===========================================================

const BACKDROP_COLOR: u32 = 0x000000;
const PROGRESS_COLOR: u32 = 0xF5F0E6;
const PROGRESS_FONT_SIZE: f32 = 24.0;

pub const ERROR_HEADLINE: &str = "Error loading assets";
pub const ERROR_COLOR: u32 = 0xFF6B6B;
const ERROR_DETAIL_FONT_SIZE: f32 = 14.0;
const ERROR_DETAIL_ALPHA: f32 = 0.7;
const ERROR_DETAIL_GAP: f32 = 34.0;

const HIDE_DURATION: f32 = 0.3;

//=== LoadingScreen =======================================================

pub struct LoadingScreen {
    container: NodeId,
    backdrop: NodeId,
    message: NodeId,
    detail: Option<NodeId>,
    hide_tween: Option<TweenId>,
    percent: u32,
    failed: bool,
}

impl LoadingScreen {
    /// Creates the screen on the display root at 0%.
    pub fn new(ctx: &mut GameContext) -> Self {
        let viewport = ctx.viewport();
        let container = ctx.display.create_container();
        let backdrop = ctx.display.create_fill(viewport.width, viewport.height, BACKDROP_COLOR);
        let message = ctx.display.create_text(
            progress_text(0),
            TextStyle {
                font_size: PROGRESS_FONT_SIZE,
                fill: PROGRESS_COLOR,
                ..TextStyle::default()
            },
        );
        if let Some(node) = ctx.display.node_mut(message) {
            node.set_anchor(0.5);
        }
        ctx.display.add_child(container, backdrop);
        ctx.display.add_child(container, message);
        ctx.display.attach_to_root(container);

        let mut screen = Self {
            container,
            backdrop,
            message,
            detail: None,
            hide_tween: None,
            percent: 0,
            failed: false,
        };
        screen.handle_resize(ctx);
        screen
    }

    /// Updates the percentage. An empty preload counts as complete.
    ///
    /// Takes the tree alone so it can run inside a preload callback.
    pub fn set_progress(&mut self, done: usize, total: usize, display: &mut DisplayTree) {
        if self.failed {
            return;
        }
        self.percent = if total == 0 {
            100
        } else {
            (done.min(total) * 100 / total) as u32
        };
        if let Some(node) = display.node_mut(self.message) {
            node.set_text(&progress_text(self.percent));
        }
    }

    /// Replaces the progress line with the error headline and `detail`.
    pub fn show_error(&mut self, detail: &str, ctx: &mut GameContext) {
        self.failed = true;
        if let Some(node) = ctx.display.node_mut(self.message) {
            node.set_text(ERROR_HEADLINE);
            if let Some(style) = node.text_style_mut() {
                style.fill = ERROR_COLOR;
            }
        }

        let detail_node = match self.detail {
            Some(existing) => existing,
            None => {
                let id = ctx.display.create_text(
                    "",
                    TextStyle {
                        font_size: ERROR_DETAIL_FONT_SIZE,
                        fill: PROGRESS_COLOR,
                        ..TextStyle::default()
                    },
                );
                ctx.display.add_child(self.container, id);
                self.detail = Some(id);
                id
            }
        };
        if let Some(node) = ctx.display.node_mut(detail_node) {
            node.set_text(detail);
            node.set_anchor(0.5);
            node.alpha = ERROR_DETAIL_ALPHA;
        }

        // Keep the error readable even if a hide had started
        if let Some(node) = ctx.display.node_mut(self.container) {
            node.visible = true;
            node.alpha = 1.0;
        }
        if let Some(tween) = self.hide_tween.take() {
            ctx.animator.cancel(tween);
        }
        ctx.display.attach_to_root(self.container);
        self.handle_resize(ctx);
    }

    /// Fades the screen out. A failed screen stays up.
    pub fn hide(&mut self, ctx: &mut GameContext) {
        if self.failed || self.hide_tween.is_some() {
            return;
        }
        self.hide_tween = Some(
            ctx.animator
                .animate(Tween::to(self.container, TweenProperty::Alpha, 0.0, HIDE_DURATION)),
        );
    }

    /// Detaches the screen once its fade has finished.
    pub fn update(&mut self, ctx: &mut GameContext) {
        let Some(tween) = self.hide_tween else {
            return;
        };
        if !ctx.animator.is_running(tween) && ctx.display.is_on_root(self.container) {
            ctx.display.detach_from_root(self.container);
        }
    }

    pub fn handle_resize(&mut self, ctx: &mut GameContext) {
        let viewport = ctx.viewport();
        let (cx, cy) = viewport.center();

        if let Some(node) = ctx.display.node_mut(self.backdrop) {
            if let NodeKind::Fill { width, height, .. } = &mut node.kind {
                *width = viewport.width;
                *height = viewport.height;
            }
        }
        if let Some(node) = ctx.display.node_mut(self.message) {
            node.x = cx;
            node.y = cy;
        }
        if let Some(detail) = self.detail {
            if let Some(node) = ctx.display.node_mut(detail) {
                node.x = cx;
                node.y = cy + ERROR_DETAIL_GAP;
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn percent(&self) -> u32 {
        self.percent
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn is_shown(&self, ctx: &GameContext) -> bool {
        ctx.display.is_on_root(self.container)
    }

    pub fn message(&self, ctx: &GameContext) -> Option<String> {
        ctx.display.node(self.message).and_then(|n| n.text()).map(str::to_string)
    }

    pub fn container(&self) -> NodeId {
        self.container
    }
}

fn progress_text(percent: u32) -> String {
    format!("Loading… {percent}%")
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
    use crate::core::layout::Viewport;
    use approx::assert_relative_eq;

    #[test]
    fn reports_percentage() {
        let mut ctx = context(StaticAssetSource::new());
        let mut screen = LoadingScreen::new(&mut ctx);
        assert_eq!(screen.message(&ctx).as_deref(), Some("Loading… 0%"));

        screen.set_progress(1, 3, &mut ctx.display);
        assert_eq!(screen.percent(), 33);
        screen.set_progress(3, 3, &mut ctx.display);
        assert_eq!(screen.message(&ctx).as_deref(), Some("Loading… 100%"));
    }

    #[test]
    fn empty_preload_is_complete() {
        let mut ctx = context(StaticAssetSource::new());
        let mut screen = LoadingScreen::new(&mut ctx);
        screen.set_progress(0, 0, &mut ctx.display);
        assert_eq!(screen.percent(), 100);
    }

    #[test]
    fn error_replaces_progress() {
        let mut ctx = context(StaticAssetSource::new());
        let mut screen = LoadingScreen::new(&mut ctx);
        screen.show_error("catalog parse error at line 3", &mut ctx);

        assert!(screen.has_failed());
        let message = ctx.display.node(screen.message).unwrap();
        assert_eq!(message.text(), Some(ERROR_HEADLINE));
        match &message.kind {
            NodeKind::Text { style, .. } => assert_eq!(style.fill, ERROR_COLOR),
            other => panic!("expected text node, got {other:?}"),
        }
        let detail = ctx.display.node(screen.detail.unwrap()).unwrap();
        assert_eq!(detail.text(), Some("catalog parse error at line 3"));

        // Progress no longer overwrites the error
        screen.set_progress(1, 1, &mut ctx.display);
        assert_eq!(screen.message(&ctx).as_deref(), Some(ERROR_HEADLINE));
    }

    #[test]
    fn hide_fades_then_detaches() {
        let mut ctx = context(StaticAssetSource::new());
        let mut screen = LoadingScreen::new(&mut ctx);
        screen.hide(&mut ctx);
        screen.update(&mut ctx);
        assert!(screen.is_shown(&ctx));

        ctx.animator.update(Duration::from_millis(400), &mut ctx.display);
        screen.update(&mut ctx);
        assert!(!screen.is_shown(&ctx));
    }

    #[test]
    fn failed_screen_stays_up() {
        let mut ctx = context(StaticAssetSource::new());
        let mut screen = LoadingScreen::new(&mut ctx);
        screen.show_error("boom", &mut ctx);
        screen.hide(&mut ctx);
        ctx.animator.update(Duration::from_millis(400), &mut ctx.display);
        screen.update(&mut ctx);
        assert!(screen.is_shown(&ctx));
    }

    #[test]
    fn resize_recentres() {
        let mut ctx = context(StaticAssetSource::new());
        let mut screen = LoadingScreen::new(&mut ctx);
        ctx.set_viewport(Viewport::new(800.0, 600.0));
        screen.handle_resize(&mut ctx);

        let message = ctx.display.node(screen.message).unwrap();
        assert_relative_eq!(message.x, 400.0);
        assert_relative_eq!(message.y, 300.0);
        assert_eq!(ctx.display.node(screen.backdrop).unwrap().intrinsic_size(), (800.0, 600.0));
    }
}
