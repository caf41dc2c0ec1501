//=========================================================================
// Orientation Notice
//=========================================================================
//
// Mobile-only overlay asking the player to rotate to landscape. Shown
// while the viewport is portrait; scene input is blocked meanwhile.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::display::{NodeId, NodeKind, TextStyle};
use crate::core::globals::GameContext;

//=== Constants ===========================================================

pub const MESSAGE: &str = "Please rotate your device to landscape mode";
pub const SUBTITLE: &str = "This experience is designed for horizontal viewing";

const BACKDROP_ALPHA: f32 = 0.9;
const MESSAGE_FONT_SIZE: f32 = 24.0;
const SUBTITLE_FONT_SIZE: f32 = 16.0;
const SUBTITLE_ALPHA: f32 = 0.7;
const LINE_GAP: f32 = 20.0;

//=== OrientationNotice ===================================================

struct Overlay {
    container: NodeId,
    backdrop: NodeId,
    message: NodeId,
    subtitle: NodeId,
}

pub struct OrientationNotice {
    /// `None` on desktop.
    overlay: Option<Overlay>,
    shown: bool,
}

impl OrientationNotice {
    /// Builds the overlay (detached) on mobile; a no-op notice otherwise.
    pub fn new(ctx: &mut GameContext) -> Self {
        if !ctx.is_mobile() {
            return Self { overlay: None, shown: false };
        }

        let container = ctx.display.create_container();
        let backdrop = ctx.display.create_fill(0.0, 0.0, 0x000000);
        if let Some(node) = ctx.display.node_mut(backdrop) {
            node.alpha = BACKDROP_ALPHA;
        }
        let message = ctx.display.create_text(
            MESSAGE,
            TextStyle {
                font_size: MESSAGE_FONT_SIZE,
                ..TextStyle::default()
            },
        );
        let subtitle = ctx.display.create_text(
            SUBTITLE,
            TextStyle {
                font_size: SUBTITLE_FONT_SIZE,
                ..TextStyle::default()
            },
        );
        for text in [message, subtitle] {
            if let Some(node) = ctx.display.node_mut(text) {
                node.set_anchor(0.5);
            }
        }
        if let Some(node) = ctx.display.node_mut(subtitle) {
            node.alpha = SUBTITLE_ALPHA;
        }
        for child in [backdrop, message, subtitle] {
            ctx.display.add_child(container, child);
        }

        let mut notice = Self {
            overlay: Some(Overlay {
                container,
                backdrop,
                message,
                subtitle,
            }),
            shown: false,
        };
        notice.update(ctx);
        notice
    }

    /// Shows or hides the overlay for the current viewport.
    pub fn update(&mut self, ctx: &mut GameContext) {
        let Some(overlay) = &self.overlay else {
            return;
        };
        let viewport = ctx.viewport();
        let portrait = viewport.is_portrait();

        if portrait {
            let (cx, cy) = viewport.center();
            if let Some(node) = ctx.display.node_mut(overlay.backdrop) {
                if let NodeKind::Fill { width, height, .. } = &mut node.kind {
                    *width = viewport.width;
                    *height = viewport.height;
                }
            }
            if let Some(node) = ctx.display.node_mut(overlay.message) {
                node.x = cx;
                node.y = cy - LINE_GAP;
            }
            if let Some(node) = ctx.display.node_mut(overlay.subtitle) {
                node.x = cx;
                node.y = cy + LINE_GAP;
            }
            if !self.shown {
                ctx.display.attach_to_root(overlay.container);
            }
            ctx.display.bring_to_front(overlay.container);
        } else if self.shown {
            ctx.display.detach_from_root(overlay.container);
        }

        if portrait != self.shown {
            debug!("Orientation notice {}", if portrait { "shown" } else { "hidden" });
            self.shown = portrait;
        }
    }

    /// Keeps the overlay above everything while it is shown.
    pub fn bring_to_front(&self, ctx: &mut GameContext) {
        if let (true, Some(overlay)) = (self.shown, &self.overlay) {
            ctx.display.bring_to_front(overlay.container);
        }
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn is_enabled(&self) -> bool {
        self.overlay.is_some()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
