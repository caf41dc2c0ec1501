//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the engine's logic thread.
//
// Architecture:
// ```text
//  Main Thread:                     Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  Winit Event Loop        │    │  Core Systems    │
//  │   ↓                      │    │                  │
//  │  InputProcessor          │    │  InputSystem     │
//  │   ├─ Converts Winit      │    │  ↓               │
//  │   └─ Tracks cursor       │    │  Overlays/Scenes │
//  │   ↓                      │    │                  │
//  │  InputBuffer             │    └──────────────────┘
//  │   ├─ discrete: Vec<>     │             ↑
//  │   └─ continuous: Set<>   │             │
//  │   ↓                      │             │
//  │  RedrawRequested (flush) │             │
//  │   ↓                      │             │
//  │  Bounded channel ────────┼─────────────┘
//  └──────────────────────────┘    PlatformEvent
// ```
//
// Frame Boundary: RedrawRequested
//   → All buffered input sent atomically
//   → Core processes at fixed TPS (independent of refresh rate)
//   → Empty buffers NOT sent
//
// Resizes are forwarded immediately in logical pixels. If the logic
// thread is gone, events are dropped with a warning so the window can
// still be closed.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::{Sender, TrySendError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::config::WindowConfig;
use crate::core::input::InputEvent;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Platform ============================================================

/// Window manager and input event aggregator.
///
/// Runs on the main thread (Winit requirement on macOS/iOS) and sends
/// batched events to the logic thread.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(sender, window)`
/// 2. **Execution**: `platform.run()` blocks in the Winit event loop
/// 3. **Shutdown**: User closes window → sends `WindowClosed` → exits
///
/// This type is NOT Send/Sync; it must remain on the main thread.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    window_config: WindowConfig,

    /// Buffers discrete/continuous input until frame boundary.
    buffer: InputBuffer,

    /// Channel to the logic thread.
    event_sender: Sender<PlatformEvent>,

    input_processor: InputProcessor,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens lazily in `resumed()`.
    pub fn new(event_sender: Sender<PlatformEvent>, window_config: WindowConfig) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            window_config,
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// exits with an error.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Flushes buffered input events to the logic thread.
    fn flush_input_buffer(&mut self) {
        if let Some((discrete, continuous)) = self.buffer.drain() {
            let discrete_count = discrete.len();
            let continuous_count = continuous.len();

            trace!(
                target: "platform::input",
                "Flushing {} discrete + {} continuous events",
                discrete_count,
                continuous_count
            );

            self.send(PlatformEvent::Inputs { discrete, continuous });
        }
    }

    fn send_resize(&self, size: PhysicalSize<u32>, scale_factor: f64) {
        let logical: LogicalSize<f32> = size.to_logical(scale_factor);
        debug!(target: "platform", "Window resized to {}x{} (logical)", logical.width, logical.height);
        self.send(PlatformEvent::Resized {
            width: logical.width,
            height: logical.height,
        });
    }

    /// Falls back to a blocking send when the channel is full. A
    /// disconnected channel drops the event.
    fn send(&self, event: PlatformEvent) {
        match self.event_sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                if self.event_sender.send(event).is_err() {
                    warn!(target: "platform", "Channel disconnected, dropping event");
                }
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!(target: "platform", "Channel disconnected, dropping event");
            }
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.window_config.title.clone())
            .with_inner_size(LogicalSize::new(self.window_config.width, self.window_config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                let scale_factor = window.scale_factor();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    scale_factor
                );
                self.input_processor.set_scale_factor(scale_factor);
                self.send_resize(size, scale_factor);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                let scale_factor = self.window.as_ref().map_or(1.0, Window::scale_factor);
                self.send_resize(size, scale_factor);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                trace!(target: "platform", "Scale factor changed: {}", scale_factor);
                self.input_processor.set_scale_factor(scale_factor);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.input_processor.process_cursor_moved(position.x, position.y);
                self.buffer.push_continuous(event);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(button, state);
                self.buffer.push_discrete(event);
            }

            WindowEvent::Touch(touch) => {
                match self
                    .input_processor
                    .process_touch(touch.phase, touch.location.x, touch.location.y)
                {
                    Some(event) => self.buffer.push_discrete(event),
                    None => {
                        let (x, y) = self.input_processor.cursor();
                        self.buffer.push_continuous(InputEvent::PointerMoved { x, y });
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::MouseButton;
    use crossbeam_channel::{bounded, unbounded};

    fn platform(sender: Sender<PlatformEvent>) -> Platform {
        Platform::new(sender, WindowConfig::default())
    }

    #[test]
    fn platform_creation() {
        let (tx, _rx) = unbounded();
        let platform = platform(tx);
        assert!(platform.window().is_none(), "Window should be created lazily");
    }

    #[test]
    fn flush_empty_buffer_is_noop() {
        let (tx, rx) = unbounded();
        let mut platform = platform(tx);

        platform.flush_input_buffer();

        assert!(rx.try_recv().is_err(), "No events should be sent for empty buffer");
    }

    #[test]
    fn flush_sends_buffered_events() {
        let (tx, rx) = unbounded();
        let mut platform = platform(tx);

        platform.buffer.push_discrete(InputEvent::PointerDown {
            button: MouseButton::Left,
            x: 1.0,
            y: 2.0,
        });
        platform.buffer.push_continuous(InputEvent::PointerMoved { x: 1.0, y: 2.0 });

        platform.flush_input_buffer();

        match rx.try_recv() {
            Ok(PlatformEvent::Inputs { discrete, continuous }) => {
                assert_eq!(discrete.len(), 1);
                assert_eq!(continuous.len(), 1);
            }
            other => panic!("Expected Inputs event, got {:?}", other),
        }
    }

    #[test]
    fn flush_handles_disconnected_channel() {
        let (tx, rx) = unbounded();
        let mut platform = platform(tx);
        platform.buffer.push_discrete(InputEvent::TouchStart { x: 0.0, y: 0.0 });

        drop(rx);

        // Should not panic, just log warning
        platform.flush_input_buffer();
    }

    #[test]
    fn resize_is_sent_in_logical_pixels() {
        let (tx, rx) = bounded(4);
        let platform = platform(tx);

        platform.send_resize(PhysicalSize::new(2560, 1440), 2.0);

        match rx.try_recv() {
            Ok(PlatformEvent::Resized { width, height }) => assert_eq!((width, height), (1280.0, 720.0)),
            other => panic!("Expected Resized event, got {:?}", other),
        }
    }

    #[test]
    fn platform_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
        assert_eq!(
            PlatformError::EventLoopCreation("no display".into()).to_string(),
            "event loop creation failed: no display"
        );
    }
}
