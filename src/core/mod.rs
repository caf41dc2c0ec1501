//=========================================================================
// Core Systems Orchestrator
//
// Central coordinator for everything running on the logic (non-platform)
// thread.
//
// Responsibilities:
// - Own the GameContext (shared data) and GameSystems (logic)
// - Run the startup sequence (preload → music → intro scene)
// - Receive platform events via the EventCollector
// - Maintain deterministic pacing using a fixed tick rate (TPS)
//
// Notes:
// The orchestrator runs independently from the platform layer.
// Communication with the platform occurs only through the bounded
// crossbeam channel.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod animation;
pub mod assets;
pub mod audio;
pub mod catalog;
pub mod config;
pub mod display;
pub mod game_state;
pub mod globals;
pub mod input;
pub mod interaction;
pub mod layout;
pub mod message_bus;
pub(crate) mod platform_bridge;
pub mod scene;
pub mod ui;

//=== Standard Library Imports ============================================

use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================

use crossbeam_channel::Receiver;
use log::{debug, error, info};

//=== Internal Modules ====================================================

use globals::{GameContext, GameSystems};
use platform_bridge::{EventCollector, PlatformEvent, TickControl};
use scene::SceneError;

//=== CoreSystemsOrchestrator =============================================
//
// Owns the game state and systems and schedules their updates.
//
pub(crate) struct CoreSystemsOrchestrator {
    context: GameContext,
    systems: GameSystems,
    run_startup: bool,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(context: GameContext, systems: GameSystems) -> Self {
        Self {
            context,
            systems,
            run_startup: true,
        }
    }

    /// Orchestrator for a tour that failed before startup. It skips the
    /// startup sequence and keeps whatever error the systems show on
    /// screen until the window closes.
    pub(crate) fn halted(context: GameContext, systems: GameSystems) -> Self {
        Self {
            context,
            systems,
            run_startup: false,
        }
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Spawns the logic thread. It first runs the startup sequence, then
    // ticks at a fixed rate until the window closes.
    //
    // Each tick:
    //  1. Collects platform events (input batches, latest resize)
    //  2. Updates all game systems with the tick's dt
    //  3. Sleeps to maintain fixed pacing
    //
    // A failed startup keeps the loop running so the error stays on
    // screen; the error is returned once the window closes.
    //
    pub(crate) fn spawn_core_thread(
        mut self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
    ) -> thread::JoinHandle<Result<(), SceneError>> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        thread::spawn(move || {
            let startup = if self.run_startup { self.start() } else { Ok(()) };
            let mut collector = EventCollector::new(receiver);
            let mut last_tick = Instant::now();

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                if collector.collect_frame() == TickControl::Exit {
                    info!("Core thread exiting.");
                    break;
                }

                //--- Step 2: Update systems --------------------------------
                let dt = frame_start.duration_since(last_tick);
                last_tick = frame_start;
                self.tick(&mut collector, dt);

                //--- Step 3: Maintain deterministic pacing ----------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }

            startup
        })
    }

    //--- start() ----------------------------------------------------------

    pub(crate) fn start(&mut self) -> Result<(), SceneError> {
        match self.systems.start(&mut self.context) {
            Ok(outcome) => {
                debug!("Intro load: {:?}", outcome);
                Ok(())
            }
            Err(e) => {
                error!("Startup failed: {}", e);
                Err(e)
            }
        }
    }

    //--- tick() -----------------------------------------------------------

    fn tick(&mut self, collector: &mut EventCollector, dt: Duration) {
        if let Some(viewport) = collector.take_resize() {
            self.systems.resize(viewport, &mut self.context);
        }
        self.context.frame_events = collector.take_batches();
        self.systems.update(&mut self.context, dt);
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn context(&self) -> &GameContext {
        &self.context
    }

    #[cfg(test)]
    pub(crate) fn systems(&self) -> &GameSystems {
        &self.systems
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
