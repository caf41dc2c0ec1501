//=========================================================================
// Cocoon Tour: Library Root
//
// A scene-based point-and-click tour: full-screen scenes with clickable
// hotspots, ambient sound and animated transitions, described by a JSON
// scene catalog.
//
// Responsibilities:
// - Expose the engine interface (`EngineBuilder`, `Engine`)
// - Keep the windowing layer (`platform`) hidden from users
// - Expose `core` for custom scene behaviours and embedding
//
// Typical usage:
// ```no_run
// use cocoon_tour::EngineBuilder;
//
// fn main() -> Result<(), cocoon_tour::EngineError> {
//     EngineBuilder::new().build().run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the scene catalog, scene lifecycle, overlays and the
// collaborator seams (display, assets, audio, animation).
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the Winit integration and is kept private.
// `engine` wires the logic thread and the platform together.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::platform_bridge::PlatformError;
pub use engine::{Engine, EngineBuilder, EngineError};
