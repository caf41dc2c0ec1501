//=========================================================================
// UI Overlays
//=========================================================================
//
// Widgets that live outside any scene and sit on the display root:
//
//   LoadingScreen      startup progress / fatal error
//   SoundToggle        background-music mute, bottom-left
//   OrientationNotice  mobile portrait warning, topmost
//
//=========================================================================

//=== Module Declarations =================================================

mod loading_screen;
mod orientation_notice;
mod sound_toggle;

//=== Public API ==========================================================

pub use loading_screen::LoadingScreen;
pub use orientation_notice::OrientationNotice;
pub use sound_toggle::SoundToggle;
