// Input handling system
//
// - `action`: game actions and default key/mouse bindings
// - `config`: remappable bindings from input sources to actions
// - `state`: per-frame pressed / just-pressed / just-released state plus the cursor
// - `manager`: turns winit events into action state
//
// Screens and entities read an `InputState`; only the manager sees winit events.

pub mod action;
pub mod config;
pub mod manager;
pub mod state;

pub use action::Action;
pub use config::InputConfig;
pub use manager::InputManager;
pub use state::InputState;
