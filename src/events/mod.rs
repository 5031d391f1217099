pub mod keyboard;

pub use keyboard::{KeyCode, KeyState, VirtualKeyEvent};
