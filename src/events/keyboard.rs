use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::services::keycode_map::KeycodeMap;

/// Состояние клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
}

impl KeyState {
    /// Значение поля value для EV_KEY
    pub fn value(&self) -> i32 {
        match self {
            KeyState::Pressed => 1,
            KeyState::Released => 0,
        }
    }
}

/// Код клавиши (evdev коды)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

impl KeyCode {
    #[cfg(test)]
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    /// Разрешить имя клавиши из конфигурации
    pub fn from_name(name: &str) -> Result<Self> {
        KeycodeMap::get_keycode(name)
            .map(Self)
            .map_err(|e| crate::dino_error!(invalid_key, "{}", e))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match KeycodeMap::get_key_name(self.0) {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "KEY_{}", self.0),
        }
    }
}

/// Событие для виртуальной клавиатуры
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualKeyEvent {
    pub key_code: KeyCode,
    pub state: KeyState,
    pub timestamp: std::time::Instant,
}

impl VirtualKeyEvent {
    pub fn new(key_code: KeyCode, state: KeyState) -> Self {
        Self {
            key_code,
            state,
            timestamp: std::time::Instant::now(),
        }
    }

    pub fn press(key_code: KeyCode) -> Self {
        Self::new(key_code, KeyState::Pressed)
    }

    pub fn release(key_code: KeyCode) -> Self {
        Self::new(key_code, KeyState::Released)
    }
}

impl fmt::Display for VirtualKeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.key_code, self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_code_from_name() {
        assert_eq!(KeyCode::from_name("space").unwrap(), KeyCode::new(57));
        assert_eq!(KeyCode::from_name("F5").unwrap(), KeyCode::new(63));
        assert!(KeyCode::from_name("nope").is_err());
    }

    #[test]
    fn test_key_code_display() {
        assert_eq!(KeyCode::new(108).to_string(), "down");
        assert_eq!(KeyCode::new(9999).to_string(), "KEY_9999");
    }

    #[test]
    fn test_virtual_event_constructors() {
        let press = VirtualKeyEvent::press(KeyCode::new(57));
        let release = VirtualKeyEvent::release(KeyCode::new(57));

        assert_eq!(press.state, KeyState::Pressed);
        assert_eq!(release.state, KeyState::Released);
        assert_eq!(press.state.value(), 1);
        assert_eq!(release.state.value(), 0);
        assert_eq!(press.to_string(), "space Pressed");
    }
}
