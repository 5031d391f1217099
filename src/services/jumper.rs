use crate::config::{KeysConfig, TimingConfig};
use crate::error::Result;
use crate::events::KeyCode;
use crate::services::VirtualDevice;
use std::sync::Arc;
use tokio::time::{sleep, Duration};

/// Действие "прыжок": нажать, подержать, отпустить, затем коснуться "вниз"
pub struct Jumper {
    keyboard: Arc<VirtualDevice>,
    jump_key: KeyCode,
    duck_key: Option<KeyCode>,
    hold: Duration,
    jumps: u64,
}

impl Jumper {
    pub fn new(
        keyboard: Arc<VirtualDevice>,
        keys: &KeysConfig,
        timing: &TimingConfig,
    ) -> Result<Self> {
        let duck_key = if keys.duck.is_empty() {
            None
        } else {
            Some(KeyCode::from_name(&keys.duck)?)
        };

        Ok(Self {
            keyboard,
            jump_key: KeyCode::from_name(&keys.jump)?,
            duck_key,
            hold: Duration::from_millis(timing.jump_hold_ms),
            jumps: 0,
        })
    }

    pub async fn jump(&mut self) -> Result<()> {
        self.jumps += 1;
        crate::debug_if_enabled!("Прыжок #{} ({})", self.jumps, self.jump_key);

        self.keyboard.press(self.jump_key)?;
        if !self.hold.is_zero() {
            sleep(self.hold).await;
        }
        self.keyboard.release(self.jump_key)?;

        // Возвращаем персонажа в обычное положение
        if let Some(duck_key) = self.duck_key {
            self.keyboard.tap(duck_key)?;
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn jumps(&self) -> u64 {
        self.jumps
    }
}
