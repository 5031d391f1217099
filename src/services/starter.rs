use crate::config::{KeysConfig, TimingConfig};
use crate::error::Result;
use crate::events::KeyCode;
use crate::services::VirtualDevice;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::info;

/// Запуск игры: обратный отсчёт, перезагрузка страницы, пауза, старт
pub struct Starter {
    keyboard: Arc<VirtualDevice>,
    reload_key: KeyCode,
    begin_key: KeyCode,
    countdown_secs: u64,
    tick: Duration,
    reload_delay: Duration,
}

impl Starter {
    pub fn new(
        keyboard: Arc<VirtualDevice>,
        keys: &KeysConfig,
        timing: &TimingConfig,
    ) -> Result<Self> {
        Ok(Self {
            keyboard,
            reload_key: KeyCode::from_name(&keys.reload)?,
            begin_key: KeyCode::from_name(&keys.begin)?,
            countdown_secs: timing.countdown_secs,
            tick: Duration::from_secs(1),
            reload_delay: Duration::from_millis(timing.reload_delay_ms),
        })
    }

    pub async fn run(&self) -> Result<()> {
        info!("Переключитесь на окно браузера с игрой");

        for remaining in (1..=self.countdown_secs).rev() {
            info!("Старт через {}...", remaining);
            sleep(self.tick).await;
        }

        info!("Перезагрузка страницы ({})", self.reload_key);
        self.keyboard.tap(self.reload_key)?;

        sleep(self.reload_delay).await;

        info!("Старт игры ({})", self.begin_key);
        self.keyboard.tap(self.begin_key)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::events::KeyState;

    #[tokio::test]
    async fn test_taps_reload_then_begin() {
        let keyboard = Arc::new(VirtualDevice::new("test", true).unwrap());
        let mut config = Config::default();
        config.timing.countdown_secs = 0;
        config.timing.reload_delay_ms = 0;

        let starter = Starter::new(keyboard.clone(), &config.keys, &config.timing).unwrap();
        starter.run().await.unwrap();

        let presses: Vec<KeyCode> = keyboard
            .journal()
            .iter()
            .filter(|e| e.state == KeyState::Pressed)
            .map(|e| e.key_code)
            .collect();

        assert_eq!(presses, vec![KeyCode::new(63), KeyCode::new(57)]);
        assert!(keyboard.held_keys().is_empty());
    }

    #[test]
    fn test_rejects_unknown_reload_key() {
        let keyboard = Arc::new(VirtualDevice::new("test", true).unwrap());
        let mut config = Config::default();
        config.keys.reload = "refresh".to_string();

        assert!(Starter::new(keyboard, &config.keys, &config.timing).is_err());
    }
}
