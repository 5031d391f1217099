use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::services::keycode_map::KeycodeMap;
use crate::vision::{CaptureRegion, Direction, SignalMethod, Threshold};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub capture: CaptureConfig,
    pub detection: DetectionConfig,
    pub keys: KeysConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// Индекс монитора в списке xcap; по умолчанию основной
    #[serde(default)]
    pub monitor: Option<usize>,
    pub region: CaptureRegion,
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub debug_dir: Option<PathBuf>,
    pub debug_every: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectionConfig {
    pub method: SignalMethod,
    #[serde(default)]
    pub threshold: Option<u64>,
    #[serde(default)]
    pub direction: Option<Direction>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeysConfig {
    pub jump: String,
    /// Пустая строка отключает нажатие "вниз" после прыжка
    pub duck: String,
    pub reload: String,
    pub begin: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimingConfig {
    pub countdown_secs: u64,
    pub reload_delay_ms: u64,
    pub jump_hold_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
            capture: CaptureConfig {
                monitor: None,
                region: CaptureRegion::new(395, 220, 70, 30),
                poll_interval_ms: 0,
                debug_dir: None,
                debug_every: 30,
            },
            detection: DetectionConfig {
                method: SignalMethod::PixelSum,
                threshold: None,
                direction: None,
            },
            keys: KeysConfig {
                jump: "space".to_string(),
                duck: "down".to_string(),
                reload: "f5".to_string(),
                begin: "space".to_string(),
            },
            timing: TimingConfig {
                countdown_secs: 3,
                reload_delay_ms: 2000,
                jump_hold_ms: 100,
            },
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("DINO_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    /// Уровень из командной строки перекрывает файл и окружение
    pub fn override_log_level(&mut self, level: &str) -> Result<()> {
        self.logging.level = level.to_string();
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация области захвата
        let region = &self.capture.region;
        if region.is_empty() {
            anyhow::bail!("Область захвата {} имеет нулевой размер", region);
        }

        if self.capture.debug_every == 0 {
            anyhow::bail!("debug_every должно быть больше 0");
        }

        // Валидация клавиш
        for (role, key) in [
            ("jump", &self.keys.jump),
            ("reload", &self.keys.reload),
            ("begin", &self.keys.begin),
        ] {
            KeycodeMap::get_keycode(key)
                .map_err(|e| anyhow::anyhow!("Клавиша '{}': {}", role, e))?;
        }

        if !self.keys.duck.is_empty() {
            KeycodeMap::get_keycode(&self.keys.duck)
                .map_err(|e| anyhow::anyhow!("Клавиша 'duck': {}", e))?;
        }

        Ok(())
    }

    pub fn threshold(&self) -> Threshold {
        Threshold::resolve(
            self.detection.method,
            &self.capture.region,
            self.detection.threshold,
            self.detection.direction,
        )
    }
}
