use crate::config::Config;
use crate::error::Result;
use crate::services::{Jumper, ScreenCapture};
use crate::utils::FrameDumper;
use crate::vision::{signal, SignalMethod, Threshold};
use std::fmt;
use tokio::time::{sleep, Duration};
use tracing::info;

/// Результат одной итерации цикла
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub index: u64,
    pub signal: u64,
    pub triggered: bool,
}

/// Счётчики для итогового отчёта. На решения не влияют.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchStats {
    pub frames: u64,
    pub jumps: u64,
    pub last_signal: Option<u64>,
    pub min_signal: Option<u64>,
    pub max_signal: Option<u64>,
}

impl WatchStats {
    fn record(&mut self, observation: &Observation) {
        self.frames += 1;
        if observation.triggered {
            self.jumps += 1;
        }
        self.last_signal = Some(observation.signal);
        let signal = observation.signal;
        self.min_signal = Some(self.min_signal.map_or(signal, |m| m.min(signal)));
        self.max_signal = Some(self.max_signal.map_or(signal, |m| m.max(signal)));
    }
}

impl fmt::Display for WatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "кадров: {}, прыжков: {}", self.frames, self.jumps)?;
        if let (Some(min), Some(max), Some(last)) =
            (self.min_signal, self.max_signal, self.last_signal)
        {
            write!(f, ", сигнал: {}..={} (последний {})", min, max, last)?;
        }
        Ok(())
    }
}

/// Цикл "захват -> сигнал -> порог -> прыжок".
///
/// Без антидребезга: каждый кадр за порогом вызывает прыжок. Любая ошибка
/// захвата или обработки прерывает цикл.
pub struct ObstacleWatcher {
    capture: Box<dyn ScreenCapture>,
    jumper: Jumper,
    method: SignalMethod,
    threshold: Threshold,
    poll_interval: Duration,
    dumper: Option<FrameDumper>,
    stats: WatchStats,
}

impl ObstacleWatcher {
    pub fn new(config: &Config, capture: Box<dyn ScreenCapture>, jumper: Jumper) -> Result<Self> {
        let method = config.detection.method;
        let threshold = Threshold::resolve(
            method,
            capture.region(),
            config.detection.threshold,
            config.detection.direction,
        );

        let dumper = match &config.capture.debug_dir {
            Some(dir) => Some(FrameDumper::new(dir, config.capture.debug_every, method)?),
            None => None,
        };

        info!(
            "ObstacleWatcher: захват {} ({}), метод {}, базовая линия {}, порог {}",
            capture.region(),
            capture.backend_name(),
            method,
            method.baseline(capture.region()),
            threshold
        );

        Ok(Self {
            capture,
            jumper,
            method,
            threshold,
            poll_interval: Duration::from_millis(config.capture.poll_interval_ms),
            dumper,
            stats: WatchStats::default(),
        })
    }

    /// Одна итерация: захватить кадр, посчитать сигнал, при необходимости прыгнуть
    pub async fn step(&mut self) -> Result<Observation> {
        let frame = self.capture.grab().await?;
        let gray = signal::to_grayscale(&frame);
        let signal = self.method.measure(&gray);
        let triggered = self.threshold.crossed(signal);

        let observation = Observation {
            index: self.stats.frames,
            signal,
            triggered,
        };

        crate::trace_if_enabled!(
            "Кадр #{}: сигнал {} (порог {})",
            observation.index,
            signal,
            self.threshold
        );

        if let Some(dumper) = &self.dumper {
            dumper.maybe_dump(observation.index, &gray)?;
        }

        if triggered {
            crate::debug_if_enabled!(
                "Препятствие в кадре #{}: сигнал {} {}",
                observation.index,
                signal,
                self.threshold
            );
            self.jumper.jump().await?;
        }

        self.stats.record(&observation);
        Ok(observation)
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("ObstacleWatcher запущен");

        loop {
            self.step().await?;

            if !self.poll_interval.is_zero() {
                sleep(self.poll_interval).await;
            }
        }
    }

    pub fn stats(&self) -> &WatchStats {
        &self.stats
    }

    #[cfg(test)]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DinoError;
    use crate::services::screen_capture::dry_capture::DryRunCapture;
    use crate::services::VirtualDevice;
    use crate::vision::{CaptureRegion, Direction};
    use image::{Rgba, RgbaImage};
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Отдаёт заранее подготовленные кадры, затем ошибку
    struct ScriptedCapture {
        region: CaptureRegion,
        frames: VecDeque<RgbaImage>,
    }

    #[async_trait::async_trait(?Send)]
    impl ScreenCapture for ScriptedCapture {
        async fn grab(&mut self) -> Result<RgbaImage> {
            self.frames
                .pop_front()
                .ok_or_else(|| DinoError::ScreenUnavailable("кадры закончились".to_string()))
        }

        fn region(&self) -> &CaptureRegion {
            &self.region
        }

        fn backend_name(&self) -> &'static str {
            "scripted"
        }
    }

    fn white() -> RgbaImage {
        RgbaImage::from_pixel(8, 4, Rgba([255, 255, 255, 255]))
    }

    fn with_obstacle() -> RgbaImage {
        let mut frame = white();
        frame.put_pixel(6, 3, Rgba([0, 0, 0, 255]));
        frame
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.capture.region = CaptureRegion::new(0, 0, 8, 4);
        config.timing.jump_hold_ms = 0;
        config
    }

    fn watcher(
        config: &Config,
        frames: Vec<RgbaImage>,
    ) -> (ObstacleWatcher, Arc<VirtualDevice>) {
        let keyboard = Arc::new(VirtualDevice::new("test", true).unwrap());
        let jumper = Jumper::new(keyboard.clone(), &config.keys, &config.timing).unwrap();
        let capture = ScriptedCapture {
            region: config.capture.region,
            frames: frames.into(),
        };
        let watcher = ObstacleWatcher::new(config, Box::new(capture), jumper).unwrap();
        (watcher, keyboard)
    }

    #[tokio::test]
    async fn test_pixel_sum_jumps_only_on_darker_frames() {
        let config = test_config();
        let (mut watcher, keyboard) = watcher(&config, vec![white(), with_obstacle(), white()]);

        let first = watcher.step().await.unwrap();
        let second = watcher.step().await.unwrap();
        let third = watcher.step().await.unwrap();

        assert_eq!(first.signal, 8 * 4 * 255);
        assert!(!first.triggered);
        assert!(second.triggered);
        assert!(!third.triggered);

        assert_eq!(watcher.stats().frames, 3);
        assert_eq!(watcher.stats().jumps, 1);
        // прыжок + касание "вниз"
        assert_eq!(keyboard.journal().len(), 4);
    }

    #[tokio::test]
    async fn test_laplacian_jumps_on_edges() {
        let mut config = test_config();
        config.detection.method = SignalMethod::Laplacian;
        let (mut watcher, _keyboard) = watcher(&config, vec![white(), with_obstacle()]);

        assert_eq!(watcher.threshold(), Threshold::new(0, Direction::Above));

        let clean = watcher.step().await.unwrap();
        assert_eq!(clean.signal, 0);
        assert!(!clean.triggered);

        let edged = watcher.step().await.unwrap();
        assert!(edged.signal > 0);
        assert!(edged.triggered);
    }

    #[tokio::test]
    async fn test_consecutive_frames_each_trigger() {
        let config = test_config();
        let (mut watcher, _keyboard) =
            watcher(&config, vec![with_obstacle(), with_obstacle(), with_obstacle()]);

        for _ in 0..3 {
            assert!(watcher.step().await.unwrap().triggered);
        }
        assert_eq!(watcher.stats().jumps, 3);
    }

    #[tokio::test]
    async fn test_capture_failure_stops_the_loop() {
        let config = test_config();
        let (mut watcher, _keyboard) = watcher(&config, vec![white(), white()]);

        let result = watcher.run().await;

        assert!(matches!(result, Err(DinoError::ScreenUnavailable(_))));
        assert_eq!(watcher.stats().frames, 2);
        assert_eq!(watcher.stats().jumps, 0);
    }

    #[tokio::test]
    async fn test_explicit_threshold_overrides_baseline() {
        let mut config = test_config();
        config.detection.threshold = Some(8 * 4 * 255 - 300);
        let (mut watcher, _keyboard) = watcher(&config, vec![with_obstacle()]);

        // один чёрный пиксель уменьшает сумму только на 255
        assert!(!watcher.step().await.unwrap().triggered);
    }

    #[tokio::test]
    async fn test_dry_run_capture_drives_jumps() {
        let config = test_config();
        let keyboard = Arc::new(VirtualDevice::new("test", true).unwrap());
        let jumper = Jumper::new(keyboard.clone(), &config.keys, &config.timing).unwrap();
        let capture =
            DryRunCapture::new(config.capture.region, Duration::ZERO).with_obstacle_every(4);
        let mut watcher = ObstacleWatcher::new(&config, Box::new(capture), jumper).unwrap();

        for _ in 0..8 {
            watcher.step().await.unwrap();
        }

        assert_eq!(watcher.stats().jumps, 2);
        assert_eq!(watcher.stats().min_signal.map(|s| s < 8 * 4 * 255), Some(true));
        assert_eq!(watcher.stats().max_signal, Some(8 * 4 * 255));
    }

    #[test]
    fn test_stats_display() {
        let mut stats = WatchStats::default();
        stats.record(&Observation {
            index: 0,
            signal: 10,
            triggered: false,
        });
        stats.record(&Observation {
            index: 1,
            signal: 3,
            triggered: true,
        });

        assert_eq!(
            stats.to_string(),
            "кадров: 2, прыжков: 1, сигнал: 3..=10 (последний 3)"
        );
    }
}
