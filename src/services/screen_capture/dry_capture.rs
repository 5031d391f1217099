use crate::error::Result;
use crate::vision::CaptureRegion;
use image::{Rgba, RgbaImage};
use tokio::time::{sleep, Duration};
use tracing::info;

use super::r#trait::ScreenCapture;

const OBSTACLE_EVERY: u64 = 20;
const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const OBSTACLE: Rgba<u8> = Rgba([83, 83, 83, 255]);

/// Эмуляция экрана: белый фон и тёмный "кактус" каждый N-й кадр
pub struct DryRunCapture {
    region: CaptureRegion,
    interval: Duration,
    obstacle_every: u64,
    frame_index: u64,
}

impl DryRunCapture {
    pub fn new(region: CaptureRegion, interval: Duration) -> Self {
        info!("Dry-run режим - ScreenCapture работает в режиме эмуляции");
        Self {
            region,
            interval,
            obstacle_every: OBSTACLE_EVERY,
            frame_index: 0,
        }
    }

    #[cfg(test)]
    pub fn with_obstacle_every(mut self, obstacle_every: u64) -> Self {
        self.obstacle_every = obstacle_every.max(1);
        self
    }

    fn synthesize(&self, with_obstacle: bool) -> RgbaImage {
        let (width, height) = (self.region.width, self.region.height);
        let mut frame = RgbaImage::from_pixel(width, height, BACKGROUND);

        if with_obstacle {
            // Препятствие занимает нижнюю половину правой трети кадра
            let left = width - (width / 3).max(1);
            let top = height / 2;
            for y in top..height {
                for x in left..width {
                    frame.put_pixel(x, y, OBSTACLE);
                }
            }
        }

        frame
    }
}

#[async_trait::async_trait(?Send)]
impl ScreenCapture for DryRunCapture {
    async fn grab(&mut self) -> Result<RgbaImage> {
        if !self.interval.is_zero() {
            sleep(self.interval).await;
        }

        self.frame_index += 1;
        let with_obstacle = self.frame_index % self.obstacle_every == 0;
        if with_obstacle {
            crate::debug_if_enabled!("Dry-run: кадр #{} с препятствием", self.frame_index);
        }

        Ok(self.synthesize(with_obstacle))
    }

    fn region(&self) -> &CaptureRegion {
        &self.region
    }

    fn backend_name(&self) -> &'static str {
        "dry-run"
    }
}
