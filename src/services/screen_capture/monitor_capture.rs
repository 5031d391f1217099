use crate::error::{DinoError, Result};
use crate::vision::CaptureRegion;
use image::RgbaImage;
use std::time::Instant;
use tracing::info;
use xcap::Monitor;

use super::r#trait::ScreenCapture;

/// Захват области монитора через xcap.
/// Дескриптор монитора берётся один раз и живёт столько же, сколько сам захват.
pub struct MonitorCapture {
    monitor: Monitor,
    region: CaptureRegion,
}

impl MonitorCapture {
    pub fn new(region: CaptureRegion, monitor_index: Option<usize>) -> Result<Self> {
        info!("Инициализация MonitorCapture для области {}", region);

        let monitors = Monitor::all()?;
        if monitors.is_empty() {
            return DinoError::screen_unavailable("xcap не нашёл ни одного монитора");
        }
        info!("Найдено мониторов: {}", monitors.len());

        let index = match monitor_index {
            Some(index) if index < monitors.len() => index,
            Some(index) => {
                return Err(crate::dino_error!(
                    screen_unavailable,
                    "монитор #{} не найден, доступно {}",
                    index,
                    monitors.len()
                ));
            }
            None => monitors.iter().position(|m| m.is_primary()).unwrap_or(0),
        };

        info!("Используется монитор #{}", index);

        Ok(Self {
            monitor: monitors[index].clone(),
            region,
        })
    }

    fn grab_blocking(&self) -> Result<RgbaImage> {
        let started = Instant::now();

        let screenshot = self.monitor.capture_image()?;
        if screenshot.width() == 0 || screenshot.height() == 0 {
            return DinoError::screen_unavailable(
                "получен пустой снимок экрана, проверьте разрешение на запись экрана",
            );
        }

        let frame = self.region.crop(&screenshot)?;

        crate::trace_if_enabled!("Захват + обрезка: {:?}", started.elapsed());
        Ok(frame)
    }
}

#[async_trait::async_trait(?Send)]
impl ScreenCapture for MonitorCapture {
    async fn grab(&mut self) -> Result<RgbaImage> {
        self.grab_blocking()
    }

    fn region(&self) -> &CaptureRegion {
        &self.region
    }

    fn backend_name(&self) -> &'static str {
        "xcap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires graphical display and screen recording permissions"]
    async fn test_grab_matches_region() {
        let region = CaptureRegion::new(0, 0, 32, 16);
        let mut capture = MonitorCapture::new(region, None).expect("MonitorCapture failed");

        let frame = capture.grab().await.expect("grab failed");
        assert_eq!(frame.dimensions(), (32, 16));
    }
}
