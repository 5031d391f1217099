use crate::config::Config;
use crate::error::Result;
use crate::vision::CaptureRegion;
use image::RgbaImage;
use std::time::Duration;

/// Trait for frame sources polled by the watcher loop
#[async_trait::async_trait(?Send)]
pub trait ScreenCapture {
    /// Grab one frame of exactly `region()` size
    async fn grab(&mut self) -> Result<RgbaImage>;

    fn region(&self) -> &CaptureRegion;

    fn backend_name(&self) -> &'static str;
}

/// Dry-run frames are paced by the watcher's poll interval. Only when polling is
/// disabled does the synthetic capture sleep, so the log is not flooded.
const DRY_RUN_FALLBACK_INTERVAL: Duration = Duration::from_millis(50);

fn dry_run_frame_interval(poll_interval_ms: u64) -> Duration {
    if poll_interval_ms == 0 {
        DRY_RUN_FALLBACK_INTERVAL
    } else {
        Duration::ZERO
    }
}

/// Factory function to create an appropriate capture backend based on the dry_run flag
pub fn create_screen_capture(config: &Config, dry_run: bool) -> Result<Box<dyn ScreenCapture>> {
    let region = config.capture.region;

    if dry_run {
        Ok(Box::new(super::dry_capture::DryRunCapture::new(
            region,
            dry_run_frame_interval(config.capture.poll_interval_ms),
        )))
    } else {
        Ok(Box::new(super::monitor_capture::MonitorCapture::new(
            region,
            config.capture.monitor,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_is_paced_once() {
        assert_eq!(dry_run_frame_interval(100), Duration::ZERO);
        assert_eq!(dry_run_frame_interval(1), Duration::ZERO);
        assert_eq!(dry_run_frame_interval(0), DRY_RUN_FALLBACK_INTERVAL);
    }

    #[tokio::test]
    async fn test_factory_builds_dry_run_backend() {
        let config = Config::default();
        let mut capture = create_screen_capture(&config, true).unwrap();

        assert_eq!(capture.backend_name(), "dry-run");
        let frame = capture.grab().await.unwrap();
        assert_eq!(
            frame.dimensions(),
            (config.capture.region.width, config.capture.region.height)
        );
    }
}
