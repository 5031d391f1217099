//! ScreenCapture service: responsibility and boundaries
//!
//! This module is responsible ONLY for producing region-sized RGBA frames.
//! It MUST NOT reduce frames to signals or decide anything about obstacles;
//! that belongs to `vision` and `ObstacleWatcher`.

pub mod dry_capture;
mod monitor_capture;
mod r#trait;

pub use self::r#trait::{create_screen_capture, ScreenCapture};
