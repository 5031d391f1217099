pub mod jumper;
pub mod keycode_map;
pub mod obstacle_watcher;
pub mod screen_capture;
pub mod starter;
pub mod virtual_device;

pub use jumper::Jumper;
pub use obstacle_watcher::ObstacleWatcher;
pub use screen_capture::{create_screen_capture, ScreenCapture};
pub use starter::Starter;
pub use virtual_device::VirtualDevice;
