//! Эвристика обнаружения препятствий: кадр -> оттенки серого -> скаляр -> порог.
//!
//! Модуль не знает ни о захвате экрана, ни о клавиатуре. Он только считает
//! сигнал по готовому кадру и решает, пересечён ли порог.

pub mod region;
pub mod signal;
pub mod threshold;

pub use region::CaptureRegion;
pub use signal::SignalMethod;
pub use threshold::{Direction, Threshold};
